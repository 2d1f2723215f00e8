//! Pure formatting functions for UI output.
//!
//! All progress, warning and plan output of a release goes through here.

use console::style;

use crate::boundary::BoundaryWarning;
use crate::cli::plan::ReleasePlan;
use crate::process::{CommandOutput, CommandSpec};

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Echo an external command before it runs.
pub fn display_command(spec: &CommandSpec) {
    println!("  {} {}", style("$").dim(), style(spec).cyan());
}

/// Relay what a successful external command printed.
pub fn display_command_output(output: &CommandOutput) {
    for line in output.stdout.lines() {
        println!("  {}", line);
    }
    for line in output.stderr.lines() {
        eprintln!("  {}", style(line).dim());
    }
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Display the version change about to be released.
pub fn display_release_header(old: &str, new: &str) {
    println!("\n{}", style("Release").bold());
    println!("  From: {}", style(old).red());
    println!("  To:   {}", style(new).green());
}

/// Display what a release would do without doing it.
pub fn display_plan(plan: &ReleasePlan) {
    println!("\n{}", style("Dry run, nothing will be changed:").bold());

    println!("{}", style("Files:").underlined());
    for edit in &plan.edits {
        let occurrences = edit.occurrences();
        println!(
            "  {} ({} occurrence{})",
            edit.relative.display(),
            occurrences,
            if occurrences == 1 { "" } else { "s" }
        );
        for replacement in &edit.replacements {
            println!("    - {}", style(&replacement.before).red());
            println!("    + {}", style(&replacement.after).green());
        }
    }

    println!("{}", style("Steps:").underlined());
    for (i, step) in plan.steps.iter().enumerate() {
        println!("  {}. {}", i + 1, step);
    }
}

/// Final message of a successful release.
pub fn display_congratulations(new_version: &str) {
    println!(
        "\n{} Congratulations! {} is now ready to be released!\n",
        style("✓").green(),
        new_version
    );
}
