use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use flutter_release::cli::{run_release, ReleaseOptions, ReleaseOutcome};
use flutter_release::config;
use flutter_release::domain::{ReleaseContext, VersionToken};
use flutter_release::git::Git2Repository;
use flutter_release::process::SystemRunner;
use flutter_release::ui;

#[derive(clap::Parser)]
#[command(
    name = "flutter-release",
    version,
    about = "Release the Mixpanel Flutter SDK: bump versions, regenerate docs, tag and dry-run publish"
)]
struct Args {
    #[arg(long, help = "Version being replaced")]
    old: String,

    #[arg(long, help = "Version to release")]
    new: String,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(short = 'C', long, default_value = ".", help = "Repository to release")]
    repo: PathBuf,

    #[arg(short, long, help = "Skip confirmation prompts")]
    force: bool,

    #[arg(long, help = "Preview what would happen without making changes")]
    dry_run: bool,

    #[arg(long, help = "Commit and tag locally without pushing")]
    skip_push: bool,

    #[arg(long, help = "Skip the package publish dry run")]
    skip_publish: bool,

    #[arg(short, long, help = "Echo external commands before running them")]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Err(e) = release(args) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

fn release(args: Args) -> Result<()> {
    let token = VersionToken::new(args.old, args.new)?;

    let repo = Git2Repository::open(&args.repo)?;
    let root = repo.workdir()?;
    let config = config::load_config(args.config.as_deref(), &root)?;
    let ctx = ReleaseContext::new(token, root);

    let runner = SystemRunner::new(args.verbose);
    let options = ReleaseOptions {
        force: args.force,
        dry_run: args.dry_run,
        push: !args.skip_push,
        publish: !args.skip_publish,
    };

    let outcome = run_release(
        &ctx,
        &config,
        &repo,
        &runner,
        &options,
        &mut |prompt: &str| ui::confirm_action(prompt),
    )?;

    match outcome {
        ReleaseOutcome::Released(_) => ui::display_congratulations(ctx.new_version()),
        ReleaseOutcome::Planned(plan) => ui::display_plan(&plan),
        ReleaseOutcome::Cancelled => println!("Release cancelled by user."),
    }

    Ok(())
}
