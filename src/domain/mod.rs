//! Domain logic - pure release rules independent of git and external tools

pub mod pattern;
pub mod target;
pub mod version;

pub use pattern::VersionPattern;
pub use target::FileTarget;
pub use version::{ReleaseContext, VersionToken};
