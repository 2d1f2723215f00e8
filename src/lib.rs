pub mod boundary;
pub mod bump;
pub mod cli;
pub mod config;
pub mod docs;
pub mod domain;
pub mod error;
pub mod git;
pub mod preflight;
pub mod process;
pub mod publish;
pub mod tagger;
pub mod ui;

pub use error::{ReleaseError, Result};
