//! Version-control publishing through the external git client

pub mod error;
pub mod git;
pub mod remote;
pub mod runner;

pub use error::{Result, VcsError};
pub use git::{GitClient, PublishOutcome, PublishRequest};
pub use remote::RemoteSpec;
pub use runner::{CommandOutput, CommandRunner, CommandSpec, SystemRunner};
