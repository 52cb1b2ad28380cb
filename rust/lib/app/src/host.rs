use inventory_router::{Document, Router};
use thiserror::Error;

/// Where the shell attaches itself.
pub const MOUNT_POINT: &str = "#app";

#[derive(Error, Debug)]
pub enum MountError {
    #[error("mount point '{0}' not found")]
    MissingTarget(String),

    #[error("host failed to mount: {0}")]
    Host(String),
}

/// The surface the shell is displayed on. Mounting hands over the
/// router (current route and view) and the document (title).
pub trait Host: Send + Sync {
    fn mount(&self, target: &str, router: &Router, document: &Document) -> Result<(), MountError>;
}
