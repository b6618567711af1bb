//! File I/O utilities.

use crate::{Result, TransmutationError};
use std::path::Path;
use tokio::fs;

/// Read a file asynchronously.
///
/// # Errors
///
/// Returns `FileNotFound` or `PermissionDenied` for those I/O conditions and
/// `Io` with the original error for anything else.
pub async fn read_file_async(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    fs::read(path)
        .await
        .map_err(|e| TransmutationError::from_io(e, path))
}
