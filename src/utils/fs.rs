//! File moves that survive crossing filesystems

use std::io;
use std::path::Path;

use tokio::fs;
use tracing::debug;

/// `EXDEV`, the same value on Linux, macOS and the BSDs
#[cfg(unix)]
const CROSS_DEVICE_ERROR: Option<i32> = Some(18);

/// `ERROR_NOT_SAME_DEVICE`
#[cfg(windows)]
const CROSS_DEVICE_ERROR: Option<i32> = Some(17);

#[cfg(not(any(unix, windows)))]
const CROSS_DEVICE_ERROR: Option<i32> = None;

fn is_cross_device(e: &io::Error) -> bool {
    CROSS_DEVICE_ERROR.is_some() && e.raw_os_error() == CROSS_DEVICE_ERROR
}

/// Move `src` to `dst`, creating parent directories.
///
/// A rename is tried first. Across devices the file is copied next to `dst`
/// under a temporary name, renamed into place, and the source removed.
pub async fn move_file(src: &Path, dst: &Path) -> io::Result<()> {
    if let Some(parent) = dst.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }

    match fs::rename(src, dst).await {
        Ok(()) => Ok(()),
        Err(e) if is_cross_device(&e) => {
            debug!(
                "Cross-device rename, copying instead: {} -> {}",
                src.display(),
                dst.display()
            );
            copy_and_delete(src, dst).await
        }
        Err(e) => Err(e),
    }
}

async fn copy_and_delete(src: &Path, dst: &Path) -> io::Result<()> {
    let mut staging = dst.as_os_str().to_os_string();
    staging.push(".partial");
    let staging = std::path::PathBuf::from(staging);

    if let Err(e) = fs::copy(src, &staging).await {
        let _ = fs::remove_file(&staging).await;
        return Err(e);
    }
    if let Err(e) = fs::rename(&staging, dst).await {
        let _ = fs::remove_file(&staging).await;
        return Err(e);
    }
    fs::remove_file(src).await
}
