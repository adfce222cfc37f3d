// crates/server/src/uploads.rs
//! Scratch storage for uploaded voice samples.

use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Longest extension carried over from the client-supplied filename.
const MAX_EXT_LEN: usize = 8;

/// Pick a safe extension from the client-supplied filename.
///
/// Only short alphanumeric extensions survive; anything else (missing,
/// oversized, or containing path tricks) falls back to `bin`.
fn sanitized_extension(original_name: Option<&str>) -> String {
    original_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .filter(|ext| {
            !ext.is_empty()
                && ext.len() <= MAX_EXT_LEN
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .unwrap_or_else(|| "bin".to_string())
}

/// Persist an uploaded voice sample under a generated name.
///
/// The scratch directory is created on demand. Returns the path the sample
/// was written to. There is no cleanup policy; deployments point the
/// directory at ephemeral storage.
pub async fn save_voice_sample(
    dir: &Path,
    original_name: Option<&str>,
    bytes: &[u8],
) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;

    let filename = format!("{}.{}", Uuid::new_v4(), sanitized_extension(original_name));
    let path = dir.join(filename);
    tokio::fs::write(&path, bytes).await?;

    tracing::debug!(path = %path.display(), size = bytes.len(), "stored voice sample");
    Ok(path)
}
