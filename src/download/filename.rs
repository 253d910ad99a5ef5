//! Filename derivation for downloaded wallpapers.
//!
//! Upstream asset URLs end in `wallhaven-<id>.<ext>`; the saved file keeps only
//! `<id>.<ext>`.

use std::path::{Component, Path, PathBuf};

use url::Url;

use super::error::DownloadError;

/// Derives the on-disk filename from an asset URL.
///
/// Takes the final path segment and keeps everything after its first `-`.
/// A segment without `-` is kept whole.
///
/// # Errors
///
/// Returns [`DownloadError::InvalidUrl`] if the URL does not parse or its final
/// segment yields an empty or unsafe name.
///
/// # Example
///
/// ```
/// use wallhaven_core::download::derive_filename;
///
/// let name = derive_filename("https://w.wallhaven.cc/full/pk/wallhaven-pkgkkp.png").unwrap();
/// assert_eq!(name, "pkgkkp.png");
/// ```
pub fn derive_filename(url: &str) -> Result<String, DownloadError> {
    let parsed = Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;
    let segment = parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty())
        .ok_or_else(|| DownloadError::invalid_url(url))?;

    let name = segment
        .split_once('-')
        .map_or(segment, |(_, rest)| rest);
    let name = sanitize_filename(name);

    if name.is_empty() || !is_safe_filename_segment(&name) {
        return Err(DownloadError::invalid_url(url));
    }
    Ok(name)
}

/// Resolves the destination path for an asset: the derived filename, joined
/// with `folder` when the folder is non-empty.
///
/// # Errors
///
/// Same as [`derive_filename`].
pub fn destination_path(folder: &Path, url: &str) -> Result<PathBuf, DownloadError> {
    let name = derive_filename(url)?;
    if folder.as_os_str().is_empty() {
        Ok(PathBuf::from(name))
    } else {
        Ok(folder.join(name))
    }
}

/// Replaces characters that are invalid on common filesystems:
/// / \ : * ? " < > |
pub(crate) fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

fn is_safe_filename_segment(name: &str) -> bool {
    !Path::new(name).components().any(|component| {
        matches!(
            component,
            Component::CurDir | Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    })
}
