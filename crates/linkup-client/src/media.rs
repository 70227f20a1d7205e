//! Image and video files picked for portfolios and avatars.
//!
//! Files are read into memory and kept inline as base64 `data:` URLs; they
//! are never uploaded anywhere.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::debug;

use linkup_shared::constants::MAX_UPLOAD_SIZE;
use linkup_shared::models::MediaFile;

use crate::error::MediaError;

/// MIME type for a supported file extension.
pub fn mime_for(file_name: &str) -> Option<&'static str> {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())?
        .to_ascii_lowercase();

    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "mp4" => Some("video/mp4"),
        "webm" => Some("video/webm"),
        "mov" => Some("video/quicktime"),
        _ => None,
    }
}

/// Read a file from disk.
pub fn read_media_file(path: &Path) -> Result<MediaFile, MediaError> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string();

    // Check type and size before reading the whole file.
    if mime_for(&file_name).is_none() {
        return Err(MediaError::UnsupportedType(file_name));
    }
    let size = std::fs::metadata(path)?.len() as usize;
    if size > MAX_UPLOAD_SIZE {
        return Err(MediaError::TooLarge {
            size,
            max: MAX_UPLOAD_SIZE,
        });
    }

    let bytes = std::fs::read(path)?;
    media_from_bytes(&file_name, &bytes)
}

/// Build a [`MediaFile`] from bytes already in memory (e.g. a drag-and-drop).
pub fn media_from_bytes(file_name: &str, bytes: &[u8]) -> Result<MediaFile, MediaError> {
    let mime_type =
        mime_for(file_name).ok_or_else(|| MediaError::UnsupportedType(file_name.to_string()))?;

    if bytes.len() > MAX_UPLOAD_SIZE {
        return Err(MediaError::TooLarge {
            size: bytes.len(),
            max: MAX_UPLOAD_SIZE,
        });
    }

    debug!(file = file_name, size = bytes.len(), mime = mime_type, "Media file loaded");

    Ok(MediaFile {
        file_name: file_name.to_string(),
        mime_type: mime_type.to_string(),
        size: bytes.len(),
        data_url: format!("data:{mime_type};base64,{}", STANDARD.encode(bytes)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_from_extension() {
        assert_eq!(mime_for("a.PNG"), Some("image/png"));
        assert_eq!(mime_for("clip.mov"), Some("video/quicktime"));
        assert_eq!(mime_for("notes.txt"), None);
        assert_eq!(mime_for("no_extension"), None);
    }

    #[test]
    fn data_url_encoding() {
        let media = media_from_bytes("dot.gif", b"GIF8").unwrap();
        assert_eq!(media.data_url, "data:image/gif;base64,R0lGOA==");
        assert_eq!(media.size, 4);
        assert!(!media.is_video());
    }

    #[test]
    fn read_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reel.mp4");
        std::fs::write(&path, [0u8, 1, 2]).unwrap();

        let media = read_media_file(&path).unwrap();
        assert_eq!(media.file_name, "reel.mp4");
        assert!(media.is_video());
    }

    #[test]
    fn rejects_unsupported_and_oversized() {
        assert!(matches!(
            media_from_bytes("cv.pdf", b"%PDF"),
            Err(MediaError::UnsupportedType(_))
        ));

        let big = vec![0u8; MAX_UPLOAD_SIZE + 1];
        assert!(matches!(
            media_from_bytes("big.png", &big),
            Err(MediaError::TooLarge { .. })
        ));
    }
}
