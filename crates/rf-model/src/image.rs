//! Opaque binary image handles.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::io;
use std::path::PathBuf;

/// Handle to a binary image supplied by the attachment store.
///
/// Ownership stays with the external collaborator; the engine only reads.
/// Either a resolved file path or the raw bytes themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageRef {
    /// Resolved path in the attachment file store.
    Path(PathBuf),
    /// Image bytes already in memory.
    Bytes(Vec<u8>),
}

impl ImageRef {
    /// Read the image bytes, borrowing when already in memory.
    pub fn read(&self) -> io::Result<Cow<'_, [u8]>> {
        match self {
            ImageRef::Path(path) => std::fs::read(path).map(Cow::Owned),
            ImageRef::Bytes(bytes) => Ok(Cow::Borrowed(bytes)),
        }
    }
}

impl From<Vec<u8>> for ImageRef {
    fn from(bytes: Vec<u8>) -> Self {
        ImageRef::Bytes(bytes)
    }
}

impl From<PathBuf> for ImageRef {
    fn from(path: PathBuf) -> Self {
        ImageRef::Path(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_read_borrows() {
        let image = ImageRef::Bytes(vec![0x89, 0x50, 0x4e, 0x47]);
        let data = image.read().unwrap();
        assert!(matches!(data, Cow::Borrowed(_)));
        assert_eq!(&data[..2], &[0x89, 0x50]);
    }

    #[test]
    fn test_missing_path_errors() {
        let image = ImageRef::Path(PathBuf::from("/nonexistent/logo.png"));
        assert!(image.read().is_err());
    }
}
