use crate::error::FormError;
use base64::Engine;
use std::path::Path;

const UNKNOWN_MIME_TYPE: &str = "application/octet-stream";

/// The image file the user picked, as the browser would hand it over.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectedImage {
    bytes: Vec<u8>,
    mime_type: String,
    file_name: String,
}

impl SelectedImage {
    /// Wraps a file that is already in memory.
    ///
    /// # Arguments
    /// * `bytes` - The raw file content
    /// * `mime_type` - Content type sent with the upload and used in the data URL
    /// * `file_name` - Name reported to the backend
    pub fn new(
        bytes: impl Into<Vec<u8>>,
        mime_type: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            bytes: bytes.into(),
            mime_type: mime_type.into(),
            file_name: file_name.into(),
        }
    }

    /// Reads an image file from disk, guessing the MIME type from its extension.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, FormError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|source| FormError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("image")
            .to_string();

        log::debug!("Loaded {} ({} bytes)", path.display(), bytes.len());

        Ok(Self::new(bytes, mime_type_for_path(path), file_name))
    }

    /// The raw file content.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Content type, e.g. `image/png`.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// File name without directories.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Inline `data:` URL suitable as an `<img>` source.
    pub fn to_data_url(&self) -> String {
        let encoded = base64::engine::general_purpose::STANDARD.encode(&self.bytes);
        format!("data:{};base64,{}", self.mime_type, encoded)
    }
}

fn mime_type_for_path(path: &Path) -> &'static str {
    let Some(extension) = path.extension().and_then(|ext| ext.to_str()) else {
        return UNKNOWN_MIME_TYPE;
    };

    match extension.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        _ => UNKNOWN_MIME_TYPE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_url_encodes_exact_bytes() {
        let image = SelectedImage::new(vec![0x89, b'P', b'N', b'G'], "image/png", "a.png");
        assert_eq!(image.to_data_url(), "data:image/png;base64,iVBORw==");
    }

    #[test]
    fn empty_image_still_has_a_data_url() {
        let image = SelectedImage::new(Vec::new(), "image/gif", "empty.gif");
        assert_eq!(image.to_data_url(), "data:image/gif;base64,");
    }

    #[test]
    fn mime_type_follows_extension() {
        assert_eq!(mime_type_for_path(Path::new("cat.JPG")), "image/jpeg");
        assert_eq!(mime_type_for_path(Path::new("cat.jpeg")), "image/jpeg");
        assert_eq!(mime_type_for_path(Path::new("dir/dog.webp")), "image/webp");
        assert_eq!(mime_type_for_path(Path::new("shot.png")), "image/png");
        assert_eq!(mime_type_for_path(Path::new("loop.gif")), "image/gif");
        assert_eq!(mime_type_for_path(Path::new("scan.bmp")), "image/bmp");
        assert_eq!(mime_type_for_path(Path::new("logo.svg")), "image/svg+xml");
        assert_eq!(mime_type_for_path(Path::new("notes.txt")), UNKNOWN_MIME_TYPE);
        assert_eq!(mime_type_for_path(Path::new("README")), UNKNOWN_MIME_TYPE);
    }

    #[tokio::test]
    async fn load_reads_file_from_disk() {
        let path = std::env::temp_dir().join(format!("upload-query-{}.png", std::process::id()));
        tokio::fs::write(&path, b"pixels").await.unwrap();

        let image = SelectedImage::load(&path).await.unwrap();
        tokio::fs::remove_file(&path).await.unwrap();

        assert_eq!(image.bytes(), b"pixels");
        assert_eq!(image.mime_type(), "image/png");
        assert!(image.file_name().ends_with(".png"));
    }

    #[tokio::test]
    async fn load_reports_missing_file() {
        let err = SelectedImage::load("/definitely/not/here.png")
            .await
            .unwrap_err();
        assert!(matches!(err, FormError::Io { .. }));
    }
}
