use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::config::UploadsConfig;
use crate::error::{AppError, Result};

/// Allowed course file extensions
const ALLOWED_EXTENSIONS: &[&str] = &[
    "pdf", "ppt", "pptx", "key", "odp",
    "xls", "xlsx", "csv", "ods",
    "doc", "docx", "odt", "txt", "md", "rtf",
    "mp4", "mov", "webm",
    "zip",
    "png", "jpg", "jpeg",
];

/// URL prefix under which saved files are served.
pub const UPLOADS_ROUTE: &str = "/uploads";

/// Material files stored on local disk and served from `/uploads`.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
    public_base: String,
    max_file_size: usize,
}

impl UploadStore {
    pub fn new(config: &UploadsConfig, base_url: &str) -> Self {
        Self {
            dir: PathBuf::from(&config.dir),
            public_base: format!("{}{}", base_url.trim_end_matches('/'), UPLOADS_ROUTE),
            max_file_size: config.max_file_size,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Save an uploaded file and return the public URL it is served from.
    pub async fn save(&self, filename: &str, data: &[u8]) -> Result<String> {
        // Validate file size
        if data.is_empty() {
            return Err(AppError::Validation("Uploaded file is empty".to_string()));
        }
        if data.len() > self.max_file_size {
            return Err(AppError::Validation(format!(
                "File too large (max {} MB)",
                self.max_file_size / (1024 * 1024)
            )));
        }

        // Extract and validate extension
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_lowercase())
            .ok_or_else(|| AppError::Validation("Invalid filename".to_string()))?;

        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(AppError::Validation(format!(
                "Invalid file type. Allowed: {}",
                ALLOWED_EXTENSIONS.join(", ")
            )));
        }

        fs::create_dir_all(&self.dir).await.map_err(|e| {
            AppError::Storage(format!("Failed to create uploads directory: {}", e))
        })?;

        let new_filename = format!("{}.{}", Uuid::new_v4(), extension);
        let file_path = self.dir.join(&new_filename);

        let mut file = fs::File::create(&file_path).await.map_err(|e| {
            AppError::Storage(format!("Failed to create file: {}", e))
        })?;

        file.write_all(data).await.map_err(|e| {
            AppError::Storage(format!("Failed to write file: {}", e))
        })?;
        file.flush().await.map_err(|e| {
            AppError::Storage(format!("Failed to write file: {}", e))
        })?;

        tracing::debug!("Stored upload {} as {}", filename, file_path.display());

        Ok(format!("{}/{}", self.public_base, new_filename))
    }

    /// The stored file name behind a public URL, if the URL points into
    /// this store.
    pub fn stored_name<'a>(&self, url: &'a str) -> Option<&'a str> {
        let name = url.strip_prefix(&self.public_base)?.strip_prefix('/')?;
        let plain = !name.is_empty()
            && !name.contains('/')
            && !name.contains('\\')
            && !name.starts_with('.');
        plain.then_some(name)
    }

    /// Delete the file behind a URL. URLs that point elsewhere (shared
    /// drive links and the like) are left alone.
    pub async fn delete(&self, url: &str) -> Result<()> {
        let Some(name) = self.stored_name(url) else {
            return Ok(());
        };

        let path = self.dir.join(name);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Storage(format!("Failed to delete file: {}", e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(dir: &Path) -> UploadStore {
        UploadStore::new(
            &UploadsConfig {
                dir: dir.to_string_lossy().into_owned(),
                max_file_size: 1024,
            },
            "http://localhost:8080/",
        )
    }

    #[test]
    fn test_stored_name() {
        let store = store(Path::new("uploads"));
        assert_eq!(store.stored_name("http://localhost:8080/uploads/abc.pdf"), Some("abc.pdf"));
        assert_eq!(store.stored_name("http://localhost:8080/uploads/../secret"), None);
        assert_eq!(store.stored_name("https://drive.google.com/file/abc"), None);
        assert_eq!(store.stored_name("http://localhost:8080/uploads/"), None);
    }

    #[tokio::test]
    async fn test_save_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());

        let url = store.save("Week 1.PDF", b"%PDF-1.4").await.unwrap();
        assert!(url.starts_with("http://localhost:8080/uploads/"));
        assert!(url.ends_with(".pdf"));

        let name = store.stored_name(&url).unwrap().to_string();
        assert!(dir.path().join(&name).exists());

        store.delete(&url).await.unwrap();
        assert!(!dir.path().join(&name).exists());
        // Deleting twice is fine
        store.delete(&url).await.unwrap();
    }

    #[tokio::test]
    async fn test_save_rejects_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());

        assert!(matches!(store.save("run.exe", b"MZ").await, Err(AppError::Validation(_))));
        assert!(matches!(store.save("noext", b"x").await, Err(AppError::Validation(_))));
        assert!(matches!(store.save("big.pdf", &vec![0u8; 2048]).await, Err(AppError::Validation(_))));
        assert!(matches!(store.save("empty.pdf", b"").await, Err(AppError::Validation(_))));
    }
}
