use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Checksum error: {0}")]
    ChecksumError(#[from] unifile_utils::UtilsError),

    #[error("Head failed for '{0}': {1}")]
    HeadError(String, String),

    #[error("List failed for '{0}': {1}")]
    ListError(String, String),

    #[error("Download failed for '{0}': {1}")]
    DownloadError(String, String),

    #[error("Upload failed for '{0}': {1}")]
    UploadError(String, String),

    #[error("Copy failed from '{0}' to '{1}': {2}")]
    CopyError(String, String, String),

    #[error("Delete failed for '{0}': {1}")]
    DeleteError(String, String),

    #[error("Presign failed for '{0}': {1}")]
    PresignError(String, String),

    #[error("Existence wait failed for '{0}': {1}")]
    WaitError(String, String),
}
