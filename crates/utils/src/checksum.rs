use crate::UtilsError;
use md5::{Digest, Md5};
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

const DEFAULT_BUFFER_SIZE: usize = 8192; // 8KB buffer for streaming

pub async fn compute_md5<P: AsRef<Path>>(path: P) -> Result<String, UtilsError> {
    let (md5, _) = compute_md5_with_size(path, DEFAULT_BUFFER_SIZE).await?;
    Ok(md5)
}

/// Streams the file through an incremental digest so large files never sit
/// fully in memory. Returns the hex digest and the byte count read.
pub async fn compute_md5_with_size<P: AsRef<Path>>(
    path: P,
    buffer_size: usize,
) -> Result<(String, u64), UtilsError> {
    let mut file = File::open(path).await?;
    let mut hasher = Md5::new();
    let mut buffer = vec![0u8; buffer_size];
    let mut total_bytes = 0u64;

    loop {
        let bytes_read = file.read(&mut buffer).await?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
        total_bytes += bytes_read as u64;
    }

    let result = hasher.finalize();
    Ok((hex::encode(result), total_bytes))
}

/// Digest of an in-memory body, for comparing against a scanned file.
pub fn md5_hex(body: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(body);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_BODY: &str = "This is a test file";
    const TEST_MD5: &str = "0b26e313ed4a7ca6904b0e9369e5b957";

    #[test]
    fn test_md5_hex() {
        assert_eq!(md5_hex(TEST_BODY.as_bytes()), TEST_MD5);
    }

    #[tokio::test]
    async fn test_compute_md5_matches_in_memory_digest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.txt");
        tokio::fs::write(&path, TEST_BODY).await.unwrap();

        let (md5, size) = compute_md5_with_size(&path, 4).await.unwrap();
        assert_eq!(md5, TEST_MD5);
        assert_eq!(size, TEST_BODY.len() as u64);

        assert_eq!(compute_md5(&path).await.unwrap(), TEST_MD5);
    }

    #[tokio::test]
    async fn test_compute_md5_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty");
        tokio::fs::write(&path, b"").await.unwrap();

        let (md5, size) = compute_md5_with_size(&path, 8192).await.unwrap();
        assert_eq!(md5, "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(size, 0);
    }

    #[tokio::test]
    async fn test_compute_md5_missing_file() {
        let result = compute_md5("/nonexistent/never/here").await;
        assert!(matches!(result, Err(UtilsError::IoError(_))));
    }
}
