use crate::pages::{mime_for_name, PageStream};
use crate::StorageError;
use bytes::Bytes;
use std::collections::VecDeque;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::Duration;
use tokio::fs;
use unifile_config::LocalSettings;
use unifile_types::{LocalFile, Scanned, ScannedLocalFile, WriteRequest};
use unifile_utils::compute_md5_with_size;

const CHECKSUM_BUFFER_SIZE: usize = 8192;

/// Local filesystem backend adapter. Existence checks stat the path; content
/// identity is a streamed MD5.
#[derive(Debug, Clone)]
pub struct LocalAdapter {
    poll_period: Duration,
}

impl LocalAdapter {
    pub fn new(poll_period: Duration) -> Self {
        Self { poll_period }
    }

    pub fn from_settings(settings: &LocalSettings) -> Self {
        Self::new(Duration::from_millis(settings.poll_period_ms))
    }

    /// Stat the path and compute identity metadata. A missing path or a
    /// non-regular file scans to `None`.
    pub async fn scan(&self, file: &LocalFile) -> Result<Option<ScannedLocalFile>, StorageError> {
        let metadata = match fs::metadata(&file.path).await {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        if !metadata.is_file() {
            return Ok(None);
        }

        let (md5, _) = compute_md5_with_size(&file.path, CHECKSUM_BUFFER_SIZE).await?;
        Ok(Some(Scanned {
            md5,
            size: metadata.len(),
            mime_type: mime_for_name(&file.path.display().to_string()),
            file: file.clone(),
        }))
    }

    /// List a file or directory as a lazy sequence of scanned pages.
    ///
    /// A file yields one page with its scan result. A directory yields a page
    /// of its immediate files, then recurses depth-first into each
    /// subdirectory in `read_dir` enumeration order. Entries that vanish
    /// between enumeration and scan are dropped from the page, not failed.
    pub fn list(&self, file: &LocalFile) -> PageStream<ScannedLocalFile> {
        let state = ListState {
            adapter: self.clone(),
            pending: VecDeque::from([file.path.clone()]),
        };
        Box::pin(futures::stream::try_unfold(state, |mut state| async move {
            let page = next_page(&state.adapter, &mut state.pending).await?;
            Ok(page.map(|page| (page, state)))
        }))
    }

    /// Whole-file read.
    pub async fn read(&self, file: &LocalFile) -> Result<Bytes, StorageError> {
        Ok(Bytes::from(fs::read(&file.path).await?))
    }

    /// Whole-body write, replacing any existing file. Parent directories are
    /// not created here; the copy orchestrator does that for cross-backend
    /// copies.
    pub async fn write(&self, request: WriteRequest<LocalFile>) -> Result<(), StorageError> {
        fs::write(&request.destination.path, &request.body).await?;
        tracing::debug!(
            "Wrote {} bytes to {}",
            request.body.len(),
            request.destination.path.display()
        );
        Ok(())
    }

    /// Native file-to-file copy, creating the destination's parent directory
    /// first.
    pub async fn copy(
        &self,
        source: &LocalFile,
        destination: &LocalFile,
    ) -> Result<(), StorageError> {
        self.ensure_parent_dir(destination).await?;
        fs::copy(&source.path, &destination.path).await?;
        tracing::debug!(
            "Copied {} -> {}",
            source.path.display(),
            destination.path.display()
        );
        Ok(())
    }

    pub async fn delete(&self, file: &LocalFile) -> Result<(), StorageError> {
        fs::remove_file(&file.path).await?;
        tracing::debug!("Deleted {}", file.path.display());
        Ok(())
    }

    /// Busy-poll until the path exists, sleeping between checks. No timeout:
    /// callers impose their own deadline if they need one.
    pub async fn wait_for_existence(&self, file: &LocalFile) -> Result<(), StorageError> {
        while !fs::try_exists(&file.path).await? {
            tokio::time::sleep(self.poll_period).await;
        }
        Ok(())
    }

    pub async fn ensure_parent_dir(&self, file: &LocalFile) -> Result<(), StorageError> {
        if let Some(parent) = file.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        Ok(())
    }
}

struct ListState {
    adapter: LocalAdapter,
    pending: VecDeque<PathBuf>,
}

async fn next_page(
    adapter: &LocalAdapter,
    pending: &mut VecDeque<PathBuf>,
) -> Result<Option<Vec<ScannedLocalFile>>, StorageError> {
    while let Some(path) = pending.pop_front() {
        let metadata = match fs::metadata(&path).await {
            Ok(metadata) => metadata,
            // Vanished since it was queued.
            Err(err) if err.kind() == ErrorKind::NotFound => continue,
            Err(err) => return Err(err.into()),
        };

        if metadata.is_file() {
            let page = adapter
                .scan(&LocalFile::new(path))
                .await?
                .into_iter()
                .collect();
            return Ok(Some(page));
        }

        if metadata.is_dir() {
            let (files, dirs) = partition_children(&path).await?;

            let scans = futures::future::join_all(files.iter().map(|file_path| {
                let file = LocalFile::new(file_path);
                async move { adapter.scan(&file).await }
            }))
            .await;

            let mut page = Vec::new();
            for scan in scans {
                if let Some(scanned) = scan? {
                    page.push(scanned);
                }
            }

            // Depth-first: this directory's subdirectories come before any
            // sibling still in the queue.
            for dir in dirs.into_iter().rev() {
                pending.push_front(dir);
            }
            return Ok(Some(page));
        }
        // Neither file nor directory (dangling symlink etc.): skip.
    }
    Ok(None)
}

async fn partition_children(
    path: &PathBuf,
) -> Result<(Vec<PathBuf>, Vec<PathBuf>), StorageError> {
    let mut files = Vec::new();
    let mut dirs = Vec::new();
    let mut entries = fs::read_dir(path).await?;
    while let Some(entry) = entries.next_entry().await? {
        let entry_path = entry.path();
        match entry.file_type().await {
            Ok(file_type) if file_type.is_dir() => dirs.push(entry_path),
            Ok(file_type) if file_type.is_file() => files.push(entry_path),
            // Vanished or unreadable entry: leave it out of the page.
            _ => {}
        }
    }
    Ok((files, dirs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::collect_all;

    const TEST_BODY: &str = "This is a test file";
    const TEST_MD5: &str = "0b26e313ed4a7ca6904b0e9369e5b957";

    fn adapter() -> LocalAdapter {
        LocalAdapter::new(Duration::from_millis(10))
    }

    #[tokio::test]
    async fn test_scan_reports_identity() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.txt");
        fs::write(&path, TEST_BODY).await.unwrap();

        let scanned = adapter()
            .scan(&LocalFile::new(&path))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(scanned.md5, TEST_MD5);
        assert_eq!(scanned.size, TEST_BODY.len() as u64);
        assert_eq!(scanned.mime_type, Some("text/plain".to_string()));
    }

    #[tokio::test]
    async fn test_scan_missing_and_directory() {
        let dir = tempfile::tempdir().unwrap();
        let local = adapter();

        let missing = local
            .scan(&LocalFile::new(dir.path().join("missing")))
            .await
            .unwrap();
        assert!(missing.is_none());

        // A directory is not a scannable file.
        let dir_scan = local.scan(&LocalFile::new(dir.path())).await.unwrap();
        assert!(dir_scan.is_none());
    }

    #[tokio::test]
    async fn test_write_read_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let file = LocalFile::new(dir.path().join("round.bin"));
        let local = adapter();

        local
            .write(WriteRequest::new(file.clone(), &b"\x00\x01\x02"[..]))
            .await
            .unwrap();
        let content = local.read(&file).await.unwrap();
        assert_eq!(&content[..], b"\x00\x01\x02");

        // Plain write overwrites.
        local
            .write(WriteRequest::new(file.clone(), &b"replaced"[..]))
            .await
            .unwrap();
        assert_eq!(&local.read(&file).await.unwrap()[..], b"replaced");
    }

    #[tokio::test]
    async fn test_list_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("only.txt");
        fs::write(&path, "x").await.unwrap();

        let all = collect_all(adapter().list(&LocalFile::new(&path)))
            .await
            .unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].file.path, path);
    }

    #[tokio::test]
    async fn test_list_recurses_depth_first() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.txt", "b.txt", "c.txt"] {
            fs::write(dir.path().join(name), name).await.unwrap();
        }
        fs::create_dir(dir.path().join("sub")).await.unwrap();
        fs::write(dir.path().join("sub/d.txt"), "d.txt").await.unwrap();

        let mut pages = Vec::new();
        let mut stream = adapter().list(&LocalFile::new(dir.path()));
        while let Some(page) = futures::TryStreamExt::try_next(&mut stream)
            .await
            .unwrap()
        {
            pages.push(page);
        }

        // One page for the root files, one for the subdirectory.
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].len(), 3);
        assert_eq!(pages[1].len(), 1);
        assert!(pages[1][0].file.path.ends_with("sub/d.txt"));

        let mut names: Vec<String> = pages
            .concat()
            .into_iter()
            .map(|s| {
                s.file
                    .path
                    .file_name()
                    .unwrap()
                    .to_string_lossy()
                    .to_string()
            })
            .collect();
        names.sort();
        assert_eq!(names, ["a.txt", "b.txt", "c.txt", "d.txt"]);
    }

    #[tokio::test]
    async fn test_list_missing_path_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let all = collect_all(adapter().list(&LocalFile::new(dir.path().join("nope"))))
            .await
            .unwrap();
        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn test_copy_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let source = LocalFile::new(dir.path().join("src.txt"));
        let destination = LocalFile::new(dir.path().join("deep/nested/dst.txt"));
        fs::write(&source.path, TEST_BODY).await.unwrap();

        let local = adapter();
        local.copy(&source, &destination).await.unwrap();
        assert_eq!(
            fs::read_to_string(&destination.path).await.unwrap(),
            TEST_BODY
        );
    }

    #[tokio::test]
    async fn test_delete_then_scan_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let file = LocalFile::new(dir.path().join("gone.txt"));
        fs::write(&file.path, "x").await.unwrap();

        let local = adapter();
        local.delete(&file).await.unwrap();
        assert!(local.scan(&file).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_wait_for_existence_polls_until_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("late.txt");
        let file = LocalFile::new(&path);

        let writer = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            fs::write(&path, "here").await.unwrap();
        });

        adapter().wait_for_existence(&file).await.unwrap();
        writer.await.unwrap();
        assert!(file.path.exists());
    }
}
