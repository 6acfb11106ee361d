use crate::{FileService, ServiceError};
use futures::TryStreamExt;
use unifile_types::{
    AnyFile, CopyOperation, CopyRequest, LocalFile, ScannedFile, WriteOptions, WriteRequest,
};
use unifile_utils::{to_local_path, to_s3_key};

impl FileService {
    /// Copy everything under `source` to `destination`, file by file.
    ///
    /// The source is listed lazily; each listed file's key is re-rooted under
    /// the destination and the pair is resolved to one of the four
    /// backend-combination strategies. Returns the number of files actually
    /// transferred (`skip_same` skips are not counted).
    pub async fn copy(
        &self,
        request: CopyRequest<AnyFile, AnyFile>,
        options: &WriteOptions,
    ) -> Result<u64, ServiceError> {
        tracing::info!("Copying {} -> {}", request.source, request.destination);

        let mut pages = self.list(&request.source);
        let mut copied = 0u64;
        while let Some(page) = pages.try_next().await? {
            for scanned in page {
                let destination =
                    destination_for(&scanned.file, &request.source, &request.destination);
                if self
                    .copy_file(CopyOperation::new(scanned, destination), options)
                    .await?
                {
                    copied += 1;
                }
            }
        }
        Ok(copied)
    }

    /// Copy one file whose source is already scanned. The source/destination
    /// pair resolves to exactly one of four strategies; cross-backend copies
    /// fall back to a full read-then-write through this process, same-backend
    /// copies stay native. Returns false when `skip_same` elided the
    /// transfer.
    pub async fn copy_file(
        &self,
        operation: CopyOperation<AnyFile, AnyFile>,
        options: &WriteOptions,
    ) -> Result<bool, ServiceError> {
        if options.skip_same || !options.overwrite {
            if let Some(existing) = self.scan(&operation.destination).await? {
                if options.skip_same && existing.md5 == operation.source.md5 {
                    tracing::debug!(
                        "Skipping copy to {}: content identical",
                        operation.destination
                    );
                    return Ok(false);
                }
                if !options.overwrite {
                    return Err(ServiceError::DestinationExists(
                        operation.destination.location_string(),
                    ));
                }
            }
        }

        let CopyOperation {
            source,
            destination,
        } = operation;

        match (source.transpose(), destination) {
            (ScannedFile::S3(source), AnyFile::S3(destination)) => {
                self.s3.copy(&source, &destination, options).await?;
            }
            (ScannedFile::S3(source), AnyFile::Local(destination)) => {
                self.local.ensure_parent_dir(&destination).await?;
                let body = self.s3.read(&source).await?;
                self.local.write(WriteRequest { destination, body }).await?;
            }
            (ScannedFile::Local(source), AnyFile::S3(destination)) => {
                let body = self.local.read(&source.file).await?;
                // The ordinary write path, so MIME inference, progress events
                // and the public ACL all apply.
                self.s3
                    .write(WriteRequest { destination, body }, options)
                    .await?;
            }
            (ScannedFile::Local(source), AnyFile::Local(destination)) => {
                self.local.copy(&source.file, &destination).await?;
            }
        }
        Ok(true)
    }
}

/// Re-root a listed file under the copy destination: the destination key plus
/// the file's source-relative suffix, rewritten into the destination
/// backend's address space (forward-slash keys without a leading slash for
/// S3, native separators locally). Copying a single file maps it onto the
/// destination exactly.
fn destination_for(file: &AnyFile, source: &AnyFile, destination: &AnyFile) -> AnyFile {
    let source_key = source.raw_key();
    let file_key = file.raw_key();
    let suffix = file_key.strip_prefix(&source_key).unwrap_or(&file_key);

    match destination {
        AnyFile::S3(dest) => {
            let key = to_s3_key(&format!("{}{}", dest.key, suffix));
            AnyFile::S3(dest.with_key(key))
        }
        AnyFile::Local(dest) => {
            let path = to_local_path(&format!("{}{}", dest.path.display(), suffix));
            AnyFile::Local(LocalFile::new(path))
        }
    }
}
