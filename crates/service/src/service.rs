use crate::ServiceError;
use bytes::Bytes;
use futures::TryStreamExt;
use std::time::Duration;
use unifile_config::Config;
use unifile_storage::{LocalAdapter, PageStream, S3Adapter};
use unifile_types::{
    AnyFile, LocalFile, S3File, Scanned, ScannedAnyFile, ScannedFile, WriteOptions, WriteRequest,
};
use unifile_utils::md5_hex;

/// The unified file service: one contract over the local filesystem and S3.
///
/// Callers hand in an [`AnyFile`] and never branch on storage kind
/// themselves; every operation here dispatches through exactly one
/// exhaustive match on the reference, so a new storage kind cannot compile
/// without every operation handling it.
pub struct FileService {
    pub(crate) local: LocalAdapter,
    pub(crate) s3: S3Adapter,
}

impl FileService {
    pub fn new(local: LocalAdapter, s3: S3Adapter) -> Self {
        Self { local, s3 }
    }

    /// Wire both adapters from configuration.
    pub async fn from_config(config: &Config) -> Result<Self, ServiceError> {
        Ok(Self::new(
            LocalAdapter::from_settings(&config.local),
            S3Adapter::from_settings(&config.s3, &config.transfer).await?,
        ))
    }

    /// Existence check plus identity metadata. `None` is the ordinary absent
    /// case, never an error.
    pub async fn scan(&self, file: &AnyFile) -> Result<Option<ScannedAnyFile>, ServiceError> {
        match file {
            AnyFile::Local(file) => Ok(self
                .local
                .scan(file)
                .await?
                .map(Scanned::<LocalFile>::into_any)),
            AnyFile::S3(file) => Ok(self.s3.scan(file).await?.map(Scanned::<S3File>::into_any)),
        }
    }

    /// Lazy page sequence of everything under the reference: recursive
    /// directory walk locally, paginated prefix listing remotely. Pages
    /// arrive in discovery order.
    pub fn list(&self, file: &AnyFile) -> PageStream<ScannedAnyFile> {
        match file {
            AnyFile::Local(file) => Box::pin(
                self.local.list(file).map_ok(|page| {
                    page.into_iter().map(Scanned::<LocalFile>::into_any).collect()
                }),
            ),
            AnyFile::S3(file) => Box::pin(
                self.s3
                    .list(file)
                    .map_ok(|page| page.into_iter().map(Scanned::<S3File>::into_any).collect()),
            ),
        }
    }

    /// Full content of a file known to exist.
    pub async fn read(&self, file: &ScannedAnyFile) -> Result<Bytes, ServiceError> {
        match file.clone().transpose() {
            ScannedFile::Local(file) => Ok(self.local.read(&file.file).await?),
            ScannedFile::S3(file) => Ok(self.s3.read(&file).await?),
        }
    }

    /// Write a body to either backend, applying the cross-cutting policy
    /// before dispatch: `skip_same` no-ops on identical content (checked
    /// first), then `overwrite: false` on an existing destination fails with
    /// [`ServiceError::DestinationExists`] before any data moves.
    pub async fn write(
        &self,
        request: WriteRequest<AnyFile>,
        options: &WriteOptions,
    ) -> Result<(), ServiceError> {
        if options.skip_same || !options.overwrite {
            if let Some(existing) = self.scan(&request.destination).await? {
                if options.skip_same && existing.md5 == md5_hex(&request.body) {
                    tracing::debug!(
                        "Skipping write to {}: content identical",
                        request.destination
                    );
                    return Ok(());
                }
                if !options.overwrite {
                    return Err(ServiceError::DestinationExists(
                        request.destination.location_string(),
                    ));
                }
            }
        }

        let WriteRequest { destination, body } = request;
        match destination {
            AnyFile::Local(destination) => {
                self.local
                    .write(WriteRequest { destination, body })
                    .await?
            }
            AnyFile::S3(destination) => {
                self.s3
                    .write(WriteRequest { destination, body }, options)
                    .await?
            }
        }
        Ok(())
    }

    /// Delete everything under the reference (a single file or a folder).
    /// Returns the number of files removed; a reference with nothing under
    /// it deletes nothing and succeeds.
    pub async fn delete(&self, file: &AnyFile) -> Result<u64, ServiceError> {
        let mut pages = self.list(file);
        let mut deleted = 0u64;
        while let Some(page) = pages.try_next().await? {
            for scanned in page {
                match scanned.transpose() {
                    ScannedFile::Local(file) => self.local.delete(&file.file).await?,
                    ScannedFile::S3(file) => self.s3.delete(&file).await?,
                }
                deleted += 1;
            }
        }
        Ok(deleted)
    }

    /// `s3://bucket/key` for remote references, the native path for local
    /// ones.
    pub fn location_string(&self, file: &AnyFile) -> String {
        file.location_string()
    }

    /// Block until the reference is observable: the SDK waiter remotely, a
    /// sleep-between-checks poll locally.
    pub async fn wait_for_existence(&self, file: &AnyFile) -> Result<(), ServiceError> {
        match file {
            AnyFile::Local(file) => Ok(self.local.wait_for_existence(file).await?),
            AnyFile::S3(file) => Ok(self.s3.wait_for_existence(file).await?),
        }
    }

    /// A time-limited presigned read link. Local files have no link concept,
    /// so they always resolve to `None`, as does an absent remote object.
    pub async fn read_url(
        &self,
        file: &AnyFile,
        expiry: Option<Duration>,
    ) -> Result<Option<String>, ServiceError> {
        match file {
            AnyFile::Local(_) => Ok(None),
            AnyFile::S3(file) => Ok(self.s3.read_url(file, expiry).await?),
        }
    }
}
