use crate::pages::{mime_for_name, PageStream};
use crate::StorageError;
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_s3::client::Waiters;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{
    CompletedMultipartUpload, CompletedPart, Object, ObjectCannedAcl,
};
use aws_sdk_s3::Client;
use bytes::Bytes;
use std::time::Duration;
use unifile_config::{S3Settings, TransferSettings};
use unifile_types::{
    S3File, Scanned, ScannedS3File, TransferProgress, WriteOptions, WriteRequest,
};
use unifile_utils::unquote_etag;

/// S3-compatible remote backend adapter.
/// Compatible with: AWS S3, MinIO, Cloudflare R2, DigitalOcean Spaces, etc.
///
/// The wrapped client is created once and shared by every operation; the
/// adapter itself holds no other mutable state.
#[derive(Clone)]
pub struct S3Adapter {
    client: Client,
    max_keys_per_page: i32,
    part_size: usize,
    default_content_type: String,
    link_expiry: Duration,
    wait_timeout: Duration,
}

impl S3Adapter {
    pub fn new(client: Client, s3: &S3Settings, transfer: &TransferSettings) -> Self {
        Self {
            client,
            max_keys_per_page: s3.max_list_keys_per_page,
            part_size: (transfer.multipart_part_size_mb as usize) * 1024 * 1024,
            default_content_type: transfer.default_content_type.clone(),
            link_expiry: Duration::from_secs(s3.link_expiry_secs),
            wait_timeout: Duration::from_secs(s3.wait_timeout_secs),
        }
    }

    /// Build a client from settings: explicit credentials/region/endpoint when
    /// configured, otherwise the AWS default provider chain.
    pub async fn from_settings(
        s3: &S3Settings,
        transfer: &TransferSettings,
    ) -> Result<Self, StorageError> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(s3.region.clone()));

        if let (Some(access_key), Some(secret_key)) = (&s3.access_key_id, &s3.secret_access_key) {
            loader = loader.credentials_provider(Credentials::new(
                access_key,
                secret_key,
                None,
                None,
                "unifile",
            ));
        }
        if let Some(endpoint_url) = &s3.endpoint_url {
            loader = loader.endpoint_url(endpoint_url);
        }

        let sdk_config = loader.load().await;
        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if s3.force_path_style {
            builder = builder.force_path_style(true);
        }
        let client = Client::from_conf(builder.build());

        Ok(Self::new(client, s3, transfer))
    }

    /// Metadata-head scan. A not-found response is the ordinary absent case;
    /// any other failure propagates.
    pub async fn scan(&self, file: &S3File) -> Result<Option<ScannedS3File>, StorageError> {
        let head = self
            .client
            .head_object()
            .bucket(&file.bucket)
            .key(&file.key)
            .send()
            .await;

        match head {
            Ok(response) => Ok(Some(Scanned {
                md5: response
                    .e_tag()
                    .map(unquote_etag)
                    .unwrap_or_default(),
                size: response.content_length().unwrap_or(0).max(0) as u64,
                mime_type: mime_for_name(&file.key),
                file: file.clone(),
            })),
            Err(err) => {
                let not_found = err
                    .as_service_error()
                    .map(|service_err| service_err.is_not_found())
                    .unwrap_or(false);
                if not_found {
                    Ok(None)
                } else {
                    Err(StorageError::HeadError(
                        file.location_string(),
                        err.to_string(),
                    ))
                }
            }
        }
    }

    /// Paginated recursive listing under the key as a prefix. Each page is
    /// one `ListObjectsV2` call; the continuation token threads the calls
    /// together and pseudo-directory markers (keys ending in `/`) are
    /// filtered out.
    pub fn list(&self, folder: &S3File) -> PageStream<ScannedS3File> {
        let state = ListState {
            client: self.client.clone(),
            bucket: folder.bucket.clone(),
            prefix: folder.key.clone(),
            max_keys: self.max_keys_per_page,
            token: None,
            done: false,
        };

        Box::pin(futures::stream::try_unfold(state, |mut state| async move {
            if state.done {
                return Ok(None);
            }

            let mut request = state
                .client
                .list_objects_v2()
                .bucket(&state.bucket)
                .prefix(&state.prefix)
                .max_keys(state.max_keys);
            if let Some(token) = &state.token {
                request = request.continuation_token(token);
            }

            let response = request.send().await.map_err(|err| {
                StorageError::ListError(
                    format!("s3://{}/{}", state.bucket, state.prefix),
                    err.to_string(),
                )
            })?;

            state.token = response
                .next_continuation_token()
                .map(str::to_string);
            state.done = state.token.is_none();

            let page = response
                .contents
                .unwrap_or_default()
                .into_iter()
                .filter_map(|object| object_to_scanned(&state.bucket, object))
                .collect();

            Ok(Some((page, state)))
        }))
    }

    /// Single GET of the full object body.
    pub async fn read(&self, file: &ScannedS3File) -> Result<Bytes, StorageError> {
        let location = file.file.location_string();
        let response = self
            .client
            .get_object()
            .bucket(&file.file.bucket)
            .key(&file.file.key)
            .send()
            .await
            .map_err(|err| StorageError::DownloadError(location.clone(), err.to_string()))?;

        let body = response
            .body
            .collect()
            .await
            .map_err(|err| StorageError::DownloadError(location, err.to_string()))?;
        Ok(body.into_bytes())
    }

    /// Upload with MIME inference from the destination key; bodies above the
    /// configured part size go through multipart upload with a progress event
    /// per part.
    pub async fn write(
        &self,
        request: WriteRequest<S3File>,
        options: &WriteOptions,
    ) -> Result<(), StorageError> {
        let destination = &request.destination;
        let location = destination.location_string();
        let content_type = mime_for_name(&destination.key)
            .unwrap_or_else(|| self.default_content_type.clone());
        let acl = options
            .make_public
            .then_some(ObjectCannedAcl::PublicRead);

        tracing::info!("Uploading {} bytes to {}", request.body.len(), location);

        if request.body.len() <= self.part_size {
            self.client
                .put_object()
                .bucket(&destination.bucket)
                .key(&destination.key)
                .content_type(&content_type)
                .set_acl(acl)
                .body(ByteStream::from(request.body.clone()))
                .send()
                .await
                .map_err(|err| StorageError::UploadError(location, err.to_string()))?;

            notify_progress(options, request.body.len() as u64, request.body.len() as u64);
            return Ok(());
        }

        self.write_multipart(&request, options, &content_type, acl)
            .await
    }

    async fn write_multipart(
        &self,
        request: &WriteRequest<S3File>,
        options: &WriteOptions,
        content_type: &str,
        acl: Option<ObjectCannedAcl>,
    ) -> Result<(), StorageError> {
        let destination = &request.destination;
        let location = destination.location_string();
        let total = request.body.len() as u64;

        let created = self
            .client
            .create_multipart_upload()
            .bucket(&destination.bucket)
            .key(&destination.key)
            .content_type(content_type)
            .set_acl(acl)
            .send()
            .await
            .map_err(|err| StorageError::UploadError(location.clone(), err.to_string()))?;
        let upload_id = created
            .upload_id()
            .ok_or_else(|| {
                StorageError::UploadError(location.clone(), "missing upload id".to_string())
            })?
            .to_string();

        let mut parts = Vec::new();
        let mut transferred = 0u64;
        let mut offset = 0usize;
        let mut part_number = 1i32;

        while offset < request.body.len() {
            let end = (offset + self.part_size).min(request.body.len());
            let chunk = request.body.slice(offset..end);
            let chunk_len = chunk.len() as u64;

            let uploaded = self
                .client
                .upload_part()
                .bucket(&destination.bucket)
                .key(&destination.key)
                .upload_id(&upload_id)
                .part_number(part_number)
                .body(ByteStream::from(chunk))
                .send()
                .await;

            let part = match uploaded {
                Ok(part) => part,
                Err(err) => {
                    self.abort_multipart(destination, &upload_id).await;
                    return Err(StorageError::UploadError(location, err.to_string()));
                }
            };

            parts.push(
                CompletedPart::builder()
                    .set_e_tag(part.e_tag)
                    .part_number(part_number)
                    .build(),
            );
            transferred += chunk_len;
            notify_progress(options, transferred, total);
            part_number += 1;
            offset = end;
        }

        let completed = CompletedMultipartUpload::builder()
            .set_parts(Some(parts))
            .build();
        let completion = self
            .client
            .complete_multipart_upload()
            .bucket(&destination.bucket)
            .key(&destination.key)
            .upload_id(&upload_id)
            .multipart_upload(completed)
            .send()
            .await;
        if let Err(err) = completion {
            self.abort_multipart(destination, &upload_id).await;
            return Err(StorageError::UploadError(location, err.to_string()));
        }

        Ok(())
    }

    async fn abort_multipart(&self, destination: &S3File, upload_id: &str) {
        let aborted = self
            .client
            .abort_multipart_upload()
            .bucket(&destination.bucket)
            .key(&destination.key)
            .upload_id(upload_id)
            .send()
            .await;
        if let Err(err) = aborted {
            tracing::warn!(
                "Failed to abort multipart upload for {}: {}",
                destination.location_string(),
                err
            );
        }
    }

    /// Server-side copy; no object bytes pass through this process.
    pub async fn copy(
        &self,
        source: &ScannedS3File,
        destination: &S3File,
        options: &WriteOptions,
    ) -> Result<(), StorageError> {
        let acl = options
            .make_public
            .then_some(ObjectCannedAcl::PublicRead);

        self.client
            .copy_object()
            .copy_source(format!("{}/{}", source.file.bucket, source.file.key))
            .bucket(&destination.bucket)
            .key(&destination.key)
            .set_acl(acl)
            .send()
            .await
            .map_err(|err| {
                StorageError::CopyError(
                    source.file.location_string(),
                    destination.location_string(),
                    err.to_string(),
                )
            })?;
        Ok(())
    }

    pub async fn delete(&self, file: &ScannedS3File) -> Result<(), StorageError> {
        self.client
            .delete_object()
            .bucket(&file.file.bucket)
            .key(&file.file.key)
            .send()
            .await
            .map_err(|err| {
                StorageError::DeleteError(file.file.location_string(), err.to_string())
            })?;
        tracing::info!("Deleted {}", file.file.location_string());
        Ok(())
    }

    /// Scan first; an absent object yields `None`, an existing one a
    /// time-limited presigned GET URL.
    pub async fn read_url(
        &self,
        file: &S3File,
        expiry: Option<Duration>,
    ) -> Result<Option<String>, StorageError> {
        match self.scan(file).await? {
            Some(scanned) => Ok(Some(self.read_url_for(&scanned, expiry).await?)),
            None => Ok(None),
        }
    }

    /// Presign a GET for a file already known to exist.
    pub async fn read_url_for(
        &self,
        file: &ScannedS3File,
        expiry: Option<Duration>,
    ) -> Result<String, StorageError> {
        let location = file.file.location_string();
        let presigning = PresigningConfig::expires_in(expiry.unwrap_or(self.link_expiry))
            .map_err(|err| StorageError::PresignError(location.clone(), err.to_string()))?;

        let presigned = self
            .client
            .get_object()
            .bucket(&file.file.bucket)
            .key(&file.file.key)
            .presigned(presigning)
            .await
            .map_err(|err| StorageError::PresignError(location, err.to_string()))?;
        Ok(presigned.uri().to_string())
    }

    /// Block until the object is observable, using the SDK waiter and the
    /// configured maximum wait.
    pub async fn wait_for_existence(&self, file: &S3File) -> Result<(), StorageError> {
        self.client
            .wait_until_object_exists()
            .bucket(&file.bucket)
            .key(&file.key)
            .wait(self.wait_timeout)
            .await
            .map_err(|err| {
                StorageError::WaitError(file.location_string(), err.to_string())
            })?;
        Ok(())
    }
}

struct ListState {
    client: Client,
    bucket: String,
    prefix: String,
    max_keys: i32,
    token: Option<String>,
    done: bool,
}

fn notify_progress(options: &WriteOptions, transferred: u64, total: u64) {
    if let Some(listener) = &options.progress {
        listener.on_progress(&TransferProgress { transferred, total });
    }
}

/// A listing entry becomes a scanned file; pseudo-directory markers and
/// keyless entries are dropped.
fn object_to_scanned(bucket: &str, object: Object) -> Option<ScannedS3File> {
    let key = object.key?;
    if key.ends_with('/') {
        return None;
    }
    Some(Scanned {
        md5: object
            .e_tag
            .as_deref()
            .map(unquote_etag)
            .unwrap_or_default(),
        size: object.size.unwrap_or(0).max(0) as u64,
        mime_type: mime_for_name(&key),
        file: S3File::new(bucket, key),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_to_scanned() {
        let object = Object::builder()
            .key("data/file.txt")
            .e_tag("\"0b26e313ed4a7ca6904b0e9369e5b957\"")
            .size(19)
            .build();

        let scanned = object_to_scanned("bucket", object).unwrap();
        assert_eq!(scanned.file, S3File::new("bucket", "data/file.txt"));
        assert_eq!(scanned.md5, "0b26e313ed4a7ca6904b0e9369e5b957");
        assert_eq!(scanned.size, 19);
        assert_eq!(scanned.mime_type, Some("text/plain".to_string()));
    }

    #[test]
    fn test_object_to_scanned_filters_directory_markers() {
        let marker = Object::builder().key("data/folder/").size(0).build();
        assert!(object_to_scanned("bucket", marker).is_none());

        let keyless = Object::builder().size(1).build();
        assert!(object_to_scanned("bucket", keyless).is_none());
    }

    // Exercising the network paths requires S3 or MinIO; see the ignored
    // integration tests in the workspace root `tests/` directory.
}
