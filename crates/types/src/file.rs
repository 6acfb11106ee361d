use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// A file on the local filesystem, addressed by path. Existence is unknown
/// until the file is scanned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocalFile {
    pub path: PathBuf,
}

impl LocalFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn location_string(&self) -> String {
        self.path.display().to_string()
    }
}

/// An object in an S3 bucket, addressed by bucket + key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct S3File {
    pub bucket: String,
    pub key: String,
}

impl S3File {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Same bucket, different key.
    pub fn with_key(&self, key: impl Into<String>) -> Self {
        Self {
            bucket: self.bucket.clone(),
            key: key.into(),
        }
    }

    pub fn location_string(&self) -> String {
        format!("s3://{}/{}", self.bucket, self.key)
    }
}

#[derive(Error, Debug)]
pub enum LocationParseError {
    #[error("Invalid S3 location '{0}': expected s3://bucket/key")]
    InvalidS3Location(String),
}

/// A file reference that is either local or remote. The two variants are the
/// only storage kinds; every operation handles both.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnyFile {
    Local(LocalFile),
    S3(S3File),
}

impl AnyFile {
    pub fn local(path: impl Into<PathBuf>) -> Self {
        AnyFile::Local(LocalFile::new(path))
    }

    pub fn s3(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        AnyFile::S3(S3File::new(bucket, key))
    }

    /// Parse a location string: `s3://bucket/key` is remote, anything else is
    /// a local path.
    pub fn parse(location: &str) -> Result<Self, LocationParseError> {
        match location.strip_prefix("s3://") {
            Some(rest) => {
                let (bucket, key) = rest
                    .split_once('/')
                    .filter(|(bucket, key)| !bucket.is_empty() && !key.is_empty())
                    .ok_or_else(|| LocationParseError::InvalidS3Location(location.to_string()))?;
                Ok(AnyFile::s3(bucket, key))
            }
            None => Ok(AnyFile::local(location)),
        }
    }

    /// Exhaustive dispatch over the two storage kinds. Every operation routes
    /// through a single fold so a new variant cannot silently go unhandled.
    pub fn fold<T>(
        &self,
        local: impl FnOnce(&LocalFile) -> T,
        remote: impl FnOnce(&S3File) -> T,
    ) -> T {
        match self {
            AnyFile::Local(file) => local(file),
            AnyFile::S3(file) => remote(file),
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, AnyFile::S3(_))
    }

    /// The raw addressing key: the object key for S3, the path for local files.
    pub fn raw_key(&self) -> String {
        self.fold(|f| f.path.display().to_string(), |f| f.key.clone())
    }

    pub fn location_string(&self) -> String {
        self.fold(LocalFile::location_string, S3File::location_string)
    }
}

impl From<LocalFile> for AnyFile {
    fn from(file: LocalFile) -> Self {
        AnyFile::Local(file)
    }
}

impl From<S3File> for AnyFile {
    fn from(file: S3File) -> Self {
        AnyFile::S3(file)
    }
}

impl fmt::Display for AnyFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.location_string())
    }
}

/// A reference enriched with identity metadata by a scan or listing. The
/// metadata is a snapshot; it goes stale as soon as the underlying storage
/// changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scanned<F> {
    pub file: F,
    /// Hex-encoded MD5 of the content.
    pub md5: String,
    pub size: u64,
    /// MIME type inferred from the file name extension.
    pub mime_type: Option<String>,
}

pub type ScannedLocalFile = Scanned<LocalFile>;
pub type ScannedS3File = Scanned<S3File>;
pub type ScannedAnyFile = Scanned<AnyFile>;

impl<F> Scanned<F> {
    /// Re-address the same identity metadata, e.g. lifting a backend-specific
    /// reference into `AnyFile`.
    pub fn map_file<G>(self, f: impl FnOnce(F) -> G) -> Scanned<G> {
        Scanned {
            file: f(self.file),
            md5: self.md5,
            size: self.size,
            mime_type: self.mime_type,
        }
    }
}

impl Scanned<LocalFile> {
    pub fn into_any(self) -> ScannedAnyFile {
        self.map_file(AnyFile::Local)
    }
}

impl Scanned<S3File> {
    pub fn into_any(self) -> ScannedAnyFile {
        self.map_file(AnyFile::S3)
    }
}

/// A scanned reference split back into its backend-specific form, so adapter
/// calls get the concrete reference type. The inverse of
/// [`Scanned::into_any`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScannedFile {
    Local(ScannedLocalFile),
    S3(ScannedS3File),
}

impl Scanned<AnyFile> {
    pub fn transpose(self) -> ScannedFile {
        let Scanned {
            file,
            md5,
            size,
            mime_type,
        } = self;
        match file {
            AnyFile::Local(file) => ScannedFile::Local(Scanned {
                file,
                md5,
                size,
                mime_type,
            }),
            AnyFile::S3(file) => ScannedFile::S3(Scanned {
                file,
                md5,
                size,
                mime_type,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_s3_location() {
        let file = AnyFile::parse("s3://my-bucket/path/to/file.txt").unwrap();
        assert_eq!(file, AnyFile::s3("my-bucket", "path/to/file.txt"));
        assert!(file.is_remote());
    }

    #[test]
    fn test_parse_local_location() {
        let file = AnyFile::parse("/data/file.txt").unwrap();
        assert_eq!(file, AnyFile::local("/data/file.txt"));
        assert!(!file.is_remote());
    }

    #[test]
    fn test_parse_s3_location_without_key() {
        assert!(AnyFile::parse("s3://my-bucket").is_err());
        assert!(AnyFile::parse("s3://").is_err());
    }

    #[test]
    fn test_location_string_round_trip() {
        let location = "s3://bucket/a/b/c.json";
        let file = AnyFile::parse(location).unwrap();
        assert_eq!(file.location_string(), location);
        assert_eq!(file.to_string(), location);
    }

    #[test]
    fn test_fold_dispatches_once() {
        let local = AnyFile::local("/tmp/x");
        let remote = AnyFile::s3("b", "k");
        assert_eq!(local.fold(|_| "local", |_| "remote"), "local");
        assert_eq!(remote.fold(|_| "local", |_| "remote"), "remote");
    }

    #[test]
    fn test_scanned_map_file() {
        let scanned = Scanned {
            file: S3File::new("b", "k.txt"),
            md5: "abc".to_string(),
            size: 3,
            mime_type: Some("text/plain".to_string()),
        };
        let any = scanned.clone().into_any();
        assert_eq!(any.file, AnyFile::S3(scanned.file));
        assert_eq!(any.md5, "abc");
        assert_eq!(any.size, 3);
    }
}
