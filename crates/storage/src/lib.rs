mod errors;
mod local;
mod pages;
mod s3;

pub use errors::StorageError;
pub use local::LocalAdapter;
pub use pages::{collect_all, mime_for_name, PageStream};
pub use s3::S3Adapter;
