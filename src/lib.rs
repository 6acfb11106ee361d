// Re-export all public APIs from the workspace crates

pub use unifile_config::*;
pub use unifile_service::*;
pub use unifile_storage::*;
pub use unifile_types::*;
pub use unifile_utils::*;

/// Prelude module for convenient imports
pub mod prelude {
    // File identity model
    pub use unifile_types::{
        AnyFile, CopyOperation, CopyRequest, LocalFile, S3File, Scanned, ScannedAnyFile,
        ScannedFile, ScannedLocalFile, ScannedS3File, WriteOptions, WriteRequest,
    };

    // Progress reporting
    pub use unifile_types::{ProgressListener, TransferProgress};

    // The unified service
    pub use unifile_service::{FileService, ServiceError};

    // Backend adapters
    pub use unifile_storage::{collect_all, LocalAdapter, PageStream, S3Adapter, StorageError};

    // Configuration
    pub use unifile_config::Config;
}
