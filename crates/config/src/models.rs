use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub s3: S3Settings,
    #[serde(default)]
    pub local: LocalSettings,
    #[serde(default)]
    pub transfer: TransferSettings,
}

/// Connection and paging settings for the remote backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct S3Settings {
    #[serde(default = "super::defaults::s3_region")]
    pub region: String,
    /// Custom endpoint for S3-compatible services (MinIO, R2, ...).
    #[serde(default)]
    pub endpoint_url: Option<String>,
    #[serde(default)]
    pub access_key_id: Option<String>,
    #[serde(default)]
    pub secret_access_key: Option<String>,
    #[serde(default)]
    pub force_path_style: bool,
    #[serde(default = "super::defaults::link_expiry_secs")]
    pub link_expiry_secs: u64,
    #[serde(default = "super::defaults::wait_timeout_secs")]
    pub wait_timeout_secs: u64,
    #[serde(default = "super::defaults::max_list_keys_per_page")]
    pub max_list_keys_per_page: i32,
}

impl Default for S3Settings {
    fn default() -> Self {
        super::defaults::s3_settings()
    }
}

/// Local backend behavior.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LocalSettings {
    /// Interval between existence-poll checks.
    #[serde(default = "super::defaults::poll_period_ms")]
    pub poll_period_ms: u64,
}

impl Default for LocalSettings {
    fn default() -> Self {
        super::defaults::local_settings()
    }
}

/// Upload tuning shared by both backends.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TransferSettings {
    /// Bodies larger than this go through multipart upload.
    #[serde(default = "super::defaults::multipart_part_size_mb")]
    pub multipart_part_size_mb: u64,
    /// Used when the destination key has no recognizable extension.
    #[serde(default = "super::defaults::default_content_type")]
    pub default_content_type: String,
}

impl Default for TransferSettings {
    fn default() -> Self {
        super::defaults::transfer_settings()
    }
}
