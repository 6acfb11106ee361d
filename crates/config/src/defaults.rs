/// Default values for configuration fields

pub fn s3_region() -> String {
    "us-east-1".to_string()
}

pub fn link_expiry_secs() -> u64 {
    3600 // presigned links live one hour unless asked otherwise
}

pub fn wait_timeout_secs() -> u64 {
    120
}

pub fn max_list_keys_per_page() -> i32 {
    1000
}

pub fn poll_period_ms() -> u64 {
    100
}

pub fn multipart_part_size_mb() -> u64 {
    8
}

pub fn default_content_type() -> String {
    "application/octet-stream".to_string()
}

pub fn s3_settings() -> super::models::S3Settings {
    super::models::S3Settings {
        region: s3_region(),
        endpoint_url: None,
        access_key_id: None,
        secret_access_key: None,
        force_path_style: false,
        link_expiry_secs: link_expiry_secs(),
        wait_timeout_secs: wait_timeout_secs(),
        max_list_keys_per_page: max_list_keys_per_page(),
    }
}

pub fn local_settings() -> super::models::LocalSettings {
    super::models::LocalSettings {
        poll_period_ms: poll_period_ms(),
    }
}

pub fn transfer_settings() -> super::models::TransferSettings {
    super::models::TransferSettings {
        multipart_part_size_mb: multipart_part_size_mb(),
        default_content_type: default_content_type(),
    }
}

pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# ===============================================================================
# unifile configuration
# ===============================================================================

[s3]
region = "us-east-1"                 # AWS region (or "auto" for R2-style services)
#endpoint_url = ""                   # Custom endpoint for MinIO/R2/Spaces
#access_key_id = ""                  # Explicit credentials (falls back to the AWS
#secret_access_key = ""              # default provider chain when omitted)
force_path_style = false             # Required by most S3-compatible emulators
link_expiry_secs = 3600              # Presigned read-link lifetime
wait_timeout_secs = 120              # Max wait for object-exists polling
max_list_keys_per_page = 1000        # Page size for prefix listings

[local]
poll_period_ms = 100                 # Existence-poll interval for local files

[transfer]
multipart_part_size_mb = 8           # Bodies above this size upload in parts
default_content_type = "application/octet-stream"
"#;
