use super::defaults::DEFAULT_CONFIG_TEMPLATE;
use super::errors::ConfigError;
use super::models::Config;
use std::path::Path;

impl Config {
    /// Loads configuration from a file, writing a commented default template
    /// first if the file does not exist yet.
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            create_default_config(path).await?;
        }

        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;

        Ok(config)
    }
}

/// Creates a default configuration file
async fn create_default_config<P: AsRef<Path>>(path: P) -> Result<(), ConfigError> {
    tokio::fs::write(path, DEFAULT_CONFIG_TEMPLATE).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_yields_written_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("unifile.toml");

        let config = Config::from_file(&path).await.unwrap();
        assert!(path.exists());
        assert_eq!(config.s3.region, "us-east-1");
        assert_eq!(config.s3.max_list_keys_per_page, 1000);
        assert_eq!(config.local.poll_period_ms, 100);
        assert_eq!(config.transfer.default_content_type, "application/octet-stream");
    }

    #[tokio::test]
    async fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("unifile.toml");
        tokio::fs::write(
            &path,
            "[s3]\nregion = \"eu-west-2\"\n\n[local]\npoll_period_ms = 25\n",
        )
        .await
        .unwrap();

        let config = Config::from_file(&path).await.unwrap();
        assert_eq!(config.s3.region, "eu-west-2");
        assert_eq!(config.s3.link_expiry_secs, 3600);
        assert_eq!(config.local.poll_period_ms, 25);
    }

    #[tokio::test]
    async fn test_invalid_toml_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("unifile.toml");
        tokio::fs::write(&path, "not [valid toml").await.unwrap();

        let result = Config::from_file(&path).await;
        assert!(matches!(result, Err(ConfigError::TomlParseError(_))));
    }
}
