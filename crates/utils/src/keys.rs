use std::path::{PathBuf, MAIN_SEPARATOR, MAIN_SEPARATOR_STR};

/// Rewrite a key or path into S3 address space: forward-slash separators and
/// no leading slash. Applying it to an already-correct key is a no-op.
pub fn to_s3_key(input: &str) -> String {
    let forward = input.replace(MAIN_SEPARATOR, "/");
    forward.trim_start_matches('/').to_string()
}

/// Rewrite a key into local address space: native path separators.
/// Idempotent, like [`to_s3_key`].
pub fn to_local_path(input: &str) -> PathBuf {
    PathBuf::from(input.replace('/', MAIN_SEPARATOR_STR))
}

/// S3 ETags arrive wrapped in quotes (`"0b26e3..."`); strip them.
pub fn unquote_etag(etag: &str) -> String {
    etag.trim_matches('"').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_s3_key_strips_leading_slash() {
        assert_eq!(to_s3_key("/data/file.txt"), "data/file.txt");
    }

    #[test]
    fn test_to_s3_key_idempotent() {
        let key = to_s3_key("/data/nested/file.txt");
        assert_eq!(to_s3_key(&key), key);
    }

    #[cfg(windows)]
    #[test]
    fn test_to_s3_key_rewrites_separators() {
        assert_eq!(to_s3_key("data\\nested\\file.txt"), "data/nested/file.txt");
    }

    #[test]
    fn test_to_local_path_idempotent() {
        let path = to_local_path("data/nested/file.txt");
        assert_eq!(to_local_path(&path.display().to_string()), path);
    }

    #[test]
    fn test_unquote_etag() {
        assert_eq!(
            unquote_etag("\"0b26e313ed4a7ca6904b0e9369e5b957\""),
            "0b26e313ed4a7ca6904b0e9369e5b957"
        );
        // Already unquoted tags pass through.
        assert_eq!(unquote_etag("abc"), "abc");
    }
}
