use crate::StorageError;
use futures::stream::BoxStream;
use futures::TryStreamExt;

/// A lazy, single-pass sequence of listing pages. Each page is fetched when
/// pulled; dropping the stream stops further fetches.
pub type PageStream<T> = BoxStream<'static, Result<Vec<T>, StorageError>>;

/// Drain a page stream into one flat vector. Convenience for callers (and
/// tests) that do not need page-at-a-time processing.
pub async fn collect_all<T>(mut pages: PageStream<T>) -> Result<Vec<T>, StorageError> {
    let mut all = Vec::new();
    while let Some(page) = pages.try_next().await? {
        all.extend(page);
    }
    Ok(all)
}

/// MIME type inferred purely from the file name extension, independent of
/// content.
pub fn mime_for_name(name: &str) -> Option<String> {
    mime_guess::from_path(name).first_raw().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_for_name() {
        assert_eq!(mime_for_name("a/b/c.txt"), Some("text/plain".to_string()));
        assert_eq!(mime_for_name("photo.JPG"), Some("image/jpeg".to_string()));
        assert_eq!(mime_for_name("no-extension"), None);
    }
}
