use std::fmt;
use std::sync::Arc;

/// Byte counts for an in-flight transfer. `transferred` only ever grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferProgress {
    pub transferred: u64,
    pub total: u64,
}

/// Callback for upload progress events.
pub trait ProgressListener: Send + Sync {
    fn on_progress(&self, progress: &TransferProgress);
}

impl<F> ProgressListener for F
where
    F: Fn(&TransferProgress) + Send + Sync,
{
    fn on_progress(&self, progress: &TransferProgress) {
        self(progress)
    }
}

/// Cross-cutting write/copy policy, applied before backend dispatch.
#[derive(Clone)]
pub struct WriteOptions {
    /// Allow replacing an existing destination. When false and the
    /// destination exists, the write fails before any I/O.
    pub overwrite: bool,
    /// Skip the transfer entirely when source and destination content hashes
    /// match. Checked before the overwrite precondition.
    pub skip_same: bool,
    /// Apply a public-read ACL to uploaded objects (remote backend only).
    pub make_public: bool,
    /// Invoked with upload progress events as they occur.
    pub progress: Option<Arc<dyn ProgressListener>>,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            overwrite: true,
            skip_same: false,
            make_public: false,
            progress: None,
        }
    }
}

// Spelled out because the progress listener is a trait object.
impl fmt::Debug for WriteOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriteOptions")
            .field("overwrite", &self.overwrite)
            .field("skip_same", &self.skip_same)
            .field("make_public", &self.make_public)
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    #[test]
    fn test_default_options() {
        let options = WriteOptions::default();
        assert!(options.overwrite);
        assert!(!options.skip_same);
        assert!(!options.make_public);
        assert!(options.progress.is_none());
    }

    #[test]
    fn test_closure_listener() {
        let seen = Arc::new(AtomicU64::new(0));
        let captured = Arc::clone(&seen);
        let listener: Arc<dyn ProgressListener> = Arc::new(move |p: &TransferProgress| {
            captured.store(p.transferred, Ordering::SeqCst);
        });
        listener.on_progress(&TransferProgress {
            transferred: 42,
            total: 100,
        });
        assert_eq!(seen.load(Ordering::SeqCst), 42);
    }
}
