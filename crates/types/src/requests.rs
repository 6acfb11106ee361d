use crate::Scanned;
use bytes::Bytes;

/// A body destined for a file reference. The destination may or may not
/// already exist; write policy decides what happens when it does.
#[derive(Debug, Clone)]
pub struct WriteRequest<F> {
    pub destination: F,
    pub body: Bytes,
}

impl<F> WriteRequest<F> {
    pub fn new(destination: F, body: impl Into<Bytes>) -> Self {
        Self {
            destination,
            body: body.into(),
        }
    }
}

/// A copy of everything under `source` (a single file or a folder/prefix)
/// to `destination`. Both sides are bare references.
#[derive(Debug, Clone)]
pub struct CopyRequest<A, B> {
    pub source: A,
    pub destination: B,
}

impl<A, B> CopyRequest<A, B> {
    pub fn new(source: A, destination: B) -> Self {
        Self {
            source,
            destination,
        }
    }
}

/// A single-file copy. The source came from a scan or listing, so it is
/// known to exist; the destination's existence is unknown.
#[derive(Debug, Clone)]
pub struct CopyOperation<A, B> {
    pub source: Scanned<A>,
    pub destination: B,
}

impl<A, B> CopyOperation<A, B> {
    pub fn new(source: Scanned<A>, destination: B) -> Self {
        Self {
            source,
            destination,
        }
    }
}
