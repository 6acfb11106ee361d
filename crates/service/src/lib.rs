mod copy;
mod errors;
mod service;

pub use errors::ServiceError;
pub use service::FileService;
