pub mod checksum;
pub mod errors;
pub mod keys;

pub use checksum::*;
pub use errors::*;
pub use keys::*;
