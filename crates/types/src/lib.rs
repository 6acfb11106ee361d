mod file;
mod options;
mod requests;

pub use file::*;
pub use options::*;
pub use requests::*;
