pub mod backend;
pub mod compression;
pub mod cov;
pub mod mock;
pub mod remote;
mod traits;

pub use traits::{ReadRecord, WriteRecord};
