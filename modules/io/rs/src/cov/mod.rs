//! Plain-text per-base coverage: one `"<position>: <count>"` record per line.

pub use reader::Reader;
pub use record::Record;
pub use writer::Writer;

mod reader;
mod record;
mod writer;
