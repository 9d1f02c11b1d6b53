pub use interval::{Interval, IntervalOp};
pub use locus::{Contig, Locus};

mod interval;
mod locus;
