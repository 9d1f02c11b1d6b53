pub mod loc;
pub mod num;
pub mod parallelism;
pub mod source;
