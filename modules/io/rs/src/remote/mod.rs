//! Read source backed by a JSON `reads/search` endpoint.

pub use config::RemoteConfig;
pub use source::RemoteReadSource;

mod config;
mod source;
mod wire;
