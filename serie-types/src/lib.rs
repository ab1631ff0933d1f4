//! Shared data transfer objects and configuration primitives for the `serie` workspace.
#![warn(missing_docs)]

mod capability;
mod config;
mod connector;
/// Unified error type shared by every crate in the workspace.
pub mod error;

pub use capability::Capability;
pub use config::{Frequency, Horizon, SerieConfig};
pub use connector::ConnectorKey;
pub use error::SerieError;
