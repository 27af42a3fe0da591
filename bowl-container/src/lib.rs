//! Core container implementation for Bowl.

pub mod container;
mod environment;
pub mod error;
pub mod lifecycle;
pub mod parameters;
pub mod provider;
mod registry;
pub mod service;
pub mod tagged;

pub use container::{Container, prelude};
pub use error::{BowlError, Result};
pub use lifecycle::Lifecycle;
pub use service::{Instance, Producer, Service};
