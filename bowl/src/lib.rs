//! # Bowl — a tiny named-service container
//!
//! Register producers under string names, resolve them lazily as shared
//! singletons or per-call factories, group them by tag, decorate them with
//! `extend`, and overlay named environments on activation.
//!
//! ```rust
//! use bowl::prelude::*;
//!
//! let mut bowl = Container::new();
//! bowl.share("config.dsn", |_| Ok(String::from("sqlite::memory:")));
//! bowl.configure("test", |env| {
//!     env.set_parameter("debug", true);
//! });
//! bowl.env("test").unwrap();
//!
//! assert!(*bowl.parameter::<bool>("debug").unwrap());
//! ```

pub use bowl_container::*;
pub use bowl_support::*;
