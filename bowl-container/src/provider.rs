//! Provider trait — a module of related service registrations.
//!
//! Providers group related services together so an application can be
//! assembled from small, independently testable pieces.
//!
//! # Examples
//! ```rust
//! use bowl_container::prelude::*;
//!
//! struct MailProvider;
//!
//! impl ServiceProvider for MailProvider {
//!     fn register(&self, bowl: &mut Container) {
//!         bowl.set_parameter("mail.from", "noreply@example.com");
//!         bowl.share("mail.transport", |_| Ok(String::from("smtp")));
//!     }
//! }
//!
//! let mut bowl = Container::new();
//! bowl.register_provider(&MailProvider);
//! assert!(bowl.has("mail.transport"));
//! ```

use crate::container::Container;

/// A module that registers related services into a container.
///
/// ```rust,ignore
/// bowl.register_provider(&DatabaseProvider)
///     .register_provider(&MailProvider)
///     .register_provider(&HttpProvider);
/// ```
pub trait ServiceProvider: Send + Sync {
    /// Register services, tags, parameters or environments.
    fn register(&self, container: &mut Container);

    /// Optional: human-readable name for log output.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
