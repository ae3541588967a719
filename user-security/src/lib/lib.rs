//! User lookup and role model for authentication pipelines
//!
//! Provides the principal abstraction an authentication pipeline works with:
//! - `User` entity with a data-driven role enumeration and generated salt
//! - `UserManager` contract for storage-backed lookups
//! - `UserProvider` adapting a manager to load, refresh and type checks
//!
//! Password encoding, sessions and credential verification stay with the host.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use user_security::user::models::{User, UserType, ROLE_ADMIN};
//! use user_security::user::ports::SecurityUser;
//!
//! let mut user = User::with_default_role(Arc::new(UserType::new("Account"))).unwrap();
//! user.set_username("alice").set_email("a@x.com").set_enabled(true);
//! user.set_role(ROLE_ADMIN).unwrap();
//!
//! assert_eq!(user.roles().len(), 2);
//! assert!(user.set_role("ROLE_ROOT").is_err());
//! ```

pub mod config;
pub mod domain;
pub mod outbound;

pub use domain::user;
pub use outbound::managers;

// Re-export commonly used items
pub use domain::user::errors::ConfigurationError;
pub use domain::user::errors::SecurityError;
pub use domain::user::models::User;
pub use domain::user::models::UserType;
pub use domain::user::ports::SecurityUser;
pub use domain::user::ports::UserManager;
pub use domain::user::ports::UserProviderPort;
pub use domain::user::provider::UserProvider;
