use std::fmt;

use async_trait::async_trait;

use crate::user::errors::SecurityError;

/// Capabilities the authentication pipeline needs from a principal.
///
/// Combines identity and credential accessors, account-status predicates
/// and equality. A single enabled flag gates every status predicate.
pub trait SecurityUser: fmt::Debug + Send + Sync {
    /// Identifier of the concrete user type.
    fn class_name(&self) -> &str;

    fn username(&self) -> &str;

    fn email(&self) -> &str;

    /// Encoded password.
    fn password(&self) -> &str;

    /// Salt the password was encoded with.
    fn salt(&self) -> &str;

    /// Granted roles in insertion order.
    fn roles(&self) -> &[String];

    fn is_enabled(&self) -> bool;

    fn is_account_non_expired(&self) -> bool {
        self.is_enabled()
    }

    fn is_account_non_locked(&self) -> bool {
        self.is_enabled()
    }

    fn is_credentials_non_expired(&self) -> bool {
        self.is_enabled()
    }

    /// Drop transient plaintext secrets. Nothing is cached by default.
    fn erase_credentials(&mut self) {}

    /// Compare username, password and salt.
    ///
    /// Roles and the enabled flag do not take part in equality.
    fn is_equal_to(&self, other: &dyn SecurityUser) -> bool {
        self.username() == other.username()
            && self.password() == other.password()
            && self.salt() == other.salt()
    }
}

/// Storage-facing lookup of principals.
///
/// Implementations are shared between requests and must tolerate concurrent reads.
#[async_trait]
pub trait UserManager: Send + Sync + 'static {
    type User: SecurityUser + Clone;

    /// Retrieve a user by email address or username.
    ///
    /// When the identifier matches the username of one record and the email
    /// of another, the implementation decides which one wins and documents it.
    ///
    /// # Arguments
    /// * `identifier` - Username or email address
    ///
    /// # Returns
    /// Optional user (None if not found)
    ///
    /// # Errors
    /// * `Storage` - Store lookup failed
    async fn find_by_email_or_username(
        &self,
        identifier: &str,
    ) -> Result<Option<Self::User>, SecurityError>;

    /// Identifier of the user type this manager produces.
    fn class_name(&self) -> &str;
}

/// Lookup contract consumed by the host authentication pipeline.
#[async_trait]
pub trait UserProviderPort: Send + Sync + 'static {
    type User: SecurityUser;

    /// Load a user by username or email address.
    ///
    /// # Arguments
    /// * `identifier` - Username or email address, possibly empty
    ///
    /// # Returns
    /// User for credential verification
    ///
    /// # Errors
    /// * `UserNotFound` - No record matches the identifier
    /// * `Storage` - Store lookup failed
    async fn load_user_by_username(&self, identifier: &str) -> Result<Self::User, SecurityError>;

    /// Reload a possibly stale user by its username.
    ///
    /// # Arguments
    /// * `user` - Principal from an earlier authentication
    ///
    /// # Returns
    /// Fresh user from the store
    ///
    /// # Errors
    /// * `UnsupportedUserType` - User type is not the one produced by this provider
    /// * `UserNotFound` - User no longer exists
    /// * `Storage` - Store lookup failed
    async fn refresh_user(&self, user: &dyn SecurityUser) -> Result<Self::User, SecurityError>;

    /// Check whether this provider produces users of the given type.
    fn supports_class(&self, class_name: &str) -> bool;
}
