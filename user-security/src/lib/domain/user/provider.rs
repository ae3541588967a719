use std::sync::Arc;

use async_trait::async_trait;

use crate::user::errors::SecurityError;
use crate::user::ports::SecurityUser;
use crate::user::ports::UserManager;
use crate::user::ports::UserProviderPort;

/// Adapter from the authentication pipeline to a `UserManager`.
///
/// Stateless; every call is an independent lookup against the manager.
pub struct UserProvider<UM>
where
    UM: UserManager,
{
    user_manager: Arc<UM>,
}

impl<UM> UserProvider<UM>
where
    UM: UserManager,
{
    /// Create a new provider bound to a user manager.
    ///
    /// # Arguments
    /// * `user_manager` - Manager performing the store lookups
    ///
    /// # Returns
    /// Configured provider instance
    pub fn new(user_manager: Arc<UM>) -> Self {
        Self { user_manager }
    }
}

impl<UM> Clone for UserProvider<UM>
where
    UM: UserManager,
{
    fn clone(&self) -> Self {
        Self {
            user_manager: Arc::clone(&self.user_manager),
        }
    }
}

#[async_trait]
impl<UM> UserProviderPort for UserProvider<UM>
where
    UM: UserManager,
{
    type User = UM::User;

    async fn load_user_by_username(&self, identifier: &str) -> Result<UM::User, SecurityError> {
        tracing::debug!(identifier = %identifier, "Loading user");

        match self
            .user_manager
            .find_by_email_or_username(identifier)
            .await?
        {
            Some(user) => Ok(user),
            None => {
                tracing::warn!(identifier = %identifier, "User not found");
                Err(SecurityError::UserNotFound(identifier.to_string()))
            }
        }
    }

    async fn refresh_user(&self, user: &dyn SecurityUser) -> Result<UM::User, SecurityError> {
        let class_name = user.class_name();

        if !self.supports_class(class_name) {
            tracing::warn!(
                class = %class_name,
                expected = %self.user_manager.class_name(),
                "Unsupported user class"
            );
            return Err(SecurityError::UnsupportedUserType(class_name.to_string()));
        }

        self.load_user_by_username(user.username()).await
    }

    fn supports_class(&self, class_name: &str) -> bool {
        class_name == self.user_manager.class_name()
    }
}
