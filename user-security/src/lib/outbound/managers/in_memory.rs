use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::user::errors::SecurityError;
use crate::user::models::User;
use crate::user::models::UserType;
use crate::user::ports::SecurityUser;
use crate::user::ports::UserManager;

/// User manager backed by an in-process map keyed by username.
///
/// Lookup precedence: an exact username match wins over an email match.
/// When several records share an email, the lexicographically smallest
/// username is returned.
#[derive(Debug, Clone)]
pub struct InMemoryUserManager {
    user_type: Arc<UserType>,
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserManager {
    pub fn new(user_type: Arc<UserType>) -> Self {
        Self {
            user_type,
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn user_type(&self) -> &Arc<UserType> {
        &self.user_type
    }

    /// Store a user, replacing any record with the same username.
    ///
    /// # Returns
    /// The replaced record, if any
    ///
    /// # Errors
    /// * `UnsupportedUserType` - User type (name or valid roles) differs from the manager's
    pub async fn insert(&self, user: User) -> Result<Option<User>, SecurityError> {
        if user.user_type().as_ref() != self.user_type.as_ref() {
            return Err(SecurityError::UnsupportedUserType(
                user.class_name().to_string(),
            ));
        }

        let replaced = self
            .users
            .write()
            .await
            .insert(user.username().to_string(), user);

        Ok(replaced)
    }

    /// Remove a user by username.
    pub async fn remove(&self, username: &str) -> Option<User> {
        self.users.write().await.remove(username)
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserManager for InMemoryUserManager {
    type User = User;

    async fn find_by_email_or_username(
        &self,
        identifier: &str,
    ) -> Result<Option<User>, SecurityError> {
        let users = self.users.read().await;

        if let Some(user) = users.get(identifier) {
            return Ok(Some(user.clone()));
        }

        let by_email = users
            .values()
            .filter(|user| user.email() == identifier)
            .min_by(|a, b| a.username().cmp(b.username()))
            .cloned();

        Ok(by_email)
    }

    fn class_name(&self) -> &str {
        self.user_type.name()
    }
}
