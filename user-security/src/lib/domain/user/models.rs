use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use sha2::Digest;
use sha2::Sha256;
use uuid::Uuid;

use crate::user::errors::SecurityError;
use crate::user::ports::SecurityUser;

/// Role granted to every registered user.
pub const ROLE_USER: &str = "ROLE_USER";

/// Role granted to administrators.
pub const ROLE_ADMIN: &str = "ROLE_ADMIN";

/// Descriptor of a concrete user type.
///
/// Carries the type identifier reported by a `UserManager` and the
/// enumeration of roles users of this type may hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserType {
    name: String,
    roles: Vec<String>,
}

impl UserType {
    /// Identifier of the default user type.
    pub const DEFAULT_NAME: &'static str = "User";

    /// Create a user type accepting `ROLE_USER` and `ROLE_ADMIN`.
    ///
    /// # Arguments
    /// * `name` - Type identifier compared by `supports_class`
    ///
    /// # Returns
    /// UserType with the default role enumeration
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            roles: vec![ROLE_USER.to_string(), ROLE_ADMIN.to_string()],
        }
    }

    /// Replace the valid-role enumeration.
    ///
    /// Duplicate entries are collapsed, first occurrence wins.
    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles.clear();
        for role in roles {
            let role = role.into();
            if !self.roles.contains(&role) {
                self.roles.push(role);
            }
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    pub fn is_valid_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

impl Default for UserType {
    fn default() -> Self {
        Self::new(Self::DEFAULT_NAME)
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.name.fmt(f)
    }
}

/// Authenticatable principal.
///
/// Holds identity fields, the encoded password with its salt, the granted
/// roles and the enabled flag. Users start disabled.
#[derive(Debug, Clone)]
pub struct User {
    user_type: Arc<UserType>,
    username: String,
    email: String,
    password: String,
    salt: String,
    roles: Vec<String>,
    enabled: bool,
}

impl User {
    /// Create a new user holding a single initial role.
    ///
    /// A fresh salt is generated for every user.
    ///
    /// # Arguments
    /// * `user_type` - Type descriptor providing the valid roles
    /// * `role` - Initial role
    ///
    /// # Returns
    /// Disabled user with empty identity fields
    ///
    /// # Errors
    /// * `InvalidRole` - Role is not declared by `user_type`
    pub fn new(user_type: Arc<UserType>, role: &str) -> Result<Self, SecurityError> {
        let mut user = Self {
            user_type,
            username: String::new(),
            email: String::new(),
            password: String::new(),
            salt: generate_salt(),
            roles: Vec::new(),
            enabled: false,
        };
        user.set_role(role)?;
        Ok(user)
    }

    /// Create a new user holding `ROLE_USER`.
    ///
    /// # Errors
    /// * `InvalidRole` - `user_type` does not declare `ROLE_USER`
    pub fn with_default_role(user_type: Arc<UserType>) -> Result<Self, SecurityError> {
        Self::new(user_type, ROLE_USER)
    }

    pub fn user_type(&self) -> &Arc<UserType> {
        &self.user_type
    }

    /// Grant a role.
    ///
    /// Granting a role the user already holds is a no-op.
    ///
    /// # Errors
    /// * `InvalidRole` - Role is not declared by the user type; roles are left unchanged
    pub fn set_role(&mut self, role: &str) -> Result<&mut Self, SecurityError> {
        if !self.user_type.is_valid_role(role) {
            return Err(SecurityError::InvalidRole(role.to_string()));
        }

        if !self.roles.iter().any(|r| r == role) {
            self.roles.push(role.to_string());
        }

        Ok(self)
    }

    /// Revoke a role.
    ///
    /// # Returns
    /// True if the role was held and has been removed
    pub fn remove_role(&mut self, role: &str) -> bool {
        match self.roles.iter().position(|r| r == role) {
            Some(position) => {
                self.roles.remove(position);
                true
            }
            None => false,
        }
    }

    pub fn set_username(&mut self, username: impl Into<String>) -> &mut Self {
        self.username = username.into();
        self
    }

    pub fn set_email(&mut self, email: impl Into<String>) -> &mut Self {
        self.email = email.into();
        self
    }

    /// Set the encoded password.
    pub fn set_password(&mut self, password: impl Into<String>) -> &mut Self {
        self.password = password.into();
        self
    }

    /// Overwrite the generated salt, e.g. when rehydrating from storage.
    pub fn set_salt(&mut self, salt: impl Into<String>) -> &mut Self {
        self.salt = salt.into();
        self
    }

    pub fn set_enabled(&mut self, enabled: bool) -> &mut Self {
        self.enabled = enabled;
        self
    }
}

impl SecurityUser for User {
    fn class_name(&self) -> &str {
        self.user_type.name()
    }

    fn username(&self) -> &str {
        &self.username
    }

    fn email(&self) -> &str {
        &self.email
    }

    fn password(&self) -> &str {
        &self.password
    }

    fn salt(&self) -> &str {
        &self.salt
    }

    fn roles(&self) -> &[String] {
        &self.roles
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// Generate a password salt.
///
/// SHA-256 over the current timestamp in nanoseconds and a random UUID,
/// as 64 lowercase hex characters.
pub fn generate_salt() -> String {
    let now = Utc::now();
    let seed = format!(
        "{}{}",
        now.timestamp_nanos_opt().unwrap_or_else(|| now.timestamp_micros()),
        Uuid::new_v4()
    );

    format!("{:x}", Sha256::digest(seed.as_bytes()))
}
