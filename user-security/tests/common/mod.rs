use std::sync::Arc;

use user_security::managers::InMemoryUserManager;
use user_security::User;
use user_security::UserProvider;
use user_security::UserType;

/// Provider over an in-memory manager bound to the `Account` type
pub struct TestApp {
    pub user_type: Arc<UserType>,
    pub manager: Arc<InMemoryUserManager>,
    pub provider: UserProvider<InMemoryUserManager>,
}

impl TestApp {
    /// Build the provider with `alice` already stored
    pub async fn spawn() -> Self {
        let user_type = Arc::new(UserType::new("Account"));
        let manager = Arc::new(InMemoryUserManager::new(Arc::clone(&user_type)));
        let provider = UserProvider::new(Arc::clone(&manager));

        let app = Self {
            user_type,
            manager,
            provider,
        };

        app.store_user("alice", "a@x.com", "h1", "s1").await;
        app
    }

    pub fn new_user(&self, username: &str, email: &str, password: &str, salt: &str) -> User {
        let mut user =
            User::with_default_role(Arc::clone(&self.user_type)).expect("Failed to create user");
        user.set_username(username)
            .set_email(email)
            .set_password(password)
            .set_salt(salt)
            .set_enabled(true);
        user
    }

    pub async fn store_user(&self, username: &str, email: &str, password: &str, salt: &str) {
        let user = self.new_user(username, email, password, salt);
        self.manager
            .insert(user)
            .await
            .expect("Failed to store user");
    }
}
