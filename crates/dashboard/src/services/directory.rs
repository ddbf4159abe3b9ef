//! Mock user directory.
//!
//! **Not for production.** Accounts are the two built-ins plus Staff signups
//! persisted in `client_state` with plaintext passwords.

use sqlx::SqlitePool;

use fleet_logistics_core::{Account, Email, EmailError, User, find_built_in};

use crate::db::{ClientState, StateError};

/// `client_state` namespace holding signed-up accounts, keyed by email.
pub const USERS_NAMESPACE: &str = "users";

/// Outcome of [`UserDirectory::register_user`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// Stored (inserted or replaced).
    Saved,
    /// The email belongs to a built-in account; nothing was written.
    BuiltInUnchanged,
}

/// Signup rejected before anything was stored.
#[derive(Debug, thiserror::Error)]
pub enum SignupError {
    #[error("Passwords do not match.")]
    PasswordMismatch,
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),
    #[error("Account already exists.")]
    AlreadyExists,
    #[error(transparent)]
    State(#[from] StateError),
}

/// Signup form input, as typed.
#[derive(Debug, Clone, Copy)]
pub struct SignupRequest<'r> {
    pub email: &'r str,
    pub password: &'r str,
    pub confirm_password: &'r str,
    /// Defaults to the email's local part.
    pub username: Option<&'r str>,
}

/// Lookup and registration over built-in and signed-up accounts.
pub struct UserDirectory<'a> {
    users: ClientState<'a>,
}

impl<'a> UserDirectory<'a> {
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            users: ClientState::new(pool, USERS_NAMESPACE),
        }
    }

    /// Find an account: built-ins first, then the persisted directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    pub async fn get_user_by_email(&self, email: &Email) -> Result<Option<Account>, StateError> {
        if let Some(account) = find_built_in(email) {
            return Ok(Some(account));
        }
        self.users.get(email.as_str()).await
    }

    /// Upsert an account by email. Built-in emails are left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be written.
    pub async fn register_user(&self, account: &Account) -> Result<Registration, StateError> {
        if find_built_in(&account.user.email).is_some() {
            tracing::debug!(email = %account.user.email, "ignoring registration over built-in account");
            return Ok(Registration::BuiltInUnchanged);
        }
        self.users.set(account.user.email.as_str(), account).await?;
        Ok(Registration::Saved)
    }

    /// Check credentials. Returns the user on an exact plaintext match.
    ///
    /// An unparseable email is simply an unknown user.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Option<User>, StateError> {
        let Ok(email) = Email::parse(email) else {
            return Ok(None);
        };
        Ok(self
            .get_user_by_email(&email)
            .await?
            .filter(|account| account.password_matches(password))
            .map(|account| account.user))
    }

    /// Validate a signup and register it as a Staff account.
    ///
    /// Does not sign the user in.
    ///
    /// # Errors
    ///
    /// Returns `SignupError` if the passwords differ, the email is invalid or
    /// already taken, or the directory cannot be accessed.
    pub async fn sign_up(&self, request: SignupRequest<'_>) -> Result<Account, SignupError> {
        if request.password != request.confirm_password {
            return Err(SignupError::PasswordMismatch);
        }
        let email = Email::parse(request.email)?;
        if self.get_user_by_email(&email).await?.is_some() {
            return Err(SignupError::AlreadyExists);
        }

        let account = Account::staff(
            email,
            request.password,
            request.username.map(str::to_owned),
        );
        self.register_user(&account).await?;
        tracing::info!(email = %account.user.email, "staff account registered");
        Ok(account)
    }

    /// Number of signed-up accounts (built-ins excluded).
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    pub async fn registered_count(&self) -> Result<i64, StateError> {
        self.users.count().await
    }
}
