//! Dashboard accounts.
//!
//! **Not for production.** Passwords are stored and compared in plaintext;
//! this is a mock login for a demo dashboard, not an authentication system.

use serde::{Deserialize, Serialize};

use super::email::Email;
use super::status::Role;

/// The signed-in user as kept in the session. Never carries a password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub email: Email,
    pub role: Role,
}

/// A directory entry: a user plus their plaintext password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    #[serde(flatten)]
    pub user: User,
    pub password: String,
}

impl Account {
    /// Build a Staff account the way signup does: username is the email's
    /// local part unless one is given.
    #[must_use]
    pub fn staff(email: Email, password: impl Into<String>, username: Option<String>) -> Self {
        let username = username
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| email.local_part().to_owned());
        Self {
            user: User {
                username,
                email,
                role: Role::Staff,
            },
            password: password.into(),
        }
    }

    /// Plaintext comparison.
    #[must_use]
    pub fn password_matches(&self, candidate: &str) -> bool {
        self.password == candidate
    }
}

/// A hardcoded account compiled into the binary.
#[derive(Debug, Clone, Copy)]
pub struct BuiltInAccount {
    pub username: &'static str,
    pub email: &'static str,
    pub role: Role,
    pub password: &'static str,
}

impl BuiltInAccount {
    /// Materialize as a directory entry.
    #[must_use]
    pub fn to_account(&self) -> Account {
        Account {
            user: User {
                username: self.username.to_owned(),
                email: Email::from_static(self.email),
                role: self.role,
            },
            password: self.password.to_owned(),
        }
    }
}

/// Accounts that exist before anyone signs up. Signup cannot shadow them.
pub const BUILT_IN_ACCOUNTS: [BuiltInAccount; 2] = [
    BuiltInAccount {
        username: "Admin",
        email: "admin@fleetlogistics.com",
        role: Role::Admin,
        password: "admin123",
    },
    BuiltInAccount {
        username: "John Doe",
        email: "customer@example.com",
        role: Role::Customer,
        password: "customer123",
    },
];

/// Look up a built-in account by exact email.
#[must_use]
pub fn find_built_in(email: &Email) -> Option<Account> {
    BUILT_IN_ACCOUNTS
        .iter()
        .find(|a| a.email == email.as_str())
        .map(BuiltInAccount::to_account)
}
