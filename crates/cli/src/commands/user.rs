//! Dashboard account management.
//!
//! Accounts created here are ordinary Staff signups: plaintext passwords in
//! the dashboard's mock directory, not for production.

use sqlx::SqlitePool;

use fleet_logistics_dashboard::config::DashboardConfig;
use fleet_logistics_dashboard::services::{SignupRequest, UserDirectory};

use super::CommandError;

/// Register a Staff account.
///
/// # Errors
///
/// Returns an error if the email is invalid or taken, or the database cannot
/// be opened.
pub async fn create(email: &str, password: &str, username: Option<&str>) -> Result<(), CommandError> {
    let config = DashboardConfig::from_env()?;
    let pool = fleet_logistics_dashboard::db::create_pool(&config.database_url).await?;
    fleet_logistics_dashboard::db::migrate(&pool).await?;

    let registered = register(&pool, email, password, username).await?;
    tracing::info!(registered, "Staff accounts on file");
    Ok(())
}

/// Sign up one account and return how many signed-up accounts now exist.
async fn register(
    pool: &SqlitePool,
    email: &str,
    password: &str,
    username: Option<&str>,
) -> Result<i64, CommandError> {
    let directory = UserDirectory::new(pool);
    let account = directory
        .sign_up(SignupRequest {
            email,
            password,
            confirm_password: password,
            username,
        })
        .await?;

    tracing::info!(
        email = %account.user.email,
        username = %account.user.username,
        role = %account.user.role,
        "Account created"
    );
    Ok(directory.registered_count().await?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    async fn pool() -> SqlitePool {
        let pool = fleet_logistics_dashboard::db::create_pool(&SecretString::from("sqlite::memory:"))
            .await
            .unwrap();
        fleet_logistics_dashboard::db::migrate(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn test_register_counts_signups() {
        let pool = pool().await;
        assert_eq!(register(&pool, "a@fleet.test", "pw", None).await.unwrap(), 1);
        assert_eq!(register(&pool, "b@fleet.test", "pw", Some("Bo")).await.unwrap(), 2);

        let err = register(&pool, "a@fleet.test", "pw", None).await.unwrap_err();
        assert_eq!(err.to_string(), "Account already exists.");
    }
}
