//! Seed the shipments API database with the demo manifest.

use sqlx::SqlitePool;

use fleet_logistics_api::config::ApiConfig;
use fleet_logistics_api::db::ShipmentRepository;

use super::CommandError;

/// Insert the demo shipments.
///
/// Without `force` this only fills an empty table. With `force`, every
/// existing shipment is deleted first.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or written.
pub async fn demo(force: bool) -> Result<(), CommandError> {
    let config = ApiConfig::from_env()?;
    let pool = fleet_logistics_api::db::create_pool(&config.database_url).await?;
    fleet_logistics_api::db::migrate(&pool).await?;
    seed(&pool, force).await
}

async fn seed(pool: &SqlitePool, force: bool) -> Result<(), CommandError> {
    let repo = ShipmentRepository::new(pool);

    if force {
        let removed = repo.clear(true).await?;
        tracing::info!(removed, "Replaced all shipments with the demo manifest");
        return Ok(());
    }

    let inserted = repo.seed_if_empty().await?;
    if inserted == 0 {
        tracing::info!("Shipments table is not empty; nothing seeded (use --force to replace)");
    } else {
        tracing::info!(inserted, "Demo shipments inserted");
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use fleet_logistics_api::db::DEMO_SHIPMENTS;
    use fleet_logistics_core::{NewShipment, Priority, TrackingId};

    use super::*;

    async fn pool() -> SqlitePool {
        let pool = fleet_logistics_api::db::create_pool(&SecretString::from("sqlite::memory:"))
            .await
            .unwrap();
        fleet_logistics_api::db::migrate(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn test_seed_fills_empty_table_once() {
        let pool = pool().await;
        seed(&pool, false).await.unwrap();
        seed(&pool, false).await.unwrap();

        let count = ShipmentRepository::new(&pool).count().await.unwrap();
        assert_eq!(usize::try_from(count).unwrap(), DEMO_SHIPMENTS.len());
    }

    #[tokio::test]
    async fn test_force_replaces_existing() {
        let pool = pool().await;
        let repo = ShipmentRepository::new(&pool);
        repo.create(&NewShipment::parcel(
            TrackingId::parse("TRK500").unwrap(),
            "Boston, MA",
            Priority::Low,
        ))
        .await
        .unwrap();

        seed(&pool, true).await.unwrap();

        let all = repo.list_all().await.unwrap();
        assert_eq!(all.len(), DEMO_SHIPMENTS.len());
        assert!(all.iter().all(|s| s.tracking_id.as_str() != "TRK500"));
    }
}
