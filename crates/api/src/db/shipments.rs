//! Shipment repository.
//!
//! Queries are built at runtime with `sqlx::query_as` so the crate compiles
//! without a live database.

use chrono::{DateTime, SubsecRound, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

use fleet_logistics_core::{
    NewShipment, Priority, Shipment, ShipmentId, ShipmentStatus, TrackingId, format_timestamp,
    parse_timestamp,
};

use super::RepositoryError;

/// Demo manifest inserted into an empty table: (tracking ID, destination, priority, status).
pub const DEMO_SHIPMENTS: [(&str, &str, Priority, ShipmentStatus); 4] = [
    (
        "TRK001",
        "456 Oak Lane, Dallas, TX",
        Priority::High,
        ShipmentStatus::Processing,
    ),
    (
        "TRK002",
        "101 Pine St, Miami, FL",
        Priority::Medium,
        ShipmentStatus::Scheduled,
    ),
    (
        "TRK003",
        "789 Birch Rd, Denver, CO",
        Priority::Low,
        ShipmentStatus::Delivered,
    ),
    (
        "TRK999",
        "123 Main St, New York, NY",
        Priority::High,
        ShipmentStatus::Scheduled,
    ),
];

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct ShipmentRow {
    id: String,
    tracking_id: String,
    destination: String,
    priority: String,
    status: String,
    created_at: String,
}

impl TryFrom<ShipmentRow> for Shipment {
    type Error = RepositoryError;

    fn try_from(row: ShipmentRow) -> Result<Self, Self::Error> {
        let tracking_id = TrackingId::parse(&row.tracking_id).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid tracking id in database: {e}"))
        })?;
        let priority = row
            .priority
            .parse::<Priority>()
            .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;
        let status = row
            .status
            .parse::<ShipmentStatus>()
            .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;
        let created_at = parse_timestamp(&row.created_at).ok_or_else(|| {
            RepositoryError::DataCorruption(format!("invalid created_at: {}", row.created_at))
        })?;

        Ok(Self {
            id: ShipmentId::new(row.id),
            tracking_id,
            destination: row.destination,
            priority,
            status,
            created_at,
        })
    }
}

async fn insert(conn: &mut SqliteConnection, shipment: &Shipment) -> Result<(), sqlx::Error> {
    sqlx::query(
        r"
        INSERT INTO shipment (id, tracking_id, destination, priority, status, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        ",
    )
    .bind(shipment.id.as_str())
    .bind(shipment.tracking_id.as_str())
    .bind(&shipment.destination)
    .bind(shipment.priority.as_str())
    .bind(shipment.status.as_str())
    .bind(format_timestamp(&shipment.created_at))
    .execute(conn)
    .await?;
    Ok(())
}

/// Current time at the precision the table stores.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

fn fresh(new: &NewShipment) -> Shipment {
    Shipment {
        id: ShipmentId::new(Uuid::new_v4().to_string()),
        tracking_id: new.tracking_id.clone(),
        destination: new.destination.clone(),
        priority: new.priority,
        status: new.status,
        created_at: now(),
    }
}

fn demo_manifest() -> Result<Vec<NewShipment>, RepositoryError> {
    DEMO_SHIPMENTS
        .iter()
        .map(|(tracking, destination, priority, status)| {
            let tracking_id = TrackingId::parse(tracking)
                .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;
            Ok(NewShipment {
                tracking_id,
                destination: (*destination).to_owned(),
                priority: *priority,
                status: *status,
            })
        })
        .collect()
}

async fn insert_demo(conn: &mut SqliteConnection) -> Result<usize, RepositoryError> {
    let manifest = demo_manifest()?;
    for new in &manifest {
        insert(conn, &fresh(new)).await?;
    }
    Ok(manifest.len())
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for shipment database operations.
pub struct ShipmentRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ShipmentRepository<'a> {
    /// Create a new shipment repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List every shipment in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a row cannot be decoded.
    pub async fn list_all(&self) -> Result<Vec<Shipment>, RepositoryError> {
        let rows = sqlx::query_as::<_, ShipmentRow>(
            r"
            SELECT id, tracking_id, destination, priority, status, created_at
            FROM shipment
            ORDER BY rowid
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get a shipment by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the row cannot be decoded.
    pub async fn get(&self, id: &ShipmentId) -> Result<Option<Shipment>, RepositoryError> {
        let row = sqlx::query_as::<_, ShipmentRow>(
            r"
            SELECT id, tracking_id, destination, priority, status, created_at
            FROM shipment
            WHERE id = ?
            ",
        )
        .bind(id.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Insert a new shipment with a fresh UUID and the current time.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, new: &NewShipment) -> Result<Shipment, RepositoryError> {
        let shipment = fresh(new);
        let mut conn = self.pool.acquire().await?;
        insert(&mut conn, &shipment).await?;
        Ok(shipment)
    }

    /// Set a shipment's status and re-stamp its `created_at`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no shipment has this ID.
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update_status(
        &self,
        id: &ShipmentId,
        status: ShipmentStatus,
    ) -> Result<Shipment, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE shipment SET status = ?, created_at = ?
            WHERE id = ?
            ",
        )
        .bind(status.as_str())
        .bind(format_timestamp(&now()))
        .bind(id.as_str())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        self.get(id).await?.ok_or(RepositoryError::NotFound)
    }

    /// Count stored shipments.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM shipment")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Delete every shipment, then re-insert the demo manifest if `reseed`.
    ///
    /// Runs in one transaction so readers never observe a half-seeded table.
    /// Returns the number of rows deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails.
    pub async fn clear(&self, reseed: bool) -> Result<u64, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let deleted = sqlx::query("DELETE FROM shipment")
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if reseed {
            insert_demo(&mut tx).await?;
        }
        tx.commit().await?;
        Ok(deleted)
    }

    /// Insert the demo manifest when the table is empty.
    ///
    /// Returns the number of shipments inserted (zero if data already existed).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn seed_if_empty(&self) -> Result<usize, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM shipment")
            .fetch_one(&mut *tx)
            .await?;
        if count > 0 {
            return Ok(0);
        }
        let inserted = insert_demo(&mut tx).await?;
        tx.commit().await?;
        Ok(inserted)
    }
}
