//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use kernel::id::PinId;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::CoursePin;
use crate::domain::repository::{PinRepository, RedeemOutcome};
use crate::domain::value_object::{CourseId, DeviceId, PinDigest};
use crate::error::{AccessError, AccessResult};

const PIN_COLUMNS: &str = r#"
    course_pin_id,
    course_id,
    pin_digest,
    usage_limit,
    usage_count,
    expires_at_ms,
    device_id,
    created_at,
    last_used_at
"#;

/// PostgreSQL-backed PIN repository
#[derive(Clone)]
pub struct PgAccessRepository {
    pool: PgPool,
}

impl PgAccessRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl PinRepository for PgAccessRepository {
    async fn create(&self, pin: &CoursePin) -> AccessResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO course_pins (
                course_pin_id,
                course_id,
                pin_digest,
                usage_limit,
                usage_count,
                expires_at_ms,
                device_id,
                created_at,
                last_used_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(pin.id.as_uuid())
        .bind(pin.course_id.as_str())
        .bind(pin.digest.as_str())
        .bind(pin.usage_limit.map(to_db_count))
        .bind(to_db_count(pin.usage_count))
        .bind(pin.expires_at_ms)
        .bind(pin.device_id.as_ref().map(DeviceId::as_str))
        .bind(pin.created_at)
        .bind(pin.last_used_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(AccessError::PinAlreadyExists)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find(
        &self,
        course_id: &CourseId,
        digest: &PinDigest,
    ) -> AccessResult<Option<CoursePin>> {
        let row = sqlx::query_as::<_, CoursePinRow>(&format!(
            "SELECT {PIN_COLUMNS} FROM course_pins WHERE course_id = $1 AND pin_digest = $2"
        ))
        .bind(course_id.as_str())
        .bind(digest.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(CoursePinRow::into_pin).transpose()
    }

    async fn redeem(
        &self,
        course_id: &CourseId,
        digest: &PinDigest,
        device: &DeviceId,
        now: DateTime<Utc>,
    ) -> AccessResult<RedeemOutcome> {
        let mut tx = self.pool.begin().await?;

        // Row lock serializes concurrent redemptions of the same PIN
        let row = sqlx::query_as::<_, CoursePinRow>(&format!(
            "SELECT {PIN_COLUMNS} FROM course_pins \
             WHERE course_id = $1 AND pin_digest = $2 FOR UPDATE"
        ))
        .bind(course_id.as_str())
        .bind(digest.as_str())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(RedeemOutcome::NotFound);
        };
        let mut pin = row.into_pin()?;

        let device_linked = match pin.redeem(device, now) {
            Ok(linked) => linked,
            Err(reason) => return Ok(RedeemOutcome::Rejected(reason)),
        };

        sqlx::query(
            r#"
            UPDATE course_pins SET
                usage_count = $2,
                device_id = $3,
                last_used_at = $4
            WHERE course_pin_id = $1
            "#,
        )
        .bind(pin.id.as_uuid())
        .bind(to_db_count(pin.usage_count))
        .bind(pin.device_id.as_ref().map(DeviceId::as_str))
        .bind(pin.last_used_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(RedeemOutcome::Redeemed { pin, device_linked })
    }

    async fn find_bound(
        &self,
        course_id: &CourseId,
        device: &DeviceId,
    ) -> AccessResult<Vec<CoursePin>> {
        let rows = sqlx::query_as::<_, CoursePinRow>(&format!(
            "SELECT {PIN_COLUMNS} FROM course_pins WHERE course_id = $1 AND device_id = $2"
        ))
        .bind(course_id.as_str())
        .bind(device.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(CoursePinRow::into_pin).collect()
    }

    async fn cleanup_expired(&self, now: DateTime<Utc>) -> AccessResult<u64> {
        let deleted = sqlx::query("DELETE FROM course_pins WHERE expires_at_ms <= $1")
            .bind(now.timestamp_millis())
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(pins_deleted = deleted, "Cleaned up expired course PINs");

        Ok(deleted)
    }
}

fn to_db_count(count: u32) -> i32 {
    i32::try_from(count).unwrap_or(i32::MAX)
}

#[derive(sqlx::FromRow)]
struct CoursePinRow {
    course_pin_id: Uuid,
    course_id: String,
    pin_digest: String,
    usage_limit: Option<i32>,
    usage_count: i32,
    expires_at_ms: Option<i64>,
    device_id: Option<String>,
    created_at: DateTime<Utc>,
    last_used_at: Option<DateTime<Utc>>,
}

impl CoursePinRow {
    fn into_pin(self) -> AccessResult<CoursePin> {
        let course_id = CourseId::new(&self.course_id)
            .map_err(|e| AccessError::Internal(format!("stored course_id: {e}")))?;
        let device_id = self
            .device_id
            .map(DeviceId::new)
            .transpose()
            .map_err(|e| AccessError::Internal(format!("stored device_id: {e}")))?;

        Ok(CoursePin {
            id: PinId::from_uuid(self.course_pin_id),
            course_id,
            digest: PinDigest::from_db(self.pin_digest),
            usage_limit: self.usage_limit.map(|n| n.max(0) as u32),
            usage_count: self.usage_count.max(0) as u32,
            expires_at_ms: self.expires_at_ms,
            device_id,
            created_at: self.created_at,
            last_used_at: self.last_used_at,
        })
    }
}
