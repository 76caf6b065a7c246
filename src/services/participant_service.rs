use crate::dto::participant_dto::{RegisterParticipantRequest, UpdateParticipantRequest};
use crate::error::{is_unique_violation, Error, Result};
use crate::models::class_level::ClassLevel;
use crate::models::participant::Participant;
use crate::services::roll_service::RollService;
use crate::services::schema_service::SchemaCapabilities;
use crate::utils::crypto::hash_password;
use crate::utils::token::generate_temp_password;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

/// Collisions mean another registration won the race for the same roll;
/// re-allocation under the class lock resolves it almost always on the
/// first retry.
const MAX_ALLOCATION_RETRIES: u32 = 3;

const TEMP_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone)]
pub struct RegisteredParticipant {
    pub participant: Participant,
    pub temp_password: String,
    pub degraded_roll: bool,
}

#[derive(Debug, Default)]
pub struct ParticipantFilter {
    pub class_level: Option<String>,
    pub school: Option<String>,
}

#[derive(Clone)]
pub struct ParticipantService {
    pool: PgPool,
    rolls: RollService,
    capabilities: SchemaCapabilities,
}

impl ParticipantService {
    pub fn new(pool: PgPool, capabilities: SchemaCapabilities) -> Self {
        let rolls = RollService::new(pool.clone());
        Self {
            pool,
            rolls,
            capabilities,
        }
    }

    /// Registers a participant: allocates the next roll for their class,
    /// issues a one-time temporary password, and inserts under the roll
    /// uniqueness constraint. A constraint rejection triggers re-allocation
    /// up to [`MAX_ALLOCATION_RETRIES`] before the class is reported
    /// exhausted to the administrator.
    pub async fn register(
        &self,
        payload: RegisterParticipantRequest,
    ) -> Result<RegisteredParticipant> {
        let class = ClassLevel::from_designator(&payload.class_level)
            .ok_or_else(|| Error::InvalidClass(payload.class_level.clone()))?;

        let temp_password = generate_temp_password(TEMP_PASSWORD_LEN);
        let password_hash = hash_password(&temp_password)
            .map_err(|e| Error::Internal(format!("Failed to hash password: {}", e)))?;
        let payment_status = payload.entry_fee > Decimal::ZERO;

        let mut attempt = 0;
        loop {
            attempt += 1;
            match self
                .try_register(class, &payload, &password_hash, payment_status)
                .await
            {
                Ok((participant, degraded_roll)) => {
                    return Ok(RegisteredParticipant {
                        participant,
                        temp_password,
                        degraded_roll,
                    });
                }
                Err(Error::DuplicateRoll(roll)) if attempt < MAX_ALLOCATION_RETRIES => {
                    tracing::warn!(attempt, roll = %roll, class = %class, "roll collision; re-allocating");
                }
                Err(Error::DuplicateRoll(_)) => {
                    return Err(Error::CapacityExceeded(format!(
                        "Could not allocate a unique roll for class {} after {} attempts",
                        class, MAX_ALLOCATION_RETRIES
                    )));
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn try_register(
        &self,
        class: ClassLevel,
        payload: &RegisterParticipantRequest,
        password_hash: &str,
        payment_status: bool,
    ) -> Result<(Participant, bool)> {
        let mut tx = self.pool.begin().await?;

        let (roll_number, degraded) = match self.rolls.allocate_in_tx(class, &mut tx).await {
            Ok(roll) => (roll, false),
            Err(err @ (Error::Database(_) | Error::Transient(_))) => {
                tracing::warn!(
                    error = %err,
                    class = %class,
                    "roll scan failed; falling back to degraded time-derived roll"
                );
                // The failed transaction is unusable; start over without the lock.
                tx.rollback().await.ok();
                tx = self.pool.begin().await?;
                let allocation = self.rolls.allocate(class).await?;
                (
                    allocation.roll_number().to_string(),
                    allocation.is_degraded(),
                )
            }
            Err(err) => return Err(err),
        };

        let inserted = sqlx::query_as::<_, Participant>(
            r#"
            INSERT INTO participants
                (name, father_name, mother_name, school, class_level, class_roll,
                 email, gender, phone, roll_number, password, payment_status,
                 entry_fee, registered_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            "#,
        )
        .bind(&payload.name)
        .bind(&payload.father_name)
        .bind(&payload.mother_name)
        .bind(&payload.school)
        .bind(class.designator())
        .bind(&payload.class_roll)
        .bind(&payload.email)
        .bind(&payload.gender)
        .bind(&payload.phone)
        .bind(&roll_number)
        .bind(password_hash)
        .bind(payment_status)
        .bind(payload.entry_fee)
        .bind(&payload.registered_by)
        .fetch_one(&mut *tx)
        .await;

        let participant = match inserted {
            Ok(participant) => participant,
            Err(err) if is_unique_violation(&err) => {
                tx.rollback().await.ok();
                return Err(Error::DuplicateRoll(roll_number));
            }
            Err(err) => return Err(err.into()),
        };

        tx.commit().await?;
        Ok((participant, degraded))
    }

    pub async fn get_by_roll(&self, roll: &str) -> Result<Participant> {
        sqlx::query_as::<_, Participant>("SELECT * FROM participants WHERE roll_number = $1")
            .bind(roll)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Participant not found".to_string()))
    }

    pub async fn list(&self, filter: ParticipantFilter) -> Result<Vec<Participant>> {
        if let Some(designator) = filter.class_level.as_deref() {
            if ClassLevel::from_designator(designator).is_none() {
                return Err(Error::InvalidClass(designator.to_string()));
            }
        }

        let participants = sqlx::query_as::<_, Participant>(
            r#"
            SELECT * FROM participants
            WHERE ($1::text IS NULL OR class_level = $1)
              AND ($2::text IS NULL OR school = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(filter.class_level)
        .bind(filter.school)
        .fetch_all(&self.pool)
        .await?;

        Ok(participants)
    }

    /// Class level and roll number are immutable after registration; the
    /// roll encodes the class prefix.
    pub async fn update(&self, id: Uuid, payload: UpdateParticipantRequest) -> Result<Participant> {
        let participant = sqlx::query_as::<_, Participant>(
            r#"
            UPDATE participants SET
                name = COALESCE($1, name),
                father_name = COALESCE($2, father_name),
                mother_name = COALESCE($3, mother_name),
                school = COALESCE($4, school),
                email = COALESCE($5, email),
                gender = COALESCE($6, gender),
                phone = COALESCE($7, phone),
                payment_status = COALESCE($8, payment_status),
                entry_fee = COALESCE($9, entry_fee)
            WHERE id = $10
            RETURNING *
            "#,
        )
        .bind(payload.name)
        .bind(payload.father_name)
        .bind(payload.mother_name)
        .bind(payload.school)
        .bind(payload.email)
        .bind(payload.gender)
        .bind(payload.phone)
        .bind(payload.payment_status)
        .bind(payload.entry_fee)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Participant not found".to_string()))?;

        Ok(participant)
    }

    /// Removes the participant and purges their submission/result rows in
    /// the same transaction.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        for (table, present) in [
            ("submitted_answers", self.capabilities.submitted_answers),
            ("results", self.capabilities.results),
        ] {
            if !present {
                tracing::warn!(table, participant_id = %id, "table absent in this deployment; skipping dependent delete");
                continue;
            }
            sqlx::query(&format!("DELETE FROM {} WHERE participant_id = $1", table))
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        let deleted = sqlx::query("DELETE FROM participants WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if deleted.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(Error::NotFound("Participant not found".to_string()));
        }

        tx.commit().await?;
        Ok(())
    }
}
