use crate::error::{Error, Result};
use crate::models::class_level::ClassLevel;
use chrono::Utc;
use sqlx::{PgPool, Postgres, Transaction};

/// Roll numbers are fixed-width digit strings.
pub const ROLL_WIDTH: usize = 5;

/// Outcome of an allocation. The degraded variant exists so callers can tell
/// a guaranteed-correct roll from a best-effort one instead of the fallback
/// masquerading as a normal success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RollAllocation {
    /// Allocated under the per-class lock; prefix and ordering hold.
    Assigned(String),
    /// Time-derived fallback issued after a storage failure. Carries no
    /// class-prefix or ordering guarantee.
    Degraded(String),
}

impl RollAllocation {
    pub fn roll_number(&self) -> &str {
        match self {
            RollAllocation::Assigned(roll) | RollAllocation::Degraded(roll) => roll,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, RollAllocation::Degraded(_))
    }
}

#[derive(Clone)]
pub struct RollService {
    pool: PgPool,
}

impl RollService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Next roll for the class, computed inside `tx` while holding the
    /// class's advisory lock. The caller must insert under the same
    /// transaction so the lock covers the whole read-then-write.
    pub async fn allocate_in_tx(
        &self,
        class: ClassLevel,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<String> {
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(class.lock_key())
            .execute(&mut **tx)
            .await?;

        let last: Option<String> =
            sqlx::query_scalar("SELECT MAX(roll_number) FROM participants WHERE roll_number LIKE $1")
                .bind(format!("{}%", class.prefix()))
                .fetch_one(&mut **tx)
                .await?;

        match last {
            Some(last) => next_roll(class.prefix(), &last),
            None => first_roll(class.prefix()),
        }
    }

    /// Read-only preview of the next roll for a class. Storage failures fall
    /// back to a time-derived roll, logged as a reliability event.
    pub async fn allocate(&self, class: ClassLevel) -> Result<RollAllocation> {
        match self.scan_next(class).await {
            Ok(roll) => Ok(RollAllocation::Assigned(roll)),
            Err(err @ (Error::CapacityExceeded(_) | Error::InvalidClass(_) | Error::Internal(_))) => {
                Err(err)
            }
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    class = %class,
                    "roll scan failed; issuing degraded time-derived roll"
                );
                Ok(RollAllocation::Degraded(degraded_roll()))
            }
        }
    }

    async fn scan_next(&self, class: ClassLevel) -> Result<String> {
        let mut tx = self.pool.begin().await?;
        let roll = self.allocate_in_tx(class, &mut tx).await?;
        tx.rollback().await?;
        Ok(roll)
    }
}

/// First roll for a prefix: the string `{prefix}01` zero-filled on the right
/// to exactly [`ROLL_WIDTH`] characters ("61" -> "61010", "101" -> "10101").
pub fn first_roll(prefix: &str) -> Result<String> {
    let seed = format!("{}01", prefix);
    if seed.len() > ROLL_WIDTH {
        return Err(Error::CapacityExceeded(format!(
            "Prefix {} does not fit a {}-digit roll number",
            prefix, ROLL_WIDTH
        )));
    }
    Ok(format!("{:0<width$}", seed, width = ROLL_WIDTH))
}

/// Successor of the highest stored roll: numeric increment, re-padded to
/// [`ROLL_WIDTH`] digits. Leaving the class prefix means the class is full.
pub fn next_roll(prefix: &str, last: &str) -> Result<String> {
    let value: u64 = last
        .trim()
        .parse()
        .map_err(|_| Error::Internal(format!("Stored roll number {:?} is not numeric", last)))?;

    let next = format!("{:0width$}", value + 1, width = ROLL_WIDTH);
    if next.len() > ROLL_WIDTH || !next.starts_with(prefix) {
        return Err(Error::CapacityExceeded(format!(
            "No roll numbers left under class prefix {}",
            prefix
        )));
    }
    Ok(next)
}

/// Coarse fallback with no prefix or ordering guarantee.
fn degraded_roll() -> String {
    format!("{:0width$}", Utc::now().timestamp() % 100_000, width = ROLL_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_roll_pads_right_to_width() {
        assert_eq!(first_roll("61").unwrap(), "61010");
        assert_eq!(first_roll("91").unwrap(), "91010");
        assert_eq!(first_roll("101").unwrap(), "10101");
    }

    #[test]
    fn next_roll_increments_numerically() {
        assert_eq!(next_roll("61", "61010").unwrap(), "61011");
        assert_eq!(next_roll("61", "61099").unwrap(), "61100");
        assert_eq!(next_roll("101", "10101").unwrap(), "10102");
    }

    #[test]
    fn next_roll_is_always_width_five() {
        for class in ClassLevel::ALL {
            let first = first_roll(class.prefix()).unwrap();
            assert_eq!(first.len(), ROLL_WIDTH);
            assert_eq!(next_roll(class.prefix(), &first).unwrap().len(), ROLL_WIDTH);
        }
    }

    #[test]
    fn leaving_the_prefix_exhausts_capacity() {
        assert!(matches!(
            next_roll("61", "61999"),
            Err(Error::CapacityExceeded(_))
        ));
        assert!(matches!(
            next_roll("101", "10199"),
            Err(Error::CapacityExceeded(_))
        ));
    }

    #[test]
    fn non_numeric_stored_roll_is_an_internal_error() {
        assert!(matches!(next_roll("61", "61x10"), Err(Error::Internal(_))));
    }

    #[test]
    fn degraded_roll_has_contract_width() {
        assert_eq!(degraded_roll().len(), ROLL_WIDTH);
    }
}
