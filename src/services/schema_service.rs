use crate::error::Result;
use sqlx::PgPool;

/// Which optional dependent tables exist in this deployment. Probed once at
/// startup; cascade deletions consult these flags instead of catching
/// "relation does not exist" on every call.
#[derive(Debug, Clone, Copy)]
pub struct SchemaCapabilities {
    pub submitted_answers: bool,
    pub results: bool,
}

impl SchemaCapabilities {
    pub async fn detect(pool: &PgPool) -> Result<Self> {
        let caps = Self {
            submitted_answers: table_exists(pool, "submitted_answers").await?,
            results: table_exists(pool, "results").await?,
        };
        if !caps.submitted_answers || !caps.results {
            tracing::warn!(
                submitted_answers = caps.submitted_answers,
                results = caps.results,
                "optional result tables missing; dependent deletes will skip them"
            );
        }
        Ok(caps)
    }

    /// All tables present, as created by this crate's own migrations.
    pub fn full() -> Self {
        Self {
            submitted_answers: true,
            results: true,
        }
    }
}

async fn table_exists(pool: &PgPool, table: &str) -> Result<bool> {
    let exists: bool = sqlx::query_scalar("SELECT to_regclass($1) IS NOT NULL")
        .bind(format!("public.{}", table))
        .fetch_one(pool)
        .await?;
    Ok(exists)
}
