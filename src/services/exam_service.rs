use crate::dto::exam_dto::{CreateExamRequest, UpdateExamRequest, UpsertExamClassRequest};
use crate::error::{Error, Result};
use crate::models::class_level::ClassLevel;
use crate::models::exam::Exam;
use crate::models::exam_class::ExamClass;
use crate::services::schema_service::SchemaCapabilities;
use serde_json::Value as JsonValue;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

#[derive(Debug, serde::Serialize, sqlx::FromRow)]
pub struct ExamSummary {
    pub id: Uuid,
    pub title: String,
    pub year: i32,
    pub question_count: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub class_count: i64,
    pub set_names: Vec<String>,
}

#[derive(Clone)]
pub struct ExamService {
    pool: PgPool,
    capabilities: SchemaCapabilities,
}

impl ExamService {
    pub fn new(pool: PgPool, capabilities: SchemaCapabilities) -> Self {
        Self { pool, capabilities }
    }

    pub async fn create_exam(&self, payload: CreateExamRequest) -> Result<Exam> {
        let exam = sqlx::query_as::<_, Exam>(
            r#"
            INSERT INTO exams (title, year, question_count)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&payload.title)
        .bind(payload.year)
        .bind(payload.question_count.unwrap_or(0))
        .fetch_one(&self.pool)
        .await?;

        Ok(exam)
    }

    pub async fn list_exams(&self) -> Result<Vec<ExamSummary>> {
        let exams = sqlx::query_as::<_, ExamSummary>(
            r#"
            SELECT
                e.id, e.title, e.year, e.question_count, e.created_at,
                COUNT(ec.id) AS class_count,
                COALESCE(ARRAY_AGG(ec.set_name) FILTER (WHERE ec.id IS NOT NULL), '{}') AS set_names
            FROM exams e
            LEFT JOIN exam_classes ec ON ec.exam_id = e.id
            GROUP BY e.id
            ORDER BY e.year DESC, e.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(exams)
    }

    pub async fn get_exam_with_classes(&self, exam_id: Uuid) -> Result<(Exam, Vec<ExamClass>)> {
        let exam = sqlx::query_as::<_, Exam>("SELECT * FROM exams WHERE id = $1")
            .bind(exam_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Exam not found".to_string()))?;

        let classes = sqlx::query_as::<_, ExamClass>(
            "SELECT * FROM exam_classes WHERE exam_id = $1 ORDER BY class_level",
        )
        .bind(exam_id)
        .fetch_all(&self.pool)
        .await?;

        Ok((exam, classes))
    }

    pub async fn update_exam(&self, exam_id: Uuid, payload: UpdateExamRequest) -> Result<Exam> {
        let exam = sqlx::query_as::<_, Exam>(
            r#"
            UPDATE exams SET
                title = COALESCE($1, title),
                year = COALESCE($2, year),
                question_count = COALESCE($3, question_count)
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(payload.title)
        .bind(payload.year)
        .bind(payload.question_count)
        .bind(exam_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Exam not found".to_string()))?;

        Ok(exam)
    }

    /// Registers or replaces the exam's set for one class. The
    /// (exam, class) pair is unique; re-registering it swaps the question
    /// list and answer key in place rather than creating a duplicate.
    pub async fn upsert_exam_class(
        &self,
        exam_id: Uuid,
        payload: UpsertExamClassRequest,
    ) -> Result<ExamClass> {
        let class = ClassLevel::from_designator(&payload.class_level)
            .ok_or_else(|| Error::InvalidClass(payload.class_level.clone()))?;

        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM exams WHERE id = $1)")
            .bind(exam_id)
            .fetch_one(&self.pool)
            .await?;
        if !exists {
            return Err(Error::NotFound("Exam not found".to_string()));
        }

        let answer_key = serde_json::to_value(&payload.answer_key)?;
        let exam_class = sqlx::query_as::<_, ExamClass>(
            r#"
            INSERT INTO exam_classes (exam_id, class_level, set_name, questions, answer_key)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (exam_id, class_level) DO UPDATE SET
                set_name = EXCLUDED.set_name,
                questions = EXCLUDED.questions,
                answer_key = EXCLUDED.answer_key,
                created_at = NOW()
            RETURNING *
            "#,
        )
        .bind(exam_id)
        .bind(class.designator())
        .bind(&payload.set_name)
        .bind(&payload.questions)
        .bind(answer_key)
        .fetch_one(&self.pool)
        .await?;

        Ok(exam_class)
    }

    pub async fn get_answer_key(&self, exam_id: Uuid, class_id: Uuid) -> Result<JsonValue> {
        let key: Option<JsonValue> =
            sqlx::query_scalar("SELECT answer_key FROM exam_classes WHERE exam_id = $1 AND id = $2")
                .bind(exam_id)
                .bind(class_id)
                .fetch_optional(&self.pool)
                .await?;

        key.ok_or_else(|| Error::NotFound("Answer key not found".to_string()))
    }

    /// Removes an exam, its per-class sets, and every dependent submission
    /// and result row as one transaction. Rolls back whole on any failure;
    /// a missing exam is `NotFound`, never a silent success.
    pub async fn delete_exam(&self, exam_id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        self.delete_dependents(&mut tx, exam_id, None).await?;

        sqlx::query("DELETE FROM exam_classes WHERE exam_id = $1")
            .bind(exam_id)
            .execute(&mut *tx)
            .await?;

        let deleted = sqlx::query("DELETE FROM exams WHERE id = $1")
            .bind(exam_id)
            .execute(&mut *tx)
            .await?;
        if deleted.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(Error::NotFound("Exam not found".to_string()));
        }

        tx.commit().await?;
        Ok(())
    }

    /// Class-scoped variant of [`delete_exam`](Self::delete_exam).
    pub async fn delete_exam_class(&self, exam_id: Uuid, class_id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        self.delete_dependents(&mut tx, exam_id, Some(class_id)).await?;

        let deleted = sqlx::query("DELETE FROM exam_classes WHERE id = $1 AND exam_id = $2")
            .bind(class_id)
            .bind(exam_id)
            .execute(&mut *tx)
            .await?;
        if deleted.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(Error::NotFound("Exam class not found".to_string()));
        }

        tx.commit().await?;
        Ok(())
    }

    /// Dependent submission/result rows go before their target. Tables the
    /// deployment never created are skipped per the startup probe; any
    /// other failure aborts the caller's transaction.
    async fn delete_dependents(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        exam_id: Uuid,
        class_id: Option<Uuid>,
    ) -> Result<()> {
        for (table, present) in [
            ("submitted_answers", self.capabilities.submitted_answers),
            ("results", self.capabilities.results),
        ] {
            if !present {
                tracing::warn!(table, %exam_id, "table absent in this deployment; skipping dependent delete");
                continue;
            }
            let sql = match class_id {
                Some(_) => format!("DELETE FROM {} WHERE exam_id = $1 AND class_id = $2", table),
                None => format!("DELETE FROM {} WHERE exam_id = $1", table),
            };
            let mut query = sqlx::query(&sql).bind(exam_id);
            if let Some(class_id) = class_id {
                query = query.bind(class_id);
            }
            query.execute(&mut **tx).await?;
        }
        Ok(())
    }
}
