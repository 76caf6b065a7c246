use crate::error::{Error, Result};
use crate::models::result::ExamResult;
use crate::models::submission::AnswerMap;
use crate::services::scoring_service::ScoringService;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, sqlx::FromRow)]
struct ResolvedKey {
    class_id: Uuid,
    answer_key: JsonValue,
}

/// Result row joined with participant and exam context for display.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct ResultWithContext {
    pub id: Uuid,
    pub participant_id: Uuid,
    pub exam_id: Uuid,
    pub class_id: Uuid,
    pub total_questions: i32,
    pub correct: i32,
    pub wrong: i32,
    pub score: Decimal,
    pub percentage: Decimal,
    pub evaluated_at: DateTime<Utc>,
    pub name: String,
    pub roll_number: String,
    pub school: String,
    pub class_level: String,
    pub title: String,
    pub year: i32,
}

#[derive(Clone)]
pub struct ResultService {
    pool: PgPool,
}

impl ResultService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Answer key for the addressed exam-class, constrained to the
    /// participant's own class. One lookup covers "participant exists",
    /// "set exists under this exam" and "set matches the participant's
    /// class"; any miss is the same `NotFound`.
    async fn resolve_key(
        &self,
        participant_id: Uuid,
        exam_id: Uuid,
        class_id: Uuid,
    ) -> Result<(Uuid, AnswerMap)> {
        let row = sqlx::query_as::<_, ResolvedKey>(
            r#"
            SELECT ec.id AS class_id, ec.answer_key
            FROM exam_classes ec
            JOIN participants p ON p.class_level = ec.class_level
            WHERE p.id = $1 AND ec.exam_id = $2 AND ec.id = $3
            "#,
        )
        .bind(participant_id)
        .bind(exam_id)
        .bind(class_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            Error::NotFound("No matching exam class for this participant".to_string())
        })?;

        let key: AnswerMap = serde_json::from_value(row.answer_key)?;
        Ok((row.class_id, key))
    }

    /// Evaluates `answers` against the stored key and upserts the raw
    /// submission and the computed result as one transaction, keyed by
    /// (participant, exam). Re-submission overwrites both rows and
    /// refreshes both timestamps.
    pub async fn submit(
        &self,
        participant_id: Uuid,
        exam_id: Uuid,
        class_id: Uuid,
        answers: &AnswerMap,
        submitted_by: Option<&str>,
    ) -> Result<ExamResult> {
        let (class_id, key) = self.resolve_key(participant_id, exam_id, class_id).await?;
        let marks = ScoringService::evaluate(&key, answers)?;
        let answers_json = serde_json::to_value(answers)?;

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO submitted_answers (participant_id, exam_id, class_id, answers, submitted_by)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (participant_id, exam_id) DO UPDATE SET
                class_id = EXCLUDED.class_id,
                answers = EXCLUDED.answers,
                submitted_by = EXCLUDED.submitted_by,
                submitted_at = NOW()
            "#,
        )
        .bind(participant_id)
        .bind(exam_id)
        .bind(class_id)
        .bind(&answers_json)
        .bind(submitted_by)
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query_as::<_, ExamResult>(
            r#"
            INSERT INTO results
                (participant_id, exam_id, class_id, total_questions, correct, wrong, score, percentage)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (participant_id, exam_id) DO UPDATE SET
                class_id = EXCLUDED.class_id,
                total_questions = EXCLUDED.total_questions,
                correct = EXCLUDED.correct,
                wrong = EXCLUDED.wrong,
                score = EXCLUDED.score,
                percentage = EXCLUDED.percentage,
                evaluated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(participant_id)
        .bind(exam_id)
        .bind(class_id)
        .bind(marks.total_questions)
        .bind(marks.correct)
        .bind(marks.wrong)
        .bind(marks.score)
        .bind(marks.percentage)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(result)
    }

    /// Re-evaluates new answers against the same stored key and overwrites
    /// both rows. Unlike [`submit`](Self::submit) this never inserts: a
    /// missing row is `NotFound` and nothing is written.
    pub async fn edit(
        &self,
        participant_id: Uuid,
        exam_id: Uuid,
        class_id: Uuid,
        answers: &AnswerMap,
    ) -> Result<ExamResult> {
        let (class_id, key) = self.resolve_key(participant_id, exam_id, class_id).await?;
        let marks = ScoringService::evaluate(&key, answers)?;
        let answers_json = serde_json::to_value(answers)?;

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE submitted_answers SET answers = $4, submitted_at = NOW()
            WHERE participant_id = $1 AND exam_id = $2 AND class_id = $3
            "#,
        )
        .bind(participant_id)
        .bind(exam_id)
        .bind(class_id)
        .bind(&answers_json)
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query_as::<_, ExamResult>(
            r#"
            UPDATE results SET
                total_questions = $4,
                correct = $5,
                wrong = $6,
                score = $7,
                percentage = $8,
                evaluated_at = NOW()
            WHERE participant_id = $1 AND exam_id = $2 AND class_id = $3
            RETURNING *
            "#,
        )
        .bind(participant_id)
        .bind(exam_id)
        .bind(class_id)
        .bind(marks.total_questions)
        .bind(marks.correct)
        .bind(marks.wrong)
        .bind(marks.score)
        .bind(marks.percentage)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(result) = result else {
            tx.rollback().await?;
            return Err(Error::NotFound("Result not found".to_string()));
        };

        tx.commit().await?;
        Ok(result)
    }

    /// Removes the submission and result rows for (participant, exam)
    /// atomically. `NotFound` when neither existed.
    pub async fn delete(&self, participant_id: Uuid, exam_id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let answers =
            sqlx::query("DELETE FROM submitted_answers WHERE participant_id = $1 AND exam_id = $2")
                .bind(participant_id)
                .bind(exam_id)
                .execute(&mut *tx)
                .await?;

        let results = sqlx::query("DELETE FROM results WHERE participant_id = $1 AND exam_id = $2")
            .bind(participant_id)
            .bind(exam_id)
            .execute(&mut *tx)
            .await?;

        if answers.rows_affected() == 0 && results.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(Error::NotFound("Result not found".to_string()));
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn list_by_roll(&self, roll: &str) -> Result<Vec<ResultWithContext>> {
        let rows = sqlx::query_as::<_, ResultWithContext>(
            r#"
            SELECT r.*, p.name, p.roll_number, p.school, p.class_level, e.title, e.year
            FROM results r
            JOIN participants p ON p.id = r.participant_id
            JOIN exams e ON e.id = r.exam_id
            WHERE p.roll_number = $1
            ORDER BY r.evaluated_at DESC
            "#,
        )
        .bind(roll)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
