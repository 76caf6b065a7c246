use crate::error::{Error, Result};
use crate::models::submission::AnswerMap;
use rust_decimal::Decimal;

/// Marks deducted per wrong answer.
const NEGATIVE_MARK: Decimal = Decimal::from_parts(25, 0, 0, false, 2);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub total_questions: i32,
    pub correct: i32,
    pub wrong: i32,
    pub skipped: i32,
    pub score: Decimal,
    pub percentage: Decimal,
}

pub struct ScoringService;

impl ScoringService {
    /// Marks `submitted` against `answer_key`. Comparison is case-sensitive;
    /// blank or missing answers count toward neither correct nor wrong.
    /// Score is `correct - 0.25 * wrong` and may go negative.
    pub fn evaluate(answer_key: &AnswerMap, submitted: &AnswerMap) -> Result<Evaluation> {
        if answer_key.is_empty() {
            return Err(Error::InvalidAnswerKey(
                "Answer key has no questions".to_string(),
            ));
        }

        let mut correct: i32 = 0;
        let mut wrong: i32 = 0;
        for (question, expected) in answer_key {
            match submitted.get(question) {
                Some(answer) if !answer.is_empty() => {
                    if answer == expected {
                        correct += 1;
                    } else {
                        wrong += 1;
                    }
                }
                _ => {}
            }
        }

        let total = answer_key.len() as i32;
        let score = Decimal::from(correct) - NEGATIVE_MARK * Decimal::from(wrong);
        let percentage =
            (Decimal::from(correct) * Decimal::from(100) / Decimal::from(total)).round_dp(2);

        Ok(Evaluation {
            total_questions: total,
            correct,
            wrong,
            skipped: total - correct - wrong,
            score,
            percentage,
        })
    }
}
