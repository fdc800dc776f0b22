//! Quiz Evaluator
//!
//! Pure scoring of a submitted answer sheet. One point per correct answer,
//! no partial credit, no negative marking.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::catalog::QuizQuestion;

/// Share of questions that must be answered correctly
pub const PASS_THRESHOLD_PERCENT: u32 = 70;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    #[error("Quiz has no questions")]
    Empty,

    #[error("Every question must be answered ({expected} answers expected, got {actual})")]
    AnswerCount { expected: usize, actual: usize },

    #[error("Answer to question {question} selects option {option}, which does not exist")]
    OptionOutOfRange { question: usize, option: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizScore {
    pub correct_count: u32,
    pub total: u32,
    /// Rounded to the nearest whole percent
    pub percentage: u8,
    pub required_correct: u32,
    pub passed: bool,
}

/// Correct answers needed to pass a quiz of `total` questions:
/// `ceil(0.7 * total)`, in integers.
pub fn required_correct(total: u32) -> u32 {
    (PASS_THRESHOLD_PERCENT * total).div_ceil(100)
}

/// Score `answers` (zero-based option indexes, one per question).
pub fn evaluate(questions: &[QuizQuestion], answers: &[usize]) -> Result<QuizScore, QuizError> {
    if questions.is_empty() {
        return Err(QuizError::Empty);
    }
    if answers.len() != questions.len() {
        return Err(QuizError::AnswerCount {
            expected: questions.len(),
            actual: answers.len(),
        });
    }

    let mut correct_count = 0u32;
    for (index, (question, &answer)) in questions.iter().zip(answers).enumerate() {
        if answer >= question.options.len() {
            return Err(QuizError::OptionOutOfRange {
                question: index + 1,
                option: answer,
            });
        }
        if answer == question.correct_option {
            correct_count += 1;
        }
    }

    let total = questions.len() as u32;
    let required = required_correct(total);
    let percentage = ((correct_count * 100 + total / 2) / total) as u8;

    Ok(QuizScore {
        correct_count,
        total,
        percentage,
        required_correct: required,
        passed: correct_count >= required,
    })
}
