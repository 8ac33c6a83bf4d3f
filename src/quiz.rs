//! Quiz grading.
//!
//! Pure functions over a module's question list and the learner's selected
//! answers; recording the result into the store is a separate step
//! (`StateStore::record_quiz_result`).

use serde::Serialize;

use crate::config::QUIZ_PASS_PERCENT;
use crate::content::QuizQuestion;

/// Graded result of one quiz attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuizOutcome {
    pub correct: u32,
    pub total: u32,
    /// Rounded percentage of correct answers; 0 for an empty quiz
    pub percent: u32,
}

impl QuizOutcome {
    pub fn new(correct: u32, total: u32) -> Self {
        let percent = if total == 0 {
            0
        } else {
            ((correct as f64 / total as f64) * 100.0).round() as u32
        };
        Self {
            correct,
            total,
            percent,
        }
    }

    pub fn passed(&self) -> bool {
        self.percent >= QUIZ_PASS_PERCENT
    }
}

/// Grade a set of selected answers against the module's questions.
///
/// `answers[i]` is the option index the learner chose for question `i`;
/// `None` (unanswered), a missing trailing entry, or an out-of-range
/// selection all count as wrong.
pub fn grade(answers: &[Option<usize>], questions: &[QuizQuestion]) -> QuizOutcome {
    let correct = questions
        .iter()
        .enumerate()
        .filter(|(i, q)| {
            answers
                .get(*i)
                .copied()
                .flatten()
                .is_some_and(|selected| selected < q.options.len() && selected == q.answer)
        })
        .count() as u32;
    QuizOutcome::new(correct, questions.len() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(answer: usize) -> QuizQuestion {
        QuizQuestion {
            question: "Q?".into(),
            options: vec!["a".into(), "b".into(), "c".into()],
            answer,
            explanation: String::new(),
        }
    }

    #[test]
    fn test_grade_counts_correct_answers() {
        let questions = vec![question(0), question(2), question(1)];
        let outcome = grade(&[Some(0), Some(2), Some(0)], &questions);
        assert_eq!(outcome.correct, 2);
        assert_eq!(outcome.total, 3);
        assert_eq!(outcome.percent, 67);
    }

    #[test]
    fn test_grade_unanswered_counts_wrong() {
        let questions = vec![question(0), question(1)];
        let outcome = grade(&[None, Some(1)], &questions);
        assert_eq!(outcome.correct, 1);

        // Missing trailing answers count wrong too
        let outcome = grade(&[Some(0)], &questions);
        assert_eq!(outcome.correct, 1);
    }

    #[test]
    fn test_grade_out_of_range_selection_counts_wrong() {
        let questions = vec![question(0)];
        let outcome = grade(&[Some(9)], &questions);
        assert_eq!(outcome.correct, 0);
    }

    #[test]
    fn test_grade_empty_quiz() {
        let outcome = grade(&[], &[]);
        assert_eq!(outcome.total, 0);
        assert_eq!(outcome.percent, 0);
        assert!(!outcome.passed());
    }

    #[test]
    fn test_pass_threshold() {
        // 70% is the fixed pass mark
        assert!(QuizOutcome::new(7, 10).passed());
        assert!(!QuizOutcome::new(6, 10).passed());
        // 5/7 = 71.4 rounds to 71, passing
        assert!(QuizOutcome::new(5, 7).passed());
    }
}
