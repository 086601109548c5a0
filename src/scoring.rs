use std::collections::HashMap;

use crate::model::Quiz;

/// Result of scoring one answer set against one quiz definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scored {
    pub score: i64,
    pub total_points: i64,
}

/// Score an answer set against a resolved quiz. Pure: no side effects, no
/// I/O, and the result is independent of the iteration order of either the
/// questions or the answer map.
///
/// A question earns its points iff `answers[question.id]` exists and equals
/// the question's correct index. Missing answers, out-of-range or negative
/// indices, and keys that match no question are all silently incorrect;
/// malformed answers are never an error. `total_points` is recomputed from
/// the quiz's current questions on every call; callers capture it on the
/// Submission at record time.
pub fn score(quiz: &Quiz, answers: &HashMap<String, i64>) -> Scored {
    let mut total_points: i64 = 0;
    let mut earned: i64 = 0;

    for question in &quiz.questions {
        total_points += question.points;
        if answers.get(&question.id) == Some(&(question.correct_answer as i64)) {
            earned += question.points;
        }
    }

    Scored {
        score: earned,
        total_points,
    }
}
