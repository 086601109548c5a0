use serde::Serialize;

use crate::engine::Engine;
use crate::model::{Quiz, Submission};

/// 1-decimal half-up rounding used for displayed percentages and averages.
/// Applied at the presentation edge only; the fold results stay raw.
pub fn round1(x: f64) -> f64 {
    ((10.0 * x) + 0.5).floor() / 10.0
}

/// Dashboard view for one quiz.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizStats {
    pub participant_count: usize,
    pub average_score: f64,
    pub average_percentage: f64,
    pub average_time_seconds: f64,
}

/// Dashboard view for one student across all their submissions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentStats {
    pub total_quizzes_taken: usize,
    pub total_points_earned: i64,
    pub average_percentage: f64,
}

/// Instructor dashboard header counts over the quizzes they own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerOverview {
    pub total_quizzes: usize,
    pub active_quizzes: usize,
    pub total_questions: usize,
}

/// Per-quiz fold.
///
/// `averagePercentage` is computed against the quiz's **current** total
/// possible points, not the totals captured on each submission. Editing a
/// quiz's point values after the fact therefore shifts this view for old
/// submissions. That is intentional and deliberately different from
/// [`student_stats`], which uses captured totals. Do not unify the two.
pub fn quiz_stats(quiz: &Quiz, submissions: &[Submission]) -> QuizStats {
    if submissions.is_empty() {
        return QuizStats::default();
    }

    let count = submissions.len();
    let total_score: i64 = submissions.iter().map(|s| s.score).sum();
    let total_time: i64 = submissions.iter().map(|s| s.time_spent).sum();
    let possible = quiz.total_points();

    let average_percentage = if possible > 0 {
        100.0 * total_score as f64 / (count as f64 * possible as f64)
    } else {
        0.0
    };

    QuizStats {
        participant_count: count,
        average_score: total_score as f64 / count as f64,
        average_percentage,
        average_time_seconds: total_time as f64 / count as f64,
    }
}

/// Per-student fold.
///
/// `averagePercentage` uses **each submission's own captured totalPoints**
/// (`sum(score) / sum(totalPoints)`), so a student's history stays stable
/// when a quiz is edited later. Deliberately different from [`quiz_stats`],
/// which re-reads the quiz's current total. Do not unify the two.
pub fn student_stats(submissions: &[Submission]) -> StudentStats {
    if submissions.is_empty() {
        return StudentStats::default();
    }

    let total_score: i64 = submissions.iter().map(|s| s.score).sum();
    let total_possible: i64 = submissions.iter().map(|s| s.total_points).sum();

    let average_percentage = if total_possible > 0 {
        100.0 * total_score as f64 / total_possible as f64
    } else {
        0.0
    };

    StudentStats {
        total_quizzes_taken: submissions.len(),
        total_points_earned: total_score,
        average_percentage,
    }
}

pub fn owner_overview(quizzes: &[Quiz]) -> OwnerOverview {
    OwnerOverview {
        total_quizzes: quizzes.len(),
        active_quizzes: quizzes.iter().filter(|q| q.is_active).count(),
        total_questions: quizzes.iter().map(|q| q.questions.len()).sum(),
    }
}

/// Engine entry points: resolve the records under the read lock, then fold.
impl Engine {
    /// Stats for one quiz. An unknown id yields the empty-set result rather
    /// than an error: dashboards keep tiles for quizzes deleted after the
    /// submissions arrived.
    pub fn stats_for_quiz(&self, quiz_id: &str) -> QuizStats {
        let inner = self.read();
        let Some(quiz) = inner.quizzes.iter().find(|q| q.id == quiz_id) else {
            return QuizStats::default();
        };
        let submissions: Vec<Submission> = inner
            .submissions
            .iter()
            .filter(|s| s.quiz_id == quiz_id)
            .cloned()
            .collect();
        quiz_stats(quiz, &submissions)
    }

    pub fn stats_for_student(&self, student_id: &str) -> StudentStats {
        let inner = self.read();
        let submissions: Vec<Submission> = inner
            .submissions
            .iter()
            .filter(|s| s.student_id == student_id)
            .cloned()
            .collect();
        student_stats(&submissions)
    }

    pub fn overview_for_owner(&self, teacher_id: &str) -> OwnerOverview {
        let inner = self.read();
        let owned: Vec<Quiz> = inner
            .quizzes
            .iter()
            .filter(|q| q.teacher_id == teacher_id)
            .cloned()
            .collect();
        owner_overview(&owned)
    }
}
