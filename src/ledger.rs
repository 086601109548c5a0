use std::collections::HashMap;

use tracing::warn;
use uuid::Uuid;

use crate::engine::Engine;
use crate::error::ServiceError;
use crate::model::Submission;
use crate::scoring;

/// Submission ledger: append-only record of scored attempts and the single
/// source of truth for every derived statistic.
impl Engine {
    /// Scores the answers against the quiz as it exists right now and
    /// appends an immutable Submission. Holds the write lock across
    /// score-append-persist, so a failed persist rolls the append back and
    /// no partial submission is ever visible.
    pub fn record_submission(
        &self,
        quiz_id: &str,
        student_id: &str,
        student_name: &str,
        answers: HashMap<String, i64>,
        time_spent: i64,
    ) -> Result<Submission, ServiceError> {
        if student_id.trim().is_empty() {
            return Err(ServiceError::validation("student id must not be empty"));
        }
        if time_spent < 0 {
            return Err(ServiceError::validation("time spent must not be negative"));
        }

        let mut inner = self.write();
        let Some(quiz) = inner.quizzes.iter().find(|q| q.id == quiz_id) else {
            return Err(ServiceError::not_found(format!("quiz '{quiz_id}' not found")));
        };

        let scored = scoring::score(quiz, &answers);
        let submission = Submission {
            id: Uuid::new_v4().to_string(),
            quiz_id: quiz_id.to_string(),
            student_id: student_id.to_string(),
            student_name: student_name.to_string(),
            answers,
            score: scored.score,
            total_points: scored.total_points,
            submitted_at: inner.now(),
            time_spent,
        };

        inner.submissions.push(submission.clone());
        if let Err(e) = inner.save_submissions() {
            inner.submissions.pop();
            return Err(e);
        }

        // Best-effort live-session attach. The submission itself is already
        // durable; if the session snapshot fails to persist, the in-memory
        // attach stays and rides along with the next session write.
        let attached = match inner
            .sessions
            .iter_mut()
            .find(|s| s.quiz_id == quiz_id && s.is_live)
        {
            Some(session) => {
                session.submissions.push(submission.clone());
                true
            }
            None => false,
        };
        if attached {
            if let Err(e) = inner.save_sessions() {
                warn!(quiz_id, error = %e, "live session attach was not persisted");
            }
        }

        Ok(submission)
    }

    /// Snapshot of all submissions for one quiz, insertion order. Display
    /// ordering (newest first) is the presentation layer's job.
    pub fn submissions_by_quiz(&self, quiz_id: &str) -> Vec<Submission> {
        self.read()
            .submissions
            .iter()
            .filter(|s| s.quiz_id == quiz_id)
            .cloned()
            .collect()
    }

    /// Snapshot of all submissions by one student, insertion order.
    pub fn submissions_by_student(&self, student_id: &str) -> Vec<Submission> {
        self.read()
            .submissions
            .iter()
            .filter(|s| s.student_id == student_id)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, FixedClock};
    use crate::model::{Question, QuizDraft};
    use crate::store::MemStore;
    use chrono::{TimeZone, Utc};

    fn fixed_clock() -> FixedClock {
        FixedClock::new(Utc.with_ymd_and_hms(2024, 5, 10, 9, 0, 0).unwrap())
    }

    fn engine_with(store: MemStore, clock: FixedClock) -> Engine {
        Engine::open(Box::new(store), Box::new(clock)).expect("open engine")
    }

    fn two_question_draft(teacher_id: &str) -> QuizDraft {
        QuizDraft {
            title: "Fractions".into(),
            description: "Adding and comparing fractions".into(),
            teacher_id: teacher_id.into(),
            questions: vec![
                Question {
                    id: "q1".into(),
                    prompt: "1/2 + 1/4 = ?".into(),
                    options: vec!["3/4".into(), "2/6".into(), "1/8".into()],
                    correct_answer: 0,
                    points: 10,
                },
                Question {
                    id: "q2".into(),
                    prompt: "Which is larger?".into(),
                    options: vec!["2/5".into(), "3/7".into()],
                    correct_answer: 1,
                    points: 15,
                },
            ],
            is_active: true,
            time_limit: None,
        }
    }

    #[test]
    fn record_scores_against_the_current_quiz_and_captures_totals() {
        let clock = fixed_clock();
        let engine = engine_with(MemStore::new(), clock.clone());
        let quiz = engine
            .create_quiz(two_question_draft("teacher-1"))
            .expect("create quiz");

        // Q1 right, Q2 wrong.
        let answers = HashMap::from([("q1".to_string(), 0), ("q2".to_string(), 0)]);
        let sub = engine
            .record_submission(&quiz.id, "student-1", "Alex Rodriguez", answers, 95)
            .expect("record");

        assert_eq!(sub.score, 10);
        assert_eq!(sub.total_points, 25);
        assert_eq!(sub.percentage(), 40.0);
        assert_eq!(sub.submitted_at, clock.now());
        assert_eq!(sub.time_spent, 95);
        assert_eq!(sub.answers.len(), 2);

        let recorded = engine.submissions_by_quiz(&quiz.id);
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].id, sub.id);
    }

    #[test]
    fn record_for_unknown_quiz_appends_nothing() {
        let engine = engine_with(MemStore::new(), fixed_clock());
        let err = engine
            .record_submission("no-such-quiz", "student-1", "Alex", HashMap::new(), 10)
            .err()
            .expect("must fail");
        assert_eq!(err.code(), "not_found");
        assert!(engine.submissions_by_student("student-1").is_empty());
    }

    #[test]
    fn record_validates_student_id_and_elapsed_time() {
        let engine = engine_with(MemStore::new(), fixed_clock());
        let quiz = engine
            .create_quiz(two_question_draft("teacher-1"))
            .expect("create quiz");

        let blank = engine
            .record_submission(&quiz.id, "   ", "Alex", HashMap::new(), 10)
            .err()
            .expect("blank id must fail");
        assert_eq!(blank.code(), "validation");

        let negative = engine
            .record_submission(&quiz.id, "student-1", "Alex", HashMap::new(), -1)
            .err()
            .expect("negative time must fail");
        assert_eq!(negative.code(), "validation");

        assert!(engine.submissions_by_quiz(&quiz.id).is_empty());
    }

    #[test]
    fn failed_persistence_leaves_no_partial_submission() {
        let store = MemStore::new();
        let engine = engine_with(store.clone(), fixed_clock());
        let quiz = engine
            .create_quiz(two_question_draft("teacher-1"))
            .expect("create quiz");

        store.fail_next_save();
        let err = engine
            .record_submission(&quiz.id, "student-1", "Alex", HashMap::new(), 30)
            .err()
            .expect("must fail");
        assert_eq!(err.code(), "storage");
        assert!(engine.submissions_by_quiz(&quiz.id).is_empty());

        // The same submit succeeds once the store recovers.
        let sub = engine
            .record_submission(&quiz.id, "student-1", "Alex", HashMap::new(), 30)
            .expect("record after failure");
        assert_eq!(engine.submissions_by_quiz(&quiz.id).len(), 1);
        assert_eq!(sub.score, 0);
    }

    #[test]
    fn snapshots_filter_by_quiz_and_by_student() {
        let engine = engine_with(MemStore::new(), fixed_clock());
        let quiz_a = engine
            .create_quiz(two_question_draft("teacher-1"))
            .expect("create quiz a");
        let quiz_b = engine
            .create_quiz(two_question_draft("teacher-1"))
            .expect("create quiz b");

        for (quiz, student) in [
            (&quiz_a, "student-1"),
            (&quiz_a, "student-2"),
            (&quiz_b, "student-1"),
        ] {
            engine
                .record_submission(&quiz.id, student, "name", HashMap::new(), 5)
                .expect("record");
        }

        assert_eq!(engine.submissions_by_quiz(&quiz_a.id).len(), 2);
        assert_eq!(engine.submissions_by_quiz(&quiz_b.id).len(), 1);
        assert_eq!(engine.submissions_by_student("student-1").len(), 2);
        assert_eq!(engine.submissions_by_student("student-2").len(), 1);
        assert!(engine.submissions_by_student("student-3").is_empty());
    }
}
