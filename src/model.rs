use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One multiple-choice question. `correct_answer` is a 0-based index into
/// `options`; `points` is the credit awarded for selecting that index.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    pub points: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: String,
    pub title: String,
    pub description: String,
    pub teacher_id: String,
    pub questions: Vec<Question>,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Quiz {
    /// Total possible score: the sum of question points, recomputed on
    /// demand and never cached on the record.
    pub fn total_points(&self) -> i64 {
        self.questions.iter().map(|q| q.points).sum()
    }
}

/// Input for quiz creation: a `Quiz` minus the engine-assigned id and
/// timestamps. Mirrors the shape the dashboard form posts.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizDraft {
    pub title: String,
    pub description: String,
    pub teacher_id: String,
    pub questions: Vec<Question>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub time_limit: Option<i64>,
}

/// Field-merge patch for quiz updates. Built explicitly by the IPC layer so
/// "absent" and "present but null" stay distinguishable for `time_limit`
/// (`Some(None)` clears the limit).
#[derive(Debug, Clone, Default)]
pub struct QuizPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub questions: Option<Vec<Question>>,
    pub is_active: Option<bool>,
    pub time_limit: Option<Option<i64>>,
}

/// One learner's scored attempt. Immutable once created: corrections are a
/// new Submission, never an edit. `total_points` is captured at submission
/// time and never recomputed, even if the quiz is edited later.
///
/// `answers` values are signed so hostile or stale option indices arrive
/// intact and simply score as incorrect instead of failing to parse.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: String,
    pub quiz_id: String,
    pub student_id: String,
    pub student_name: String,
    pub answers: HashMap<String, i64>,
    pub score: i64,
    pub total_points: i64,
    pub submitted_at: DateTime<Utc>,
    pub time_spent: i64,
}

impl Submission {
    /// Display percentage against the captured total (0 when totals are 0).
    pub fn percentage(&self) -> f64 {
        if self.total_points > 0 {
            100.0 * self.score as f64 / self.total_points as f64
        } else {
            0.0
        }
    }
}

/// Passive record that a quiz is being administered live. Buckets the
/// submissions received while `is_live`; carries no broadcast semantics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub quiz_id: String,
    pub teacher_id: String,
    pub is_live: bool,
    pub started_at: DateTime<Utc>,
    pub participants: Vec<String>,
    pub submissions: Vec<Submission>,
}
