use std::collections::HashMap;

use serde_json::json;

use crate::ipc::error::{err, ok, service_err};
use crate::ipc::helpers::{engine, required_i64, required_str};
use crate::ipc::types::{AppState, Request};
use crate::model::Submission;

/// Canonical display order for result lists. Ties (same timestamp) keep
/// ledger insertion order.
fn newest_first(mut submissions: Vec<Submission>) -> Vec<Submission> {
    submissions.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
    submissions
}

fn handle_submissions_submit(state: &mut AppState, req: &Request) -> serde_json::Value {
    let engine = match engine(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let quiz_id = match required_str(req, "quizId") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let student_id = match required_str(req, "studentId") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let student_name = match required_str(req, "studentName") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let time_spent = match required_i64(req, "timeSpentSeconds") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let Some(answers_val) = req.params.get("answers") else {
        return err(&req.id, "bad_params", "missing answers", None);
    };
    // Values are raw option indices; anything integral is accepted here and
    // scored (wrong answers included), so stale clients cannot wedge a submit.
    let answers: HashMap<String, i64> = match serde_json::from_value(answers_val.clone()) {
        Ok(v) => v,
        Err(e) => {
            return err(&req.id, "bad_params", format!("malformed answers: {}", e), None);
        }
    };

    match engine.record_submission(&quiz_id, &student_id, &student_name, answers, time_spent) {
        Ok(submission) => ok(&req.id, json!({ "submission": submission })),
        Err(e) => service_err(&req.id, &e),
    }
}

fn handle_results_by_quiz(state: &mut AppState, req: &Request) -> serde_json::Value {
    let engine = match engine(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let quiz_id = match required_str(req, "quizId") {
        Ok(v) => v,
        Err(e) => return e,
    };

    let submissions = newest_first(engine.submissions_by_quiz(&quiz_id));
    ok(&req.id, json!({ "submissions": submissions }))
}

fn handle_results_by_student(state: &mut AppState, req: &Request) -> serde_json::Value {
    let engine = match engine(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let student_id = match required_str(req, "studentId") {
        Ok(v) => v,
        Err(e) => return e,
    };

    let submissions = newest_first(engine.submissions_by_student(&student_id));
    ok(&req.id, json!({ "submissions": submissions }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "submissions.submit" => Some(handle_submissions_submit(state, req)),
        "results.byQuiz" => Some(handle_results_by_quiz(state, req)),
        "results.byStudent" => Some(handle_results_by_student(state, req)),
        _ => None,
    }
}
