use serde_json::json;

use crate::ipc::error::ok;
use crate::ipc::helpers::{engine, required_str};
use crate::ipc::types::{AppState, Request};
use crate::stats::round1;

fn handle_stats_quiz(state: &mut AppState, req: &Request) -> serde_json::Value {
    let engine = match engine(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let quiz_id = match required_str(req, "quizId") {
        Ok(v) => v,
        Err(e) => return e,
    };

    // A quiz deleted after submissions arrived reads as the empty set, so
    // dashboard tiles for it degrade to zeros instead of erroring.
    let mut stats = engine.stats_for_quiz(&quiz_id);
    stats.average_score = round1(stats.average_score);
    stats.average_percentage = round1(stats.average_percentage);
    stats.average_time_seconds = round1(stats.average_time_seconds);
    ok(&req.id, json!({ "stats": stats }))
}

fn handle_stats_student(state: &mut AppState, req: &Request) -> serde_json::Value {
    let engine = match engine(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let student_id = match required_str(req, "studentId") {
        Ok(v) => v,
        Err(e) => return e,
    };

    let mut stats = engine.stats_for_student(&student_id);
    stats.average_percentage = round1(stats.average_percentage);
    ok(&req.id, json!({ "stats": stats }))
}

fn handle_stats_owner(state: &mut AppState, req: &Request) -> serde_json::Value {
    let engine = match engine(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let teacher_id = match required_str(req, "teacherId") {
        Ok(v) => v,
        Err(e) => return e,
    };

    let overview = engine.overview_for_owner(&teacher_id);
    ok(&req.id, json!({ "overview": overview }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "stats.quiz" => Some(handle_stats_quiz(state, req)),
        "stats.student" => Some(handle_stats_student(state, req)),
        "stats.owner" => Some(handle_stats_owner(state, req)),
        _ => None,
    }
}
