use serde_json::json;

use crate::ipc::error::{ok, service_err};
use crate::ipc::helpers::{engine, required_str};
use crate::ipc::types::{AppState, Request};

fn handle_sessions_start(state: &mut AppState, req: &Request) -> serde_json::Value {
    let engine = match engine(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let quiz_id = match required_str(req, "quizId") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let teacher_id = match required_str(req, "teacherId") {
        Ok(v) => v,
        Err(e) => return e,
    };

    match engine.start_session(&quiz_id, &teacher_id) {
        Ok(session) => ok(&req.id, json!({ "session": session })),
        Err(e) => service_err(&req.id, &e),
    }
}

fn handle_sessions_stop(state: &mut AppState, req: &Request) -> serde_json::Value {
    let engine = match engine(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let session_id = match required_str(req, "sessionId") {
        Ok(v) => v,
        Err(e) => return e,
    };

    match engine.stop_session(&session_id) {
        Ok(session) => ok(&req.id, json!({ "session": session })),
        Err(e) => service_err(&req.id, &e),
    }
}

fn handle_sessions_join(state: &mut AppState, req: &Request) -> serde_json::Value {
    let engine = match engine(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let session_id = match required_str(req, "sessionId") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let student_id = match required_str(req, "studentId") {
        Ok(v) => v,
        Err(e) => return e,
    };

    match engine.join_session(&session_id, &student_id) {
        Ok(session) => ok(&req.id, json!({ "session": session })),
        Err(e) => service_err(&req.id, &e),
    }
}

fn handle_sessions_live(state: &mut AppState, req: &Request) -> serde_json::Value {
    let engine = match engine(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let quiz_id = match required_str(req, "quizId") {
        Ok(v) => v,
        Err(e) => return e,
    };

    // No live session is a normal answer, not an error.
    ok(&req.id, json!({ "session": engine.live_session(&quiz_id) }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "sessions.start" => Some(handle_sessions_start(state, req)),
        "sessions.stop" => Some(handle_sessions_stop(state, req)),
        "sessions.join" => Some(handle_sessions_join(state, req)),
        "sessions.live" => Some(handle_sessions_live(state, req)),
        _ => None,
    }
}
