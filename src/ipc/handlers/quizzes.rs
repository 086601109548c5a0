use serde_json::json;

use crate::ipc::error::{err, ok, service_err};
use crate::ipc::helpers::{engine, optional_str, required_bool, required_str};
use crate::ipc::types::{AppState, Request};
use crate::model::{QuizDraft, QuizPatch};

fn handle_quizzes_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    // A dashboard may poll before a workspace is selected; answer with an
    // empty catalog instead of an error.
    let Some(engine) = state.engine.as_ref() else {
        return ok(&req.id, json!({ "quizzes": [] }));
    };

    let teacher_id = optional_str(req, "teacherId");
    let quizzes = engine.list_quizzes(teacher_id.as_deref());
    ok(&req.id, json!({ "quizzes": quizzes }))
}

fn handle_quizzes_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    let engine = match engine(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let quiz_id = match required_str(req, "quizId") {
        Ok(v) => v,
        Err(e) => return e,
    };

    match engine.get_quiz(&quiz_id) {
        Ok(quiz) => ok(&req.id, json!({ "quiz": quiz })),
        Err(e) => service_err(&req.id, &e),
    }
}

fn handle_quizzes_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let engine = match engine(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let Some(quiz_val) = req.params.get("quiz") else {
        return err(&req.id, "bad_params", "missing quiz", None);
    };
    let draft: QuizDraft = match serde_json::from_value(quiz_val.clone()) {
        Ok(v) => v,
        Err(e) => {
            return err(&req.id, "bad_params", format!("malformed quiz: {}", e), None);
        }
    };

    match engine.create_quiz(draft) {
        Ok(quiz) => ok(&req.id, json!({ "quiz": quiz })),
        Err(e) => service_err(&req.id, &e),
    }
}

fn handle_quizzes_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    let engine = match engine(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let quiz_id = match required_str(req, "quizId") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let Some(patch_obj) = req.params.get("patch").and_then(|v| v.as_object()) else {
        return err(&req.id, "bad_params", "missing patch", None);
    };

    let mut patch = QuizPatch::default();
    if let Some(v) = patch_obj.get("title") {
        let Some(title) = v.as_str() else {
            return err(&req.id, "bad_params", "patch.title must be a string", None);
        };
        patch.title = Some(title.to_string());
    }
    if let Some(v) = patch_obj.get("description") {
        let Some(description) = v.as_str() else {
            return err(&req.id, "bad_params", "patch.description must be a string", None);
        };
        patch.description = Some(description.to_string());
    }
    if let Some(v) = patch_obj.get("questions") {
        match serde_json::from_value(v.clone()) {
            Ok(questions) => patch.questions = Some(questions),
            Err(e) => {
                return err(
                    &req.id,
                    "bad_params",
                    format!("malformed patch.questions: {}", e),
                    None,
                );
            }
        }
    }
    if let Some(v) = patch_obj.get("isActive") {
        let Some(is_active) = v.as_bool() else {
            return err(&req.id, "bad_params", "patch.isActive must be a boolean", None);
        };
        patch.is_active = Some(is_active);
    }
    if let Some(v) = patch_obj.get("timeLimit") {
        // Explicit null clears the limit; a number replaces it.
        if v.is_null() {
            patch.time_limit = Some(None);
        } else {
            let Some(minutes) = v.as_i64() else {
                return err(
                    &req.id,
                    "bad_params",
                    "patch.timeLimit must be a number or null",
                    None,
                );
            };
            patch.time_limit = Some(Some(minutes));
        }
    }

    match engine.update_quiz(&quiz_id, patch) {
        Ok(quiz) => ok(&req.id, json!({ "quiz": quiz })),
        Err(e) => service_err(&req.id, &e),
    }
}

fn handle_quizzes_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let engine = match engine(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let quiz_id = match required_str(req, "quizId") {
        Ok(v) => v,
        Err(e) => return e,
    };

    match engine.delete_quiz(&quiz_id) {
        Ok(deleted) => ok(&req.id, json!({ "deleted": deleted })),
        Err(e) => service_err(&req.id, &e),
    }
}

fn handle_quizzes_set_active(state: &mut AppState, req: &Request) -> serde_json::Value {
    let engine = match engine(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let quiz_id = match required_str(req, "quizId") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let is_active = match required_bool(req, "isActive") {
        Ok(v) => v,
        Err(e) => return e,
    };

    match engine.set_active(&quiz_id, is_active) {
        Ok(quiz) => ok(&req.id, json!({ "quiz": quiz })),
        Err(e) => service_err(&req.id, &e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "quizzes.list" => Some(handle_quizzes_list(state, req)),
        "quizzes.get" => Some(handle_quizzes_get(state, req)),
        "quizzes.create" => Some(handle_quizzes_create(state, req)),
        "quizzes.update" => Some(handle_quizzes_update(state, req)),
        "quizzes.delete" => Some(handle_quizzes_delete(state, req)),
        "quizzes.setActive" => Some(handle_quizzes_set_active(state, req)),
        _ => None,
    }
}
