mod test_support;

use serde_json::json;
use test_support::{error_code, request, request_ok, spawn_sidecar, temp_dir};

#[test]
fn live_sessions_bucket_submissions_until_stopped() {
    let workspace = temp_dir("quizdesk-session-attribution");
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    let created = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "quizzes.create",
        json!({
            "quiz": {
                "title": "Pop Quiz",
                "description": "live round",
                "teacherId": "teacher-1",
                "isActive": true,
                "questions": [
                    {
                        "id": "q1",
                        "prompt": "Capital of France?",
                        "options": ["Lyon", "Paris"],
                        "correctAnswer": 1,
                        "points": 5
                    }
                ]
            }
        }),
    );
    let quiz_id = created["quiz"]["id"].as_str().expect("quiz id").to_string();

    // Starting a session against a missing quiz is refused.
    let bogus = request(
        &mut stdin,
        &mut reader,
        "3",
        "sessions.start",
        json!({ "quizId": "no-such-quiz", "teacherId": "teacher-1" }),
    );
    assert_eq!(error_code(&bogus), "not_found");

    // No session is live yet.
    let idle = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "sessions.live",
        json!({ "quizId": quiz_id }),
    );
    assert!(idle["session"].is_null());

    let started = request_ok(
        &mut stdin,
        &mut reader,
        "5",
        "sessions.start",
        json!({ "quizId": quiz_id, "teacherId": "teacher-1" }),
    );
    let session_id = started["session"]["id"]
        .as_str()
        .expect("session id")
        .to_string();
    assert_eq!(started["session"]["isLive"], true);

    // Rejoining collapses into one participant entry.
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "6",
        "sessions.join",
        json!({ "sessionId": session_id, "studentId": "student-1" }),
    );
    let joined = request_ok(
        &mut stdin,
        &mut reader,
        "7",
        "sessions.join",
        json!({ "sessionId": session_id, "studentId": "student-1" }),
    );
    assert_eq!(
        joined["session"]["participants"],
        json!(["student-1"])
    );

    // A submission while live lands inside the session bucket.
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "8",
        "submissions.submit",
        json!({
            "quizId": quiz_id,
            "studentId": "student-1",
            "studentName": "Alex Rodriguez",
            "answers": { "q1": 1 },
            "timeSpentSeconds": 20
        }),
    );
    let live = request_ok(
        &mut stdin,
        &mut reader,
        "9",
        "sessions.live",
        json!({ "quizId": quiz_id }),
    );
    let bucketed = live["session"]["submissions"].as_array().expect("array");
    assert_eq!(bucketed.len(), 1);
    assert_eq!(bucketed[0]["score"], 5);

    // After the stop, later submissions reach the ledger only.
    let stopped = request_ok(
        &mut stdin,
        &mut reader,
        "10",
        "sessions.stop",
        json!({ "sessionId": session_id }),
    );
    assert_eq!(stopped["session"]["isLive"], false);
    assert_eq!(
        stopped["session"]["submissions"]
            .as_array()
            .expect("array")
            .len(),
        1
    );

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "11",
        "submissions.submit",
        json!({
            "quizId": quiz_id,
            "studentId": "student-2",
            "studentName": "Jordan Lee",
            "answers": { "q1": 0 },
            "timeSpentSeconds": 25
        }),
    );
    let after = request_ok(
        &mut stdin,
        &mut reader,
        "12",
        "sessions.live",
        json!({ "quizId": quiz_id }),
    );
    assert!(after["session"].is_null());

    let results = request_ok(
        &mut stdin,
        &mut reader,
        "13",
        "results.byQuiz",
        json!({ "quizId": quiz_id }),
    );
    assert_eq!(results["submissions"].as_array().expect("array").len(), 2);

    drop(stdin);
    let _ = child.wait();
    let _ = std::fs::remove_dir_all(workspace);
}
