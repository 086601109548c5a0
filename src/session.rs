use uuid::Uuid;

use crate::engine::Engine;
use crate::error::ServiceError;
use crate::model::Session;

/// Session registry: passive records that a quiz is being administered
/// live. The ledger attaches submissions to the first live session it finds
/// for the quiz; nothing here broadcasts or schedules anything.
impl Engine {
    pub fn start_session(&self, quiz_id: &str, teacher_id: &str) -> Result<Session, ServiceError> {
        let mut inner = self.write();
        if !inner.quizzes.iter().any(|q| q.id == quiz_id) {
            return Err(ServiceError::not_found(format!("quiz '{quiz_id}' not found")));
        }

        let session = Session {
            id: Uuid::new_v4().to_string(),
            quiz_id: quiz_id.to_string(),
            teacher_id: teacher_id.to_string(),
            is_live: true,
            started_at: inner.now(),
            participants: Vec::new(),
            submissions: Vec::new(),
        };

        inner.sessions.push(session.clone());
        if let Err(e) = inner.save_sessions() {
            inner.sessions.pop();
            return Err(e);
        }
        Ok(session)
    }

    /// Flips the session out of live mode. Stopping an already-stopped
    /// session is a no-op that still returns the record.
    pub fn stop_session(&self, session_id: &str) -> Result<Session, ServiceError> {
        let mut inner = self.write();
        let Some(idx) = inner.sessions.iter().position(|s| s.id == session_id) else {
            return Err(ServiceError::not_found(format!("session '{session_id}' not found")));
        };

        let was_live = inner.sessions[idx].is_live;
        inner.sessions[idx].is_live = false;
        if let Err(e) = inner.save_sessions() {
            inner.sessions[idx].is_live = was_live;
            return Err(e);
        }
        Ok(inner.sessions[idx].clone())
    }

    /// Adds the student to the participant set. Rejoining is a no-op and
    /// skips the persistence round-trip.
    pub fn join_session(
        &self,
        session_id: &str,
        student_id: &str,
    ) -> Result<Session, ServiceError> {
        let mut inner = self.write();
        let Some(idx) = inner.sessions.iter().position(|s| s.id == session_id) else {
            return Err(ServiceError::not_found(format!("session '{session_id}' not found")));
        };

        if !inner.sessions[idx]
            .participants
            .iter()
            .any(|p| p == student_id)
        {
            inner.sessions[idx].participants.push(student_id.to_string());
            if let Err(e) = inner.save_sessions() {
                inner.sessions[idx].participants.pop();
                return Err(e);
            }
        }
        Ok(inner.sessions[idx].clone())
    }

    /// The current live session for the quiz, if any. With overlapping live
    /// sessions the first started wins, same as ledger attachment.
    pub fn live_session(&self, quiz_id: &str) -> Option<Session> {
        self.read()
            .sessions
            .iter()
            .find(|s| s.quiz_id == quiz_id && s.is_live)
            .cloned()
    }
}
