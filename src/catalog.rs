use std::collections::HashSet;

use uuid::Uuid;

use crate::engine::Engine;
use crate::error::ServiceError;
use crate::model::{Question, Quiz, QuizDraft, QuizPatch};

/// Quiz catalog: authoring-side CRUD over the quiz collection.
impl Engine {
    /// Validates the draft, assigns identity and timestamps, persists.
    /// Nothing is stored when validation or persistence fails.
    pub fn create_quiz(&self, draft: QuizDraft) -> Result<Quiz, ServiceError> {
        validate_quiz(&draft.title, &draft.description, &draft.questions)?;

        let mut inner = self.write();
        let now = inner.now();
        let quiz = Quiz {
            id: Uuid::new_v4().to_string(),
            title: draft.title,
            description: draft.description,
            teacher_id: draft.teacher_id,
            questions: draft.questions,
            is_active: draft.is_active,
            time_limit: draft.time_limit,
            created_at: now,
            updated_at: now,
        };

        inner.quizzes.push(quiz.clone());
        if let Err(e) = inner.save_quizzes() {
            inner.quizzes.pop();
            return Err(e);
        }
        Ok(quiz)
    }

    pub fn get_quiz(&self, quiz_id: &str) -> Result<Quiz, ServiceError> {
        let inner = self.read();
        inner
            .quizzes
            .iter()
            .find(|q| q.id == quiz_id)
            .cloned()
            .ok_or_else(|| ServiceError::not_found(format!("quiz '{quiz_id}' not found")))
    }

    /// With an owner id: everything that instructor owns, active or not.
    /// Without: the learner view, active quizzes only. Insertion order.
    pub fn list_quizzes(&self, owner: Option<&str>) -> Vec<Quiz> {
        let inner = self.read();
        match owner {
            Some(teacher_id) => inner
                .quizzes
                .iter()
                .filter(|q| q.teacher_id == teacher_id)
                .cloned()
                .collect(),
            None => inner
                .quizzes
                .iter()
                .filter(|q| q.is_active)
                .cloned()
                .collect(),
        }
    }

    /// Merges the supplied fields, re-validates the merged record, refreshes
    /// `updatedAt`. `patch.time_limit = Some(None)` clears the time limit.
    pub fn update_quiz(&self, quiz_id: &str, patch: QuizPatch) -> Result<Quiz, ServiceError> {
        let mut inner = self.write();
        let Some(idx) = inner.quizzes.iter().position(|q| q.id == quiz_id) else {
            return Err(ServiceError::not_found(format!("quiz '{quiz_id}' not found")));
        };

        let mut updated = inner.quizzes[idx].clone();
        if let Some(title) = patch.title {
            updated.title = title;
        }
        if let Some(description) = patch.description {
            updated.description = description;
        }
        if let Some(questions) = patch.questions {
            updated.questions = questions;
        }
        if let Some(is_active) = patch.is_active {
            updated.is_active = is_active;
        }
        if let Some(time_limit) = patch.time_limit {
            updated.time_limit = time_limit;
        }
        validate_quiz(&updated.title, &updated.description, &updated.questions)?;
        updated.updated_at = inner.now();

        let prev = std::mem::replace(&mut inner.quizzes[idx], updated.clone());
        if let Err(e) = inner.save_quizzes() {
            inner.quizzes[idx] = prev;
            return Err(e);
        }
        Ok(updated)
    }

    /// Removes the quiz if present; deleting an absent id is not an error.
    /// Returns whether a quiz was actually removed. Submissions referencing
    /// the quiz stay in the ledger untouched.
    pub fn delete_quiz(&self, quiz_id: &str) -> Result<bool, ServiceError> {
        let mut inner = self.write();
        let Some(idx) = inner.quizzes.iter().position(|q| q.id == quiz_id) else {
            return Ok(false);
        };

        let removed = inner.quizzes.remove(idx);
        if let Err(e) = inner.save_quizzes() {
            inner.quizzes.insert(idx, removed);
            return Err(e);
        }
        Ok(true)
    }

    /// Visibility toggle, routed through the update path so `updatedAt`
    /// moves like any other edit.
    pub fn set_active(&self, quiz_id: &str, active: bool) -> Result<Quiz, ServiceError> {
        self.update_quiz(
            quiz_id,
            QuizPatch {
                is_active: Some(active),
                ..QuizPatch::default()
            },
        )
    }
}

fn validate_quiz(
    title: &str,
    description: &str,
    questions: &[Question],
) -> Result<(), ServiceError> {
    if title.trim().is_empty() {
        return Err(ServiceError::validation("quiz title must not be empty"));
    }
    if description.trim().is_empty() {
        return Err(ServiceError::validation(
            "quiz description must not be empty",
        ));
    }
    if questions.is_empty() {
        return Err(ServiceError::validation(
            "quiz must contain at least one question",
        ));
    }

    let mut seen = HashSet::new();
    for q in questions {
        if q.id.trim().is_empty() {
            return Err(ServiceError::validation("question id must not be empty"));
        }
        if !seen.insert(q.id.as_str()) {
            return Err(ServiceError::validation(format!(
                "duplicate question id '{}'",
                q.id
            )));
        }
        if q.options.len() < 2 {
            return Err(ServiceError::validation(format!(
                "question '{}' must offer at least 2 options",
                q.id
            )));
        }
        if q.correct_answer >= q.options.len() {
            return Err(ServiceError::validation(format!(
                "question '{}' correct answer index {} is out of range for {} options",
                q.id,
                q.correct_answer,
                q.options.len()
            )));
        }
        if q.points < 1 {
            return Err(ServiceError::validation(format!(
                "question '{}' must be worth at least 1 point",
                q.id
            )));
        }
    }
    Ok(())
}
