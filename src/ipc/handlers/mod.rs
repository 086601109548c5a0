pub mod analytics;
pub mod core;
pub mod quizzes;
pub mod sessions;
pub mod submissions;
