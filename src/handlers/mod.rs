pub mod admin_progress;
pub mod health;
pub mod progress;
