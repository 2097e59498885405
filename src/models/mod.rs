pub mod goal;
pub mod progress_log;
pub mod user;
