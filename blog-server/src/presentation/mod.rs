pub mod handlers;
pub mod middleware;
pub mod submission;
pub mod templates;
