pub mod health;
pub mod notifications;
pub mod push_tokens;
