pub mod notification;
pub mod token_registry;
