pub mod dispatcher;
pub mod message;
pub mod provider;
pub mod retry;

pub use dispatcher::{DispatchError, DispatchHandle, DispatchOutcome, Dispatcher, FailureKind};
pub use message::Message;
pub use provider::{DeliveryClient, DeliveryError};
pub use retry::RetryPolicy;
