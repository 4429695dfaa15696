pub mod retry;
pub mod store;

pub use retry::{connect_with_retry, ConnectError, RetryPolicy};
pub use store::ResultCache;
