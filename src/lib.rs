pub mod candidate_generator;
pub mod carrier;
pub mod config;
pub mod identifier;
pub mod issuer;
pub mod json_file_store;
pub mod metrics;
pub mod redis_used_number_store;
pub mod server;
pub mod session;
pub mod used_number_store;

pub use carrier::{classify, Carrier};
pub use issuer::{IssueError, NumberIssuer, RetryPolicy};
pub use used_number_store::{StoreError, UsedNumberStore};
