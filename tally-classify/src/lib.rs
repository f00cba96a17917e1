//! tally-classify: batches raw transactions to the external categorization
//! service and recovers canonical transactions from its replies.

pub mod gateway;
pub mod json_extract;
pub mod service;

pub use gateway::{ClassifierGateway, DEFAULT_BATCH_SIZE, DEFAULT_INTER_CALL_DELAY_MS};
pub use json_extract::extract_json_objects;
pub use service::{ClassificationService, GroqClient};
