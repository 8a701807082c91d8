//! Payment intake handlers.

mod ingest_payment;

pub use ingest_payment::{IngestOutcome, IngestPaymentCommand, IngestPaymentHandler};
