pub mod dispatch;
pub mod generator;
pub mod ingest;
