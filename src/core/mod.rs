pub mod alerts;
pub mod backup;
pub mod dismissals;
pub mod history;
pub mod ingest;
pub mod log;
pub mod metrics;
pub mod normalizer;
pub mod risk;
pub mod selection;
pub mod sprint;
