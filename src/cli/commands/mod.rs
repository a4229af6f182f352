pub mod alerts;
pub mod audit;
pub mod backup;
pub mod config;
pub mod dismiss;
pub mod export;
pub mod history;
pub mod ingest;
pub mod init;
pub mod log;
pub mod sprints;
pub mod tickets;
