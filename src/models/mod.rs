pub mod config;
pub mod job;
pub mod job_kind;
pub mod plugin;
pub mod status;
