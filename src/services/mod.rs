pub mod console_client;
pub mod registry;
pub mod schema;
pub mod status;
pub mod submission;
pub mod transcoder;
