//! Jenkins Job Console
//!
//! Job-configuration model and HTTP gateway for a Jenkins-style console
//! service: canonical status classification, a kind registry, per-kind
//! configuration schemas, and validated payload transcoding ahead of every
//! upstream create or update.

pub mod app_state;
pub mod config;
pub mod models;
pub mod routes;
pub mod services;
