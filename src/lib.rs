//! Activity roster service: school activity listings with teacher-gated
//! enrollment over HTTP.

pub mod activity;
pub mod config;
pub mod credentials;
pub mod error;
pub mod http_server;
pub mod session;
pub mod state;
