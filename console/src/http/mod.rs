//! HTTP access to the dashboard backend

pub mod client;
pub mod kill;
pub mod sections;
