//! Data models

pub mod github;
pub mod log_entry;
