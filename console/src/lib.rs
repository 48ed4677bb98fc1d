//! Deployment Console Library
//!
//! Live log rendering and derived page state for Applikatoni deployments.

pub mod app;
pub mod errors;
pub mod filesys;
pub mod http;
pub mod logs;
pub mod models;
pub mod render;
pub mod storage;
pub mod stream;
pub mod ui;
pub mod utils;
