//! Live deployment log stream

pub mod decoder;
pub mod session;
