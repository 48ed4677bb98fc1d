//! Integration tests for the deployment console

mod common;
mod test_session;
mod test_signals;
