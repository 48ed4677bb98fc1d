//! Presentation components of the deployment page

pub mod deploy_form;
pub mod favicon;
pub mod layout;
pub mod log_appender;
pub mod signals;
pub mod terminal;
pub mod views;
