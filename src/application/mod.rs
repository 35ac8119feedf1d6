pub mod app_error;
pub mod ports;
pub mod push_templates;
pub mod retry;
pub mod use_cases;
