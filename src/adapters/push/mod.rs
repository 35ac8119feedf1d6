pub mod fcm;
pub mod google_token;
pub mod log_only;
