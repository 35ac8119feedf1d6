pub mod payment_processor;
pub mod push_notifier;
pub mod record_store;
