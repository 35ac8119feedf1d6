pub mod boost_level;
pub mod demand;
pub mod external_reference;
pub mod inbound_event;
pub mod payment_status;
pub mod plan;
pub mod subscription_status;
pub mod user;
