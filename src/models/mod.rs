pub mod api_key;
pub mod brand;
pub mod company;
pub mod contact;
pub mod invoice;
pub mod planning_info;
pub mod status_update;
pub mod user;
pub mod webhook;
pub mod webhook_log;
