pub mod api_dto;
pub mod client_dto;
pub mod management_dto;
pub mod webhook_dto;
