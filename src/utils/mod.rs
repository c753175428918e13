pub mod crypto;
pub mod time;
pub mod token;
pub mod wire_json;
