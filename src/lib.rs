pub mod config;
pub mod dns;
pub mod plugin;
pub mod secrets;
