pub mod http;
pub mod provider;
pub mod types;
