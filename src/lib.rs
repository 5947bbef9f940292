pub mod api;
pub mod config;
pub mod dispatch;
pub mod http_client;
pub mod provider;
pub mod render;
pub mod state;
pub mod teams;
pub mod transport;
