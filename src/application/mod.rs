/// Application configuration module
pub mod config;
/// Hub REST API client
pub mod hub_client;
/// Service interfaces
pub mod interfaces;
/// Services built on the clients
pub mod services;
/// Upsource RPC client
pub mod upsource_client;
