/// Hub service interface
pub mod hub;
/// Upsource service interface
pub mod upsource;

pub use hub::HubService;
pub use upsource::UpsourceService;
