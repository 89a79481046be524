pub mod authenticate_service;

pub use authenticate_service::AuthenticateService;
