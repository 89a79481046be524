pub mod auth;
pub mod storage;
pub mod ticket;
pub mod user;
