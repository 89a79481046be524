pub mod domain;
pub mod ports;
pub mod service;
pub mod ticket_use_cases;
