pub mod crypto;
pub mod formidium_service;
pub mod transport;
