pub mod endpoints;
pub mod reports;
