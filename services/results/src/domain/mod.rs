pub mod address;
pub mod repository;
pub mod types;
