pub mod postgres_device_repository;

pub use postgres_device_repository::*;
