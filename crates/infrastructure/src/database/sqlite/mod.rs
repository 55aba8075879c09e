pub mod sqlite_device_repository;

pub use sqlite_device_repository::SqliteDeviceRepository;
