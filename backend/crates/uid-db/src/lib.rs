pub mod connection;
pub mod error;
pub mod repositories;
pub mod store;

pub use connection::{connect, connect_in_memory};
pub use error::{DbError, Result};
pub use repositories::migration_state_repository::MigrationStateRepository;
pub use repositories::serial_counter_repository::SerialCounterRepository;
pub use repositories::user_repository::UserRepository;
pub use store::sqlite_record_store::SqliteRecordStore;
