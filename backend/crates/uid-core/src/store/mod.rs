pub mod change_notification;
pub mod memory_store;
pub mod monotonic_clock;
pub mod record_store;
pub mod write_batch;
