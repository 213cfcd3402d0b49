pub mod sqlite_record_store;
