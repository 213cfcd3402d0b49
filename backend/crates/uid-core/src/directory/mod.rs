pub mod directory_state;
pub mod user_directory;
