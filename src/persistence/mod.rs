pub mod files;

pub use files::{
    atomic_write, config_file, ensure_app_dir, log_file, read_optional, remove_if_exists,
    session_file,
};
