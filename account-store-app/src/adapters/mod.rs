//! Platform-agnostic storage adapters for non-browser frontends (CLI, TUI).

mod json_file_backend;

pub use json_file_backend::JsonFileBackend;
