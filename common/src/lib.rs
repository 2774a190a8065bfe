pub mod cpu_features;
pub mod file_format;
pub mod log_setup;
pub mod ready_state;
