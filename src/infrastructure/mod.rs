//! Platform integration: where configuration and trace files live.

pub mod paths;

pub use paths::{data_dir, default_config_path, default_trace_path};
