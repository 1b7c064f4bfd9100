//! Tracing setup with optional file-based span export.
//!
//! ```text
//! tracing macros ─┬─> fmt layer (stderr)
//!                 └─> tracing-opentelemetry ─> FileSpanExporter ─> <trace_file>[.1 .2 .3]
//! ```
//!
//! The level is taken from `RUST_LOG`, then the `trace_level` config option, then
//! `info`. Span export is enabled by setting `trace_file`; each finished span is
//! one JSON line, and the file rotates at 5 MiB keeping three backups.
//!
//! - [`init`]: subscriber setup
//! - [`tracer`]: span exporter and tracer provider
//! - [`span_formatter`]: span to JSON rendering
//! - [`file_writer`]: rotating line writer

mod file_writer;
mod init;
mod span_formatter;
mod tracer;

pub use file_writer::{FileWriter, MAX_BACKUP_FILES, MAX_FILE_SIZE_BYTES};
pub use init::{init_tracing, SERVICE_NAME};
pub use tracer::create_tracer_provider;
