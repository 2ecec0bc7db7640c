//! Logging utilities for the synoptic CLI.
//!
//! This module provides structured logging functionality so chart runs are
//! easy to time and debug from their log output.

use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Initialize the tracing subscriber with the given log level
pub fn init_tracing(log_level: &str) {
    let filter = match std::env::var("RUST_LOG") {
        Ok(val) => val,
        Err(_) => log_level.to_string(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

/// Log a start message for a significant operation
pub fn log_operation_start(operation: &str, details: Option<&str>) {
    if let Some(details) = details {
        info!(operation = operation, details = details, "Starting operation");
    } else {
        info!(operation = operation, "Starting operation");
    }
}

/// Log the completion of a significant operation
pub fn log_operation_end(operation: &str, start_time: Instant, success: bool) {
    let duration = start_time.elapsed();
    let duration_ms = duration.as_secs_f64() * 1000.0;

    if success {
        info!(
            operation = operation,
            duration_ms = duration_ms,
            "Operation completed successfully"
        );
    } else {
        warn!(
            operation = operation,
            duration_ms = duration_ms,
            "Operation completed with warnings"
        );
    }
}

/// Log an operation with timing and result in a single statement
pub fn log_timed_operation<F, R>(operation: &str, f: F) -> R
where
    F: FnOnce() -> R,
{
    let start = Instant::now();

    debug!(operation = operation, "Starting operation");

    let result = f();

    let duration = start.elapsed();
    info!(
        operation = operation,
        duration_ms = duration.as_secs_f64() * 1000.0,
        "Operation completed"
    );

    result
}

/// Log detailed information about the data loaded
pub fn log_data_load_stats(
    file_path: &str,
    var_count: usize,
    var_names: &[&str],
    dim_count: usize,
    dim_details: &str,
) {
    info!(
        operation = "data_load",
        file_path = file_path,
        var_count = var_count,
        vars = %var_names.join(", "),
        dim_count = dim_count,
        dims = dim_details,
        "Data loaded successfully"
    );
}

/// Log an error with context
pub fn log_error(error: &crate::error::SynopticError, context: &str) {
    error!(
        error = %error,
        context = context,
        error_type = std::any::type_name_of_val(error),
        "Error occurred"
    );
}
