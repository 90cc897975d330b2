use itertools::Itertools;
use std::error::Error;

/// Convert an io::error to a string and strip "(os error 2)" from the end.
fn io_error_to_string(err: &std::io::Error) -> String {
    let s = err.to_string();
    s.strip_suffix(&format!(" (os error {})", err.raw_os_error().unwrap_or(0)))
        .unwrap_or(&s)
        .to_string()
}

fn cause_to_string(err: &(dyn Error + 'static)) -> String {
    match err.downcast_ref::<std::io::Error>() {
        Some(io_err) => io_error_to_string(io_err),
        None => err.to_string(),
    }
}

/// Render an error and its causes, one per line.
pub fn error_chain_message(err: &anyhow::Error) -> String {
    err.chain()
        .map(cause_to_string)
        .join("\n\tCaused by: ")
}

/// Print an error chain.
pub fn print_error_chain(err: &anyhow::Error) {
    eprintln!("ERROR: {}", error_chain_message(err));
}
