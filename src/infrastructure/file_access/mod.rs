//! File access infrastructure - filesystem-backed path guard

mod guard;

pub use guard::{classify_io_error, PathGuard};
