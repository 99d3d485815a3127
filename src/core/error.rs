// This module defines the error type for the syscall header generator using the thiserror
// crate. GenError covers the fatal conditions of a generation run: a missing output path,
// an unreadable per-architecture input table, a failed write of the final artifact, and
// failures of the header evaluator used to check generated output against a target. I/O
// variants carry the architecture or path involved plus the underlying io::Error as their
// source. Malformed input lines are deliberately absent here: they are skipped, not
// reported. GenResult<T> is the convenience alias used throughout the crate.

//! Error types for the syscall header generator.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::arch::Arch;

/// Main error type for a generation run.
#[derive(Error, Debug)]
pub enum GenError {
    #[error("no output file is given")]
    MissingOutput,

    #[error("failed to read {arch} table {}: {source}", .path.display())]
    ReadInput {
        arch: Arch,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("header evaluation failed at line {line}: {reason}")]
    Evaluate {
        line: usize,
        reason: String,
    },
}

/// Result type alias for generator operations.
pub type GenResult<T> = Result<T, GenError>;
