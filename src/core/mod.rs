// This module holds the infrastructure shared by every stage of a generation run: the
// arena-backed session that interns symbol names and value expressions and collects run
// statistics, and the error type through which fatal conditions (missing output path,
// unreadable input table, failed write, header evaluation failure) propagate to the caller.

//! Core generator infrastructure.
//!
//! # Key Components
//!
//! ## Session Management (`session`)
//! - Arena-based string interning using `bumpalo`
//! - Run statistics
//!
//! ## Errors (`error`)
//! - `GenError` / `GenResult` built on `thiserror`

pub mod error;
pub mod session;

pub use error::{GenError, GenResult};
pub use session::{GenerationSession, SessionStats};
