//! lapi-syscalls - portable syscall-number header generation.
//!
//! Merges one `<arch>.in` table per supported architecture into a single C
//! header. Every `__NR_<name>` symbol known to any architecture compiles on
//! every architecture: the active architecture block supplies the real
//! number, and a fallback stub defines anything missing to the
//! `__LTP__NR_INVALID_SYSCALL` sentinel. The header also carries the
//! `tst_syscall()` dispatch macro, which turns both a sentinel call and a
//! kernel `ENOSYS` into the same "unsupported" signal.
//!
//! # Primary Usage
//!
//! ```ignore
//! use lapi_syscalls::generator::{self, GeneratorConfig};
//!
//! let config = GeneratorConfig::new(Some("syscalls.h".into()), "include/lapi/syscalls")?;
//! let stats = generator::run(&config)?;
//! ```
//!
//! # Architecture
//!
//! - [`loader`] / [`parser`] - reading and parsing `<arch>.in` tables
//! - [`arch`] / [`guard`] - supported architectures and their guards
//! - [`table`] - per-architecture blocks and the global symbol registry
//! - [`fallback`] - sentinel stubs for every registered symbol
//! - [`header`] - assembling and writing the artifact
//! - [`dispatch`] - prologue text and the dispatch contract
//! - [`preprocess`] - evaluating a header for a compile target
//! - [`core`] - session and error types

pub mod core;

pub mod arch;
pub mod dispatch;
pub mod fallback;
pub mod generator;
pub mod guard;
pub mod header;
pub mod loader;
pub mod parser;
pub mod preprocess;
pub mod table;

pub use crate::arch::Arch;
pub use crate::core::{GenError, GenResult, GenerationSession, SessionStats};
pub use crate::dispatch::{DispatchOutcome, Unsupported};
pub use crate::generator::GeneratorConfig;
pub use crate::guard::{Guard, Target};
pub use crate::header::GeneratedHeader;
pub use crate::table::{SymbolRegistry, SyscallTable, TableBuilder};
