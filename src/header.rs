//! Assembling and writing the generated header.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::arch::Arch;
use crate::core::{GenError, GenResult};
use crate::dispatch::{BANNER, EPILOGUE, PROLOGUE};
use crate::fallback;
use crate::guard::Target;
use crate::preprocess::{self, MacroTable};
use crate::table::SyscallTable;

/// Which part of the header a segment holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Banner,
    Prologue,
    Arch(Arch),
    Fallback,
    Epilogue,
}

/// One contiguous piece of header text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub kind: SegmentKind,
    pub text: String,
}

/// The complete header, in output order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedHeader {
    segments: Vec<Segment>,
}

impl GeneratedHeader {
    /// Banner, prologue, one block per architecture, fallback stubs, epilogue.
    pub fn assemble(table: &SyscallTable<'_>) -> Self {
        let mut segments = Vec::with_capacity(table.blocks.len() + 4);
        segments.push(Segment {
            kind: SegmentKind::Banner,
            text: BANNER.to_string(),
        });
        segments.push(Segment {
            kind: SegmentKind::Prologue,
            text: PROLOGUE.to_string(),
        });

        for block in &table.blocks {
            let mut text = String::new();
            block.render(&mut text);
            segments.push(Segment {
                kind: SegmentKind::Arch(block.arch),
                text,
            });
        }

        let mut text = String::new();
        fallback::render(&table.registry, &mut text);
        segments.push(Segment {
            kind: SegmentKind::Fallback,
            text,
        });
        segments.push(Segment {
            kind: SegmentKind::Epilogue,
            text: EPILOGUE.to_string(),
        });

        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Full header text.
    pub fn render(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    /// Replace the file at `path` with the header.
    ///
    /// The text goes to a uniquely named temporary file in the destination
    /// directory and is persisted over `path`, so readers only ever see the
    /// old or the new header. A symlink at `path` is followed and its
    /// target is replaced; the link itself stays in place.
    pub fn write_to(&self, path: &Path) -> GenResult<()> {
        let write_err = |source: io::Error| GenError::WriteOutput {
            path: path.to_path_buf(),
            source,
        };

        let dest = resolve_destination(path).map_err(write_err)?;
        let dir = match dest.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
        tmp.write_all(self.render().as_bytes()).map_err(write_err)?;
        if let Some(perms) = output_permissions(&dest) {
            tmp.as_file().set_permissions(perms).map_err(write_err)?;
        }
        tmp.persist(&dest).map_err(|e| write_err(e.error))?;

        log::info!("Wrote {}", path.display());
        Ok(())
    }

    /// Macros in effect after including the header on `target`.
    pub fn evaluate(&self, target: &Target) -> GenResult<MacroTable> {
        preprocess::evaluate(&self.render(), target)
    }

    /// Final replacement text of `symbol` when compiled for `target`.
    pub fn resolve(&self, target: &Target, symbol: &str) -> GenResult<Option<String>> {
        Ok(self.evaluate(target)?.resolve(symbol))
    }
}

/// Symlink hops followed before giving up, as with `ELOOP`.
const MAX_SYMLINK_HOPS: usize = 40;

/// Final file a write to `path` lands on, following symlinks.
fn resolve_destination(path: &Path) -> io::Result<PathBuf> {
    let mut current = path.to_path_buf();
    for _ in 0..MAX_SYMLINK_HOPS {
        match fs::symlink_metadata(&current) {
            Ok(meta) if meta.file_type().is_symlink() => {
                let target = fs::read_link(&current)?;
                current = match current.parent() {
                    Some(parent) if target.is_relative() => parent.join(target),
                    _ => target,
                };
            }
            _ => return Ok(current),
        }
    }
    Err(io::Error::new(
        io::ErrorKind::Other,
        "too many levels of symbolic links",
    ))
}

/// Permissions for the replacement file: the existing file's, else 0644.
fn output_permissions(dest: &Path) -> Option<fs::Permissions> {
    match fs::metadata(dest) {
        Ok(meta) => Some(meta.permissions()),
        Err(_) => default_permissions(),
    }
}

#[cfg(unix)]
fn default_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<fs::Permissions> {
    None
}
