//! One generation run: load every table, merge, assemble, write.

use std::path::PathBuf;

use bumpalo::Bump;

use crate::core::{GenError, GenResult, GenerationSession, SessionStats};
use crate::header::GeneratedHeader;
use crate::loader::InputLoader;
use crate::table::TableBuilder;

/// Settings for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Directory holding the `<arch>.in` tables.
    pub input_dir: PathBuf,
    /// Header to (re)write.
    pub output: PathBuf,
    /// Warn about single-token lines instead of skipping them quietly.
    pub warn_malformed: bool,
}

impl GeneratorConfig {
    /// Build a config; a missing output path is fatal.
    pub fn new(output: Option<PathBuf>, input_dir: impl Into<PathBuf>) -> GenResult<Self> {
        let output = output.ok_or(GenError::MissingOutput)?;
        Ok(Self {
            input_dir: input_dir.into(),
            output,
            warn_malformed: false,
        })
    }

    pub fn with_warn_malformed(mut self, enabled: bool) -> Self {
        self.warn_malformed = enabled;
        self
    }
}

/// Loader reading the tables `config` names, with its diagnostics settings.
pub fn input_loader<'s, 'arena>(
    session: &'s GenerationSession<'arena>,
    config: &GeneratorConfig,
) -> InputLoader<'s, 'arena> {
    InputLoader::new(session, &config.input_dir).warn_malformed(config.warn_malformed)
}

/// Load and merge every table, returning the assembled header.
///
/// Nothing is written; any unreadable table aborts the run.
pub fn generate_header(
    session: &GenerationSession<'_>,
    config: &GeneratorConfig,
) -> GenResult<GeneratedHeader> {
    let sets = input_loader(session, config).load_all()?;
    let table = TableBuilder::build(session, sets);
    Ok(GeneratedHeader::assemble(&table))
}

/// Generate the header and replace `config.output` with it.
pub fn run(config: &GeneratorConfig) -> GenResult<SessionStats> {
    let arena = Bump::new();
    let session = GenerationSession::new(&arena);

    log::debug!("Reading tables from {}", config.input_dir.display());
    let header = generate_header(&session, config)?;
    header.write_to(&config.output)?;

    let stats = session.stats();
    log::info!(
        "{} architectures, {} definitions, {} fallback stubs",
        stats.architectures,
        stats.records,
        stats.symbols
    );
    Ok(stats)
}
