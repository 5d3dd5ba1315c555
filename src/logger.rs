//! Per-generation metric logging.
//!
//! The engine reports one [`GenerationStats`] record per generation through a
//! [`GenerationLogger`]. Backends decide where records go:
//!
//! - [`CsvLogger`]: buffered comma-separated output, one file per instance
//! - [`MemoryLogger`]: keeps records in memory
//!
//! Every method returns `io::Result`; the engine treats a failed write as
//! fatal and aborts the run with [`GaError::Log`](crate::error::GaError::Log).

use crate::ga::{GaConfig, GenerationStats};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Column header written by [`CsvLogger::write_header`].
pub const CSV_COLUMNS: &str = "generation,best,average,worst";

/// Sink for per-generation statistics.
pub trait GenerationLogger {
    /// Describes the run configuration ahead of the records.
    fn write_header(
        &mut self,
        instance: &str,
        config: &GaConfig,
        generations: usize,
    ) -> io::Result<()>;

    /// Records one generation.
    fn write_log(&mut self, stats: &GenerationStats) -> io::Result<()>;

    /// Separates consecutive runs with `times` empty lines.
    fn write_line_separator(&mut self, times: usize) -> io::Result<()>;

    /// Flushes and releases the destination.
    fn close(&mut self) -> io::Result<()>;
}

/// Comma-separated backend over any writer.
///
/// Configuration is echoed as `# key=value` lines before the column header.
#[derive(Debug)]
pub struct CsvLogger<W: Write> {
    out: BufWriter<W>,
}

impl CsvLogger<File> {
    /// Creates (or truncates) `path`, creating parent directories as needed.
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let file = File::create(path)?;
        tracing::debug!(path = %path.display(), "opened generation log");
        Ok(Self::new(file))
    }
}

impl<W: Write> CsvLogger<W> {
    pub fn new(writer: W) -> Self {
        Self {
            out: BufWriter::new(writer),
        }
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(self) -> io::Result<W> {
        self.out.into_inner().map_err(|e| e.into_error())
    }
}

impl<W: Write> GenerationLogger for CsvLogger<W> {
    fn write_header(
        &mut self,
        instance: &str,
        config: &GaConfig,
        generations: usize,
    ) -> io::Result<()> {
        writeln!(self.out, "# instance={instance}")?;
        writeln!(self.out, "# generations={generations}")?;
        writeln!(self.out, "# population_size={}", config.population_size)?;
        writeln!(self.out, "# crossover_probability={}", config.crossover_probability)?;
        writeln!(self.out, "# mutation_probability={}", config.mutation_probability)?;
        writeln!(self.out, "# selection={}", config.selection)?;
        writeln!(self.out, "# tournament_size={}", config.tournament_size)?;
        writeln!(self.out, "{CSV_COLUMNS}")
    }

    fn write_log(&mut self, stats: &GenerationStats) -> io::Result<()> {
        writeln!(
            self.out,
            "{},{},{},{}",
            stats.generation, stats.best, stats.average, stats.worst
        )
    }

    fn write_line_separator(&mut self, times: usize) -> io::Result<()> {
        for _ in 0..times {
            writeln!(self.out)?;
        }
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// In-memory backend.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryLogger {
    /// Every record in arrival order, across runs.
    pub records: Vec<GenerationStats>,
    pub headers: usize,
    pub separators: usize,
    pub closed: bool,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GenerationLogger for MemoryLogger {
    fn write_header(
        &mut self,
        _instance: &str,
        _config: &GaConfig,
        _generations: usize,
    ) -> io::Result<()> {
        self.headers += 1;
        Ok(())
    }

    fn write_log(&mut self, stats: &GenerationStats) -> io::Result<()> {
        self.records.push(*stats);
        Ok(())
    }

    fn write_line_separator(&mut self, times: usize) -> io::Result<()> {
        self.separators += times;
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        self.closed = true;
        Ok(())
    }
}
