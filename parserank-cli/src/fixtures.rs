//! Fixture Files
//!
//! Delimited files every candidate of a suite parses. Line one is a header,
//! followed by `rows` data lines whose first column holds the row index
//! `0..rows`. The index column is what the checksum validator sums, so a
//! parser that drops, duplicates or splits rows is caught.
//!
//! Quoted fixtures wrap every text cell in double quotes with embedded
//! commas and escaped `""` quotes. Splitting on commas breaks them.
//!
//! Files are written to a temporary file in the fixture directory and moved
//! into place once complete, so an interrupted run never leaves a partial
//! fixture under the final name.

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Fixture generation errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// A fixture needs at least the index column
    #[error("fixture needs at least one column, got {0}")]
    NoColumns(usize),

    /// Filesystem failure
    #[error("fixture I/O on {path}: {source}")]
    Io {
        /// File or directory involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// Record serialization failure
    #[error("fixture write failed: {0}")]
    Csv(#[from] csv::Error),
}

/// Shape of a fixture file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureSpec {
    /// Data rows, excluding the header
    pub rows: u64,
    /// Quote text cells, embedding delimiters and quotes
    pub quotes: bool,
    /// Columns per row, including the index column
    pub columns: usize,
    /// Words cell content is drawn from
    pub seed: String,
}

impl FixtureSpec {
    /// File name encoding the shape, so different shapes never collide.
    ///
    /// The seed is folded into a short hash suffix.
    pub fn file_name(&self) -> String {
        let style = if self.quotes { "quoted" } else { "plain" };
        let seed = fxhash::hash64(self.seed.as_str()) as u32;
        format!(
            "rows-{}-{}-c{}-{:08x}.csv",
            self.rows, style, self.columns, seed
        )
    }
}

/// A fixture on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixture {
    /// Location of the file
    pub path: PathBuf,
    /// Data rows, excluding the header
    pub rows: u64,
    /// Whether text cells are quoted
    pub quotes: bool,
    /// File size
    pub bytes: u64,
}

/// Sum of the index column of a correctly parsed fixture
pub fn expected_checksum(rows: u64) -> u128 {
    u128::from(rows) * u128::from(rows.saturating_sub(1)) / 2
}

/// Validate parsed rows against the index checksum.
///
/// Fails with `Test Failed. Sum: ...` on a wrong sum or a first field that
/// is not an unsigned integer.
pub fn check_rows(parsed: &[Vec<String>], rows: u64) -> anyhow::Result<()> {
    let mut sum: u128 = 0;
    for (line, row) in parsed.iter().enumerate() {
        let first = row.first().map(String::as_str).unwrap_or("");
        let index: u64 = first.trim().parse().map_err(|_| {
            anyhow::anyhow!(
                "Test Failed. Sum: NaN (row {} starts with {:?})",
                line + 1,
                first
            )
        })?;
        sum += u128::from(index);
    }

    let expected = expected_checksum(rows);
    if sum != expected {
        anyhow::bail!("Test Failed. Sum: {} (expected {})", sum, expected);
    }
    Ok(())
}

/// Write fixture content for `spec` to `out`
pub fn write_fixture<W: Write>(out: W, spec: &FixtureSpec) -> Result<(), FixtureError> {
    if spec.columns == 0 {
        return Err(FixtureError::NoColumns(0));
    }

    let style = if spec.quotes {
        csv::QuoteStyle::NonNumeric
    } else {
        csv::QuoteStyle::Necessary
    };
    let mut writer = csv::WriterBuilder::new()
        .quote_style(style)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(out);

    let header = std::iter::once("index".to_string())
        .chain((1..spec.columns).map(|c| format!("col{c}")));
    writer.write_record(header)?;

    let words: Vec<&str> = spec.seed.split_whitespace().collect();
    let word = |n: usize| words.get(n % words.len().max(1)).copied().unwrap_or("cell");

    let mut record = Vec::with_capacity(spec.columns);
    for row in 0..spec.rows {
        record.clear();
        record.push(row.to_string());
        for col in 1..spec.columns {
            let n = row as usize + col;
            let cell = if spec.quotes {
                format!("{}, \"{}\" {}", word(n), word(n + 1), row)
            } else {
                format!("{}{}", word(n), row)
            };
            record.push(cell);
        }
        writer.write_record(&record)?;
    }

    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

fn io_err(path: &Path) -> impl FnOnce(io::Error) -> FixtureError {
    let path = path.to_path_buf();
    move |source| FixtureError::Io { path, source }
}

/// Whether the file at `path` holds the header plus `rows` complete lines
fn is_complete(path: &Path, rows: u64) -> Result<bool, FixtureError> {
    let content = fs::read(path).map_err(io_err(path))?;
    let lines = memchr::memchr_iter(b'\n', &content).count() as u64;
    Ok(content.ends_with(b"\n") && lines == rows.saturating_add(1))
}

/// Generate the fixture for `spec` under `dir` unless a complete one exists.
///
/// An existing file with the wrong line count is regenerated.
pub fn ensure_fixture(dir: &Path, spec: &FixtureSpec) -> Result<Fixture, FixtureError> {
    let path = dir.join(spec.file_name());

    let reuse = path.exists() && is_complete(&path, spec.rows)?;
    if reuse {
        debug!(path = %path.display(), "reusing fixture");
    } else {
        if path.exists() {
            warn!(path = %path.display(), "fixture is incomplete, regenerating");
        }
        fs::create_dir_all(dir).map_err(io_err(dir))?;

        // Dropped (and deleted) on any error below
        let tmp = NamedTempFile::new_in(dir).map_err(io_err(dir))?;
        write_fixture(BufWriter::new(tmp.as_file()), spec)?;
        tmp.persist(&path).map_err(|e| FixtureError::Io {
            path: path.clone(),
            source: e.error,
        })?;
        info!(path = %path.display(), rows = spec.rows, quotes = spec.quotes, "generated fixture");
    }

    let bytes = fs::metadata(&path).map_err(io_err(&path))?.len();
    Ok(Fixture {
        path,
        rows: spec.rows,
        quotes: spec.quotes,
        bytes,
    })
}
