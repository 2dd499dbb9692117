//! Parser Candidates
//!
//! Every candidate reads a fixture, drops the header row and returns the
//! data rows as owned strings. The quote-unaware ones split on raw commas
//! and are excluded for quoted fixtures.

use crate::fixtures::check_rows;
use memchr::memchr_iter;
use parserank_core::{Candidate, Suite};
use std::path::{Path, PathBuf};
use tokio::io::AsyncBufReadExt;

/// Parsed data rows
pub type Rows = Vec<Vec<String>>;

/// Run parameters the exclusion predicates inspect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuiteParams {
    /// Data rows in the fixture
    pub rows: u64,
    /// Whether text cells are quoted
    pub quotes: bool,
}

fn split_line(line: &str) -> Vec<String> {
    line.split(',').map(str::to_owned).collect()
}

fn data_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n')
        .skip(1)
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.is_empty())
}

/// Split on newlines, then on commas
pub fn parse_str_split(text: &str) -> Rows {
    data_lines(text).map(split_line).collect()
}

/// Byte scanning with `memchr`
pub fn parse_memchr(bytes: &[u8]) -> anyhow::Result<Rows> {
    let mut rows = Vec::new();
    let mut start = 0;
    let mut header = true;

    let ends = memchr_iter(b'\n', bytes).chain(std::iter::once(bytes.len()));
    for end in ends {
        let mut line = &bytes[start..end];
        start = end + 1;
        if let Some(stripped) = line.strip_suffix(b"\r") {
            line = stripped;
        }
        if std::mem::take(&mut header) || line.is_empty() {
            continue;
        }

        let mut fields = Vec::new();
        let mut field_start = 0;
        for comma in memchr_iter(b',', line).chain(std::iter::once(line.len())) {
            fields.push(std::str::from_utf8(&line[field_start..comma])?.to_owned());
            field_start = comma + 1;
        }
        rows.push(fields);
    }

    Ok(rows)
}

/// `csv` crate reader producing `StringRecord`s
pub fn parse_csv_records(input: impl std::io::Read) -> anyhow::Result<Rows> {
    let mut reader = csv::Reader::from_reader(input);
    let mut rows = Vec::new();
    for record in reader.records() {
        rows.push(record?.iter().map(str::to_owned).collect());
    }
    Ok(rows)
}

/// `csv` crate reader producing `ByteRecord`s, converted per field
pub fn parse_csv_byte_records(input: impl std::io::Read) -> anyhow::Result<Rows> {
    let mut reader = csv::Reader::from_reader(input);
    let mut record = csv::ByteRecord::new();
    let mut rows = Vec::new();
    while reader.read_byte_record(&mut record)? {
        let fields = record
            .iter()
            .map(|field| std::str::from_utf8(field).map(str::to_owned))
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(fields);
    }
    Ok(rows)
}

fn end_record(record: &mut Vec<String>, rows: &mut Rows) {
    let blank = record.len() == 1 && record[0].is_empty();
    if blank {
        record.clear();
    } else {
        rows.push(std::mem::take(record));
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum QuoteState {
    FieldStart,
    Unquoted,
    Quoted,
    // Inside a quoted field, right after a `"`
    QuotedQuote,
}

/// Hand-written RFC 4180 reader
pub fn parse_quote_aware(text: &str) -> anyhow::Result<Rows> {
    let mut rows: Rows = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut state = QuoteState::FieldStart;
    let mut line = 1usize;

    for c in text.chars() {
        match (state, c) {
            (QuoteState::Quoted, '"') => state = QuoteState::QuotedQuote,
            (QuoteState::Quoted, c) => field.push(c),
            (QuoteState::QuotedQuote, '"') => {
                field.push('"');
                state = QuoteState::Quoted;
            }
            (QuoteState::FieldStart, '"') => state = QuoteState::Quoted,
            (QuoteState::Unquoted, '"') => {
                anyhow::bail!("unexpected quote in unquoted field on line {}", line)
            }
            (QuoteState::QuotedQuote, c) if c != ',' && c != '\n' && c != '\r' => {
                anyhow::bail!("unexpected {:?} after closing quote on line {}", c, line)
            }
            (_, ',') => {
                record.push(std::mem::take(&mut field));
                state = QuoteState::FieldStart;
            }
            (_, '\r') => {}
            (_, '\n') => {
                record.push(std::mem::take(&mut field));
                end_record(&mut record, &mut rows);
                state = QuoteState::FieldStart;
                line += 1;
            }
            (_, c) => {
                field.push(c);
                state = QuoteState::Unquoted;
            }
        }
    }

    if state == QuoteState::Quoted {
        anyhow::bail!("unterminated quoted field on line {}", line);
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        end_record(&mut record, &mut rows);
    }

    if !rows.is_empty() {
        rows.remove(0);
    }
    Ok(rows)
}

/// Async line streaming with `tokio::io::BufReader`, quote-unaware
pub async fn parse_tokio_lines(path: &Path) -> anyhow::Result<Rows> {
    let file = tokio::fs::File::open(path).await?;
    let mut lines = tokio::io::BufReader::new(file).lines();
    let mut rows = Vec::new();

    if lines.next_line().await?.is_none() {
        return Ok(rows);
    }
    while let Some(line) = lines.next_line().await? {
        let line = line.strip_suffix('\r').unwrap_or(&line);
        if !line.is_empty() {
            rows.push(split_line(line));
        }
    }
    Ok(rows)
}

fn quoted(params: &SuiteParams) -> bool {
    params.quotes
}

async fn read_str_split(path: PathBuf) -> anyhow::Result<Rows> {
    Ok(parse_str_split(&tokio::fs::read_to_string(path).await?))
}

async fn read_memchr(path: PathBuf) -> anyhow::Result<Rows> {
    parse_memchr(&tokio::fs::read(path).await?)
}

async fn read_csv_records(path: PathBuf) -> anyhow::Result<Rows> {
    parse_csv_records(std::fs::File::open(path)?)
}

async fn read_csv_byte_records(path: PathBuf) -> anyhow::Result<Rows> {
    parse_csv_byte_records(std::fs::File::open(path)?)
}

async fn read_quote_aware(path: PathBuf) -> anyhow::Result<Rows> {
    parse_quote_aware(&tokio::fs::read_to_string(path).await?)
}

async fn read_tokio_lines(path: PathBuf) -> anyhow::Result<Rows> {
    parse_tokio_lines(&path).await
}

/// Every parser candidate for `path`, in registration order
pub fn candidates(path: &Path) -> Vec<Candidate<Rows, SuiteParams>> {
    let p = path.to_path_buf();
    let file = move || p.clone();

    vec![
        Candidate::new("str-split", {
            let file = file.clone();
            move || read_str_split(file())
        })
        .exclude_when(quoted),
        Candidate::new("memchr-split", {
            let file = file.clone();
            move || read_memchr(file())
        })
        .exclude_when(quoted),
        Candidate::new("csv-reader", {
            let file = file.clone();
            move || read_csv_records(file())
        }),
        Candidate::new("csv-byte-records", {
            let file = file.clone();
            move || read_csv_byte_records(file())
        }),
        Candidate::new("quote-aware", {
            let file = file.clone();
            move || read_quote_aware(file())
        }),
        Candidate::new("tokio-lines", move || read_tokio_lines(file())).exclude_when(quoted),
    ]
}

/// Suite of every parser candidate over one fixture, validated by checksum
pub fn parser_suite(path: &Path, rows: u64) -> Suite<Rows, SuiteParams> {
    let mut suite = Suite::new(move |parsed: &Rows| check_rows(parsed, rows));
    for candidate in candidates(path) {
        suite.push(candidate);
    }
    suite
}
