// src/store.rs
//! Append-only CSV logs.
//!
//! A log is one header row followed by one row per capture. Rows are only
//! ever appended; nothing here truncates or rewrites a file. Column sets grow
//! by appending trailing columns, so a log carries a [`LogSchema`] listing
//! every column set it has had, and rows shorter than the current header read
//! back with `None` in the missing trailing cells. A row written to a file
//! always has exactly as many cells as that file's header.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::config::consts::{LOG_SEP, WRITE_BOM};
use crate::core::sanitize::strip_bom;
use crate::csv::{parse_rows, row_to_string};
use crate::error::LogError;
use crate::file::{ensure_parent, LogLock};

/* ---------------- Schema ---------------- */

/// Every column list a log has had, oldest first. Each is a prefix of the next.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogSchema {
    versions: Vec<Vec<String>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HeaderMatch {
    Current,
    /// A known older version; the index into the version list.
    Older(usize),
    Mismatch,
}

impl LogSchema {
    pub fn new<S: AsRef<str>>(header: &[S]) -> Self {
        Self { versions: vec![header.iter().map(|h| s!(h.as_ref())).collect()] }
    }

    /// `base` columns first, then one version per appended column group.
    pub fn grown<S: AsRef<str>>(base: &[S], groups: &[Vec<String>]) -> Self {
        let mut cur: Vec<String> = base.iter().map(|h| s!(h.as_ref())).collect();
        let mut versions = vec![cur.clone()];
        for g in groups {
            cur.extend(g.iter().cloned());
            versions.push(cur.clone());
        }
        Self { versions }
    }

    pub fn header(&self) -> &[String] {
        self.versions.last().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn versions(&self) -> &[Vec<String>] {
        &self.versions
    }

    pub fn check(&self, found: &[String]) -> HeaderMatch {
        if found == self.header() {
            return HeaderMatch::Current;
        }
        match self.versions.iter().position(|v| v.as_slice() == found) {
            Some(i) => HeaderMatch::Older(i),
            None => HeaderMatch::Mismatch,
        }
    }
}

/* ---------------- Rows ---------------- */

/// One persisted record: capture timestamp plus field → cell, in header order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogRow {
    pub timestamp: String,
    pub fields: Vec<(String, Option<String>)>,
}

impl LogRow {
    /// Cell text; `None` for a column this row predates.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .and_then(|(_, v)| v.as_deref())
    }
}

#[derive(Clone, Debug, Default)]
pub struct LogTable {
    /// Header as written in the file.
    pub header: Vec<String>,
    pub rows: Vec<LogRow>,
}

/* ---------------- Writing ---------------- */

const BOM: &[u8] = "\u{feff}".as_bytes();

/// Append `row` under `header`, writing the header first if the file is
/// missing, empty or only a BOM. Prior content is never rewritten.
pub fn append_row<S: AsRef<str>>(path: &Path, header: &[S], row: &[S]) -> Result<(), LogError> {
    append_row_with(path, header, row, LOG_SEP, WRITE_BOM)
}

pub fn append_row_with<S: AsRef<str>>(
    path: &Path,
    header: &[S],
    row: &[S],
    sep: char,
    bom: bool,
) -> Result<(), LogError> {
    if row.len() != header.len() {
        return Err(LogError::Arity { want: header.len(), got: row.len() });
    }
    let io_err = |e: io::Error| LogError::io(path, e);

    ensure_parent(path).map_err(io_err)?;
    let mut file = OpenOptions::new().create(true).append(true).open(path).map_err(io_err)?;
    let len = file.metadata().map_err(io_err)?.len();
    // A file holding nothing but a BOM still needs its header.
    let bom_only = len == BOM.len() as u64 && fs::read(path).map_err(io_err)? == BOM;
    let fresh = len == 0 || bom_only;

    // One write_all per call so a row never lands half-written next to another.
    let mut buf = s!();
    if fresh {
        if bom && !bom_only { buf.push('\u{feff}'); }
        buf.push_str(&row_to_string(header, sep));
    }
    buf.push_str(&row_to_string(row, sep));

    file.write_all(buf.as_bytes()).map_err(io_err)?;
    file.flush().map_err(io_err)
}

/// A log file bound to its schema.
#[derive(Clone, Debug)]
pub struct LogWriter {
    path: PathBuf,
    schema: LogSchema,
    sep: char,
    bom: bool,
}

impl LogWriter {
    pub fn new(path: impl Into<PathBuf>, schema: LogSchema) -> Self {
        Self { path: path.into(), schema, sep: LOG_SEP, bom: WRITE_BOM }
    }

    pub fn with_bom(mut self, bom: bool) -> Self {
        self.bom = bom;
        self
    }

    pub fn path(&self) -> &Path { &self.path }
    pub fn schema(&self) -> &LogSchema { &self.schema }

    /// Exclusive access for "read last row" + "append row".
    pub fn lock(&self) -> Result<LogLock, LogError> {
        LogLock::acquire(&self.path)
    }

    /// Append one row shaped like the current schema.
    ///
    /// A file still on an older schema version keeps its own shape: the row
    /// is cut to that header's width and the dropped trailing columns are
    /// logged. Any other existing header is refused.
    pub fn append<S: AsRef<str>>(&self, row: &[S]) -> Result<(), LogError> {
        let header = self.schema.header();
        if row.len() != header.len() {
            return Err(LogError::Arity { want: header.len(), got: row.len() });
        }
        let row: Vec<&str> = row.iter().map(|c| c.as_ref()).collect();

        let Some(found) = self.read_header()? else {
            let header: Vec<&str> = header.iter().map(String::as_str).collect();
            return append_row_with(&self.path, &header, &row, self.sep, self.bom);
        };

        match self.schema.check(&found) {
            HeaderMatch::Current => {}
            HeaderMatch::Older(v) => {
                let dropped = &header[found.len()..];
                let lost = row[found.len()..].iter().filter(|c| !c.is_empty()).count();
                logw!(
                    "{} is on header version {} of {}; dropping columns {:?} ({} with values)",
                    self.path.display(),
                    v + 1,
                    self.schema.versions().len(),
                    dropped,
                    lost
                );
            }
            HeaderMatch::Mismatch => {
                return Err(LogError::HeaderMismatch {
                    path: self.path.clone(),
                    expected: header.to_vec(),
                    found,
                });
            }
        }

        let header: Vec<&str> = found.iter().map(String::as_str).collect();
        append_row_with(&self.path, &header, &row[..found.len()], self.sep, self.bom)
    }

    /* ---------------- Reading ---------------- */

    /// Header line of the file; `None` when the file is missing or empty.
    pub fn read_header(&self) -> Result<Option<Vec<String>>, LogError> {
        let Some(reader) = self.open_reader()? else { return Ok(None) };
        let mut lines = reader.lines();
        match lines.next() {
            Some(line) => {
                let line = line.map_err(|e| LogError::io(&self.path, e))?;
                Ok(parse_rows(strip_bom(&line), self.sep).into_iter().next())
            }
            None => Ok(None),
        }
    }

    /// Capture timestamp of the newest row: the staleness cursor.
    pub fn last_capture(&self) -> Result<Option<String>, LogError> {
        let Some(reader) = self.open_reader()? else { return Ok(None) };

        let mut last: Option<String> = None;
        for (i, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| LogError::io(&self.path, e))?;
            if i > 0 && !line.trim().is_empty() {
                last = Some(line);
            }
        }

        Ok(last.and_then(|line| {
            parse_rows(&line, self.sep)
                .into_iter()
                .next()
                .and_then(|r| r.into_iter().next())
                .map(|ts| s!(ts.trim()))
                .filter(|ts| !ts.is_empty())
        }))
    }

    /// Whole log, rows keyed by column name. Columns past a short row's end
    /// come back as `None`.
    pub fn read(&self) -> Result<LogTable, LogError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(t) => t,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(LogTable::default()),
            Err(e) => return Err(LogError::io(&self.path, e)),
        };
        let mut rows = parse_rows(strip_bom(&text), self.sep).into_iter();
        let Some(header) = rows.next() else { return Ok(LogTable::default()) };

        // Name columns by the current schema when the file is an older version of it.
        let names: Vec<String> = match self.schema.check(&header) {
            HeaderMatch::Current | HeaderMatch::Older(_) => self.schema.header().to_vec(),
            HeaderMatch::Mismatch => header.clone(),
        };

        let rows = rows
            .map(|cells| {
                let mut cells = cells.into_iter();
                let timestamp = cells.next().unwrap_or_default();
                let fields = names
                    .iter()
                    .skip(1)
                    .map(|name| (name.clone(), cells.next()))
                    .collect();
                LogRow { timestamp, fields }
            })
            .collect();

        Ok(LogTable { header, rows })
    }

    fn open_reader(&self) -> Result<Option<BufReader<File>>, LogError> {
        match File::open(&self.path) {
            Ok(f) => Ok(Some(BufReader::new(f))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(LogError::io(&self.path, e)),
        }
    }
}
