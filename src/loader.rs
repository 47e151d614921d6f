//! CSV template loading.
//!
//! Scans a directory for `.csv` files and turns rows into validated
//! templates. One bad row skips that row; one bad file skips that file;
//! neither aborts the scan. Everything dropped is captured as a typed
//! diagnostic in the [`LoadReport`] so callers and tests can see exactly
//! what was excluded and why.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{error, info, warn};

use crate::error::LoadError;
use crate::template::{Template, TemplateId};

/// UTF-8 byte order mark, tolerated at the start of a file.
const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Required CSV columns, matched case-insensitively after trimming.
const REQUIRED_COLUMNS: [&str; 2] = ["question", "answer"];

/// Why a row was skipped during load.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RowIssue {
    #[error("question is empty")]
    EmptyQuestion,

    #[error("answer is empty")]
    EmptyAnswer,

    #[error("priority {value:?} is not an integer")]
    BadPriority {
        value: String,
    },

    #[error("row is malformed: {message}")]
    Malformed {
        message: String,
    },
}

/// One skipped row: which file, which line, and the typed reason.
#[derive(Debug)]
pub struct SkippedRow {
    /// File name the row came from.
    pub file: String,

    /// 1-based line number within the file, 0 when unknown.
    pub line: u64,

    /// Why the row was dropped.
    pub issue: RowIssue,
}

/// Outcome of one directory scan.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Validated templates, ids assigned in scan order starting at 0.
    pub templates: Vec<Template>,

    /// Rows dropped with their typed reasons.
    pub skipped: Vec<SkippedRow>,

    /// Files that contributed zero templates because they failed as a whole.
    pub failed_files: Vec<(PathBuf, LoadError)>,

    /// Number of `.csv` files the scan found, loaded or not.
    pub files_scanned: usize,
}

impl LoadReport {
    /// Number of templates loaded.
    #[must_use]
    pub fn template_count(&self) -> usize {
        self.templates.len()
    }
}

/// Scans a directory for `.csv` files and loads every valid row.
///
/// A missing directory is created and yields an empty report. Files are
/// visited in name order so template ids are stable across runs.
///
/// # Errors
///
/// Returns `LoadError::Io` only when the directory itself cannot be
/// created or listed. Per-file failures are collected in the report.
pub fn load_directory(dir: &Path) -> Result<LoadReport, LoadError> {
    let mut report = LoadReport::default();

    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|source| LoadError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        info!(dir = %dir.display(), "Created templates directory");
        return Ok(report);
    }

    let entries = fs::read_dir(dir).map_err(|source| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "csv"))
        .collect();
    files.sort();

    report.files_scanned = files.len();
    if files.is_empty() {
        info!(dir = %dir.display(), "No template CSV files found");
        return Ok(report);
    }

    for path in files {
        match load_file(&path, &mut report) {
            Ok(count) => {
                info!(file = %path.display(), count, "Loaded templates");
            }
            Err(err) => {
                error!(file = %path.display(), %err, "Skipping template file");
                report.failed_files.push((path, err));
            }
        }
    }

    info!(
        templates = report.template_count(),
        files = report.files_scanned,
        skipped_rows = report.skipped.len(),
        failed_files = report.failed_files.len(),
        "Template scan complete"
    );
    Ok(report)
}

/// Loads one CSV file, appending valid templates and skip diagnostics to
/// the report. Returns the number of templates the file contributed.
fn load_file(path: &Path, report: &mut LoadReport) -> Result<usize, LoadError> {
    let bytes = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let text = decode_bytes(&bytes).ok_or_else(|| LoadError::Encoding {
        path: path.to_path_buf(),
    })?;

    let file_name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned());
    let file_category = default_category(path);

    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let headers = reader.headers().map_err(|err| LoadError::Malformed {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;

    let columns = ColumnMap::from_headers(headers);
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|&name| columns.index_of(name).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(LoadError::MissingColumns {
            path: path.to_path_buf(),
            missing: missing.join(", "),
        });
    }

    let mut count = 0;
    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                let line = err.position().map_or(0, csv::Position::line);
                warn!(file = %file_name, line, %err, "Skipping malformed row");
                report.skipped.push(SkippedRow {
                    file: file_name.clone(),
                    line,
                    issue: RowIssue::Malformed {
                        message: err.to_string(),
                    },
                });
                continue;
            }
        };

        let line = record.position().map_or(0, csv::Position::line);
        let id = TemplateId::new(report.templates.len());
        match row_to_template(id, &record, &columns, &file_category, &file_name) {
            Ok(template) => {
                report.templates.push(template);
                count += 1;
            }
            Err(issue) => {
                warn!(file = %file_name, line, %issue, "Skipping row");
                report.skipped.push(SkippedRow {
                    file: file_name.clone(),
                    line,
                    issue,
                });
            }
        }
    }

    Ok(count)
}

/// Builds one template from a CSV record, or the typed reason it was
/// dropped.
fn row_to_template(
    id: TemplateId,
    record: &csv::StringRecord,
    columns: &ColumnMap,
    file_category: &str,
    file_name: &str,
) -> Result<Template, RowIssue> {
    let question = columns.value(record, "question").unwrap_or("").trim();
    let answer = columns.value(record, "answer").unwrap_or("").trim();
    if question.is_empty() {
        return Err(RowIssue::EmptyQuestion);
    }
    if answer.is_empty() {
        return Err(RowIssue::EmptyAnswer);
    }

    let priority = match columns.value(record, "priority").map(str::trim) {
        None | Some("") => crate::template::DEFAULT_PRIORITY,
        Some(raw) => raw.parse::<i32>().map_err(|_| RowIssue::BadPriority {
            value: raw.to_string(),
        })?,
    };

    let category = match columns.value(record, "category").map(str::trim) {
        None | Some("") => file_category.to_string(),
        Some(raw) => raw.to_string(),
    };

    let tags = columns
        .value(record, "tags")
        .unwrap_or("")
        .split(',')
        .map(str::to_string);

    // Blank question/answer were rejected above, so construction cannot
    // fail here; map the impossible case to a malformed-row issue anyway.
    let template = Template::new(id, question, answer)
        .map_err(|err| RowIssue::Malformed {
            message: err.to_string(),
        })?
        .with_category(category)
        .with_priority(priority)
        .with_tags(tags)
        .with_source_file(file_name);
    Ok(template)
}

/// Header-name to column-index mapping, case-insensitive and trimmed.
struct ColumnMap {
    indices: Vec<(String, usize)>,
}

impl ColumnMap {
    fn from_headers(headers: &csv::StringRecord) -> Self {
        let indices = headers
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.trim().to_lowercase(), idx))
            .collect();
        Self { indices }
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.indices
            .iter()
            .find(|(header, _)| header == name)
            .map(|(_, idx)| *idx)
    }

    fn value<'r>(&self, record: &'r csv::StringRecord, name: &str) -> Option<&'r str> {
        self.index_of(name).and_then(|idx| record.get(idx))
    }
}

/// Tries the fixed encoding ladder: UTF-8 (BOM tolerated), then
/// Windows-1252, which also covers Latin-1 sources.
fn decode_bytes(bytes: &[u8]) -> Option<String> {
    let without_bom = bytes.strip_prefix(&UTF8_BOM).unwrap_or(bytes);
    if let Ok(text) = std::str::from_utf8(without_bom) {
        return Some(text.to_string());
    }

    let (text, had_errors) = encoding_rs::WINDOWS_1252.decode_without_bom_handling(without_bom);
    if had_errors {
        return None;
    }
    Some(text.into_owned())
}

/// Default category for a file: the title-cased stem with underscores as
/// spaces, so `customer_faq.csv` becomes "Customer Faq".
fn default_category(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map_or_else(String::new, |stem| stem.to_string_lossy().into_owned());
    title_case(&stem.replace('_', " "))
}

fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
                at_word_start = false;
            } else {
                out.extend(c.to_lowercase());
            }
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}
