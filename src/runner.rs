use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{Result, ScraperError};
use crate::lookup;
use crate::models::{CourseCode, CourseRecord};
use crate::session::CatalogSession;

/// Column order of the output file.
pub const HEADER: [&str; 5] = ["subject", "number", "credits", "semesters", "requisites"];

/// What to do when a single course lookup fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop the batch at the first failure; no output is written.
    #[default]
    Abort,
    /// Log the failure, keep going and report it at the end.
    Skip,
}

/// A course code whose lookup failed under [`FailurePolicy::Skip`].
#[derive(Debug, Clone)]
pub struct FailedLookup {
    pub code: CourseCode,
    pub error: String,
}

/// Outcome of a completed batch.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Number of data rows written.
    pub written: usize,
    pub failures: Vec<FailedLookup>,
}

/// Row layout of the output file, in [`HEADER`] order.
#[derive(Serialize)]
struct CsvRow<'a> {
    subject: &'a str,
    number: &'a str,
    credits: u32,
    semesters: &'a str,
    requisites: &'a str,
}

impl<'a> From<&'a CourseRecord> for CsvRow<'a> {
    fn from(record: &'a CourseRecord) -> Self {
        Self {
            subject: &record.subject,
            number: &record.number,
            credits: record.credits,
            semesters: &record.semesters,
            requisites: &record.requisites,
        }
    }
}

/// Parses a course list: one code per line, `#` lines are comments and
/// blank lines are ignored. Every code is validated.
pub fn parse_course_list(text: &str) -> Result<Vec<CourseCode>> {
    text.lines()
        .filter(|line| !line.starts_with('#') && !line.trim().is_empty())
        .map(CourseCode::parse)
        .collect()
}

pub async fn read_course_list(path: &Path) -> Result<Vec<CourseCode>> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ScraperError::InputError {
            path: path.to_path_buf(),
            source,
        })?;

    parse_course_list(&text)
}

/// Writes the header and one row per record. The header is written even
/// when there are no records.
pub fn write_records<W: io::Write>(writer: W, records: &[CourseRecord]) -> Result<()> {
    let writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    write_rows(writer, records)
}

/// Creates or truncates `path` and writes the records to it.
pub fn write_csv(path: &Path, records: &[CourseRecord]) -> Result<()> {
    let writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    write_rows(writer, records)
}

fn write_rows<W: io::Write>(mut writer: csv::Writer<W>, records: &[CourseRecord]) -> Result<()> {
    writer.write_record(HEADER)?;
    for record in records {
        writer.serialize(CsvRow::from(record))?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Looks up every code in order and writes the results to the configured
/// output file.
pub async fn run_codes<S>(session: &mut S, codes: &[CourseCode], config: &Config) -> Result<RunReport>
where
    S: CatalogSession + ?Sized,
{
    let mut records = Vec::with_capacity(codes.len());
    let mut report = RunReport::default();

    for (i, code) in codes.iter().enumerate() {
        if i > 0 {
            if let Some(pause) = config.delay.pick() {
                tokio::time::sleep(pause).await;
            }
        }

        info!(course = %code, index = i + 1, total = codes.len(), "looking up course");

        match lookup::lookup_course(session, &config.search_url, code).await {
            Ok(record) => {
                debug!("parsed {record}");
                records.push(record);
            }
            Err(err) => match config.on_failure {
                FailurePolicy::Abort => {
                    warn!(course = %code, error = %err, "lookup failed, aborting batch");
                    return Err(err);
                }
                FailurePolicy::Skip => {
                    warn!(course = %code, error = %err, "lookup failed, skipping");
                    report.failures.push(FailedLookup {
                        code: code.clone(),
                        error: err.to_string(),
                    });
                }
            },
        }
    }

    write_csv(&config.output_path, &records)?;
    report.written = records.len();

    info!(
        written = report.written,
        failed = report.failures.len(),
        output = %config.output_path.display(),
        "batch finished"
    );
    Ok(report)
}

/// Reads the configured course list, then looks every course up.
///
/// The whole list is validated before the first lookup.
pub async fn run<S>(session: &mut S, config: &Config) -> Result<RunReport>
where
    S: CatalogSession + ?Sized,
{
    let codes = read_course_list(&config.input_path).await?;
    run_codes(session, &codes, config).await
}
