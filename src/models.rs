use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Result, ScraperError};
use crate::parsers;

/// A catalog course identifier such as `CSE102` or `MTH132H`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseCode {
    /// The three-letter department code (e.g., "CSE").
    pub subject: String,
    /// Everything after the department code (e.g., "102" or "891H").
    pub number: String,
}

impl CourseCode {
    /// Splits a raw code into subject and number.
    ///
    /// The first three characters must be ASCII letters and the remainder
    /// must not be empty. Nothing else about the number is checked; it is
    /// typed into the search form as-is.
    pub fn parse(raw: &str) -> Result<Self> {
        let invalid = |reason| ScraperError::InvalidCourseCode {
            code: raw.to_string(),
            reason,
        };

        let subject = raw
            .get(..3)
            .filter(|s| s.chars().all(|c| c.is_ascii_alphabetic()))
            .ok_or_else(|| invalid("must start with a 3-letter subject code"))?;

        let number = &raw[3..];
        if number.is_empty() {
            return Err(invalid("missing course number after the subject code"));
        }

        Ok(Self {
            subject: subject.to_string(),
            number: number.to_string(),
        })
    }
}

impl fmt::Display for CourseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.subject, self.number)
    }
}

/// How often a course runs within its season.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    /// Offered in odd years only.
    Odd,
    /// Offered in even years only.
    Even,
    /// Offered every year.
    Every,
}

impl Parity {
    /// Suffix appended to the season in the short semester code.
    pub fn suffix(&self) -> &'static str {
        match self {
            Parity::Odd => "Odd",
            Parity::Even => "Even",
            Parity::Every => "",
        }
    }

    /// Whether a course with this parity runs in the given calendar year.
    pub fn includes(&self, year: i32) -> bool {
        match self {
            Parity::Odd => year.rem_euclid(2) == 1,
            Parity::Even => year.rem_euclid(2) == 0,
            Parity::Every => true,
        }
    }
}

/// A normalized offering term, displayed as e.g. `FallOdd` or `Summer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    /// Season name as printed by the catalog ("Fall", "Spring", ...).
    pub season: String,
    pub parity: Parity,
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.season, self.parity.suffix())
    }
}

impl FromStr for Term {
    type Err = ScraperError;

    /// Reads a short semester code such as `FallOdd` or `Summer` back.
    fn from_str(code: &str) -> Result<Self> {
        let (season, parity) = if let Some(season) = code.strip_suffix("Odd") {
            (season, Parity::Odd)
        } else if let Some(season) = code.strip_suffix("Even") {
            (season, Parity::Even)
        } else {
            (code, Parity::Every)
        };

        if season.is_empty() || !season.chars().all(|c| c.is_alphabetic()) {
            return Err(ScraperError::ParsingError(format!(
                "not a semester code: {code:?}"
            )));
        }

        Ok(Self {
            season: season.to_string(),
            parity,
        })
    }
}

impl Term {
    /// Whether this term falls in `season` of `year`.
    pub fn offered_in(&self, season: &str, year: i32) -> bool {
        self.season == season && self.parity.includes(year)
    }
}

/// One parsed catalog entry, ready to be written as a CSV row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseRecord {
    /// The three-letter department code.
    pub subject: String,
    /// The course number, kept as text ("891H" is valid).
    pub number: String,
    /// Normalized semester codes joined with `|`, in page order.
    pub semesters: String,
    /// Credit count read from the "Total Credits: N" label.
    pub credits: u32,
    /// Requisite text exactly as shown on the page.
    pub requisites: String,
}

impl CourseRecord {
    /// Builds a record from the three detail blocks of a search result,
    /// in page order: semesters, credits, requisites.
    pub fn from_raw(code: &CourseCode, blocks: &[String; 3]) -> Result<Self> {
        let [semesters, credits, requisites] = blocks;

        Ok(Self {
            subject: code.subject.clone(),
            number: code.number.clone(),
            semesters: parsers::semester::format_semesters(semesters),
            credits: parsers::course::parse_credits(credits)?,
            requisites: requisites.clone(),
        })
    }

    /// The terms listed in `semesters`, in page order.
    pub fn terms(&self) -> Result<Vec<Term>> {
        self.semesters
            .split('|')
            .filter(|code| !code.is_empty())
            .map(str::parse)
            .collect()
    }

    /// Whether the course runs in `season` of `year`.
    pub fn offered_in(&self, season: &str, year: i32) -> Result<bool> {
        Ok(self
            .terms()?
            .iter()
            .any(|term| term.offered_in(season, year)))
    }
}

impl fmt::Display for CourseRecord {
    /// Multi-line dump used in log output, body lines tab-indented:
    ///
    /// ```text
    /// CSE 102 (
    ///     Semesters: FallOdd|Spring
    ///     Credits: 4
    ///     "Prerequisite: CSE 101"
    ///
    /// )
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {} (", self.subject, self.number)?;
        writeln!(f, "\tSemesters: {}", self.semesters)?;
        writeln!(f, "\tCredits: {}", self.credits)?;
        writeln!(f, "\t{:?}", self.requisites)?;
        write!(f, "\n)")
    }
}

/// Configuration for pacing lookups via randomized delays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelayConfig {
    /// Minimum sleep duration in milliseconds between lookups.
    pub min_delay_ms: u64,
    /// Maximum sleep duration in milliseconds between lookups.
    pub max_delay_ms: u64,
    /// Whether the randomized delay logic is active.
    pub enabled: bool,
}

impl Default for DelayConfig {
    /// Default configuration: 500ms - 1500ms, enabled.
    fn default() -> Self {
        Self {
            min_delay_ms: 500,
            max_delay_ms: 1500,
            enabled: true,
        }
    }
}

impl DelayConfig {
    /// A random pause within the configured bounds, or `None` when disabled.
    pub fn pick(&self) -> Option<Duration> {
        if !self.enabled {
            return None;
        }
        let max = self.max_delay_ms.max(self.min_delay_ms);
        let ms = rand::rng().random_range(self.min_delay_ms..=max);
        Some(Duration::from_millis(ms))
    }
}
