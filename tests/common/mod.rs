// tests/common/mod.rs

#![allow(dead_code)]

use async_trait::async_trait;
use catalog_scraper::lookup::{COURSE_NUMBER_INPUT, DETAIL_BLOCKS, SUBJECT_SELECT, SUBMIT_BUTTON};
use catalog_scraper::{CatalogSession, Config, DelayConfig, Result, ScraperError};
use std::collections::HashMap;
use std::path::Path;
use tempfile::TempDir;

/// A catalog stand-in that answers searches from a fixed table.
///
/// Every interaction is recorded in `calls` so tests can assert on the
/// exact sequence a lookup performs.
#[derive(Default)]
pub struct ScriptedSession {
    pub subjects: Vec<String>,
    pub results: HashMap<String, Vec<String>>,
    pub calls: Vec<String>,
    pub closed: bool,
    on_form: bool,
    subject: Option<String>,
    number: String,
    shown: Option<String>,
}

impl ScriptedSession {
    pub fn new(subjects: &[&str]) -> Self {
        Self {
            subjects: subjects.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn with_result(mut self, code: &str, blocks: &[&str]) -> Self {
        self.results
            .insert(code.to_string(), blocks.iter().map(|b| b.to_string()).collect());
        self
    }

    pub fn navigations(&self) -> usize {
        self.calls.iter().filter(|c| c.starts_with("navigate")).count()
    }
}

#[async_trait]
impl CatalogSession for ScriptedSession {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        self.calls.push(format!("navigate {url}"));
        self.on_form = true;
        self.subject = None;
        self.number.clear();
        self.shown = None;
        Ok(())
    }

    async fn select_option(&mut self, selector: &str, value: &str) -> Result<()> {
        self.calls.push(format!("select {selector} {value}"));
        if !self.on_form || selector != SUBJECT_SELECT {
            return Err(ScraperError::ElementNotFound(selector.to_string()));
        }
        if !self.subjects.iter().any(|s| s == value) {
            return Err(ScraperError::OptionNotFound {
                selector: selector.to_string(),
                value: value.to_string(),
            });
        }
        self.subject = Some(value.to_string());
        Ok(())
    }

    async fn type_text(&mut self, selector: &str, text: &str) -> Result<()> {
        self.calls.push(format!("type {selector} {text}"));
        if !self.on_form || selector != COURSE_NUMBER_INPUT {
            return Err(ScraperError::ElementNotFound(selector.to_string()));
        }
        self.number.push_str(text);
        Ok(())
    }

    async fn submit(&mut self, selector: &str) -> Result<()> {
        self.calls.push(format!("submit {selector}"));
        if !self.on_form || selector != SUBMIT_BUTTON {
            return Err(ScraperError::ElementNotFound(selector.to_string()));
        }
        self.on_form = false;
        self.shown = Some(format!(
            "{}{}",
            self.subject.clone().unwrap_or_default(),
            self.number
        ));
        Ok(())
    }

    async fn texts(&mut self, selector: &str) -> Result<Vec<String>> {
        self.calls.push(format!("texts {selector}"));
        if selector != DETAIL_BLOCKS {
            return Ok(Vec::new());
        }
        Ok(self
            .shown
            .as_ref()
            .and_then(|code| self.results.get(code))
            .cloned()
            .unwrap_or_default())
    }

    async fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}

/// A fresh scratch directory, removed when the returned guard drops.
pub fn tmp_dir(name: &str) -> TempDir {
    tempfile::Builder::new()
        .prefix(&format!("catalog_scraper_{name}_"))
        .tempdir()
        .unwrap()
}

/// Config pointing at `dir/input.txt` and `dir/input.csv`, without delays.
pub fn config_in(dir: &Path) -> Config {
    Config {
        input_path: dir.join("input.txt"),
        output_path: dir.join("input.csv"),
        delay: DelayConfig {
            enabled: false,
            ..Default::default()
        },
        ..Default::default()
    }
}

pub const CSE102: [&str; 3] = [
    "Fall semester, odd years, Spring semester, even years",
    "Total Credits: 4",
    "Prerequisite: CSE 101",
];

pub const MTH132: [&str; 3] = [
    "Fall of every year, Spring of every year, Summer of every year",
    "Total Credits: 3",
    "Prerequisite: MTH 103 or MTH 116, or designated score on math placement",
];
