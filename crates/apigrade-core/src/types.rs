use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::GradeError;

/// Course week a submission is graded against. Always >= 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct WeekNumber(u32);

impl WeekNumber {
    pub fn new(week: u32) -> Result<Self, GradeError> {
        if week == 0 {
            return Err(GradeError::InvalidWeek(week.to_string()));
        }
        Ok(Self(week))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn next(self) -> u32 {
        self.0.saturating_add(1)
    }
}

impl Default for WeekNumber {
    fn default() -> Self {
        Self(1)
    }
}

impl fmt::Display for WeekNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for WeekNumber {
    type Err = GradeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let week: u32 = s
            .trim()
            .parse()
            .map_err(|_| GradeError::InvalidWeek(s.to_string()))?;
        Self::new(week).map_err(|_| GradeError::InvalidWeek(s.to_string()))
    }
}

impl TryFrom<u32> for WeekNumber {
    type Error = GradeError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<WeekNumber> for u32 {
    fn from(week: WeekNumber) -> u32 {
        week.0
    }
}

/// Signals extracted from a single source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSignals {
    pub non_blank_lines: usize,
    pub functions: usize,
    pub classes: usize,
    pub uses_framework: bool,
    /// "METHOD PATH" labels in match order; may contain duplicates.
    pub endpoints: Vec<String>,
    pub is_test_file: bool,
    pub imports: Vec<String>,
}

/// Aggregated signals for a whole submission tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionAnalysis {
    pub files_analyzed: Vec<String>,
    pub total_lines: usize,
    pub functions_count: usize,
    pub classes_count: usize,
    #[serde(rename = "fastapi_usage")]
    pub framework_usage: bool,
    pub endpoints_found: Vec<String>,
    pub test_files: Vec<String>,
    pub imports: Vec<String>,
    pub syntax_errors: Vec<String>,
}

impl SubmissionAnalysis {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_code(&self) -> bool {
        !self.files_analyzed.is_empty()
    }

    /// Fold one file's signals into the totals.
    pub fn absorb(&mut self, rel_path: &str, signals: FileSignals) {
        self.files_analyzed.push(rel_path.to_string());
        self.total_lines += signals.non_blank_lines;
        self.functions_count += signals.functions;
        self.classes_count += signals.classes;
        self.framework_usage |= signals.uses_framework;

        for endpoint in signals.endpoints {
            self.add_endpoint(endpoint);
        }

        if signals.is_test_file {
            self.test_files.push(rel_path.to_string());
        }
        self.imports.extend(signals.imports);
    }

    /// Insert an endpoint label unless it was already seen.
    pub fn add_endpoint(&mut self, label: String) -> bool {
        if self.endpoints_found.contains(&label) {
            return false;
        }
        self.endpoints_found.push(label);
        true
    }

    pub fn record_read_error(&mut self, file_name: &str, error: &str) {
        self.syntax_errors.push(format!("{file_name}: {error}"));
    }
}

/// Grade band, ordered from worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Insufficient,
    NeedsImprovement,
    Satisfactory,
    Excellent,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Excellent => "Excellent",
            Category::Satisfactory => "Satisfactory",
            Category::NeedsImprovement => "Needs Improvement",
            Category::Insufficient => "Insufficient",
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            Category::Excellent => "🏆",
            Category::Satisfactory => "✅",
            Category::NeedsImprovement => "⚠️",
            Category::Insufficient => "❌",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Points awarded for one rubric line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionScore {
    pub name: String,
    pub awarded: u32,
    pub possible: u32,
}

/// Outcome of scoring a submission for a given week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub score: u32,
    pub category: Category,
    pub feedback: Vec<String>,
    pub improvements: Vec<String>,
    pub criteria: Vec<CriterionScore>,
}
