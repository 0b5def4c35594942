pub mod json;
pub mod markdown;
pub mod persist;
pub mod text;

use chrono::{DateTime, Local};

use apigrade_core::config::CourseConfig;
use apigrade_core::types::WeekNumber;

/// Run-wide facts shared by every renderer.
#[derive(Debug, Clone)]
pub struct ReportContext<'a> {
    pub student_name: &'a str,
    pub week: WeekNumber,
    /// Captured once per run so narrative and record agree.
    pub timestamp: DateTime<Local>,
    pub framework: &'a str,
    pub file_extensions: &'a [&'a str],
    pub max_score: u32,
    pub course: &'a CourseConfig,
}

impl ReportContext<'_> {
    pub fn display_timestamp(&self) -> String {
        self.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()
    }

    pub fn iso_timestamp(&self) -> String {
        self.timestamp.to_rfc3339()
    }

    /// Course material folder for the current week, e.g. `/week-03/`.
    pub fn week_material_path(&self) -> String {
        format!("/week-{:02}/", self.week.get())
    }
}
