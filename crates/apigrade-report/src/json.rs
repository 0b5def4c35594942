use serde::Serialize;

use apigrade_core::types::{ScoreResult, SubmissionAnalysis, WeekNumber};

use crate::ReportContext;

/// Category stored in the record when the no-code branch was taken.
pub const NO_CODE_CATEGORY: &str = "No Code";

/// Machine-readable evaluation artifact: the analysis plus grading metadata.
#[derive(Debug, Serialize)]
pub struct EvaluationRecord<'a> {
    #[serde(flatten)]
    pub analysis: &'a SubmissionAnalysis,
    pub evaluation_score: u32,
    pub evaluation_category: String,
    pub has_code: bool,
    pub timestamp: String,
    pub student_name: &'a str,
    pub week_number: WeekNumber,
}

impl<'a> EvaluationRecord<'a> {
    /// Record for a scored submission.
    pub fn scored(
        ctx: &ReportContext<'a>,
        analysis: &'a SubmissionAnalysis,
        score: &ScoreResult,
    ) -> Self {
        Self {
            analysis,
            evaluation_score: score.score,
            evaluation_category: score.category.label().to_string(),
            has_code: true,
            timestamp: ctx.iso_timestamp(),
            student_name: ctx.student_name,
            week_number: ctx.week,
        }
    }

    /// Record for a run that found no source files.
    pub fn no_code(ctx: &ReportContext<'a>, analysis: &'a SubmissionAnalysis) -> Self {
        Self {
            analysis,
            evaluation_score: 0,
            evaluation_category: NO_CODE_CATEGORY.to_string(),
            has_code: false,
            timestamp: ctx.iso_timestamp(),
            student_name: ctx.student_name,
            week_number: ctx.week,
        }
    }
}

/// Format the record as indented JSON.
pub fn format_record(record: &EvaluationRecord<'_>) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::context;
    use apigrade_core::config::CourseConfig;
    use apigrade_core::types::Category;

    fn scored_analysis() -> SubmissionAnalysis {
        SubmissionAnalysis {
            files_analyzed: vec!["main.py".to_string()],
            total_lines: 50,
            functions_count: 2,
            classes_count: 0,
            framework_usage: true,
            endpoints_found: vec!["GET /".to_string(), "POST /items".to_string()],
            test_files: Vec::new(),
            imports: vec!["from fastapi import FastAPI".to_string()],
            syntax_errors: ["a.py", "b.py", "c.py", "d.py"]
                .iter()
                .map(|f| format!("{f}: permission denied"))
                .collect(),
        }
    }

    fn parse(record: &EvaluationRecord<'_>) -> serde_json::Value {
        let json = format_record(record).expect("record should serialize");
        serde_json::from_str(&json).expect("should be valid JSON")
    }

    #[test]
    fn test_scored_record_mirrors_score() {
        let course = CourseConfig::default();
        let ctx = context(&course, 3);
        let analysis = scored_analysis();
        let score = ScoreResult {
            score: 92,
            category: Category::Excellent,
            feedback: Vec::new(),
            improvements: Vec::new(),
            criteria: Vec::new(),
        };

        let parsed = parse(&EvaluationRecord::scored(&ctx, &analysis, &score));
        assert_eq!(parsed["evaluation_score"], 92);
        assert_eq!(parsed["evaluation_category"], "Excellent");
        assert_eq!(parsed["has_code"], true);
        assert_eq!(parsed["student_name"], "Ada Lovelace");
        assert_eq!(parsed["week_number"], 3);
        assert!(parsed["timestamp"]
            .as_str()
            .unwrap()
            .starts_with("2025-03-14T09:26:53"));
    }

    #[test]
    fn test_record_flattens_analysis_fields() {
        let course = CourseConfig::default();
        let ctx = context(&course, 3);
        let analysis = scored_analysis();
        let parsed = parse(&EvaluationRecord::no_code(&ctx, &analysis));

        assert_eq!(parsed["files_analyzed"][0], "main.py");
        assert_eq!(parsed["total_lines"], 50);
        assert_eq!(parsed["functions_count"], 2);
        assert_eq!(parsed["classes_count"], 0);
        assert_eq!(parsed["fastapi_usage"], true);
        assert_eq!(parsed["endpoints_found"][1], "POST /items");
        assert_eq!(parsed["test_files"].as_array().unwrap().len(), 0);
        assert_eq!(parsed["imports"][0], "from fastapi import FastAPI");
        // The record keeps every error; only the narrative truncates.
        assert_eq!(parsed["syntax_errors"].as_array().unwrap().len(), 4);
        assert!(parsed.get("analysis").is_none());
    }

    #[test]
    fn test_no_code_record() {
        let course = CourseConfig::default();
        let ctx = context(&course, 1);
        let analysis = SubmissionAnalysis::default();
        let parsed = parse(&EvaluationRecord::no_code(&ctx, &analysis));
        assert_eq!(parsed["evaluation_score"], 0);
        assert_eq!(parsed["evaluation_category"], NO_CODE_CATEGORY);
        assert_eq!(parsed["has_code"], false);
        assert_eq!(parsed["files_analyzed"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_record_is_indented() {
        let course = CourseConfig::default();
        let ctx = context(&course, 1);
        let analysis = SubmissionAnalysis::default();
        let json = format_record(&EvaluationRecord::no_code(&ctx, &analysis)).unwrap();
        assert!(json.contains("\n  \"files_analyzed\""));
    }
}
