use colored::Colorize;

use apigrade_core::types::{Category, ScoreResult, SubmissionAnalysis};

use crate::ReportContext;

/// Format a short evaluation summary for terminal output.
///
/// `score` is `None` when the submission had no source files.
pub fn format_summary(
    ctx: &ReportContext<'_>,
    analysis: &SubmissionAnalysis,
    score: Option<&ScoreResult>,
) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "\n{}\n",
        format!("apigrade - {} week {}", ctx.course.name, ctx.week)
            .as_str()
            .bold()
    ));
    out.push_str(&format!("{}\n", "=".repeat(40)));
    out.push_str(&format!("{}: {}\n", "Student".bold(), ctx.student_name));

    let Some(score) = score else {
        out.push_str(&format!(
            "\n{}\n",
            "No source files found - diagnostic report written".yellow().bold()
        ));
        return out;
    };

    let points = format!("{}/{}", score.score, ctx.max_score);
    let points = match score.category {
        Category::Excellent | Category::Satisfactory => points.as_str().green(),
        Category::NeedsImprovement => points.as_str().yellow(),
        Category::Insufficient => points.as_str().red(),
    };
    out.push_str(&format!("{}: {} ({})\n", "Score".bold(), points, score.category));

    if !score.criteria.is_empty() {
        out.push_str(&format!("\n{}\n{}\n", "Breakdown".bold(), "-".repeat(40)));
        for c in &score.criteria {
            out.push_str(&format!("  {:<22} {:>3}/{}\n", c.name, c.awarded, c.possible));
        }
    }

    out.push_str(&format!(
        "\n{}: {} files, {} lines, {} endpoints, {} test files\n",
        "Summary".bold(),
        analysis.files_analyzed.len(),
        analysis.total_lines,
        analysis.endpoints_found.len(),
        analysis.test_files.len(),
    ));

    if !analysis.syntax_errors.is_empty() {
        out.push_str(&format!(
            "{}: {} file(s) could not be read\n",
            "Warning".yellow().bold(),
            analysis.syntax_errors.len()
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::context;
    use apigrade_core::config::CourseConfig;
    use apigrade_core::types::CriterionScore;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_summary_with_score() {
        plain();
        let course = CourseConfig::default();
        let analysis = SubmissionAnalysis {
            files_analyzed: vec!["main.py".to_string()],
            total_lines: 40,
            ..SubmissionAnalysis::default()
        };
        let score = ScoreResult {
            score: 75,
            category: Category::NeedsImprovement,
            feedback: Vec::new(),
            improvements: Vec::new(),
            criteria: vec![CriterionScore {
                name: "Delivery".to_string(),
                awarded: 20,
                possible: 20,
            }],
        };

        let summary = format_summary(&context(&course, 2), &analysis, Some(&score));
        assert!(summary.contains("Score: 75/100 (Needs Improvement)"));
        assert!(summary.contains("Delivery"));
        assert!(summary.contains(" 20/20"));
        assert!(summary.contains("1 files, 40 lines, 0 endpoints, 0 test files"));
        assert!(!summary.contains("could not be read"));
    }

    #[test]
    fn test_summary_without_code() {
        plain();
        let course = CourseConfig::default();
        let summary = format_summary(&context(&course, 1), &SubmissionAnalysis::default(), None);
        assert!(summary.contains("No source files found"));
        assert!(!summary.contains("Score"));
    }
}
