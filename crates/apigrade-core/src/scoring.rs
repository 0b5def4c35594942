use crate::config::{CategoryBands, EndpointRubric, RubricConfig, VolumeRubric};
use crate::types::{Category, CriterionScore, ScoreResult, SubmissionAnalysis, WeekNumber};

/// Accumulates points and notes while the rubric is applied.
#[derive(Default)]
struct Tally {
    total: u32,
    feedback: Vec<String>,
    improvements: Vec<String>,
    criteria: Vec<CriterionScore>,
}

impl Tally {
    fn award(&mut self, name: &str, awarded: u32, possible: u32) {
        self.total += awarded;
        self.criteria.push(CriterionScore {
            name: name.to_string(),
            awarded,
            possible,
        });
    }
}

/// Applies a [`RubricConfig`] to a [`SubmissionAnalysis`].
pub struct Scorer<'a> {
    rubric: &'a RubricConfig,
    framework: &'a str,
}

impl<'a> Scorer<'a> {
    pub fn new(rubric: &'a RubricConfig, framework: &'a str) -> Self {
        Self { rubric, framework }
    }

    pub fn score(&self, analysis: &SubmissionAnalysis, week: WeekNumber) -> ScoreResult {
        let mut tally = Tally::default();
        let week = week.get();

        self.score_delivery(analysis, &mut tally);
        self.score_framework(analysis, &mut tally);
        score_endpoints(&self.rubric.endpoints, analysis, week, &mut tally);
        score_volume(&self.rubric.volume, analysis, week, &mut tally);
        self.score_bonuses(analysis, &mut tally);

        let score = tally.total.min(self.rubric.max_score);
        ScoreResult {
            score,
            category: categorize(score, &self.rubric.bands),
            feedback: tally.feedback,
            improvements: tally.improvements,
            criteria: tally.criteria,
        }
    }

    fn score_delivery(&self, analysis: &SubmissionAnalysis, tally: &mut Tally) {
        let possible = self.rubric.delivery_points;
        let files = analysis.files_analyzed.len();
        if files > 0 {
            tally.award("Delivery", possible, possible);
            tally.feedback.push(format!("✅ {files} source files delivered"));
        } else {
            tally.award("Delivery", 0, possible);
            tally.improvements.push("❌ No source files were found".to_string());
        }
    }

    fn score_framework(&self, analysis: &SubmissionAnalysis, tally: &mut Tally) {
        let possible = self.rubric.framework_points;
        if analysis.framework_usage {
            tally.award("Framework usage", possible, possible);
            tally.feedback.push(format!("✅ {} used correctly", self.framework));
        } else {
            tally.award("Framework usage", 0, possible);
            tally.improvements.push(format!(
                "⚠️ {} not detected - check your imports",
                self.framework
            ));
        }
    }

    fn score_bonuses(&self, analysis: &SubmissionAnalysis, tally: &mut Tally) {
        let bonus = &self.rubric.bonus;

        if analysis.functions_count >= bonus.min_functions {
            tally.award(
                "Modularization bonus",
                bonus.modularization_points,
                bonus.modularization_points,
            );
            tally.feedback.push("✅ Good modularization with functions".to_string());
        } else {
            tally.award("Modularization bonus", 0, bonus.modularization_points);
        }

        if analysis.test_files.is_empty() {
            tally.award("Tests bonus", 0, bonus.tests_points);
        } else {
            tally.award("Tests bonus", bonus.tests_points, bonus.tests_points);
            tally.feedback.push(format!(
                "✅ Tests implemented ({} files)",
                analysis.test_files.len()
            ));
        }
    }
}

/// Points for endpoint coverage; partial credit rounds to the nearest point.
pub fn endpoint_points(rubric: &EndpointRubric, found: usize, week: u32) -> u32 {
    let expected = rubric.expected_for(week) as usize;
    if found >= expected {
        rubric.points
    } else {
        (f64::from(rubric.points) * found as f64 / expected as f64).round() as u32
    }
}

fn score_endpoints(
    rubric: &EndpointRubric,
    analysis: &SubmissionAnalysis,
    week: u32,
    tally: &mut Tally,
) {
    let found = analysis.endpoints_found.len();
    let expected = rubric.expected_for(week) as usize;
    let points = endpoint_points(rubric, found, week);
    tally.award("Endpoint coverage", points, rubric.points);

    if found >= expected {
        tally.feedback.push(format!("✅ {found} endpoints implemented"));
    } else if found > 0 {
        tally.feedback.push(format!("⚠️ {found} endpoints (expected: {expected})"));
        tally
            .improvements
            .push(format!("Implement {} more endpoints", expected - found));
    } else {
        tally.improvements.push("❌ No endpoints were found".to_string());
    }
}

/// Volume tier reached by a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeTier {
    WellDeveloped,
    BasicComplete,
    Minimal,
    Insufficient,
}

pub fn volume_tier(rubric: &VolumeRubric, total_lines: usize, week: u32) -> VolumeTier {
    let expected = f64::from(rubric.expected_lines(week));
    let lines = total_lines as f64;
    if lines >= expected {
        VolumeTier::WellDeveloped
    } else if lines >= expected * rubric.basic_ratio {
        VolumeTier::BasicComplete
    } else if lines >= expected * rubric.minimal_ratio {
        VolumeTier::Minimal
    } else {
        VolumeTier::Insufficient
    }
}

pub fn volume_points(rubric: &VolumeRubric, tier: VolumeTier) -> u32 {
    match tier {
        VolumeTier::WellDeveloped => rubric.points,
        VolumeTier::BasicComplete => rubric.basic_points,
        VolumeTier::Minimal => rubric.minimal_points,
        VolumeTier::Insufficient => rubric.floor_points,
    }
}

fn score_volume(
    rubric: &VolumeRubric,
    analysis: &SubmissionAnalysis,
    week: u32,
    tally: &mut Tally,
) {
    let total_lines = analysis.total_lines;
    let tier = volume_tier(rubric, total_lines, week);
    tally.award("Code volume", volume_points(rubric, tier), rubric.points);

    match tier {
        VolumeTier::WellDeveloped => {
            tally.feedback.push("✅ Well developed code".to_string());
        }
        VolumeTier::BasicComplete => {
            tally.feedback.push("✅ Basic implementation complete".to_string());
        }
        VolumeTier::Minimal => {
            tally.feedback.push("⚠️ Minimal implementation".to_string());
            tally.improvements.push(format!(
                "Expand the code (current: {total_lines}, expected: ~{} lines)",
                rubric.expected_lines(week)
            ));
        }
        VolumeTier::Insufficient => {
            tally
                .improvements
                .push(format!("❌ Insufficient code ({total_lines} lines)"));
        }
    }
}

/// Map a score onto its band. Bounds are inclusive.
pub fn categorize(score: u32, bands: &CategoryBands) -> Category {
    if score >= bands.excellent {
        Category::Excellent
    } else if score >= bands.satisfactory {
        Category::Satisfactory
    } else if score >= bands.needs_improvement {
        Category::NeedsImprovement
    } else {
        Category::Insufficient
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn week(n: u32) -> WeekNumber {
        WeekNumber::new(n).unwrap()
    }

    fn analysis(files: usize, lines: usize, endpoints: usize) -> SubmissionAnalysis {
        SubmissionAnalysis {
            files_analyzed: (0..files).map(|i| format!("f{i}.py")).collect(),
            total_lines: lines,
            endpoints_found: (0..endpoints).map(|i| format!("GET /r{i}")).collect(),
            ..SubmissionAnalysis::default()
        }
    }

    fn score(analysis: &SubmissionAnalysis, week_number: u32) -> ScoreResult {
        let rubric = RubricConfig::default();
        Scorer::new(&rubric, "FastAPI").score(analysis, week(week_number))
    }

    #[test]
    fn test_week_three_with_two_endpoints_is_excellent() {
        let mut a = analysis(1, 50, 0);
        a.framework_usage = true;
        a.endpoints_found = vec!["GET /".to_string(), "POST /items".to_string()];

        let result = score(&a, 3);
        // 20 + 30 + round(25 * 2/3) + 25
        assert_eq!(result.score, 92);
        assert_eq!(result.category, Category::Excellent);
        assert_eq!(result.improvements, vec!["Implement 1 more endpoints"]);
    }

    #[test]
    fn test_week_two_with_two_endpoints_scores_full_marks() {
        let mut a = analysis(1, 50, 0);
        a.framework_usage = true;
        a.endpoints_found = vec!["GET /".to_string(), "POST /items".to_string()];

        let result = score(&a, 2);
        assert_eq!(result.score, 100);
        assert_eq!(result.category, Category::Excellent);
        assert!(result.improvements.is_empty(), "{:?}", result.improvements);
    }

    #[test]
    fn test_maximum_raw_score_is_clamped() {
        let mut a = analysis(3, 500, 10);
        a.framework_usage = true;
        a.functions_count = 12;
        a.test_files = vec!["test_api.py".to_string()];

        let result = score(&a, 2);
        let raw: u32 = result.criteria.iter().map(|c| c.awarded).sum();
        assert_eq!(raw, 110);
        assert_eq!(result.score, 100);
    }

    #[test]
    fn test_empty_analysis_scores_floor_only() {
        let result = score(&SubmissionAnalysis::default(), 1);
        // Only the volume floor applies.
        assert_eq!(result.score, 5);
        assert_eq!(result.category, Category::Insufficient);
        assert!(result.feedback.is_empty());
        assert_eq!(result.improvements.len(), 4);
    }

    #[test]
    fn test_endpoint_partial_credit_rounds() {
        let rubric = EndpointRubric::default();
        // week 2 -> expected 2; 25 * 1/2 = 12.5
        assert_eq!(endpoint_points(&rubric, 1, 2), 13);
        // week 3 -> expected 3
        assert_eq!(endpoint_points(&rubric, 1, 3), 8);
        assert_eq!(endpoint_points(&rubric, 2, 3), 17);
        // week 5 -> expected 5
        assert_eq!(endpoint_points(&rubric, 4, 5), 20);
        assert_eq!(endpoint_points(&rubric, 0, 5), 0);
    }

    #[test]
    fn test_endpoint_points_monotonic_and_saturating() {
        let rubric = EndpointRubric::default();
        for w in 1..=12 {
            let mut previous = 0;
            for found in 0..=8 {
                let points = endpoint_points(&rubric, found, w);
                assert!(points >= previous, "week {w}, found {found}");
                assert!(points <= 25);
                if found >= rubric.expected_for(w) as usize {
                    assert_eq!(points, 25);
                }
                previous = points;
            }
        }
    }

    #[test]
    fn test_endpoint_shortfall_noted() {
        let result = score(&analysis(1, 100, 2), 5);
        assert!(result
            .improvements
            .iter()
            .any(|i| i == "Implement 3 more endpoints"));
        assert!(result
            .feedback
            .iter()
            .any(|f| f.contains("2 endpoints (expected: 5)")));
    }

    #[test]
    fn test_volume_tiers_week_four() {
        let rubric = VolumeRubric::default();
        let tier_points = |lines| volume_points(&rubric, volume_tier(&rubric, lines, 4));
        assert_eq!(tier_points(60), 25);
        assert_eq!(tier_points(45), 20);
        assert_eq!(tier_points(30), 15);
        assert_eq!(tier_points(10), 5);
    }

    #[test]
    fn test_volume_tier_boundaries() {
        let rubric = VolumeRubric::default();
        // week 1 -> expected 30; 70% = 21, 40% = 12
        assert_eq!(volume_tier(&rubric, 21, 1), VolumeTier::BasicComplete);
        assert_eq!(volume_tier(&rubric, 20, 1), VolumeTier::Minimal);
        assert_eq!(volume_tier(&rubric, 12, 1), VolumeTier::Minimal);
        assert_eq!(volume_tier(&rubric, 11, 1), VolumeTier::Insufficient);
        assert_eq!(volume_tier(&rubric, 30, 1), VolumeTier::WellDeveloped);
    }

    #[test]
    fn test_minimal_volume_notes_actual_and_expected() {
        let result = score(&analysis(1, 30, 0), 4);
        assert!(result
            .improvements
            .iter()
            .any(|i| i.contains("current: 30") && i.contains("~60")));
    }

    #[test]
    fn test_bonuses_are_independent() {
        let mut a = analysis(1, 0, 0);
        a.functions_count = 3;
        let with_functions = score(&a, 1);

        a.functions_count = 0;
        a.test_files = vec!["tests/test_main.py".to_string()];
        let with_tests = score(&a, 1);

        // delivery 20 + volume floor 5 + one bonus 5
        assert_eq!(with_functions.score, 30);
        assert_eq!(with_tests.score, 30);
        assert!(with_tests
            .feedback
            .iter()
            .any(|f| f.contains("Tests implemented (1 files)")));
    }

    #[test]
    fn test_categorize_band_edges() {
        let bands = CategoryBands::default();
        assert_eq!(categorize(100, &bands), Category::Excellent);
        assert_eq!(categorize(90, &bands), Category::Excellent);
        assert_eq!(categorize(89, &bands), Category::Satisfactory);
        assert_eq!(categorize(80, &bands), Category::Satisfactory);
        assert_eq!(categorize(79, &bands), Category::NeedsImprovement);
        assert_eq!(categorize(70, &bands), Category::NeedsImprovement);
        assert_eq!(categorize(69, &bands), Category::Insufficient);
        assert_eq!(categorize(0, &bands), Category::Insufficient);
    }

    #[test]
    fn test_custom_rubric_is_respected() {
        let rubric = RubricConfig {
            framework_points: 50,
            max_score: 60,
            ..RubricConfig::default()
        };
        let mut a = analysis(1, 0, 0);
        a.framework_usage = true;
        let result = Scorer::new(&rubric, "FastAPI").score(&a, week(1));
        // 20 + 50 + 5 = 75, capped at 60
        assert_eq!(result.score, 60);
    }

    #[test]
    fn test_criteria_breakdown_sums_to_raw_total() {
        let mut a = analysis(2, 40, 1);
        a.framework_usage = true;
        let result = score(&a, 3);
        let raw: u32 = result.criteria.iter().map(|c| c.awarded).sum();
        assert_eq!(raw, result.score);
        assert_eq!(result.criteria.len(), 6);
    }
}
