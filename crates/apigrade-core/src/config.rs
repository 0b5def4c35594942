use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const CONFIG_FILE: &str = ".apigrade.toml";

/// Top-level configuration from `.apigrade.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scanner: ScannerConfig,
    #[serde(default)]
    pub rubric: RubricConfig,
    #[serde(default)]
    pub course: CourseConfig,
}

/// Which files the scanner visits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Directory names skipped wherever they appear in a path.
    #[serde(default = "default_excluded_dirs")]
    pub excluded_dirs: Vec<String>,
    /// Extra glob patterns, matched against paths relative to the submission root.
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

fn default_excluded_dirs() -> Vec<String> {
    vec![".git".to_string(), "__pycache__".to_string()]
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            excluded_dirs: default_excluded_dirs(),
            exclude_patterns: Vec::new(),
        }
    }
}

/// Weights and week-scaled thresholds used by the scorer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RubricConfig {
    #[serde(default = "default_delivery_points")]
    pub delivery_points: u32,
    #[serde(default = "default_framework_points")]
    pub framework_points: u32,
    #[serde(default = "default_max_score")]
    pub max_score: u32,
    #[serde(default)]
    pub endpoints: EndpointRubric,
    #[serde(default)]
    pub volume: VolumeRubric,
    #[serde(default)]
    pub bonus: BonusRubric,
    #[serde(default)]
    pub bands: CategoryBands,
}

fn default_delivery_points() -> u32 {
    20
}
fn default_framework_points() -> u32 {
    30
}
fn default_max_score() -> u32 {
    100
}

impl Default for RubricConfig {
    fn default() -> Self {
        Self {
            delivery_points: default_delivery_points(),
            framework_points: default_framework_points(),
            max_score: default_max_score(),
            endpoints: EndpointRubric::default(),
            volume: VolumeRubric::default(),
            bonus: BonusRubric::default(),
            bands: CategoryBands::default(),
        }
    }
}

/// Endpoint coverage: expected count is the week clamped into `[min_expected, max_expected]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointRubric {
    #[serde(default = "default_endpoint_points")]
    pub points: u32,
    #[serde(default = "default_min_expected")]
    pub min_expected: u32,
    #[serde(default = "default_max_expected")]
    pub max_expected: u32,
}

fn default_endpoint_points() -> u32 {
    25
}
fn default_min_expected() -> u32 {
    2
}
fn default_max_expected() -> u32 {
    5
}

impl Default for EndpointRubric {
    fn default() -> Self {
        Self {
            points: default_endpoint_points(),
            min_expected: default_min_expected(),
            max_expected: default_max_expected(),
        }
    }
}

impl EndpointRubric {
    pub fn expected_for(&self, week: u32) -> u32 {
        let min = self.min_expected.max(1);
        week.clamp(min, self.max_expected.max(min))
    }
}

/// Code volume tiers relative to `max(min_lines, week * lines_per_week)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeRubric {
    #[serde(default = "default_volume_points")]
    pub points: u32,
    #[serde(default = "default_basic_points")]
    pub basic_points: u32,
    #[serde(default = "default_minimal_points")]
    pub minimal_points: u32,
    #[serde(default = "default_floor_points")]
    pub floor_points: u32,
    #[serde(default = "default_basic_ratio")]
    pub basic_ratio: f64,
    #[serde(default = "default_minimal_ratio")]
    pub minimal_ratio: f64,
    #[serde(default = "default_min_lines")]
    pub min_lines: u32,
    #[serde(default = "default_lines_per_week")]
    pub lines_per_week: u32,
}

fn default_volume_points() -> u32 {
    25
}
fn default_basic_points() -> u32 {
    20
}
fn default_minimal_points() -> u32 {
    15
}
fn default_floor_points() -> u32 {
    5
}
fn default_basic_ratio() -> f64 {
    0.7
}
fn default_minimal_ratio() -> f64 {
    0.4
}
fn default_min_lines() -> u32 {
    30
}
fn default_lines_per_week() -> u32 {
    15
}

impl Default for VolumeRubric {
    fn default() -> Self {
        Self {
            points: default_volume_points(),
            basic_points: default_basic_points(),
            minimal_points: default_minimal_points(),
            floor_points: default_floor_points(),
            basic_ratio: default_basic_ratio(),
            minimal_ratio: default_minimal_ratio(),
            min_lines: default_min_lines(),
            lines_per_week: default_lines_per_week(),
        }
    }
}

impl VolumeRubric {
    pub fn expected_lines(&self, week: u32) -> u32 {
        self.min_lines.max(week.saturating_mul(self.lines_per_week))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BonusRubric {
    #[serde(default = "default_bonus_points")]
    pub modularization_points: u32,
    #[serde(default = "default_min_functions")]
    pub min_functions: usize,
    #[serde(default = "default_bonus_points")]
    pub tests_points: u32,
}

fn default_bonus_points() -> u32 {
    5
}
fn default_min_functions() -> usize {
    3
}

impl Default for BonusRubric {
    fn default() -> Self {
        Self {
            modularization_points: default_bonus_points(),
            min_functions: default_min_functions(),
            tests_points: default_bonus_points(),
        }
    }
}

/// Inclusive lower bounds of each category band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryBands {
    #[serde(default = "default_excellent")]
    pub excellent: u32,
    #[serde(default = "default_satisfactory")]
    pub satisfactory: u32,
    #[serde(default = "default_needs_improvement")]
    pub needs_improvement: u32,
}

fn default_excellent() -> u32 {
    90
}
fn default_satisfactory() -> u32 {
    80
}
fn default_needs_improvement() -> u32 {
    70
}

impl Default for CategoryBands {
    fn default() -> Self {
        Self {
            excellent: default_excellent(),
            satisfactory: default_satisfactory(),
            needs_improvement: default_needs_improvement(),
        }
    }
}

/// Static course details echoed in the report footer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseConfig {
    #[serde(default = "default_course_name")]
    pub name: String,
    #[serde(default = "default_total_weeks")]
    pub total_weeks: u32,
    #[serde(default = "default_repository")]
    pub repository: String,
    #[serde(default)]
    pub instructor: Option<String>,
    #[serde(default)]
    pub institution: Option<String>,
}

fn default_course_name() -> String {
    "bc-fastapi".to_string()
}
fn default_total_weeks() -> u32 {
    11
}
fn default_repository() -> String {
    "https://github.com/elparchetipk/bc-fastapi".to_string()
}

impl Default for CourseConfig {
    fn default() -> Self {
        Self {
            name: default_course_name(),
            total_weeks: default_total_weeks(),
            repository: default_repository(),
            instructor: None,
            institution: None,
        }
    }
}

impl Config {
    /// Load configuration from a `.apigrade.toml` file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        let config: Config = toml::from_str(&content).with_context(|| {
            format!(
                "failed to parse '{}'. Run `apigrade init` to create a valid config file",
                path.display()
            )
        })?;
        Ok(config)
    }

    /// Load from `.apigrade.toml` in the given directory or any ancestor, or return defaults.
    pub fn load_or_default(dir: &Path) -> Self {
        let start = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
        for current in start.ancestors() {
            let config_path = current.join(CONFIG_FILE);
            if config_path.exists() {
                return match Self::load(&config_path) {
                    Ok(config) => {
                        tracing::debug!(path = %config_path.display(), "loaded config");
                        config
                    }
                    Err(e) => {
                        tracing::warn!(
                            "failed to load config from '{}': {e:#}. Using defaults.",
                            config_path.display()
                        );
                        Self::default()
                    }
                };
            }
        }
        Self::default()
    }

    /// Generate default TOML content for `apigrade init`.
    pub fn default_toml() -> String {
        r#"# apigrade - FastAPI submission grader configuration

[scanner]
# Directory names skipped anywhere in the submission tree
excluded_dirs = [".git", "__pycache__"]
# Extra globs relative to the submission root
# exclude_patterns = ["venv/**", "migrations/**"]

[rubric]
delivery_points = 20
framework_points = 30
max_score = 100

[rubric.endpoints]
# Expected endpoint count is the week number clamped into [min_expected, max_expected]
points = 25
min_expected = 2
max_expected = 5

[rubric.volume]
# Expected lines = max(min_lines, week * lines_per_week)
points = 25
basic_points = 20
minimal_points = 15
floor_points = 5
basic_ratio = 0.7
minimal_ratio = 0.4
min_lines = 30
lines_per_week = 15

[rubric.bonus]
modularization_points = 5
min_functions = 3
tests_points = 5

[rubric.bands]
excellent = 90
satisfactory = 80
needs_improvement = 70

[course]
name = "bc-fastapi"
total_weeks = 11
repository = "https://github.com/elparchetipk/bc-fastapi"
# instructor = "Jane Doe"
# institution = "Example Institute"
"#
        .to_string()
    }
}
