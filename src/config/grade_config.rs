use crate::config::demo::{demo_scale, demo_years};
use crate::domain::model::{GradeScale, Years};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{GpaError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_non_negative, validate_range, validate_unique_names,
    Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

/// Grade scale plus the year/term/subject tree. Either half falls back to the
/// demo data when the source omits it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeConfiguration {
    #[serde(default = "demo_years")]
    pub years: Years,
    #[serde(default = "demo_scale")]
    pub scale: GradeScale,
}

impl Default for GradeConfiguration {
    fn default() -> Self {
        Self::demo()
    }
}

impl GradeConfiguration {
    pub fn demo() -> Self {
        Self {
            years: demo_years(),
            scale: demo_scale(),
        }
    }

    /// 從檔案載入配置：`.json` 以 JSON 解析，其餘副檔名一律視為 TOML
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(GpaError::IoError)?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| GpaError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content);

        serde_json::from_str(&processed_content).map_err(|e| GpaError::ConfigValidationError {
            field: "json_parsing".to_string(),
            message: format!("JSON parsing error: {}", e),
        })
    }

    /// Missing, unreadable or invalid configuration degrades to the demo dataset.
    pub fn load_or_demo(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            tracing::debug!("No grade configuration supplied, using demo dataset");
            return Self::demo();
        };

        match Self::from_file(path).and_then(|config| config.validate().map(|_| config)) {
            Ok(config) => {
                tracing::debug!(
                    "Loaded grade configuration from {} ({} years, {} grades)",
                    path.display(),
                    config.years.len(),
                    config.scale.len()
                );
                config
            }
            Err(e) => {
                tracing::warn!(
                    "Falling back to demo grade configuration, {} is unusable: {}",
                    path.display(),
                    e
                );
                Self::demo()
            }
        }
    }

    pub fn validate_config(&self) -> Result<()> {
        // 驗證成績等級表
        if self.scale.is_empty() {
            return Err(GpaError::MissingConfigError {
                field: "scale".to_string(),
            });
        }

        for (letter, points) in self.scale.entries() {
            validate_non_empty_string("scale", letter)?;
            validate_range(&format!("scale.{}", letter), points, 0.0, 4.0)?;
        }

        // 驗證學年、學期與科目
        for (year, terms) in &self.years {
            validate_non_empty_string("years", year)?;
            for (term, subjects) in terms {
                let field = format!("years.{}.{}", year, term);
                validate_non_empty_string(&field, term)?;
                validate_unique_names(&field, subjects.iter().map(|s| s.name.as_str()))?;
                for subject in subjects {
                    validate_non_empty_string(&field, &subject.name)?;
                    validate_non_negative(&format!("{}.{}.credits", field, subject.name), subject.credits)?;
                }
            }
        }

        Ok(())
    }
}

impl ConfigProvider for GradeConfiguration {
    fn scale(&self) -> &GradeScale {
        &self.scale
    }

    fn years(&self) -> &Years {
        &self.years
    }
}

impl Validate for GradeConfiguration {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

/// 替換環境變數 (例如 ${TERM_NAME})，未設定的變數保留原樣
fn substitute_env_vars(content: &str) -> String {
    substitute_vars(content, |name| std::env::var(name).ok())
}

fn substitute_vars<F>(content: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    static VAR_PATTERN: OnceLock<Regex> = OnceLock::new();
    let re = VAR_PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("static regex"));

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        lookup(var_name).unwrap_or_else(|| format!("${{{}}}", var_name))
    })
    .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const TOML_CONFIG: &str = r#"
[scale]
"A" = 4.0
"B" = 3.0
"F" = 0

[years.2030]
"Fall" = [
    { name = "Compilers", credits = 4, type = "Regular" },
    { name = "Databases", credits = 3 },
]
"Spring" = [
    { name = "Networks", credits = 3, type = "Honors" },
]
"#;

    #[test]
    fn test_parse_toml_config() {
        let config = GradeConfiguration::from_toml_str(TOML_CONFIG).unwrap();

        assert_eq!(config.year_labels(), vec!["2030"]);
        assert_eq!(config.term_names("2030"), vec!["Fall", "Spring"]);
        assert_eq!(config.subjects("2030", "Fall").len(), 2);
        assert_eq!(config.subjects("2030", "Fall")[1].kind, "Regular");
        assert_eq!(config.grade_options(), vec!["A", "B", "F"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_scale_falls_back_to_demo_scale() {
        let config = GradeConfiguration::from_toml_str(
            r#"
[years.2030]
"Fall" = [{ name = "Compilers", credits = 4 }]
"#,
        )
        .unwrap();

        assert_eq!(config.scale, demo_scale());
        assert_eq!(config.year_labels(), vec!["2030"]);
    }

    #[test]
    fn test_missing_years_fall_back_to_demo_years() {
        let config = GradeConfiguration::from_json_str(r#"{"scale": {"P": 4.0, "F": 0}}"#).unwrap();

        assert_eq!(config.years, demo_years());
        assert_eq!(config.grade_options(), vec!["P", "F"]);
    }

    #[test]
    fn test_var_substitution() {
        let content = r#"
[years.2031]
"${TERM_NAME}" = [{ name = "Ethics", credits = 2 }]
"${UNSET_TERM}" = [{ name = "Logic", credits = 3 }]
"#;
        let substituted = substitute_vars(content, |name| {
            (name == "TERM_NAME").then(|| "Winter".to_string())
        });

        let config = GradeConfiguration::from_toml_str(&substituted).unwrap();
        assert_eq!(config.term_names("2031"), vec!["Winter", "${UNSET_TERM}"]);
    }

    #[test]
    fn test_config_validation() {
        let mut config = GradeConfiguration::demo();
        assert!(config.validate().is_ok());

        config.scale = GradeScale::from([("A", 5.0)]);
        assert!(config.validate().is_err());

        config.scale = GradeScale::default();
        assert!(matches!(
            config.validate(),
            Err(GpaError::MissingConfigError { .. })
        ));

        let mut config = GradeConfiguration::demo();
        let subjects = config
            .years
            .get_mut("2025")
            .and_then(|terms| terms.get_mut("Semester 1"))
            .unwrap();
        subjects[1].name = subjects[0].name.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_json_file() {
        let mut temp_file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        temp_file
            .write_all(br#"{"years": {"2030": {"Fall": [{"name": "Compilers", "credits": 4}]}}}"#)
            .unwrap();

        let config = GradeConfiguration::from_file(temp_file.path()).unwrap();
        assert_eq!(config.subjects("2030", "Fall")[0].credits, 4.0);
    }

    #[test]
    fn test_load_or_demo_on_broken_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[scale\nthis is not toml").unwrap();

        let config = GradeConfiguration::load_or_demo(Some(temp_file.path()));
        assert_eq!(config, GradeConfiguration::demo());
    }

    #[test]
    fn test_load_or_demo_on_invalid_values() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[scale]\n\"A\" = 9.5\n")
            .unwrap();

        let config = GradeConfiguration::load_or_demo(Some(temp_file.path()));
        assert_eq!(config, GradeConfiguration::demo());
    }
}
