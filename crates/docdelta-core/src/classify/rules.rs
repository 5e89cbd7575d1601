//! Injectable severity rule configuration.
//!
//! Rules are loaded once per deployment and passed by reference to the
//! classifier; there is no global rule table.
//!
//! ```toml
//! cosmetic_threshold = 0.05
//! breaking_signals = ["deprecated", "no longer"]
//!
//! [[prefix_rules]]
//! prefix = "api-reference/endpoint/"
//! severity = "important"
//! ```
//!
//! Keys left out of a TOML document keep their stock values.

use crate::classify::severity::Severity;
use crate::errors::RulesError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default maximum relative token delta still treated as cosmetic (5%)
pub const DEFAULT_COSMETIC_THRESHOLD: f64 = 0.05;

const DEFAULT_PREFIX_RULES: &[(&str, Severity)] = &[
    ("api-reference/endpoint/", Severity::Important),
    ("api-reference/error-codes", Severity::Important),
    ("api-reference/rate-limiting", Severity::Important),
    ("overview/deprecations", Severity::Breaking),
    ("overview/beta-models", Severity::Informational),
    ("overview/pricing", Severity::Important),
    ("models/", Severity::Informational),
    ("guides/", Severity::Informational),
    ("overview/privacy", Severity::Informational),
];

const DEFAULT_BREAKING_SIGNALS: &[&str] = &[
    "removed",
    "deprecated",
    "no longer",
    "breaking",
    "required parameter",
    "schema change",
    "endpoint removed",
    "status code changed",
    "authentication changed",
];

/// Default severity for every path starting with `prefix`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixRule {
    pub prefix: String,
    pub severity: Severity,
}

/// Ordered prefix rules, breaking-signal phrases and the cosmetic threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeverityRules {
    prefix_rules: Vec<PrefixRule>,
    /// Stored lower-cased
    breaking_signals: Vec<String>,
    cosmetic_threshold: f64,
}

/// On-disk shape; absent keys fall back to the stock rule set.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RulesFile {
    prefix_rules: Option<Vec<PrefixRule>>,
    breaking_signals: Option<Vec<String>>,
    cosmetic_threshold: Option<f64>,
}

impl SeverityRules {
    /// Start from an empty rule set (no prefix rules, no signals, 5% threshold).
    pub fn builder() -> SeverityRulesBuilder {
        SeverityRulesBuilder::default()
    }

    /// Parse a TOML rule document.
    ///
    /// # Errors
    ///
    /// `RulesError::Parse` for invalid TOML or unknown keys, and the
    /// validation errors of [`SeverityRulesBuilder::build`].
    pub fn from_toml_str(text: &str) -> Result<Self, RulesError> {
        let file: RulesFile = toml::from_str(text)?;
        let stock = SeverityRules::default();

        let mut builder = SeverityRules::builder()
            .cosmetic_threshold(file.cosmetic_threshold.unwrap_or(stock.cosmetic_threshold));
        for rule in file.prefix_rules.unwrap_or(stock.prefix_rules) {
            builder = builder.prefix(rule.prefix, rule.severity);
        }
        for signal in file.breaking_signals.unwrap_or(stock.breaking_signals) {
            builder = builder.signal(signal);
        }
        builder.build()
    }

    /// Read and parse a TOML rule file.
    ///
    /// # Errors
    ///
    /// `RulesError::Read` if the file cannot be read, otherwise as
    /// [`SeverityRules::from_toml_str`].
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, RulesError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn prefix_rules(&self) -> &[PrefixRule] {
        &self.prefix_rules
    }

    pub fn breaking_signals(&self) -> &[String] {
        &self.breaking_signals
    }

    pub fn cosmetic_threshold(&self) -> f64 {
        self.cosmetic_threshold
    }

    /// First prefix rule (in configured order) matching `path`
    pub fn match_prefix(&self, path: &str) -> Option<&PrefixRule> {
        self.prefix_rules
            .iter()
            .find(|rule| path.starts_with(&rule.prefix))
    }

    /// First breaking-signal phrase contained in `text`, case-insensitively
    pub fn find_breaking_signal(&self, text: &str) -> Option<&str> {
        let lowered = text.to_lowercase();
        self.breaking_signals
            .iter()
            .find(|signal| lowered.contains(signal.as_str()))
            .map(|s| s.as_str())
    }
}

impl Default for SeverityRules {
    /// The stock rule set for an API documentation catalog.
    fn default() -> Self {
        Self {
            prefix_rules: DEFAULT_PREFIX_RULES
                .iter()
                .map(|(prefix, severity)| PrefixRule {
                    prefix: prefix.to_string(),
                    severity: *severity,
                })
                .collect(),
            breaking_signals: DEFAULT_BREAKING_SIGNALS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            cosmetic_threshold: DEFAULT_COSMETIC_THRESHOLD,
        }
    }
}

/// Builder for [`SeverityRules`].
#[derive(Debug, Clone)]
pub struct SeverityRulesBuilder {
    prefix_rules: Vec<PrefixRule>,
    breaking_signals: Vec<String>,
    cosmetic_threshold: f64,
}

impl Default for SeverityRulesBuilder {
    fn default() -> Self {
        Self {
            prefix_rules: Vec::new(),
            breaking_signals: Vec::new(),
            cosmetic_threshold: DEFAULT_COSMETIC_THRESHOLD,
        }
    }
}

impl SeverityRulesBuilder {
    /// Append a prefix rule; earlier rules win.
    pub fn prefix(mut self, prefix: impl Into<String>, severity: Severity) -> Self {
        self.prefix_rules.push(PrefixRule {
            prefix: prefix.into(),
            severity,
        });
        self
    }

    pub fn signal(mut self, phrase: impl Into<String>) -> Self {
        self.breaking_signals.push(phrase.into());
        self
    }

    pub fn cosmetic_threshold(mut self, threshold: f64) -> Self {
        self.cosmetic_threshold = threshold;
        self
    }

    /// Validate and freeze the rule set.
    ///
    /// Signals are lower-cased and de-duplicated (first occurrence kept);
    /// blank signals are dropped.
    ///
    /// # Errors
    ///
    /// `InvalidThreshold` for a negative or non-finite threshold,
    /// `EmptyPrefix` for a prefix rule with an empty prefix, `CosmeticPrefix`
    /// for a prefix rule whose severity is cosmetic.
    pub fn build(self) -> Result<SeverityRules, RulesError> {
        if !self.cosmetic_threshold.is_finite() || self.cosmetic_threshold < 0.0 {
            return Err(RulesError::InvalidThreshold(self.cosmetic_threshold));
        }
        if let Some(index) = self.prefix_rules.iter().position(|r| r.prefix.is_empty()) {
            return Err(RulesError::EmptyPrefix { index });
        }
        if let Some(index) = self
            .prefix_rules
            .iter()
            .position(|r| r.severity == Severity::Cosmetic)
        {
            return Err(RulesError::CosmeticPrefix {
                index,
                prefix: self.prefix_rules[index].prefix.clone(),
            });
        }

        let mut breaking_signals: Vec<String> = Vec::with_capacity(self.breaking_signals.len());
        for signal in self.breaking_signals {
            let lowered = signal.trim().to_lowercase();
            if !lowered.is_empty() && !breaking_signals.contains(&lowered) {
                breaking_signals.push(lowered);
            }
        }

        Ok(SeverityRules {
            prefix_rules: self.prefix_rules,
            breaking_signals,
            cosmetic_threshold: self.cosmetic_threshold,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules() {
        let rules = SeverityRules::default();
        assert_eq!(rules.cosmetic_threshold(), 0.05);
        assert_eq!(
            rules.match_prefix("overview/deprecations.md").map(|r| r.severity),
            Some(Severity::Breaking)
        );
        assert!(rules.match_prefix("changelog.md").is_none());
    }

    #[test]
    fn test_first_prefix_wins() {
        let rules = SeverityRules::builder()
            .prefix("api/", Severity::Important)
            .prefix("api/beta/", Severity::Informational)
            .build()
            .unwrap();
        assert_eq!(
            rules.match_prefix("api/beta/x.md").map(|r| r.severity),
            Some(Severity::Important)
        );
    }

    #[test]
    fn test_signal_matching_is_case_insensitive() {
        let rules = SeverityRules::builder().signal("No Longer").build().unwrap();
        assert_eq!(
            rules.find_breaking_signal("This field is NO LONGER returned"),
            Some("no longer")
        );
        assert!(rules.find_breaking_signal("still returned").is_none());
    }

    #[test]
    fn test_builder_rejects_bad_threshold() {
        let err = SeverityRules::builder()
            .cosmetic_threshold(f64::NAN)
            .build()
            .unwrap_err();
        assert!(matches!(err, RulesError::InvalidThreshold(_)));
        assert!(SeverityRules::builder().cosmetic_threshold(-0.1).build().is_err());
    }

    #[test]
    fn test_builder_rejects_empty_prefix() {
        let err = SeverityRules::builder()
            .prefix("ok/", Severity::Important)
            .prefix("", Severity::Breaking)
            .build()
            .unwrap_err();
        assert!(matches!(err, RulesError::EmptyPrefix { index: 1 }));
    }

    #[test]
    fn test_builder_rejects_cosmetic_prefix() {
        let err = SeverityRules::builder()
            .prefix("changelog/", Severity::Cosmetic)
            .build()
            .unwrap_err();
        assert!(matches!(err, RulesError::CosmeticPrefix { index: 0, .. }));
    }

    #[test]
    fn test_from_toml_rejects_cosmetic_prefix() {
        let err = SeverityRules::from_toml_str(
            "[[prefix_rules]]\nprefix = \"changelog/\"\nseverity = \"cosmetic\"\n",
        )
        .unwrap_err();
        assert!(matches!(err, RulesError::CosmeticPrefix { .. }));
        let ex: crate::errors::ExError = err.into();
        assert_eq!(ex.code(), "ERR_INVALID_RULES");
    }

    #[test]
    fn test_from_toml_overrides_and_defaults() {
        let rules = SeverityRules::from_toml_str(
            r#"
            cosmetic_threshold = 0.1

            [[prefix_rules]]
            prefix = "reference/"
            severity = "important"
            "#,
        )
        .unwrap();
        assert_eq!(rules.cosmetic_threshold(), 0.1);
        assert_eq!(rules.prefix_rules().len(), 1);
        // signals were not given: stock list applies
        assert!(rules.breaking_signals().iter().any(|s| s == "deprecated"));
    }

    #[test]
    fn test_from_toml_rejects_unknown_keys() {
        let err = SeverityRules::from_toml_str("threshold = 0.2").unwrap_err();
        assert!(matches!(err, RulesError::Parse(_)));
    }

    #[test]
    fn test_from_toml_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("rules.toml");
        std::fs::write(&path, "breaking_signals = [\"sunset\"]\n").unwrap();
        let rules = SeverityRules::from_toml_file(&path).unwrap();
        assert_eq!(rules.breaking_signals(), ["sunset".to_string()]);
    }
}
