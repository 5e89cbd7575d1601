use serde::{Deserialize, Serialize};

/// Four-tier ranking of how consequential a change is.
///
/// Ordering follows consequence: `Cosmetic < Informational < Important < Breaking`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Formatting or wording tweaks with a negligible size delta
    Cosmetic,
    /// New pages and substantive but non-critical edits
    Informational,
    /// Changes to areas integrators depend on (endpoints, pricing, limits)
    Important,
    /// Removals and changes carrying breaking-signal phrases
    Breaking,
}

impl Severity {
    /// All tiers, most consequential first (changelog section order)
    pub const DESCENDING: [Severity; 4] = [
        Severity::Breaking,
        Severity::Important,
        Severity::Informational,
        Severity::Cosmetic,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Severity::Breaking => "Breaking",
            Severity::Important => "Important",
            Severity::Informational => "Informational",
            Severity::Cosmetic => "Cosmetic",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering() {
        assert!(Severity::Breaking > Severity::Important);
        assert!(Severity::Important > Severity::Informational);
        assert!(Severity::Informational > Severity::Cosmetic);
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Severity::Breaking).unwrap(), "\"breaking\"");
        let s: Severity = serde_json::from_str("\"cosmetic\"").unwrap();
        assert_eq!(s, Severity::Cosmetic);
    }
}
