//! Severity classification.
//!
//! [`classify`] is a pure, total function from a raw change (plus optional
//! changed-line text) and an injected [`SeverityRules`] to one of four tiers.

pub mod classifier;
pub mod rules;
pub mod severity;

pub use classifier::{classify, relative_token_delta};
pub use rules::{PrefixRule, SeverityRules, SeverityRulesBuilder, DEFAULT_COSMETIC_THRESHOLD};
pub use severity::Severity;
