//! Application classification.
//!
//! Maps an application identifier to Focus, Distraction, or Neutral via two
//! disjoint membership sets. The sets are loaded from configuration at
//! startup; the built-in lists below survive only as config defaults.
//! Classification itself is a pure, total function with no failure mode.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default distraction-app identifiers.
pub(crate) const DEFAULT_DISTRACTION_APPS: &[&str] = &[
    "com.instagram.android",
    "com.facebook.katana",
    "com.google.android.youtube",
    "com.zhiliaoapp.musically",
    "com.twitter.android",
];

/// Default focus-app identifiers.
pub(crate) const DEFAULT_FOCUS_APPS: &[&str] = &[
    "com.whatsapp",
    "org.mozilla.firefox",
    "com.microsoft.office.word",
    "com.google.android.keep",
    "com.android.chrome",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Focus,
    Distraction,
    Neutral,
}

/// The two membership sets driving classification.
///
/// Construction rejects identifiers that appear in both sets, so
/// [`classify`](Self::classify) is never ambiguous.
#[derive(Debug, Clone)]
pub struct ClassificationSets {
    distraction: HashSet<String>,
    focus: HashSet<String>,
}

impl ClassificationSets {
    /// Build sets from the given identifier lists.
    ///
    /// # Errors
    /// Returns an error if any identifier appears in both lists.
    pub fn new(
        distraction: impl IntoIterator<Item = String>,
        focus: impl IntoIterator<Item = String>,
    ) -> Result<Self, ConfigError> {
        let distraction: HashSet<String> = distraction.into_iter().collect();
        let focus: HashSet<String> = focus.into_iter().collect();
        if let Some(dup) = distraction.intersection(&focus).next() {
            return Err(ConfigError::InvalidValue {
                key: "classification".to_string(),
                message: format!("'{dup}' appears in both distraction_apps and focus_apps"),
            });
        }
        Ok(Self { distraction, focus })
    }

    /// Classify an application identifier. Identifiers in neither set are Neutral.
    pub fn classify(&self, app_id: &str) -> Classification {
        if self.distraction.contains(app_id) {
            Classification::Distraction
        } else if self.focus.contains(app_id) {
            Classification::Focus
        } else {
            Classification::Neutral
        }
    }

    pub fn distraction_apps(&self) -> impl Iterator<Item = &str> {
        self.distraction.iter().map(String::as_str)
    }

    pub fn focus_apps(&self) -> impl Iterator<Item = &str> {
        self.focus.iter().map(String::as_str)
    }
}

impl Default for ClassificationSets {
    fn default() -> Self {
        Self {
            distraction: DEFAULT_DISTRACTION_APPS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            focus: DEFAULT_FOCUS_APPS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn default_sets_classify_known_apps() {
        let sets = ClassificationSets::default();
        for app in DEFAULT_DISTRACTION_APPS {
            assert_eq!(sets.classify(app), Classification::Distraction);
        }
        for app in DEFAULT_FOCUS_APPS {
            assert_eq!(sets.classify(app), Classification::Focus);
        }
        assert_eq!(sets.classify("com.example.unknown"), Classification::Neutral);
    }

    #[test]
    fn overlapping_sets_are_rejected() {
        let result = ClassificationSets::new(
            vec!["com.app.one".to_string(), "com.app.both".to_string()],
            vec!["com.app.both".to_string()],
        );
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn empty_sets_are_all_neutral() {
        let sets = ClassificationSets::new(vec![], vec![]).unwrap();
        assert_eq!(sets.classify("com.whatsapp"), Classification::Neutral);
    }

    proptest! {
        #[test]
        fn unknown_identifiers_are_neutral(id in "[a-z]{1,12}\\.[a-z]{1,12}\\.[a-z]{1,12}") {
            let sets = ClassificationSets::default();
            prop_assume!(
                !DEFAULT_DISTRACTION_APPS.contains(&id.as_str())
                    && !DEFAULT_FOCUS_APPS.contains(&id.as_str())
            );
            prop_assert_eq!(sets.classify(&id), Classification::Neutral);
        }
    }
}
