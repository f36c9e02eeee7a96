use serde::{Deserialize, Serialize};

use crate::error::{Result, TerminologyError};

/// Canonical URL of the BCP-47 language value set. Its code system is
/// impractical to expand, so it is validated against its declared concepts.
pub const LANGUAGES_VALUE_SET: &str = "http://hl7.org/fhir/ValueSet/languages";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum FhirVersion {
    #[default]
    #[serde(rename = "3.0.2")]
    Stu3,
    #[serde(rename = "4.0.1")]
    R4,
    #[serde(rename = "4.3.0")]
    R4B,
    #[serde(rename = "5.0.0")]
    R5,
}

impl std::fmt::Display for FhirVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FhirVersion::Stu3 => "3.0.2",
            FhirVersion::R4 => "4.0.1",
            FhirVersion::R4B => "4.3.0",
            FhirVersion::R5 => "5.0.0",
        };
        f.write_str(s)
    }
}

/// Handle passed to every resolver call, identifying which FHIR release the
/// lookups are made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FhirContext {
    version: FhirVersion,
}

impl FhirContext {
    pub fn new(version: FhirVersion) -> Self {
        Self { version }
    }

    pub fn version(&self) -> FhirVersion {
        self.version
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TerminologyConfig {
    pub fhir_version: FhirVersion,
    /// Value sets validated against their declared concepts instead of a
    /// full expansion. Matched on the canonical `url`, then on `id`.
    pub special_value_sets: Vec<String>,
    /// Upper bound on expansion entries. `None` means unbounded.
    pub max_expansion_size: Option<usize>,
}

impl Default for TerminologyConfig {
    fn default() -> Self {
        Self {
            fhir_version: FhirVersion::default(),
            special_value_sets: vec![LANGUAGES_VALUE_SET.to_string()],
            max_expansion_size: None,
        }
    }
}

impl TerminologyConfig {
    pub fn for_version(version: FhirVersion) -> Self {
        Self {
            fhir_version: version,
            ..Default::default()
        }
    }

    pub fn with_special_value_set(mut self, url: impl Into<String>) -> Self {
        self.special_value_sets.push(url.into());
        self
    }

    pub fn with_max_expansion_size(mut self, max: usize) -> Self {
        self.max_expansion_size = Some(max);
        self
    }

    pub fn is_special_value_set(&self, identity: &str) -> bool {
        self.special_value_sets.iter().any(|s| s == identity)
    }

    /// Reject settings that would make every lookup fail.
    pub fn validate(&self) -> Result<()> {
        if self.max_expansion_size == Some(0) {
            return Err(TerminologyError::configuration(
                "max_expansion_size must be greater than zero",
            ));
        }
        if self.special_value_sets.iter().any(String::is_empty) {
            return Err(TerminologyError::configuration(
                "special value set identities must not be empty",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TerminologyConfig::default();
        assert_eq!(config.fhir_version, FhirVersion::Stu3);
        assert!(config.is_special_value_set(LANGUAGES_VALUE_SET));
        assert!(config.max_expansion_size.is_none());
    }

    #[test]
    fn test_config_from_json() {
        let config: TerminologyConfig = serde_json::from_str(
            r#"{
                "fhir_version": "4.0.1",
                "special_value_sets": ["http://example.org/vs/huge"],
                "max_expansion_size": 500
            }"#,
        )
        .unwrap();

        assert_eq!(config.fhir_version, FhirVersion::R4);
        assert!(!config.is_special_value_set(LANGUAGES_VALUE_SET));
        assert_eq!(config.max_expansion_size, Some(500));
    }

    #[test]
    fn test_validate() {
        assert!(TerminologyConfig::default().validate().is_ok());

        let err = TerminologyConfig::default()
            .with_max_expansion_size(0)
            .validate()
            .unwrap_err();
        assert!(matches!(err, TerminologyError::Configuration { .. }));

        assert!(
            TerminologyConfig::default()
                .with_special_value_set("")
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_version_display() {
        assert_eq!(FhirVersion::Stu3.to_string(), "3.0.2");
        assert_eq!(FhirContext::new(FhirVersion::R5).version(), FhirVersion::R5);
    }
}
