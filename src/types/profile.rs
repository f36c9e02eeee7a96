use serde::{Deserialize, Serialize};

use super::ExpansionParameter;

/// Parameters that control value set expansion (the STU3 `ExpansionProfile`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpansionProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_nested: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_designations: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_only: Option<bool>,
}

impl ExpansionProfile {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    /// Expansion parameters describing this profile, in the order the
    /// fields are declared. Unset flags are omitted.
    pub fn to_parameters(&self) -> Vec<ExpansionParameter> {
        let mut params = Vec::new();
        if let Some(url) = &self.url {
            params.push(parameter("profile", url.clone()));
        }
        let flags = [
            ("excludeNested", self.exclude_nested),
            ("includeDesignations", self.include_designations),
            ("activeOnly", self.active_only),
        ];
        for (name, value) in flags {
            if let Some(value) = value {
                params.push(parameter(name, value.to_string()));
            }
        }
        params
    }
}

fn parameter(name: &str, value: String) -> ExpansionParameter {
    ExpansionParameter {
        name: name.to_string(),
        value_string: Some(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameters_skip_unset_flags() {
        let mut profile = ExpansionProfile::new("http://example.org/profile");
        profile.active_only = Some(true);

        let params = profile.to_parameters();
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].name, "profile");
        assert_eq!(params[1].name, "activeOnly");
        assert_eq!(params[1].value_string.as_deref(), Some("true"));
    }

    #[test]
    fn test_empty_profile_has_no_parameters() {
        assert!(ExpansionProfile::default().to_parameters().is_empty());
    }
}
