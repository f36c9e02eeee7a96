//! Code validation result types.
//!
//! - [`ValidationResult`] - outcome of validating a code, tri-state
//! - [`CodeValidationOutcome`] - what a resolver answers for a bare code
//! - [`IssueSeverity`] - severity attached to negative results

use serde::{Deserialize, Serialize};

use super::ConceptDefinition;

/// Severity of a validation issue, as in `OperationOutcome.issue.severity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Fatal,
    Error,
    Warning,
    Information,
}

impl IssueSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueSeverity::Fatal => "fatal",
            IssueSeverity::Error => "error",
            IssueSeverity::Warning => "warning",
            IssueSeverity::Information => "information",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, IssueSeverity::Fatal | IssueSeverity::Error)
    }
}

impl std::fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of validating a code.
///
/// Three shapes are meaningful:
///
/// * **ok** - `definition` is set; the code matched.
/// * **error** - `severity` and `message` are set; the code is definitively
///   not valid and callers should not retry.
/// * **no signal** - nothing is set; none of the inputs produced an answer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<IssueSeverity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition: Option<ConceptDefinition>,
}

impl ValidationResult {
    pub fn ok(definition: ConceptDefinition) -> Self {
        Self {
            severity: None,
            message: None,
            definition: Some(definition),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::with_severity(IssueSeverity::Error, message)
    }

    pub fn with_severity(severity: IssueSeverity, message: impl Into<String>) -> Self {
        Self {
            severity: Some(severity),
            message: Some(message.into()),
            definition: None,
        }
    }

    pub fn no_signal() -> Self {
        Self::default()
    }

    pub fn is_ok(&self) -> bool {
        self.definition.is_some()
    }

    pub fn is_no_signal(&self) -> bool {
        self.severity.is_none() && self.message.is_none() && self.definition.is_none()
    }

    pub fn display(&self) -> Option<&str> {
        self.definition.as_ref().and_then(|d| d.display.as_deref())
    }
}

/// A resolver's verdict on a code validated without a value set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CodeValidationOutcome {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<IssueSeverity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl CodeValidationOutcome {
    pub fn valid(code: impl Into<String>, display: Option<&str>) -> Self {
        Self {
            severity: None,
            message: None,
            code: Some(code.into()),
            display: display.map(str::to_string),
        }
    }

    pub fn invalid(severity: IssueSeverity, message: impl Into<String>) -> Self {
        Self {
            severity: Some(severity),
            message: Some(message.into()),
            code: None,
            display: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.code.is_some() && self.severity.is_none_or(|s| !s.is_error())
    }

    /// The matched concept, present only for positive outcomes.
    pub fn as_concept_definition(&self) -> Option<ConceptDefinition> {
        if !self.is_ok() {
            return None;
        }
        self.code.as_ref().map(|code| ConceptDefinition {
            code: code.clone(),
            display: self.display.clone(),
            ..Default::default()
        })
    }
}

impl From<CodeValidationOutcome> for ValidationResult {
    fn from(outcome: CodeValidationOutcome) -> Self {
        let definition = outcome.as_concept_definition();
        ValidationResult {
            severity: outcome.severity,
            message: outcome.message,
            definition,
        }
    }
}
