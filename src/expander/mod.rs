//! Value set expansion.
//!
//! An expander turns a value set's compose into a flat list of
//! `(system, code, display)` entries. The terminology context acts as the
//! [`ValueSetExpanderFactory`] and wires a [`SimpleValueSetExpander`] back to
//! itself for nested lookups.

pub mod simple;

pub use simple::SimpleValueSetExpander;

use crate::error::Result;
use crate::types::{ExpansionContains, ExpansionProfile, ValueSet};

pub trait ValueSetExpander {
    /// Expand `value_set`.
    ///
    /// Two failure channels exist. A raised error means the expansion could
    /// not be attempted (`InvalidRequest` for malformed input, anything else
    /// for unexpected failures). An `Ok` outcome carrying an error means the
    /// attempt was made and did not produce an expansion.
    fn expand(
        &self,
        value_set: &ValueSet,
        profile: Option<&ExpansionProfile>,
    ) -> Result<ValueSetExpansionOutcome>;
}

pub trait ValueSetExpanderFactory {
    fn expander(&self) -> Box<dyn ValueSetExpander + '_>;
}

/// Either an expanded value set or the reason it could not be expanded.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueSetExpansionOutcome {
    value_set: Option<ValueSet>,
    error: Option<String>,
}

impl ValueSetExpansionOutcome {
    pub fn expanded(value_set: ValueSet) -> Self {
        Self {
            value_set: Some(value_set),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            value_set: None,
            error: Some(error.into()),
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.value_set.is_some()
    }

    pub fn value_set(&self) -> Option<&ValueSet> {
        self.value_set.as_ref()
    }

    pub fn into_value_set(self) -> Option<ValueSet> {
        self.value_set
    }

    /// Expansion entries. Empty for a failed outcome, so an error can never
    /// be mistaken for a match source.
    pub fn contains(&self) -> &[ExpansionContains] {
        if self.error.is_some() {
            return &[];
        }
        self.value_set
            .as_ref()
            .map(ValueSet::contains)
            .unwrap_or_default()
    }
}
