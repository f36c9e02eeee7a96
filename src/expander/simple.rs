use chrono::Utc;
use uuid::Uuid;

use super::{ValueSetExpander, ValueSetExpansionOutcome};
use crate::error::{Result, TerminologyError};
use crate::types::{ConceptSet, ExpansionContains, ExpansionProfile, ValueSet, ValueSetExpansion};
use crate::worker::WorkerContext;

/// Expander for value sets composed of explicit concepts or whole code
/// systems.
///
/// Filter-based includes are handed to the worker context's include
/// expansion. Exclude blocks and value set imports are not supported and
/// produce a failed outcome.
pub struct SimpleValueSetExpander<'a> {
    context: &'a dyn WorkerContext,
    max_size: Option<usize>,
}

impl<'a> SimpleValueSetExpander<'a> {
    pub fn new(context: &'a dyn WorkerContext) -> Self {
        Self {
            context,
            max_size: None,
        }
    }

    /// Limit the number of entries. `None` removes the limit.
    pub fn with_max_size(mut self, max_size: Option<usize>) -> Self {
        self.max_size = max_size;
        self
    }

    fn include_entries(&self, include: &ConceptSet, system: &str) -> Result<IncludeEntries> {
        if !include.concept.is_empty() {
            let entries = include
                .concept
                .iter()
                .map(|c| ExpansionContains::new(Some(system), &c.code, c.display.as_deref()))
                .collect();
            return Ok(IncludeEntries::Entries(entries));
        }

        if !include.filter.is_empty() {
            tracing::debug!(system = %system, "Delegating filtered include to resolver");
            return self.delegate(include, system).map(IncludeEntries::Entries);
        }

        match self.context.fetch_code_system(system) {
            Some(cs) => {
                let entries = cs
                    .flatten_concepts()
                    .into_iter()
                    .map(|c| ExpansionContains::new(Some(system), &c.code, c.display.as_deref()))
                    .collect();
                Ok(IncludeEntries::Entries(entries))
            }
            None if self.context.supports_system(system) => {
                self.delegate(include, system).map(IncludeEntries::Entries)
            }
            None => Ok(IncludeEntries::Failed(format!(
                "Unable to find code system {system}"
            ))),
        }
    }

    fn delegate(&self, include: &ConceptSet, system: &str) -> Result<Vec<ExpansionContains>> {
        let expansion = self.context.expand_include(include)?;
        Ok(expansion
            .contains
            .into_iter()
            .map(|mut entry| {
                entry.system.get_or_insert_with(|| system.to_string());
                entry
            })
            .collect())
    }
}

enum IncludeEntries {
    Entries(Vec<ExpansionContains>),
    Failed(String),
}

impl ValueSetExpander for SimpleValueSetExpander<'_> {
    fn expand(
        &self,
        value_set: &ValueSet,
        profile: Option<&ExpansionProfile>,
    ) -> Result<ValueSetExpansionOutcome> {
        if value_set.expansion.is_some() {
            tracing::debug!(value_set = %value_set.describe(), "Using pre-computed expansion");
            return Ok(ValueSetExpansionOutcome::expanded(value_set.clone()));
        }

        let Some(compose) = &value_set.compose else {
            return Ok(ValueSetExpansionOutcome::failed(format!(
                "ValueSet {} has neither a compose nor an expansion",
                value_set.describe()
            )));
        };

        if !compose.exclude.is_empty() {
            tracing::warn!(value_set = %value_set.describe(), "compose.exclude is not supported");
            return Ok(ValueSetExpansionOutcome::failed(format!(
                "ValueSet {} uses compose.exclude, which is not supported",
                value_set.describe()
            )));
        }

        let mut expansion = ValueSetExpansion::default();
        for include in &compose.include {
            if !include.value_set.is_empty() {
                tracing::warn!(
                    value_set = %value_set.describe(),
                    imports = ?include.value_set,
                    "Value set imports are not supported"
                );
                return Ok(ValueSetExpansionOutcome::failed(format!(
                    "ValueSet {} imports other value sets, which is not supported",
                    value_set.describe()
                )));
            }

            let Some(system) = include.system.as_deref() else {
                return Err(TerminologyError::invalid_request(format!(
                    "ValueSet {} has an include without a system",
                    value_set.describe()
                )));
            };

            let entries = match self.include_entries(include, system)? {
                IncludeEntries::Entries(entries) => entries,
                IncludeEntries::Failed(error) => return Ok(ValueSetExpansionOutcome::failed(error)),
            };

            for entry in entries {
                if self.max_size.is_some_and(|max| expansion.contains.len() >= max) {
                    return Ok(ValueSetExpansionOutcome::failed(format!(
                        "ValueSet {} is too costly to expand (more than {} codes)",
                        value_set.describe(),
                        self.max_size.unwrap_or_default()
                    )));
                }
                expansion.push(entry);
            }
        }

        expansion.identifier = Some(format!("urn:uuid:{}", Uuid::new_v4()));
        expansion.timestamp = Some(Utc::now().to_rfc3339());
        expansion.total = Some(expansion.contains.len());
        if let Some(profile) = profile {
            expansion.parameter = profile.to_parameters();
        }

        tracing::debug!(
            value_set = %value_set.describe(),
            total = expansion.contains.len(),
            "Expanded value set"
        );

        let mut expanded = value_set.clone();
        expanded.expansion = Some(expansion);
        Ok(ValueSetExpansionOutcome::expanded(expanded))
    }
}
