//! The terminology worker context.
//!
//! [`TerminologyContext`] answers "is this code valid in this value set?" for
//! a resource validator. It owns a fetch cache scoped to its own lifetime and
//! is meant to live for a single validation session: the cache sits in a
//! `RefCell`, so the context is `!Sync` and cannot be shared across threads.

use std::borrow::Cow;
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

use super::builder::TerminologyContextBuilder;
use super::config::{FhirContext, TerminologyConfig};
use crate::error::{Result, TerminologyError};
use crate::expander::{
    SimpleValueSetExpander, ValueSetExpander, ValueSetExpanderFactory, ValueSetExpansionOutcome,
};
use crate::provider::ResourceResolver;
use crate::types::{
    CodeSystem, CodeableConcept, Coding, ConceptDefinition, ConceptSet, ExpansionContains,
    ExpansionProfile, Resource, ResourceKind, StructureDefinition, ValidationResult, ValueSet,
    ValueSetExpansion,
};
use crate::worker::{UnsupportedWorkerOperations, WorkerContext};

pub struct TerminologyContext {
    fhir_context: FhirContext,
    resolver: Arc<dyn ResourceResolver>,
    config: TerminologyConfig,
    fetched_resources: RefCell<HashMap<String, Arc<Resource>>>,
    expansion_profile: Option<ExpansionProfile>,
}

impl TerminologyContext {
    /// A context with the default configuration. Use
    /// [`builder`](Self::builder) for anything else.
    pub fn new(resolver: Arc<dyn ResourceResolver>) -> Self {
        Self::with_config(resolver, TerminologyConfig::default())
    }

    /// Callers must pass a config that already passed
    /// [`TerminologyConfig::validate`].
    pub(crate) fn with_config(resolver: Arc<dyn ResourceResolver>, config: TerminologyConfig) -> Self {
        Self {
            fhir_context: FhirContext::new(config.fhir_version),
            resolver,
            config,
            fetched_resources: RefCell::new(HashMap::new()),
            expansion_profile: None,
        }
    }

    pub fn builder(resolver: Arc<dyn ResourceResolver>) -> TerminologyContextBuilder {
        TerminologyContextBuilder::new(resolver)
    }

    pub fn config(&self) -> &TerminologyConfig {
        &self.config
    }

    pub fn fhir_context(&self) -> &FhirContext {
        &self.fhir_context
    }

    /// Number of resources held by the fetch cache.
    pub fn cached_resource_count(&self) -> usize {
        self.fetched_resources.borrow().len()
    }

    /// Fetch a value set by canonical URL through the cache.
    pub fn fetch_value_set(&self, uri: &str) -> Option<ValueSet> {
        self.fetch_resource(ResourceKind::ValueSet, uri)
            .and_then(|r| r.as_value_set().cloned())
    }

    /// Codes are case-sensitive unless the code system says otherwise.
    fn is_case_sensitive(&self, system: Option<&str>) -> bool {
        system
            .and_then(|s| self.fetch_code_system(s))
            .and_then(|cs| cs.case_sensitive)
            .unwrap_or(true)
    }

    fn is_special_value_set(&self, value_set: &ValueSet) -> bool {
        value_set
            .url
            .as_deref()
            .or(value_set.id.as_deref())
            .is_some_and(|identity| self.config.is_special_value_set(identity))
    }

    /// Expansion built straight from the declared include concepts, one entry
    /// per concept in declaration order.
    fn declared_expansion(value_set: &ValueSet) -> ValueSetExpansionOutcome {
        let mut expansion = ValueSetExpansion::default();
        for include in value_set.includes() {
            for concept in &include.concept {
                expansion.push(ExpansionContains::new(
                    include.system.as_deref(),
                    &concept.code,
                    concept.display.as_deref(),
                ));
            }
        }
        expansion.total = Some(expansion.contains.len());

        let mut expanded = value_set.clone();
        expanded.expansion = Some(expansion);
        ValueSetExpansionOutcome::expanded(expanded)
    }
}

fn normalize(code: &str, case_sensitive: bool) -> Cow<'_, str> {
    if case_sensitive {
        Cow::Borrowed(code)
    } else {
        Cow::Owned(code.to_uppercase())
    }
}

impl ValueSetExpanderFactory for TerminologyContext {
    fn expander(&self) -> Box<dyn ValueSetExpander + '_> {
        Box::new(SimpleValueSetExpander::new(self).with_max_size(self.config.max_expansion_size))
    }
}

impl WorkerContext for TerminologyContext {
    fn fetch_resource(&self, kind: ResourceKind, uri: &str) -> Option<Arc<Resource>> {
        let cached = self.fetched_resources.borrow().get(uri).cloned();
        if let Some(resource) = cached {
            if resource.kind() != kind {
                tracing::debug!(
                    uri = %uri,
                    requested = %kind,
                    cached = %resource.kind(),
                    "Cached resource has a different kind"
                );
                return None;
            }
            tracing::debug!(uri = %uri, "Fetch cache hit");
            return Some(resource);
        }

        tracing::debug!(uri = %uri, kind = %kind, "Fetch cache miss");
        let resource = Arc::new(self.resolver.fetch_resource(&self.fhir_context, kind, uri)?);
        self.fetched_resources
            .borrow_mut()
            .insert(uri.to_string(), Arc::clone(&resource));
        Some(resource)
    }

    fn fetch_code_system(&self, uri: &str) -> Option<CodeSystem> {
        self.resolver.fetch_code_system(&self.fhir_context, uri)
    }

    fn supports_system(&self, system: &str) -> bool {
        self.resolver
            .is_code_system_supported(&self.fhir_context, system)
    }

    fn all_structures(&self) -> Vec<StructureDefinition> {
        self.resolver
            .fetch_all_structure_definitions(&self.fhir_context)
    }

    fn expansion_profile(&self) -> Option<&ExpansionProfile> {
        self.expansion_profile.as_ref()
    }

    fn set_expansion_profile(&mut self, profile: Option<ExpansionProfile>) {
        self.expansion_profile = profile;
    }

    fn expand(
        &self,
        value_set: &ValueSet,
        profile: Option<&ExpansionProfile>,
    ) -> Result<ValueSetExpansionOutcome> {
        let outcome = match self.expander().expand(value_set, profile) {
            Ok(outcome) => outcome,
            Err(e @ TerminologyError::InvalidRequest { .. }) => return Err(e),
            Err(e) => return Err(TerminologyError::internal_from(e)),
        };

        if let Some(error) = outcome.error() {
            return Err(TerminologyError::invalid_request(error));
        }
        Ok(outcome)
    }

    fn expand_include(&self, include: &ConceptSet) -> Result<ValueSetExpansion> {
        self.resolver.expand_value_set(&self.fhir_context, include)
    }

    fn validate_codeable_concept(
        &self,
        concept: &CodeableConcept,
        value_set: &ValueSet,
    ) -> Result<ValidationResult> {
        for coding in &concept.coding {
            let result = self.validate_coding(coding, value_set)?;
            if result.is_ok() {
                return Ok(result);
            }
        }
        Ok(ValidationResult::no_signal())
    }

    fn validate_coding(&self, coding: &Coding, value_set: &ValueSet) -> Result<ValidationResult> {
        let Some(code) = coding.code.as_deref() else {
            return Ok(ValidationResult::error(format!(
                "Coding in system[{}] has no code",
                coding.system.as_deref().unwrap_or_default()
            )));
        };
        self.validate_code_in_value_set(
            coding.system.as_deref(),
            code,
            coding.display.as_deref(),
            value_set,
        )
    }

    fn validate_code_in_value_set(
        &self,
        system: Option<&str>,
        code: &str,
        _display: Option<&str>,
        value_set: &ValueSet,
    ) -> Result<ValidationResult> {
        let case_sensitive = self.is_case_sensitive(system);
        let wanted = normalize(code, case_sensitive);

        let expanded = if self.is_special_value_set(value_set) {
            tracing::debug!(
                value_set = %value_set.describe(),
                "Using declared concepts instead of expanding"
            );
            Self::declared_expansion(value_set)
        } else {
            self.expand(value_set, None)?
        };

        for entry in expanded.contains() {
            let Some(entry_code) = entry.code.as_deref() else {
                continue;
            };
            if normalize(entry_code, case_sensitive) != wanted {
                continue;
            }
            // System comparison stays exact even for case-insensitive code systems.
            if system.is_none_or(|s| entry.system.as_deref() == Some(s)) {
                return Ok(ValidationResult::ok(ConceptDefinition {
                    code: entry_code.to_string(),
                    display: entry.display.clone(),
                    ..Default::default()
                }));
            }
        }

        tracing::debug!(
            code = %code,
            system = ?system,
            value_set = %value_set.describe(),
            "Code not found in expansion"
        );
        Ok(ValidationResult::error(format!(
            "Unknown code[{}] in system[{}]",
            code,
            system.unwrap_or_default()
        )))
    }

    fn validate_code(
        &self,
        system: Option<&str>,
        code: &str,
        display: Option<&str>,
    ) -> Option<ValidationResult> {
        self.resolver
            .validate_code(&self.fhir_context, system, code, display)
            .map(ValidationResult::from)
    }
}

impl UnsupportedWorkerOperations for TerminologyContext {}

impl std::fmt::Debug for TerminologyContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminologyContext")
            .field("fhir_context", &self.fhir_context)
            .field("config", &self.config)
            .field("cached_resources", &self.cached_resource_count())
            .field("expansion_profile", &self.expansion_profile)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LANGUAGES_VALUE_SET;
    use crate::provider::InMemoryResolver;
    use crate::types::IssueSeverity;

    const CS: &str = "http://example.org/cs";

    fn context_with(code_system: CodeSystem) -> TerminologyContext {
        let resolver = InMemoryResolver::new().with_resource(code_system).unwrap();
        TerminologyContext::new(Arc::new(resolver))
    }

    fn value_set(codes: &[&str]) -> ValueSet {
        let include = codes
            .iter()
            .fold(ConceptSet::for_system(CS), |inc, c| inc.with_concept(*c, None));
        ValueSet::new("http://example.org/vs").with_include(include)
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("abc", true), "abc");
        assert_eq!(normalize("abc", false), "ABC");
    }

    #[test]
    fn test_case_sensitivity_lookup() {
        let ctx = context_with(CodeSystem::new(CS).with_case_sensitive(false));
        assert!(!ctx.is_case_sensitive(Some(CS)));
        assert!(ctx.is_case_sensitive(Some("http://unknown.org")));
        assert!(ctx.is_case_sensitive(None));

        let ctx = context_with(CodeSystem::new(CS));
        assert!(ctx.is_case_sensitive(Some(CS)));
    }

    #[test]
    fn test_match_returns_entry_code_and_display() {
        let ctx = context_with(CodeSystem::new(CS).with_case_sensitive(false));
        let vs = ValueSet::new("http://example.org/vs")
            .with_include(ConceptSet::for_system(CS).with_concept("Abc", Some("Alpha")));

        let result = ctx
            .validate_code_in_value_set(Some(CS), "aBC", None, &vs)
            .unwrap();
        let definition = result.definition.unwrap();
        assert_eq!(definition.code, "Abc");
        assert_eq!(definition.display.as_deref(), Some("Alpha"));
    }

    #[test]
    fn test_unknown_code_message() {
        let ctx = context_with(CodeSystem::new(CS));
        let result = ctx
            .validate_code_in_value_set(Some(CS), "zzz", None, &value_set(&["a"]))
            .unwrap();

        assert_eq!(result.severity, Some(IssueSeverity::Error));
        assert_eq!(
            result.message.as_deref(),
            Some("Unknown code[zzz] in system[http://example.org/cs]")
        );
    }

    #[test]
    fn test_declared_expansion_keeps_every_concept_in_order() {
        let ctx = context_with(CodeSystem::new(CS));
        let vs = ValueSet::new(LANGUAGES_VALUE_SET)
            .with_include(
                ConceptSet::for_system("urn:ietf:bcp:47")
                    .with_concept("en", Some("First"))
                    .with_concept("fr", None),
            )
            .with_include(
                ConceptSet::for_system("urn:other")
                    .with_concept("en", Some("Second"))
                    .with_concept("de", None),
            );

        let outcome = TerminologyContext::declared_expansion(&vs);
        let entries: Vec<_> = outcome
            .contains()
            .iter()
            .map(|c| (c.system.as_deref(), c.code.as_deref()))
            .collect();
        assert_eq!(
            entries,
            vec![
                (Some("urn:ietf:bcp:47"), Some("en")),
                (Some("urn:ietf:bcp:47"), Some("fr")),
                (Some("urn:other"), Some("en")),
                (Some("urn:other"), Some("de")),
            ]
        );
        let expansion = outcome.value_set().unwrap().expansion.as_ref().unwrap();
        assert_eq!(expansion.total, Some(4));

        let result = ctx.validate_code_in_value_set(None, "en", None, &vs).unwrap();
        assert_eq!(result.display(), Some("First"));
    }

    #[test]
    fn test_special_value_set_matched_by_id() {
        let ctx = context_with(CodeSystem::new(CS));
        let mut vs = ValueSet::default()
            .with_id(LANGUAGES_VALUE_SET)
            .with_include(ConceptSet::for_system("urn:ietf:bcp:47").with_concept("en", None));
        vs.compose.as_mut().unwrap().exclude.push(ConceptSet::default());

        // The exclude would make the general expander fail; the shortcut ignores it.
        assert!(ctx.is_special_value_set(&vs));
        let result = ctx.validate_code_in_value_set(None, "en", None, &vs).unwrap();
        assert!(result.is_ok());
    }

    #[test]
    fn test_coding_without_code() {
        let ctx = context_with(CodeSystem::new(CS));
        let coding = Coding {
            system: Some(CS.to_string()),
            ..Default::default()
        };
        let result = ctx.validate_coding(&coding, &value_set(&["a"])).unwrap();
        assert_eq!(result.severity, Some(IssueSeverity::Error));
    }

    #[test]
    fn test_expansion_profile_accessors() {
        let mut ctx = context_with(CodeSystem::new(CS));
        assert!(ctx.expansion_profile().is_none());

        ctx.set_expansion_profile(Some(ExpansionProfile::new("http://example.org/p")));
        assert_eq!(
            ctx.expansion_profile().and_then(|p| p.url.as_deref()),
            Some("http://example.org/p")
        );
    }

    #[test]
    fn test_unsupported_operations_fail_loudly() {
        let mut ctx = context_with(CodeSystem::new(CS));

        assert!(ctx.parser(crate::worker::ParserType::Json).unwrap_err().is_unsupported());
        assert!(ctx.new_xml_parser().unwrap_err().is_unsupported());
        assert!(ctx.narrative_generator("x", "y").unwrap_err().is_unsupported());
        assert!(ctx.oid_to_uri("1.2.3").unwrap_err().is_unsupported());
        assert!(ctx.abbreviation("Patient").unwrap_err().is_unsupported());
        assert!(ctx.find_maps_for_source(CS).unwrap_err().is_unsupported());
        assert!(ctx.has_cache().unwrap_err().is_unsupported());
        assert!(
            ctx.set_logger(Box::new(tracing::subscriber::NoSubscriber::default()))
                .unwrap_err()
                .is_unsupported()
        );
    }
}
