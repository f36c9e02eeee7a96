use octofhir_terminology::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const CASE_SENSITIVE_CS: &str = "http://example.org/cs/sensitive";
pub const CASE_INSENSITIVE_CS: &str = "http://example.org/cs/insensitive";
pub const UNDECLARED_CS: &str = "http://example.org/cs/undeclared";
pub const BCP47: &str = "urn:ietf:bcp:47";

/// Wraps an [`InMemoryResolver`] and counts how often it is asked for things.
#[derive(Default)]
pub struct CountingResolver {
    pub inner: InMemoryResolver,
    pub resource_fetches: AtomicUsize,
    pub include_expansions: AtomicUsize,
}

#[allow(dead_code)]
impl CountingResolver {
    pub fn new(inner: InMemoryResolver) -> Self {
        Self {
            inner,
            ..Default::default()
        }
    }

    pub fn resource_fetches(&self) -> usize {
        self.resource_fetches.load(Ordering::SeqCst)
    }

    pub fn include_expansions(&self) -> usize {
        self.include_expansions.load(Ordering::SeqCst)
    }
}

impl ResourceResolver for CountingResolver {
    fn fetch_resource(
        &self,
        ctx: &FhirContext,
        kind: ResourceKind,
        uri: &str,
    ) -> Option<Resource> {
        self.resource_fetches.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch_resource(ctx, kind, uri)
    }

    fn fetch_code_system(&self, ctx: &FhirContext, uri: &str) -> Option<CodeSystem> {
        self.inner.fetch_code_system(ctx, uri)
    }

    fn is_code_system_supported(&self, ctx: &FhirContext, uri: &str) -> bool {
        self.inner.is_code_system_supported(ctx, uri)
    }

    fn validate_code(
        &self,
        ctx: &FhirContext,
        system: Option<&str>,
        code: &str,
        display: Option<&str>,
    ) -> Option<CodeValidationOutcome> {
        self.inner.validate_code(ctx, system, code, display)
    }

    fn expand_value_set(&self, ctx: &FhirContext, include: &ConceptSet) -> Result<ValueSetExpansion> {
        self.include_expansions.fetch_add(1, Ordering::SeqCst);
        self.inner.expand_value_set(ctx, include)
    }

    fn fetch_all_structure_definitions(&self, ctx: &FhirContext) -> Vec<StructureDefinition> {
        self.inner.fetch_all_structure_definitions(ctx)
    }
}

#[allow(dead_code)]
pub fn code_systems() -> InMemoryResolver {
    InMemoryResolver::new()
        .with_resource(
            CodeSystem::new(CASE_SENSITIVE_CS)
                .with_case_sensitive(true)
                .with_concept(ConceptDefinition::new("Abc").with_display("Alpha"))
                .with_concept(ConceptDefinition::new("def").with_display("Delta")),
        )
        .unwrap()
        .with_resource(
            CodeSystem::new(CASE_INSENSITIVE_CS)
                .with_case_sensitive(false)
                .with_concept(ConceptDefinition::new("Abc").with_display("Alpha"))
                .with_concept(ConceptDefinition::new("def").with_display("Delta")),
        )
        .unwrap()
        .with_resource(
            CodeSystem::new(UNDECLARED_CS)
                .with_concept(ConceptDefinition::new("Abc").with_display("Alpha")),
        )
        .unwrap()
}

#[allow(dead_code)]
pub fn create_context() -> TerminologyContext {
    TerminologyContext::new(Arc::new(code_systems()))
}

#[allow(dead_code)]
pub fn create_counting_context() -> (TerminologyContext, Arc<CountingResolver>) {
    let resolver = Arc::new(CountingResolver::new(code_systems()));
    let context = TerminologyContext::new(resolver.clone());
    (context, resolver)
}

/// A value set listing `codes` explicitly for `system`.
#[allow(dead_code)]
pub fn create_value_set(system: &str, codes: &[&str]) -> ValueSet {
    let include = codes
        .iter()
        .fold(ConceptSet::for_system(system), |inc, code| {
            inc.with_concept(*code, None)
        });
    ValueSet::new("http://example.org/vs/test").with_include(include)
}

#[allow(dead_code)]
pub fn create_languages_value_set() -> ValueSet {
    ValueSet::new(LANGUAGES_VALUE_SET)
        .with_id(LANGUAGES_VALUE_SET)
        .with_include(
            ConceptSet::for_system(BCP47)
                .with_concept("en", Some("English"))
                .with_concept("en-US", Some("English (United States)"))
                .with_concept("fr", Some("French"))
                .with_concept("de", Some("German")),
        )
}
