//! Resource resolution backends for the terminology context.
//!
//! The context never stores conformance resources itself. Everything it needs
//! (code systems, value sets, structure definitions, include expansions,
//! bare code validation) is asked of a [`ResourceResolver`].

pub mod in_memory;

pub use in_memory::InMemoryResolver;

use crate::core::FhirContext;
use crate::error::{Result, TerminologyError};
use crate::types::{
    CodeSystem, CodeValidationOutcome, ConceptSet, Resource, ResourceKind, StructureDefinition,
    ValueSetExpansion,
};

/// Source of conformance resources and terminology answers.
///
/// Only [`fetch_resource`](Self::fetch_resource) is mandatory. The remaining
/// methods have conservative defaults: no opinion on codes, no structure
/// definitions, and include expansion reported as unsupported.
pub trait ResourceResolver: Send + Sync {
    /// Look up a resource of the given kind by canonical URL.
    fn fetch_resource(&self, ctx: &FhirContext, kind: ResourceKind, uri: &str)
    -> Option<Resource>;

    fn fetch_code_system(&self, ctx: &FhirContext, uri: &str) -> Option<CodeSystem> {
        match self.fetch_resource(ctx, ResourceKind::CodeSystem, uri) {
            Some(Resource::CodeSystem(cs)) => Some(cs),
            _ => None,
        }
    }

    fn is_code_system_supported(&self, ctx: &FhirContext, uri: &str) -> bool {
        self.fetch_code_system(ctx, uri).is_some()
    }

    /// Validate a code outside of any value set.
    ///
    /// `None` means the resolver has no opinion, which is different from a
    /// negative outcome.
    fn validate_code(
        &self,
        ctx: &FhirContext,
        system: Option<&str>,
        code: &str,
        display: Option<&str>,
    ) -> Option<CodeValidationOutcome> {
        let _ = (ctx, system, code, display);
        None
    }

    /// Expand a single include block of a value set compose.
    fn expand_value_set(&self, ctx: &FhirContext, include: &ConceptSet) -> Result<ValueSetExpansion> {
        let _ = (ctx, include);
        Err(TerminologyError::unsupported("expandValueSet"))
    }

    fn fetch_all_structure_definitions(&self, ctx: &FhirContext) -> Vec<StructureDefinition> {
        let _ = ctx;
        Vec::new()
    }
}
