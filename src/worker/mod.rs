//! The capability surface a resource validator consumes.
//!
//! [`WorkerContext`] covers what the terminology context actually implements:
//! code validation, expansion, resource lookup and the static type tables.
//! Operations that are deliberately not implemented live on
//! [`UnsupportedWorkerOperations`] and fail loudly instead of doing nothing.

pub mod names;
pub mod unsupported;

pub use names::{RESOURCE_TYPES, TYPE_TAILS, sorted_resource_names};
pub use unsupported::{ParserType, UnsupportedWorkerOperations};

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::Result;
use crate::expander::ValueSetExpansionOutcome;
use crate::types::{
    CodeSystem, CodeableConcept, Coding, ConceptSet, ExpansionProfile, Resource, ResourceKind,
    StructureDefinition, ValidationResult, ValueSet, ValueSetExpansion,
};

pub trait WorkerContext {
    /// Fetch a conformance resource, served from the context's cache when
    /// it was fetched before.
    fn fetch_resource(&self, kind: ResourceKind, uri: &str) -> Option<Arc<Resource>>;

    fn fetch_code_system(&self, uri: &str) -> Option<CodeSystem>;

    fn supports_system(&self, system: &str) -> bool;

    fn all_structures(&self) -> Vec<StructureDefinition>;

    /// Known resource type names, sorted alphabetically.
    fn resource_names(&self) -> Vec<&'static str> {
        sorted_resource_names()
    }

    /// Type name tails used to resolve choice elements such as `value[x]`.
    fn type_tails(&self) -> &'static HashSet<&'static str> {
        &TYPE_TAILS
    }

    fn expansion_profile(&self) -> Option<&ExpansionProfile>;

    fn set_expansion_profile(&mut self, profile: Option<ExpansionProfile>);

    /// Expand a value set.
    ///
    /// A malformed composition is an `InvalidRequest` error; unexpected
    /// failures are `Internal`. An `Ok` outcome never carries an error.
    fn expand(
        &self,
        value_set: &ValueSet,
        profile: Option<&ExpansionProfile>,
    ) -> Result<ValueSetExpansionOutcome>;

    /// Expand a single include block through the resolver.
    fn expand_include(&self, include: &ConceptSet) -> Result<ValueSetExpansion>;

    /// First successful coding wins. When none succeeds the result carries
    /// no signal at all rather than an error.
    fn validate_codeable_concept(
        &self,
        concept: &CodeableConcept,
        value_set: &ValueSet,
    ) -> Result<ValidationResult>;

    fn validate_coding(&self, coding: &Coding, value_set: &ValueSet) -> Result<ValidationResult>;

    fn validate_code_in_value_set(
        &self,
        system: Option<&str>,
        code: &str,
        display: Option<&str>,
        value_set: &ValueSet,
    ) -> Result<ValidationResult>;

    /// Validate a code without a value set. `None` when the resolver has
    /// no opinion.
    fn validate_code(
        &self,
        system: Option<&str>,
        code: &str,
        display: Option<&str>,
    ) -> Option<ValidationResult>;
}
