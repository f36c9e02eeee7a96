use std::convert::Infallible;

use crate::error::{Result, TerminologyError};
use crate::expander::ValueSetExpansionOutcome;
use crate::types::{ConceptSet, Resource, ResourceKind, ValidationResult, ValueSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserType {
    Json,
    Xml,
}

/// Worker-context operations the terminology context does not provide.
///
/// Every method returns [`TerminologyError::Unsupported`]. Callers that are
/// written against the full worker-context surface get an explicit failure
/// naming the operation instead of a silent default. Operations that would
/// hand back a parser, validator or narrative generator return
/// `Result<Infallible>`: they can never succeed here.
pub trait UnsupportedWorkerOperations {
    fn parser(&self, _parser_type: ParserType) -> Result<Infallible> {
        Err(TerminologyError::unsupported("getParser"))
    }

    fn parser_for_name(&self, _name: &str) -> Result<Infallible> {
        Err(TerminologyError::unsupported("getParser"))
    }

    fn new_json_parser(&self) -> Result<Infallible> {
        Err(TerminologyError::unsupported("newJsonParser"))
    }

    fn new_xml_parser(&self) -> Result<Infallible> {
        Err(TerminologyError::unsupported("newXmlParser"))
    }

    fn narrative_generator(&self, _prefix: &str, _base_path: &str) -> Result<Infallible> {
        Err(TerminologyError::unsupported("getNarrativeGenerator"))
    }

    fn new_validator(&self) -> Result<Infallible> {
        Err(TerminologyError::unsupported("newValidator"))
    }

    fn abbreviation(&self, _name: &str) -> Result<String> {
        Err(TerminologyError::unsupported("getAbbreviation"))
    }

    fn oid_to_uri(&self, _oid: &str) -> Result<String> {
        Err(TerminologyError::unsupported("oid2Uri"))
    }

    fn find_maps_for_source(&self, _url: &str) -> Result<Vec<Resource>> {
        Err(TerminologyError::unsupported("findMapsForSource"))
    }

    fn has_resource(&self, _kind: ResourceKind, _uri: &str) -> Result<bool> {
        Err(TerminologyError::unsupported("hasResource"))
    }

    fn all_conformance_resources(&self) -> Result<Vec<Resource>> {
        Err(TerminologyError::unsupported("allConformanceResources"))
    }

    fn has_cache(&self) -> Result<bool> {
        Err(TerminologyError::unsupported("hasCache"))
    }

    fn expand_with_options(
        &self,
        _value_set: &ValueSet,
        _cache_ok: bool,
        _hierarchical: bool,
    ) -> Result<ValueSetExpansionOutcome> {
        Err(TerminologyError::unsupported("expandVS"))
    }

    fn validate_code_in_include(
        &self,
        _system: Option<&str>,
        _code: &str,
        _display: Option<&str>,
        _include: &ConceptSet,
    ) -> Result<ValidationResult> {
        Err(TerminologyError::unsupported("validateCode(ConceptSetComponent)"))
    }

    /// Logging goes through `tracing`; install a subscriber instead.
    fn set_logger(&mut self, _subscriber: Box<dyn tracing::Subscriber + Send + Sync>) -> Result<()> {
        Err(TerminologyError::unsupported("setLogger"))
    }
}
