use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;

use super::ResourceResolver;
use crate::core::FhirContext;
use crate::error::{Result, TerminologyError};
use crate::types::{
    CodeSystem, CodeValidationOutcome, ConceptSet, ExpansionContains, IssueSeverity, Resource,
    ResourceKind, StructureDefinition, ValueSetExpansion,
};

/// A resolver backed by a map of resources keyed by canonical URL.
///
/// Resources can be registered programmatically or loaded from FHIR JSON
/// files (single resources or `Bundle`s). Used by the CLI and in tests.
#[derive(Debug, Default, Clone)]
pub struct InMemoryResolver {
    resources: HashMap<String, Resource>,
}

impl InMemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource under its canonical URL, replacing any previous one.
    pub fn add_resource(&mut self, resource: impl Into<Resource>) -> Result<()> {
        let resource = resource.into();
        let Some(url) = resource.url().map(str::to_string) else {
            return Err(TerminologyError::load(format!(
                "{} without a canonical url cannot be registered",
                resource.kind()
            )));
        };
        if self.resources.insert(url.clone(), resource).is_some() {
            tracing::debug!(url = %url, "Replaced previously registered resource");
        }
        Ok(())
    }

    pub fn with_resource(mut self, resource: impl Into<Resource>) -> Result<Self> {
        self.add_resource(resource)?;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn get(&self, url: &str) -> Option<&Resource> {
        self.resources.get(url)
    }

    /// Register a parsed JSON resource or every entry of a `Bundle`.
    ///
    /// Resource types the context does not model are skipped. A `Bundle` is
    /// registered all-or-nothing: if any entry fails, nothing is registered.
    /// Returns how many resources were registered.
    pub fn load_json(&mut self, json: Value) -> Result<usize> {
        let mut parsed = Vec::new();
        Self::collect_resources(json, &mut parsed)?;

        let loaded = parsed.len();
        for resource in parsed {
            self.add_resource(resource)?;
        }
        Ok(loaded)
    }

    fn collect_resources(json: Value, out: &mut Vec<Resource>) -> Result<()> {
        let resource_type = json
            .get("resourceType")
            .and_then(Value::as_str)
            .map(str::to_string);
        match resource_type.as_deref() {
            Some("Bundle") => {
                let entries = match json {
                    Value::Object(mut map) => match map.remove("entry") {
                        Some(Value::Array(entries)) => entries,
                        _ => Vec::new(),
                    },
                    _ => Vec::new(),
                };
                for mut entry in entries {
                    if let Some(resource) = entry.get_mut("resource").map(Value::take) {
                        Self::collect_resources(resource, out)?;
                    }
                }
                Ok(())
            }
            Some(resource_type) if ResourceKind::parse_str(resource_type).is_some() => {
                let resource: Resource = serde_json::from_value(json)?;
                if resource.url().is_none() {
                    return Err(TerminologyError::load(format!(
                        "{} without a canonical url cannot be registered",
                        resource.kind()
                    )));
                }
                out.push(resource);
                Ok(())
            }
            Some(resource_type) => {
                tracing::debug!("Skipping unsupported resource type {}", resource_type);
                Ok(())
            }
            None => Err(TerminologyError::load("JSON document has no resourceType")),
        }
    }

    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let json: Value = serde_json::from_str(&content).map_err(|e| {
            TerminologyError::load_with_path(format!("Invalid JSON: {e}"), path)
        })?;
        self.load_json(json)
            .map_err(|e| TerminologyError::load_with_path(e.to_string(), path))
    }

    /// Load every `*.json` file directly inside `dir`.
    ///
    /// Files that fail to parse are logged and skipped; I/O errors on the
    /// directory itself are returned.
    pub fn load_directory(&mut self, dir: impl AsRef<Path>) -> Result<usize> {
        let dir = dir.as_ref();
        let mut paths: Vec<_> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        let mut loaded = 0;
        for path in &paths {
            match self.load_file(path) {
                Ok(count) => loaded += count,
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "Skipping file"),
            }
        }

        tracing::info!(
            "Loaded {} resources from {} files in {}",
            loaded,
            paths.len(),
            dir.display()
        );
        Ok(loaded)
    }

    /// Load a file or a directory, whichever `path` points at.
    pub fn load_path(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        if path.is_dir() {
            self.load_directory(path)
        } else {
            self.load_file(path)
        }
    }

    fn code_system(&self, url: &str) -> Option<&CodeSystem> {
        self.resources.get(url).and_then(Resource::as_code_system)
    }
}

impl ResourceResolver for InMemoryResolver {
    fn fetch_resource(
        &self,
        _ctx: &FhirContext,
        kind: ResourceKind,
        uri: &str,
    ) -> Option<Resource> {
        self.resources
            .get(uri)
            .filter(|r| r.kind() == kind)
            .cloned()
    }

    fn is_code_system_supported(&self, _ctx: &FhirContext, uri: &str) -> bool {
        self.code_system(uri).is_some()
    }

    fn validate_code(
        &self,
        _ctx: &FhirContext,
        system: Option<&str>,
        code: &str,
        display: Option<&str>,
    ) -> Option<CodeValidationOutcome> {
        let system = system?;
        let cs = self.code_system(system)?;

        let Some(concept) = cs.find_concept(code, cs.is_case_sensitive()) else {
            return Some(CodeValidationOutcome::invalid(
                IssueSeverity::Error,
                format!("Unknown code '{code}' in code system '{system}'"),
            ));
        };

        let mut outcome = CodeValidationOutcome::valid(&concept.code, concept.display.as_deref());
        if let (Some(given), Some(expected)) = (display, concept.display.as_deref()) {
            if !given.eq_ignore_ascii_case(expected) {
                outcome.severity = Some(IssueSeverity::Warning);
                outcome.message = Some(format!(
                    "Display '{given}' for code '{code}' does not match expected '{expected}'"
                ));
            }
        }
        Some(outcome)
    }

    fn expand_value_set(&self, _ctx: &FhirContext, include: &ConceptSet) -> Result<ValueSetExpansion> {
        let Some(system) = include.system.as_deref() else {
            return Err(TerminologyError::invalid_request(
                "Include block has no system to expand",
            ));
        };
        if !include.filter.is_empty() {
            return Err(TerminologyError::invalid_request(format!(
                "Filter-based includes for {system} are not supported by the in-memory resolver"
            )));
        }

        let mut expansion = ValueSetExpansion::default();
        if !include.concept.is_empty() {
            for concept in &include.concept {
                expansion.push(ExpansionContains::new(
                    Some(system),
                    &concept.code,
                    concept.display.as_deref(),
                ));
            }
        } else {
            let cs = self.code_system(system).ok_or_else(|| {
                TerminologyError::invalid_request(format!("Unable to find code system {system}"))
            })?;
            for concept in cs.flatten_concepts() {
                expansion.push(ExpansionContains::new(
                    Some(system),
                    &concept.code,
                    concept.display.as_deref(),
                ));
            }
        }
        expansion.total = Some(expansion.contains.len());
        Ok(expansion)
    }

    fn fetch_all_structure_definitions(&self, _ctx: &FhirContext) -> Vec<StructureDefinition> {
        let mut structures: Vec<StructureDefinition> = self
            .resources
            .values()
            .filter_map(Resource::as_structure_definition)
            .cloned()
            .collect();
        structures.sort_by(|a, b| a.url.cmp(&b.url));
        structures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ConceptDefinition, ValueSet};
    use serde_json::json;

    const GENDER: &str = "http://hl7.org/fhir/administrative-gender";

    fn gender_resolver() -> InMemoryResolver {
        InMemoryResolver::new()
            .with_resource(
                CodeSystem::new(GENDER)
                    .with_case_sensitive(false)
                    .with_concept(ConceptDefinition::new("male").with_display("Male"))
                    .with_concept(ConceptDefinition::new("female").with_display("Female")),
            )
            .unwrap()
    }

    #[test]
    fn test_fetch_respects_kind() {
        let resolver = gender_resolver();
        let ctx = FhirContext::default();

        assert!(resolver.fetch_resource(&ctx, ResourceKind::CodeSystem, GENDER).is_some());
        assert!(resolver.fetch_resource(&ctx, ResourceKind::ValueSet, GENDER).is_none());
        assert!(resolver.is_code_system_supported(&ctx, GENDER));
    }

    #[test]
    fn test_resource_without_url_is_rejected() {
        let mut resolver = InMemoryResolver::new();
        let err = resolver.add_resource(ValueSet::default()).unwrap_err();
        assert!(matches!(err, TerminologyError::Load { .. }));
        assert!(resolver.is_empty());
    }

    #[test]
    fn test_validate_code_honours_case_sensitivity() {
        let resolver = gender_resolver();
        let ctx = FhirContext::default();

        let outcome = resolver.validate_code(&ctx, Some(GENDER), "MALE", None).unwrap();
        assert!(outcome.is_ok());
        assert_eq!(outcome.code.as_deref(), Some("male"));

        let outcome = resolver.validate_code(&ctx, Some(GENDER), "other", None).unwrap();
        assert!(!outcome.is_ok());
        assert_eq!(outcome.severity, Some(IssueSeverity::Error));
    }

    #[test]
    fn test_validate_code_agrees_with_value_set_matching() {
        let resolver = InMemoryResolver::new()
            .with_resource(
                CodeSystem::new(GENDER)
                    .with_case_sensitive(false)
                    .with_concept(ConceptDefinition::new("élan")),
            )
            .unwrap();
        let ctx = FhirContext::default();

        let outcome = resolver.validate_code(&ctx, Some(GENDER), "ÉLAN", None).unwrap();
        assert!(outcome.is_ok());
        assert_eq!(outcome.code.as_deref(), Some("élan"));
    }

    #[test]
    fn test_validate_code_without_opinion() {
        let resolver = gender_resolver();
        let ctx = FhirContext::default();

        assert!(resolver.validate_code(&ctx, None, "male", None).is_none());
        assert!(
            resolver
                .validate_code(&ctx, Some("http://unknown.org"), "male", None)
                .is_none()
        );
    }

    #[test]
    fn test_display_mismatch_is_a_warning() {
        let resolver = gender_resolver();
        let ctx = FhirContext::default();

        let outcome = resolver
            .validate_code(&ctx, Some(GENDER), "male", Some("Man"))
            .unwrap();
        assert!(outcome.is_ok());
        assert_eq!(outcome.severity, Some(IssueSeverity::Warning));
    }

    #[test]
    fn test_expand_whole_system_include() {
        let resolver = gender_resolver();
        let ctx = FhirContext::default();

        let expansion = resolver
            .expand_value_set(&ctx, &ConceptSet::for_system(GENDER))
            .unwrap();
        assert_eq!(expansion.total, Some(2));
        assert_eq!(expansion.contains[1].code.as_deref(), Some("female"));
        assert_eq!(expansion.contains[1].system.as_deref(), Some(GENDER));
    }

    #[test]
    fn test_expand_rejects_filters() {
        let resolver = gender_resolver();
        let ctx = FhirContext::default();
        let include = ConceptSet::for_system(GENDER).with_filter(crate::types::ConceptSetFilter {
            property: "concept".to_string(),
            op: "is-a".to_string(),
            value: "male".to_string(),
        });

        let err = resolver.expand_value_set(&ctx, &include).unwrap_err();
        assert!(err.is_invalid_request());
    }

    #[test]
    fn test_load_bundle_skips_unknown_types() {
        let mut resolver = InMemoryResolver::new();
        let loaded = resolver
            .load_json(json!({
                "resourceType": "Bundle",
                "entry": [
                    {"resource": {"resourceType": "ValueSet", "url": "http://example.org/vs"}},
                    {"resource": {"resourceType": "Patient", "id": "p1"}},
                    {"resource": {"resourceType": "CodeSystem", "url": "http://example.org/cs"}}
                ]
            }))
            .unwrap();

        assert_eq!(loaded, 2);
        assert_eq!(resolver.len(), 2);
    }

    #[test]
    fn test_failed_bundle_registers_nothing() {
        let mut resolver = gender_resolver();
        let err = resolver
            .load_json(json!({
                "resourceType": "Bundle",
                "entry": [
                    {"resource": {"resourceType": "CodeSystem", "url": "http://example.org/cs"}},
                    {"resource": {"resourceType": "ValueSet", "id": "no-url"}}
                ]
            }))
            .unwrap_err();

        assert!(matches!(err, TerminologyError::Load { .. }));
        assert_eq!(resolver.len(), 1);
        assert!(resolver.get("http://example.org/cs").is_none());
    }

    #[test]
    fn test_load_json_requires_resource_type() {
        let mut resolver = InMemoryResolver::new();
        assert!(resolver.load_json(json!({"url": "http://example.org"})).is_err());
    }
}
