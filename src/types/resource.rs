use serde::{Deserialize, Serialize};

use super::{CodeSystem, ExpansionProfile, ValueSet};

/// Identity of a StructureDefinition. Element trees are not modelled.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureDefinition {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(rename = "abstract", skip_serializing_if = "Option::is_none")]
    pub is_abstract: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_definition: Option<String>,
}

/// The resource kinds the terminology context knows how to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    CodeSystem,
    ValueSet,
    StructureDefinition,
    ExpansionProfile,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::CodeSystem => "CodeSystem",
            ResourceKind::ValueSet => "ValueSet",
            ResourceKind::StructureDefinition => "StructureDefinition",
            ResourceKind::ExpansionProfile => "ExpansionProfile",
        }
    }

    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "CodeSystem" => Some(ResourceKind::CodeSystem),
            "ValueSet" => Some(ResourceKind::ValueSet),
            "StructureDefinition" => Some(ResourceKind::StructureDefinition),
            "ExpansionProfile" => Some(ResourceKind::ExpansionProfile),
            _ => None,
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A conformance resource, discriminated by its JSON `resourceType`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "resourceType")]
pub enum Resource {
    CodeSystem(CodeSystem),
    ValueSet(ValueSet),
    StructureDefinition(StructureDefinition),
    ExpansionProfile(ExpansionProfile),
}

impl Resource {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Resource::CodeSystem(_) => ResourceKind::CodeSystem,
            Resource::ValueSet(_) => ResourceKind::ValueSet,
            Resource::StructureDefinition(_) => ResourceKind::StructureDefinition,
            Resource::ExpansionProfile(_) => ResourceKind::ExpansionProfile,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            Resource::CodeSystem(r) => r.url.as_deref(),
            Resource::ValueSet(r) => r.url.as_deref(),
            Resource::StructureDefinition(r) => r.url.as_deref(),
            Resource::ExpansionProfile(r) => r.url.as_deref(),
        }
    }

    pub fn as_code_system(&self) -> Option<&CodeSystem> {
        match self {
            Resource::CodeSystem(cs) => Some(cs),
            _ => None,
        }
    }

    pub fn as_value_set(&self) -> Option<&ValueSet> {
        match self {
            Resource::ValueSet(vs) => Some(vs),
            _ => None,
        }
    }

    pub fn as_structure_definition(&self) -> Option<&StructureDefinition> {
        match self {
            Resource::StructureDefinition(sd) => Some(sd),
            _ => None,
        }
    }
}

impl From<CodeSystem> for Resource {
    fn from(cs: CodeSystem) -> Self {
        Resource::CodeSystem(cs)
    }
}

impl From<ValueSet> for Resource {
    fn from(vs: ValueSet) -> Self {
        Resource::ValueSet(vs)
    }
}

impl From<StructureDefinition> for Resource {
    fn from(sd: StructureDefinition) -> Self {
        Resource::StructureDefinition(sd)
    }
}

impl From<ExpansionProfile> for Resource {
    fn from(profile: ExpansionProfile) -> Self {
        Resource::ExpansionProfile(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resource_type_discriminator() {
        let resource: Resource = serde_json::from_value(json!({
            "resourceType": "CodeSystem",
            "url": "http://example.org/cs",
            "caseSensitive": true
        }))
        .unwrap();

        assert_eq!(resource.kind(), ResourceKind::CodeSystem);
        assert_eq!(resource.url(), Some("http://example.org/cs"));
        assert!(resource.as_value_set().is_none());
    }

    #[test]
    fn test_structure_definition_renamed_fields() {
        let resource: Resource = serde_json::from_value(json!({
            "resourceType": "StructureDefinition",
            "url": "http://hl7.org/fhir/StructureDefinition/Patient",
            "type": "Patient",
            "kind": "resource",
            "abstract": false
        }))
        .unwrap();

        let sd = resource.as_structure_definition().unwrap();
        assert_eq!(sd.type_name.as_deref(), Some("Patient"));
        assert_eq!(sd.is_abstract, Some(false));
    }

    #[test]
    fn test_unknown_resource_type_is_rejected() {
        let result: Result<Resource, _> =
            serde_json::from_value(json!({"resourceType": "Patient", "id": "p1"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_kind_roundtrips_through_name() {
        for kind in [
            ResourceKind::CodeSystem,
            ResourceKind::ValueSet,
            ResourceKind::StructureDefinition,
            ResourceKind::ExpansionProfile,
        ] {
            assert_eq!(ResourceKind::parse_str(kind.as_str()), Some(kind));
        }
        assert_eq!(ResourceKind::parse_str("Patient"), None);
    }
}
