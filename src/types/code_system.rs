use serde::{Deserialize, Serialize};

/// FHIR CodeSystem resource.
///
/// Only the parts the terminology context needs are modelled: identity, the
/// case-sensitivity flag and the concept hierarchy.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeSystem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_sensitive: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub concept: Vec<ConceptDefinition>,
}

impl CodeSystem {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = Some(case_sensitive);
        self
    }

    pub fn with_concept(mut self, concept: ConceptDefinition) -> Self {
        self.concept.push(concept);
        self
    }

    pub fn has_case_sensitive(&self) -> bool {
        self.case_sensitive.is_some()
    }

    /// Case sensitivity as declared, falling back to `true` when absent.
    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive.unwrap_or(true)
    }

    /// Every concept in the hierarchy, parents before their children.
    pub fn flatten_concepts(&self) -> Vec<&ConceptDefinition> {
        fn walk<'a>(concepts: &'a [ConceptDefinition], out: &mut Vec<&'a ConceptDefinition>) {
            for concept in concepts {
                out.push(concept);
                walk(&concept.concept, out);
            }
        }

        let mut out = Vec::new();
        walk(&self.concept, &mut out);
        out
    }

    /// Depth-first search through the concept hierarchy. Case-insensitive
    /// lookups compare the uppercased forms of both codes.
    pub fn find_concept(&self, code: &str, case_sensitive: bool) -> Option<&ConceptDefinition> {
        fn walk<'a>(
            concepts: &'a [ConceptDefinition],
            wanted: &str,
            case_sensitive: bool,
        ) -> Option<&'a ConceptDefinition> {
            for concept in concepts {
                let matches = if case_sensitive {
                    concept.code == wanted
                } else {
                    concept.code.to_uppercase() == wanted
                };
                if matches {
                    return Some(concept);
                }
                if let Some(found) = walk(&concept.concept, wanted, case_sensitive) {
                    return Some(found);
                }
            }
            None
        }

        if case_sensitive {
            walk(&self.concept, code, true)
        } else {
            walk(&self.concept, &code.to_uppercase(), false)
        }
    }
}

/// A concept defined by a code system, possibly with nested children.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConceptDefinition {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub concept: Vec<ConceptDefinition>,
}

impl ConceptDefinition {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..Default::default()
        }
    }

    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }

    pub fn with_child(mut self, child: ConceptDefinition) -> Self {
        self.concept.push(child);
        self
    }
}
