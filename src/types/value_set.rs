use serde::{Deserialize, Serialize};

/// FHIR ValueSet resource.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueSet {
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
    pub compose: Option<ValueSetCompose>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expansion: Option<ValueSetExpansion>,
}

impl ValueSet {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_include(mut self, include: ConceptSet) -> Self {
        self.compose.get_or_insert_with(Default::default).include.push(include);
        self
    }

    pub fn with_exclude(mut self, exclude: ConceptSet) -> Self {
        self.compose.get_or_insert_with(Default::default).exclude.push(exclude);
        self
    }

    pub fn with_expansion(mut self, expansion: ValueSetExpansion) -> Self {
        self.expansion = Some(expansion);
        self
    }

    /// Include blocks of the compose, empty when there is no compose.
    pub fn includes(&self) -> &[ConceptSet] {
        self.compose
            .as_ref()
            .map(|c| c.include.as_slice())
            .unwrap_or_default()
    }

    /// Entries of the pre-computed expansion, empty when there is none.
    pub fn contains(&self) -> &[ExpansionContains] {
        self.expansion
            .as_ref()
            .map(|e| e.contains.as_slice())
            .unwrap_or_default()
    }

    /// Human readable handle for log and error messages.
    pub fn describe(&self) -> &str {
        self.url
            .as_deref()
            .or(self.id.as_deref())
            .unwrap_or("<anonymous>")
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ValueSetCompose {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<ConceptSet>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<ConceptSet>,
}

/// An include or exclude block of a value set compose.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub concept: Vec<ConceptReference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filter: Vec<ConceptSetFilter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub value_set: Vec<String>,
}

impl ConceptSet {
    pub fn for_system(system: impl Into<String>) -> Self {
        Self {
            system: Some(system.into()),
            ..Default::default()
        }
    }

    pub fn with_concept(mut self, code: impl Into<String>, display: Option<&str>) -> Self {
        self.concept.push(ConceptReference {
            code: code.into(),
            display: display.map(str::to_string),
        });
        self
    }

    pub fn with_filter(mut self, filter: ConceptSetFilter) -> Self {
        self.filter.push(filter);
        self
    }

    pub fn with_value_set(mut self, url: impl Into<String>) -> Self {
        self.value_set.push(url.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConceptReference {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptSetFilter {
    pub property: String,
    pub op: String,
    pub value: String,
}

/// The expanded (flat) form of a value set.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ValueSetExpansion {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameter: Vec<ExpansionParameter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contains: Vec<ExpansionContains>,
}

impl ValueSetExpansion {
    pub fn push(&mut self, entry: ExpansionContains) {
        self.contains.push(entry);
    }
}

/// A name/value pair recorded on an expansion. Values are kept as strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpansionParameter {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_string: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExpansionContains {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl ExpansionContains {
    pub fn new(system: Option<&str>, code: impl Into<String>, display: Option<&str>) -> Self {
        Self {
            system: system.map(str::to_string),
            code: Some(code.into()),
            display: display.map(str::to_string),
        }
    }
}
