pub mod code_system;
pub mod coding;
pub mod profile;
pub mod resource;
pub mod validation;
pub mod value_set;

pub use code_system::{CodeSystem, ConceptDefinition};
pub use coding::{CodeableConcept, Coding};
pub use profile::ExpansionProfile;
pub use resource::{Resource, ResourceKind, StructureDefinition};
pub use validation::{CodeValidationOutcome, IssueSeverity, ValidationResult};
pub use value_set::{
    ConceptReference, ConceptSet, ConceptSetFilter, ExpansionContains, ExpansionParameter,
    ValueSet, ValueSetCompose, ValueSetExpansion,
};
