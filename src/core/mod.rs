pub mod builder;
pub mod config;
pub mod context;

pub use builder::TerminologyContextBuilder;
pub use config::{FhirContext, FhirVersion, LANGUAGES_VALUE_SET, TerminologyConfig};
pub use context::TerminologyContext;
