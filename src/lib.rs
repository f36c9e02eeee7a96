//! # OctoFHIR Terminology
//!
//! Terminology support for FHIR resource validation: validates codes against
//! value sets, expands value set compositions and resolves conformance
//! resources through a pluggable resolver.
//!
//! ## Features
//!
//! - **Code validation**: codes, codings and codeable concepts against a value
//!   set, honouring the code system's case sensitivity
//! - **Expansion**: explicit-concept and whole-code-system includes, with
//!   filtered includes delegated to the resolver
//! - **Fetch cache**: resources fetched once per context
//! - **Resolvers**: an in-memory resolver loading FHIR JSON files and bundles
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use octofhir_terminology::*;
//! use std::sync::Arc;
//!
//! # fn example() -> Result<()> {
//! let mut resolver = InMemoryResolver::new();
//! resolver.load_directory("./terminology")?;
//!
//! let context = TerminologyContext::new(Arc::new(resolver));
//! let value_set = context
//!     .fetch_value_set("http://hl7.org/fhir/ValueSet/administrative-gender")
//!     .expect("value set is loaded");
//!
//! let result = context.validate_code_in_value_set(
//!     Some("http://hl7.org/fhir/administrative-gender"),
//!     "male",
//!     None,
//!     &value_set,
//! )?;
//! assert!(result.is_ok());
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod error;
pub mod expander;
pub mod provider;
pub mod types;
pub mod worker;

pub use crate::core::{
    FhirContext, FhirVersion, LANGUAGES_VALUE_SET, TerminologyConfig, TerminologyContext,
    TerminologyContextBuilder,
};
pub use error::{Result, TerminologyError};
pub use expander::{
    SimpleValueSetExpander, ValueSetExpander, ValueSetExpanderFactory, ValueSetExpansionOutcome,
};
pub use provider::{InMemoryResolver, ResourceResolver};
pub use types::*;
pub use worker::{ParserType, UnsupportedWorkerOperations, WorkerContext};
