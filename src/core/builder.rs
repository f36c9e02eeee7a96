//! Builder for [`TerminologyContext`].
//!
//! ```ignore
//! use octofhir_terminology::{InMemoryResolver, TerminologyContextBuilder, FhirVersion};
//! use std::sync::Arc;
//!
//! let mut resolver = InMemoryResolver::new();
//! resolver.load_directory("./terminology")?;
//!
//! let context = TerminologyContextBuilder::new(Arc::new(resolver))
//!     .with_fhir_version(FhirVersion::Stu3)
//!     .build()?;
//! ```

use std::sync::Arc;

use super::config::{FhirVersion, TerminologyConfig};
use super::context::TerminologyContext;
use crate::error::{Result, TerminologyError};
use crate::provider::ResourceResolver;
use crate::types::ExpansionProfile;
use crate::worker::WorkerContext;

/// Fluent construction of a [`TerminologyContext`].
///
/// [`build`](Self::build) checks the wiring up front: a builder started from
/// [`Default`] has no resolver and refuses to build until one is supplied.
#[derive(Default)]
pub struct TerminologyContextBuilder {
    resolver: Option<Arc<dyn ResourceResolver>>,
    config: TerminologyConfig,
    expansion_profile: Option<ExpansionProfile>,
}

impl TerminologyContextBuilder {
    pub fn new(resolver: Arc<dyn ResourceResolver>) -> Self {
        Self {
            resolver: Some(resolver),
            ..Default::default()
        }
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn ResourceResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn with_config(mut self, config: TerminologyConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_fhir_version(mut self, version: FhirVersion) -> Self {
        self.config.fhir_version = version;
        self
    }

    /// Validate this value set against its declared concepts instead of
    /// expanding it.
    pub fn with_special_value_set(mut self, url: impl Into<String>) -> Self {
        self.config.special_value_sets.push(url.into());
        self
    }

    pub fn with_max_expansion_size(mut self, max: usize) -> Self {
        self.config.max_expansion_size = Some(max);
        self
    }

    pub fn with_expansion_profile(mut self, profile: ExpansionProfile) -> Self {
        self.expansion_profile = Some(profile);
        self
    }

    pub fn build(self) -> Result<TerminologyContext> {
        let Some(resolver) = self.resolver else {
            return Err(TerminologyError::configuration(
                "a resource resolver must be provided",
            ));
        };
        self.config.validate()?;

        let mut context = TerminologyContext::with_config(resolver, self.config);
        context.set_expansion_profile(self.expansion_profile);
        Ok(context)
    }
}
