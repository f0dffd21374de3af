//! Grouping and reconciliation of configuration sites.
//!
//! Sites of one domain are grouped twice: by [`ParameterKey`] (the logical
//! parameter, name only) and by [`RepresentationKey`] (one concrete type,
//! name and default). Requiredness is infectious across a parameter: one
//! site that demands a value makes the whole parameter required. Sites that
//! disagree with the aggregate get a warning; the aggregate always wins.
//!
//! Every non-string representation is derived from a string lookup, so the
//! table finally synthesizes any missing string sibling (same name, same
//! default) with no sites of its own.

mod keys;

pub use keys::{
    ConfigSite, ParameterKey, ParameterMetadata, RepresentationKey, RepresentationMetadata,
};

use std::collections::BTreeMap;
use tracing::debug;

use crate::diagnostics::DiagnosticSink;
use crate::domain::Domain;

/// Grouped sites and their reconciled metadata.
#[derive(Debug, Default)]
pub struct ParameterTable<'s> {
    sites_by_parameter: BTreeMap<ParameterKey, Vec<ConfigSite<'s>>>,
    parameters: BTreeMap<ParameterKey, ParameterMetadata>,
    sites_by_representation: BTreeMap<RepresentationKey, Vec<ConfigSite<'s>>>,
    representations: BTreeMap<RepresentationKey, RepresentationMetadata>,
}

impl<'s> ParameterTable<'s> {
    /// Group `sites`, reconcile conflicting policies and fill string gaps.
    pub fn build(
        sites: Vec<ConfigSite<'s>>,
        domain: &Domain,
        diagnostics: &mut dyn DiagnosticSink,
    ) -> Self {
        let mut table = Self::default();

        for site in sites {
            table
                .sites_by_representation
                .entry(site.representation_key())
                .or_default()
                .push(site.clone());
            table.sites_by_parameter.entry(site.parameter_key()).or_default().push(site);
        }

        table.aggregate_parameters(diagnostics);
        table.aggregate_representations(diagnostics);
        table.fill_string_gaps(domain);
        table
    }

    fn aggregate_parameters(&mut self, diagnostics: &mut dyn DiagnosticSink) {
        for (key, sites) in &self.sites_by_parameter {
            let required_site = sites.iter().find(|s| s.is_required());
            let non_nullable_site = sites.iter().find(|s| !s.is_nullable());
            let metadata = ParameterMetadata {
                required: required_site.is_some(),
                nullable: non_nullable_site.is_none(),
            };

            if let Some(required) = required_site {
                for site in sites.iter().filter(|s| !s.is_required()) {
                    let ignored = if site.default_value.is_some() {
                        "its default value"
                    } else {
                        "its nullability"
                    };
                    diagnostics.warning(
                        &format!(
                            "Parameter '{key}' is effectively required because {} demands a value; {ignored} is ignored",
                            required.element()
                        ),
                        Some(site.element()),
                    );
                }
            } else if let Some(non_nullable) = non_nullable_site {
                for site in sites.iter().filter(|s| s.is_nullable()) {
                    let outcome = if site.default_value.is_some() {
                        "its default value applies when the value is unset"
                    } else {
                        "its provider returns null when the value is unset"
                    };
                    diagnostics.warning(
                        &format!(
                            "Parameter '{key}' does not accept null at {}, but this site does; {outcome}",
                            non_nullable.element()
                        ),
                        Some(site.element()),
                    );
                }
            }

            debug!(
                "Parameter {key}: {} site(s), required={}, nullable={}",
                sites.len(),
                metadata.required,
                metadata.nullable
            );
            self.parameters.insert(key.clone(), metadata);
        }
    }

    fn aggregate_representations(&mut self, diagnostics: &mut dyn DiagnosticSink) {
        for (key, sites) in &self.sites_by_representation {
            let metadata = RepresentationMetadata {
                nullable: sites.iter().all(ConfigSite::is_nullable),
            };

            let required = self.parameters.get(&key.parameter_key()).is_some_and(|p| p.required);
            if metadata.nullable && required {
                diagnostics.warning(
                    &format!(
                        "Representation {key} is nullable but parameter '{}' is effectively required; it will never be null",
                        key.name
                    ),
                    sites.first().map(ConfigSite::element),
                );
            }

            self.representations.insert(key.clone(), metadata);
        }
    }

    fn fill_string_gaps(&mut self, domain: &Domain) {
        let missing: Vec<RepresentationKey> = self
            .representations
            .keys()
            .filter_map(|key| {
                let source = domain.source_type_for(&key.type_ref);
                if key.type_ref == source {
                    return None;
                }
                let sibling = key.with_type(source);
                (!self.representations.contains_key(&sibling)).then_some(sibling)
            })
            .collect();

        for key in missing {
            if self.representations.contains_key(&key) {
                continue;
            }
            let required = self.parameters.get(&key.parameter_key()).is_some_and(|p| p.required);
            let metadata = RepresentationMetadata {
                nullable: !required && key.default_value.is_none(),
            };
            debug!("Synthesized representation {key}");
            self.sites_by_representation.insert(key.clone(), Vec::new());
            self.representations.insert(key, metadata);
        }
    }

    pub fn parameter(&self, key: &ParameterKey) -> Option<&ParameterMetadata> {
        self.parameters.get(key)
    }

    /// Parameters and their metadata in name order.
    pub fn parameters(&self) -> impl Iterator<Item = (&ParameterKey, &ParameterMetadata)> {
        self.parameters.iter()
    }

    pub fn sites_for_parameter(&self, key: &ParameterKey) -> &[ConfigSite<'s>] {
        self.sites_by_parameter.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn representation(&self, key: &RepresentationKey) -> Option<&RepresentationMetadata> {
        self.representations.get(key)
    }

    /// Representations and their metadata in key order.
    pub fn representations(
        &self,
    ) -> impl Iterator<Item = (&RepresentationKey, &RepresentationMetadata)> {
        self.representations.iter()
    }

    /// Sites of one representation; empty for synthesized representations.
    pub fn sites_for_representation(&self, key: &RepresentationKey) -> &[ConfigSite<'s>] {
        self.sites_by_representation.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}
