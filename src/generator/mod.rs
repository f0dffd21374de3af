//! The end-to-end generation pass.
//!
//! For one component root and one domain, [`Generator::run`] walks the
//! graph, keeps the sites qualified for the domain, expands their names,
//! groups and reconciles them, resolves a conversion for every
//! representation and hands each resulting [`ProviderSpec`] to a
//! [`ProviderSink`].
//!
//! Structural errors abort the pass and are returned. Everything else is
//! reported as a diagnostic: a name that fails to expand drops its site, and
//! a representation without a conversion, or whose provider method name is
//! already taken, is skipped while its siblings are still generated.
//!
//! # Example
//!
//! ```rust
//! use provgen::diagnostics::Diagnostics;
//! use provgen::domain::{Domain, MapSource};
//! use provgen::generator::{CollectingSink, Generator};
//! use provgen::model::{Annotation, GraphModel, MethodDecl, ParameterDecl, TypeDecl, TypeRef};
//!
//! let mut model = GraphModel::with_builtins();
//! model.insert(TypeDecl::component("app.App").with_module("app.Mod"));
//! model.insert(TypeDecl::module("app.Mod").with_method(
//!     MethodDecl::new("server", TypeRef::declared("app.Server"))
//!         .provides()
//!         .with_parameter(
//!             ParameterDecl::new("port", TypeRef::parse("int").unwrap())
//!                 .with_annotation(Annotation::qualifier("EnvironmentVariable", "PORT", None)),
//!         ),
//! ));
//!
//! let generator = Generator::new(&model).with_environment(MapSource::default());
//! let env = Domain::new("env", "EnvironmentVariable", "Env");
//! let mut sink = CollectingSink::default();
//! let mut diagnostics = Diagnostics::new();
//! generator.run("app.App", &env, &mut sink, &mut diagnostics).unwrap();
//!
//! let names: Vec<&str> = sink.specs().iter().map(|s| s.method_name.as_str()).collect();
//! assert_eq!(names, vec!["provideEnvPortAsInt", "provideEnvPort"]);
//! ```

use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info};

use crate::config::GeneratorConfig;
use crate::constants::LOOKUP_VALUE_EXPR;
use crate::convert::{Conversion, ConversionRenderer, ConversionResolver, JavaRenderer};
use crate::core::ProvgenError;
use crate::diagnostics::DiagnosticSink;
use crate::domain::{Domain, EnvironmentSource, MapSource, ValueSource};
use crate::grouping::{ConfigSite, ParameterMetadata, ParameterTable};
use crate::model::{GraphModel, TypeRef};
use crate::naming::provider_method_name;
use crate::sites::{InjectionSite, collect_sites};
use crate::template::expand_name;

/// Everything the code emitter needs to render one provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderSpec {
    /// Domain name, e.g. `env`
    pub domain: String,
    /// Qualifier name after expansion
    pub name: String,
    pub default_value: Option<String>,
    /// The type this provider returns
    pub provided_type: TypeRef,
    /// The type the domain lookup yields
    pub source_type: TypeRef,
    /// The parameter is effectively required
    pub required: bool,
    /// The provider may return null
    pub nullable: bool,
    pub conversion: Conversion,
    /// Rendered conversion of the raw lookup value
    pub expression: String,
    pub method_name: String,
    /// Elements of the sites served by this provider; empty when synthesized
    pub sites: Vec<String>,
}

/// Receiver of provider specifications, in generation order.
pub trait ProviderSink {
    fn accept(&mut self, spec: ProviderSpec);
}

/// Keeps every specification in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    specs: Vec<ProviderSpec>,
}

impl CollectingSink {
    pub fn specs(&self) -> &[ProviderSpec] {
        &self.specs
    }

    pub fn into_specs(self) -> Vec<ProviderSpec> {
        self.specs
    }
}

impl ProviderSink for CollectingSink {
    fn accept(&mut self, spec: ProviderSpec) {
        self.specs.push(spec);
    }
}

/// Counts from one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PassSummary {
    /// Sites qualified for the domain, before name expansion
    pub sites: usize,
    pub parameters: usize,
    pub providers: usize,
    /// Representations without a conversion
    pub skipped: usize,
}

/// Runs generation passes over one model.
pub struct Generator<'g> {
    model: &'g GraphModel,
    env: Box<dyn ValueSource>,
    sys: Box<dyn ValueSource>,
    expand_names: bool,
    resolver: ConversionResolver<'g>,
    renderer: Box<dyn ConversionRenderer>,
}

impl<'g> Generator<'g> {
    /// A generator reading the process environment, with no system
    /// properties, the default conversion chain and Java rendering.
    pub fn new(model: &'g GraphModel) -> Self {
        Self {
            model,
            env: Box::new(EnvironmentSource),
            sys: Box::new(MapSource::default()),
            expand_names: true,
            resolver: ConversionResolver::new(model),
            renderer: Box::new(JavaRenderer),
        }
    }

    /// A generator set up from a configuration file.
    pub fn from_config(model: &'g GraphModel, config: &GeneratorConfig) -> Self {
        Self::new(model)
            .with_system_properties(MapSource::new(config.system_properties.clone()))
            .expand_names(config.expand_names)
    }

    #[must_use]
    pub fn with_environment(mut self, env: impl ValueSource + 'static) -> Self {
        self.env = Box::new(env);
        self
    }

    #[must_use]
    pub fn with_system_properties(mut self, sys: impl ValueSource + 'static) -> Self {
        self.sys = Box::new(sys);
        self
    }

    #[must_use]
    pub fn expand_names(mut self, expand: bool) -> Self {
        self.expand_names = expand;
        self
    }

    #[must_use]
    pub fn with_resolver(mut self, resolver: ConversionResolver<'g>) -> Self {
        self.resolver = resolver;
        self
    }

    #[must_use]
    pub fn with_renderer(mut self, renderer: Box<dyn ConversionRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn model(&self) -> &'g GraphModel {
        self.model
    }

    /// Walk `root` and collect its injection sites.
    pub fn collect_sites(&self, root: &str) -> Result<Vec<InjectionSite>, ProvgenError> {
        collect_sites(self.model, root)
    }

    /// Run one full pass for `root` and `domain`.
    pub fn run(
        &self,
        root: &str,
        domain: &Domain,
        sink: &mut dyn ProviderSink,
        diagnostics: &mut dyn DiagnosticSink,
    ) -> Result<PassSummary, ProvgenError> {
        let sites = self.collect_sites(root)?;
        let summary = self.generate(&sites, domain, sink, diagnostics)?;
        info!(
            "{root} [{}]: {} provider(s) for {} parameter(s), {} skipped",
            domain.name, summary.providers, summary.parameters, summary.skipped
        );
        Ok(summary)
    }

    /// Generate providers for `domain` from already collected sites.
    ///
    /// Lets several domains share one walk of the same root.
    pub fn generate(
        &self,
        sites: &[InjectionSite],
        domain: &Domain,
        sink: &mut dyn ProviderSink,
        diagnostics: &mut dyn DiagnosticSink,
    ) -> Result<PassSummary, ProvgenError> {
        let qualified: Vec<&InjectionSite> = sites
            .iter()
            .filter(|site| site.qualifier.as_ref().is_some_and(|q| domain.matches(q)))
            .collect();
        let mut summary = PassSummary {
            sites: qualified.len(),
            ..PassSummary::default()
        };

        let mut config_sites = Vec::with_capacity(qualified.len());
        for site in qualified {
            if let Some(config_site) = self.resolve_site(site, diagnostics)? {
                config_sites.push(config_site);
            }
        }

        let table = ParameterTable::build(config_sites, domain, diagnostics);
        summary.parameters = table.parameters().count();

        // Method name to the representation that claimed it.
        let mut claimed: HashMap<String, String> = HashMap::new();

        for (key, metadata) in table.representations() {
            let parameter = table.parameter(&key.parameter_key()).copied().unwrap_or(
                ParameterMetadata {
                    required: false,
                    nullable: true,
                },
            );
            let sites = table.sites_for_representation(key);
            let source_type = domain.source_type_for(&key.type_ref);

            let Some(conversion) = self.resolver.resolve(&key.type_ref, &source_type) else {
                let error = ProvgenError::ConversionUnavailable {
                    name: key.name.clone(),
                    source_type: source_type.to_string(),
                    target_type: key.type_ref.to_string(),
                };
                diagnostics.error(&error.to_string(), sites.first().map(ConfigSite::element));
                summary.skipped += 1;
                continue;
            };

            let method_name = provider_method_name(
                &domain.prefix,
                &key.name,
                &key.type_ref,
                key.default_value.as_deref(),
            );
            if let Some(previous) = claimed.get(&method_name) {
                let error = ProvgenError::ProviderNameCollision {
                    method_name,
                    representation: key.to_string(),
                    previous: previous.clone(),
                };
                diagnostics.error(&error.to_string(), sites.first().map(ConfigSite::element));
                summary.skipped += 1;
                continue;
            }
            claimed.insert(method_name.clone(), key.to_string());

            let nullable =
                metadata.nullable && !parameter.required && key.default_value.is_none();
            let spec = ProviderSpec {
                domain: domain.name.clone(),
                name: key.name.clone(),
                default_value: key.default_value.clone(),
                provided_type: key.type_ref.clone(),
                source_type,
                required: parameter.required,
                nullable,
                expression: self.renderer.render(&conversion, LOOKUP_VALUE_EXPR),
                conversion,
                method_name,
                sites: sites.iter().map(|s| s.element().to_string()).collect(),
            };
            debug!("Provider {} for {key}", spec.method_name);
            sink.accept(spec);
            summary.providers += 1;
        }

        Ok(summary)
    }

    /// Validate a domain site and expand its name.
    ///
    /// Returns `Ok(None)` when expansion failed and was reported.
    fn resolve_site<'s>(
        &self,
        site: &'s InjectionSite,
        diagnostics: &mut dyn DiagnosticSink,
    ) -> Result<Option<ConfigSite<'s>>, ProvgenError> {
        let Some(name) = site.qualifier_name() else {
            let annotation =
                site.qualifier.as_ref().map(|q| q.annotation_type.clone()).unwrap_or_default();
            return Err(ProvgenError::MalformedQualifier {
                annotation,
                element: site.element.clone(),
            });
        };

        if !self.expand_names {
            return Ok(Some(ConfigSite::new(site, name)));
        }

        match expand_name(name, self.env.as_ref(), self.sys.as_ref()) {
            Ok(expanded) => {
                if expanded != name {
                    debug!("Expanded '{name}' to '{expanded}' for {}", site.element);
                }
                Ok(Some(ConfigSite::new(site, expanded)))
            }
            Err(e) => {
                diagnostics.error(&e.to_string(), Some(&site.element));
                Ok(None)
            }
        }
    }
}
