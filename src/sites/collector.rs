use tracing::debug;

use super::{InjectionSite, SiteKind};
use crate::core::ProvgenError;
use crate::model::{FieldDecl, GraphModel, MethodDecl, ParameterDecl, TypeDecl};
use crate::walker::{WalkVisitor, walk};

/// Turns walk events into injection sites, one per referencing site.
#[derive(Debug, Default)]
pub struct SiteCollector {
    sites: Vec<InjectionSite>,
}

impl SiteCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sites(&self) -> &[InjectionSite] {
        &self.sites
    }

    pub fn into_sites(self) -> Vec<InjectionSite> {
        self.sites
    }

    fn push_parameter(
        &mut self,
        kind: SiteKind,
        owner: &str,
        method: &MethodDecl,
        parameter: &ParameterDecl,
    ) -> Result<(), ProvgenError> {
        let element =
            format!("parameter '{}' of {}.{}", parameter.name, owner, method.signature());
        let site =
            InjectionSite::new(element, kind, &parameter.type_ref, &parameter.annotations)?;
        self.sites.push(site);
        Ok(())
    }
}

impl WalkVisitor for SiteCollector {
    fn visit_component_provision_method(
        &mut self,
        component: &TypeDecl,
        method: &MethodDecl,
    ) -> Result<(), ProvgenError> {
        let element = format!("provision method {}.{}()", component.name, method.name);
        let site = InjectionSite::new(
            element,
            SiteKind::ComponentProvisionResult,
            &method.returns,
            &method.annotations,
        )?;
        self.sites.push(site);
        Ok(())
    }

    fn visit_module_provides_method(
        &mut self,
        _module: &TypeDecl,
        declaring: &TypeDecl,
        method: &MethodDecl,
    ) -> Result<(), ProvgenError> {
        let kind = if method.is_static {
            SiteKind::ModuleStaticProvidesParameter
        } else {
            SiteKind::ModuleInstanceProvidesParameter
        };
        for parameter in &method.parameters {
            self.push_parameter(kind, &declaring.name, method, parameter)?;
        }
        Ok(())
    }

    fn visit_inject_constructor_parameter(
        &mut self,
        class: &TypeDecl,
        constructor: &MethodDecl,
        parameter: &ParameterDecl,
    ) -> Result<(), ProvgenError> {
        self.push_parameter(SiteKind::InjectConstructorParameter, &class.name, constructor, parameter)
    }

    fn visit_inject_method_parameter(
        &mut self,
        class: &TypeDecl,
        method: &MethodDecl,
        parameter: &ParameterDecl,
    ) -> Result<(), ProvgenError> {
        self.push_parameter(SiteKind::InjectMethodParameter, &class.name, method, parameter)
    }

    fn visit_inject_field(&mut self, class: &TypeDecl, field: &FieldDecl) -> Result<(), ProvgenError> {
        let element = format!("field {}.{}", class.name, field.name);
        let site =
            InjectionSite::new(element, SiteKind::InjectField, &field.type_ref, &field.annotations)?;
        self.sites.push(site);
        Ok(())
    }
}

/// Walk `root` and collect every injection site.
pub fn collect_sites(model: &GraphModel, root: &str) -> Result<Vec<InjectionSite>, ProvgenError> {
    let mut collector = SiteCollector::new();
    walk(model, root, &mut collector)?;
    debug!("Collected {} injection sites under {}", collector.sites.len(), root);
    Ok(collector.into_sites())
}
