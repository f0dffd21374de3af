//! Traversal of the injection graph.
//!
//! A walk starts at one component root and streams [`WalkEvent`]s in a fixed
//! order:
//!
//! 1. the component itself: its modules and provision methods;
//! 2. every reachable module, breadth-first, each exactly once: its included
//!    modules and the provides methods found along its superclass lineage;
//! 3. every distinct type requested by a provision method, a provides method
//!    parameter or an injection site, each expanded exactly once into its
//!    injectable constructor parameters, method parameters and fields.
//!
//! The walk is a lazy iterator ([`Walk`]) owning its own traversal state, so
//! independent walks over one model never share visited sets. Callers that
//! prefer callbacks implement [`WalkVisitor`] and use [`walk`].
//!
//! Structural problems (a root that is not a component, a module reference
//! that is not a module or not declared) end the walk with an error after
//! which the iterator yields nothing more.

pub mod graph;

pub use graph::{GraphNode, InjectionGraph};

use std::collections::{HashSet, VecDeque};
use tracing::debug;

use crate::core::ProvgenError;
use crate::model::{
    FieldDecl, GraphModel, MethodDecl, ParameterDecl, TypeDecl, TypeKind, TypeRef,
};
use crate::sites::ProvisionStyle;

/// One step of a walk.
#[derive(Debug, Clone, Copy)]
pub enum WalkEvent<'g> {
    BeginComponent {
        component: &'g TypeDecl,
    },
    ComponentModule {
        component: &'g TypeDecl,
        module: &'g str,
    },
    ComponentProvisionMethod {
        component: &'g TypeDecl,
        method: &'g MethodDecl,
    },
    EndComponent {
        component: &'g TypeDecl,
    },
    BeginModule {
        module: &'g TypeDecl,
    },
    ModuleIncludedModule {
        module: &'g TypeDecl,
        included: &'g str,
    },
    /// A provides method of `module`, declared on `declaring` (the module or
    /// one of its superclasses).
    ModuleProvidesMethod {
        module: &'g TypeDecl,
        declaring: &'g TypeDecl,
        method: &'g MethodDecl,
    },
    EndModule {
        module: &'g TypeDecl,
    },
    BeginClass {
        class: &'g TypeDecl,
    },
    InjectConstructorParameter {
        class: &'g TypeDecl,
        constructor: &'g MethodDecl,
        parameter: &'g ParameterDecl,
    },
    InjectMethodParameter {
        class: &'g TypeDecl,
        method: &'g MethodDecl,
        parameter: &'g ParameterDecl,
    },
    InjectField {
        class: &'g TypeDecl,
        field: &'g FieldDecl,
    },
    EndClass {
        class: &'g TypeDecl,
    },
}

/// A queued module reference and the declaration that made it.
#[derive(Debug)]
struct ModuleRef<'g> {
    name: &'g str,
    referenced_by: &'g str,
}

/// Lazy walk over the graph reachable from one component root.
#[derive(Debug)]
pub struct Walk<'g> {
    model: &'g GraphModel,
    root: Option<&'g str>,
    pending: VecDeque<WalkEvent<'g>>,
    modules: VecDeque<ModuleRef<'g>>,
    visited_modules: HashSet<&'g str>,
    classes: VecDeque<&'g TypeDecl>,
    seen_classes: HashSet<&'g str>,
    failed: bool,
}

impl<'g> Walk<'g> {
    pub fn new(model: &'g GraphModel, root: &'g str) -> Self {
        Self {
            model,
            root: Some(root),
            pending: VecDeque::new(),
            modules: VecDeque::new(),
            visited_modules: HashSet::new(),
            classes: VecDeque::new(),
            seen_classes: HashSet::new(),
            failed: false,
        }
    }

    /// Queue the type behind `type_ref` for class expansion.
    ///
    /// Wrapper types are unwrapped first. Types the model does not declare
    /// are leaves and are not queued.
    fn enqueue_class(&mut self, type_ref: &'g TypeRef) {
        let (_, provided) = ProvisionStyle::classify(type_ref);
        let Some(decl) = provided.erasure_name().and_then(|name| self.model.get(name)) else {
            return;
        };
        if self.seen_classes.insert(decl.name.as_str()) {
            self.classes.push_back(decl);
        }
    }

    fn expand_root(&mut self, root: &'g str) -> Result<(), ProvgenError> {
        let component = self.model.get(root).ok_or_else(|| ProvgenError::UnknownType {
            type_name: root.to_string(),
            referenced_by: "walk root".to_string(),
            suggestion: self.model.closest_name(root),
        })?;
        if component.kind != TypeKind::Component {
            return Err(ProvgenError::NotAComponent {
                type_name: root.to_string(),
            });
        }
        debug!("Walking component {}", component.name);

        self.pending.push_back(WalkEvent::BeginComponent {
            component,
        });
        for module in &component.modules {
            self.pending.push_back(WalkEvent::ComponentModule {
                component,
                module,
            });
            self.modules.push_back(ModuleRef {
                name: module,
                referenced_by: &component.name,
            });
        }
        for method in component.provision_methods() {
            self.pending.push_back(WalkEvent::ComponentProvisionMethod {
                component,
                method,
            });
            self.enqueue_class(&method.returns);
        }
        self.pending.push_back(WalkEvent::EndComponent {
            component,
        });
        Ok(())
    }

    fn expand_module(&mut self, module_ref: ModuleRef<'g>) -> Result<(), ProvgenError> {
        let module = self.model.get(module_ref.name).ok_or_else(|| ProvgenError::UnknownType {
            type_name: module_ref.name.to_string(),
            referenced_by: module_ref.referenced_by.to_string(),
            suggestion: self.model.closest_name(module_ref.name),
        })?;
        if module.kind != TypeKind::Module {
            return Err(ProvgenError::NotAModule {
                type_name: module_ref.name.to_string(),
                referenced_by: module_ref.referenced_by.to_string(),
            });
        }
        debug!("Walking module {}", module.name);

        self.pending.push_back(WalkEvent::BeginModule {
            module,
        });
        for included in &module.modules {
            self.pending.push_back(WalkEvent::ModuleIncludedModule {
                module,
                included,
            });
            self.modules.push_back(ModuleRef {
                name: included,
                referenced_by: &module.name,
            });
        }

        // Overridden provides methods are reported once, from the nearest declaration.
        let mut overridden = HashSet::new();
        for declaring in self.model.lineage(&module.name) {
            for method in declaring.provides_methods() {
                if !overridden.insert(method.override_key()) {
                    continue;
                }
                self.pending.push_back(WalkEvent::ModuleProvidesMethod {
                    module,
                    declaring,
                    method,
                });
                for parameter in &method.parameters {
                    self.enqueue_class(&parameter.type_ref);
                }
            }
        }
        self.pending.push_back(WalkEvent::EndModule {
            module,
        });
        Ok(())
    }

    fn expand_class(&mut self, class: &'g TypeDecl) {
        debug!("Walking class {}", class.name);
        self.pending.push_back(WalkEvent::BeginClass {
            class,
        });

        for constructor in class.inject_constructors() {
            for parameter in &constructor.parameters {
                self.pending.push_back(WalkEvent::InjectConstructorParameter {
                    class,
                    constructor,
                    parameter,
                });
                self.enqueue_class(&parameter.type_ref);
            }
        }

        for declaring in self.model.lineage(&class.name) {
            for method in declaring.inject_methods() {
                for parameter in &method.parameters {
                    self.pending.push_back(WalkEvent::InjectMethodParameter {
                        class,
                        method,
                        parameter,
                    });
                    self.enqueue_class(&parameter.type_ref);
                }
            }
            for field in declaring.inject_fields() {
                self.pending.push_back(WalkEvent::InjectField {
                    class,
                    field,
                });
                self.enqueue_class(&field.type_ref);
            }
        }

        self.pending.push_back(WalkEvent::EndClass {
            class,
        });
    }

    /// Refill `pending` from the next unit of work. Returns `false` when the
    /// walk is exhausted.
    fn advance(&mut self) -> Result<bool, ProvgenError> {
        if let Some(root) = self.root.take() {
            self.expand_root(root)?;
            return Ok(true);
        }

        while let Some(module_ref) = self.modules.pop_front() {
            if self.visited_modules.insert(module_ref.name) {
                self.expand_module(module_ref)?;
                return Ok(true);
            }
        }

        if let Some(class) = self.classes.pop_front() {
            self.expand_class(class);
            return Ok(true);
        }

        Ok(false)
    }
}

impl<'g> Iterator for Walk<'g> {
    type Item = Result<WalkEvent<'g>, ProvgenError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(Ok(event));
            }
            match self.advance() {
                Ok(true) => continue,
                Ok(false) => return None,
                Err(e) => {
                    self.failed = true;
                    self.pending.clear();
                    return Some(Err(e));
                }
            }
        }
    }
}

/// Callback interface over walk events.
///
/// Every method defaults to doing nothing; implement the ones of interest.
/// Returning an error stops the walk.
#[allow(unused_variables)]
pub trait WalkVisitor {
    fn begin_component(&mut self, component: &TypeDecl) -> Result<(), ProvgenError> {
        Ok(())
    }

    fn visit_component_module(
        &mut self,
        component: &TypeDecl,
        module: &str,
    ) -> Result<(), ProvgenError> {
        Ok(())
    }

    fn visit_component_provision_method(
        &mut self,
        component: &TypeDecl,
        method: &MethodDecl,
    ) -> Result<(), ProvgenError> {
        Ok(())
    }

    fn end_component(&mut self, component: &TypeDecl) -> Result<(), ProvgenError> {
        Ok(())
    }

    fn begin_module(&mut self, module: &TypeDecl) -> Result<(), ProvgenError> {
        Ok(())
    }

    fn visit_module_included_module(
        &mut self,
        module: &TypeDecl,
        included: &str,
    ) -> Result<(), ProvgenError> {
        Ok(())
    }

    fn visit_module_provides_method(
        &mut self,
        module: &TypeDecl,
        declaring: &TypeDecl,
        method: &MethodDecl,
    ) -> Result<(), ProvgenError> {
        Ok(())
    }

    fn end_module(&mut self, module: &TypeDecl) -> Result<(), ProvgenError> {
        Ok(())
    }

    fn begin_class(&mut self, class: &TypeDecl) -> Result<(), ProvgenError> {
        Ok(())
    }

    fn visit_inject_constructor_parameter(
        &mut self,
        class: &TypeDecl,
        constructor: &MethodDecl,
        parameter: &ParameterDecl,
    ) -> Result<(), ProvgenError> {
        Ok(())
    }

    fn visit_inject_method_parameter(
        &mut self,
        class: &TypeDecl,
        method: &MethodDecl,
        parameter: &ParameterDecl,
    ) -> Result<(), ProvgenError> {
        Ok(())
    }

    fn visit_inject_field(&mut self, class: &TypeDecl, field: &FieldDecl) -> Result<(), ProvgenError> {
        Ok(())
    }

    fn end_class(&mut self, class: &TypeDecl) -> Result<(), ProvgenError> {
        Ok(())
    }
}

/// Dispatch one event to the matching visitor method.
pub fn dispatch<V: WalkVisitor + ?Sized>(
    visitor: &mut V,
    event: WalkEvent<'_>,
) -> Result<(), ProvgenError> {
    match event {
        WalkEvent::BeginComponent {
            component,
        } => visitor.begin_component(component),
        WalkEvent::ComponentModule {
            component,
            module,
        } => visitor.visit_component_module(component, module),
        WalkEvent::ComponentProvisionMethod {
            component,
            method,
        } => visitor.visit_component_provision_method(component, method),
        WalkEvent::EndComponent {
            component,
        } => visitor.end_component(component),
        WalkEvent::BeginModule {
            module,
        } => visitor.begin_module(module),
        WalkEvent::ModuleIncludedModule {
            module,
            included,
        } => visitor.visit_module_included_module(module, included),
        WalkEvent::ModuleProvidesMethod {
            module,
            declaring,
            method,
        } => visitor.visit_module_provides_method(module, declaring, method),
        WalkEvent::EndModule {
            module,
        } => visitor.end_module(module),
        WalkEvent::BeginClass {
            class,
        } => visitor.begin_class(class),
        WalkEvent::InjectConstructorParameter {
            class,
            constructor,
            parameter,
        } => visitor.visit_inject_constructor_parameter(class, constructor, parameter),
        WalkEvent::InjectMethodParameter {
            class,
            method,
            parameter,
        } => visitor.visit_inject_method_parameter(class, method, parameter),
        WalkEvent::InjectField {
            class,
            field,
        } => visitor.visit_inject_field(class, field),
        WalkEvent::EndClass {
            class,
        } => visitor.end_class(class),
    }
}

/// Walk the graph under `root`, feeding every event to `visitor`.
pub fn walk<V: WalkVisitor + ?Sized>(
    model: &GraphModel,
    root: &str,
    visitor: &mut V,
) -> Result<(), ProvgenError> {
    for event in Walk::new(model, root) {
        dispatch(visitor, event?)?;
    }
    Ok(())
}
