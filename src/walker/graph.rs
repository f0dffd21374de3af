//! Injection graph built from a walk.
//!
//! Nodes are types keyed by name; an edge `a -> b` means `a` needs `b`: a
//! component includes a module or provisions a type, a module includes a
//! module or consumes a type in a provides method, a class injects a type.
//! Wrapper types (`Optional`, `Provider`, `Lazy`) are unwrapped so edges
//! point at the provided type.

use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

use super::{WalkVisitor, walk};
use crate::core::ProvgenError;
use crate::model::{FieldDecl, GraphModel, MethodDecl, ParameterDecl, TypeDecl, TypeKind, TypeRef};
use crate::sites::ProvisionStyle;

/// A type in the injection graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GraphNode {
    pub name: String,
    /// Declared kind, `None` for types the model does not declare
    pub kind: Option<TypeKind>,
}

impl fmt::Display for GraphNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            Some(TypeKind::Class) | None => f.write_str(&self.name),
            Some(kind) => write!(f, "{} [{kind}]", self.name),
        }
    }
}

/// Directed graph of type-level injection dependencies.
#[derive(Debug, Default)]
pub struct InjectionGraph {
    graph: DiGraph<GraphNode, ()>,
    node_map: HashMap<String, NodeIndex>,
}

impl InjectionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk `root` and record every dependency edge the walk reveals.
    pub fn from_walk(model: &GraphModel, root: &str) -> Result<Self, ProvgenError> {
        let mut builder = GraphBuilder {
            model,
            graph: Self::new(),
        };
        walk(model, root, &mut builder)?;
        Ok(builder.graph)
    }

    fn ensure_node(&mut self, node: GraphNode) -> NodeIndex {
        if let Some(&index) = self.node_map.get(&node.name) {
            index
        } else {
            let name = node.name.clone();
            let index = self.graph.add_node(node);
            self.node_map.insert(name, index);
            index
        }
    }

    /// Add an edge `from -> to`, creating nodes as needed.
    pub fn add_dependency(&mut self, from: GraphNode, to: GraphNode) {
        let from_idx = self.ensure_node(from);
        let to_idx = self.ensure_node(to);

        if !self.graph.contains_edge(from_idx, to_idx) {
            self.graph.add_edge(from_idx, to_idx, ());
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.node_map.contains_key(name)
    }

    /// Direct dependencies of `name`, sorted by name.
    pub fn direct_dependencies(&self, name: &str) -> Vec<&GraphNode> {
        let Some(&index) = self.node_map.get(name) else {
            return Vec::new();
        };
        let mut deps: Vec<&GraphNode> =
            self.graph.neighbors(index).map(|idx| &self.graph[idx]).collect();
        deps.sort_by(|a, b| a.name.cmp(&b.name));
        deps
    }

    /// Names of every type reachable from `name`.
    pub fn transitive_dependencies(&self, name: &str) -> HashSet<String> {
        let mut deps = HashSet::new();
        let mut queue = VecDeque::new();

        if let Some(&index) = self.node_map.get(name) {
            queue.push_back(index);

            while let Some(current) = queue.pop_front() {
                for neighbor in self.graph.neighbors(current) {
                    if deps.insert(self.graph[neighbor].name.clone()) {
                        queue.push_back(neighbor);
                    }
                }
            }
        }

        deps
    }

    /// Whether some type (indirectly) depends on itself.
    pub fn has_cycles(&self) -> bool {
        is_cyclic_directed(&self.graph)
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Render the graph under `root` as an indented tree.
    ///
    /// A type that was already printed on the current path is marked as a
    /// circular reference instead of being expanded again.
    pub fn to_tree_string(&self, root: &str) -> String {
        let mut result = String::new();
        let Some(&index) = self.node_map.get(root) else {
            return result;
        };
        result.push_str(&format!("{}\n", self.graph[index]));

        let mut path = HashSet::new();
        path.insert(root.to_string());
        let deps = self.direct_dependencies(root);
        for (i, dep) in deps.iter().enumerate() {
            self.build_tree_string(dep, &mut result, "", i == deps.len() - 1, &mut path);
        }
        result
    }

    fn build_tree_string(
        &self,
        node: &GraphNode,
        result: &mut String,
        prefix: &str,
        is_last: bool,
        path: &mut HashSet<String>,
    ) {
        let connector = if is_last {
            "└── "
        } else {
            "├── "
        };
        result.push_str(&format!("{prefix}{connector}{node}\n"));

        let child_prefix = if is_last {
            format!("{prefix}    ")
        } else {
            format!("{prefix}│   ")
        };

        if !path.insert(node.name.clone()) {
            result.push_str(&format!("{child_prefix}└── (circular reference)\n"));
            return;
        }

        let deps = self.direct_dependencies(&node.name);
        for (i, dep) in deps.iter().enumerate() {
            self.build_tree_string(dep, result, &child_prefix, i == deps.len() - 1, path);
        }

        path.remove(&node.name);
    }
}

/// Records walk events as graph edges.
struct GraphBuilder<'g> {
    model: &'g GraphModel,
    graph: InjectionGraph,
}

impl GraphBuilder<'_> {
    fn node(&self, name: &str) -> GraphNode {
        GraphNode {
            name: name.to_string(),
            kind: self.model.get(name).map(|decl| decl.kind),
        }
    }

    fn type_node(&self, type_ref: &TypeRef) -> GraphNode {
        let (_, provided) = ProvisionStyle::classify(type_ref);
        match provided.erasure_name() {
            Some(name) => self.node(name),
            None => GraphNode {
                name: provided.to_string(),
                kind: None,
            },
        }
    }

    fn link(&mut self, from: &TypeDecl, to: GraphNode) {
        let from = self.node(&from.name);
        self.graph.add_dependency(from, to);
    }
}

impl WalkVisitor for GraphBuilder<'_> {
    fn begin_component(&mut self, component: &TypeDecl) -> Result<(), ProvgenError> {
        let node = self.node(&component.name);
        self.graph.ensure_node(node);
        Ok(())
    }

    fn visit_component_module(
        &mut self,
        component: &TypeDecl,
        module: &str,
    ) -> Result<(), ProvgenError> {
        let to = self.node(module);
        self.link(component, to);
        Ok(())
    }

    fn visit_component_provision_method(
        &mut self,
        component: &TypeDecl,
        method: &MethodDecl,
    ) -> Result<(), ProvgenError> {
        let to = self.type_node(&method.returns);
        self.link(component, to);
        Ok(())
    }

    fn visit_module_included_module(
        &mut self,
        module: &TypeDecl,
        included: &str,
    ) -> Result<(), ProvgenError> {
        let to = self.node(included);
        self.link(module, to);
        Ok(())
    }

    fn visit_module_provides_method(
        &mut self,
        module: &TypeDecl,
        _declaring: &TypeDecl,
        method: &MethodDecl,
    ) -> Result<(), ProvgenError> {
        for parameter in &method.parameters {
            let to = self.type_node(&parameter.type_ref);
            self.link(module, to);
        }
        Ok(())
    }

    fn visit_inject_constructor_parameter(
        &mut self,
        class: &TypeDecl,
        _constructor: &MethodDecl,
        parameter: &ParameterDecl,
    ) -> Result<(), ProvgenError> {
        let to = self.type_node(&parameter.type_ref);
        self.link(class, to);
        Ok(())
    }

    fn visit_inject_method_parameter(
        &mut self,
        class: &TypeDecl,
        _method: &MethodDecl,
        parameter: &ParameterDecl,
    ) -> Result<(), ProvgenError> {
        let to = self.type_node(&parameter.type_ref);
        self.link(class, to);
        Ok(())
    }

    fn visit_inject_field(&mut self, class: &TypeDecl, field: &FieldDecl) -> Result<(), ProvgenError> {
        let to = self.type_node(&field.type_ref);
        self.link(class, to);
        Ok(())
    }
}
