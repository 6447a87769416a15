use super::scope::ScopeIndex;
use super::{util, HandlerError};
use crate::ast::{Annotation, ClassMember, CompilationUnit, FieldDecl, MethodDecl, Parameter, Span, TypeDecl, TypeKind};
use crate::config::Config;
use crate::diagnostics::Diagnostics;
use crate::error::{Error, Result};

/// What an annotation is attached to, relative to its enclosing type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotatedElement {
    /// The type declaration itself
    Type,
    /// A member of the type, by index
    Member(usize),
    /// A parameter of a method or constructor member
    Parameter { member: usize, parameter: usize },
}

/// Index path from the compilation unit down to one annotation.
///
/// Member indices shift when handlers inject members. An [`AnnotationNode`]
/// keeps its own path current across [`AnnotationNode::inject_field`]; the
/// pipeline re-locates paths between handler calls with
/// [`AnnotationPath::locate_nth`], which stays exact even when several
/// annotations share a name and span.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnnotationPath {
    /// See [`CompilationUnit::type_at`]
    pub type_path: Vec<usize>,
    pub element: AnnotatedElement,
    /// Position among the element's annotations
    pub index: usize,
}

/// Syntactic kind of the node an annotation is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Type(TypeKind),
    Field,
    Method,
    Constructor,
    Initializer,
    EnumConstant,
    Parameter,
}

impl AnnotationPath {
    /// Every annotation in the unit, in tree order (type annotations first,
    /// then member annotations, then parameter annotations of that member,
    /// then nested types)
    pub fn collect(unit: &CompilationUnit) -> Vec<AnnotationPath> {
        let mut out = Vec::new();
        for (i, type_decl) in unit.type_decls.iter().enumerate() {
            collect_type(type_decl, vec![i], &mut out);
        }
        out
    }

    /// Find the path of the first annotation named `name` whose span is `span`
    pub fn locate(unit: &CompilationUnit, name: &str, span: Span) -> Option<AnnotationPath> {
        Self::locate_nth(unit, name, span, 0)
    }

    /// Find the `occurrence`-th annotation (in tree order) named `name` with
    /// span `span`. Inserting members that carry no such annotation never
    /// changes an annotation's occurrence number.
    pub fn locate_nth(unit: &CompilationUnit, name: &str, span: Span, occurrence: usize) -> Option<AnnotationPath> {
        Self::collect(unit)
            .into_iter()
            .filter(|p| p.resolve(unit).map_or(false, |a| a.span == span && a.name == name))
            .nth(occurrence)
    }

    /// Account for a member inserted at `index` of the enclosing type
    fn shift_for_insert(&mut self, index: usize) {
        match &mut self.element {
            AnnotatedElement::Type => {}
            AnnotatedElement::Member(m) | AnnotatedElement::Parameter { member: m, .. } => {
                if index <= *m {
                    *m += 1;
                }
            }
        }
    }

    pub fn resolve<'u>(&self, unit: &'u CompilationUnit) -> Option<&'u Annotation> {
        let type_decl = unit.type_at(&self.type_path)?;
        match self.element {
            AnnotatedElement::Type => type_decl.annotations.get(self.index),
            AnnotatedElement::Member(m) => type_decl.members().get(m)?.annotations().get(self.index),
            AnnotatedElement::Parameter { member, parameter } => {
                let params = match type_decl.members().get(member)? {
                    ClassMember::Method(method) => &method.parameters,
                    ClassMember::Constructor(ctor) => &ctor.parameters,
                    _ => return None,
                };
                params.get(parameter)?.annotations.get(self.index)
            }
        }
    }
}

fn collect_type(type_decl: &TypeDecl, type_path: Vec<usize>, out: &mut Vec<AnnotationPath>) {
    for index in 0..type_decl.annotations.len() {
        out.push(AnnotationPath { type_path: type_path.clone(), element: AnnotatedElement::Type, index });
    }
    for (m, member) in type_decl.members().iter().enumerate() {
        for index in 0..member.annotations().len() {
            out.push(AnnotationPath { type_path: type_path.clone(), element: AnnotatedElement::Member(m), index });
        }
        let params: &[Parameter] = match member {
            ClassMember::Method(method) => method.parameters.as_slice(),
            ClassMember::Constructor(ctor) => ctor.parameters.as_slice(),
            _ => &[],
        };
        for (p, param) in params.iter().enumerate() {
            for index in 0..param.annotations.len() {
                out.push(AnnotationPath {
                    type_path: type_path.clone(),
                    element: AnnotatedElement::Parameter { member: m, parameter: p },
                    index,
                });
            }
        }
    }
    for (m, member) in type_decl.members().iter().enumerate() {
        if let ClassMember::TypeDecl(nested) = member {
            let mut nested_path = type_path.clone();
            nested_path.push(m);
            collect_type(nested, nested_path, out);
        }
    }
}

/// A handler's view of one annotation occurrence and the tree around it.
///
/// It hands out access to the annotated element and its enclosing type,
/// routes diagnostics to the shared sink anchored at the annotation, and
/// exposes [`AnnotationNode::rebuild`] for re-indexing after a rewrite.
pub struct AnnotationNode<'a> {
    unit: &'a mut CompilationUnit,
    path: AnnotationPath,
    config: &'a Config,
    diagnostics: &'a mut Diagnostics,
    scopes: &'a mut ScopeIndex,
}

impl<'a> AnnotationNode<'a> {
    pub fn new(
        unit: &'a mut CompilationUnit,
        path: AnnotationPath,
        config: &'a Config,
        diagnostics: &'a mut Diagnostics,
        scopes: &'a mut ScopeIndex,
    ) -> Self {
        Self { unit, path, config, diagnostics, scopes }
    }

    pub fn path(&self) -> &AnnotationPath {
        &self.path
    }

    pub fn config(&self) -> &Config {
        self.config
    }

    pub fn annotation(&self) -> Result<&Annotation> {
        self.path
            .resolve(self.unit)
            .ok_or_else(|| Error::stale_node(format!("{:?}", self.path)))
    }

    /// Kind of the node the annotation is attached to; `None` if it no
    /// longer resolves
    pub fn up(&self) -> Option<NodeKind> {
        let type_decl = self.unit.type_at(&self.path.type_path)?;
        match self.path.element {
            AnnotatedElement::Type => Some(NodeKind::Type(type_decl.kind)),
            AnnotatedElement::Parameter { .. } => Some(NodeKind::Parameter),
            AnnotatedElement::Member(m) => Some(match type_decl.members().get(m)? {
                ClassMember::Field(_) => NodeKind::Field,
                ClassMember::Method(_) => NodeKind::Method,
                ClassMember::Constructor(_) => NodeKind::Constructor,
                ClassMember::Initializer(_) => NodeKind::Initializer,
                ClassMember::EnumConstant(_) => NodeKind::EnumConstant,
                ClassMember::TypeDecl(t) => NodeKind::Type(t.kind),
            }),
        }
    }

    /// The annotated method, if the annotation sits directly on one
    pub fn method(&self) -> Option<&MethodDecl> {
        let AnnotatedElement::Member(m) = self.path.element else {
            return None;
        };
        match self.unit.type_at(&self.path.type_path)?.members().get(m)? {
            ClassMember::Method(method) => Some(method),
            _ => None,
        }
    }

    pub fn method_mut(&mut self) -> Option<&mut MethodDecl> {
        let AnnotatedElement::Member(m) = self.path.element else {
            return None;
        };
        match self.unit.type_at_mut(&self.path.type_path)?.member_mut(m)? {
            ClassMember::Method(method) => Some(method),
            _ => None,
        }
    }

    /// The type whose member carries the annotation (or the annotated type
    /// itself for type annotations)
    pub fn enclosing_type(&self) -> Option<&TypeDecl> {
        self.unit.type_at(&self.path.type_path)
    }

    pub fn enclosing_type_mut(&mut self) -> Option<&mut TypeDecl> {
        self.unit.type_at_mut(&self.path.type_path)
    }

    /// Insert `field` into the enclosing type and keep this node pointed at
    /// its annotation. Returns the member index the field landed at.
    pub fn inject_field(&mut self, field: FieldDecl) -> Result<usize> {
        let type_decl = self
            .unit
            .type_at_mut(&self.path.type_path)
            .ok_or_else(|| Error::stale_node(format!("enclosing type of {:?}", self.path)))?;
        let index = util::inject_field(type_decl, field);
        self.path.shift_for_insert(index);
        Ok(index)
    }

    fn anchor(&self) -> Span {
        self.path.resolve(self.unit).map(|a| a.span).unwrap_or(self.unit.span)
    }

    pub fn add_error(&mut self, message: impl Into<String>) {
        let span = self.anchor();
        self.diagnostics.add_error(span, message);
    }

    pub fn add_warning(&mut self, message: impl Into<String>) {
        let span = self.anchor();
        self.diagnostics.add_warning(span, message);
    }

    /// Report a handler error as an error diagnostic
    pub fn report(&mut self, error: &HandlerError) {
        self.add_error(error.to_string());
    }

    /// Tell the host that the annotated method's body changed so its
    /// bookkeeping (local scopes) is recomputed
    pub fn rebuild(&mut self) {
        let AnnotatedElement::Member(m) = self.path.element else {
            return;
        };
        if let Some(ClassMember::Method(method)) = self
            .unit
            .type_at(&self.path.type_path)
            .and_then(|t| t.members().get(m))
        {
            self.scopes.rebuild_method(method);
        }
    }
}
