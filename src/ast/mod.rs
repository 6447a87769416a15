//! Abstract Syntax Tree (AST) representation for annotated Java sources
//!
//! This module defines the tree that annotation handlers read and rewrite.
//! Every node carries a [`Span`]; nodes that a handler may synthesize also
//! carry an optional [`GeneratedBy`] tag naming the annotation that made them.

mod nodes;
mod printer;
mod span;
mod visitor;

pub use nodes::*;
pub use printer::*;
pub use span::{Location, Span};
pub use visitor::*;

use std::fmt;

/// Provenance of a synthesized node: the annotation instance that produced it.
///
/// Downstream tooling uses this to tell generated code from user code, for
/// instance to suppress warnings on it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GeneratedBy {
    /// Simple name of the annotation, without `@`
    pub annotation: String,
    /// Source span of the annotation occurrence
    pub span: Span,
}

impl GeneratedBy {
    pub fn new(annotation: impl Into<String>, span: Span) -> Self {
        Self { annotation: annotation.into(), span }
    }
}

impl fmt::Display for GeneratedBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{} at {}", self.annotation, self.span)
    }
}

/// AST node trait that all major AST nodes implement
pub trait AstNode {
    /// Get the source span of this node
    fn span(&self) -> Span;

    /// Accept a visitor
    fn accept<V: AstVisitor>(&self, visitor: &mut V);
}

/// Root of one compilation unit
#[derive(Debug, Clone)]
pub struct CompilationUnit {
    pub package_decl: Option<PackageDecl>,
    pub imports: Vec<ImportDecl>,
    pub type_decls: Vec<TypeDecl>,
    pub span: Span,
}

impl CompilationUnit {
    pub fn new(span: Span) -> Self {
        Self { package_decl: None, imports: Vec::new(), type_decls: Vec::new(), span }
    }

    /// Resolve a type by index path: the first index selects a top-level
    /// type, each following index selects a nested type among the members
    /// of the previous one.
    pub fn type_at(&self, path: &[usize]) -> Option<&TypeDecl> {
        let (first, rest) = path.split_first()?;
        let mut current = self.type_decls.get(*first)?;
        for index in rest {
            current = match current.members().get(*index)? {
                ClassMember::TypeDecl(t) => t,
                _ => return None,
            };
        }
        Some(current)
    }

    pub fn type_at_mut(&mut self, path: &[usize]) -> Option<&mut TypeDecl> {
        let (first, rest) = path.split_first()?;
        let mut current = self.type_decls.get_mut(*first)?;
        for index in rest {
            current = match current.member_mut(*index)? {
                ClassMember::TypeDecl(t) => t,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Find a type by simple name anywhere in the unit (depth first)
    pub fn find_type(&self, name: &str) -> Option<&TypeDecl> {
        fn search<'a>(t: &'a TypeDecl, name: &str) -> Option<&'a TypeDecl> {
            if t.name == name {
                return Some(t);
            }
            t.members().iter().find_map(|m| match m {
                ClassMember::TypeDecl(nested) => search(nested, name),
                _ => None,
            })
        }
        self.type_decls.iter().find_map(|t| search(t, name))
    }
}

impl AstNode for CompilationUnit {
    fn span(&self) -> Span {
        self.span
    }

    fn accept<V: AstVisitor>(&self, visitor: &mut V) {
        visitor.visit_unit(self)
    }
}

impl fmt::Display for CompilationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", AstPrinter::new().print(self))
    }
}
