//! Helpers shared by annotation handlers: member lookup, member injection,
//! and a node factory that stamps spans and provenance on everything it builds.

use crate::ast::{
    Annotation, Block, ClassMember, Expr, FieldAccessExpr, FieldDecl, GeneratedBy, Literal, LiteralExpr, Modifier,
    NewArrayExpr, QualifiedNameExpr, Span, Stmt, SynchronizedStmt, ThisExpr, TypeDecl, TypeRef,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberExistsResult {
    NotExists,
    /// Declared in source
    ExistsByUser,
    /// Injected earlier by a handler
    ExistsByGenerator,
}

/// Check whether `type_decl` declares a field called `name`
pub fn field_exists(name: &str, type_decl: &TypeDecl) -> MemberExistsResult {
    match find_field(type_decl, name) {
        None => MemberExistsResult::NotExists,
        Some(f) if f.generated_by.is_some() => MemberExistsResult::ExistsByGenerator,
        Some(_) => MemberExistsResult::ExistsByUser,
    }
}

pub fn find_field<'t>(type_decl: &'t TypeDecl, name: &str) -> Option<&'t FieldDecl> {
    type_decl.fields().find(|f| f.name == name)
}

/// Add a field to `type_decl`, returning the member index it landed at
pub fn inject_field(type_decl: &mut TypeDecl, field: FieldDecl) -> usize {
    log::debug!("injecting field {} into {}", field.name, type_decl.name);
    type_decl.insert_member(ClassMember::Field(field))
}

/// Builds nodes on behalf of one annotation occurrence.
///
/// Every node is tagged with the annotation as its provenance. Expressions
/// and declarations are anchored at the annotation's start (`Span::single`);
/// nodes that replace a whole existing construct take that construct's
/// range through the `*_covering` constructors instead.
#[derive(Debug, Clone)]
pub struct NodeMaker {
    source: GeneratedBy,
    pos: Span,
}

impl NodeMaker {
    pub fn new(annotation: &Annotation) -> Self {
        Self {
            source: GeneratedBy::new(annotation.simple_name(), annotation.span),
            pos: Span::single(annotation.span.start),
        }
    }

    pub fn source(&self) -> &GeneratedBy {
        &self.source
    }

    /// The single-point span used for generated expressions
    pub fn point(&self) -> Span {
        self.pos
    }

    fn tag(&self) -> Option<GeneratedBy> {
        Some(self.source.clone())
    }

    pub fn int_literal(&self, value: i64) -> Expr {
        Expr::Literal(LiteralExpr { value: Literal::Integer(value), span: self.pos, generated_by: self.tag() })
    }

    pub fn type_ref(&self, name: &str, array_dims: usize) -> TypeRef {
        TypeRef { name: name.to_string(), array_dims, span: self.pos, generated_by: self.tag() }
    }

    pub fn this_ref(&self) -> Expr {
        Expr::This(ThisExpr { span: self.pos, generated_by: self.tag() })
    }

    pub fn field_access(&self, receiver: Expr, name: &str) -> Expr {
        Expr::FieldAccess(FieldAccessExpr {
            receiver: Box::new(receiver),
            name: name.to_string(),
            span: self.pos,
            generated_by: self.tag(),
        })
    }

    pub fn qualified_name<I, S>(&self, path: I) -> Expr
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Expr::QualifiedName(QualifiedNameExpr {
            path: path.into_iter().map(Into::into).collect(),
            span: self.pos,
            generated_by: self.tag(),
        })
    }

    pub fn new_array(&self, element_type: TypeRef, dimensions: Vec<Expr>) -> Expr {
        Expr::NewArray(NewArrayExpr { element_type, dimensions, span: self.pos, generated_by: self.tag() })
    }

    pub fn field(&self, name: &str, modifiers: Vec<Modifier>, type_ref: TypeRef, initializer: Option<Expr>) -> FieldDecl {
        FieldDecl {
            modifiers,
            annotations: Vec::new(),
            type_ref,
            name: name.to_string(),
            initializer,
            span: self.pos,
            generated_by: self.tag(),
        }
    }

    /// A block standing in for `owner`, e.g. a method body being re-wrapped
    pub fn block_covering(&self, owner: Span, statements: Vec<Stmt>) -> Block {
        Block { statements, span: Span::covering(owner), generated_by: self.tag() }
    }

    /// A critical section standing in for `owner`
    pub fn synchronized_covering(&self, owner: Span, lock: Expr, body: Block) -> Stmt {
        Stmt::Synchronized(SynchronizedStmt { lock, body, span: Span::covering(owner), generated_by: self.tag() })
    }
}
