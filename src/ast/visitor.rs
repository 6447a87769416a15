use super::*;

/// AST visitor trait for traversing read-only AST nodes.
///
/// Every method defaults to the matching `walk_*` function, which visits the
/// node's children; override the hooks you need and call `walk_*` yourself
/// to keep descending.
pub trait AstVisitor {
    // AST root
    fn visit_unit(&mut self, unit: &CompilationUnit) {
        walk_unit(self, unit)
    }

    // Type declarations and members
    fn visit_type_decl(&mut self, type_decl: &TypeDecl) {
        walk_type_decl(self, type_decl)
    }
    fn visit_field_decl(&mut self, field: &FieldDecl) {
        walk_field_decl(self, field)
    }
    fn visit_method_decl(&mut self, method: &MethodDecl) {
        walk_method_decl(self, method)
    }
    fn visit_constructor_decl(&mut self, constructor: &ConstructorDecl) {
        walk_block(self, &constructor.body)
    }
    fn visit_parameter(&mut self, parameter: &Parameter) {
        self.visit_type_ref(&parameter.type_ref)
    }

    // Statements
    fn visit_block(&mut self, block: &Block) {
        walk_block(self, block)
    }
    fn visit_stmt(&mut self, stmt: &Stmt) {
        walk_stmt(self, stmt)
    }

    // Expressions
    fn visit_expr(&mut self, expr: &Expr) {
        walk_expr(self, expr)
    }

    // Types
    fn visit_type_ref(&mut self, _type_ref: &TypeRef) {}

    // Annotations
    fn visit_annotation(&mut self, _annotation: &Annotation) {}
}

pub fn walk_unit<V: AstVisitor + ?Sized>(visitor: &mut V, unit: &CompilationUnit) {
    for type_decl in &unit.type_decls {
        visitor.visit_type_decl(type_decl);
    }
}

pub fn walk_type_decl<V: AstVisitor + ?Sized>(visitor: &mut V, type_decl: &TypeDecl) {
    for ann in &type_decl.annotations {
        visitor.visit_annotation(ann);
    }
    for member in type_decl.members() {
        match member {
            ClassMember::Field(f) => visitor.visit_field_decl(f),
            ClassMember::Method(m) => visitor.visit_method_decl(m),
            ClassMember::Constructor(c) => visitor.visit_constructor_decl(c),
            ClassMember::Initializer(i) => visitor.visit_block(&i.body),
            ClassMember::EnumConstant(e) => {
                for arg in &e.arguments {
                    visitor.visit_expr(arg);
                }
            }
            ClassMember::TypeDecl(t) => visitor.visit_type_decl(t),
        }
    }
}

pub fn walk_field_decl<V: AstVisitor + ?Sized>(visitor: &mut V, field: &FieldDecl) {
    for ann in &field.annotations {
        visitor.visit_annotation(ann);
    }
    visitor.visit_type_ref(&field.type_ref);
    if let Some(ref init) = field.initializer {
        visitor.visit_expr(init);
    }
}

pub fn walk_method_decl<V: AstVisitor + ?Sized>(visitor: &mut V, method: &MethodDecl) {
    for ann in &method.annotations {
        visitor.visit_annotation(ann);
    }
    for param in &method.parameters {
        visitor.visit_parameter(param);
    }
    if let Some(ref body) = method.body {
        visitor.visit_block(body);
    }
}

pub fn walk_block<V: AstVisitor + ?Sized>(visitor: &mut V, block: &Block) {
    for stmt in &block.statements {
        visitor.visit_stmt(stmt);
    }
}

pub fn walk_stmt<V: AstVisitor + ?Sized>(visitor: &mut V, stmt: &Stmt) {
    match stmt {
        Stmt::Expression(s) => visitor.visit_expr(&s.expr),
        Stmt::Declaration(d) => {
            visitor.visit_type_ref(&d.type_ref);
            if let Some(ref init) = d.initializer {
                visitor.visit_expr(init);
            }
        }
        Stmt::If(s) => {
            visitor.visit_expr(&s.condition);
            visitor.visit_stmt(&s.then_branch);
            if let Some(ref else_branch) = s.else_branch {
                visitor.visit_stmt(else_branch);
            }
        }
        Stmt::While(s) => {
            visitor.visit_expr(&s.condition);
            visitor.visit_stmt(&s.body);
        }
        Stmt::Return(s) => {
            if let Some(ref value) = s.value {
                visitor.visit_expr(value);
            }
        }
        Stmt::Throw(s) => visitor.visit_expr(&s.expr),
        Stmt::Try(s) => {
            visitor.visit_block(&s.try_block);
            for catch in &s.catch_clauses {
                visitor.visit_parameter(&catch.parameter);
                visitor.visit_block(&catch.block);
            }
            if let Some(ref finally_block) = s.finally_block {
                visitor.visit_block(finally_block);
            }
        }
        Stmt::Synchronized(s) => {
            visitor.visit_expr(&s.lock);
            visitor.visit_block(&s.body);
        }
        Stmt::Block(b) => visitor.visit_block(b),
        Stmt::Empty(_) => {}
    }
}

pub fn walk_expr<V: AstVisitor + ?Sized>(visitor: &mut V, expr: &Expr) {
    match expr {
        Expr::Literal(_) | Expr::Identifier(_) | Expr::This(_) | Expr::QualifiedName(_) => {}
        Expr::FieldAccess(e) => visitor.visit_expr(&e.receiver),
        Expr::Binary(e) => {
            visitor.visit_expr(&e.left);
            visitor.visit_expr(&e.right);
        }
        Expr::Assignment(e) => {
            visitor.visit_expr(&e.target);
            visitor.visit_expr(&e.value);
        }
        Expr::MethodCall(e) => {
            if let Some(ref target) = e.target {
                visitor.visit_expr(target);
            }
            for arg in &e.arguments {
                visitor.visit_expr(arg);
            }
        }
        Expr::New(e) => {
            visitor.visit_type_ref(&e.target_type);
            for arg in &e.arguments {
                visitor.visit_expr(arg);
            }
        }
        Expr::NewArray(e) => {
            visitor.visit_type_ref(&e.element_type);
            for dim in &e.dimensions {
                visitor.visit_expr(dim);
            }
        }
    }
}

/// What kind of node a [`GeneratedNode`] entry describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratedKind {
    Field,
    Block,
    Synchronized,
    Expr,
    TypeRef,
}

/// One synthesized node found by [`generated_nodes`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedNode {
    pub kind: GeneratedKind,
    pub span: Span,
    pub generated_by: GeneratedBy,
}

#[derive(Default)]
struct GeneratedCollector {
    found: Vec<GeneratedNode>,
}

impl GeneratedCollector {
    fn record(&mut self, kind: GeneratedKind, span: Span, generated_by: Option<&GeneratedBy>) {
        if let Some(g) = generated_by {
            self.found.push(GeneratedNode { kind, span, generated_by: g.clone() });
        }
    }
}

impl AstVisitor for GeneratedCollector {
    fn visit_field_decl(&mut self, field: &FieldDecl) {
        self.record(GeneratedKind::Field, field.span, field.generated_by.as_ref());
        walk_field_decl(self, field);
    }

    fn visit_block(&mut self, block: &Block) {
        self.record(GeneratedKind::Block, block.span, block.generated_by.as_ref());
        walk_block(self, block);
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        if let Stmt::Synchronized(s) = stmt {
            self.record(GeneratedKind::Synchronized, s.span, s.generated_by.as_ref());
        }
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &Expr) {
        self.record(GeneratedKind::Expr, expr.span(), expr.generated_by());
        walk_expr(self, expr);
    }

    fn visit_type_ref(&mut self, type_ref: &TypeRef) {
        self.record(GeneratedKind::TypeRef, type_ref.span, type_ref.generated_by.as_ref());
    }
}

/// List every node in `unit` that carries a provenance tag, in tree order
pub fn generated_nodes(unit: &CompilationUnit) -> Vec<GeneratedNode> {
    let mut collector = GeneratedCollector::default();
    unit.accept(&mut collector);
    collector.found
}
