use super::{AstNode, AstVisitor, GeneratedBy, Span};
use std::fmt;

// Package and Import Declarations
#[derive(Debug, Clone)]
pub struct PackageDecl {
    pub name: String,
    pub span: Span,
}

impl fmt::Display for PackageDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "package {};", self.name)
    }
}

#[derive(Debug, Clone)]
pub struct ImportDecl {
    pub name: String,
    pub is_static: bool,
    pub is_wildcard: bool,
    pub span: Span,
}

impl fmt::Display for ImportDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_static {
            write!(f, "import static ")?;
        } else {
            write!(f, "import ")?;
        }

        if self.is_wildcard {
            write!(f, "{}.*;", self.name)
        } else {
            write!(f, "{};", self.name)
        }
    }
}

// Type Declarations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Annotation,
    Record,
}

impl TypeKind {
    /// Whether a type of this kind may declare private instance and static fields
    pub fn can_host_fields(self) -> bool {
        matches!(self, TypeKind::Class | TypeKind::Enum)
    }

    pub fn keyword(self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Interface => "interface",
            TypeKind::Enum => "enum",
            TypeKind::Annotation => "@interface",
            TypeKind::Record => "record",
        }
    }
}

/// A class, interface, enum, annotation type or record.
///
/// The member list is owned here and only grows through
/// [`TypeDecl::insert_member`], so anything that injects members holds a
/// `&mut TypeDecl` for the duration of its check-then-insert.
#[derive(Debug, Clone)]
pub struct TypeDecl {
    pub kind: TypeKind,
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
    pub name: String,
    members: Vec<ClassMember>,
    pub span: Span,
}

impl TypeDecl {
    pub fn new(kind: TypeKind, name: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            modifiers: Vec::new(),
            annotations: Vec::new(),
            name: name.into(),
            members: Vec::new(),
            span,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Vec<Modifier>) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Append a member in source order; used while building a tree
    pub fn with_member(mut self, member: ClassMember) -> Self {
        self.members.push(member);
        self
    }

    pub fn members(&self) -> &[ClassMember] {
        &self.members
    }

    pub fn member_mut(&mut self, index: usize) -> Option<&mut ClassMember> {
        self.members.get_mut(index)
    }

    /// Insert a member into this type and return the index it landed at.
    ///
    /// Fields are placed ahead of user fields, after any enum constants and
    /// any fields generated earlier, so generated fields stay grouped in the
    /// order they were created. Other members are appended.
    pub fn insert_member(&mut self, member: ClassMember) -> usize {
        let index = match member {
            ClassMember::Field(_) => self
                .members
                .iter()
                .position(|m| match m {
                    ClassMember::EnumConstant(_) => false,
                    ClassMember::Field(f) => f.generated_by.is_none(),
                    _ => true,
                })
                .unwrap_or(self.members.len()),
            _ => self.members.len(),
        };
        self.members.insert(index, member);
        index
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldDecl> {
        self.members.iter().filter_map(|m| match m {
            ClassMember::Field(f) => Some(f),
            _ => None,
        })
    }

    pub fn methods(&self) -> impl Iterator<Item = &MethodDecl> {
        self.members.iter().filter_map(|m| match m {
            ClassMember::Method(m) => Some(m),
            _ => None,
        })
    }

    pub fn method(&self, name: &str) -> Option<&MethodDecl> {
        self.methods().find(|m| m.name == name)
    }
}

impl AstNode for TypeDecl {
    fn span(&self) -> Span {
        self.span
    }

    fn accept<V: AstVisitor>(&self, visitor: &mut V) {
        visitor.visit_type_decl(self)
    }
}

impl fmt::Display for TypeDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind.keyword(), self.name)
    }
}

// Modifiers and Annotations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Abstract,
    Static,
    Final,
    Native,
    Synchronized,
    Transient,
    Volatile,
    Strictfp,
    // Java 8: default interface method
    Default,
}

#[derive(Debug, Clone)]
pub struct Annotation {
    pub name: String,
    pub arguments: Vec<AnnotationArg>,
    pub span: Span,
}

impl Annotation {
    /// Simple name of the annotation type (`lombok.Synchronized` -> `Synchronized`)
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

impl AstNode for Annotation {
    fn span(&self) -> Span {
        self.span
    }

    fn accept<V: AstVisitor>(&self, visitor: &mut V) {
        visitor.visit_annotation(self)
    }
}

#[derive(Debug, Clone)]
pub enum AnnotationArg {
    Value(Expr),
    Named(String, Expr),
}

// Type References
#[derive(Debug, Clone)]
pub struct TypeRef {
    pub name: String,
    pub array_dims: usize,
    pub span: Span,
    pub generated_by: Option<GeneratedBy>,
}

impl AstNode for TypeRef {
    fn span(&self) -> Span {
        self.span
    }

    fn accept<V: AstVisitor>(&self, visitor: &mut V) {
        visitor.visit_type_ref(self)
    }
}

// Class Members
#[derive(Debug, Clone)]
pub enum ClassMember {
    Field(FieldDecl),
    Method(MethodDecl),
    Constructor(ConstructorDecl),
    Initializer(InitializerBlock),
    EnumConstant(EnumConstant),
    TypeDecl(TypeDecl),
}

impl ClassMember {
    pub fn annotations(&self) -> &[Annotation] {
        match self {
            ClassMember::Field(f) => &f.annotations,
            ClassMember::Method(m) => &m.annotations,
            ClassMember::Constructor(c) => &c.annotations,
            ClassMember::TypeDecl(t) => &t.annotations,
            ClassMember::Initializer(_) | ClassMember::EnumConstant(_) => &[],
        }
    }

    pub fn span(&self) -> Span {
        match self {
            ClassMember::Field(f) => f.span,
            ClassMember::Method(m) => m.span,
            ClassMember::Constructor(c) => c.span,
            ClassMember::Initializer(i) => i.span,
            ClassMember::EnumConstant(e) => e.span,
            ClassMember::TypeDecl(t) => t.span,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
    pub type_ref: TypeRef,
    pub name: String,
    pub initializer: Option<Expr>,
    pub span: Span,
    pub generated_by: Option<GeneratedBy>,
}

impl FieldDecl {
    pub fn is_static(&self) -> bool {
        self.modifiers.contains(&Modifier::Static)
    }
}

impl AstNode for FieldDecl {
    fn span(&self) -> Span {
        self.span
    }

    fn accept<V: AstVisitor>(&self, visitor: &mut V) {
        visitor.visit_field_decl(self)
    }
}

#[derive(Debug, Clone)]
pub struct MethodDecl {
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
    pub return_type: Option<TypeRef>,
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub throws: Vec<TypeRef>,
    /// `None` for bodiless declarations (abstract, native)
    pub body: Option<Block>,
    pub span: Span,
}

impl MethodDecl {
    pub fn is_static(&self) -> bool {
        self.modifiers.contains(&Modifier::Static)
    }

    pub fn is_abstract(&self) -> bool {
        self.modifiers.contains(&Modifier::Abstract)
    }

    /// Statements of the body; empty when the body is absent
    pub fn statements(&self) -> &[Stmt] {
        self.body.as_ref().map(|b| b.statements.as_slice()).unwrap_or(&[])
    }
}

impl AstNode for MethodDecl {
    fn span(&self) -> Span {
        self.span
    }

    fn accept<V: AstVisitor>(&self, visitor: &mut V) {
        visitor.visit_method_decl(self)
    }
}

#[derive(Debug, Clone)]
pub struct ConstructorDecl {
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub body: Block,
    pub span: Span,
}

impl AstNode for ConstructorDecl {
    fn span(&self) -> Span {
        self.span
    }

    fn accept<V: AstVisitor>(&self, visitor: &mut V) {
        visitor.visit_constructor_decl(self)
    }
}

#[derive(Debug, Clone)]
pub struct Parameter {
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
    pub type_ref: TypeRef,
    pub name: String,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct InitializerBlock {
    pub is_static: bool,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct EnumConstant {
    pub name: String,
    pub arguments: Vec<Expr>,
    pub span: Span,
}

// Statements
#[derive(Debug, Clone)]
pub struct Block {
    pub statements: Vec<Stmt>,
    pub span: Span,
    pub generated_by: Option<GeneratedBy>,
}

impl Block {
    pub fn new(statements: Vec<Stmt>, span: Span) -> Self {
        Self { statements, span, generated_by: None }
    }
}

impl AstNode for Block {
    fn span(&self) -> Span {
        self.span
    }

    fn accept<V: AstVisitor>(&self, visitor: &mut V) {
        visitor.visit_block(self)
    }
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Expression(ExprStmt),
    Declaration(VarDeclStmt),
    If(IfStmt),
    While(WhileStmt),
    Return(ReturnStmt),
    Throw(ThrowStmt),
    Try(TryStmt),
    Synchronized(SynchronizedStmt),
    Block(Block),
    Empty(Span),
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Expression(s) => s.span,
            Stmt::Declaration(s) => s.span,
            Stmt::If(s) => s.span,
            Stmt::While(s) => s.span,
            Stmt::Return(s) => s.span,
            Stmt::Throw(s) => s.span,
            Stmt::Try(s) => s.span,
            Stmt::Synchronized(s) => s.span,
            Stmt::Block(b) => b.span,
            Stmt::Empty(span) => *span,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExprStmt {
    pub expr: Expr,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct VarDeclStmt {
    pub modifiers: Vec<Modifier>,
    pub type_ref: TypeRef,
    pub name: String,
    pub initializer: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_branch: Box<Stmt>,
    pub else_branch: Option<Box<Stmt>>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: Box<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ThrowStmt {
    pub expr: Expr,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct TryStmt {
    pub try_block: Block,
    pub catch_clauses: Vec<CatchClause>,
    pub finally_block: Option<Block>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct CatchClause {
    pub parameter: Parameter,
    pub block: Block,
    pub span: Span,
}

/// `synchronized (lock) { body }`
#[derive(Debug, Clone)]
pub struct SynchronizedStmt {
    pub lock: Expr,
    pub body: Block,
    pub span: Span,
    pub generated_by: Option<GeneratedBy>,
}

// Expressions
#[derive(Debug, Clone)]
pub enum Expr {
    Literal(LiteralExpr),
    Identifier(IdentifierExpr),
    This(ThisExpr),
    /// `receiver.name`
    FieldAccess(FieldAccessExpr),
    /// `A.b.c` resolved purely by name, e.g. a static field through its type
    QualifiedName(QualifiedNameExpr),
    Binary(BinaryExpr),
    Assignment(AssignmentExpr),
    MethodCall(MethodCallExpr),
    New(NewExpr),
    NewArray(NewArrayExpr),
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Literal(e) => e.span,
            Expr::Identifier(e) => e.span,
            Expr::This(e) => e.span,
            Expr::FieldAccess(e) => e.span,
            Expr::QualifiedName(e) => e.span,
            Expr::Binary(e) => e.span,
            Expr::Assignment(e) => e.span,
            Expr::MethodCall(e) => e.span,
            Expr::New(e) => e.span,
            Expr::NewArray(e) => e.span,
        }
    }

    pub fn generated_by(&self) -> Option<&GeneratedBy> {
        match self {
            Expr::Literal(e) => e.generated_by.as_ref(),
            Expr::This(e) => e.generated_by.as_ref(),
            Expr::FieldAccess(e) => e.generated_by.as_ref(),
            Expr::QualifiedName(e) => e.generated_by.as_ref(),
            Expr::NewArray(e) => e.generated_by.as_ref(),
            Expr::Identifier(_)
            | Expr::Binary(_)
            | Expr::Assignment(_)
            | Expr::MethodCall(_)
            | Expr::New(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LiteralExpr {
    pub value: Literal,
    pub span: Span,
    pub generated_by: Option<GeneratedBy>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Integer(i64),
    Boolean(bool),
    String(String),
    Char(char),
    Null,
}

#[derive(Debug, Clone)]
pub struct IdentifierExpr {
    pub name: String,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ThisExpr {
    pub span: Span,
    pub generated_by: Option<GeneratedBy>,
}

#[derive(Debug, Clone)]
pub struct FieldAccessExpr {
    pub receiver: Box<Expr>,
    pub name: String,
    pub span: Span,
    pub generated_by: Option<GeneratedBy>,
}

#[derive(Debug, Clone)]
pub struct QualifiedNameExpr {
    pub path: Vec<String>,
    pub span: Span,
    pub generated_by: Option<GeneratedBy>,
}

#[derive(Debug, Clone)]
pub struct BinaryExpr {
    pub left: Box<Expr>,
    pub operator: BinaryOp,
    pub right: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add, Sub, Mul, Div, Mod,
    Lt, Le, Gt, Ge, Eq, Ne,
    LogicalAnd, LogicalOr,
}

#[derive(Debug, Clone)]
pub struct AssignmentExpr {
    pub target: Box<Expr>,
    pub value: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct MethodCallExpr {
    pub target: Option<Box<Expr>>,
    pub name: String,
    pub arguments: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct NewExpr {
    pub target_type: TypeRef,
    pub arguments: Vec<Expr>,
    pub span: Span,
}

/// `new T[d0][d1]...`
#[derive(Debug, Clone)]
pub struct NewArrayExpr {
    pub element_type: TypeRef,
    pub dimensions: Vec<Expr>,
    pub span: Span,
    pub generated_by: Option<GeneratedBy>,
}
