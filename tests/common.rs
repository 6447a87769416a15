// Common test utilities
#![allow(dead_code)]

use tolc_synchronized::ast::*;

/// Builds small trees with a distinct span for every node it creates.
/// Handlers re-find annotations by span, so two nodes must never share one.
pub struct TreeBuilder {
    offset: usize,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self { offset: 0 }
    }

    pub fn span(&mut self, len: usize) -> Span {
        let start = self.offset;
        self.offset += len + 1;
        Span::new(Location::new(1, start + 1, start), Location::new(1, start + len + 1, start + len))
    }

    /// `@Synchronized` or `@Synchronized("value")`
    pub fn synchronized(&mut self, value: Option<&str>) -> Annotation {
        let span = self.span(13);
        let arguments = match value {
            Some(v) => vec![AnnotationArg::Value(self.string(v))],
            None => vec![],
        };
        Annotation { name: "Synchronized".into(), arguments, span }
    }

    pub fn annotation(&mut self, name: &str, arguments: Vec<AnnotationArg>) -> Annotation {
        Annotation { name: name.into(), arguments, span: self.span(name.len() + 1) }
    }

    pub fn string(&mut self, value: &str) -> Expr {
        Expr::Literal(LiteralExpr { value: Literal::String(value.into()), span: self.span(value.len() + 2), generated_by: None })
    }

    pub fn int(&mut self, value: i64) -> Expr {
        Expr::Literal(LiteralExpr { value: Literal::Integer(value), span: self.span(1), generated_by: None })
    }

    pub fn ident(&mut self, name: &str) -> Expr {
        Expr::Identifier(IdentifierExpr { name: name.into(), span: self.span(name.len()) })
    }

    pub fn type_ref(&mut self, name: &str) -> TypeRef {
        TypeRef { name: name.into(), array_dims: 0, span: self.span(name.len()), generated_by: None }
    }

    /// `name();`
    pub fn call(&mut self, name: &str) -> Stmt {
        let span = self.span(name.len() + 3);
        Stmt::Expression(ExprStmt {
            expr: Expr::MethodCall(MethodCallExpr { target: None, name: name.into(), arguments: vec![], span }),
            span,
        })
    }

    /// `ty name = init;`
    pub fn local(&mut self, ty: &str, name: &str, init: Option<Expr>) -> Stmt {
        let type_ref = self.type_ref(ty);
        Stmt::Declaration(VarDeclStmt {
            modifiers: vec![],
            type_ref,
            name: name.into(),
            initializer: init,
            span: self.span(ty.len() + name.len() + 2),
        })
    }

    pub fn parameter(&mut self, ty: &str, name: &str) -> Parameter {
        let type_ref = self.type_ref(ty);
        Parameter { modifiers: vec![], annotations: vec![], type_ref, name: name.into(), span: self.span(name.len()) }
    }

    pub fn method(
        &mut self,
        name: &str,
        modifiers: Vec<Modifier>,
        annotations: Vec<Annotation>,
        body: Option<Vec<Stmt>>,
    ) -> MethodDecl {
        let body = body.map(|statements| {
            let span = self.span(20);
            Block::new(statements, span)
        });
        MethodDecl {
            modifiers,
            annotations,
            return_type: None,
            name: name.into(),
            parameters: vec![],
            throws: vec![],
            body,
            span: self.span(40),
        }
    }

    pub fn field(&mut self, name: &str, modifiers: Vec<Modifier>) -> ClassMember {
        let type_ref = self.type_ref("Object");
        ClassMember::Field(FieldDecl {
            modifiers,
            annotations: vec![],
            type_ref,
            name: name.into(),
            initializer: None,
            span: self.span(name.len() + 8),
            generated_by: None,
        })
    }

    pub fn enum_constant(&mut self, name: &str) -> ClassMember {
        ClassMember::EnumConstant(EnumConstant { name: name.into(), arguments: vec![], span: self.span(name.len()) })
    }

    pub fn type_decl(&mut self, kind: TypeKind, name: &str, members: Vec<ClassMember>) -> TypeDecl {
        let mut type_decl = TypeDecl::new(kind, name, self.span(60));
        for member in members {
            type_decl = type_decl.with_member(member);
        }
        type_decl
    }

    pub fn unit(&mut self, type_decls: Vec<TypeDecl>) -> CompilationUnit {
        let mut unit = CompilationUnit::new(Span::new(Location::start(), Location::new(1, 1, self.offset)));
        unit.type_decls = type_decls;
        unit
    }

    /// A unit holding one class with the given members
    pub fn class(&mut self, name: &str, members: Vec<ClassMember>) -> CompilationUnit {
        let type_decl = self.type_decl(TypeKind::Class, name, members);
        self.unit(vec![type_decl])
    }
}

pub fn method<'u>(unit: &'u CompilationUnit, type_name: &str, name: &str) -> &'u MethodDecl {
    unit.find_type(type_name)
        .and_then(|t| t.method(name))
        .unwrap_or_else(|| panic!("method {}.{} not found", type_name, name))
}

/// The single critical section a rewritten method consists of
pub fn critical_section<'m>(method: &'m MethodDecl) -> &'m SynchronizedStmt {
    match method.statements() {
        [Stmt::Synchronized(sync)] => sync,
        other => panic!("expected one synchronized statement in {}, found {:?}", method.name, other),
    }
}

pub fn field_names(type_decl: &TypeDecl) -> Vec<&str> {
    type_decl.fields().map(|f| f.name.as_str()).collect()
}

/// Names of the calls in a statement list, `?` for anything else
pub fn call_names(statements: &[Stmt]) -> Vec<&str> {
    statements
        .iter()
        .map(|s| match s {
            Stmt::Expression(ExprStmt { expr: Expr::MethodCall(call), .. }) => call.name.as_str(),
            _ => "?",
        })
        .collect()
}
