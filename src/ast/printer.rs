use super::nodes::*;
use super::visitor::AstVisitor;
use super::CompilationUnit;
use std::fmt::Write;

const INDENT: &str = "    ";

/// Prints a tree back as Java source, mainly for inspecting rewrites
#[derive(Default)]
pub struct AstPrinter {
    depth: usize,
    out: String,
}

impl AstPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn print(&mut self, unit: &CompilationUnit) -> String {
        self.out.clear();
        self.visit_unit(unit);
        std::mem::take(&mut self.out)
    }

    /// Print a single type declaration
    pub fn print_type(&mut self, type_decl: &TypeDecl) -> String {
        self.out.clear();
        self.visit_type_decl(type_decl);
        std::mem::take(&mut self.out)
    }

    /// Print a single method declaration
    pub fn print_method(&mut self, method: &MethodDecl) -> String {
        self.out.clear();
        self.visit_method_decl(method);
        std::mem::take(&mut self.out)
    }

    fn pad(&mut self) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
    }

    fn line(&mut self, text: &str) {
        self.pad();
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn modifiers(&mut self, modifiers: &[Modifier]) {
        for modifier in modifiers {
            let _ = write!(self.out, "{} ", format!("{:?}", modifier).to_lowercase());
        }
    }

    fn annotation_lines(&mut self, annotations: &[Annotation]) {
        for annotation in annotations {
            self.pad();
            self.visit_annotation(annotation);
            self.out.push('\n');
        }
    }

    /// `{`, the statements one level deeper, then `}` with no newline
    fn braced(&mut self, block: &Block) {
        self.out.push_str("{\n");
        self.depth += 1;
        self.visit_block(block);
        self.depth -= 1;
        self.pad();
        self.out.push('}');
    }

    fn comma_list<T>(&mut self, items: &[T], mut each: impl FnMut(&mut Self, &T)) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            each(self, item);
        }
    }

    fn parameters(&mut self, parameters: &[Parameter]) {
        self.out.push('(');
        self.comma_list(parameters, |p, param| p.visit_parameter(param));
        self.out.push(')');
    }

    /// A statement nested under `if`/`while`, one level deeper
    fn nested(&mut self, stmt: &Stmt) {
        self.depth += 1;
        self.visit_stmt(stmt);
        self.depth -= 1;
    }
}

fn binary_op(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "+",
        BinaryOp::Sub => "-",
        BinaryOp::Mul => "*",
        BinaryOp::Div => "/",
        BinaryOp::Mod => "%",
        BinaryOp::Lt => "<",
        BinaryOp::Le => "<=",
        BinaryOp::Gt => ">",
        BinaryOp::Ge => ">=",
        BinaryOp::Eq => "==",
        BinaryOp::Ne => "!=",
        BinaryOp::LogicalAnd => "&&",
        BinaryOp::LogicalOr => "||",
    }
}

impl AstVisitor for AstPrinter {
    fn visit_unit(&mut self, unit: &CompilationUnit) {
        if let Some(package) = &unit.package_decl {
            let _ = writeln!(self.out, "{}\n", package);
        }
        for import in &unit.imports {
            let _ = writeln!(self.out, "{}", import);
        }
        if !unit.imports.is_empty() {
            self.out.push('\n');
        }
        for type_decl in &unit.type_decls {
            self.visit_type_decl(type_decl);
        }
    }

    fn visit_type_decl(&mut self, type_decl: &TypeDecl) {
        self.annotation_lines(&type_decl.annotations);
        self.pad();
        self.modifiers(&type_decl.modifiers);
        let _ = writeln!(self.out, "{} {} {{", type_decl.kind.keyword(), type_decl.name);
        self.depth += 1;

        let constants: Vec<&EnumConstant> = type_decl
            .members()
            .iter()
            .filter_map(|m| match m {
                ClassMember::EnumConstant(c) => Some(c),
                _ => None,
            })
            .collect();
        if !constants.is_empty() {
            self.pad();
            self.comma_list(&constants, |p, constant| {
                p.out.push_str(&constant.name);
                if !constant.arguments.is_empty() {
                    p.out.push('(');
                    p.comma_list(&constant.arguments, |p, arg| p.visit_expr(arg));
                    p.out.push(')');
                }
            });
            self.out.push_str(";\n");
        }

        for member in type_decl.members() {
            match member {
                ClassMember::Field(f) => self.visit_field_decl(f),
                ClassMember::Method(m) => self.visit_method_decl(m),
                ClassMember::Constructor(c) => self.visit_constructor_decl(c),
                ClassMember::Initializer(init) => {
                    self.pad();
                    if init.is_static {
                        self.out.push_str("static ");
                    }
                    self.braced(&init.body);
                    self.out.push('\n');
                }
                ClassMember::TypeDecl(nested) => self.visit_type_decl(nested),
                ClassMember::EnumConstant(_) => {}
            }
        }

        self.depth -= 1;
        self.line("}");
    }

    fn visit_field_decl(&mut self, field: &FieldDecl) {
        self.annotation_lines(&field.annotations);
        self.pad();
        self.modifiers(&field.modifiers);
        self.visit_type_ref(&field.type_ref);
        let _ = write!(self.out, " {}", field.name);
        if let Some(init) = &field.initializer {
            self.out.push_str(" = ");
            self.visit_expr(init);
        }
        self.out.push_str(";\n");
    }

    fn visit_method_decl(&mut self, method: &MethodDecl) {
        self.annotation_lines(&method.annotations);
        self.pad();
        self.modifiers(&method.modifiers);
        match &method.return_type {
            Some(ty) => self.visit_type_ref(ty),
            None => self.out.push_str("void"),
        }
        let _ = write!(self.out, " {}", method.name);
        self.parameters(&method.parameters);
        if !method.throws.is_empty() {
            self.out.push_str(" throws ");
            self.comma_list(&method.throws, |p, ty| p.visit_type_ref(ty));
        }
        match &method.body {
            Some(body) => {
                self.out.push(' ');
                self.braced(body);
                self.out.push('\n');
            }
            None => self.out.push_str(";\n"),
        }
    }

    fn visit_constructor_decl(&mut self, constructor: &ConstructorDecl) {
        self.annotation_lines(&constructor.annotations);
        self.pad();
        self.modifiers(&constructor.modifiers);
        self.out.push_str(&constructor.name);
        self.parameters(&constructor.parameters);
        self.out.push(' ');
        self.braced(&constructor.body);
        self.out.push('\n');
    }

    fn visit_parameter(&mut self, parameter: &Parameter) {
        for annotation in &parameter.annotations {
            self.visit_annotation(annotation);
            self.out.push(' ');
        }
        self.modifiers(&parameter.modifiers);
        self.visit_type_ref(&parameter.type_ref);
        let _ = write!(self.out, " {}", parameter.name);
    }

    fn visit_block(&mut self, block: &Block) {
        for stmt in &block.statements {
            self.visit_stmt(stmt);
        }
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expression(s) => {
                self.pad();
                self.visit_expr(&s.expr);
                self.out.push_str(";\n");
            }
            Stmt::Declaration(d) => {
                self.pad();
                self.modifiers(&d.modifiers);
                self.visit_type_ref(&d.type_ref);
                let _ = write!(self.out, " {}", d.name);
                if let Some(init) = &d.initializer {
                    self.out.push_str(" = ");
                    self.visit_expr(init);
                }
                self.out.push_str(";\n");
            }
            Stmt::If(s) => {
                self.pad();
                self.out.push_str("if (");
                self.visit_expr(&s.condition);
                self.out.push_str(")\n");
                self.nested(&s.then_branch);
                if let Some(else_branch) = &s.else_branch {
                    self.line("else");
                    self.nested(else_branch);
                }
            }
            Stmt::While(s) => {
                self.pad();
                self.out.push_str("while (");
                self.visit_expr(&s.condition);
                self.out.push_str(")\n");
                self.nested(&s.body);
            }
            Stmt::Return(s) => {
                self.pad();
                self.out.push_str("return");
                if let Some(value) = &s.value {
                    self.out.push(' ');
                    self.visit_expr(value);
                }
                self.out.push_str(";\n");
            }
            Stmt::Throw(s) => {
                self.pad();
                self.out.push_str("throw ");
                self.visit_expr(&s.expr);
                self.out.push_str(";\n");
            }
            Stmt::Try(s) => {
                self.pad();
                self.out.push_str("try ");
                self.braced(&s.try_block);
                for catch in &s.catch_clauses {
                    self.out.push_str(" catch (");
                    self.visit_parameter(&catch.parameter);
                    self.out.push_str(") ");
                    self.braced(&catch.block);
                }
                if let Some(finally) = &s.finally_block {
                    self.out.push_str(" finally ");
                    self.braced(finally);
                }
                self.out.push('\n');
            }
            Stmt::Synchronized(s) => {
                self.pad();
                self.out.push_str("synchronized (");
                self.visit_expr(&s.lock);
                self.out.push_str(") ");
                self.braced(&s.body);
                self.out.push('\n');
            }
            Stmt::Block(block) => {
                self.pad();
                self.braced(block);
                self.out.push('\n');
            }
            Stmt::Empty(_) => self.line(";"),
        }
    }

    fn visit_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal(lit) => {
                let _ = match &lit.value {
                    Literal::Integer(i) => write!(self.out, "{}", i),
                    Literal::Boolean(b) => write!(self.out, "{}", b),
                    Literal::String(s) => write!(self.out, "\"{}\"", s),
                    Literal::Char(c) => write!(self.out, "'{}'", c),
                    Literal::Null => write!(self.out, "null"),
                };
            }
            Expr::Identifier(id) => self.out.push_str(&id.name),
            Expr::This(_) => self.out.push_str("this"),
            Expr::FieldAccess(access) => {
                self.visit_expr(&access.receiver);
                let _ = write!(self.out, ".{}", access.name);
            }
            Expr::QualifiedName(name) => self.out.push_str(&name.path.join(".")),
            Expr::Binary(bin) => {
                self.visit_expr(&bin.left);
                let _ = write!(self.out, " {} ", binary_op(bin.operator));
                self.visit_expr(&bin.right);
            }
            Expr::Assignment(assign) => {
                self.visit_expr(&assign.target);
                self.out.push_str(" = ");
                self.visit_expr(&assign.value);
            }
            Expr::MethodCall(call) => {
                if let Some(target) = &call.target {
                    self.visit_expr(target);
                    self.out.push('.');
                }
                self.out.push_str(&call.name);
                self.out.push('(');
                self.comma_list(&call.arguments, |p, arg| p.visit_expr(arg));
                self.out.push(')');
            }
            Expr::New(new) => {
                self.out.push_str("new ");
                self.visit_type_ref(&new.target_type);
                self.out.push('(');
                self.comma_list(&new.arguments, |p, arg| p.visit_expr(arg));
                self.out.push(')');
            }
            Expr::NewArray(array) => {
                self.out.push_str("new ");
                self.visit_type_ref(&array.element_type);
                for dim in &array.dimensions {
                    self.out.push('[');
                    self.visit_expr(dim);
                    self.out.push(']');
                }
            }
        }
    }

    fn visit_type_ref(&mut self, type_ref: &TypeRef) {
        self.out.push_str(&type_ref.name);
        self.out.push_str(&"[]".repeat(type_ref.array_dims));
    }

    fn visit_annotation(&mut self, annotation: &Annotation) {
        let _ = write!(self.out, "@{}", annotation.name);
        if annotation.arguments.is_empty() {
            return;
        }
        self.out.push('(');
        self.comma_list(&annotation.arguments, |p, arg| match arg {
            AnnotationArg::Value(expr) => p.visit_expr(expr),
            AnnotationArg::Named(name, expr) => {
                let _ = write!(p.out, "{} = ", name);
                p.visit_expr(expr);
            }
        });
        self.out.push(')');
    }
}
