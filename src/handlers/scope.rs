use crate::ast::{
    walk_block, walk_stmt, AstNode, AstVisitor, Block, ClassMember, CompilationUnit, MethodDecl, Parameter, Span, Stmt,
    TypeDecl,
};
use std::collections::HashMap;

/// A local variable or parameter and the block depth it is declared at.
/// Parameters sit at depth 0, top-level body statements at depth 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalVar {
    pub name: String,
    pub depth: usize,
    pub span: Span,
}

/// Per-method local scopes, keyed by method span.
///
/// Built once for a unit; handlers that restructure a body ask for the
/// method's entry to be recomputed through `AnnotationNode::rebuild`.
#[derive(Debug, Default)]
pub struct ScopeIndex {
    methods: HashMap<Span, Vec<LocalVar>>,
    rebuilds: usize,
}

impl ScopeIndex {
    pub fn build(unit: &CompilationUnit) -> Self {
        let mut index = ScopeIndex::default();
        for type_decl in &unit.type_decls {
            index.index_type(type_decl);
        }
        index
    }

    fn index_type(&mut self, type_decl: &TypeDecl) {
        for member in type_decl.members() {
            match member {
                ClassMember::Method(method) => {
                    self.methods.insert(method.span, collect_locals(method));
                }
                ClassMember::TypeDecl(nested) => self.index_type(nested),
                _ => {}
            }
        }
    }

    /// Recompute the entry for `method`
    pub fn rebuild_method(&mut self, method: &MethodDecl) {
        log::trace!("rebuilding scopes of method {}", method.name);
        self.methods.insert(method.span, collect_locals(method));
        self.rebuilds += 1;
    }

    pub fn locals(&self, method_span: Span) -> Option<&[LocalVar]> {
        self.methods.get(&method_span).map(Vec::as_slice)
    }

    /// How many times an entry was rebuilt after the initial build
    pub fn rebuild_count(&self) -> usize {
        self.rebuilds
    }
}

fn collect_locals(method: &MethodDecl) -> Vec<LocalVar> {
    let mut collector = LocalCollector { depth: 0, locals: Vec::new() };
    method.accept(&mut collector);
    collector.locals
}

struct LocalCollector {
    depth: usize,
    locals: Vec<LocalVar>,
}

impl AstVisitor for LocalCollector {
    fn visit_parameter(&mut self, parameter: &Parameter) {
        self.locals.push(LocalVar { name: parameter.name.clone(), depth: self.depth, span: parameter.span });
    }

    fn visit_block(&mut self, block: &Block) {
        self.depth += 1;
        walk_block(self, block);
        self.depth -= 1;
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        if let Stmt::Declaration(decl) = stmt {
            self.locals.push(LocalVar { name: decl.name.clone(), depth: self.depth, span: decl.span });
        }
        walk_stmt(self, stmt);
    }
}
