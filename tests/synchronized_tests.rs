mod common;

use common::*;
use tolc_synchronized::ast::*;
use tolc_synchronized::consts::{INSTANCE_LOCK_NAME, STATIC_LOCK_NAME};
use tolc_synchronized::diagnostics::Diagnostics;
use tolc_synchronized::handlers::{
    AnnotatedElement, AnnotationHandler, AnnotationNode, AnnotationPath, AnnotationValues, HandleOutcome,
    HandleSynchronized, ScopeIndex,
};
use tolc_synchronized::{process, Config, Severity};

#[test]
fn test_default_lock_names_differ() {
    assert_eq!(INSTANCE_LOCK_NAME, "$lock");
    assert_eq!(STATIC_LOCK_NAME, "$LOCK");
    assert_ne!(INSTANCE_LOCK_NAME, STATIC_LOCK_NAME);
}

#[test]
fn test_instance_method_locks_on_this_lock() {
    let mut b = TreeBuilder::new();
    let ann = b.synchronized(None);
    let body = vec![b.call("first"), b.call("second")];
    let m = b.method("tick", vec![Modifier::Public], vec![ann], Some(body));
    let mut unit = b.class("Counter", vec![ClassMember::Method(m)]);

    let report = process(&mut unit, &Config::default()).unwrap();
    assert!(report.diagnostics.is_empty());
    assert_eq!(report.outcome_at(ann_span(&unit, "tick")), Some(HandleOutcome::Rewritten));

    let counter = unit.find_type("Counter").unwrap();
    assert_eq!(field_names(counter), ["$lock"]);
    let lock = counter.fields().next().unwrap();
    assert_eq!(lock.modifiers, vec![Modifier::Private, Modifier::Final]);
    assert_eq!(lock.type_ref.name, "java.lang.Object");
    match &lock.initializer {
        Some(Expr::NewArray(array)) => {
            assert_eq!(array.element_type.name, "java.lang.Object");
            assert!(matches!(array.dimensions.as_slice(), [Expr::Literal(LiteralExpr { value: Literal::Integer(0), .. })]));
        }
        other => panic!("unexpected lock initializer {:?}", other),
    }

    let sync = critical_section(method(&unit, "Counter", "tick"));
    match &sync.lock {
        Expr::FieldAccess(access) => {
            assert_eq!(access.name, "$lock");
            assert!(matches!(*access.receiver, Expr::This(_)));
        }
        other => panic!("expected this.$lock, found {:?}", other),
    }
}

#[test]
fn test_static_method_locks_on_class_qualified_static_lock() {
    let mut b = TreeBuilder::new();
    let ann = b.synchronized(None);
    let body = vec![b.call("reset")];
    let m = b.method("resetAll", vec![Modifier::Public, Modifier::Static], vec![ann], Some(body));
    let mut unit = b.class("Registry", vec![ClassMember::Method(m)]);

    process(&mut unit, &Config::default()).unwrap();

    let registry = unit.find_type("Registry").unwrap();
    assert_eq!(field_names(registry), ["$LOCK"]);
    assert!(registry.fields().next().unwrap().is_static());

    let sync = critical_section(method(&unit, "Registry", "resetAll"));
    match &sync.lock {
        Expr::QualifiedName(name) => assert_eq!(name.path, ["Registry", "$LOCK"]),
        other => panic!("expected Registry.$LOCK, found {:?}", other),
    }
}

#[test]
fn test_methods_share_one_default_lock_per_kind() {
    let mut b = TreeBuilder::new();
    let mut members = Vec::new();
    for (name, modifiers) in [
        ("a", vec![]),
        ("b", vec![]),
        ("c", vec![Modifier::Static]),
        ("d", vec![Modifier::Static]),
    ] {
        let ann = b.synchronized(None);
        let body = vec![b.call(name)];
        members.push(ClassMember::Method(b.method(name, modifiers, vec![ann], Some(body))));
    }
    let mut unit = b.class("Shared", members);

    let report = process(&mut unit, &Config::default()).unwrap();
    assert_eq!(report.count(HandleOutcome::Rewritten), 4);

    let shared = unit.find_type("Shared").unwrap();
    assert_eq!(field_names(shared), ["$lock", "$LOCK"]);
    for name in ["a", "b", "c", "d"] {
        critical_section(method(&unit, "Shared", name));
    }
}

#[test]
fn test_explicit_missing_lock_is_one_error_and_no_mutation() {
    let mut b = TreeBuilder::new();
    let ann = b.synchronized(Some("readLock"));
    let body = vec![b.call("read")];
    let m = b.method("read", vec![], vec![ann], Some(body));
    let mut unit = b.class("Store", vec![ClassMember::Method(m)]);
    let before = unit.to_string();

    let report = process(&mut unit, &Config::default()).unwrap();

    let errors: Vec<_> = report.diagnostics.errors().collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "The field readLock does not exist.");
    assert_eq!(errors[0].span, ann_span(&unit, "read"));
    assert_eq!(unit.to_string(), before);
}

#[test]
fn test_explicit_existing_lock_is_reused() {
    let mut b = TreeBuilder::new();
    let guard = b.field("readLock", vec![Modifier::Private, Modifier::Final]);
    let ann = b.synchronized(Some("readLock"));
    let body = vec![b.call("read")];
    let m = b.method("read", vec![], vec![ann], Some(body));
    let mut unit = b.class("Store", vec![guard, ClassMember::Method(m)]);

    let report = process(&mut unit, &Config::default()).unwrap();
    assert!(report.diagnostics.is_empty());

    let store = unit.find_type("Store").unwrap();
    assert_eq!(field_names(store), ["readLock"]);
    assert!(store.fields().all(|f| f.generated_by.is_none()));

    let sync = critical_section(method(&unit, "Store", "read"));
    assert!(matches!(&sync.lock, Expr::FieldAccess(access) if access.name == "readLock"));
}

#[test]
fn test_explicit_static_lock_on_static_method() {
    let mut b = TreeBuilder::new();
    let guard = b.field("GUARD", vec![Modifier::Private, Modifier::Static, Modifier::Final]);
    let ann = b.synchronized(Some("GUARD"));
    let body = vec![b.call("init")];
    let m = b.method("init", vec![Modifier::Static], vec![ann], Some(body));
    let mut unit = b.class("Boot", vec![guard, ClassMember::Method(m)]);

    let report = process(&mut unit, &Config::default()).unwrap();
    assert!(report.diagnostics.is_empty());

    let sync = critical_section(method(&unit, "Boot", "init"));
    assert!(matches!(&sync.lock, Expr::QualifiedName(name) if name.path == ["Boot", "GUARD"]));
}

#[test]
fn test_body_statements_are_preserved_in_order() {
    let mut b = TreeBuilder::new();
    let ann = b.synchronized(None);
    let init = b.int(1);
    let body = vec![b.call("open"), b.local("int", "n", Some(init)), b.call("write"), b.call("close")];
    let original_spans: Vec<Span> = body.iter().map(Stmt::span).collect();
    let m = b.method("flush", vec![], vec![ann], Some(body));
    let mut unit = b.class("Writer", vec![ClassMember::Method(m)]);

    process(&mut unit, &Config::default()).unwrap();

    let sync = critical_section(method(&unit, "Writer", "flush"));
    assert_eq!(call_names(&sync.body.statements), ["open", "?", "write", "close"]);
    let spans: Vec<Span> = sync.body.statements.iter().map(Stmt::span).collect();
    assert_eq!(spans, original_spans);
}

#[test]
fn test_empty_body_gets_lock_but_no_wrapper() {
    let mut b = TreeBuilder::new();
    let ann = b.synchronized(None);
    let m = b.method("noop", vec![], vec![ann], Some(vec![]));
    let mut unit = b.class("Idle", vec![ClassMember::Method(m)]);

    let report = process(&mut unit, &Config::default()).unwrap();
    assert!(report.diagnostics.is_empty());
    assert_eq!(report.count(HandleOutcome::Unchanged), 1);

    assert!(method(&unit, "Idle", "noop").statements().is_empty());
    assert_eq!(field_names(unit.find_type("Idle").unwrap()), ["$lock"]);
}

#[test]
fn test_critical_section_spans_cover_method_body() {
    let mut b = TreeBuilder::new();
    let ann = b.synchronized(None);
    let body = vec![b.call("work")];
    let m = b.method("work", vec![], vec![ann], Some(body));
    let body_span = m.body.as_ref().unwrap().span;
    let mut unit = b.class("Job", vec![ClassMember::Method(m)]);

    process(&mut unit, &Config::default()).unwrap();

    let rewritten = method(&unit, "Job", "work");
    let sync = critical_section(rewritten);
    assert_eq!(sync.span, body_span);
    assert_eq!(sync.body.span, body_span);
    assert_ne!(sync.span, ann_span(&unit, "work"));
    // the method body itself keeps its place
    assert_eq!(rewritten.body.as_ref().unwrap().span, body_span);
    // the lock reference points at the annotation
    assert_eq!(sync.lock.span(), Span::single(ann_span(&unit, "work").start));
}

#[test]
fn test_abstract_method_is_rejected_without_mutation() {
    let mut b = TreeBuilder::new();
    let ann = b.synchronized(None);
    let m = b.method("compute", vec![Modifier::Public, Modifier::Abstract], vec![ann], None);
    let mut unit = b.class("Shape", vec![ClassMember::Method(m)]);
    let before = unit.to_string();

    let report = process(&mut unit, &Config::default()).unwrap();

    let messages: Vec<_> = report.diagnostics.iter().map(|d| d.message.as_str()).collect();
    assert_eq!(messages, ["@Synchronized is legal only on concrete methods."]);
    assert_eq!(report.count(HandleOutcome::Rejected), 1);
    assert_eq!(unit.to_string(), before);
}

#[test]
fn test_non_method_targets_are_rejected() {
    let mut b = TreeBuilder::new();
    let ann = b.synchronized(None);
    let mut field = b.field("state", vec![Modifier::Private]);
    if let ClassMember::Field(f) = &mut field {
        f.annotations.push(ann);
    }
    let type_ann = b.synchronized(None);
    let type_decl = b.type_decl(TypeKind::Class, "Holder", vec![field]).with_annotation(type_ann);
    let mut unit = b.unit(vec![type_decl]);
    let before = unit.to_string();

    let report = process(&mut unit, &Config::default()).unwrap();

    assert_eq!(report.diagnostics.len(), 2);
    assert!(report.diagnostics.iter().all(|d| d.message == "@Synchronized is legal only on methods."));
    assert_eq!(unit.to_string(), before);
}

#[test]
fn test_interface_default_method_is_rejected() {
    let mut b = TreeBuilder::new();
    let ann = b.synchronized(None);
    let body = vec![b.call("log")];
    let m = b.method("describe", vec![Modifier::Default], vec![ann], Some(body));
    let iface = b.type_decl(TypeKind::Interface, "Describable", vec![ClassMember::Method(m)]);
    let mut unit = b.unit(vec![iface]);
    let before = unit.to_string();

    let report = process(&mut unit, &Config::default()).unwrap();

    let messages: Vec<_> = report.diagnostics.iter().map(|d| d.message.as_str()).collect();
    assert_eq!(messages, ["@Synchronized is legal only on methods in classes and enums."]);
    assert_eq!(unit.to_string(), before);
}

#[test]
fn test_instance_lock_named_from_static_method_is_rejected() {
    let mut b = TreeBuilder::new();
    let guard = b.field("guard", vec![Modifier::Private, Modifier::Final]);
    let ann = b.synchronized(Some("guard"));
    let body = vec![b.call("tick")];
    let m = b.method("tick", vec![Modifier::Static], vec![ann], Some(body));
    let mut unit = b.class("Clock", vec![guard, ClassMember::Method(m)]);

    let report = process(&mut unit, &Config::default()).unwrap();

    let errors: Vec<_> = report.diagnostics.errors().map(|d| d.message.as_str()).collect();
    assert_eq!(errors, ["The field guard is non-static and thus cannot be used on this static method"]);
    assert_eq!(call_names(method(&unit, "Clock", "tick").statements()), ["tick"]);
}

#[test]
fn test_static_lock_named_from_instance_method_is_rejected() {
    let mut b = TreeBuilder::new();
    let guard = b.field("GUARD", vec![Modifier::Private, Modifier::Static, Modifier::Final]);
    let ann = b.synchronized(Some("GUARD"));
    let body = vec![b.call("tick")];
    let m = b.method("tick", vec![], vec![ann], Some(body));
    let mut unit = b.class("Clock", vec![guard, ClassMember::Method(m)]);

    let report = process(&mut unit, &Config::default()).unwrap();

    let errors: Vec<_> = report.diagnostics.errors().map(|d| d.message.as_str()).collect();
    assert_eq!(errors, ["The field GUARD is static and thus cannot guard an instance method"]);
    assert_eq!(call_names(method(&unit, "Clock", "tick").statements()), ["tick"]);
}

#[test]
fn test_non_string_value_is_rejected() {
    let mut b = TreeBuilder::new();
    let value = b.int(42);
    let ann = b.annotation("Synchronized", vec![AnnotationArg::Named("value".into(), value)]);
    let body = vec![b.call("go")];
    let m = b.method("go", vec![], vec![ann], Some(body));
    let mut unit = b.class("Runner", vec![ClassMember::Method(m)]);
    let before = unit.to_string();

    let report = process(&mut unit, &Config::default()).unwrap();

    let errors: Vec<_> = report.diagnostics.errors().map(|d| d.message.as_str()).collect();
    assert_eq!(errors, ["@Synchronized: 'value' must be a string constant"]);
    assert_eq!(unit.to_string(), before);
}

#[test]
fn test_fully_qualified_annotation_name_is_recognized() {
    let mut b = TreeBuilder::new();
    let ann = b.annotation("lombok.Synchronized", vec![]);
    let body = vec![b.call("go")];
    let m = b.method("go", vec![], vec![ann], Some(body));
    let mut unit = b.class("Runner", vec![ClassMember::Method(m)]);

    process(&mut unit, &Config::default()).unwrap();

    let sync = critical_section(method(&unit, "Runner", "go"));
    assert_eq!(sync.generated_by.as_ref().unwrap().annotation, "Synchronized");
}

#[test]
fn test_enum_lock_field_follows_constants() {
    let mut b = TreeBuilder::new();
    let red = b.enum_constant("RED");
    let green = b.enum_constant("GREEN");
    let ordinal = b.field("cache", vec![Modifier::Private]);
    let ann = b.synchronized(None);
    let body = vec![b.call("refresh")];
    let m = b.method("refresh", vec![], vec![ann], Some(body));
    let color = b.type_decl(TypeKind::Enum, "Color", vec![red, green, ordinal, ClassMember::Method(m)]);
    let mut unit = b.unit(vec![color]);

    process(&mut unit, &Config::default()).unwrap();

    let color = unit.find_type("Color").unwrap();
    let layout: Vec<&str> = color
        .members()
        .iter()
        .map(|m| match m {
            ClassMember::EnumConstant(c) => c.name.as_str(),
            ClassMember::Field(f) => f.name.as_str(),
            ClassMember::Method(m) => m.name.as_str(),
            _ => "?",
        })
        .collect();
    assert_eq!(layout, ["RED", "GREEN", "$lock", "cache", "refresh"]);
    critical_section(method(&unit, "Color", "refresh"));
}

#[test]
fn test_nested_type_static_lock_uses_nested_type_name() {
    let mut b = TreeBuilder::new();
    let ann = b.synchronized(None);
    let body = vec![b.call("load")];
    let m = b.method("load", vec![Modifier::Static], vec![ann], Some(body));
    let inner = b.type_decl(TypeKind::Class, "Holder", vec![ClassMember::Method(m)]);
    let mut unit = b.class("Outer", vec![ClassMember::TypeDecl(inner)]);

    process(&mut unit, &Config::default()).unwrap();

    assert_eq!(field_names(unit.find_type("Outer").unwrap()), Vec::<&str>::new());
    assert_eq!(field_names(unit.find_type("Holder").unwrap()), ["$LOCK"]);
    let sync = critical_section(method(&unit, "Holder", "load"));
    assert!(matches!(&sync.lock, Expr::QualifiedName(name) if name.path == ["Holder", "$LOCK"]));
}

#[test]
fn test_one_bad_method_does_not_stop_the_others() {
    let mut b = TreeBuilder::new();
    let bad_ann = b.synchronized(Some("missing"));
    let bad_body = vec![b.call("bad")];
    let bad = b.method("bad", vec![], vec![bad_ann], Some(bad_body));
    let good_ann = b.synchronized(None);
    let good_body = vec![b.call("good")];
    let good = b.method("good", vec![], vec![good_ann], Some(good_body));
    let mut unit = b.class("Mixed", vec![ClassMember::Method(bad), ClassMember::Method(good)]);

    let report = process(&mut unit, &Config::default()).unwrap();

    assert_eq!(report.diagnostics.errors().count(), 1);
    assert_eq!(report.count(HandleOutcome::Rejected), 1);
    assert_eq!(report.count(HandleOutcome::Rewritten), 1);
    assert_eq!(call_names(method(&unit, "Mixed", "bad").statements()), ["bad"]);
    critical_section(method(&unit, "Mixed", "good"));
}

#[test]
fn test_generated_nodes_carry_annotation_provenance() {
    let mut b = TreeBuilder::new();
    let ann = b.synchronized(None);
    let body = vec![b.call("tick")];
    let m = b.method("tick", vec![], vec![ann], Some(body));
    let mut unit = b.class("Counter", vec![ClassMember::Method(m)]);

    process(&mut unit, &Config::default()).unwrap();

    let at = ann_span(&unit, "tick");
    let generated = generated_nodes(&unit);
    assert!(generated.iter().all(|g| g.generated_by.annotation == "Synchronized" && g.generated_by.span == at));

    let count = |kind| generated.iter().filter(|g| g.kind == kind).count();
    assert_eq!(count(GeneratedKind::Field), 1);
    assert_eq!(count(GeneratedKind::Synchronized), 1);
    assert_eq!(count(GeneratedKind::Block), 1);
    // field type and array element type
    assert_eq!(count(GeneratedKind::TypeRef), 2);
    // new Object[0], 0, this.$lock, this
    assert_eq!(count(GeneratedKind::Expr), 4);

    // the user's statements are not generated
    assert!(generated.iter().all(|g| g.kind != GeneratedKind::Expr || g.span == Span::single(at.start)));
}

#[test]
fn test_printer_renders_rewritten_class() {
    let mut b = TreeBuilder::new();
    let ann = b.synchronized(None);
    let body = vec![b.call("bump")];
    let m = b.method("tick", vec![Modifier::Public], vec![ann], Some(body));
    let mut unit = b.class("Counter", vec![ClassMember::Method(m)]);

    process(&mut unit, &Config::default()).unwrap();

    let expected = "\
class Counter {
    private final java.lang.Object $lock = new java.lang.Object[0];
    @Synchronized
    public void tick() {
        synchronized (this.$lock) {
            bump();
        }
    }
}
";
    assert_eq!(unit.to_string(), expected);
}

#[test]
fn test_error_diagnostics_are_anchored_at_annotation() {
    let mut b = TreeBuilder::new();
    let ann = b.synchronized(Some("nope"));
    let body = vec![b.call("x")];
    let m = b.method("x", vec![], vec![ann], Some(body));
    let mut unit = b.class("Anchor", vec![ClassMember::Method(m)]);

    let report = process(&mut unit, &Config::default()).unwrap();
    let diagnostic = report.diagnostics.iter().next().unwrap();
    assert_eq!(diagnostic.severity, Severity::Error);
    assert_eq!(diagnostic.span, ann_span(&unit, "x"));
    assert!(diagnostic.to_string().ends_with(": error: The field nope does not exist."));
}

#[test]
fn test_handle_alone_creates_lock_and_rewrites() {
    let mut b = TreeBuilder::new();
    let ann = b.synchronized(None);
    let body = vec![b.call("first"), b.call("second")];
    let m = b.method("tick", vec![], vec![ann], Some(body));
    let mut unit = b.class("Counter", vec![ClassMember::Method(m)]);

    let config = Config::default();
    let mut diagnostics = Diagnostics::new();
    let mut scopes = ScopeIndex::build(&unit);
    let path = AnnotationPath { type_path: vec![0], element: AnnotatedElement::Member(0), index: 0 };
    let values = AnnotationValues::from_annotation(path.resolve(&unit).unwrap());
    let mut node = AnnotationNode::new(&mut unit, path, &config, &mut diagnostics, &mut scopes);

    let outcome = HandleSynchronized::new().handle(&values, &mut node).unwrap();

    assert_eq!(outcome, HandleOutcome::Rewritten);
    assert!(diagnostics.is_empty());
    assert_eq!(scopes.rebuild_count(), 1);
    assert_eq!(field_names(unit.find_type("Counter").unwrap()), ["$lock"]);
    let sync = critical_section(method(&unit, "Counter", "tick"));
    assert_eq!(call_names(&sync.body.statements), ["first", "second"]);
}

#[test]
fn test_annotations_sharing_a_span_are_each_handled_once() {
    let members: Vec<ClassMember> = ["a", "b", "c"]
        .into_iter()
        .map(|name| {
            let call = Stmt::Expression(ExprStmt {
                expr: Expr::MethodCall(MethodCallExpr {
                    target: None,
                    name: name.into(),
                    arguments: vec![],
                    span: Span::default(),
                }),
                span: Span::default(),
            });
            ClassMember::Method(MethodDecl {
                modifiers: vec![],
                annotations: vec![Annotation { name: "Synchronized".into(), arguments: vec![], span: Span::default() }],
                return_type: None,
                name: name.into(),
                parameters: vec![],
                throws: vec![],
                body: Some(Block::new(vec![call], Span::default())),
                span: Span::default(),
            })
        })
        .collect();
    let mut type_decl = TypeDecl::new(TypeKind::Class, "W", Span::default());
    for member in members {
        type_decl = type_decl.with_member(member);
    }
    let mut unit = CompilationUnit::new(Span::default());
    unit.type_decls.push(type_decl);

    let report = process(&mut unit, &Config::default()).unwrap();

    assert!(report.diagnostics.is_empty());
    assert_eq!(report.count(HandleOutcome::Rewritten), 3);
    assert_eq!(field_names(unit.find_type("W").unwrap()), ["$lock"]);
    for name in ["a", "b", "c"] {
        let sync = critical_section(method(&unit, "W", name));
        // wrapped exactly once
        assert_eq!(call_names(&sync.body.statements), [name]);
    }
}

/// Span of the first annotation on method `name`, wherever it lives in the unit
fn ann_span(unit: &CompilationUnit, name: &str) -> Span {
    fn search(type_decl: &TypeDecl, name: &str) -> Option<Span> {
        type_decl.members().iter().find_map(|m| match m {
            ClassMember::Method(m) if m.name == name => m.annotations.first().map(|a| a.span),
            ClassMember::TypeDecl(t) => search(t, name),
            _ => None,
        })
    }
    unit.type_decls.iter().find_map(|t| search(t, name)).expect("annotated method")
}
