//! Handler for `@Synchronized`.
//!
//! Turns
//!
//! ```text
//! @Synchronized void tick() { count++; }
//! ```
//!
//! into
//!
//! ```text
//! private final java.lang.Object $lock = new java.lang.Object[0];
//! @Synchronized void tick() { synchronized (this.$lock) { count++; } }
//! ```
//!
//! Static methods lock on `$LOCK` through the type name instead. With
//! `@Synchronized("name")` the field must already exist and is never created.

use super::util::{self, MemberExistsResult, NodeMaker};
use super::{AnnotationHandler, AnnotationNode, AnnotationValues, HandleOutcome, HandlerError, NodeKind};
use crate::ast::{MethodDecl, Modifier};
use crate::config::FlagUsage;
use crate::consts::{INSTANCE_LOCK_NAME, JAVA_LANG_OBJECT, STATIC_LOCK_NAME, SYNCHRONIZED_ANNOTATION, SYNCHRONIZED_PRIORITY};
use crate::error::{Error, Result};

/// How the lock for one annotated method was resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockResolution {
    /// `@Synchronized("name")` and the field exists
    ExplicitExisting(String),
    /// `@Synchronized("name")` and no such field
    ExplicitMissing(String),
    /// No name given; the default field for the method's context
    ImplicitDefault { name: String, created: bool },
    /// The field exists but is static where the method is not, or vice versa
    WrongKind { name: String, field_is_static: bool },
}

impl LockResolution {
    /// Lock field to synchronize on, if the resolution is usable
    pub fn lock_name(&self) -> Option<&str> {
        match self {
            LockResolution::ExplicitExisting(name) | LockResolution::ImplicitDefault { name, .. } => Some(name),
            LockResolution::ExplicitMissing(_) | LockResolution::WrongKind { .. } => None,
        }
    }

    /// The diagnostic to report for an unusable resolution
    pub fn error(&self) -> Option<HandlerError> {
        match self {
            LockResolution::ExplicitExisting(_) | LockResolution::ImplicitDefault { .. } => None,
            LockResolution::ExplicitMissing(name) => Some(HandlerError::MissingExplicitLock(name.clone())),
            LockResolution::WrongKind { name, field_is_static: true } => {
                Some(HandlerError::StaticLockInInstanceMethod(name.clone()))
            }
            LockResolution::WrongKind { name, field_is_static: false } => {
                Some(HandlerError::InstanceLockInStaticMethod(name.clone()))
            }
        }
    }
}

/// Default lock field name for a static or instance context
pub fn default_lock_name(is_static: bool) -> &'static str {
    if is_static {
        STATIC_LOCK_NAME
    } else {
        INSTANCE_LOCK_NAME
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct HandleSynchronized;

impl HandleSynchronized {
    pub fn new() -> Self {
        Self
    }

    /// Check that the annotation sits on a concrete method of a type that
    /// can hold the lock field. Returns the method's static flag.
    fn validate_target(&self, node: &AnnotationNode<'_>) -> std::result::Result<bool, HandlerError> {
        let invalid = |legal_on: &'static str| HandlerError::InvalidTarget { annotation: SYNCHRONIZED_ANNOTATION.to_string(), legal_on };

        let method = match (node.up(), node.method()) {
            (Some(NodeKind::Method), Some(method)) => method,
            _ => return Err(invalid("methods")),
        };
        if method.is_abstract() {
            return Err(invalid("concrete methods"));
        }
        let is_static = method.is_static();
        if !node.enclosing_type().map_or(false, |t| t.kind.can_host_fields()) {
            return Err(invalid("methods in classes and enums"));
        }
        Ok(is_static)
    }

    /// Find or create the lock field.
    ///
    /// An empty `requested` name selects the default for the context and
    /// creates the field when missing; a non-empty name is only looked up.
    /// Safe to call repeatedly: once the field exists nothing is injected.
    /// Problems are reported only when `report_errors` is set.
    pub fn resolve_lock(
        &self,
        requested: &str,
        is_static: bool,
        node: &mut AnnotationNode<'_>,
        report_errors: bool,
    ) -> Result<LockResolution> {
        let auto_make = requested.is_empty();
        let name = if auto_make { default_lock_name(is_static) } else { requested };
        let maker = NodeMaker::new(node.annotation()?);

        let (exists, field_is_static) = {
            let type_decl = node
                .enclosing_type()
                .ok_or_else(|| Error::stale_node("enclosing type of @Synchronized"))?;
            (util::field_exists(name, type_decl), util::find_field(type_decl, name).map(|f| f.is_static()))
        };

        let resolution = match exists {
            MemberExistsResult::NotExists if auto_make => {
                node.inject_field(lock_field(&maker, name, is_static))?;
                LockResolution::ImplicitDefault { name: name.to_string(), created: true }
            }
            MemberExistsResult::NotExists => LockResolution::ExplicitMissing(name.to_string()),
            existing => {
                log::trace!("lock field {} already present ({:?})", name, existing);
                let field_is_static = field_is_static.unwrap_or(is_static);
                if field_is_static != is_static {
                    LockResolution::WrongKind { name: name.to_string(), field_is_static }
                } else if auto_make {
                    LockResolution::ImplicitDefault { name: name.to_string(), created: false }
                } else {
                    LockResolution::ExplicitExisting(name.to_string())
                }
            }
        };

        if report_errors {
            if let Some(err) = resolution.error() {
                node.report(&err);
            }
        }
        Ok(resolution)
    }
}

/// `private [static] final java.lang.Object <name> = new java.lang.Object[0];`
///
/// The lock has to be serializable along with its owner, hence an empty
/// array instead of a plain `Object`.
fn lock_field(maker: &NodeMaker, name: &str, is_static: bool) -> crate::ast::FieldDecl {
    let mut modifiers = vec![Modifier::Private];
    if is_static {
        modifiers.push(Modifier::Static);
    }
    modifiers.push(Modifier::Final);

    let init = maker.new_array(maker.type_ref(JAVA_LANG_OBJECT, 0), vec![maker.int_literal(0)]);
    maker.field(name, modifiers, maker.type_ref(JAVA_LANG_OBJECT, 0), Some(init))
}

/// Wrap the statements of `method` in `synchronized (<lock>) { ... }`.
///
/// The statements are moved, not cloned. The new block and the critical
/// section both claim the original body's span. Returns `false` and leaves
/// the method alone when there is nothing to wrap.
pub fn rewrite(method: &mut MethodDecl, lock_name: &str, is_static: bool, type_name: &str, maker: &NodeMaker) -> bool {
    let Some(body) = method.body.as_mut() else {
        return false;
    };
    if body.statements.is_empty() {
        return false;
    }

    let statements = std::mem::take(&mut body.statements);
    let block = maker.block_covering(body.span, statements);

    let lock = if is_static {
        maker.qualified_name([type_name, lock_name])
    } else {
        maker.field_access(maker.this_ref(), lock_name)
    };

    body.statements = vec![maker.synchronized_covering(body.span, lock, block)];
    true
}

impl AnnotationHandler for HandleSynchronized {
    fn annotation_name(&self) -> &str {
        SYNCHRONIZED_ANNOTATION
    }

    fn priority(&self) -> i32 {
        SYNCHRONIZED_PRIORITY
    }

    fn pre_handle(&self, values: &AnnotationValues, node: &mut AnnotationNode<'_>) -> Result<()> {
        let Ok(is_static) = self.validate_target(node) else {
            return Ok(());
        };
        let Ok(requested) = values.string_or_default("value", "") else {
            return Ok(());
        };
        self.resolve_lock(&requested, is_static, node, false)?;
        Ok(())
    }

    fn handle(&self, values: &AnnotationValues, node: &mut AnnotationNode<'_>) -> Result<HandleOutcome> {
        let flagged = HandlerError::FlaggedUsage(SYNCHRONIZED_ANNOTATION.to_string());
        match node.config().synchronized_flag_usage {
            Some(FlagUsage::Warning) => node.add_warning(flagged.to_string()),
            Some(FlagUsage::Error) => node.report(&flagged),
            None => {}
        }

        let is_static = match self.validate_target(node) {
            Ok(is_static) => is_static,
            Err(err) => {
                node.report(&err);
                return Ok(HandleOutcome::Rejected);
            }
        };
        let requested = match values.string_or_default("value", "") {
            Ok(requested) => requested,
            Err(err) => {
                node.report(&err);
                return Ok(HandleOutcome::Rejected);
            }
        };

        let resolution = self.resolve_lock(&requested, is_static, node, true)?;
        let Some(lock_name) = resolution.lock_name().map(str::to_owned) else {
            return Ok(HandleOutcome::Rejected);
        };

        let maker = NodeMaker::new(node.annotation()?);
        let type_name = node
            .enclosing_type()
            .map(|t| t.name.clone())
            .ok_or_else(|| Error::stale_node("enclosing type of @Synchronized"))?;
        let method = node
            .method_mut()
            .ok_or_else(|| Error::stale_node("method annotated with @Synchronized"))?;

        if !rewrite(method, &lock_name, is_static, &type_name, &maker) {
            log::debug!("@Synchronized on {}: empty body, nothing to wrap", method.name);
            return Ok(HandleOutcome::Unchanged);
        }
        log::debug!("@Synchronized on {}: wrapped body in lock {}", method.name, lock_name);

        node.rebuild();
        Ok(HandleOutcome::Rewritten)
    }
}
