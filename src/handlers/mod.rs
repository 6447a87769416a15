//! Annotation handlers
//!
//! A handler is attached to one annotation type and is driven in two passes
//! over a compilation unit:
//!
//! 1. `pre_handle` runs for every annotation before any `handle`. It may only
//!    make idempotent preparatory changes (such as making sure a supporting
//!    field exists) and must not report diagnostics.
//! 2. `handle` runs once per annotation, in ascending handler priority. It
//!    validates, reports problems through the annotation node, and performs
//!    the rewrite.
//!
//! [`pipeline::HandlerPipeline`] enforces both the pass order and the
//! one-`handle`-per-annotation rule.

mod node;
mod scope;
pub mod pipeline;
pub mod synchronized;
pub mod util;

pub use node::{AnnotatedElement, AnnotationNode, AnnotationPath, NodeKind};
pub use pipeline::{AnnotationRecord, HandlerPipeline, HandlerState, ProcessReport};
pub use scope::{LocalVar, ScopeIndex};
pub use synchronized::{HandleSynchronized, LockResolution};

use crate::ast::{Annotation, AnnotationArg, Expr, Literal};
use crate::error::Result;

/// User-facing problems found by handlers. The `Display` text is the
/// diagnostic message reported at the annotation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum HandlerError {
    #[error("@{annotation} is legal only on {legal_on}.")]
    InvalidTarget { annotation: String, legal_on: &'static str },
    #[error("The field {0} does not exist.")]
    MissingExplicitLock(String),
    #[error("The field {0} is non-static and thus cannot be used on this static method")]
    InstanceLockInStaticMethod(String),
    #[error("The field {0} is static and thus cannot guard an instance method")]
    StaticLockInInstanceMethod(String),
    #[error("@{annotation}: '{element}' must be a string constant")]
    BadAnnotationValue { annotation: String, element: String },
    #[error("Use of @{0} is flagged according to configuration.")]
    FlaggedUsage(String),
}

/// Result of the authoritative `handle` call for one annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleOutcome {
    /// The tree was rewritten
    Rewritten,
    /// Valid target with nothing to rewrite (e.g. an empty body)
    Unchanged,
    /// A diagnostic was reported and the tree was left alone
    Rejected,
}

/// Element values of one annotation occurrence, detached from the tree so a
/// handler can read them while it mutates the tree.
#[derive(Debug, Clone)]
pub struct AnnotationValues {
    annotation: String,
    elements: Vec<(String, Expr)>,
}

impl AnnotationValues {
    pub fn from_annotation(annotation: &Annotation) -> Self {
        let elements = annotation
            .arguments
            .iter()
            .map(|arg| match arg {
                AnnotationArg::Value(expr) => ("value".to_string(), expr.clone()),
                AnnotationArg::Named(name, expr) => (name.clone(), expr.clone()),
            })
            .collect();
        Self { annotation: annotation.simple_name().to_string(), elements }
    }

    pub fn annotation_name(&self) -> &str {
        &self.annotation
    }

    /// Whether the element was written out in source
    pub fn is_explicit(&self, element: &str) -> bool {
        self.elements.iter().any(|(name, _)| name == element)
    }

    /// Read a string element; `Ok(None)` when the element is not present
    pub fn string(&self, element: &str) -> std::result::Result<Option<String>, HandlerError> {
        let Some((_, expr)) = self.elements.iter().find(|(name, _)| name == element) else {
            return Ok(None);
        };
        match expr {
            Expr::Literal(lit) => match &lit.value {
                Literal::String(s) => Ok(Some(s.clone())),
                _ => Err(self.bad_value(element)),
            },
            _ => Err(self.bad_value(element)),
        }
    }

    pub fn string_or_default(&self, element: &str, default: &str) -> std::result::Result<String, HandlerError> {
        Ok(self.string(element)?.unwrap_or_else(|| default.to_string()))
    }

    fn bad_value(&self, element: &str) -> HandlerError {
        HandlerError::BadAnnotationValue {
            annotation: self.annotation.clone(),
            element: element.to_string(),
        }
    }
}

/// A handler for one annotation type
pub trait AnnotationHandler {
    /// Simple name of the annotation this handler is attached to
    fn annotation_name(&self) -> &str;

    /// Lower runs first within each pass
    fn priority(&self) -> i32 {
        0
    }

    /// Speculative pass: idempotent preparation only, no diagnostics
    fn pre_handle(&self, _values: &AnnotationValues, _node: &mut AnnotationNode<'_>) -> Result<()> {
        Ok(())
    }

    /// Authoritative pass: validate, report, rewrite
    fn handle(&self, values: &AnnotationValues, node: &mut AnnotationNode<'_>) -> Result<HandleOutcome>;
}
