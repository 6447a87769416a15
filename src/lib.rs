//! Synchronized Method Transform (tolc-synchronized)
//!
//! Compile-time rewriting of Java methods annotated with `@Synchronized`.
//! Each such method gets its body wrapped in a `synchronized` block that
//! locks a private field instead of `this` or the class object.
//!
//! ## Architecture
//!
//! - **ast**: the Java syntax tree the handlers work on, plus a printer and visitor
//! - **handlers**: the two-pass handler protocol, the pipeline that drives it,
//!   and the `@Synchronized` handler itself
//! - **config**: `lombok.config`-style settings and environment overrides
//! - **diagnostics**: errors and warnings reported against annotations
//!
//! ## Processing Flow
//!
//! ```text
//! CompilationUnit → discover annotations → pre_handle (all) → handle (by priority) → rewritten unit
//!                                              ↓                      ↓
//!                                      inject lock field      validate, report, wrap body
//! ```

pub mod ast;
pub mod config;
pub mod consts;
pub mod diagnostics;
pub mod error;
pub mod handlers;

pub use ast::CompilationUnit;
pub use config::{Config, FlagUsage};
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use error::{Error, Result};
pub use handlers::{HandleSynchronized, HandlerPipeline, ProcessReport};

/// Run every built-in handler over `unit` in place.
///
/// Problems with the annotated source are returned as diagnostics in the
/// report; the unit is still rewritten wherever it could be.
pub fn process(unit: &mut CompilationUnit, config: &Config) -> Result<ProcessReport> {
    log::debug!("processing compilation unit with {} type(s)", unit.type_decls.len());
    let report = HandlerPipeline::with_default_handlers(config.clone()).process(unit)?;
    if report.has_errors() {
        log::debug!("{} diagnostic(s) reported", report.diagnostics.len());
    }
    Ok(report)
}
