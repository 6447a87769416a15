//! Drives registered handlers over a compilation unit.
//!
//! Every annotation with a matching handler gets exactly one `pre_handle`
//! and one `handle` call. All `pre_handle` calls happen before the first
//! `handle`, and within each pass annotations are visited in ascending
//! handler priority, tree order breaking ties.

use super::{AnnotationHandler, AnnotationNode, AnnotationPath, AnnotationValues, HandleOutcome, HandleSynchronized, ScopeIndex};
use crate::ast::{CompilationUnit, Span};
use crate::config::Config;
use crate::diagnostics::Diagnostics;
use crate::error::{Error, Result};
use std::collections::HashMap;

/// Progress of one annotation through the passes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerState {
    Unvisited,
    Prepared,
    Done(HandleOutcome),
}

/// One annotation occurrence claimed by a handler
#[derive(Debug, Clone)]
pub struct AnnotationRecord {
    pub annotation: String,
    pub span: Span,
    pub state: HandlerState,
    /// Tree-order rank among annotations with the same name and span
    occurrence: usize,
    handler: usize,
    values: AnnotationValues,
}

impl AnnotationRecord {
    fn locate(&self, unit: &CompilationUnit) -> Result<AnnotationPath> {
        AnnotationPath::locate_nth(unit, &self.annotation, self.span, self.occurrence)
            .ok_or_else(|| Error::stale_node(format!("@{} at {}", self.annotation, self.span)))
    }
}

/// What a pipeline run did to a unit
#[derive(Debug)]
pub struct ProcessReport {
    pub diagnostics: Diagnostics,
    /// Records in the order they were handled
    pub records: Vec<AnnotationRecord>,
    pub scopes: ScopeIndex,
}

impl ProcessReport {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }

    /// Outcome of the annotation whose span is `span`
    pub fn outcome_at(&self, span: Span) -> Option<HandleOutcome> {
        self.records.iter().find(|r| r.span == span).and_then(|r| match r.state {
            HandlerState::Done(outcome) => Some(outcome),
            _ => None,
        })
    }

    pub fn count(&self, outcome: HandleOutcome) -> usize {
        self.records
            .iter()
            .filter(|r| r.state == HandlerState::Done(outcome))
            .count()
    }
}

pub struct HandlerPipeline {
    handlers: Vec<Box<dyn AnnotationHandler>>,
    config: Config,
}

impl HandlerPipeline {
    /// A pipeline with no handlers
    pub fn new(config: Config) -> Self {
        Self { handlers: Vec::new(), config }
    }

    /// A pipeline with every handler this crate provides
    pub fn with_default_handlers(config: Config) -> Self {
        let mut pipeline = Self::new(config);
        pipeline.register(HandleSynchronized::new());
        pipeline
    }

    pub fn register<H: AnnotationHandler + 'static>(&mut self, handler: H) -> &mut Self {
        log::trace!("registering handler for @{} (priority {})", handler.annotation_name(), handler.priority());
        self.handlers.push(Box::new(handler));
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run both passes over `unit`.
    ///
    /// Mistakes in the source end up in the report's diagnostics. An `Err`
    /// means the machinery itself broke, e.g. a handler removed an
    /// annotation another one still had to visit.
    pub fn process(&self, unit: &mut CompilationUnit) -> Result<ProcessReport> {
        let mut records = self.discover(unit);
        records.sort_by_key(|r| self.handlers[r.handler].priority());
        log::debug!("{} annotation(s) claimed by {} handler(s)", records.len(), self.handlers.len());

        let mut scopes = ScopeIndex::build(unit);

        // Anything reported here is speculative and gets dropped
        let mut scratch = Diagnostics::new();
        for record in records.iter_mut() {
            let path = record.locate(unit)?;
            let handler = &self.handlers[record.handler];
            let mut node = AnnotationNode::new(unit, path, &self.config, &mut scratch, &mut scopes);
            handler.pre_handle(&record.values, &mut node)?;
            record.state = HandlerState::Prepared;
        }
        if !scratch.is_empty() {
            log::warn!("discarding {} diagnostic(s) reported during pre_handle", scratch.len());
        }

        let mut diagnostics = Diagnostics::new();
        for record in records.iter_mut() {
            if let HandlerState::Done(_) = record.state {
                continue;
            }
            let path = record.locate(unit)?;
            let handler = &self.handlers[record.handler];
            let mut node = AnnotationNode::new(unit, path, &self.config, &mut diagnostics, &mut scopes);
            let outcome = handler.handle(&record.values, &mut node)?;
            log::debug!("@{} at {}: {:?}", record.annotation, record.span, outcome);
            record.state = HandlerState::Done(outcome);
        }

        Ok(ProcessReport { diagnostics, records, scopes })
    }

    /// Pair every annotation in tree order with the first handler registered for its name
    fn discover(&self, unit: &CompilationUnit) -> Vec<AnnotationRecord> {
        let mut seen: HashMap<(&str, Span), usize> = HashMap::new();
        AnnotationPath::collect(unit)
            .iter()
            .filter_map(|path| path.resolve(unit))
            .filter_map(|annotation| {
                let count = seen.entry((annotation.name.as_str(), annotation.span)).or_insert(0);
                let occurrence = *count;
                *count += 1;
                let name = annotation.simple_name();
                let Some(handler) = self.handlers.iter().position(|h| h.annotation_name() == name) else {
                    log::trace!("no handler for @{}", name);
                    return None;
                };
                Some(AnnotationRecord {
                    annotation: annotation.name.clone(),
                    span: annotation.span,
                    state: HandlerState::Unvisited,
                    occurrence,
                    handler,
                    values: AnnotationValues::from_annotation(annotation),
                })
            })
            .collect()
    }
}
