//! Path resolution: walks a dotted route path against the schema registry
//! and produces a render descriptor.
//!
//! Resolution proceeds through a fixed step sequence (base, record, action,
//! endpoint, component), each step a pure function over the context. The
//! orchestrator catches a failed step, logs it through the user-facing
//! channel, and returns the partial context; rendering code must check
//! `PathContext::is_complete` before use. The endpoint derivation runs
//! before the component lookup so partial descriptors still carry it.

mod context;
mod steps;

pub use context::{ActionKind, Halt, ParentEntity, PathContext, ResolvedAction};
pub use steps::{set_action, set_base, set_component, set_endpoint, set_record, StepResult};

use crate::plugin::Mantra;
use crate::report;

/// Suffix appended to the action lookup path to reach the component
/// definition inside the schemas store module.
const COMPONENT_CONTEXT: &[&str] = &["component"];

/// Resolves `path` with the default component context.
pub fn resolve(mantra: &Mantra, path: &str) -> PathContext {
    resolve_with_context(mantra, path, COMPONENT_CONTEXT)
}

/// Runs the full resolution pipeline with a caller-supplied component
/// context suffix. On a failed step the error is reported and the partial
/// context is returned as-is.
pub fn resolve_with_context(mantra: &Mantra, path: &str, component_context: &[&str]) -> PathContext {
    let outcome = set_base(mantra, PathContext::new(path))
        .and_then(|ctx| set_record(mantra, ctx))
        .and_then(set_action)
        .and_then(set_endpoint)
        .and_then(|ctx| set_component(mantra, ctx, component_context));

    match outcome {
        Ok(ctx) => ctx,
        Err(halt) => {
            report::error(&halt.error.to_string());
            halt.context
        }
    }
}
