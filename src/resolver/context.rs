use std::sync::Arc;

use crate::schema::types::{ComponentDef, Schema, SchemaError};

/// One entity consumed while walking relationship segments, oldest first.
#[derive(Debug, Clone)]
pub struct ParentEntity {
    pub schema: Arc<Schema>,
    pub name: String,
    pub id: String,
}

/// How the resolved action was selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Create,
    Update,
    Custom,
}

/// The action a resolved path maps to. The `need_fetch` flag is the sole
/// input to the coordinator's fetch-skip decision: `create` edits a record
/// that does not exist remotely yet, everything else hydrates one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAction {
    pub name: String,
    pub kind: ActionKind,
    pub need_fetch: bool,
}

impl ResolvedAction {
    pub(crate) fn create() -> Self {
        Self {
            name: "create".to_string(),
            kind: ActionKind::Create,
            need_fetch: false,
        }
    }

    pub(crate) fn update() -> Self {
        Self {
            name: "update".to_string(),
            kind: ActionKind::Update,
            need_fetch: true,
        }
    }

    pub(crate) fn custom(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: ActionKind::Custom,
            need_fetch: true,
        }
    }
}

/// Transient resolution state for one dotted path.
///
/// A fresh context is created per resolution and never shared or pooled.
/// Steps consume it by value and hand back a new one; once every step has
/// run it is treated as immutable. `path` always holds the dot-joined
/// consumed prefix in resolution order, `remaining` the unresolved suffix.
#[derive(Debug, Clone, Default)]
pub struct PathContext {
    pub path: String,
    pub remaining: String,
    pub name: String,
    pub schema: Option<Arc<Schema>>,
    pub parents: Vec<ParentEntity>,
    pub id: String,
    pub action: Option<ResolvedAction>,
    pub component: Option<ComponentDef>,
    pub endpoint: String,
}

impl PathContext {
    pub fn new(path: &str) -> Self {
        Self {
            remaining: path.to_string(),
            ..Self::default()
        }
    }

    /// First unconsumed dot-segment, if any remain.
    pub(crate) fn next_segment(&self) -> Option<&str> {
        if self.remaining.is_empty() {
            return None;
        }
        self.remaining.split('.').next()
    }

    /// Consumes `segment`: appends it to the resolved prefix and strips it,
    /// plus a following separator, from the unresolved remainder. Callers
    /// only ever pass the current first segment of `remaining`.
    pub(crate) fn consume(&mut self, segment: &str) {
        if self.path.is_empty() {
            self.path.push_str(segment);
        } else {
            self.path.push('.');
            self.path.push_str(segment);
        }
        let rest = &self.remaining[segment.len().min(self.remaining.len())..];
        self.remaining = rest.strip_prefix('.').unwrap_or(rest).to_string();
    }

    /// Deduplication key for the resource this descriptor names.
    pub fn alias(&self) -> &str {
        &self.path
    }

    /// True once every resolution step has populated the descriptor.
    /// Orchestration returns partial contexts on failure, so rendering code
    /// must check this before use.
    pub fn is_complete(&self) -> bool {
        self.schema.is_some()
            && self.action.is_some()
            && self.component.is_some()
            && !self.endpoint.is_empty()
    }
}

/// A failed resolution step: the partial context plus the failure, so the
/// orchestrator can log and still hand back what was resolved.
#[derive(Debug)]
pub struct Halt {
    pub context: PathContext,
    pub error: SchemaError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consume_moves_segment_between_halves() {
        let mut ctx = PathContext::new("vehicles.5.owner");
        ctx.consume("vehicles");
        assert_eq!(ctx.path, "vehicles");
        assert_eq!(ctx.remaining, "5.owner");
        ctx.consume("5");
        ctx.consume("owner");
        assert_eq!(ctx.path, "vehicles.5.owner");
        assert_eq!(ctx.remaining, "");
    }

    #[test]
    fn test_next_segment_on_exhausted_context() {
        let mut ctx = PathContext::new("vehicles");
        assert_eq!(ctx.next_segment(), Some("vehicles"));
        ctx.consume("vehicles");
        assert_eq!(ctx.next_segment(), None);
    }

    #[test]
    fn test_fresh_context_is_incomplete() {
        assert!(!PathContext::new("vehicles.5").is_complete());
    }
}
