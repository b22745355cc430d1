//! Boundary to the host's reactive store tree.
//!
//! The core treats the store as an opaque key-value tree with dotted-path
//! existence checks and lookups. The installer writes the schema registry
//! into a fixed `schemas` module here, and component resolution reads schema
//! nodes back through path lookups.

use serde_json::{Map, Value};

/// A key-value tree with dotted-path `has`/`get`/`set` semantics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateTree {
    root: Value,
}

impl StateTree {
    pub fn new() -> Self {
        Self {
            root: Value::Object(Map::new()),
        }
    }

    /// True if a value exists at `path`.
    pub fn has(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Walks `path` segment by segment through nested objects.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut node = &self.root;
        for segment in path.split('.') {
            node = node.as_object()?.get(segment)?;
        }
        Some(node)
    }

    /// Writes `value` at `path`, creating intermediate objects as needed.
    /// Non-object intermediates are replaced.
    pub fn set(&mut self, path: &str, value: Value) {
        let mut segments = path.split('.').peekable();
        let mut node = &mut self.root;
        while let Some(segment) = segments.next() {
            let map = ensure_object(node);
            if segments.peek().is_none() {
                map.insert(segment.to_string(), value);
                return;
            }
            node = map
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
        }
    }

    /// Registers a named module. Only its `state` is retained in the tree;
    /// the host-side maps are opaque to this core.
    pub fn register_module(&mut self, name: &str, module: StoreModule) {
        self.set(name, module.state);
    }
}

/// Shape of a store module registration. `getters`, `mutations`, and
/// `actions` belong to the host store and are never interpreted here.
#[derive(Debug, Clone, Default)]
pub struct StoreModule {
    pub state: Value,
    pub getters: Map<String, Value>,
    pub mutations: Map<String, Value>,
    pub actions: Map<String, Value>,
}

impl StoreModule {
    pub fn with_state(state: Value) -> Self {
        Self {
            state,
            ..Self::default()
        }
    }
}

fn ensure_object(node: &mut Value) -> &mut Map<String, Value> {
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    match node {
        Value::Object(map) => map,
        _ => unreachable!(),
    }
}
