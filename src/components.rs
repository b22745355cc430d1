//! Boundary to the host's component namespace.

use std::collections::BTreeMap;

use crate::schema::types::ComponentDef;

/// Host component namespace. The installer registers definitions here; the
/// core only resolves which definition applies and never renders.
pub trait ComponentHost {
    fn component(&mut self, name: &str, definition: ComponentDef);
}

/// In-memory component namespace, usable directly by hosts without one.
#[derive(Debug, Default, Clone)]
pub struct ComponentRegistry {
    components: BTreeMap<String, ComponentDef>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&ComponentDef> {
        self.components.get(name)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl ComponentHost for ComponentRegistry {
    fn component(&mut self, name: &str, definition: ComponentDef) {
        self.components.insert(name.to_string(), definition);
    }
}
