use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use typecanvas_parser::TypeBoxModel;

pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// The whole canvas state: boxes by id plus an explicit render order.
/// `order` and `boxes` always carry the same id set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaGraph {
    pub boxes: HashMap<String, TypeBoxModel>,
    pub order: Vec<String>,
    pub version: u64,
    pub updated_at: i64,
}

impl SchemaGraph {
    pub fn new() -> Self {
        Self {
            boxes: HashMap::new(),
            order: Vec::new(),
            version: 1,
            updated_at: now_millis(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&TypeBoxModel> {
        self.boxes.get(id)
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Check the boxes/order agreement: same cardinality, every
    /// ordered id resolves, no duplicates
    pub fn is_consistent(&self) -> bool {
        if self.order.len() != self.boxes.len() {
            return false;
        }
        let mut seen = HashSet::new();
        self.order
            .iter()
            .all(|id| self.boxes.contains_key(id) && seen.insert(id.as_str()))
    }

    pub(crate) fn touch(&mut self) {
        self.version += 1;
        self.updated_at = now_millis();
    }
}

impl Default for SchemaGraph {
    fn default() -> Self {
        Self::new()
    }
}
