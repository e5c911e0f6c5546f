use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use typecanvas_parser::{
    serialize_batch, split_declarations, IdGenerator, Parser, Position, PrimitiveType, Property,
    TypeBoxModel, TypeKind, TypeValue,
};

use crate::graph::SchemaGraph;

/// Optional initial fields for a newly created box; anything absent
/// gets a store default
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoxSeed {
    pub name: Option<String>,
    pub kind: Option<TypeKind>,
    pub properties: Option<Vec<Property>>,
}

/// Field-wise patch applied by [`SchemaStore::update_box`]; absent
/// fields keep their current value. `comment` is doubly optional so a
/// patch can clear it with `Some(None)`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxPatch {
    pub name: Option<String>,
    pub kind: Option<TypeKind>,
    pub properties: Option<Vec<Property>>,
    pub position: Option<Position>,
    pub extends: Option<Vec<String>>,
    pub union_types: Option<Vec<String>>,
    pub intersection_types: Option<Vec<String>>,
    pub comment: Option<Option<String>>,
}

/// In-memory editing state: the graph, the current box selection, and
/// the id generator that owns graph-lifetime id uniqueness.
///
/// Every mutation is synchronous and total: unknown ids are no-ops,
/// and the boxes/order invariant holds after every call.
#[derive(Debug)]
pub struct SchemaStore {
    graph: SchemaGraph,
    selection: Vec<String>,
    ids: IdGenerator,
}

impl SchemaStore {
    pub fn new(label: &str) -> Self {
        Self {
            graph: SchemaGraph::new(),
            selection: Vec::new(),
            ids: IdGenerator::new(label),
        }
    }

    pub fn graph(&self) -> &SchemaGraph {
        &self.graph
    }

    pub fn selection(&self) -> &[String] {
        &self.selection
    }

    pub fn boxes_in_order(&self) -> Vec<&TypeBoxModel> {
        self.graph
            .order
            .iter()
            .filter_map(|id| self.graph.boxes.get(id))
            .collect()
    }

    /// Create a box, filling defaults from the current graph state.
    /// The new box is appended to the render order and becomes the
    /// sole selection.
    pub fn add_box(&mut self, seed: BoxSeed) -> TypeBoxModel {
        let id = self.ids.new_id();
        let name = seed
            .name
            .unwrap_or_else(|| format!("NewType{}", self.graph.order.len() + 1));
        let kind = seed.kind.unwrap_or_default();

        let mut model = TypeBoxModel::new(id.clone(), name, kind);
        model.properties = match seed.properties {
            Some(properties) => properties,
            None => self.seed_properties(),
        };

        self.graph.boxes.insert(id.clone(), model.clone());
        self.graph.order.push(id.clone());
        self.selection = vec![id];
        self.graph.touch();
        tracing::debug!(box_id = %model.id, name = %model.name, "added box");
        model
    }

    fn seed_properties(&mut self) -> Vec<Property> {
        vec![
            Property::new(
                self.ids.new_id(),
                "id",
                TypeValue::primitive(PrimitiveType::String),
            ),
            Property::new(
                self.ids.new_id(),
                "name",
                TypeValue::primitive(PrimitiveType::String),
            ),
        ]
    }

    /// Merge patch fields into an existing box
    pub fn update_box(&mut self, id: &str, patch: BoxPatch) {
        let Some(model) = self.graph.boxes.get_mut(id) else {
            return;
        };
        if let Some(name) = patch.name {
            model.name = name;
        }
        if let Some(kind) = patch.kind {
            model.kind = kind;
        }
        if let Some(properties) = patch.properties {
            model.properties = properties;
        }
        if let Some(position) = patch.position {
            model.position = position;
        }
        if let Some(extends) = patch.extends {
            model.extends = extends;
        }
        if let Some(union_types) = patch.union_types {
            model.union_types = union_types;
        }
        if let Some(intersection_types) = patch.intersection_types {
            model.intersection_types = intersection_types;
        }
        if let Some(comment) = patch.comment {
            model.comment = comment;
        }
        model.touch();
        self.graph.touch();
    }

    /// Move a box on the canvas. Position carries no core semantics.
    pub fn update_position(&mut self, id: &str, x: f64, y: f64) {
        let Some(model) = self.graph.boxes.get_mut(id) else {
            return;
        };
        model.position = Position::new(x, y);
        model.touch();
        self.graph.touch();
    }

    pub fn remove_box(&mut self, id: &str) {
        if self.graph.boxes.remove(id).is_none() {
            return;
        }
        self.graph.order.retain(|existing| existing != id);
        self.selection.retain(|existing| existing != id);
        self.graph.touch();
    }

    pub fn remove_boxes(&mut self, ids: &[String]) {
        let mut changed = false;
        for id in ids {
            changed |= self.graph.boxes.remove(id).is_some();
        }
        if !changed {
            return;
        }
        let SchemaGraph { boxes, order, .. } = &mut self.graph;
        order.retain(|id| boxes.contains_key(id));
        self.selection.retain(|id| self.graph.boxes.contains_key(id));
        self.graph.touch();
    }

    /// Replace the selection with `id`, clear it with `None`, or
    /// toggle membership when `additive`
    pub fn select(&mut self, id: Option<&str>, additive: bool) {
        match id {
            None => self.selection.clear(),
            Some(id) => {
                if !additive {
                    self.selection = vec![id.to_string()];
                } else if let Some(index) =
                    self.selection.iter().position(|existing| existing == id)
                {
                    self.selection.remove(index);
                } else {
                    self.selection.push(id.to_string());
                }
            }
        }
    }

    /// Adopt a parser skeleton under a fresh store-minted id and
    /// append it to the render order. Returns the assigned id.
    pub fn insert_parsed(&mut self, mut skeleton: TypeBoxModel) -> String {
        let id = self.ids.new_id();
        skeleton.id = id.clone();
        self.graph.boxes.insert(id.clone(), skeleton);
        self.graph.order.push(id.clone());
        self.graph.touch();
        id
    }

    /// Parse a pasted declaration buffer and insert every block that
    /// parses. Best effort: failed blocks are skipped and the caller
    /// only learns the created count.
    pub fn import_source(&mut self, source: &str) -> usize {
        let blocks = split_declarations(source).len();
        let mut parser = Parser::new(IdGenerator::new("import"));
        let models = parser.parse_buffer(source);
        let created = models.len();
        for model in models {
            self.insert_parsed(model);
        }
        tracing::debug!(
            created,
            skipped = blocks - created,
            "imported declaration buffer"
        );
        created
    }

    /// Render the whole graph as declaration text, in render order
    pub fn export_source(&self) -> String {
        serialize_batch(self.boxes_in_order())
    }

    /// Map of box name to id, optionally excluding one name. Used to
    /// offer custom-reference choices for a box without listing the
    /// box itself.
    pub fn custom_name_index(&self, exclude: Option<&str>) -> HashMap<String, String> {
        self.graph
            .boxes
            .values()
            .filter(|model| exclude.map_or(true, |name| model.name != name))
            .map(|model| (model.name.clone(), model.id.clone()))
            .collect()
    }

    /// Reverse map of box id to display name
    pub fn id_to_name_index(&self) -> HashMap<String, String> {
        self.graph
            .boxes
            .values()
            .map(|model| (model.id.clone(), model.name.clone()))
            .collect()
    }
}
