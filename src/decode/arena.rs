//! Index-addressed node storage used while a sheet is being decoded
//!
//! Navigation frames hold [`NodeId`]s instead of references so the tree can be
//! mutated through the arena while the stack points into it.

use crate::tree::{Node, Scalar};
use indexmap::IndexMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    Scalar(Scalar),
    Object(IndexMap<String, NodeId>),
    Array(Vec<NodeId>),
}

impl Slot {
    pub fn kind(&self) -> &'static str {
        match self {
            Slot::Scalar(_) => "scalar",
            Slot::Object(_) => "object",
            Slot::Array(_) => "array",
        }
    }
}

#[derive(Debug, Default)]
pub struct Arena {
    slots: Vec<Slot>,
}

impl Arena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, slot: Slot) -> NodeId {
        self.slots.push(slot);
        NodeId(self.slots.len() - 1)
    }

    pub fn new_object(&mut self) -> NodeId {
        self.alloc(Slot::Object(IndexMap::new()))
    }

    pub fn new_array(&mut self) -> NodeId {
        self.alloc(Slot::Array(Vec::new()))
    }

    pub fn get(&self, id: NodeId) -> &Slot {
        &self.slots[id.0]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Slot {
        &mut self.slots[id.0]
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_object(&self, id: NodeId) -> bool {
        matches!(self.get(id), Slot::Object(_))
    }

    /// Child of an object slot by field name
    pub fn field(&self, id: NodeId, name: &str) -> Option<NodeId> {
        match self.get(id) {
            Slot::Object(map) => map.get(name).copied(),
            _ => None,
        }
    }

    /// Most recently appended element of an array slot
    pub fn last_element(&self, id: NodeId) -> Option<NodeId> {
        match self.get(id) {
            Slot::Array(items) => items.last().copied(),
            _ => None,
        }
    }

    /// Append a fresh object to an array slot and return it
    pub fn push_object(&mut self, array: NodeId) -> Option<NodeId> {
        if !matches!(self.get(array), Slot::Array(_)) {
            return None;
        }
        let item = self.new_object();
        if let Slot::Array(items) = self.get_mut(array) {
            items.push(item);
        }
        Some(item)
    }

    /// Copy the subtree rooted at `id` out of the arena
    pub fn to_node(&self, id: NodeId) -> Node {
        match self.get(id) {
            Slot::Scalar(scalar) => Node::Scalar(scalar.clone()),
            Slot::Object(map) => Node::Object(
                map.iter()
                    .map(|(key, child)| (key.clone(), self.to_node(*child)))
                    .collect(),
            ),
            Slot::Array(items) => {
                Node::Array(items.iter().map(|item| self.to_node(*item)).collect())
            }
        }
    }
}
