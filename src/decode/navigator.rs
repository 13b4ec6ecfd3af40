//! Navigation stack for the grid → tree decoder
//!
//! Each frame pairs a position key with the arena node it denotes. Moving the
//! stack toward a cell's target is expressed as a transition function:
//! [`Navigator::next_move`] inspects the stack and picks one [`Move`],
//! [`Navigator::apply`] performs it. A move either pops, descends by one step,
//! opens a new element in the nearest repeating group, or reports arrival.

use super::arena::{Arena, NodeId, Slot};
use crate::error::{TranscodeError, TranscodeResult};
use crate::path::{Path, Segment};
use std::fmt;
use tracing::debug;

/// One step of a navigation key. `Item` stands for "the current element" of
/// the array named by the preceding step.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Step {
    Field(String),
    Array(String),
    Item,
}

impl Step {
    fn name(&self) -> Option<&str> {
        match self {
            Step::Field(name) | Step::Array(name) => Some(name),
            Step::Item => None,
        }
    }
}

/// Navigation key derived from a header path
pub type Key = Vec<Step>;

/// Expand a header path into a navigation key, inserting `Item` after every
/// array segment that has further segments.
pub fn expand(path: &Path) -> Key {
    let segments = path.segments();
    let mut key = Vec::with_capacity(segments.len() * 2);
    for (idx, segment) in segments.iter().enumerate() {
        match segment {
            Segment::Field(name) => key.push(Step::Field(name.clone())),
            Segment::ArrayField(name) => {
                key.push(Step::Array(name.clone()));
                if idx + 1 < segments.len() {
                    key.push(Step::Item);
                }
            }
        }
    }
    key
}

/// Frame the cell's value is written into: the array itself for a trailing
/// array path, otherwise the key minus its last step.
pub fn target_parent(key: &[Step]) -> Key {
    match key.last() {
        Some(Step::Array(_)) => key.to_vec(),
        Some(_) => key[..key.len() - 1].to_vec(),
        None => Vec::new(),
    }
}

fn is_prefix(prefix: &[Step], key: &[Step]) -> bool {
    key.starts_with(prefix)
}

pub(crate) fn display_key(key: &[Step]) -> String {
    key.iter()
        .map(|step| match step {
            Step::Field(name) => name.clone(),
            Step::Array(name) => format!("{}[]", name),
            Step::Item => "<item>".to_string(),
        })
        .collect::<Vec<_>>()
        .join(".")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub key: Key,
    pub node: NodeId,
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", display_key(&self.key))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Move {
    /// Top frame is the target
    Arrived,
    /// Top frame is off the target's branch
    Pop,
    /// Top frame is an ancestor; take the next step of the key
    Descend(Step),
    /// The context object already holds this field: start a new element of
    /// the array frame at this stack index
    NewItem(usize),
}

#[derive(Debug, Default)]
pub struct Navigator {
    stack: Vec<Frame>,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the stack and root it at a fresh record
    pub fn start_record(&mut self, root: NodeId) {
        self.stack.clear();
        self.stack.push(Frame {
            key: Vec::new(),
            node: root,
        });
    }

    pub fn is_open(&self) -> bool {
        !self.stack.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Walk the stack until its top frame is the cell's target parent and
    /// return that frame's node.
    pub fn navigate(&mut self, arena: &mut Arena, key: &[Step]) -> TranscodeResult<NodeId> {
        let target = target_parent(key);
        loop {
            let next = self.next_move(arena, key, &target)?;
            if next == Move::Arrived {
                return self.top_frame(key).map(|frame| frame.node);
            }
            self.apply(arena, key, next)?;
        }
    }

    /// Decide the next transition for `key` without touching the stack
    pub fn next_move(&self, arena: &Arena, key: &[Step], target: &[Step]) -> TranscodeResult<Move> {
        let top = self.top_frame(key)?;

        if self.already_populated(arena, top, key) {
            let index = self
                .stack
                .iter()
                .rposition(|frame| matches!(frame.key.last(), Some(Step::Array(_))))
                .ok_or_else(|| TranscodeError::StructuralConflict {
                    path: display_key(key),
                    expected: "repeating group",
                    found: "populated field",
                })?;
            return Ok(Move::NewItem(index));
        }

        if top.key.as_slice() == target {
            Ok(Move::Arrived)
        } else if is_prefix(&top.key, target) {
            Ok(Move::Descend(key[top.key.len()].clone()))
        } else {
            Ok(Move::Pop)
        }
    }

    /// Perform one transition
    pub fn apply(&mut self, arena: &mut Arena, key: &[Step], next: Move) -> TranscodeResult<()> {
        match next {
            Move::Arrived => {}
            Move::Pop => {
                debug!("backtracking from {}", self.top_frame(key)?);
                self.stack.pop();
            }
            Move::Descend(step) => self.descend(arena, key, step)?,
            Move::NewItem(index) => {
                self.stack.truncate(index + 1);
                let array = &self.stack[index];
                let item = arena
                    .push_object(array.node)
                    .ok_or_else(|| TranscodeError::StructuralConflict {
                        path: display_key(&array.key),
                        expected: "array",
                        found: arena.get(array.node).kind(),
                    })?;
                let mut item_key = array.key.clone();
                item_key.push(Step::Item);
                let frame = Frame {
                    key: item_key,
                    node: item,
                };
                debug!("added array item {}", frame);
                self.stack.push(frame);
            }
        }
        Ok(())
    }

    fn top_frame(&self, key: &[Step]) -> TranscodeResult<&Frame> {
        self.stack
            .last()
            .ok_or_else(|| TranscodeError::StructuralConflict {
                path: display_key(key),
                expected: "open record",
                found: "empty stack",
            })
    }

    /// True when the top frame is an object on the key's branch that already
    /// holds the remaining (array-free) part of the key. That means the row
    /// has wrapped into a new element of an enclosing repeating group.
    fn already_populated(&self, arena: &Arena, top: &Frame, key: &[Step]) -> bool {
        if !arena.is_object(top.node) || !is_prefix(&top.key, key) {
            return false;
        }
        let remaining = &key[top.key.len()..];
        if remaining.is_empty() || remaining.iter().any(|step| !matches!(step, Step::Field(_))) {
            return false;
        }

        let mut node = top.node;
        for step in remaining {
            let Some(name) = step.name() else {
                return false;
            };
            match arena.field(node, name) {
                Some(child) if arena.is_object(child) => node = child,
                Some(_) => return true,
                None => return false,
            }
        }
        false
    }

    /// Create or reuse the child named by `step` under the top frame and push it
    fn descend(&mut self, arena: &mut Arena, key: &[Step], step: Step) -> TranscodeResult<()> {
        let top = self.top_frame(key)?.clone();
        let mut child_key = top.key.clone();
        child_key.push(step.clone());
        let conflict = |expected: &'static str, found: &'static str| {
            TranscodeError::StructuralConflict {
                path: display_key(&child_key),
                expected,
                found,
            }
        };

        let child = match &step {
            Step::Field(name) | Step::Array(name) => {
                if !arena.is_object(top.node) {
                    return Err(conflict("object", arena.get(top.node).kind()));
                }
                let wants_array = matches!(step, Step::Array(_));
                match arena.field(top.node, name) {
                    Some(existing) => {
                        let found = arena.get(existing);
                        let fits = match found {
                            Slot::Array(_) => wants_array,
                            Slot::Object(_) => !wants_array,
                            Slot::Scalar(_) => false,
                        };
                        if !fits {
                            let expected = if wants_array { "array" } else { "object" };
                            return Err(conflict(expected, found.kind()));
                        }
                        existing
                    }
                    None => {
                        let created = if wants_array {
                            arena.new_array()
                        } else {
                            arena.new_object()
                        };
                        insert_field(arena, top.node, name, created);
                        created
                    }
                }
            }
            Step::Item => match arena.get(top.node) {
                Slot::Array(_) => match arena.last_element(top.node) {
                    Some(existing) if arena.is_object(existing) => existing,
                    Some(existing) => return Err(conflict("object", arena.get(existing).kind())),
                    None => arena
                        .push_object(top.node)
                        .ok_or_else(|| conflict("array", "scalar"))?,
                },
                slot => return Err(conflict("array", slot.kind())),
            },
        };

        let frame = Frame {
            key: child_key,
            node: child,
        };
        debug!("navigating to {}", frame);
        self.stack.push(frame);
        Ok(())
    }
}

fn insert_field(arena: &mut Arena, object: NodeId, name: &str, child: NodeId) {
    if let Slot::Object(map) = arena.get_mut(object) {
        map.insert(name.to_string(), child);
    }
}
