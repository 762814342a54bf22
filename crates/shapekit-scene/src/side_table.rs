//! Identity-keyed auxiliary storage.
//!
//! Handler lists, drag markers and key-binding tables hang off a shape or
//! a surface by handle, so neither carries them in its public fields.

use std::collections::HashMap;
use std::fmt;

use crate::event::{EventType, Handler, HandlerList, KeyPhase};
use crate::input::SurfaceId;
use crate::key_router::KeyBindingTable;
use crate::model::ShapeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Owner {
    Shape(ShapeId),
    Surface(SurfaceId),
}

impl From<ShapeId> for Owner {
    fn from(id: ShapeId) -> Self {
        Owner::Shape(id)
    }
}

impl From<SurfaceId> for Owner {
    fn from(id: SurfaceId) -> Self {
        Owner::Surface(id)
    }
}

/// Everything stored for one owner.
#[derive(Default)]
pub struct Bag {
    handlers: HashMap<EventType, HandlerList>,
    drag_marked: bool,
    key_tables: HashMap<KeyPhase, KeyBindingTable>,
}

impl Bag {
    pub fn handlers(&self, event_type: EventType) -> Option<&HandlerList> {
        self.handlers.get(&event_type)
    }

    pub fn add_handler(&mut self, event_type: EventType, handler: Handler) {
        self.handlers.entry(event_type).or_default().push(handler);
    }

    pub fn is_drag_marked(&self) -> bool {
        self.drag_marked
    }

    pub fn set_drag_marked(&mut self, marked: bool) {
        self.drag_marked = marked;
    }

    pub fn key_table(&self, phase: KeyPhase) -> Option<&KeyBindingTable> {
        self.key_tables.get(&phase)
    }

    pub fn key_table_mut(&mut self, phase: KeyPhase) -> &mut KeyBindingTable {
        self.key_tables.entry(phase).or_default()
    }
}

impl fmt::Debug for Bag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let handlers: HashMap<&str, usize> = self
            .handlers
            .iter()
            .map(|(t, list)| (t.as_str(), list.len()))
            .collect();
        f.debug_struct("Bag")
            .field("handlers", &handlers)
            .field("drag_marked", &self.drag_marked)
            .field("key_tables", &self.key_tables)
            .finish()
    }
}

#[derive(Debug, Default)]
pub struct SideTable {
    bags: HashMap<Owner, Bag>,
}

impl SideTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, owner: impl Into<Owner>) -> Option<&Bag> {
        self.bags.get(&owner.into())
    }

    /// The owner's bag, created on first access.
    pub fn bag_mut(&mut self, owner: impl Into<Owner>) -> &mut Bag {
        self.bags.entry(owner.into()).or_default()
    }

    /// Cloned handler list, empty when nothing is bound.
    pub fn handlers(&self, owner: impl Into<Owner>, event_type: EventType) -> HandlerList {
        self.get(owner)
            .and_then(|bag| bag.handlers(event_type))
            .cloned()
            .unwrap_or_default()
    }

    pub fn release(&mut self, owner: impl Into<Owner>) -> Option<Bag> {
        self.bags.remove(&owner.into())
    }

    pub fn contains(&self, owner: impl Into<Owner>) -> bool {
        self.bags.contains_key(&owner.into())
    }

    pub fn len(&self) -> usize {
        self.bags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bags.is_empty()
    }
}
