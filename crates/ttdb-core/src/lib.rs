use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_EDGE_KIND: &str = "relates";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(pub String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Edge {
    pub kind: String,
    pub target: RecordId,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
    pub depth: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record {
    pub id: RecordId,
    pub header: String,
    pub title: Option<String>,
    pub body: String,
    pub edges: Vec<Edge>,
}

impl Record {
    pub fn label(&self) -> &str {
        self.title.as_deref().unwrap_or(self.id.as_str())
    }
}

pub type SpecialConfig = HashMap<String, String>;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Database {
    pub records: HashMap<RecordId, Record>,
    pub order: Vec<RecordId>,
    pub coords: HashMap<RecordId, Coordinate>,
    pub specials: HashMap<String, SpecialConfig>,
    pub cursor_selected: Option<RecordId>,
}

impl Database {
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.records.contains_key(id)
    }

    pub fn get(&self, id: &RecordId) -> Option<&Record> {
        self.records.get(id)
    }

    pub fn first_id(&self) -> Option<&RecordId> {
        self.order.first()
    }

    pub fn index_of(&self, id: &RecordId) -> Option<usize> {
        self.order.iter().position(|other| other == id)
    }

    pub fn special(&self, kind: &str) -> Option<&SpecialConfig> {
        self.specials.get(kind)
    }
}
