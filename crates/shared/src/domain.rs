use serde::{Deserialize, Serialize};

/// Opaque identifier minted by the document store. Never held in UI state;
/// only used for the query-then-delete two-step.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The sole domain entity: a named task with no other attributes.
///
/// No identifier is kept client-side, so two chores with identical names are
/// indistinguishable to the client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chore {
    pub name: String,
}

impl Chore {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
