use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of a drawable element.
///
/// Minted once when the element is constructed and never reused; random v4 ids
/// stay unique across documents, duplicates and reloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(Uuid);

impl ElementId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The first group is enough to tell elements apart in logs.
        let text = self.0.simple().to_string();
        f.write_str(&text[..8])
    }
}

pub fn generate_id() -> ElementId {
    ElementId::generate()
}
