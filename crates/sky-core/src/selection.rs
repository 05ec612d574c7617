//! Current selection.

use serde::{Deserialize, Serialize};

use crate::subsystem::ObjectRef;

/// Selected object and, independently, selected constellation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectionState {
    pub object: Option<ObjectRef>,
    pub constellation: Option<String>,
}

impl SelectionState {
    pub fn is_empty(&self) -> bool {
        self.object.is_none() && self.constellation.is_none()
    }

    /// Replaces the selected object. Returns true if it changed.
    pub fn select(&mut self, object: Option<ObjectRef>) -> bool {
        if self.object == object {
            return false;
        }
        self.object = object;
        true
    }

    pub fn select_constellation(&mut self, constellation: Option<String>) {
        self.constellation = constellation;
    }

    pub fn clear(&mut self) {
        self.object = None;
        self.constellation = None;
    }
}
