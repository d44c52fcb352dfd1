//! Game variable store.
//!
//! Scripts write integer variables addressed by 1-based ids; a picture
//! animation linked to a variable reads it every frame through the
//! [`VariableSource`] trait. Reading an undeclared id yields 0.

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

/// 1-based game variable id.
pub type VariableId = usize;

/// Read access to integer game variables.
pub trait VariableSource {
    /// Current value of variable `id`, 0 when it does not exist.
    fn value(&self, id: VariableId) -> i64;
}

/// Integer variables declared by the game, 1-based.
#[derive(Debug, Clone, Resource, Serialize, Deserialize)]
pub struct GameVariables {
    values: Vec<i64>,
}

impl Default for GameVariables {
    fn default() -> Self {
        Self::new(0)
    }
}

impl GameVariables {
    /// Create a store with `declared` variables, all set to 0.
    pub fn new(declared: usize) -> Self {
        Self {
            values: vec![0; declared],
        }
    }
    /// Number of declared variables; valid ids are `1..=declared()`.
    pub fn declared(&self) -> usize {
        self.values.len()
    }
    /// All values in id order, starting at id 1.
    pub fn values(&self) -> &[i64] {
        &self.values
    }
    /// Write a variable. Returns false if `id` is not declared.
    pub fn set(&mut self, id: VariableId, value: i64) -> bool {
        match id.checked_sub(1).and_then(|i| self.values.get_mut(i)) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }
}

impl VariableSource for GameVariables {
    fn value(&self, id: VariableId) -> i64 {
        id.checked_sub(1)
            .and_then(|i| self.values.get(i))
            .copied()
            .unwrap_or(0)
    }
}
