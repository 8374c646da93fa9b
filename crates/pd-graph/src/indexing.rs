//! Stable indexing between component IDs and chain positions.

use std::collections::HashMap;

use pd_core::CompId;

use crate::error::{GraphError, GraphResult};

/// Bidirectional lookup between components and their chain positions.
///
/// A component may occupy one position only: a chain that revisits a
/// component is a closed loop and is rejected on construction.
#[derive(Debug, Clone, Default)]
pub struct ChainIndex {
    /// Contiguous list of component IDs (position -> CompId).
    comp_ids: Vec<CompId>,

    /// Reverse lookup: CompId -> position.
    comp_to_pos: HashMap<CompId, usize>,
}

impl ChainIndex {
    /// Build an index from an ordered chain.
    pub fn from_chain(chain: &[CompId]) -> GraphResult<Self> {
        let mut comp_to_pos = HashMap::with_capacity(chain.len());
        for (i, &comp) in chain.iter().enumerate() {
            if let Some(first) = comp_to_pos.insert(comp, i) {
                return Err(GraphError::DuplicateComponent {
                    comp,
                    first,
                    second: i,
                });
            }
        }
        Ok(Self {
            comp_ids: chain.to_vec(),
            comp_to_pos,
        })
    }

    /// Number of chain positions.
    pub fn len(&self) -> usize {
        self.comp_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comp_ids.is_empty()
    }

    /// Chain position of a component.
    pub fn position(&self, comp: CompId) -> Option<usize> {
        self.comp_to_pos.get(&comp).copied()
    }

    /// Component at a chain position.
    pub fn comp_id(&self, position: usize) -> Option<CompId> {
        self.comp_ids.get(position).copied()
    }

    /// All component IDs in chain order.
    pub fn comp_ids(&self) -> &[CompId] {
        &self.comp_ids
    }
}
