//! Input chain validation.

use pd_core::CompId;
use pd_model::PipingModel;

use crate::error::{GraphError, GraphResult};
use crate::indexing::ChainIndex;

/// Validate an ordered chain before any node is built: it must be non-empty,
/// every component must exist in the model and no component may repeat.
pub(crate) fn validate_chain<M>(model: &M, chain: &[CompId]) -> GraphResult<ChainIndex>
where
    M: PipingModel + ?Sized,
{
    if chain.is_empty() {
        return Err(GraphError::EmptyChain);
    }

    for &comp in chain {
        model.component(comp)?;
    }

    ChainIndex::from_chain(chain)
}
