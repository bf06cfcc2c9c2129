use crate::types::{Product, Stack, StackError, StackResult};

/// Selects the temporally nearest prior neighbors from an assembled stack
pub struct NeighborSelector;

impl NeighborSelector {
    /// The `depth` entries immediately preceding the reference in the stack
    ///
    /// Expects a stack assembled with `end` bounded at the reference's own
    /// acquisition date. Returns the `depth` largest baselines strictly less
    /// than the reference's own entry, in ascending order. The reference's
    /// baseline is zero when it anchored the stack, but can be nonzero after
    /// an alternate-reference substitution; when the reference is absent
    /// from the stack entirely its baseline is taken as zero. A stack with
    /// fewer than `depth` prior entries returns all of them; that is a
    /// boundary, not an error. Fails with `InvalidDepth` when `depth` is
    /// zero.
    pub fn nearest_prior_neighbors(
        reference: &Product,
        depth: usize,
        stack: &Stack,
    ) -> StackResult<Vec<Product>> {
        if depth == 0 {
            return Err(StackError::InvalidDepth(depth));
        }

        log::debug!(
            "Selecting up to {} prior neighbors of {} from a stack of {}",
            depth,
            reference.display_id(),
            stack.len()
        );

        let pivot = stack
            .iter()
            .find(|entry| entry.product.id().is_some() && entry.product.id() == reference.id())
            .map(|entry| entry.baseline.temporal_days)
            .unwrap_or(0);

        let prior: Vec<&Product> = stack
            .iter()
            .filter(|entry| entry.baseline.temporal_days < pivot)
            .map(|entry| &entry.product)
            .collect();

        let lo = prior.len().saturating_sub(depth);
        Ok(prior[lo..].iter().map(|p| (*p).clone()).collect())
    }
}
