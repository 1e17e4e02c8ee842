//! Order-preserving parallel batch evaluation

use rayon::prelude::*;

use crate::error::{Error, Result};

/// Applies `op` to every item in parallel and returns the outputs in input order
///
/// All items are evaluated. If any of them fails, the error of the lowest
/// failing index is returned wrapped in [`Error::Batch`], so the reported
/// failure does not depend on thread scheduling.
pub fn map_ordered<T, U, F>(items: &[T], op: F) -> Result<Vec<U>>
where
    T: Sync,
    U: Send,
    F: Fn(&T) -> Result<U> + Sync + Send,
{
    let results: Vec<Result<U>> = items.par_iter().map(op).collect();

    results
        .into_iter()
        .enumerate()
        .map(|(index, result)| result.map_err(|e| Error::at_index(index, e)))
        .collect()
}
