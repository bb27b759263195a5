use crate::error::BatchError;

/// Splits `ids` into contiguous slices of at most `batch_size` items.
///
/// The slices cover `ids` exactly once and in order; only the last may be
/// shorter than `batch_size`. An empty input yields no batches.
///
/// # Errors
///
/// Returns [`BatchError::InvalidBatchSize`] when `batch_size` is zero.
pub fn batches<T>(ids: &[T], batch_size: usize) -> Result<Vec<&[T]>, BatchError> {
    if batch_size == 0 {
        return Err(BatchError::InvalidBatchSize);
    }
    Ok(ids.chunks(batch_size).collect())
}
