//! Proportional splitting for APIs with per-call cardinality limits.

use crate::error::CoreError;

/// Split `items` into `group_count` roughly equal contiguous groups.
///
/// Each group holds `ceil(len / group_count)` items except possibly the last,
/// so the number of groups returned is `ceil(len / per_group)`, which can be
/// fewer than `group_count` for short inputs. Concatenating the groups in
/// order reproduces `items`.
pub fn split_into_groups<T>(items: &[T], group_count: usize) -> Result<Vec<&[T]>, CoreError> {
    if group_count == 0 {
        return Err(CoreError::InvalidGroupCount);
    }
    if items.is_empty() {
        return Ok(Vec::new());
    }

    let per_group = items.len().div_ceil(group_count);
    Ok(items.chunks(per_group).collect())
}

/// Number of groups needed so that no group exceeds `max_per_call` items.
///
/// Always at least 1, so the result can be passed straight to
/// [`split_into_groups`].
pub fn groups_for_limit(len: usize, max_per_call: usize) -> Result<usize, CoreError> {
    if max_per_call == 0 {
        return Err(CoreError::InvalidGroupCount);
    }
    Ok(len.div_ceil(max_per_call).max(1))
}
