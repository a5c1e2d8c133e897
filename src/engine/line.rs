//! Single-line merge: compaction, pairwise merging and scoring.
//!
//! A line is read in the direction of travel, so the merge target is
//! always index 0. Callers orient rows and columns before calling
//! [`compute`]; see [`crate::engine::grid::line_indices`].

/// A tile value (2, 4, 8, ...). Empty cells are `None`.
pub type Tile = u64;
/// Score accumulator. Saturates at `u64::MAX` instead of wrapping.
pub type Score = u64;

/// Largest representable tile. Two of them stay side by side, since their
/// sum does not fit in a [`Tile`].
pub const MAX_TILE: Tile = 1 << 63;

/// Compact and merge one oriented line toward index 0.
///
/// Returns the non-empty merged values (length <= input length) and the
/// score earned, which is the sum of every value created by a merge. A tile
/// produced by a merge never merges again within the same call.
///
/// ```
/// use puzzle_2048::engine::line::compute;
/// assert_eq!(compute([Some(2), Some(2), Some(2), Some(2)]), (vec![4, 4], 8));
/// assert_eq!(compute([Some(2), None, Some(2), Some(4)]), (vec![4, 4], 4));
/// ```
pub fn compute<I>(line: I) -> (Vec<Tile>, Score)
where
    I: IntoIterator<Item = Option<Tile>>,
{
    let mut merged = Vec::new();
    let mut pending: Option<Tile> = None;
    let mut score: Score = 0;
    for tile in line.into_iter().flatten() {
        match pending {
            Some(held) if held == tile && held < MAX_TILE => {
                merged.push(held * 2);
                score = score.saturating_add(held * 2);
                pending = None;
            }
            Some(held) => {
                merged.push(held);
                pending = Some(tile);
            }
            None => pending = Some(tile),
        }
    }
    merged.extend(pending);
    (merged, score)
}

/// True if writing `merged` back over `original` (padding with empties)
/// would change at least one cell.
#[inline]
pub fn line_changed(original: &[Option<Tile>], merged: &[Tile]) -> bool {
    original
        .iter()
        .enumerate()
        .any(|(idx, &cell)| cell != merged.get(idx).copied())
}
