//! The block-rolling merge: merges two long sorted runs using only a small, fixed-size internal
//! buffer, by processing the left run in `block_size`-sized chunks.
//!
//! Each chunk is only ever merged against the slice of the right run that sorts before it, so the
//! scratch needed per chunk never exceeds one chunk's worth, regardless of how long the runs are.
//! Because the chunk and the prefix it's merged against must be *adjacent* for
//! [`crate::merge::merge_internal`]/[`crate::merge::merge_in_place`] to be sound, any not-yet-
//! processed `A` data sitting between them is rotated out of the way first, so the two pieces
//! being merged always abut exactly as they would in a single unchunked merge.

use crate::merge::{merge_in_place, merge_internal};
use crate::util::{binary_first, rotate, Less, Range};

/// Merge `a` and `b` (each already sorted) using `buffer` (a range of values we don't care about
/// the order of, at least `block_size` long for the internal-buffer fast path) as scratch.
///
/// Cost: the rotate that restores adjacency before each chunk's merge costs `O(remaining A)`, so
/// this is `O((a.len() + b.len()) * a.len() / block_size)` in the worst case — looser than the
/// `O(a.len() + b.len())` bound the block-tagging design this replaces achieves, since that design
/// avoids ever relocating untouched `A` data by swapping block identities instead of shifting them.
/// See `DESIGN.md` for why this simplification was chosen over reimplementing block tagging.
pub(crate) fn block_roll_merge<T, F: Less<T>>(
    v: &mut [T], a: Range, b: Range, block_size: usize, buffer: Range, less: &mut F,
) {
    roll_merge(v, a, b, block_size, less, |v, a_block, b_prefix, less| {
        if a_block.len() <= buffer.len() {
            merge_internal(v, a_block, b_prefix, buffer.start, less);
        } else {
            merge_in_place(v, a_block, b_prefix, less);
        }
    });
}

/// Shared block-rolling loop: walks `a` in `block_size` chunks, merging each chunk with whatever
/// prefix of the remaining `b` sorts before it via `merge_chunk`. `merge_chunk` receives two
/// ranges that are guaranteed adjacent (`a_block.end == b_prefix.start`).
///
/// Invariant maintained each iteration: `[a_pos, boundary)` holds the not-yet-merged remainder of
/// `a` and `[boundary, b_end)` holds the not-yet-merged remainder of `b`, with everything before
/// `a_pos` already in final sorted position. This mirrors the invariant that holds at the very
/// start (`a.end == b.start`), so `merge_chunk` never sees a range pair that isn't truly adjacent.
pub(crate) fn roll_merge<T, F, M>(
    v: &mut [T], a: Range, b: Range, block_size: usize, less: &mut F, mut merge_chunk: M,
) where
    F: Less<T>,
    M: FnMut(&mut [T], Range, Range, &mut F),
{
    if a.is_empty() || b.is_empty() || block_size == 0 {
        return;
    }

    let mut a_pos = a.start;
    let mut boundary = b.start;
    let b_end = b.end;

    while a_pos < boundary {
        let chunk_end = usize::min(a_pos + block_size, boundary);
        let mid = binary_first(v, &v[chunk_end - 1], Range::new(boundary, b_end), less);

        if mid > boundary {
            let gap_len = boundary - chunk_end;
            let prefix_len = mid - boundary;
            if gap_len > 0 {
                // `[chunk_end, mid)` currently holds `[gap | b_prefix]`; after this, `b_prefix`
                // sits immediately after the chunk and `gap` immediately after that, restoring
                // adjacency for both this merge and the next iteration.
                rotate(v, Range::new(chunk_end, mid), gap_len, &mut []);
            }
            let a_block = Range::new(a_pos, chunk_end);
            let b_prefix = Range::new(chunk_end, chunk_end + prefix_len);
            merge_chunk(v, a_block, b_prefix, less);
            a_pos = chunk_end + prefix_len;
            boundary = mid;
        } else {
            // Nothing in the remaining `b` sorts before this chunk; it's already in place.
            a_pos = chunk_end;
        }
    }
}
