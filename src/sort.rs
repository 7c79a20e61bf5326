//! The sort driver: small-range networks, then bottom-up ascending merge passes that pick
//! between a cache-backed merge and a block-rolling in-place merge depending on how the pair's
//! combined length compares to the available scratch.

use crate::blocks::{block_roll_merge, roll_merge};
use crate::buffers::{find_buffers, redistribute_pull};
use crate::iterator::WikiIterator;
use crate::merge::{merge_external, merge_in_place};
use crate::networks::sort_small;
use crate::util::{move_out, rotate, Less, Range};

const MIN_LEVEL: usize = 4;

pub(crate) fn sort<T, F: Less<T>>(v: &mut [T], scratch: &mut [T], less: &mut F) {
    let n = v.len();
    if n < MIN_LEVEL {
        sort_small(v, Range::new(0, n), less);
        return;
    }

    let mut it = WikiIterator::new(n, MIN_LEVEL);
    while !it.finished() {
        sort_small(v, it.next_range(), less);
    }

    loop {
        it.begin();
        while !it.finished() {
            let a = it.next_range();
            let b = it.next_range();
            merge_pair(v, a, b, scratch, less);
        }
        if !it.next_level() {
            break;
        }
    }
}

fn merge_pair<T, F: Less<T>>(v: &mut [T], a: Range, b: Range, scratch: &mut [T], less: &mut F) {
    if a.is_empty() || b.is_empty() {
        return;
    }
    // Already in sorted order relative to each other.
    if !less(&v[b.start], &v[a.end - 1]) {
        return;
    }
    // Fully reversed: every element of `b` precedes every element of `a`.
    if !less(&v[a.start], &v[b.end - 1]) {
        rotate(v, Range::new(a.start, b.end), a.len(), scratch);
        return;
    }

    let a_len = a.len();
    if a_len <= scratch.len() {
        unsafe {
            move_out(v, a.start, scratch, a_len);
        }
        merge_external(v, a.start, scratch, a_len, b, less);
        return;
    }

    merge_with_internal_buffer(v, a, b, scratch, less);
}

/// Case B of the ascending pass (§4.6 step 2 onward): the pair is too long for the cache, so pull
/// a small internal buffer of distinct values out of the data and use it to bound a block-rolling
/// merge to `O(n)` amortised cost.
fn merge_with_internal_buffer<T, F: Less<T>>(v: &mut [T], a: Range, b: Range, scratch: &mut [T], less: &mut F) {
    let total = a.len() + b.len();
    let mut block_size = isqrt(total).max(1);
    let target_buffer = total / block_size + 1;

    let bufs = find_buffers(v, a, target_buffer, less);
    let buffer1 = bufs.buffer1;

    if buffer1.is_empty() {
        // No two elements in the pair differ: nothing to tag a buffer with. Fall back to a pure
        // rotation-based merge, which is still correct (just without the `O(1)`-space bound
        // improvement a buffer would give it).
        merge_in_place(v, a, b, less);
        return;
    }

    block_size = total / buffer1.len() + 1;
    let (a_trim, b_trim) = trim_buffer(a, b, buffer1);

    // Use whichever scratch we have on top of the internal buffer, if it covers a whole block —
    // `merge_external`-style cache merges inside the roll are strictly cheaper than swapping
    // through the internal buffer.
    let roll_buffer = if scratch.len() >= block_size { None } else { Some(buffer1) };
    match roll_buffer {
        Some(buf) => block_roll_merge(v, a_trim, b_trim, block_size, buf, less),
        None => block_roll_merge_with_cache(v, a_trim, b_trim, block_size, scratch, less),
    }

    let full = Range::new(a.start, b.end);
    if let Some(pull) = &bufs.pull {
        redistribute_pull(v, full, pull, less);
    }
}

/// Like [`block_roll_merge`], but uses a real cache (via `merge_external`) for each chunk instead
/// of swapping through an internal buffer, since the cache is large enough to hold one.
fn block_roll_merge_with_cache<T, F: Less<T>>(
    v: &mut [T], a: Range, b: Range, block_size: usize, cache: &mut [T], less: &mut F,
) {
    roll_merge(v, a, b, block_size, less, |v, a_block, b_prefix, less| {
        let chunk_len = a_block.len();
        unsafe {
            move_out(v, a_block.start, cache, chunk_len);
        }
        merge_external(v, a_block.start, cache, chunk_len, b_prefix, less);
    });
}

fn trim_buffer(a: Range, b: Range, buffer1: Range) -> (Range, Range) {
    if buffer1.start >= a.start && buffer1.end <= a.end {
        (Range::new(buffer1.end, a.end), b)
    } else {
        (a, Range::new(b.start, buffer1.start))
    }
}

fn isqrt(n: usize) -> usize {
    if n == 0 {
        return 0;
    }
    let mut x = n;
    let mut y = (x + 1) / 2;
    while y < x {
        x = y;
        y = (x + n / x) / 2;
    }
    x
}
