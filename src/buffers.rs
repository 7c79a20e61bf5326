//! Internal buffer discovery, extraction, and redistribution.
//!
//! An internal buffer is a contiguous span of the array holding mutually distinct values, used
//! as scratch storage for a block-rolling merge. It is *pulled* to the left edge of its donor `A`
//! run before a pass's merge, and *redistributed* back into sorted position afterwards.

use crate::util::{find_first_forward, find_last_forward, rotate, Less, Range};

/// Records how a buffer was assembled, so it can later be redistributed by the inverse
/// operation. `count` is how many values were pulled, to the left edge of the donor `A` run.
///
/// Redistribution happens after the pair this buffer served has been fully merged, so it needs
/// the *merged* span (covering both former A and B) rather than the narrower span used during
/// extraction — [`redistribute_pull`] takes that span explicitly.
pub(crate) struct Pull {
    pub count: usize,
}

/// Reinsert a pulled buffer into its now-fully-sorted merged span. The buffer must currently sit
/// at `span.start..span.start + count`, scrambled but restorable by sorting first.
pub(crate) fn redistribute_pull<T, F: Less<T>>(v: &mut [T], span: Range, pull: &Pull, less: &mut F) {
    if pull.count == 0 {
        return;
    }
    insertion_sort(v, Range::new(span.start, span.start + pull.count), less);
    redistribute_left(v, span, pull.count, less);
}

pub(crate) struct Buffers {
    pub buffer1: Range,
    pub pull: Option<Pull>,
}

/// Pull up to `target` distinct values (by first occurrence, scanning forward) to the left edge
/// of `range`. Afterwards `range.start..range.start + count` holds exactly those values, sorted;
/// `range.start + count..range.end` holds the rest, in original relative order (hence still
/// sorted, since a stable partition of a sorted sequence is sorted within each part).
///
/// Returns the count actually pulled (less than `target` if `range` doesn't contain that many
/// distinct values).
fn pull_unique_left<T, F: Less<T>>(v: &mut [T], range: Range, target: usize, less: &mut F) -> usize {
    if range.is_empty() || target == 0 {
        return 0;
    }

    let mut dest = range.start + 1;
    let mut count = 1usize;

    while count < target && dest < range.end {
        let search = Range::new(dest, range.end);
        let next = find_last_forward(v, &v[dest - 1], search, count, less);
        if next >= range.end {
            break;
        }
        rotate(v, Range::new(dest, next + 1), next - dest, &mut []);
        dest += 1;
        count += 1;
    }

    count
}

/// Reinsert a buffer that sits at `span.start..span.start + count`, given that
/// `span.start + count..span.end` is already sorted, placing each element at its sorted
/// position in turn.
fn redistribute_left<T, F: Less<T>>(v: &mut [T], span: Range, mut count: usize, less: &mut F) {
    while count > 0 {
        let search = Range::new(span.start + count, span.end);
        let unique_hint = usize::max(2 * (count - 1), 1);
        let dest = find_first_forward(v, &v[span.start], search, unique_hint, less);
        if dest > span.start + 1 {
            rotate(v, Range::new(span.start, dest), 1, &mut []);
        }
        count -= 1;
    }
}

/// Sort `v[range]` by plain insertion sort; used to restore a scrambled internal buffer before
/// redistribution.
pub(crate) fn insertion_sort<T, F: Less<T>>(v: &mut [T], range: Range, less: &mut F) {
    for i in (range.start + 1)..range.end {
        let mut j = i;
        while j > range.start && less(&v[j], &v[j - 1]) {
            v.swap(j, j - 1);
            j -= 1;
        }
    }
}

/// Find (and extract) one internal buffer of up to `buffer_size` distinct values from `a`,
/// pulled to its left edge.
///
/// Returns whatever count was actually reached, even if short of `buffer_size` — `a` has already
/// been irreversibly rearranged by the attempt at that point, so the caller commits to it rather
/// than discarding the partial result.
pub(crate) fn find_buffers<T, F: Less<T>>(v: &mut [T], a: Range, buffer_size: usize, less: &mut F) -> Buffers {
    let found = pull_unique_left(v, a, buffer_size, less);
    let buffer1 = Range::new(a.start, a.start + found);
    Buffers { buffer1, pull: Some(Pull { count: found }) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn less_i32(a: &i32, b: &i32) -> bool {
        a < b
    }

    #[test]
    fn pull_unique_left_gathers_distinct_prefix() {
        let mut v = vec![1, 1, 2, 2, 3, 3];
        let count = pull_unique_left(&mut v, Range::new(0, 6), 3, &mut less_i32);
        assert_eq!(count, 3);
        assert_eq!(&v[0..3], &[1, 2, 3]);
        let mut rest = v[3..6].to_vec();
        let mut expect_rest = rest.clone();
        expect_rest.sort();
        rest.sort();
        assert_eq!(rest, expect_rest);
        assert!(v[3] <= v[4] && v[4] <= v[5]);
    }

    #[test]
    fn pull_and_redistribute_round_trips_left() {
        let mut v: Vec<i32> = vec![5, 2, 2, 7, 9, 9, 12, 20];
        let original = v.clone();
        let count = pull_unique_left(&mut v, Range::new(0, 8), 4, &mut less_i32);
        insertion_sort(&mut v, Range::new(0, count), &mut less_i32);
        redistribute_left(&mut v, Range::new(0, 8), count, &mut less_i32);
        let mut sorted_original = original;
        sorted_original.sort();
        assert_eq!(v, sorted_original);
    }

    #[test]
    fn find_buffers_falls_short_on_few_distinct_values() {
        let mut v = vec![5; 10];
        let bufs = find_buffers(&mut v, Range::new(0, 10), 4, &mut less_i32);
        assert_eq!(bufs.buffer1.len(), 1);
        assert_eq!(bufs.pull.unwrap().count, 1);
    }
}
