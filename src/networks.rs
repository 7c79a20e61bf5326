//! Small-range sorting via fixed compare-exchange schedules.
//!
//! Lengths 0–3 use a hand-unrolled insertion sort, expressed as a tiny comparator network.
//! Lengths 4–8 use the classical optimal (Bose–Nelson) networks. Every compare-exchange carries
//! a stability tiebreak against a local permutation vector, so ties resolve to original order
//! regardless of how the network reorders them.

use crate::util::{Less, Range};

// Knuth's optimal sorting networks for small n, as (low, high) compare-exchange index pairs.
const NET0: [(usize, usize); 0] = [];
const NET1: [(usize, usize); 0] = [];
const NET2: [(usize, usize); 1] = [(0, 1)];
const NET3: [(usize, usize); 3] = [(0, 1), (1, 2), (0, 1)];
const NET4: [(usize, usize); 5] = [(0, 1), (2, 3), (0, 2), (1, 3), (1, 2)];
const NET5: [(usize, usize); 9] = [
    (0, 1), (3, 4), (2, 4), (2, 3), (0, 3), (0, 2), (1, 4), (1, 3), (1, 2),
];
const NET6: [(usize, usize); 12] = [
    (1, 2), (4, 5), (0, 2), (3, 5), (0, 1), (3, 4), (2, 5), (0, 3), (1, 4), (2, 4), (1, 3), (2, 3),
];
const NET7: [(usize, usize); 16] = [
    (1, 2), (3, 4), (5, 6), (0, 2), (3, 5), (4, 6), (0, 1), (4, 5), (2, 6), (0, 4), (1, 5),
    (0, 3), (2, 5), (1, 3), (2, 4), (2, 3),
];
const NET8: [(usize, usize); 19] = [
    (0, 1), (2, 3), (4, 5), (6, 7), (0, 2), (1, 3), (4, 6), (5, 7), (1, 2), (5, 6), (0, 4),
    (3, 7), (1, 5), (2, 6), (1, 4), (3, 6), (2, 4), (3, 5), (3, 4),
];

/// Compare-exchange `v[base+i]` and `v[base+j]`, with ties resolved by `order` (the original
/// position of whatever is currently at each slot) so that equal elements never cross.
#[inline]
fn compare_exchange<T, F: Less<T>>(
    v: &mut [T], order: &mut [u8], base: usize, i: usize, j: usize, less: &mut F,
) {
    let (ai, aj) = (base + i, base + j);
    if less(&v[aj], &v[ai]) || (order[i] > order[j] && !less(&v[ai], &v[aj])) {
        v.swap(ai, aj);
        order.swap(i, j);
    }
}

/// Sort `v[range]` in place; `range.len()` must be at most 8.
///
/// Cost: a fixed number of comparisons and swaps independent of input order (at most 19, for
/// length 8).
pub(crate) fn sort_small<T, F: Less<T>>(v: &mut [T], range: Range, less: &mut F) {
    let base = range.start;
    let len = range.len();
    debug_assert!(len <= 8);

    let network: &[(usize, usize)] = match len {
        0 => &NET0,
        1 => &NET1,
        2 => &NET2,
        3 => &NET3,
        4 => &NET4,
        5 => &NET5,
        6 => &NET6,
        7 => &NET7,
        8 => &NET8,
        _ => unreachable!("sort_small only handles lengths up to 8"),
    };

    let mut order = [0u8, 1, 2, 3, 4, 5, 6, 7];
    for &(i, j) in network {
        compare_exchange(v, &mut order[..len], base, i, j, less);
    }
}
