/**
 * NeighborReco
 * Copyright (C) 2018 Sebastian Schelter
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <http://www.gnu.org/licenses/>.
 */

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// An item together with its (normalized) recommendation score.
#[derive(PartialEq,Debug,Clone,Copy)]
pub struct ScoredItem {
    pub item: usize,
    pub score: f64,
}

/// Ordering for our bounded heap: an item is "greater" when it is a worse recommendation, so that
/// the heap top is always the next item to evict. Equal scores are broken by item index, the lower
/// index wins. We need a special implementation here as there is no total order on floating point
/// numbers.
fn cmp_reverse(scored_item_a: &ScoredItem, scored_item_b: &ScoredItem) -> Ordering {
    match scored_item_a.score.partial_cmp(&scored_item_b.score) {
        Some(Ordering::Less) => Ordering::Greater,
        Some(Ordering::Greater) => Ordering::Less,
        Some(Ordering::Equal) | None => scored_item_a.item.cmp(&scored_item_b.item),
    }
}

impl Eq for ScoredItem {}

impl Ord for ScoredItem {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_reverse(self, other)
    }
}

impl PartialOrd for ScoredItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(cmp_reverse(self, other))
    }
}

/// Keeps the `n` best scored items, returned best first.
pub fn top_n<I>(scored_items: I, n: usize) -> Vec<ScoredItem>
    where I: IntoIterator<Item=ScoredItem> {

    if n == 0 {
        return Vec::new();
    }

    let mut heap = BinaryHeap::with_capacity(n);

    for scored_item in scored_items {
        if heap.len() < n {
            heap.push(scored_item);
        } else if let Some(mut top) = heap.peek_mut() {
            if scored_item < *top {
                *top = scored_item;
            }
        }
    }

    heap.into_sorted_vec()
}
