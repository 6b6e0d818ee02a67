//! The three algorithms served by the API.
//!
//! All functions are pure and generic over the element type; the HTTP layer
//! feeds them [`Comparable`](crate::value::Comparable) values or node ids.

use std::collections::{HashMap, HashSet, VecDeque};
use std::hash::Hash;

/// Iterative binary search over an ascending slice.
///
/// Returns an index `i` with `sorted[i] == *target`, or `None` when the target
/// is absent. With duplicates, any matching index may be returned.
pub fn binary_search<T: Ord>(sorted: &[T], target: &T) -> Option<usize> {
    if sorted.is_empty() {
        return None;
    }

    let mut left = 0usize;
    let mut right = sorted.len() - 1;

    while left <= right {
        let mid = left + (right - left) / 2;
        match sorted[mid].cmp(target) {
            std::cmp::Ordering::Equal => return Some(mid),
            std::cmp::Ordering::Less => left = mid + 1,
            std::cmp::Ordering::Greater => {
                if mid == 0 {
                    break;
                }
                right = mid - 1;
            }
        }
    }

    None
}

/// Quicksort with a middle-index pivot and three-way partition.
///
/// Deterministic: each segment's pivot is its middle element. Not stable.
/// Pending segments live on a heap work stack, smaller one on top, so
/// adversarial inputs cost O(n²) time but never deep call stacks.
pub fn quick_sort<T: Ord + Clone>(items: &[T]) -> Vec<T> {
    let mut sorted = items.to_vec();
    let mut pending = vec![(0, sorted.len())];

    while let Some((lo, hi)) = pending.pop() {
        if hi - lo <= 1 {
            continue;
        }

        let segment = &mut sorted[lo..hi];
        let pivot = segment[segment.len() / 2].clone();
        let mut less = Vec::new();
        let mut equal = Vec::new();
        let mut greater = Vec::new();

        for item in segment.iter() {
            match item.cmp(&pivot) {
                std::cmp::Ordering::Less => less.push(item.clone()),
                std::cmp::Ordering::Equal => equal.push(item.clone()),
                std::cmp::Ordering::Greater => greater.push(item.clone()),
            }
        }

        let less_end = lo + less.len();
        let greater_start = less_end + equal.len();
        for (slot, item) in segment
            .iter_mut()
            .zip(less.into_iter().chain(equal).chain(greater))
        {
            *slot = item;
        }

        let left = (lo, less_end);
        let right = (greater_start, hi);
        if left.1 - left.0 > right.1 - right.0 {
            pending.push(left);
            pending.push(right);
        } else {
            pending.push(right);
            pending.push(left);
        }
    }

    sorted
}

/// Breadth-first traversal from `start`.
///
/// A start node that is not a key of `graph` yields an empty traversal.
/// Nodes are marked visited when first enqueued; neighbours are explored in
/// adjacency order, and nodes without an adjacency entry have no neighbours.
pub fn bfs<N: Eq + Hash + Clone>(graph: &HashMap<N, Vec<N>>, start: &N) -> Vec<N> {
    if !graph.contains_key(start) {
        return Vec::new();
    }

    let mut visited: HashSet<N> = HashSet::new();
    let mut queue: VecDeque<N> = VecDeque::new();
    let mut order = Vec::new();

    visited.insert(start.clone());
    queue.push_back(start.clone());

    while let Some(node) = queue.pop_front() {
        if let Some(neighbors) = graph.get(&node) {
            for neighbor in neighbors {
                if visited.insert(neighbor.clone()) {
                    queue.push_back(neighbor.clone());
                }
            }
        }
        order.push(node);
    }

    order
}
