//! Persistent append-only lists shared between branches of the search.
//!
//! Every branch of a path keeps the history of its ancestors. Storing that
//! history as a shared singly-linked list makes cloning a path `O(1)` no matter
//! how many decisions it has accumulated.

use std::cmp::Ordering;
use std::sync::Arc;

#[derive(Debug)]
struct Node<T> {
    value: T,
    len: usize,
    next: Option<Arc<Node<T>>>,
}

/// An immutable list whose tail is shared with every clone taken before a push
#[derive(Debug)]
pub struct Lineage<T> {
    head: Option<Arc<Node<T>>>,
}

impl<T> Lineage<T> {
    #[must_use]
    pub fn new() -> Self {
        Self { head: None }
    }

    /// Append a value. Clones taken earlier are unaffected.
    pub fn push(&mut self, value: T) {
        let len = self.len() + 1;
        let next = self.head.take();
        self.head = Some(Arc::new(Node { value, len, next }));
    }

    /// Most recently pushed value
    pub fn last(&self) -> Option<&T> {
        self.head.as_deref().map(|node| &node.value)
    }

    pub fn len(&self) -> usize {
        self.head.as_deref().map_or(0, |node| node.len)
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Iterate newest first
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            next: self.head.as_deref(),
        }
    }
}

impl<T: Clone> Lineage<T> {
    /// Values in push order
    pub fn to_vec(&self) -> Vec<T> {
        let mut values: Vec<T> = self.iter().cloned().collect();
        values.reverse();
        values
    }
}

impl<T: Ord> Lineage<T> {
    /// Lexicographic comparison in push order.
    ///
    /// Shared tails are recognised by pointer, so only the parts pushed since
    /// the two lists diverged are walked.
    pub fn cmp_in_push_order(&self, other: &Self) -> Ordering {
        let mut left = self.head.as_ref();
        let mut right = other.head.as_ref();
        let mut left_suffix = Vec::new();
        let mut right_suffix = Vec::new();

        while node_len(left) > node_len(right) {
            if let Some(node) = left {
                left_suffix.push(&node.value);
                left = node.next.as_ref();
            }
        }
        while node_len(right) > node_len(left) {
            if let Some(node) = right {
                right_suffix.push(&node.value);
                right = node.next.as_ref();
            }
        }
        while let (Some(l), Some(r)) = (left, right) {
            if Arc::ptr_eq(l, r) {
                break;
            }
            left_suffix.push(&l.value);
            right_suffix.push(&r.value);
            left = l.next.as_ref();
            right = r.next.as_ref();
        }

        left_suffix.reverse();
        right_suffix.reverse();
        left_suffix.cmp(&right_suffix)
    }
}

fn node_len<T>(node: Option<&Arc<Node<T>>>) -> usize {
    node.map_or(0, |n| n.len)
}

impl<T> Default for Lineage<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Lineage<T> {
    fn clone(&self) -> Self {
        Self {
            head: self.head.clone(),
        }
    }
}

impl<T> Drop for Lineage<T> {
    // Unlink iteratively so long chains cannot overflow the stack
    fn drop(&mut self) {
        let mut head = self.head.take();
        while let Some(node) = head {
            match Arc::try_unwrap(node) {
                Ok(mut node) => head = node.next.take(),
                Err(_) => break,
            }
        }
    }
}

pub struct Iter<'a, T> {
    next: Option<&'a Node<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.next.map(|node| {
            self.next = node.next.as_deref();
            &node.value
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_order() {
        let mut list = Lineage::new();
        assert!(list.is_empty());
        list.push(1);
        list.push(2);
        list.push(3);
        assert_eq!(list.len(), 3);
        assert_eq!(list.last(), Some(&3));
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![3, 2, 1]);
        assert_eq!(list.to_vec(), vec![1, 2, 3]);
    }

    #[test]
    fn test_branches_share_prefix() {
        let mut trunk = Lineage::new();
        trunk.push("a");
        let mut left = trunk.clone();
        let mut right = trunk.clone();
        left.push("l");
        right.push("r");

        assert_eq!(trunk.to_vec(), vec!["a"]);
        assert_eq!(left.to_vec(), vec!["a", "l"]);
        assert_eq!(right.to_vec(), vec!["a", "r"]);
    }

    #[test]
    fn test_cmp_in_push_order() {
        let mut trunk = Lineage::new();
        trunk.push(1);
        trunk.push(4);

        let mut a = trunk.clone();
        a.push(5);
        let mut b = trunk.clone();
        b.push(7);
        assert_eq!(a.cmp_in_push_order(&b), Ordering::Less);
        assert_eq!(b.cmp_in_push_order(&a), Ordering::Greater);
        assert_eq!(a.cmp_in_push_order(&a.clone()), Ordering::Equal);

        // Prefix orders first
        assert_eq!(trunk.cmp_in_push_order(&a), Ordering::Less);

        // Independently built lists compare by value
        let mut c = Lineage::new();
        for v in [1, 4, 5] {
            c.push(v);
        }
        assert_eq!(a.cmp_in_push_order(&c), Ordering::Equal);

        let mut d = Lineage::new();
        d.push(2);
        assert_eq!(a.cmp_in_push_order(&d), Ordering::Less);
    }

    #[test]
    fn test_long_chain_drops() {
        let mut list = Lineage::new();
        for i in 0..500_000 {
            list.push(i);
        }
        let shared = list.clone();
        drop(list);
        assert_eq!(shared.len(), 500_000);
    }
}
