//! Weighted ticket ledger: insert-only AVL tree with subtree weight sums
//!
//! Entries are ordered by first purchase. Account `k` owns the half-open
//! range `[Σ_{i<k} wᵢ, Σ_{i≤k} wᵢ)`, so the ranges tile `[0, total)` exactly.
//!
//! Nodes live in an arena. The arena index is both the insertion order and
//! the search key, which means a new account is always the rightmost key:
//! insertion walks the right spine iteratively and rebalances on the way
//! back up. Each node caches its height and the total weight of its subtree,
//! so a point query descends once from the root.
//!
//! The tree shape depends only on the number of accounts. Purchase order,
//! account ids and the commitment cannot skew it, and the height stays
//! within `1.44·log₂(n + 2)`.

use crate::error::{RaffleError, Result};
use crate::types::{AccountId, Weight};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::ops::Range;

type NodeId = usize;

#[derive(Debug, Clone)]
struct Node {
    account: AccountId,
    weight: Weight,
    /// weight + left.subtree + right.subtree
    subtree: Weight,
    /// 1 for a leaf
    height: u32,
    left: Option<NodeId>,
    right: Option<NodeId>,
}

#[derive(Debug, Clone, Default)]
pub struct TicketLedger {
    nodes: Vec<Node>,
    root: Option<NodeId>,
    index: HashMap<AccountId, NodeId>,
}

impl TicketLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_weight(&self) -> Weight {
        self.subtree(self.root)
    }

    /// Number of distinct accounts
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn weight_of(&self, account: &AccountId) -> Weight {
        self.index
            .get(account)
            .map(|&id| self.nodes[id].weight)
            .unwrap_or(0)
    }

    /// Entries in first-purchase order
    pub fn entries(&self) -> impl Iterator<Item = (&AccountId, Weight)> + '_ {
        self.nodes.iter().map(|n| (&n.account, n.weight))
    }

    /// Add `amount` to `account`, creating its entry on first purchase
    ///
    /// Zero amounts change nothing. Fails with `WeightOverflow` before any
    /// mutation if the total would not fit.
    pub fn increment(&mut self, account: AccountId, amount: Weight) -> Result<()> {
        if amount == 0 {
            return Ok(());
        }
        if self.total_weight().checked_add(amount).is_none() {
            return Err(RaffleError::WeightOverflow);
        }

        match self.index.get(&account) {
            Some(&id) => self.add_along_path(id, amount),
            None => {
                let id = self.nodes.len();
                self.nodes.push(Node {
                    account,
                    weight: amount,
                    subtree: amount,
                    height: 1,
                    left: None,
                    right: None,
                });
                self.index.insert(account, id);
                self.insert_rightmost(id);
            }
        }
        Ok(())
    }

    /// Owner of the range containing `point`
    pub fn point_query(&self, point: Weight) -> Result<AccountId> {
        let total = self.total_weight();
        if point >= total {
            return Err(RaffleError::OutOfRange { point, total });
        }

        let mut remaining = point;
        let mut cursor = self.root;
        while let Some(id) = cursor {
            let node = &self.nodes[id];
            let left = self.subtree(node.left);
            if remaining < left {
                cursor = node.left;
            } else if remaining - left < node.weight {
                return Ok(node.account);
            } else {
                remaining -= left + node.weight;
                cursor = node.right;
            }
        }

        // Unreachable while subtree sums are consistent
        Err(RaffleError::OutOfRange { point, total })
    }

    /// The half-open weight range owned by `account`
    pub fn range_of(&self, account: &AccountId) -> Option<Range<Weight>> {
        let &target = self.index.get(account)?;
        let mut before: Weight = 0;
        let mut cursor = self.root;
        while let Some(id) = cursor {
            let node = &self.nodes[id];
            if target < id {
                cursor = node.left;
            } else {
                let start = before + self.subtree(node.left);
                if target == id {
                    return Some(start..start + node.weight);
                }
                before = start + node.weight;
                cursor = node.right;
            }
        }
        None
    }

    /// Longest root-to-leaf path, 0 when empty
    pub fn height(&self) -> usize {
        self.height_of(self.root) as usize
    }

    fn subtree(&self, id: Option<NodeId>) -> Weight {
        id.map(|id| self.nodes[id].subtree).unwrap_or(0)
    }

    fn height_of(&self, id: Option<NodeId>) -> u32 {
        id.map(|id| self.nodes[id].height).unwrap_or(0)
    }

    fn recompute(&mut self, id: NodeId) {
        let node = &self.nodes[id];
        let subtree = node.weight + self.subtree(node.left) + self.subtree(node.right);
        let height = 1 + self.height_of(node.left).max(self.height_of(node.right));
        let node = &mut self.nodes[id];
        node.subtree = subtree;
        node.height = height;
    }

    /// Existing entry: bump its weight and every subtree sum from root to it
    fn add_along_path(&mut self, target: NodeId, amount: Weight) {
        let mut cursor = self.root;
        while let Some(id) = cursor {
            self.nodes[id].subtree += amount;
            cursor = match target.cmp(&id) {
                Ordering::Less => self.nodes[id].left,
                Ordering::Greater => self.nodes[id].right,
                Ordering::Equal => {
                    self.nodes[id].weight += amount;
                    None
                }
            };
        }
    }

    /// Attach `new` (the largest key) at the end of the right spine
    fn insert_rightmost(&mut self, new: NodeId) {
        let mut spine = Vec::with_capacity(self.height());
        let mut cursor = self.root;
        while let Some(id) = cursor {
            spine.push(id);
            cursor = self.nodes[id].right;
        }

        let mut child = new;
        while let Some(id) = spine.pop() {
            self.nodes[id].right = Some(child);
            self.recompute(id);
            child = self.rebalance(id);
        }
        self.root = Some(child);
    }

    /// Appends only ever grow the right side, and the grown child leans
    /// right, so one left rotation restores the AVL bound.
    fn rebalance(&mut self, id: NodeId) -> NodeId {
        let node = &self.nodes[id];
        if self.height_of(node.right) > self.height_of(node.left) + 1 {
            self.rotate_left(id)
        } else {
            id
        }
    }

    fn rotate_left(&mut self, id: NodeId) -> NodeId {
        let Some(pivot) = self.nodes[id].right else {
            return id;
        };
        self.nodes[id].right = self.nodes[pivot].left;
        self.nodes[pivot].left = Some(id);
        self.recompute(id);
        self.recompute(pivot);
        pivot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(n: u32) -> AccountId {
        let mut bytes = [0u8; 32];
        bytes[..4].copy_from_slice(&n.to_be_bytes());
        AccountId::new(bytes)
    }

    /// Checks subtree sums, cached heights, BST order on arena index and the
    /// AVL balance bound; returns (subtree, height)
    fn assert_consistent(
        ledger: &TicketLedger,
        id: Option<NodeId>,
        lo: usize,
        hi: usize,
    ) -> (Weight, u32) {
        let Some(id) = id else { return (0, 0) };
        assert!(id >= lo && id < hi, "node {} outside key bounds {}..{}", id, lo, hi);
        let node = &ledger.nodes[id];
        let (left, left_height) = assert_consistent(ledger, node.left, lo, id);
        let (right, right_height) = assert_consistent(ledger, node.right, id + 1, hi);
        assert!(left_height.abs_diff(right_height) <= 1, "node {} unbalanced", id);
        assert_eq!(node.height, 1 + left_height.max(right_height));
        assert_eq!(node.subtree, left + right + node.weight);
        (node.subtree, node.height)
    }

    #[test]
    fn test_structure_stays_consistent() {
        let mut ledger = TicketLedger::new();
        for i in 0..500u32 {
            ledger.increment(account(i), (i % 7 + 1) as Weight).unwrap();
            if i % 3 == 0 {
                ledger.increment(account(i / 2), 2).unwrap();
            }
            if i % 61 == 0 {
                assert_consistent(&ledger, ledger.root, 0, ledger.len());
            }
        }
        let (total, height) = assert_consistent(&ledger, ledger.root, 0, ledger.len());
        assert_eq!(total, ledger.total_weight());
        assert_eq!(height as usize, ledger.height());
    }

    #[test]
    fn test_overflow_leaves_ledger_untouched() {
        let mut ledger = TicketLedger::new();
        ledger.increment(account(1), Weight::MAX - 1).unwrap();

        assert_eq!(ledger.increment(account(2), 2), Err(RaffleError::WeightOverflow));
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.total_weight(), Weight::MAX - 1);
    }
}
