//! Sentinel-headed doubly linked chain of entities.
//!
//! Forward links own the next node (`Rc`), back links are `Weak`, so the
//! chain is the only strong owner of its nodes.  Dropping the last handle
//! returned by `unlink` frees the node on the spot.
//!
//! Linkage misuse (inserting a linked node, unlinking a node that is not in
//! this chain) means the chain is corrupt; those paths panic.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::entities::Entity;

pub type NodeRef = Rc<RefCell<Node>>;

static NEXT_CHAIN_ID: AtomicU64 = AtomicU64::new(1);

// ── Node ──────────────────────────────────────────────────────────────────────

/// What a node's previous link points at.
#[derive(Debug)]
enum Back {
    Sentinel,
    Node(Weak<RefCell<Node>>),
}

#[derive(Debug)]
pub struct Node {
    entity: Entity,
    prev: Option<Back>,
    next: Option<NodeRef>,
    owner: Option<u64>,
}

impl Node {
    /// Wrap an entity in a node with no links.  It is not part of any chain
    /// until handed to `Chain::insert_after_sentinel`.
    pub fn detached(entity: Entity) -> NodeRef {
        Rc::new(RefCell::new(Node {
            entity,
            prev: None,
            next: None,
            owner: None,
        }))
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    pub fn is_linked(&self) -> bool {
        self.prev.is_some() || self.next.is_some() || self.owner.is_some()
    }

    pub fn next(&self) -> Option<NodeRef> {
        self.next.clone()
    }

    /// The previous live node, or `None` when this node sits right after the
    /// sentinel (or is detached).
    pub fn prev(&self) -> Option<NodeRef> {
        match &self.prev {
            Some(Back::Node(weak)) => weak.upgrade(),
            _ => None,
        }
    }

    pub fn follows_sentinel(&self) -> bool {
        matches!(self.prev, Some(Back::Sentinel))
    }
}

// ── Sentinel ──────────────────────────────────────────────────────────────────

/// Head marker of a chain.  Carries no entity, so it can never be drawn or
/// reaped.
#[derive(Debug, Default)]
struct Sentinel {
    next: Option<NodeRef>,
}

// ── Chain ─────────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct Chain {
    id: u64,
    sentinel: Sentinel,
    len: usize,
}

impl Default for Chain {
    fn default() -> Self {
        Chain::new()
    }
}

impl Chain {
    pub fn new() -> Self {
        Chain {
            id: NEXT_CHAIN_ID.fetch_add(1, Ordering::Relaxed),
            sentinel: Sentinel::default(),
            len: 0,
        }
    }

    /// First live node after the sentinel.
    pub fn first(&self) -> Option<NodeRef> {
        self.sentinel.next.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.sentinel.next.is_none()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Visit nodes from the sentinel onwards.
    pub fn iter(&self) -> Iter {
        Iter {
            next: self.first(),
        }
    }

    /// Wrap `entity` in a fresh node and link it first.
    pub fn push(&mut self, entity: Entity) -> NodeRef {
        let node = Node::detached(entity);
        self.insert_after_sentinel(Rc::clone(&node));
        node
    }

    /// Splice `node` between the sentinel and the current first node.
    ///
    /// # Panics
    ///
    /// If `node` is already linked into any chain.
    pub fn insert_after_sentinel(&mut self, node: NodeRef) {
        {
            let mut n = node.borrow_mut();
            assert!(!n.is_linked(), "insert of a node that is already linked");

            if let Some(first) = self.sentinel.next.take() {
                first.borrow_mut().prev = Some(Back::Node(Rc::downgrade(&node)));
                n.next = Some(first);
            }
            n.prev = Some(Back::Sentinel);
            n.owner = Some(self.id);
        }
        self.sentinel.next = Some(node);
        self.len += 1;
    }

    /// Splice `node` out of the chain and drop the chain's hold on it.
    ///
    /// # Panics
    ///
    /// If `node` has no previous link, belongs to another chain, or its
    /// neighbours do not point back at it.
    pub fn unlink(&mut self, node: NodeRef) {
        let (back, next) = {
            let mut n = node.borrow_mut();
            assert_eq!(n.owner, Some(self.id), "unlink of a node not owned by this chain");
            let Some(back) = n.prev.take() else {
                panic!("unlink of a node with no previous link");
            };
            n.owner = None;
            (back, n.next.take())
        };

        match &back {
            Back::Sentinel => {
                let is_first = self
                    .sentinel
                    .next
                    .as_ref()
                    .is_some_and(|first| Rc::ptr_eq(first, &node));
                assert!(is_first, "node claims the sentinel but is not first in its chain");
                self.sentinel.next = next.clone();
            }
            Back::Node(weak) => {
                let Some(prev) = weak.upgrade() else {
                    panic!("unlink of a node whose previous node is gone");
                };
                let mut p = prev.borrow_mut();
                let points_here = p.next.as_ref().is_some_and(|n| Rc::ptr_eq(n, &node));
                assert!(points_here, "previous node does not link to the node being unlinked");
                p.next = next.clone();
            }
        }

        if let Some(next) = next {
            next.borrow_mut().prev = Some(back);
        }
        self.len -= 1;
    }
}

impl Drop for Chain {
    // Unlink iteratively so a long chain cannot overflow the stack through
    // nested `Rc` drops.
    fn drop(&mut self) {
        let mut cursor = self.sentinel.next.take();
        while let Some(node) = cursor {
            let mut n = node.borrow_mut();
            n.prev = None;
            n.owner = None;
            cursor = n.next.take();
        }
    }
}

pub struct Iter {
    next: Option<NodeRef>,
}

impl Iterator for Iter {
    type Item = NodeRef;

    fn next(&mut self) -> Option<NodeRef> {
        let node = self.next.take()?;
        self.next = node.borrow().next.clone();
        Some(node)
    }
}
