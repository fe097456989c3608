use core::fmt;
use std::{
    fmt::{Debug, Display},
    iter, mem,
};
use tracing::{debug, trace};

/*
 * Owning link to the rest of the chain
 */
type Link = Option<Box<Node>>;

struct Node {
    value: i32,
    next: Link,
}

/*
 * A singly-linked chain of integers.
 * Every node is owned by its predecessor, the head is owned by the chain.
 * <count> always matches the number of reachable nodes.
 */
pub struct OrderedChain {
    head: Link,
    count: usize,
}

impl OrderedChain {
    pub fn new(seed: i32) -> Self {
        OrderedChain {
            head: Some(Box::new(Node {
                value: seed,
                next: None,
            })),
            count: 1,
        }
    }

    pub fn prepend(&mut self, value: i32) {
        let next = self.head.take();
        self.head = Some(Box::new(Node { value, next }));
        self.count += 1;
    }

    pub fn append(&mut self, value: i32) {
        let mut tail = &mut self.head;
        while let Some(node) = tail {
            tail = &mut node.next;
        }
        *tail = Some(Box::new(Node { value, next: None }));
        self.count += 1;
    }

    /*
     * Remove every node holding <value>.
     * The cursor is the link owning the node under inspection, so removing
     * the head is the same relinking as removing any other node.
     */
    pub fn remove(&mut self, value: i32) {
        let before = self.count;
        let mut cursor = &mut self.head;
        while let Some(mut node) = cursor.take() {
            if node.value == value {
                *cursor = node.next.take();
                self.count -= 1;
            } else {
                cursor = &mut cursor.insert(node).next;
            }
        }
        trace!(value, removed = before - self.count, "remove");
    }

    pub fn sort(&mut self) {
        trace!(count = self.count, "sort");
        self.head = merge_sort(self.head.take());
    }

    /*
     * Exchange contents with <other>. Only the head links and counts move.
     */
    pub fn swap(&mut self, other: &mut OrderedChain) {
        mem::swap(&mut self.head, &mut other.head);
        mem::swap(&mut self.count, &mut other.count);
    }

    /*
     * Swap the positions of the first node holding <a> and the first node
     * holding <b>. No-op if either is missing or if a == b.
     *
     * With x at position i and y at position j > i the chain reads
     *   prefix x middle y suffix
     * and is rewired into
     *   prefix y middle x suffix
     * Adjacent nodes simply have an empty middle.
     */
    pub fn swap_node(&mut self, a: i32, b: i32) {
        if a == b {
            debug!(a, b, "swap_node on identical values");
            return;
        }
        let (Some(pos_a), Some(pos_b)) = (self.position(a), self.position(b)) else {
            debug!(a, b, "swap_node value not found");
            return;
        };
        let (first, second) = if pos_a < pos_b {
            (pos_a, pos_b)
        } else {
            (pos_b, pos_a)
        };

        let first_link = link_at(&mut self.head, first);
        let Some(mut x) = first_link.take() else {
            return;
        };
        let mut middle = x.next.take();

        let second_link = link_at(&mut middle, second - first - 1);
        let Some(mut y) = second_link.take() else {
            // unreachable while count is consistent; restore what was detached
            x.next = middle;
            *first_link = Some(x);
            return;
        };
        x.next = y.next.take();
        *second_link = Some(x);

        y.next = middle;
        *first_link = Some(y);
        trace!(a, b, first, second, "swap_node");
    }

    pub fn to_vec(&self) -> Vec<i32> {
        self.values().collect()
    }

    pub fn size(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    fn values(&self) -> impl Iterator<Item = i32> + '_ {
        iter::successors(self.head.as_deref(), |node| node.next.as_deref()).map(|node| node.value)
    }

    fn position(&self, value: i32) -> Option<usize> {
        self.values().position(|v| v == value)
    }
}

/*
 * Tear down head to tail without recursing through the boxes
 */
impl Drop for OrderedChain {
    fn drop(&mut self) {
        let mut link = self.head.take();
        while let Some(mut node) = link {
            link = node.next.take();
        }
    }
}

/*
 * Values separated by spaces, head first
 */
impl Display for OrderedChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, value) in self.values().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", value)?;
        }
        Ok(())
    }
}

impl Debug for OrderedChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.values()).finish()
    }
}

/*
 * Follow <steps> links from <link>, stopping early at the end of the chain
 */
fn link_at(mut link: &mut Link, steps: usize) -> &mut Link {
    for _ in 0..steps {
        match link {
            Some(node) => link = &mut node.next,
            None => break,
        }
    }
    link
}

fn merge_sort(head: Link) -> Link {
    match head {
        Some(node) if node.next.is_some() => {
            let (first, second) = split(node);
            merge(merge_sort(Some(first)), merge_sort(second))
        }
        short => short,
    }
}

/*
 * Slow/fast split: <fast> moves two links for every one of <slow>.
 * When fast runs out, slow is the last node of the first half, which gets
 * the extra node on odd lengths.
 */
fn split(mut head: Box<Node>) -> (Box<Node>, Link) {
    let mut slow_steps = 0;
    let mut fast = head.next.as_deref();
    while let Some(node) = fast {
        fast = node.next.as_deref();
        if let Some(node) = fast {
            fast = node.next.as_deref();
            slow_steps += 1;
        }
    }
    let second = link_at(&mut head.next, slow_steps).take();
    (head, second)
}

/*
 * Merge two sorted sequences. Ties take from <a> first.
 */
fn merge(mut a: Link, mut b: Link) -> Link {
    let mut merged = None;
    let mut tail = &mut merged;
    loop {
        let take_a = match (&a, &b) {
            (Some(x), Some(y)) => x.value <= y.value,
            _ => break,
        };
        let source = if take_a { &mut a } else { &mut b };
        if let Some(mut node) = source.take() {
            *source = node.next.take();
            tail = &mut tail.insert(node).next;
        }
    }
    *tail = a.or(b);
    merged
}
