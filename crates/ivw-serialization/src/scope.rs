//! Scoped switching of the current node.
//!
//! [`NodeSwitch`] pushes a node onto a serializer's node stack and pops it when
//! dropped, so the previous current node is restored on every exit path:
//! normal return, `?` propagation, and unwinding.

use std::ops::{Deref, DerefMut};

use crate::document::NodeId;

/// A serializer or deserializer that tracks a stack of current nodes.
pub trait NodeStack {
    /// The node subsequent calls target.
    fn current_node(&self) -> NodeId;

    fn push_node(&mut self, node: NodeId);

    fn pop_node(&mut self);
}

/// Guard that keeps `node` current for its lifetime.
///
/// Dereferences to the wrapped serializer so nested calls go through the guard.
#[must_use = "the node is only current while the guard is alive"]
pub struct NodeSwitch<'a, S: NodeStack> {
    inner: &'a mut S,
}

impl<'a, S: NodeStack> NodeSwitch<'a, S> {
    pub fn new(inner: &'a mut S, node: NodeId) -> Self {
        inner.push_node(node);
        Self { inner }
    }
}

impl<S: NodeStack> Deref for NodeSwitch<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.inner
    }
}

impl<S: NodeStack> DerefMut for NodeSwitch<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.inner
    }
}

impl<S: NodeStack> Drop for NodeSwitch<'_, S> {
    fn drop(&mut self) {
        self.inner.pop_node();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    struct Stack {
        nodes: Vec<NodeId>,
    }

    impl NodeStack for Stack {
        fn current_node(&self) -> NodeId {
            *self.nodes.last().unwrap()
        }

        fn push_node(&mut self, node: NodeId) {
            self.nodes.push(node);
        }

        fn pop_node(&mut self) {
            self.nodes.pop();
        }
    }

    fn fails_inside(stack: &mut Stack, node: NodeId) -> Result<(), ()> {
        let guard = NodeSwitch::new(stack, node);
        assert_eq!(guard.current_node(), node);
        Err(())
    }

    #[test]
    fn test_restores_on_early_return() {
        let mut doc = Document::new("root");
        let child = doc.append_child(doc.root(), "child");
        let mut stack = Stack {
            nodes: vec![doc.root()],
        };

        assert!(fails_inside(&mut stack, child).is_err());
        assert_eq!(stack.current_node(), doc.root());
    }

    #[test]
    fn test_nested_switches() {
        let mut doc = Document::new("root");
        let a = doc.append_child(doc.root(), "a");
        let b = doc.append_child(a, "b");
        let mut stack = Stack {
            nodes: vec![doc.root()],
        };
        {
            let mut outer = NodeSwitch::new(&mut stack, a);
            {
                let inner = NodeSwitch::new(&mut *outer, b);
                assert_eq!(inner.current_node(), b);
            }
            assert_eq!(outer.current_node(), a);
        }
        assert_eq!(stack.current_node(), doc.root());
    }

    #[test]
    fn test_restores_on_panic() {
        let mut doc = Document::new("root");
        let child = doc.append_child(doc.root(), "child");
        let mut stack = Stack {
            nodes: vec![doc.root()],
        };

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = NodeSwitch::new(&mut stack, child);
            panic!("boom");
        }));
        assert!(result.is_err());
        assert_eq!(stack.nodes, vec![doc.root()]);
    }
}
