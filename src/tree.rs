#[cfg(feature = "use-serde")]
use serde::{Deserialize, Serialize};

use crate::{types::*, Category};

/// The resolved content of one block in a [`ProofTree`]
#[derive(PartialEq, Eq, Clone, Debug)]
#[cfg_attr(feature = "use-serde", derive(Serialize, Deserialize))]
pub struct BlockNode {
    pub instance_id: InstanceId,
    pub type_id: TypeId,
    pub category: Category,
    /// Field values in the order the shape declares its fields
    pub fields: Vec<(String, String)>,
}

impl BlockNode {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// A node of a [`ProofTree`]: a single step or a block owning a nested sequence
#[derive(PartialEq, Eq, Clone, Debug)]
#[cfg_attr(feature = "use-serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "use-serde", serde(rename_all = "snake_case"))]
pub enum Node {
    Step(BlockNode),
    Block(BlockNode, Vec<Node>),
}

impl Node {
    pub fn data(&self) -> &BlockNode {
        match self {
            Node::Step(data) | Node::Block(data, _) => data,
        }
    }

    /// The nested sequence; empty for steps and for containers with an empty slot
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Step(_) => &[],
            Node::Block(_, children) => children,
        }
    }

    pub fn is_block(&self) -> bool {
        matches!(self, Node::Block(..))
    }
}

/// A validated snapshot of a proof document
///
/// Produced by [`Assembler::assemble`](crate::Assembler::assemble) and never changed
/// afterwards.
#[derive(PartialEq, Eq, Clone, Debug, Default)]
#[cfg_attr(feature = "use-serde", derive(Serialize, Deserialize))]
pub struct ProofTree {
    root: Vec<Node>,
}

impl ProofTree {
    pub(crate) fn new(root: Vec<Node>) -> Self {
        ProofTree { root }
    }

    /// The top-level sequence
    pub fn root(&self) -> &[Node] {
        &self.root
    }

    /// Total number of nodes, nested ones included
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Nesting depth; a tree without blocks containing anything has depth 1
    pub fn depth(&self) -> usize {
        self.iter().map(|(depth, _)| depth + 1).max().unwrap_or(0)
    }

    /// Depth-first pre-order walk yielding each node with its nesting depth
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            stack: vec![(0, self.root.iter())],
        }
    }

    pub fn find(&self, instance_id: &str) -> Option<&Node> {
        self.iter()
            .map(|(_, node)| node)
            .find(|node| node.data().instance_id == instance_id)
    }
}

/// Iterator returned by [`ProofTree::iter`]
pub struct Iter<'a> {
    stack: Vec<(usize, std::slice::Iter<'a, Node>)>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (usize, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (depth, siblings) = self.stack.last_mut()?;
            let depth = *depth;
            match siblings.next() {
                Some(node) => {
                    if !node.children().is_empty() {
                        self.stack.push((depth + 1, node.children().iter()));
                    }
                    return Some((depth, node));
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, type_id: &str) -> BlockNode {
        BlockNode {
            instance_id: id.to_owned(),
            type_id: type_id.to_owned(),
            category: Category::Tactic,
            fields: vec![],
        }
    }

    #[test]
    fn pre_order() {
        let tree = ProofTree::new(vec![
            Node::Block(
                node("a", "tactic_case_container"),
                vec![
                    Node::Step(node("b", "tactic_left")),
                    Node::Block(node("c", "tactic_then_container"), vec![]),
                    Node::Block(
                        node("d", "tactic_use_container"),
                        vec![Node::Step(node("e", "tactic_rfl"))],
                    ),
                ],
            ),
            Node::Step(node("f", "tactic_simp")),
        ]);
        let order: Vec<_> = tree
            .iter()
            .map(|(depth, n)| (depth, n.data().instance_id.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![(0, "a"), (1, "b"), (1, "c"), (1, "d"), (2, "e"), (0, "f")]
        );
        assert_eq!(tree.len(), 6);
        assert_eq!(tree.depth(), 3);
        assert!(tree.find("c").unwrap().is_block());
        assert!(tree.find("c").unwrap().children().is_empty());
        assert!(tree.find("x").is_none());
    }

    #[test]
    fn empty_tree() {
        let tree = ProofTree::default();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.depth(), 0);
    }
}
