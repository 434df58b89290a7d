use std::collections::{BTreeMap, HashSet};

#[cfg(feature = "use-serde")]
use serde::{Deserialize, Serialize};

use crate::types::*;

/// A block placed by the user
///
/// Links to other blocks are ids into the owning [`BlockGraph`]; the instance only names its
/// shape by type id and never owns it.
#[derive(PartialEq, Eq, Clone, Debug)]
#[cfg_attr(feature = "use-serde", derive(Serialize, Deserialize))]
pub struct BlockInstance {
    pub id: InstanceId,
    pub type_id: TypeId,
    #[cfg_attr(feature = "use-serde", serde(default))]
    pub fields: BTreeMap<String, String>,
    #[cfg_attr(feature = "use-serde", serde(default))]
    pub next: Option<InstanceId>,
    #[cfg_attr(feature = "use-serde", serde(default))]
    pub nested_head: Option<InstanceId>,
}

impl BlockInstance {
    pub fn new(id: &str, type_id: &str) -> Self {
        BlockInstance {
            id: id.to_owned(),
            type_id: type_id.to_owned(),
            fields: BTreeMap::new(),
            next: None,
            nested_head: None,
        }
    }

    pub fn with_field(mut self, name: &str, value: &str) -> Self {
        self.fields.insert(name.to_owned(), value.to_owned());
        self
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(|s| s.as_str())
    }
}

/// All blocks of one document, keyed by id
///
/// The graph is what the host edits. It may be malformed (links to missing blocks, cycles,
/// shared chains); turning it into a [`ProofTree`](crate::ProofTree) is the job of the
/// [`Assembler`](crate::Assembler).
///
/// ```
/// use proofblocks::{BlockGraph, BlockInstance};
///
/// let mut graph = BlockGraph::new();
/// graph.insert(BlockInstance::new("a", "proof_assume").with_field("STATEMENT", "x>0"));
/// graph.insert(BlockInstance::new("q", "proof_qed"));
/// graph.link_next("a", "q");
/// assert_eq!(graph.roots(), vec!["a"]);
/// assert_eq!(graph.chain("a").collect::<Vec<_>>(), vec!["a", "q"]);
/// ```
#[derive(PartialEq, Eq, Clone, Debug, Default)]
#[cfg_attr(feature = "use-serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "use-serde", serde(from = "Vec<BlockInstance>", into = "Vec<BlockInstance>"))]
pub struct BlockGraph {
    instances: BTreeMap<InstanceId, BlockInstance>,
}

impl From<Vec<BlockInstance>> for BlockGraph {
    fn from(instances: Vec<BlockInstance>) -> Self {
        let mut graph = BlockGraph::new();
        for instance in instances {
            graph.insert(instance);
        }
        graph
    }
}

impl From<BlockGraph> for Vec<BlockInstance> {
    fn from(graph: BlockGraph) -> Self {
        graph.instances.into_values().collect()
    }
}

impl BlockGraph {
    pub fn new() -> Self {
        Self {
            instances: BTreeMap::new(),
        }
    }

    /// Inserts an instance, returning the one previously stored under the same id
    pub fn insert(&mut self, instance: BlockInstance) -> Option<BlockInstance> {
        self.instances.insert(instance.id.clone(), instance)
    }

    pub fn get(&self, id: &str) -> Option<&BlockInstance> {
        self.instances.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut BlockInstance> {
        self.instances.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.instances.contains_key(id)
    }

    /// Removes an instance. Links pointing at it are left in place and will be reported by
    /// the assembler.
    pub fn remove(&mut self, id: &str) -> Option<BlockInstance> {
        self.instances.remove(id)
    }

    /// Attaches `below` under `above`. Returns `false` if `above` does not exist.
    pub fn link_next(&mut self, above: &str, below: &str) -> bool {
        match self.instances.get_mut(above) {
            Some(instance) => {
                instance.next = Some(below.to_owned());
                true
            }
            None => false,
        }
    }

    /// Makes `child` the first block of `parent`'s nested slot. Returns `false` if `parent`
    /// does not exist.
    pub fn link_nested(&mut self, parent: &str, child: &str) -> bool {
        match self.instances.get_mut(parent) {
            Some(instance) => {
                instance.nested_head = Some(child.to_owned());
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BlockInstance> {
        self.instances.values()
    }

    /// Ids of the instances no other instance links to, in id order. Each is the head of a
    /// top-level chain.
    pub fn roots(&self) -> Vec<&str> {
        let linked: HashSet<&str> = self
            .instances
            .values()
            .flat_map(|i| i.next.iter().chain(i.nested_head.iter()))
            .map(|id| id.as_str())
            .collect();
        self.instances
            .keys()
            .map(|id| id.as_str())
            .filter(|id| !linked.contains(id))
            .collect()
    }

    /// Follows `next` links from `head`. Stops at a missing instance or when an id repeats.
    pub fn chain<'a>(&'a self, head: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        let mut seen = HashSet::new();
        let mut cursor = Some(head);
        std::iter::from_fn(move || {
            let id = cursor.take()?;
            let instance = self.instances.get(id)?;
            if !seen.insert(id) {
                return None;
            }
            cursor = instance.next.as_deref();
            Some(instance.id.as_str())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three() -> BlockGraph {
        let mut graph = BlockGraph::new();
        graph.insert(BlockInstance::new("a", "tactic_then_container"));
        graph.insert(BlockInstance::new("b", "tactic_left"));
        graph.insert(BlockInstance::new("c", "proof_qed"));
        graph.link_nested("a", "b");
        graph.link_next("a", "c");
        graph
    }

    #[test]
    fn roots_skip_linked_blocks() {
        let mut graph = three();
        assert_eq!(graph.roots(), vec!["a"]);
        graph.insert(BlockInstance::new("z", "custom_text"));
        assert_eq!(graph.roots(), vec!["a", "z"]);
    }

    #[test]
    fn cycle_has_no_roots() {
        let mut graph = BlockGraph::new();
        graph.insert(BlockInstance::new("a", "tactic_left"));
        graph.insert(BlockInstance::new("b", "tactic_right"));
        graph.link_next("a", "b");
        graph.link_next("b", "a");
        assert!(graph.roots().is_empty());
        assert_eq!(graph.chain("b").collect::<Vec<_>>(), vec!["b", "a"]);
    }

    #[test]
    fn link_to_missing_parent() {
        let mut graph = three();
        assert!(!graph.link_next("nope", "a"));
        assert!(!graph.link_nested("nope", "a"));
        graph.remove("c");
        assert_eq!(graph.chain("a").collect::<Vec<_>>(), vec!["a"]);
        assert_eq!(graph.get("a").unwrap().next.as_deref(), Some("c"));
    }

    #[test]
    fn insert_replaces() {
        let mut graph = three();
        let old = graph.insert(BlockInstance::new("b", "tactic_right").with_field("X", "1"));
        assert_eq!(old.unwrap().type_id, "tactic_left");
        assert_eq!(graph.get("b").unwrap().field("X"), Some("1"));
        assert_eq!(graph.len(), 3);
    }

    #[cfg(feature = "use-serde")]
    #[test]
    fn json_list_of_instances() {
        let graph: BlockGraph = serde_json::from_str(
            r#"[
                {"id": "a", "type_id": "tactic_then_container", "nested_head": "b", "next": "c"},
                {"id": "b", "type_id": "tactic_left"},
                {"id": "c", "type_id": "proof_qed"}
            ]"#,
        )
        .unwrap();
        assert_eq!(graph, three());
        let json = serde_json::to_string(&graph).unwrap();
        assert_eq!(serde_json::from_str::<BlockGraph>(&json).unwrap(), graph);
    }
}
