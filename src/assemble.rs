use std::collections::HashSet;

use tracing::{debug, trace, warn};

use crate::{
    error::AssemblyError,
    shape::{BlockShape, FieldRejection},
    tree::{BlockNode, Node, ProofTree},
    BlockGraph, BlockInstance, Registry,
};

/// Tunables of an [`Assembler`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssembleOptions {
    /// Deepest nesting accepted; the top-level chain is depth 0
    pub max_depth: usize,
    /// Reject field values the shape does not declare instead of dropping them
    pub strict_fields: bool,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        AssembleOptions {
            max_depth: 64,
            strict_fields: true,
        }
    }
}

/// Turns block graphs into [`ProofTree`]s, checking them against a [`Registry`]
///
/// ```
/// use proofblocks::{Assembler, BlockGraph, BlockInstance, Registry};
///
/// let registry = Registry::standard().unwrap();
/// let mut graph = BlockGraph::new();
/// graph.insert(BlockInstance::new("1", "proof_assume").with_field("STATEMENT", "x>0"));
/// graph.insert(BlockInstance::new("2", "proof_therefore").with_field("CONCLUSION", "x≠0"));
/// graph.insert(BlockInstance::new("3", "proof_qed"));
/// graph.link_next("1", "2");
/// graph.link_next("2", "3");
///
/// let tree = Assembler::new(&registry).assemble(&graph, "1").unwrap();
/// assert_eq!(tree.root().len(), 3);
/// assert_eq!(tree.root()[1].data().field("CONCLUSION"), Some("x≠0"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Assembler<'r> {
    registry: &'r Registry,
    options: AssembleOptions,
}

/// Assembles the chain starting at `entry` with default options
pub fn assemble(
    graph: &BlockGraph,
    entry: &str,
    registry: &Registry,
) -> Result<ProofTree, AssemblyError> {
    Assembler::new(registry).assemble(graph, entry)
}

impl<'r> Assembler<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self::with_options(registry, AssembleOptions::default())
    }

    pub fn with_options(registry: &'r Registry, options: AssembleOptions) -> Self {
        Assembler { registry, options }
    }

    pub fn options(&self) -> &AssembleOptions {
        &self.options
    }

    /// Builds the proof tree whose top-level sequence starts at `entry`.
    ///
    /// Nothing but the chain below `entry` and the blocks nested in it is looked at. The
    /// first error aborts assembly; no partial tree is returned.
    pub fn assemble(&self, graph: &BlockGraph, entry: &str) -> Result<ProofTree, AssemblyError> {
        self.assemble_from(graph, entry, &mut HashSet::new())
    }

    /// Assembles every top-level chain of the graph (see [`BlockGraph::roots`]), keyed by
    /// the id of its head.
    ///
    /// All chains share one visited set, so a block reachable from two roots is a
    /// `CyclicStructure` error. So is any block no root reaches: it can only sit on a cycle.
    pub fn assemble_all(
        &self,
        graph: &BlockGraph,
    ) -> Result<Vec<(String, ProofTree)>, AssemblyError> {
        let mut visited = HashSet::new();
        let mut trees = Vec::new();
        for root in graph.roots() {
            let tree = self.assemble_from(graph, root, &mut visited)?;
            trees.push((root.to_owned(), tree));
        }
        if let Some(stranded) = graph.iter().find(|i| !visited.contains(i.id.as_str())) {
            return Err(AssemblyError::CyclicStructure {
                instance: stranded.id.clone(),
                type_id: stranded.type_id.clone(),
            });
        }
        Ok(trees)
    }

    fn assemble_from<'g>(
        &self,
        graph: &'g BlockGraph,
        entry: &'g str,
        visited: &mut HashSet<&'g str>,
    ) -> Result<ProofTree, AssemblyError> {
        debug!(entry, blocks = graph.len(), "assembling proof tree");
        if !graph.contains(entry) {
            return Err(AssemblyError::MissingEntry {
                instance: entry.to_owned(),
            });
        }
        let root = self.chain(graph, entry, 0, visited)?;
        let tree = ProofTree::new(root);
        debug!(entry, nodes = tree.len(), "assembled proof tree");
        Ok(tree)
    }

    fn chain<'g>(
        &self,
        graph: &'g BlockGraph,
        head: &'g str,
        depth: usize,
        visited: &mut HashSet<&'g str>,
    ) -> Result<Vec<Node>, AssemblyError> {
        let mut nodes = Vec::new();
        let mut above: Option<(&'g BlockInstance, &'r BlockShape)> = None;
        let mut cursor = Some(head);
        while let Some(id) = cursor {
            let instance = graph.get(id).ok_or_else(|| AssemblyError::MissingInstance {
                instance: id.to_owned(),
                referenced_by: above.map_or(id, |(a, _)| a.id.as_str()).to_owned(),
            })?;
            if !visited.insert(instance.id.as_str()) {
                return Err(AssemblyError::CyclicStructure {
                    instance: id.to_owned(),
                    type_id: instance.type_id.clone(),
                });
            }
            let shape = self.shape_of(instance)?;
            trace!(instance = id, type_id = shape.type_id(), depth, "visiting block");

            if let Some((above, above_shape)) = above {
                if !shape.connects_above() {
                    return Err(AssemblyError::InvalidConnection {
                        above: above.id.clone(),
                        above_type: above_shape.type_id().to_owned(),
                        below: instance.id.clone(),
                        below_type: shape.type_id().to_owned(),
                    });
                }
            }
            if let (false, Some(next)) = (shape.connects_below(), &instance.next) {
                return Err(AssemblyError::DanglingContinuation {
                    instance: instance.id.clone(),
                    type_id: shape.type_id().to_owned(),
                    next: next.clone(),
                });
            }

            let data = self.materialize(instance, shape)?;
            let node = match (shape.has_nested_slot(), instance.nested_head.as_deref()) {
                (true, Some(nested)) => {
                    let child = graph.get(nested).ok_or_else(|| AssemblyError::MissingInstance {
                        instance: nested.to_owned(),
                        referenced_by: instance.id.clone(),
                    })?;
                    if depth + 1 > self.options.max_depth {
                        return Err(AssemblyError::NestingTooDeep {
                            instance: nested.to_owned(),
                            type_id: child.type_id.clone(),
                            depth: depth + 1,
                            limit: self.options.max_depth,
                        });
                    }
                    Node::Block(data, self.chain(graph, nested, depth + 1, visited)?)
                }
                (true, None) => Node::Block(data, Vec::new()),
                (false, Some(_)) => {
                    return Err(AssemblyError::UnexpectedNested {
                        instance: instance.id.clone(),
                        type_id: shape.type_id().to_owned(),
                    })
                }
                (false, None) => Node::Step(data),
            };
            nodes.push(node);
            above = Some((instance, shape));
            cursor = instance.next.as_deref();
        }
        Ok(nodes)
    }

    fn shape_of(&self, instance: &BlockInstance) -> Result<&'r BlockShape, AssemblyError> {
        self.registry
            .lookup(&instance.type_id)
            .map_err(|_| AssemblyError::UnknownType {
                instance: instance.id.clone(),
                type_id: instance.type_id.clone(),
            })
    }

    fn materialize(
        &self,
        instance: &BlockInstance,
        shape: &BlockShape,
    ) -> Result<BlockNode, AssemblyError> {
        let reject = |field: &str, value: &str, reason: FieldRejection| {
            AssemblyError::InvalidFieldValue {
                instance: instance.id.clone(),
                type_id: instance.type_id.clone(),
                field: field.to_owned(),
                value: value.to_owned(),
                reason: reason.to_string(),
            }
        };
        for (name, value) in instance.fields.iter() {
            if shape.field(name).is_none() {
                if self.options.strict_fields {
                    return Err(reject(name, value, FieldRejection::Undeclared));
                }
                warn!(instance = %instance.id, field = %name, "dropping undeclared field");
            }
        }
        let fields = shape
            .fields()
            .iter()
            .map(|spec| {
                let raw = instance.field(&spec.name);
                spec.materialize(raw)
                    .map(|value| (spec.name.clone(), value))
                    .map_err(|reason| reject(&spec.name, raw.unwrap_or_default(), reason))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(BlockNode {
            instance_id: instance.id.clone(),
            type_id: shape.type_id().to_owned(),
            category: shape.category(),
            fields,
        })
    }
}
