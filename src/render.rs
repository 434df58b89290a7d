//! Proof text: the plain-text form of a [`ProofTree`] handed to a downstream checker.

use std::fmt::Write;

use crate::{error::RegistryError, tree::Node, BlockNode, ProofTree, Registry};

/// Fills a shape template, replacing every `{NAME}` with the node's value for `NAME`.
///
/// Placeholders naming no field are kept as written.
pub fn fill_template(s: &mut String, template: &str, node: &BlockNode) {
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        s.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('}').map(|end| (&after[..end], end)) {
            Some((name, end)) => {
                match node.field(name) {
                    Some(value) => s.push_str(value),
                    None => write!(s, "{{{}}}", name).unwrap(),
                }
                rest = &after[end + 1..];
            }
            None => {
                s.push('{');
                rest = after;
            }
        }
    }
    s.push_str(rest);
}

/// Writes one line per node, nested sequences indented by two spaces per level.
///
/// ```
/// use proofblocks::{render, Assembler, BlockGraph, BlockInstance, Registry};
///
/// let registry = Registry::standard().unwrap();
/// let mut graph = BlockGraph::new();
/// graph.insert(BlockInstance::new("f", "logic_forall_container"));
/// graph.insert(
///     BlockInstance::new("g", "arith_gt").with_field("LEFT", "x").with_field("RIGHT", "0"),
/// );
/// graph.insert(BlockInstance::new("q", "proof_qed"));
/// graph.link_nested("f", "g");
/// graph.link_next("f", "q");
///
/// let tree = Assembler::new(&registry).assemble(&graph, "f").unwrap();
/// assert_eq!(render(&tree, &registry).unwrap(), "∀\n  x > 0\nQED ■\n");
/// ```
pub fn render(tree: &ProofTree, registry: &Registry) -> Result<String, RegistryError> {
    let mut s = String::new();
    render_sequence(&mut s, tree.root(), 0, registry)?;
    Ok(s)
}

fn render_sequence(
    s: &mut String,
    nodes: &[Node],
    depth: usize,
    registry: &Registry,
) -> Result<(), RegistryError> {
    for node in nodes {
        let data = node.data();
        let shape = registry.lookup(&data.type_id)?;
        for _ in 0..depth {
            s.push_str("  ");
        }
        fill_template(s, shape.template(), data);
        s.push('\n');
        render_sequence(s, node.children(), depth + 1, registry)?;
    }
    Ok(())
}
