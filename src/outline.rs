//! Structural pre-check of a proof before it is sent to a checker.

use thiserror::Error;

use crate::{error::RegistryError, fill_template, types::*, ProofTree, Registry};

/// A proof that is well-formed as a tree but not yet shaped like a proof
#[derive(Debug, PartialEq, Eq, Clone, Error)]
pub enum OutlineError {
    #[error("the proof has no steps")]
    Empty,
    #[error("missing an `Assume` or `Suppose` block for the hypotheses")]
    MissingAssumption,
    #[error("missing a `Therefore` or `Then` block for the proof steps")]
    MissingConclusion,
    #[error("missing a `QED` block to conclude the proof")]
    MissingQed,
    #[error("unmatched parentheses in block `{instance}`: {line}")]
    UnbalancedParentheses { instance: InstanceId, line: String },
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

const ASSUMPTIONS: &[&str] = &["proof_assume", "tactic_assume", "tactic_suppose"];
const CONCLUSIONS: &[&str] = &["proof_therefore", "tactic_then"];
const QED: &str = "proof_qed";

fn balanced(text: &str) -> bool {
    text.matches('(').count() == text.matches(')').count()
}

/// Checks that a proof has hypotheses, steps and an end, and that no line of its proof text
/// (see [`render`](crate::render)) has unmatched parentheses.
///
/// Container variants count as their inline symbol. Parentheses may open in one field and
/// close in another of the same block, as in `gcd((a, b))`.
pub fn check_outline(tree: &ProofTree, registry: &Registry) -> Result<(), OutlineError> {
    if tree.is_empty() {
        return Err(OutlineError::Empty);
    }
    let mut has_assumption = false;
    let mut has_conclusion = false;
    let mut has_qed = false;
    for (_, node) in tree.iter() {
        let data = node.data();
        let base = base_type(&data.type_id);
        has_assumption |= ASSUMPTIONS.contains(&base);
        has_conclusion |= CONCLUSIONS.contains(&base);
        has_qed |= base == QED;
        let mut line = String::new();
        fill_template(&mut line, registry.lookup(&data.type_id)?.template(), data);
        if !balanced(&line) {
            return Err(OutlineError::UnbalancedParentheses {
                instance: data.instance_id.clone(),
                line,
            });
        }
    }
    if !has_assumption {
        Err(OutlineError::MissingAssumption)
    } else if !has_conclusion {
        Err(OutlineError::MissingConclusion)
    } else if !has_qed {
        Err(OutlineError::MissingQed)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{assemble, BlockGraph, BlockInstance, Registry};

    fn block(type_id: &str) -> BlockInstance {
        BlockInstance::new("", type_id)
    }

    /// Links `blocks` into one chain with ids `0`, `1`, ... and checks its outline
    fn chain(blocks: Vec<BlockInstance>) -> Result<(), OutlineError> {
        let registry = Registry::standard().unwrap();
        let mut graph = BlockGraph::new();
        for (i, mut instance) in blocks.into_iter().enumerate() {
            instance.id = i.to_string();
            graph.insert(instance);
            if i > 0 {
                graph.link_next(&(i - 1).to_string(), &i.to_string());
            }
        }
        let tree = assemble(&graph, "0", &registry).unwrap();
        check_outline(&tree, &registry)
    }

    #[test]
    fn complete_outline() {
        assert_eq!(
            chain(vec![
                block("tactic_suppose_container"),
                block("tactic_then").with_field("STEP", "f(x) = (x + 1)"),
                block("proof_qed"),
            ]),
            Ok(())
        );
    }

    #[test]
    fn missing_parts_in_order() {
        assert_eq!(
            chain(vec![block("proof_qed")]),
            Err(OutlineError::MissingAssumption)
        );
        assert_eq!(
            chain(vec![block("proof_assume"), block("proof_qed")]),
            Err(OutlineError::MissingConclusion)
        );
        assert_eq!(
            chain(vec![block("proof_assume"), block("proof_therefore")]),
            Err(OutlineError::MissingQed)
        );
        let registry = Registry::standard().unwrap();
        assert_eq!(
            check_outline(&ProofTree::default(), &registry),
            Err(OutlineError::Empty)
        );
    }

    #[test]
    fn parentheses() {
        assert_eq!(
            chain(vec![
                block("proof_assume").with_field("STATEMENT", "f(x"),
                block("proof_therefore"),
                block("proof_qed"),
            ]),
            Err(OutlineError::UnbalancedParentheses {
                instance: "0".to_owned(),
                line: "Assume: f(x".to_owned(),
            })
        );
    }

    #[test]
    fn parentheses_balance_across_fields() {
        assert_eq!(
            chain(vec![
                block("proof_assume"),
                block("arith_gcd")
                    .with_field("LEFT", "(a")
                    .with_field("RIGHT", "b)"),
                block("proof_therefore"),
                block("proof_qed"),
            ]),
            Ok(())
        );
    }

    #[test]
    fn unregistered_type() {
        let tree = {
            let mut registry = Registry::new();
            registry
                .register(crate::BlockShape::new("proof_qed", crate::Category::Proof))
                .unwrap();
            let mut graph = BlockGraph::new();
            graph.insert(BlockInstance::new("q", "proof_qed"));
            assemble(&graph, "q", &registry).unwrap()
        };
        assert_eq!(
            check_outline(&tree, &Registry::new()),
            Err(OutlineError::Registry(RegistryError::UnknownType(
                "proof_qed".to_owned()
            )))
        );
    }
}
