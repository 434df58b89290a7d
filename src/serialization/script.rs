use std::fmt::Write;

use nom::{
    branch::alt,
    bytes::complete::{is_not, tag, take_while1},
    character::complete::{char, space0, space1},
    combinator::{all_consuming, map, opt, value},
    error::context,
    multi::{fold_many0, many0},
    sequence::{delimited, preceded, separated_pair, terminated},
    IResult,
};
use thiserror::Error;
use tracing::debug;

use super::error::{describe, or_fail, GreedyError};
use crate::{tree::Node, types::*, BlockGraph, BlockInstance, ProofTree};

/// One line of a proof script
///
/// ```text
/// @id type_id NAME="value" {
/// }
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Line {
    Block {
        id: Option<InstanceId>,
        type_id: TypeId,
        fields: Vec<(String, String)>,
        /// The line ends in `{` and opens the block's nested slot
        opens: bool,
    },
    Close,
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

impl Line {
    pub fn parse(input: &str) -> Result<Self, nom::Err<GreedyError<&str>>> {
        let (_, line) = or_fail(all_consuming(alt((
            context("close", Self::parse_close),
            context("block", Self::parse_block),
        ))))(input)?;
        Ok(line)
    }

    fn parse_close(input: &str) -> IResult<&str, Line, GreedyError<&str>> {
        let (input, _) = char('}')(input)?;
        let (input, _) = space0(input)?;
        Ok((input, Line::Close))
    }

    fn parse_block(input: &str) -> IResult<&str, Line, GreedyError<&str>> {
        let (input, id) = opt(terminated(
            preceded(char('@'), map(is_not(" \t"), |id: &str| id.to_owned())),
            space1,
        ))(input)?;
        let (input, type_id) = take_while1(is_name_char)(input)?;
        let (input, fields) = many0(preceded(space1, Self::parse_field))(input)?;
        let (input, opens) = map(opt(preceded(space1, char('{'))), |o| o.is_some())(input)?;
        let (input, _) = space0(input)?;
        Ok((
            input,
            Line::Block {
                id,
                type_id: type_id.to_owned(),
                fields,
                opens,
            },
        ))
    }

    fn parse_field(input: &str) -> IResult<&str, (String, String), GreedyError<&str>> {
        separated_pair(
            map(take_while1(is_name_char), |name: &str| name.to_owned()),
            char('='),
            Self::parse_quoted,
        )(input)
    }

    fn parse_quoted(input: &str) -> IResult<&str, String, GreedyError<&str>> {
        delimited(
            char('"'),
            fold_many0(
                alt((
                    is_not("\\\""),
                    value("\"", tag("\\\"")),
                    value("\\", tag("\\\\")),
                    value("\n", tag("\\n")),
                )),
                String::new,
                |mut s, piece: &str| {
                    s.push_str(piece);
                    s
                },
            ),
            char('"'),
        )(input)
    }

    fn serialize_quoted(s: &mut String, text: &str) {
        s.push('"');
        for c in text.chars() {
            match c {
                '"' => s.push_str("\\\""),
                '\\' => s.push_str("\\\\"),
                '\n' => s.push_str("\\n"),
                c => s.push(c),
            }
        }
        s.push('"');
    }

    pub fn serialize(&self, s: &mut String) {
        match self {
            Line::Block {
                id,
                type_id,
                fields,
                opens,
            } => {
                if let Some(id) = id {
                    write!(s, "@{} ", id).unwrap();
                }
                s.push_str(type_id);
                for (name, text) in fields {
                    write!(s, " {}=", name).unwrap();
                    Self::serialize_quoted(s, text);
                }
                if *opens {
                    s.push_str(" {");
                }
            }
            Line::Close => s.push('}'),
        }
    }
}

/// An error in a proof script, with the 1-based line it was found on
#[derive(Debug, PartialEq, Eq, Clone, Error)]
pub enum ScriptError {
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },
    #[error("line {line}: `}}` without an open block")]
    UnmatchedClose { line: usize },
    #[error("line {line}: block is never closed")]
    Unclosed { line: usize },
    #[error("line {line}: id `{id}` is used twice")]
    DuplicateId { line: usize, id: InstanceId },
}

/// A parsed proof script: the block graph and the head of its top-level chain
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct Script {
    pub graph: BlockGraph,
    pub entry: Option<InstanceId>,
}

struct Level {
    parent: Option<InstanceId>,
    last: Option<InstanceId>,
    opened_at: usize,
}

/// Reads a proof script into a block graph.
///
/// Blank lines and lines starting with `#` are skipped. Blocks without an `@id` get `b1`,
/// `b2`, ... in order of appearance. Shapes are not checked here; that is left to the
/// [`Assembler`](crate::Assembler).
///
/// ```
/// use proofblocks::serialization::parse_script;
///
/// let script = parse_script(
///     "tactic_case_container {\n  tactic_left\n  tactic_rfl\n}\n",
/// ).unwrap();
/// assert_eq!(script.entry.as_deref(), Some("b1"));
/// assert_eq!(script.graph.get("b1").unwrap().nested_head.as_deref(), Some("b2"));
/// assert_eq!(script.graph.get("b2").unwrap().next.as_deref(), Some("b3"));
/// ```
pub fn parse_script(input: &str) -> Result<Script, ScriptError> {
    let mut graph = BlockGraph::new();
    let mut entry = None;
    let mut stack: Vec<Level> = Vec::new();
    let mut current = Level {
        parent: None,
        last: None,
        opened_at: 0,
    };
    let mut generated = 0;

    for (index, raw) in input.lines().enumerate() {
        let number = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let line = Line::parse(trimmed).map_err(|e| ScriptError::Syntax {
            line: number,
            message: describe(raw, e),
        })?;
        match line {
            Line::Close => {
                current = stack
                    .pop()
                    .ok_or(ScriptError::UnmatchedClose { line: number })?;
            }
            Line::Block {
                id,
                type_id,
                fields,
                opens,
            } => {
                let id = match id {
                    Some(id) => id,
                    None => loop {
                        generated += 1;
                        let candidate = format!("b{}", generated);
                        if !graph.contains(&candidate) {
                            break candidate;
                        }
                    },
                };
                if graph.contains(&id) {
                    return Err(ScriptError::DuplicateId { line: number, id });
                }
                let mut instance = BlockInstance::new(&id, &type_id);
                instance.fields.extend(fields);
                graph.insert(instance);
                match (&current.last, &current.parent) {
                    (Some(last), _) => graph.link_next(last, &id),
                    (None, Some(parent)) => graph.link_nested(parent, &id),
                    (None, None) => {
                        entry = Some(id.clone());
                        true
                    }
                };
                current.last = Some(id.clone());
                if opens {
                    let level = Level {
                        parent: Some(id),
                        last: None,
                        opened_at: number,
                    };
                    stack.push(std::mem::replace(&mut current, level));
                }
            }
        }
    }
    if !stack.is_empty() {
        return Err(ScriptError::Unclosed {
            line: current.opened_at,
        });
    }
    debug!(blocks = graph.len(), "parsed proof script");
    Ok(Script { graph, entry })
}

/// Writes a proof tree as a script that [`parse_script`] reads back to the same graph
pub fn write_script(tree: &ProofTree) -> String {
    let mut s = String::new();
    write_sequence(&mut s, tree.root(), 0);
    s
}

fn write_sequence(s: &mut String, nodes: &[Node], depth: usize) {
    for node in nodes {
        let data = node.data();
        let indent = "  ".repeat(depth);
        s.push_str(&indent);
        Line::Block {
            id: Some(data.instance_id.clone()),
            type_id: data.type_id.clone(),
            fields: data.fields.clone(),
            opens: node.is_block(),
        }
        .serialize(s);
        s.push('\n');
        if node.is_block() {
            write_sequence(s, node.children(), depth + 1);
            s.push_str(&indent);
            Line::Close.serialize(s);
            s.push('\n');
        }
    }
}
