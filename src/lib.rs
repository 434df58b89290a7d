//! `proofblocks` is the core of a block based proof editor. Proofs are built by snapping blocks
//! together, and this crate turns the resulting graph of blocks into a validated tree that can
//! be rendered to text and handed to a proof checker.
//!
//! # Main data structures
//! There are four main data structures in `proofblocks`: [`BlockShape`]s, the [`Registry`],
//! [`BlockGraph`]s and [`ProofTree`]s.
//!
//! ## Shapes
//! A [`BlockShape`] describes a kind of block: its fields, whether it can have a block above
//! and below it, and whether it owns a nested statement slot. Most proof symbols come in two
//! variants, an inline one carrying fields (_∀ x, P x_) and a container one named
//! `<symbol>_container` that wraps a nested sequence of blocks.
//!
//! ## Registry
//! The [`Registry`] maps type ids to shapes. [`Registry::standard`] contains the standard
//! catalog of proof, logic, set, arithmetic and tactic blocks (see [`catalog`]).
//!
//! ## Block graphs
//! A [`BlockGraph`] is what the editor holds: placed [`BlockInstance`]s, each with field
//! values, an optional `next` block directly below and an optional head of its nested
//! sequence. Nothing about a graph is checked until it is assembled.
//!
//! ## Proof trees
//! A [`ProofTree`] is an ordered forest of [`Node`]s produced by the [`Assembler`]. Every
//! block in it has a registered shape, every connection respects the shapes' connection
//! rules and every field value is one the shape allows.
//!
//! ```
//! use proofblocks::{assemble, render, BlockGraph, BlockInstance, Registry};
//!
//! let registry = Registry::standard().unwrap();
//! let mut graph = BlockGraph::new();
//! graph.insert(BlockInstance::new("a", "proof_assume").with_field("STATEMENT", "n > 1"));
//! graph.insert(BlockInstance::new("t", "proof_therefore").with_field("CONCLUSION", "n ≠ 0"));
//! graph.insert(BlockInstance::new("q", "proof_qed"));
//! graph.link_next("a", "t");
//! graph.link_next("t", "q");
//!
//! let tree = assemble(&graph, "a", &registry).unwrap();
//! assert_eq!(
//!     render(&tree, &registry).unwrap(),
//!     "Assume: n > 1\nTherefore: n ≠ 0\nQED ■\n"
//! );
//! ```

#[cfg(feature = "serialization")]
extern crate nom;
#[cfg(test)]
#[macro_use]
extern crate quickcheck;

mod assemble;
pub mod catalog;
mod config;
pub mod error;
mod instance;
mod outline;
mod registry;
mod render;
#[cfg(feature = "serialization")]
pub mod serialization;
mod shape;
mod tree;
mod types;

pub use assemble::*;
pub use config::*;
pub use error::{AssemblyError, RegistryError};
pub use instance::*;
pub use outline::*;
pub use registry::*;
pub use render::*;
pub use shape::*;
pub use tree::*;
pub use types::*;
