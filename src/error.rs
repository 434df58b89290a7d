use crate::types::*;
use thiserror::Error;

/// An error produced while building a [`Registry`](crate::Registry)
///
/// These are configuration mistakes: a shape table that produces one of these is broken and
/// the process should not start.
#[derive(Debug, PartialEq, Eq, Clone, Error)]
pub enum RegistryError {
    #[error("block type `{0}` is already registered")]
    DuplicateType(TypeId),
    #[error("block type `{0}` is not registered")]
    UnknownType(TypeId),
}

/// An error produced when a block graph does not form a well-formed proof tree
///
/// Every variant names the offending instance(s) so the host can highlight them. See
/// [`AssemblyError::instances`] and [`AssemblyError::rule`].
#[derive(Debug, PartialEq, Eq, Clone, Error)]
pub enum AssemblyError {
    #[error("block `{instance}` has unregistered type `{type_id}`")]
    UnknownType { instance: InstanceId, type_id: TypeId },

    #[error("block `{below}` ({below_type}) cannot be attached below `{above}` ({above_type})")]
    InvalidConnection {
        above: InstanceId,
        above_type: TypeId,
        below: InstanceId,
        below_type: TypeId,
    },

    #[error("nothing may follow `{instance}` ({type_id}), but `{next}` is attached below it")]
    DanglingContinuation {
        instance: InstanceId,
        type_id: TypeId,
        next: InstanceId,
    },

    #[error("block `{instance}` ({type_id}) is on a cycle or shared; the block graph is not a tree")]
    CyclicStructure { instance: InstanceId, type_id: TypeId },

    #[error("field `{field}` of block `{instance}` ({type_id}) rejects `{value}`: {reason}")]
    InvalidFieldValue {
        instance: InstanceId,
        type_id: TypeId,
        field: String,
        value: String,
        reason: String,
    },

    #[error("block `{referenced_by}` links to `{instance}`, which does not exist")]
    MissingInstance {
        instance: InstanceId,
        referenced_by: InstanceId,
    },

    #[error("block `{instance}` ({type_id}) has no nested slot but holds nested blocks")]
    UnexpectedNested { instance: InstanceId, type_id: TypeId },

    #[error("entry block `{instance}` does not exist")]
    MissingEntry { instance: InstanceId },

    #[error("block `{instance}` ({type_id}) is nested {depth} levels deep, the limit is {limit}")]
    NestingTooDeep {
        instance: InstanceId,
        type_id: TypeId,
        depth: usize,
        limit: usize,
    },
}

impl AssemblyError {
    /// Short name of the violated rule
    pub fn rule(&self) -> &'static str {
        match self {
            AssemblyError::UnknownType { .. } => "unknown-type",
            AssemblyError::InvalidConnection { .. } => "invalid-connection",
            AssemblyError::DanglingContinuation { .. } => "dangling-continuation",
            AssemblyError::CyclicStructure { .. } => "cyclic-structure",
            AssemblyError::InvalidFieldValue { .. } => "invalid-field-value",
            AssemblyError::MissingInstance { .. } => "missing-instance",
            AssemblyError::MissingEntry { .. } => "missing-entry",
            AssemblyError::UnexpectedNested { .. } => "unexpected-nested",
            AssemblyError::NestingTooDeep { .. } => "nesting-too-deep",
        }
    }

    /// The instances the host should highlight, most relevant first
    ///
    /// Empty for [`AssemblyError::MissingEntry`]: there is no block to point at.
    pub fn instances(&self) -> Vec<&str> {
        match self {
            AssemblyError::MissingEntry { .. } => vec![],
            AssemblyError::InvalidConnection { above, below, .. } => {
                vec![below.as_str(), above.as_str()]
            }
            AssemblyError::DanglingContinuation { instance, next, .. } => {
                vec![instance.as_str(), next.as_str()]
            }
            AssemblyError::MissingInstance { referenced_by, .. } => vec![referenced_by.as_str()],
            AssemblyError::UnknownType { instance, .. }
            | AssemblyError::CyclicStructure { instance, .. }
            | AssemblyError::InvalidFieldValue { instance, .. }
            | AssemblyError::UnexpectedNested { instance, .. }
            | AssemblyError::NestingTooDeep { instance, .. } => vec![instance.as_str()],
        }
    }
}
