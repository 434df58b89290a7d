/// Type alias for the identifier of a placed block (see
/// [`BlockInstance`][crate::BlockInstance])
pub type InstanceId = String;

/// Type alias for the identifier of a block type (see [`BlockShape`][crate::BlockShape])
pub type TypeId = String;

/// Suffix appended to a symbol's type id to name its container variant
pub const CONTAINER_SUFFIX: &str = "_container";

/// Name of the statement input owned by container blocks
pub const NESTED_SLOT: &str = "NESTED";

/// Strips the container suffix, so `logic_forall_container` and `logic_forall` share a base
pub fn base_type(type_id: &str) -> &str {
    type_id.strip_suffix(CONTAINER_SUFFIX).unwrap_or(type_id)
}
