use std::collections::hash_map::Entry;
use std::collections::HashMap;

use tracing::debug;

use crate::{catalog, error::RegistryError, BlockShape, Category};

/// The set of block types known to a host
///
/// Shapes are registered once at startup and looked up by type id afterwards. A registry is
/// never mutated while an [`Assembler`](crate::Assembler) borrows it, so any number of
/// assemblies may share one registry across threads.
///
/// ```
/// use proofblocks::{BlockShape, Category, Registry, RegistryError};
///
/// let mut registry = Registry::new();
/// registry.register(BlockShape::new("proof_qed", Category::Proof).terminal()).unwrap();
/// assert!(!registry.lookup("proof_qed").unwrap().connects_below());
/// assert_eq!(
///     registry.register(BlockShape::new("proof_qed", Category::Proof)),
///     Err(RegistryError::DuplicateType("proof_qed".to_owned()))
/// );
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Registry {
    names: HashMap<String, usize>,
    shapes: Vec<BlockShape>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            names: HashMap::new(),
            shapes: Vec::new(),
        }
    }

    /// A registry holding every shape of the built-in [`catalog`]
    pub fn standard() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for shape in catalog::shapes() {
            registry.register(shape)?;
        }
        debug!(shapes = registry.len(), "registered built-in block catalog");
        Ok(registry)
    }

    pub fn register(&mut self, shape: BlockShape) -> Result<(), RegistryError> {
        match self.names.entry(shape.type_id().to_owned()) {
            Entry::Occupied(entry) => Err(RegistryError::DuplicateType(entry.key().clone())),
            Entry::Vacant(entry) => {
                entry.insert(self.shapes.len());
                self.shapes.push(shape);
                Ok(())
            }
        }
    }

    pub fn lookup(&self, type_id: &str) -> Result<&BlockShape, RegistryError> {
        self.get(type_id)
            .ok_or_else(|| RegistryError::UnknownType(type_id.to_owned()))
    }

    pub fn get(&self, type_id: &str) -> Option<&BlockShape> {
        self.names.get(type_id).map(|&index| &self.shapes[index])
    }

    pub fn contains(&self, type_id: &str) -> bool {
        self.names.contains_key(type_id)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// All shapes in registration order
    pub fn iter(&self) -> impl Iterator<Item = &BlockShape> {
        self.shapes.iter()
    }

    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &BlockShape> {
        self.shapes.iter().filter(move |s| s.category() == category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::{Arbitrary, Gen};

    #[test]
    fn standard_catalog_registers() {
        let registry = Registry::standard().unwrap();
        assert_eq!(registry.len(), catalog::shapes().count());
        let forall = registry.lookup("logic_forall_container").unwrap();
        assert_eq!(forall.category(), Category::Logic);
        assert!(forall.has_nested_slot());
        assert_eq!(
            registry.lookup("logic_forall_container_container"),
            Err(RegistryError::UnknownType(
                "logic_forall_container_container".to_owned()
            ))
        );
    }

    #[test]
    fn categories_partition_the_catalog() {
        let registry = Registry::standard().unwrap();
        let total: usize = Category::ALL
            .iter()
            .map(|c| registry.by_category(*c).count())
            .sum();
        assert_eq!(total, registry.len());
        assert_eq!(registry.by_category(Category::Tactic).count(), 26);
    }

    #[test]
    fn duplicate_keeps_first() {
        let mut registry = Registry::new();
        registry
            .register(BlockShape::new("custom_text", Category::Proof).with_text("TEXT", "a"))
            .unwrap();
        assert!(registry
            .register(BlockShape::new("custom_text", Category::Logic))
            .is_err());
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.lookup("custom_text").unwrap().category(),
            Category::Proof
        );
    }

    #[derive(Clone, Debug)]
    struct Shapes(Vec<BlockShape>);

    impl Arbitrary for Shapes {
        fn arbitrary(g: &mut Gen) -> Self {
            let count = usize::arbitrary(g) % 16;
            let shapes = (0..count)
                .map(|i| {
                    let category = *g.choose(&Category::ALL).unwrap();
                    let mut shape = BlockShape::new(&format!("block_{}", i), category);
                    if bool::arbitrary(g) {
                        shape = shape.terminal();
                    }
                    if bool::arbitrary(g) {
                        shape = shape.with_nested_slot();
                    }
                    shape
                })
                .collect();
            Shapes(shapes)
        }
    }

    quickcheck! {
        fn lookup_returns_registered(shapes: Shapes) -> bool {
            let mut registry = Registry::new();
            for shape in shapes.0.iter() {
                registry.register(shape.clone()).unwrap();
            }
            shapes.0.iter().all(|s| registry.lookup(s.type_id()) == Ok(s))
                && registry.iter().eq(shapes.0.iter())
        }
    }
}
