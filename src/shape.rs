use crate::types::*;
#[cfg(feature = "use-serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// The toolbox category a block belongs to
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug)]
#[cfg_attr(feature = "use-serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "use-serde", serde(rename_all = "snake_case"))]
pub enum Category {
    Proof,
    Logic,
    Set,
    Arithmetic,
    Tactic,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Proof,
        Category::Logic,
        Category::Set,
        Category::Arithmetic,
        Category::Tactic,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Category::Proof => "proof",
            Category::Logic => "logic",
            Category::Set => "set",
            Category::Arithmetic => "arithmetic",
            Category::Tactic => "tactic",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.name() == name)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a field accepts
#[derive(PartialEq, Eq, Clone, Debug)]
#[cfg_attr(feature = "use-serde", derive(Serialize, Deserialize))]
pub enum FieldKind {
    /// Opaque text with a default shown in a freshly placed block
    FreeText(String),
    /// A closed set of `(label, value)` options; the stored value is the second element
    Choice(Vec<(String, String)>),
}

/// A named field of a [`BlockShape`]
#[derive(PartialEq, Eq, Clone, Debug)]
#[cfg_attr(feature = "use-serde", derive(Serialize, Deserialize))]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
}

/// Why a raw field value was refused
#[derive(PartialEq, Eq, Clone, Debug)]
pub enum FieldRejection {
    NotAnOption(Vec<String>),
    Undeclared,
}

impl fmt::Display for FieldRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldRejection::NotAnOption(options) => {
                write!(f, "expected one of [{}]", options.join(", "))
            }
            FieldRejection::Undeclared => f.write_str("the block declares no such field"),
        }
    }
}

impl FieldSpec {
    pub fn text(name: &str, default: &str) -> Self {
        FieldSpec {
            name: name.to_owned(),
            kind: FieldKind::FreeText(default.to_owned()),
        }
    }

    pub fn choice(name: &str, options: &[(&str, &str)]) -> Self {
        FieldSpec {
            name: name.to_owned(),
            kind: FieldKind::Choice(
                options
                    .iter()
                    .map(|(label, value)| ((*label).to_owned(), (*value).to_owned()))
                    .collect(),
            ),
        }
    }

    /// The value a freshly placed block shows
    pub fn default_value(&self) -> &str {
        match &self.kind {
            FieldKind::FreeText(default) => default,
            FieldKind::Choice(options) => options.first().map(|(_, v)| v.as_str()).unwrap_or(""),
        }
    }

    /// Turns the raw value entered by the user into the value stored in a proof tree.
    ///
    /// Free text is passed through untouched, a missing value falls back to the default.
    ///
    /// # Example
    /// ```
    /// use proofblocks::FieldSpec;
    ///
    /// let case = FieldSpec::choice("CASE", &[("zero", "zero"), ("step", "step")]);
    /// assert_eq!(case.materialize(None).unwrap(), "zero");
    /// assert_eq!(case.materialize(Some("step")).unwrap(), "step");
    /// assert!(case.materialize(Some("left")).is_err());
    /// ```
    pub fn materialize(&self, raw: Option<&str>) -> Result<String, FieldRejection> {
        let raw = match raw {
            Some(raw) => raw,
            None => return Ok(self.default_value().to_owned()),
        };
        match &self.kind {
            FieldKind::FreeText(_) => Ok(raw.to_owned()),
            FieldKind::Choice(options) => {
                if options.iter().any(|(_, value)| value == raw) {
                    Ok(raw.to_owned())
                } else {
                    Err(FieldRejection::NotAnOption(
                        options.iter().map(|(_, v)| v.clone()).collect(),
                    ))
                }
            }
        }
    }
}

/// Describes one kind of block: its fields, how it connects and whether it owns a nested
/// sequence.
///
/// Shapes are built with the `with_*` methods and registered once in a
/// [`Registry`](crate::Registry).
///
/// ```
/// use proofblocks::{BlockShape, Category};
///
/// let qed = BlockShape::new("proof_qed", Category::Proof).terminal();
/// assert!(qed.connects_above());
/// assert!(!qed.connects_below());
///
/// let forall = BlockShape::new("logic_forall", Category::Logic)
///     .with_text("VAR", "x")
///     .with_text("EXPR", "P(x)");
/// let container = forall.container_variant("∀");
/// assert_eq!(container.type_id(), "logic_forall_container");
/// assert!(container.has_nested_slot());
/// assert!(container.fields().is_empty());
/// ```
#[derive(PartialEq, Eq, Clone, Debug)]
#[cfg_attr(feature = "use-serde", derive(Serialize, Deserialize))]
pub struct BlockShape {
    type_id: TypeId,
    category: Category,
    fields: Vec<FieldSpec>,
    connects_above: bool,
    connects_below: bool,
    nested_slot: Option<String>,
    template: String,
}

impl BlockShape {
    /// A plain statement block: connects above and below, no fields, no nested slot
    pub fn new(type_id: &str, category: Category) -> Self {
        BlockShape {
            type_id: type_id.to_owned(),
            category,
            fields: Vec::new(),
            connects_above: true,
            connects_below: true,
            nested_slot: None,
            template: String::new(),
        }
    }

    pub fn with_text(mut self, name: &str, default: &str) -> Self {
        self.fields.push(FieldSpec::text(name, default));
        self
    }

    pub fn with_choice(mut self, name: &str, options: &[(&str, &str)]) -> Self {
        self.fields.push(FieldSpec::choice(name, options));
        self
    }

    pub fn with_field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_nested_slot(mut self) -> Self {
        self.nested_slot = Some(NESTED_SLOT.to_owned());
        self
    }

    pub fn with_template(mut self, template: &str) -> Self {
        self.template = template.to_owned();
        self
    }

    /// Nothing may be attached below this block
    pub fn terminal(mut self) -> Self {
        self.connects_below = false;
        self
    }

    /// Nothing may be attached above this block
    pub fn detached_above(mut self) -> Self {
        self.connects_above = false;
        self
    }

    /// The container variant of this symbol: same category and connections, no inline
    /// fields, one nested slot in their place
    pub fn container_variant(&self, label: &str) -> Self {
        BlockShape {
            type_id: format!("{}{}", self.type_id, CONTAINER_SUFFIX),
            category: self.category,
            fields: Vec::new(),
            connects_above: self.connects_above,
            connects_below: self.connects_below,
            nested_slot: Some(NESTED_SLOT.to_owned()),
            template: label.to_owned(),
        }
    }

    pub fn type_id(&self) -> &str {
        &self.type_id
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn connects_above(&self) -> bool {
        self.connects_above
    }

    pub fn connects_below(&self) -> bool {
        self.connects_below
    }

    pub fn nested_slot(&self) -> Option<&str> {
        self.nested_slot.as_deref()
    }

    pub fn has_nested_slot(&self) -> bool {
        self.nested_slot.is_some()
    }

    pub fn template(&self) -> &str {
        &self.template
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_text_is_opaque() {
        let field = FieldSpec::text("STATEMENT", "statement");
        assert_eq!(field.materialize(None).unwrap(), "statement");
        assert_eq!(field.materialize(Some("")).unwrap(), "");
        assert_eq!(field.materialize(Some("∀ x, x ≠ x + 1")).unwrap(), "∀ x, x ≠ x + 1");
    }

    #[test]
    fn choice_matches_values_not_labels() {
        let field = FieldSpec::choice("SIDE", &[("Left side", "l"), ("Right side", "r")]);
        assert_eq!(field.default_value(), "l");
        assert_eq!(field.materialize(Some("r")).unwrap(), "r");
        assert_eq!(
            field.materialize(Some("Left side")),
            Err(FieldRejection::NotAnOption(vec!["l".to_owned(), "r".to_owned()]))
        );
    }

    #[test]
    fn container_keeps_connections() {
        let shape = BlockShape::new("tactic_case", Category::Tactic)
            .with_choice("CASE", &[("zero", "zero")])
            .with_template("Case: {CASE}");
        let container = shape.container_variant("Case");
        assert_eq!(container.category(), Category::Tactic);
        assert_eq!(container.nested_slot(), Some(NESTED_SLOT));
        assert!(container.connects_above() && container.connects_below());
        assert_eq!(container.template(), "Case");
        assert!(!shape.has_nested_slot());
    }

    #[test]
    fn category_names() {
        for category in Category::ALL.iter() {
            assert_eq!(Category::from_name(category.name()), Some(*category));
        }
        assert_eq!(Category::from_name("geometry"), None);
    }
}
