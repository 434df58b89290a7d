//! The canonical block catalog.
//!
//! Every symbol is one [`Row`]. A row produces its inline shape and, when it names a
//! container label, the matching `_container` shape (see
//! [`BlockShape::container_variant`]).

use crate::shape::{BlockShape, Category, FieldSpec};

/// Field declaration inside a catalog row
pub enum FieldDef {
    Text(&'static str, &'static str),
    Choice(&'static str, &'static [(&'static str, &'static str)]),
}

/// One symbol of the catalog
pub struct Row {
    pub type_id: &'static str,
    pub category: Category,
    pub template: &'static str,
    pub fields: &'static [FieldDef],
    pub container: Option<&'static str>,
    pub terminal: bool,
}

use Category::*;
use FieldDef::*;

const CASES: &[(&str, &str)] = &[
    ("zero", "zero"),
    ("step", "step"),
    ("left", "left"),
    ("right", "right"),
    ("other", "other"),
];

const fn row(
    type_id: &'static str,
    category: Category,
    template: &'static str,
    fields: &'static [FieldDef],
    container: Option<&'static str>,
) -> Row {
    Row {
        type_id,
        category,
        template,
        fields,
        container,
        terminal: false,
    }
}

const LEFT_RIGHT_PQ: &[FieldDef] = &[Text("LEFT", "P"), Text("RIGHT", "Q")];
const LEFT_RIGHT_AB: &[FieldDef] = &[Text("LEFT", "a"), Text("RIGHT", "b")];
const LEFT_RIGHT_SETS: &[FieldDef] = &[Text("LEFT", "A"), Text("RIGHT", "B")];
const ELEM_SET: &[FieldDef] = &[Text("ELEM", "x"), Text("SET", "S")];
const BINDER: &[FieldDef] = &[Text("VAR", "x"), Text("EXPR", "P(x)")];
const INDEXED: &[FieldDef] = &[Text("VAR", "i"), Text("EXPR", "expr")];
const SET: &[FieldDef] = &[Text("SET", "A")];
const VALUE_X: &[FieldDef] = &[Text("VALUE", "x")];

pub const ROWS: &[Row] = &[
    // proof
    row("proof_assume", Proof, "Assume: {STATEMENT}", &[Text("STATEMENT", "statement")], Some("Assume:")),
    row("proof_therefore", Proof, "Therefore: {CONCLUSION}", &[Text("CONCLUSION", "conclusion")], Some("Therefore:")),
    Row {
        type_id: "proof_qed",
        category: Proof,
        template: "QED ■",
        fields: &[],
        container: None,
        terminal: true,
    },
    row("custom_text", Proof, "{TEXT}", &[Text("TEXT", "custom text here")], None),
    // logic
    row("logic_forall", Logic, "∀ {VAR}, {EXPR}", BINDER, Some("∀")),
    row("logic_exists", Logic, "∃ {VAR}, {EXPR}", BINDER, Some("∃")),
    row("logic_implies", Logic, "{LEFT} → {RIGHT}", LEFT_RIGHT_PQ, Some("→")),
    row("logic_iff", Logic, "{LEFT} ↔ {RIGHT}", LEFT_RIGHT_PQ, Some("↔")),
    row("logic_not", Logic, "¬{EXPR}", &[Text("EXPR", "P")], Some("¬")),
    row("logic_and", Logic, "{LEFT} ∧ {RIGHT}", LEFT_RIGHT_PQ, Some("∧")),
    row("logic_or", Logic, "{LEFT} ∨ {RIGHT}", LEFT_RIGHT_PQ, Some("∨")),
    row("logic_eq", Logic, "{LEFT} = {RIGHT}", LEFT_RIGHT_AB, Some("=")),
    row("logic_neq", Logic, "{LEFT} ≠ {RIGHT}", LEFT_RIGHT_AB, Some("≠")),
    row("logic_true", Logic, "⊤ (True)", &[], Some("⊤")),
    row("logic_false", Logic, "⊥ (False)", &[], Some("⊥")),
    // sets and relations
    row("set_elem", Set, "{ELEM} ∈ {SET}", ELEM_SET, Some("∈")),
    row("set_not_elem", Set, "{ELEM} ∉ {SET}", ELEM_SET, Some("∉")),
    row("set_subset", Set, "{LEFT} ⊆ {RIGHT}", LEFT_RIGHT_SETS, Some("⊆")),
    row("set_proper_subset", Set, "{LEFT} ⊂ {RIGHT}", LEFT_RIGHT_SETS, Some("⊂")),
    row("set_union", Set, "{LEFT} ∪ {RIGHT}", LEFT_RIGHT_SETS, Some("∪")),
    row("set_intersection", Set, "{LEFT} ∩ {RIGHT}", LEFT_RIGHT_SETS, Some("∩")),
    row("set_difference", Set, "{LEFT} \\ {RIGHT}", LEFT_RIGHT_SETS, Some("\\")),
    row("set_empty", Set, "∅", &[], Some("∅")),
    row("set_naturals", Set, "ℕ (Nat)", &[], None),
    row("set_integers", Set, "ℤ (Int)", &[], None),
    row("set_rationals", Set, "ℚ (Rat)", &[], None),
    row("set_reals", Set, "ℝ (Real)", &[], None),
    row("set_function", Set, "{FUNC}({ARG})", &[Text("FUNC", "f"), Text("ARG", "x")], Some("f(x)")),
    row(
        "set_relation",
        Set,
        "{LEFT} {RELATION} {RIGHT}",
        &[Text("LEFT", "a"), Text("RELATION", "R"), Text("RIGHT", "b")],
        Some("R"),
    ),
    row("set_cartesian", Set, "{LEFT} × {RIGHT}", LEFT_RIGHT_SETS, Some("×")),
    row("set_powerset", Set, "𝒫({SET})", SET, Some("𝒫")),
    row("set_cardinality", Set, "|{SET}|", SET, Some("| |")),
    row("set_complement", Set, "{SET}ᶜ", SET, Some("ᶜ")),
    row("set_compose", Set, "{LEFT} ∘ {RIGHT}", &[Text("LEFT", "f"), Text("RIGHT", "g")], Some("∘")),
    // arithmetic and number theory
    row("arith_add", Arithmetic, "{LEFT} + {RIGHT}", LEFT_RIGHT_AB, Some("+")),
    row("arith_sub", Arithmetic, "{LEFT} - {RIGHT}", LEFT_RIGHT_AB, Some("-")),
    row("arith_mul", Arithmetic, "{LEFT} * {RIGHT}", LEFT_RIGHT_AB, Some("*")),
    row("arith_div", Arithmetic, "{LEFT} / {RIGHT}", LEFT_RIGHT_AB, Some("/")),
    row("arith_pow", Arithmetic, "{BASE} ^ {EXP}", &[Text("BASE", "a"), Text("EXP", "n")], Some("^")),
    row("arith_divides", Arithmetic, "{LEFT} ∣ {RIGHT}", LEFT_RIGHT_AB, Some("∣")),
    row(
        "arith_mod",
        Arithmetic,
        "{LEFT} ≡ {MIDDLE} [MOD {MODULUS}]",
        &[Text("LEFT", "a"), Text("MIDDLE", "b"), Text("MODULUS", "n")],
        Some("≡ [MOD]"),
    ),
    row("arith_le", Arithmetic, "{LEFT} ≤ {RIGHT}", LEFT_RIGHT_AB, Some("≤")),
    row("arith_lt", Arithmetic, "{LEFT} < {RIGHT}", LEFT_RIGHT_AB, Some("<")),
    row("arith_ge", Arithmetic, "{LEFT} ≥ {RIGHT}", LEFT_RIGHT_AB, Some("≥")),
    row("arith_gt", Arithmetic, "{LEFT} > {RIGHT}", LEFT_RIGHT_AB, Some(">")),
    row("arith_gcd", Arithmetic, "gcd({LEFT}, {RIGHT})", LEFT_RIGHT_AB, Some("gcd")),
    row("arith_lcm", Arithmetic, "lcm({LEFT}, {RIGHT})", LEFT_RIGHT_AB, Some("lcm")),
    row("arith_factorial", Arithmetic, "{VALUE}!", &[Text("VALUE", "n")], Some("!")),
    row("arith_floor", Arithmetic, "⌊{VALUE}⌋", VALUE_X, Some("⌊⌋")),
    row("arith_ceiling", Arithmetic, "⌈{VALUE}⌉", VALUE_X, Some("⌈⌉")),
    row("arith_abs", Arithmetic, "|{VALUE}|", VALUE_X, Some("| |")),
    row("arith_sum", Arithmetic, "∑ {VAR}, {EXPR}", INDEXED, Some("∑")),
    row("arith_prod", Arithmetic, "∏ {VAR}, {EXPR}", INDEXED, Some("∏")),
    // proof structuring and tactics
    row("tactic_assume", Tactic, "Assume {VAR} : {PROP}", &[Text("VAR", "h"), Text("PROP", "P")], Some("Assume")),
    row("tactic_suppose", Tactic, "Suppose {VAR} : {PROP}", &[Text("VAR", "h"), Text("PROP", "¬P")], Some("Suppose")),
    row("tactic_case", Tactic, "Case: {CASE}", &[Choice("CASE", CASES)], Some("Case")),
    row("tactic_then", Tactic, "Then: {STEP}", &[Text("STEP", "next step")], Some("Then")),
    row("tactic_let", Tactic, "Let {VAR} := {EXPR}", &[Text("VAR", "x"), Text("EXPR", "expr")], Some("Let")),
    row("tactic_use", Tactic, "Use {WITNESS}", &[Text("WITNESS", "witness")], Some("Use")),
    row("tactic_split", Tactic, "Split", &[], Some("Split")),
    row("tactic_left", Tactic, "Left", &[], Some("Left")),
    row("tactic_right", Tactic, "Right", &[], Some("Right")),
    row("tactic_simp", Tactic, "Simplify", &[], Some("Simplify")),
    row("tactic_rfl", Tactic, "Reflexivity", &[], Some("Reflexivity")),
    row("tactic_contradiction", Tactic, "Contradiction", &[], Some("Contradiction")),
    row("tactic_apply", Tactic, "Apply {THEOREM}", &[Text("THEOREM", "theorem_name")], Some("Apply")),
];

impl Row {
    pub fn shape(&self) -> BlockShape {
        let mut shape = BlockShape::new(self.type_id, self.category).with_template(self.template);
        for field in self.fields {
            shape = shape.with_field(match field {
                Text(name, default) => FieldSpec::text(name, default),
                Choice(name, options) => FieldSpec::choice(name, options),
            });
        }
        if self.terminal {
            shape = shape.terminal();
        }
        shape
    }
}

/// Every shape of the catalog: each inline shape directly followed by its container
/// variant, if any
pub fn shapes() -> impl Iterator<Item = BlockShape> {
    ROWS.iter().flat_map(|row| {
        let shape = row.shape();
        let container = row.container.map(|label| shape.container_variant(label));
        std::iter::once(shape).chain(container)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::*;
    use std::collections::HashSet;

    #[test]
    fn type_ids_are_unique() {
        let mut seen = HashSet::new();
        for shape in shapes() {
            assert!(seen.insert(shape.type_id().to_owned()), "{}", shape.type_id());
        }
        assert_eq!(seen.len(), 66 + 60);
    }

    #[test]
    fn templates_only_name_declared_fields() {
        for shape in shapes() {
            let mut rest = shape.template();
            while let Some(start) = rest.find('{') {
                let end = rest[start..].find('}').unwrap() + start;
                let name = &rest[start + 1..end];
                assert!(shape.field(name).is_some(), "{} in {}", name, shape.type_id());
                rest = &rest[end + 1..];
            }
        }
    }

    #[test]
    fn only_qed_is_terminal() {
        let terminal: Vec<_> = shapes()
            .filter(|s| !s.connects_below())
            .map(|s| s.type_id().to_owned())
            .collect();
        assert_eq!(terminal, vec!["proof_qed"]);
        assert!(shapes().all(|s| s.connects_above()));
    }

    #[test]
    fn containers_have_no_inline_fields() {
        for shape in shapes() {
            let is_container = base_type(shape.type_id()) != shape.type_id();
            assert_eq!(is_container, shape.has_nested_slot(), "{}", shape.type_id());
            if is_container {
                assert!(shape.fields().is_empty());
            }
        }
    }
}
