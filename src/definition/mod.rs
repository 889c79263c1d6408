//! The declarative parser definition: the intermediate representation a
//! grammar is lowered into, and the only thing the runtime needs to parse.
//!
//! All tables use dense indices. A [SlotId] addresses a grammar slot
//! `(A, k, j)` — or the synthetic nonterminal slot of `A`, which stands for
//! "any complete parse of A" — inside [ParserDefinition::slots]; check,
//! function and nonterminal handles work the same way. The goto table maps
//! slots to the parse function resuming at that slot.
mod display;

use crate::util::IntSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NonterminalId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CheckId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AmbiguityCheckId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FunctionId(pub(crate) usize);

#[derive(Debug, Clone)]
/// A grammar slot: the cursor `(A, k, j)` in the `k`-th alternative of `A`.
///
/// `alpha_special` holds when the parsed prefix before the dot is a single
/// terminal or non-nullable nonterminal; `beta_special` when the dot sits at
/// the end of the alternative. Both are precomputed because they decide the
/// shape [get_node_p](crate::Parser) gives the forest. The synthetic
/// nonterminal slot of `A` has no alternate or position and is named plainly
/// `A`; positioned slots are named `A_altK_posJ`.
pub struct SlotDefinition {
    pub name: String,
    pub nonterminal: NonterminalId,
    pub alternate: Option<usize>,
    pub position: Option<usize>,
    pub alpha_special: bool,
    pub beta_special: bool,
}

impl SlotDefinition {
    pub fn is_nonterminal_slot(&self) -> bool {
        self.alternate.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// A pure test of the input at the current scanner position.
pub enum InputCheck {
    /// Does the input at the position start with this text?
    Literal(String),
    /// Is the next code point inside this set?
    Range(IntSet),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AmbiguityKind {
    Precede,
    Follow,
    Restriction,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// A disambiguation check, either evaluated inline inside a parse function or
/// — when `in_pop` is set — after the nonterminal ending at its slot has been
/// popped. `slot` is the return slot `(A, k, j+1)` of the position the
/// originating tag was attached to.
pub struct AmbiguityCheck {
    pub slot: SlotId,
    pub kind: AmbiguityKind,
    pub literals: Vec<String>,
    pub ranges: IntSet,
    pub negated: bool,
    pub in_pop: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Which working register a fetched terminal node is assigned to.
pub enum NodeTarget {
    Current,
    Right,
}

#[derive(Debug, Clone)]
/// One step of a parse function.
pub enum Statement {
    /// Run `body` iff any of the input checks passes.
    Conditional {
        checks: Vec<CheckId>,
        body: Vec<Statement>,
    },
    /// Evaluate an inline ambiguity check; abort the function when it fails.
    Disambiguate { check: AmbiguityCheckId },
    /// Fetch the terminal node for the matched input and advance the scanner.
    NodeT { target: NodeTarget, check: CheckId },
    /// Combine the current and right registers into a packed forest node.
    NodeP { slot: SlotId },
    /// Push the return slot onto the graph-structured stack.
    Create { slot: SlotId },
    /// Enqueue a descriptor for the slot at the current position.
    Add { slot: SlotId },
    /// Run the start function of a nonterminal.
    Call { function: FunctionId },
    /// Pop the current stack node, resuming every suspended caller.
    Pop,
}

#[derive(Debug, Clone)]
pub struct FunctionDefinition {
    pub name: String,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone)]
pub struct ParserMetadata {
    pub name: String,
}

#[derive(Debug)]
/// A complete parser in declarative form, as produced by
/// [generate_parser](crate::generator::generate_parser).
///
/// Immutable once built; a [Parser](crate::Parser) only reads it, so one
/// definition can serve any number of parses.
pub struct ParserDefinition {
    pub metadata: ParserMetadata,
    pub nonterminals: Vec<String>,
    pub slots: Vec<SlotDefinition>,
    /// The slot of the initial descriptor; its goto entry is the start
    /// symbol's start function.
    pub start_slot: SlotId,
    /// The slot keying the completion lookup `(start, 0, |input|)`.
    pub end_slot: SlotId,
    pub input_checks: Vec<InputCheck>,
    pub ambiguity_checks: Vec<AmbiguityCheck>,
    pub functions: Vec<FunctionDefinition>,
    /// Parse function per slot, indexed by [SlotId].
    pub goto_table: Vec<Option<FunctionId>>,
}

impl ParserDefinition {
    pub fn slot(&self, id: SlotId) -> &SlotDefinition {
        &self.slots[id.0]
    }

    pub fn nonterminal_name(&self, id: NonterminalId) -> &str {
        &self.nonterminals[id.0]
    }

    pub fn input_check(&self, id: CheckId) -> &InputCheck {
        &self.input_checks[id.0]
    }

    pub fn ambiguity_check(&self, id: AmbiguityCheckId) -> &AmbiguityCheck {
        &self.ambiguity_checks[id.0]
    }

    pub fn function(&self, id: FunctionId) -> &FunctionDefinition {
        &self.functions[id.0]
    }

    pub fn goto(&self, slot: SlotId) -> Option<FunctionId> {
        self.goto_table[slot.0]
    }
}
