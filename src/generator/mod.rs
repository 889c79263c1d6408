//! Lowers a [Grammar] plus its disambiguation tags into a
//! [ParserDefinition].
//!
//! Every nonterminal gets a start function which tests the TEST set of each
//! alternative and enqueues a descriptor for the matching ones. Every GLL
//! block of every alternative becomes one straight-line parse function wired
//! into the goto table at the block's start slot. Tags at a position are
//! lowered into the step consuming the symbol at that position: precede
//! checks (and follow checks next to a terminal) become inline disambiguate
//! statements, follow checks next to a nonterminal and all restriction checks
//! are registered as in-pop checks against the return slot and fire when the
//! adjacent nonterminal is popped.

use crate::definition::{
    AmbiguityCheck, AmbiguityCheckId, AmbiguityKind, CheckId, FunctionDefinition, FunctionId,
    InputCheck, NodeTarget, NonterminalId, ParserDefinition, ParserMetadata, SlotDefinition,
    SlotId, Statement,
};
use crate::grammar::{Grammar, Nonterminal, Symbol, TagKind, TagMap, Terminal, UNICODE};
use crate::util::IntSet;
use crate::GrammarError;
use std::collections::{BTreeSet, HashMap};

#[cfg(test)]
mod __tests__;

/// Build the parser definition for a grammar and tag map.
///
/// Fails eagerly on malformed input: undefined nonterminals, empty rules or
/// alternatives, and tags at positions that do not exist.
pub fn generate_parser(
    name: &str,
    grammar: &Grammar,
    tags: &TagMap,
) -> Result<ParserDefinition, GrammarError> {
    grammar.validate()?;
    validate_tags(grammar, tags)?;

    let mut builder = DefinitionBuilder::new(grammar);

    // Declare every nonterminal slot and start function up front so that
    // alternatives can call into rules defined later.
    for nonterminal in grammar.rules().keys() {
        let slot = builder.nonterminal_slot(nonterminal);
        let function = builder.declare_function(format!("parse_{}", nonterminal.name()));
        builder.start_functions.insert(nonterminal.clone(), function);
        builder.goto.insert(slot, function);
    }
    let start_slot = builder.nonterminal_slot(grammar.start());

    for (nonterminal, alternatives) in grammar.rules() {
        let mut start_body = Vec::new();
        for k in 0..alternatives.len() {
            let test = grammar.test_for_sequence(nonterminal, k, 0);
            let checks = builder.test_checks(&test);
            let slot = builder.position_slot(nonterminal, k, 0);
            start_body.push(Statement::Conditional {
                checks,
                body: vec![Statement::Add { slot }],
            });
        }
        let start_function = builder.start_functions[nonterminal];
        builder.functions[start_function.0].body = start_body;

        for (k, alternative) in alternatives.iter().enumerate() {
            let blocks = Grammar::gll_blocks(alternative);
            let last_block = blocks.len() - 1;
            for (block_number, (block_start, block)) in blocks.iter().enumerate() {
                let body = builder.block_statements(
                    nonterminal,
                    k,
                    block,
                    *block_start,
                    block_number,
                    block_number == last_block,
                    true,
                    tags,
                );
                let function_name = if block_number == 0 {
                    format!("parse_{}_alt{}", nonterminal.name(), k)
                } else {
                    format!("parse_{}_alt{}_b{}", nonterminal.name(), k, block_number)
                };
                let function = builder.add_function(function_name, body);
                let slot = builder.position_slot(nonterminal, k, *block_start);
                builder.goto.insert(slot, function);
            }
        }
    }

    Ok(builder.finish(name, start_slot))
}

fn validate_tags(grammar: &Grammar, tags: &TagMap) -> Result<(), GrammarError> {
    for ((nonterminal, alternate, index), tag_list) in tags {
        let position = (nonterminal.name(), *alternate, *index);
        let Some(alternatives) = grammar.rules().get(nonterminal) else {
            return Err(GrammarError::invalid_tag(
                position,
                "the nonterminal has no rule".into(),
            ));
        };
        let Some(alternative) = alternatives.get(*alternate) else {
            return Err(GrammarError::invalid_tag(
                position,
                "the alternative does not exist".into(),
            ));
        };
        let Some(symbol) = alternative.get(*index) else {
            return Err(GrammarError::invalid_tag(
                position,
                "no parser step exists at this position".into(),
            ));
        };
        for tag in tag_list {
            if matches!(tag.kind, TagKind::Restriction) && symbol.is_terminal() {
                return Err(GrammarError::invalid_tag(
                    position,
                    "restriction applies to a nonterminal symbol".into(),
                ));
            }
        }
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum SlotKey {
    Position(NonterminalId, usize, usize),
    Nonterminal(NonterminalId),
}

struct DefinitionBuilder<'g> {
    grammar: &'g Grammar,
    nonterminal_ids: HashMap<Nonterminal, NonterminalId>,
    nonterminals: Vec<String>,
    slot_ids: HashMap<SlotKey, SlotId>,
    slots: Vec<SlotDefinition>,
    input_check_ids: HashMap<InputCheck, CheckId>,
    input_checks: Vec<InputCheck>,
    ambiguity_check_ids: HashMap<AmbiguityCheck, AmbiguityCheckId>,
    ambiguity_checks: Vec<AmbiguityCheck>,
    functions: Vec<FunctionDefinition>,
    start_functions: HashMap<Nonterminal, FunctionId>,
    goto: HashMap<SlotId, FunctionId>,
}

impl<'g> DefinitionBuilder<'g> {
    fn new(grammar: &'g Grammar) -> Self {
        DefinitionBuilder {
            grammar,
            nonterminal_ids: HashMap::new(),
            nonterminals: Vec::new(),
            slot_ids: HashMap::new(),
            slots: Vec::new(),
            input_check_ids: HashMap::new(),
            input_checks: Vec::new(),
            ambiguity_check_ids: HashMap::new(),
            ambiguity_checks: Vec::new(),
            functions: Vec::new(),
            start_functions: HashMap::new(),
            goto: HashMap::new(),
        }
    }

    fn nonterminal_id(&mut self, nonterminal: &Nonterminal) -> NonterminalId {
        if let Some(id) = self.nonterminal_ids.get(nonterminal) {
            return *id;
        }
        let id = NonterminalId(self.nonterminals.len());
        self.nonterminals.push(nonterminal.name().to_owned());
        self.nonterminal_ids.insert(nonterminal.clone(), id);
        id
    }

    fn nonterminal_slot(&mut self, nonterminal: &Nonterminal) -> SlotId {
        let nonterminal_id = self.nonterminal_id(nonterminal);
        let key = SlotKey::Nonterminal(nonterminal_id);
        if let Some(id) = self.slot_ids.get(&key) {
            return *id;
        }
        let id = SlotId(self.slots.len());
        self.slots.push(SlotDefinition {
            name: nonterminal.name().to_owned(),
            nonterminal: nonterminal_id,
            alternate: None,
            position: None,
            alpha_special: false,
            beta_special: false,
        });
        self.slot_ids.insert(key, id);
        id
    }

    fn position_slot(&mut self, nonterminal: &Nonterminal, alternate: usize, position: usize) -> SlotId {
        let nonterminal_id = self.nonterminal_id(nonterminal);
        let key = SlotKey::Position(nonterminal_id, alternate, position);
        if let Some(id) = self.slot_ids.get(&key) {
            return *id;
        }
        let alternative = &self.grammar.alternatives(nonterminal)[alternate];
        let alpha_special = position == 1
            && match &alternative[0] {
                Symbol::Terminal(_) => true,
                Symbol::Nonterminal(head) => !self.grammar.is_nullable(head),
            };
        let beta_special = position == alternative.len();
        let id = SlotId(self.slots.len());
        self.slots.push(SlotDefinition {
            name: format!("{}_alt{}_pos{}", nonterminal.name(), alternate, position),
            nonterminal: nonterminal_id,
            alternate: Some(alternate),
            position: Some(position),
            alpha_special,
            beta_special,
        });
        self.slot_ids.insert(key, id);
        id
    }

    fn input_check_id(&mut self, terminal: &Terminal) -> CheckId {
        let check = match terminal {
            Terminal::Empty => InputCheck::Literal(String::new()),
            Terminal::Literal(text) => InputCheck::Literal(text.clone()),
            Terminal::Class(set) => InputCheck::Range(set.clone()),
        };
        if let Some(id) = self.input_check_ids.get(&check) {
            return *id;
        }
        let id = CheckId(self.input_checks.len());
        self.input_checks.push(check.clone());
        self.input_check_ids.insert(check, id);
        id
    }

    fn test_checks(&mut self, test_set: &BTreeSet<Terminal>) -> Vec<CheckId> {
        test_set
            .iter()
            .map(|terminal| self.input_check_id(terminal))
            .collect()
    }

    fn ambiguity_check_id(&mut self, check: AmbiguityCheck) -> AmbiguityCheckId {
        if let Some(id) = self.ambiguity_check_ids.get(&check) {
            return *id;
        }
        let id = AmbiguityCheckId(self.ambiguity_checks.len());
        self.ambiguity_checks.push(check.clone());
        self.ambiguity_check_ids.insert(check, id);
        id
    }

    fn declare_function(&mut self, name: String) -> FunctionId {
        let id = FunctionId(self.functions.len());
        self.functions.push(FunctionDefinition {
            name,
            body: Vec::new(),
        });
        id
    }

    fn add_function(&mut self, name: String, body: Vec<Statement>) -> FunctionId {
        let id = FunctionId(self.functions.len());
        self.functions.push(FunctionDefinition { name, body });
        id
    }

    /// The statements for the remainder of a GLL block, starting at
    /// `position` inside the alternative.
    fn block_statements(
        &mut self,
        nonterminal: &Nonterminal,
        alternate: usize,
        block: &[Symbol],
        position: usize,
        block_number: usize,
        add_pop: bool,
        first_symbol: bool,
        tags: &TagMap,
    ) -> Vec<Statement> {
        let Some((head, rest)) = block.split_first() else {
            return if add_pop {
                vec![Statement::Pop]
            } else {
                Vec::new()
            };
        };
        let tail = self.block_statements(
            nonterminal,
            alternate,
            rest,
            position + 1,
            block_number,
            add_pop,
            false,
            tags,
        );
        let mut inner = self.ambiguity_statements(nonterminal, alternate, position, tags);
        match head {
            Symbol::Terminal(terminal) => {
                let head_check = self.input_check_id(terminal);
                if first_symbol && block.len() != 1 && block_number == 0 {
                    // The start function's TEST conditional has already
                    // verified this prefix; consume it straight into c_n.
                    inner.push(Statement::NodeT {
                        target: NodeTarget::Current,
                        check: head_check,
                    });
                    inner.extend(tail);
                    inner
                } else {
                    let next_slot = self.position_slot(nonterminal, alternate, position + 1);
                    inner.push(Statement::NodeT {
                        target: NodeTarget::Right,
                        check: head_check,
                    });
                    inner.push(Statement::NodeP { slot: next_slot });
                    inner.extend(tail);
                    vec![Statement::Conditional {
                        checks: vec![head_check],
                        body: inner,
                    }]
                }
            }
            Symbol::Nonterminal(callee) => {
                let return_slot = self.position_slot(nonterminal, alternate, position + 1);
                let function = self.start_functions[callee];
                inner.push(Statement::Create { slot: return_slot });
                inner.push(Statement::Call { function });
                inner.extend(tail);
                if first_symbol {
                    inner
                } else {
                    let test = self.grammar.test(callee);
                    let checks = self.test_checks(&test);
                    vec![Statement::Conditional {
                        checks,
                        body: inner,
                    }]
                }
            }
        }
    }

    /// Lower the tags at `(A, alternate, position)`. Inline checks come back
    /// as disambiguate statements; in-pop checks are only registered.
    fn ambiguity_statements(
        &mut self,
        nonterminal: &Nonterminal,
        alternate: usize,
        position: usize,
        tags: &TagMap,
    ) -> Vec<Statement> {
        let Some(tag_list) = tags.get(&(nonterminal.clone(), alternate, position)) else {
            return Vec::new();
        };
        let return_slot = self.position_slot(nonterminal, alternate, position + 1);
        let symbol_is_terminal =
            self.grammar.alternatives(nonterminal)[alternate][position].is_terminal();
        let mut statements = Vec::new();
        for tag in tag_list {
            let (literals, ranges) = split_terminals(&tag.terminals);
            match tag.kind {
                TagKind::Precede | TagKind::NotPrecede => {
                    let check = self.ambiguity_check_id(AmbiguityCheck {
                        slot: return_slot,
                        kind: AmbiguityKind::Precede,
                        literals,
                        ranges,
                        negated: matches!(tag.kind, TagKind::NotPrecede),
                        in_pop: false,
                    });
                    statements.push(Statement::Disambiguate { check });
                }
                TagKind::Follow | TagKind::NotFollow => {
                    // Next to a terminal the boundary is known inline; next
                    // to a nonterminal it is only known once that
                    // nonterminal has been popped.
                    let in_pop = !symbol_is_terminal;
                    let check = self.ambiguity_check_id(AmbiguityCheck {
                        slot: return_slot,
                        kind: AmbiguityKind::Follow,
                        literals,
                        ranges,
                        negated: matches!(tag.kind, TagKind::NotFollow),
                        in_pop,
                    });
                    if !in_pop {
                        statements.push(Statement::Disambiguate { check });
                    }
                }
                TagKind::Restriction => {
                    self.ambiguity_check_id(AmbiguityCheck {
                        slot: return_slot,
                        kind: AmbiguityKind::Restriction,
                        literals,
                        ranges,
                        negated: false,
                        in_pop: true,
                    });
                }
            }
        }
        statements
    }

    fn finish(self, name: &str, start_slot: SlotId) -> ParserDefinition {
        let mut goto_table = vec![None; self.slots.len()];
        for (slot, function) in self.goto {
            goto_table[slot.0] = Some(function);
        }
        ParserDefinition {
            metadata: ParserMetadata { name: name.into() },
            nonterminals: self.nonterminals,
            slots: self.slots,
            start_slot,
            end_slot: start_slot,
            input_checks: self.input_checks,
            ambiguity_checks: self.ambiguity_checks,
            functions: self.functions,
            goto_table,
        }
    }
}

fn split_terminals(terminals: &[Terminal]) -> (Vec<String>, IntSet) {
    let mut literals = Vec::new();
    let mut ranges = IntSet::empty(UNICODE);
    for terminal in terminals {
        match terminal {
            Terminal::Empty => literals.push(String::new()),
            Terminal::Literal(text) => literals.push(text.clone()),
            Terminal::Class(set) => ranges = ranges.union(set),
        }
    }
    (literals, ranges)
}
