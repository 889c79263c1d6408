//! The GLL runtime: executes a [ParserDefinition] against an input string.
//!
//! A [Parser] owns the immutable definition plus an index of in-pop
//! disambiguation checks. Each call to [parse](Parser::parse) creates fresh
//! mutable state — descriptor worklist, seen-set, popped map, graph-structured
//! stack, forest tables and working registers — and destroys it on return, so
//! a parser can be reused for any number of inputs.
//!
//! Suspension is modelled by enqueueing a descriptor and returning from the
//! current parse function; the main loop resumes the next descriptor by
//! restoring the registers and scanner position. The worklist is FIFO, but
//! correctness does not depend on the order: the seen-set, popped lists and
//! forest canonicalization make processing idempotent under reordering.

mod gss;
pub mod scanner;
pub mod sppf;

#[cfg(test)]
mod __tests__;

use crate::definition::{
    AmbiguityCheck, AmbiguityCheckId, AmbiguityKind, CheckId, FunctionId, InputCheck, NodeTarget,
    ParserDefinition, SlotId, Statement,
};
use crate::forest::ParseForest;
use crate::util::Log;
use crate::ParseError;
use gss::{Gss, GssRef};
use once_cell::unsync::OnceCell;
use scanner::Scanner;
use sppf::{Forest, NodeId, PackedNode, SppfKey, SppfRef};
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// A resumption token: everything needed to re-instate a suspended parse
/// state. Deduplicated structurally through the seen-set.
struct Descriptor {
    slot: SlotId,
    stack: GssRef,
    position: usize,
    node: SppfRef,
}

/// A parser executing a [ParserDefinition].
pub struct Parser {
    definition: Rc<ParserDefinition>,
    pop_checks: HashMap<SlotId, Vec<AmbiguityCheckId>>,
    debugger: OnceCell<Log<&'static str>>,
}

impl Parser {
    pub fn new(definition: ParserDefinition) -> Parser {
        let mut pop_checks: HashMap<SlotId, Vec<AmbiguityCheckId>> = HashMap::new();
        for (index, check) in definition.ambiguity_checks.iter().enumerate() {
            if check.in_pop {
                pop_checks
                    .entry(check.slot)
                    .or_default()
                    .push(AmbiguityCheckId(index));
            }
        }
        Parser {
            definition: Rc::new(definition),
            pop_checks,
            debugger: OnceCell::new(),
        }
    }

    pub fn definition(&self) -> &ParserDefinition {
        &self.definition
    }

    /// Set a log label to trace descriptor processing based on the level of
    /// [Log](crate::util::Log).
    pub fn set_log(&self, debugger: Log<&'static str>) -> Result<(), String> {
        self.debugger.set(debugger).map_err(|_| {
            format!(
                "Log label is already set for parser {}.",
                self.definition.metadata.name
            )
        })
    }

    /// Parse the input, returning the forest of all derivations or a
    /// [ParseError] when the input is not in the language.
    pub fn parse(&self, input: &str) -> Result<ParseForest, ParseError> {
        let mut runtime = Runtime {
            definition: &self.definition,
            pop_checks: &self.pop_checks,
            log: self.debugger.get().copied().unwrap_or(Log::None),
            scanner: Scanner::new(input),
            todo: VecDeque::new(),
            seen: HashSet::new(),
            popped: HashMap::new(),
            gss: Gss::default(),
            forest: Forest::default(),
            c_u: GssRef::root(),
            c_n: SppfRef::Initial,
            c_r: None,
        };
        let input_length = runtime.scanner.len();

        runtime.add(
            self.definition.start_slot,
            GssRef::root(),
            0,
            SppfRef::Initial,
        );
        while let Some(descriptor) = runtime.todo.pop_front() {
            runtime.switch_to(descriptor);
            let function = runtime.goto(descriptor.slot);
            runtime.run(function);
        }

        let end_nonterminal = self.definition.slot(self.definition.end_slot).nonterminal;
        match runtime.forest.completed(end_nonterminal, 0, input_length) {
            Some(root) => {
                #[cfg(debug_assertions)]
                runtime.trace(Log::Result(()).order(), || {
                    format!(
                        "parsed {} code points into {} forest nodes",
                        input_length,
                        runtime.forest.node_count()
                    )
                });
                Ok(ParseForest::new(
                    self.definition.clone(),
                    runtime.forest,
                    root,
                ))
            }
            None => {
                #[cfg(debug_assertions)]
                runtime.trace(Log::Result(()).order(), || {
                    format!("no derivation covers all {} code points", input_length)
                });
                Err(ParseError::new(format!(
                    "failed to parse input with {}",
                    self.definition.metadata.name
                )))
            }
        }
    }
}

/// The per-parse mutable state and the operations of the GLL machine.
struct Runtime<'p> {
    definition: &'p ParserDefinition,
    pop_checks: &'p HashMap<SlotId, Vec<AmbiguityCheckId>>,
    log: Log<&'static str>,
    scanner: Scanner,
    todo: VecDeque<Descriptor>,
    seen: HashSet<Descriptor>,
    popped: HashMap<GssRef, Vec<NodeId>>,
    gss: Gss,
    forest: Forest,
    c_u: GssRef,
    c_n: SppfRef,
    c_r: Option<NodeId>,
}

impl<'p> Runtime<'p> {
    fn switch_to(&mut self, descriptor: Descriptor) {
        #[cfg(debug_assertions)]
        self.trace(Log::Verbose(()).order(), || {
            format!(
                "switch to {} at position {}",
                self.definition.slot(descriptor.slot).name,
                descriptor.position
            )
        });
        self.c_n = descriptor.node;
        self.c_u = descriptor.stack;
        self.c_r = None;
        self.scanner.set_position(descriptor.position);
    }

    fn goto(&self, slot: SlotId) -> FunctionId {
        match self.definition.goto(slot) {
            Some(function) => function,
            None => panic!(
                "no parse function for grammar slot {}",
                self.definition.slot(slot).name
            ),
        }
    }

    fn run(&mut self, function: FunctionId) {
        let definition = self.definition;
        self.execute(&definition.function(function).body);
    }

    // Returns false when a failed disambiguation check aborted the function.
    fn execute(&mut self, statements: &'p [Statement]) -> bool {
        for statement in statements {
            match statement {
                Statement::Conditional { checks, body } => {
                    if checks.iter().any(|check| self.input_check_passes(*check)) {
                        if !self.execute(body) {
                            return false;
                        }
                    }
                }
                Statement::Disambiguate { check } => {
                    if !self.inline_check_passes(*check) {
                        return false;
                    }
                }
                Statement::NodeT { target, check } => {
                    let (symbol, width) = match self.definition.input_check(*check) {
                        InputCheck::Literal(text) => (text.clone(), text.chars().count()),
                        InputCheck::Range(_) => (self.scanner.peek(1), 1),
                    };
                    let left = self.scanner.position();
                    let node = self.forest.terminal_node(&symbol, left, left + width);
                    match target {
                        NodeTarget::Current => self.c_n = SppfRef::Node(node),
                        NodeTarget::Right => self.c_r = Some(node),
                    }
                    self.scanner.advance(width);
                }
                Statement::NodeP { slot } => {
                    let right = match self.c_r {
                        Some(node) => node,
                        None => panic!(
                            "node_p at slot {} without a right operand",
                            self.definition.slot(*slot).name
                        ),
                    };
                    let node = self.get_node_p(*slot, self.c_n, right);
                    self.c_n = SppfRef::Node(node);
                }
                Statement::Create { slot } => {
                    self.c_u = self.create(*slot);
                }
                Statement::Add { slot } => {
                    self.add(*slot, self.c_u, self.scanner.position(), SppfRef::Initial);
                }
                Statement::Call { function } => {
                    let definition = self.definition;
                    if !self.execute(&definition.function(*function).body) {
                        return false;
                    }
                }
                Statement::Pop => self.pop(),
            }
        }
        true
    }

    /// Enqueue a descriptor unless it has been seen before.
    fn add(&mut self, slot: SlotId, stack: GssRef, position: usize, node: SppfRef) {
        let descriptor = Descriptor {
            slot,
            stack,
            position,
            node,
        };
        if self.seen.insert(descriptor) {
            #[cfg(debug_assertions)]
            self.trace(Log::Verbose(()).order(), || {
                format!(
                    "queue descriptor {} at position {}",
                    self.definition.slot(slot).name,
                    position
                )
            });
            self.todo.push_back(descriptor);
        }
    }

    /// Push the return slot onto the GSS at the current position, replaying
    /// previous pops of the same node to the new caller.
    fn create(&mut self, slot: SlotId) -> GssRef {
        let node = GssRef {
            slot: Some(slot),
            position: self.scanner.position(),
        };
        #[cfg(debug_assertions)]
        self.trace(Log::Verbose(()).order(), || {
            format!(
                "create stack node {} at position {}",
                self.definition.slot(slot).name,
                node.position
            )
        });
        if !self.gss.contains(&node) {
            self.gss.add_node(node);
        }
        if !self.gss.has_edge(&node, &self.c_u) {
            self.gss.add_edge(node, self.c_u, self.c_n);
            let previously_popped = self.popped.get(&node).cloned().unwrap_or_default();
            for popped in previously_popped {
                let right_extent = self.forest.node(popped).right_extent();
                let packed = self.get_node_p(slot, self.c_n, popped);
                self.add(slot, self.c_u, right_extent, SppfRef::Node(packed));
            }
        }
        node
    }

    /// Pop the current stack node: record the parsed forest node and resume
    /// every caller, subject to the in-pop checks registered against the
    /// slot. The popped node's position is where the completed nonterminal
    /// began, which is the span the checks receive.
    fn pop(&mut self) {
        if self.c_u.is_root() {
            return;
        }
        let slot = self.c_u.slot.expect("non-root stack nodes carry a slot");
        let node = match self.c_n {
            SppfRef::Node(node) => node,
            SppfRef::Initial => panic!(
                "pop at {} with no parsed node",
                self.definition.slot(slot).name
            ),
        };
        #[cfg(debug_assertions)]
        self.trace(Log::Verbose(()).order(), || {
            format!(
                "pop {} over {}..{}",
                self.definition.slot(slot).name,
                self.c_u.position,
                self.scanner.position()
            )
        });
        self.popped.entry(self.c_u).or_default().push(node);
        let start = self.c_u.position;
        let stop = self.scanner.position();
        let checks: Vec<AmbiguityCheckId> =
            self.pop_checks.get(&slot).cloned().unwrap_or_default();
        let edges = self.gss.edges(&self.c_u).to_vec();
        for (target, label) in edges {
            if !checks
                .iter()
                .all(|check| self.pop_check_passes(*check, start, stop))
            {
                continue;
            }
            let packed = self.get_node_p(slot, label, node);
            self.add(slot, target, stop, SppfRef::Node(packed));
        }
    }

    /// Canonicalize the intermediate node for `slot` over `left` and `right`
    /// and record the packed derivation below it.
    ///
    /// A single-symbol prefix (`alpha_special` without `beta_special`) needs
    /// no intermediate node: the right operand is returned unchanged. A slot
    /// with the dot at the end produces the completed-nonterminal node.
    fn get_node_p(&mut self, slot: SlotId, left: SppfRef, right: NodeId) -> NodeId {
        let slot_definition = self.definition.slot(slot);
        if slot_definition.alpha_special && !slot_definition.beta_special {
            return right;
        }
        let right_node_left = self.forest.node(right).left_extent();
        let right_extent = self.forest.node(right).right_extent();
        let (left_extent, split, packed_left) = match left {
            SppfRef::Node(node) => (
                self.forest.node(node).left_extent(),
                self.forest.node(node).right_extent(),
                Some(node),
            ),
            SppfRef::Initial => (right_node_left, right_node_left, None),
        };
        let key = if slot_definition.beta_special {
            SppfKey::Completed {
                nonterminal: slot_definition.nonterminal,
                left: left_extent,
                right: right_extent,
            }
        } else {
            SppfKey::Partial {
                slot,
                left: left_extent,
                right: right_extent,
            }
        };
        let node = self.forest.intermediate_node(key);
        self.forest.add_packed(
            node,
            PackedNode {
                slot,
                split,
                left: packed_left,
                right,
            },
        );
        node
    }

    fn input_check_passes(&self, check: CheckId) -> bool {
        match self.definition.input_check(check) {
            InputCheck::Literal(text) => self.scanner.has_next(text),
            InputCheck::Range(set) => self
                .scanner
                .peek(1)
                .chars()
                .next()
                .map_or(false, |c| set.contains(c as u32)),
        }
    }

    fn inline_check_passes(&self, id: AmbiguityCheckId) -> bool {
        let check = self.definition.ambiguity_check(id);
        match check.kind {
            AmbiguityKind::Precede => {
                literal_range_match(check, |length| self.scanner.peek_backward(length))
            }
            AmbiguityKind::Follow => {
                literal_range_match(check, |length| self.scanner.peek(length))
            }
            AmbiguityKind::Restriction => {
                panic!("restriction check {} evaluated inline", check.name())
            }
        }
    }

    // In-pop checks receive the span of the completed nonterminal. Follow
    // checks read forward from the span start — the boundary their tag was
    // attached to; restriction checks compare the span itself.
    fn pop_check_passes(&self, id: AmbiguityCheckId, start: usize, stop: usize) -> bool {
        let check = self.definition.ambiguity_check(id);
        match check.kind {
            AmbiguityKind::Follow => {
                literal_range_match(check, |length| self.scanner.peek_at(start, length))
            }
            AmbiguityKind::Restriction => {
                let span = self.scanner.get_slice(start, stop);
                let mut forbidden = check.literals.iter().any(|literal| *literal == span);
                if !forbidden && stop == start + 1 {
                    forbidden = span
                        .chars()
                        .next()
                        .map_or(false, |c| check.ranges.contains(c as u32));
                }
                !forbidden
            }
            AmbiguityKind::Precede => {
                panic!("precede check {} registered as a pop check", check.name())
            }
        }
    }

    #[cfg(debug_assertions)]
    fn trace(&self, minimum: u8, message: impl FnOnce() -> String) {
        if self.log.order() >= minimum {
            println!("[{}; {}]: {}", self.log, self.definition.metadata.name, message());
        }
    }
}

/// True iff any range or literal of the check matches at the peeked
/// position; negation inverts the combined result.
fn literal_range_match(check: &AmbiguityCheck, peek: impl Fn(usize) -> String) -> bool {
    if let Some(c) = peek(1).chars().next() {
        if check.ranges.contains(c as u32) {
            return !check.negated;
        }
    }
    for literal in &check.literals {
        if peek(literal.chars().count()) == *literal {
            return !check.negated;
        }
    }
    check.negated
}
