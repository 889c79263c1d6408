//! The context-free grammar data model and its analysis.
//!
//! A [Grammar] maps [Nonterminal]s to alternatives, where each alternative is
//! an ordered sequence of [Symbol]s. Analysis results — the nullable set,
//! FIRST, FOLLOW and TEST sets, and GLL block segmentation — are computed
//! lazily and cached for the lifetime of the grammar, which is immutable after
//! construction.
mod analysis;
mod blocks;
pub mod builder;
mod normalize;

use crate::util::IntSet;
use crate::GrammarError;
use once_cell::unsync::OnceCell;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt::{Display, Formatter};
use std::rc::Rc;

#[cfg(test)]
mod __tests__;

/// The universe of Unicode scalar values, over which character classes and
/// lookahead range sets are defined.
pub const UNICODE: (u32, u32) = (0, 0x10_FF_FF);

#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
/// A terminal symbol of a grammar.
///
/// `Empty` matches the zero-length string, `Literal` a fixed code point
/// sequence, and `Class` exactly one code point contained in its range set.
pub enum Terminal {
    Empty,
    Literal(String),
    Class(IntSet),
}

#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
/// A named nonterminal symbol. Cloning is cheap; the name is shared.
pub struct Nonterminal(Rc<str>);

#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Symbol {
    Terminal(Terminal),
    Nonterminal(Nonterminal),
}

/// One right-hand side of a rule: an ordered sequence of symbols.
pub type Alternative = Vec<Symbol>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// The kind of a disambiguation tag attached to a grammar position.
pub enum TagKind {
    Precede,
    NotPrecede,
    Follow,
    NotFollow,
    Restriction,
}

#[derive(Debug, Clone)]
/// A disambiguation constraint on the input around one grammar position.
///
/// Attached at `(A, k, j)` — the `j`-th position inside the `k`-th alternative
/// of `A`. Precede and follow tags constrain the input read backward
/// respectively forward from the boundary before symbol `j`; restriction tags
/// forbid the nonterminal at symbol `j` from deriving any of the given
/// terminals exactly.
pub struct Tag {
    pub kind: TagKind,
    pub terminals: Vec<Terminal>,
}

/// All disambiguation tags of a grammar, keyed by position.
pub type TagMap = HashMap<(Nonterminal, usize, usize), Vec<Tag>>;

/// A context-free grammar: a start nonterminal plus rules mapping every
/// nonterminal to a non-empty list of alternatives.
pub struct Grammar {
    start: Nonterminal,
    rules: BTreeMap<Nonterminal, Vec<Alternative>>,
    nullables: OnceCell<HashSet<Nonterminal>>,
    first: OnceCell<HashMap<Nonterminal, BTreeSet<Terminal>>>,
    follow: OnceCell<HashMap<Nonterminal, BTreeSet<Terminal>>>,
}

impl Terminal {
    /// A literal terminal. The empty literal is the `Empty` terminal.
    pub fn literal(text: impl Into<String>) -> Terminal {
        let text = text.into();
        if text.is_empty() {
            Terminal::Empty
        } else {
            Terminal::Literal(text)
        }
    }

    /// A character class over the given scalar value ranges.
    pub fn class(ranges: impl IntoIterator<Item = (u32, u32)>) -> Terminal {
        Terminal::Class(IntSet::new(ranges, UNICODE))
    }

    /// A character class over inclusive `char` ranges.
    pub fn chars(ranges: impl IntoIterator<Item = (char, char)>) -> Terminal {
        Terminal::class(
            ranges
                .into_iter()
                .map(|(start, stop)| (start as u32, stop as u32)),
        )
    }

    pub fn is_empty_terminal(&self) -> bool {
        matches!(self, Terminal::Empty)
    }
}

impl Nonterminal {
    pub fn new(name: &str) -> Nonterminal {
        Nonterminal(Rc::from(name))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Symbol {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Symbol::Terminal(_))
    }

    pub fn is_empty_terminal(&self) -> bool {
        matches!(self, Symbol::Terminal(Terminal::Empty))
    }
}

impl From<Terminal> for Symbol {
    fn from(terminal: Terminal) -> Symbol {
        Symbol::Terminal(terminal)
    }
}

impl From<Nonterminal> for Symbol {
    fn from(nonterminal: Nonterminal) -> Symbol {
        Symbol::Nonterminal(nonterminal)
    }
}

impl Grammar {
    pub fn new(
        start: Nonterminal,
        rules: impl IntoIterator<Item = (Nonterminal, Vec<Alternative>)>,
    ) -> Grammar {
        Grammar {
            start,
            rules: rules.into_iter().collect(),
            nullables: OnceCell::new(),
            first: OnceCell::new(),
            follow: OnceCell::new(),
        }
    }

    pub fn start(&self) -> &Nonterminal {
        &self.start
    }

    pub fn rules(&self) -> &BTreeMap<Nonterminal, Vec<Alternative>> {
        &self.rules
    }

    pub fn alternatives(&self, nonterminal: &Nonterminal) -> &[Alternative] {
        match self.rules.get(nonterminal) {
            Some(alternatives) => alternatives,
            None => panic!("no rule for nonterminal {}", nonterminal.name()),
        }
    }

    /// Check that the start symbol and every referenced nonterminal have a
    /// rule, and that no rule or alternative is empty.
    pub fn validate(&self) -> Result<(), GrammarError> {
        if !self.rules.contains_key(&self.start) {
            return Err(GrammarError::undefined_nonterminal(
                self.start.name(),
                "the start symbol",
            ));
        }
        for (nonterminal, alternatives) in &self.rules {
            if alternatives.is_empty() {
                return Err(GrammarError::new(
                    "EmptyRule".into(),
                    format!("Nonterminal {:?} has no alternatives.", nonterminal.name()),
                ));
            }
            for (index, alternative) in alternatives.iter().enumerate() {
                if alternative.is_empty() {
                    return Err(GrammarError::new(
                        "EmptyAlternative".into(),
                        format!(
                            "Alternative {} of {:?} has no symbols; use an Empty terminal instead.",
                            index,
                            nonterminal.name()
                        ),
                    ));
                }
                for symbol in alternative {
                    if let Symbol::Nonterminal(referenced) = symbol {
                        if !self.rules.contains_key(referenced) {
                            return Err(GrammarError::undefined_nonterminal(
                                referenced.name(),
                                nonterminal.name(),
                            ));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

impl Display for Terminal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Terminal::Empty => write!(f, "()"),
            Terminal::Literal(text) => write!(f, "{:?}", text),
            Terminal::Class(set) => write!(f, "[{}]", set),
        }
    }
}

impl Display for Nonterminal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Symbol::Terminal(terminal) => write!(f, "{}", terminal),
            Symbol::Nonterminal(nonterminal) => write!(f, "{}", nonterminal),
        }
    }
}

impl Display for Grammar {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (nonterminal, alternatives) in &self.rules {
            let prefix = if *nonterminal == self.start {
                "start syntax"
            } else {
                "syntax"
            };
            write!(f, "{} {} =", prefix, nonterminal.name())?;
            for (index, alternative) in alternatives.iter().enumerate() {
                if index > 0 {
                    write!(f, " |")?;
                }
                for symbol in alternative {
                    write!(f, " {}", symbol)?;
                }
            }
            writeln!(f, " ;")?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Grammar {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}
