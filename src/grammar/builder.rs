//! A combinator layer for writing grammars without spelling out every rule.
//!
//! [Expr] values describe alternatives with sequencing, alternation, optional
//! and repeated groups, separated lists, and disambiguation attachments. The
//! [GrammarBuilder] desugars them into a plain [Grammar] plus [TagMap]:
//! every grouping construct becomes a synthetic nonterminal with a mangled
//! name derived from the rule it appears in.
//!
//! # Example
//! ```
//! use gll_pt::grammar::builder::{chars, lit, plus_sep, seq, GrammarBuilder};
//!
//! // list -> '[' digit (',' digit)* ']'
//! let mut builder = GrammarBuilder::new();
//! builder.rule(
//!     "list",
//!     vec![seq(vec![
//!         lit("["),
//!         plus_sep(chars(&[('0', '9')]), lit(",")),
//!         lit("]"),
//!     ])],
//! );
//! let (grammar, tags) = builder.build("list").unwrap();
//! assert!(tags.is_empty());
//! assert_eq!(grammar.rules().len(), 2);
//! ```

use super::{Alternative, Grammar, Nonterminal, Symbol, Tag, TagKind, TagMap, Terminal};
use crate::GrammarError;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
/// One alternative fragment in builder form.
pub enum Expr {
    Symbol(Symbol),
    Sequence(Vec<Expr>),
    Choice(Vec<Expr>),
    Optional(Box<Expr>),
    Star(Box<Expr>),
    Plus(Box<Expr>),
    Repeat {
        expr: Box<Expr>,
        minimum: usize,
        maximum: usize,
    },
    StarSep {
        expr: Box<Expr>,
        separator: Box<Expr>,
    },
    PlusSep {
        expr: Box<Expr>,
        separator: Box<Expr>,
    },
    Tagged {
        expr: Box<Expr>,
        kind: TagKind,
        terminals: Vec<Terminal>,
    },
}

/// A literal terminal.
pub fn lit(text: &str) -> Expr {
    Expr::Symbol(Terminal::literal(text).into())
}

/// A character class over inclusive `char` ranges.
pub fn chars(ranges: &[(char, char)]) -> Expr {
    Expr::Symbol(Terminal::chars(ranges.iter().copied()).into())
}

/// The empty terminal.
pub fn empty() -> Expr {
    Expr::Symbol(Terminal::Empty.into())
}

/// A reference to a nonterminal by name.
pub fn nt(name: &str) -> Expr {
    Expr::Symbol(Nonterminal::new(name).into())
}

pub fn seq(items: Vec<Expr>) -> Expr {
    Expr::Sequence(items)
}

pub fn choice(arms: Vec<Expr>) -> Expr {
    Expr::Choice(arms)
}

/// Zero or one occurrence.
pub fn opt(expr: Expr) -> Expr {
    Expr::Optional(Box::new(expr))
}

/// Zero or more occurrences.
pub fn star(expr: Expr) -> Expr {
    Expr::Star(Box::new(expr))
}

/// One or more occurrences.
pub fn plus(expr: Expr) -> Expr {
    Expr::Plus(Box::new(expr))
}

/// Between `minimum` and `maximum` occurrences.
pub fn repeat(expr: Expr, minimum: usize, maximum: usize) -> Expr {
    Expr::Repeat {
        expr: Box::new(expr),
        minimum,
        maximum,
    }
}

/// Zero or more occurrences separated by `separator`.
pub fn star_sep(expr: Expr, separator: Expr) -> Expr {
    Expr::StarSep {
        expr: Box::new(expr),
        separator: Box::new(separator),
    }
}

/// One or more occurrences separated by `separator`.
pub fn plus_sep(expr: Expr, separator: Expr) -> Expr {
    Expr::PlusSep {
        expr: Box::new(expr),
        separator: Box::new(separator),
    }
}

/// The input before `expr` must end with one of `terminals`.
pub fn precede(expr: Expr, terminals: Vec<Terminal>) -> Expr {
    tagged(expr, TagKind::Precede, terminals)
}

/// The input before `expr` must not end with any of `terminals`.
pub fn not_precede(expr: Expr, terminals: Vec<Terminal>) -> Expr {
    tagged(expr, TagKind::NotPrecede, terminals)
}

/// The input after `expr` must start with one of `terminals`.
pub fn follow(expr: Expr, terminals: Vec<Terminal>) -> Expr {
    tagged(expr, TagKind::Follow, terminals)
}

/// The input after `expr` must not start with any of `terminals`.
pub fn not_follow(expr: Expr, terminals: Vec<Terminal>) -> Expr {
    tagged(expr, TagKind::NotFollow, terminals)
}

/// The nonterminal `expr` must not derive any of `terminals` exactly.
pub fn restrict(expr: Expr, terminals: Vec<Terminal>) -> Expr {
    tagged(expr, TagKind::Restriction, terminals)
}

fn tagged(expr: Expr, kind: TagKind, terminals: Vec<Terminal>) -> Expr {
    Expr::Tagged {
        expr: Box::new(expr),
        kind,
        terminals,
    }
}

/// Accumulates rules in builder form and desugars them into a [Grammar] and
/// its [TagMap].
pub struct GrammarBuilder {
    rules: Vec<(Nonterminal, Vec<Expr>)>,
}

impl GrammarBuilder {
    pub fn new() -> GrammarBuilder {
        GrammarBuilder { rules: Vec::new() }
    }

    /// Add a rule; each entry of `alternatives` becomes one alternative.
    pub fn rule(&mut self, name: &str, alternatives: Vec<Expr>) -> &mut GrammarBuilder {
        self.rules.push((Nonterminal::new(name), alternatives));
        self
    }

    /// Desugar all rules and validate the resulting grammar.
    pub fn build(self, start: &str) -> Result<(Grammar, TagMap), GrammarError> {
        let mut state = BuildState {
            rules: BTreeMap::new(),
            tags: TagMap::new(),
            synthetic: 0,
        };
        for (nonterminal, alternatives) in self.rules {
            state.define(&nonterminal, alternatives)?;
        }
        let grammar = Grammar::new(Nonterminal::new(start), state.rules);
        grammar.validate()?;
        Ok((grammar, state.tags))
    }
}

impl Default for GrammarBuilder {
    fn default() -> Self {
        GrammarBuilder::new()
    }
}

struct BuildState {
    rules: BTreeMap<Nonterminal, Vec<Alternative>>,
    tags: TagMap,
    synthetic: usize,
}

impl BuildState {
    fn fresh(&mut self, base: &str, kind: &str) -> Nonterminal {
        let name = format!("{}__{}{}", base, kind, self.synthetic);
        self.synthetic += 1;
        Nonterminal::new(&name)
    }

    fn define(
        &mut self,
        nonterminal: &Nonterminal,
        alternatives: Vec<Expr>,
    ) -> Result<(), GrammarError> {
        self.rules.entry(nonterminal.clone()).or_default();
        for expr in &alternatives {
            self.add_alternative(nonterminal, expr)?;
        }
        Ok(())
    }

    // Synthetic rules introduced while flattening get fresh names, so the
    // alternative index reserved here stays valid across the recursion.
    fn add_alternative(&mut self, nonterminal: &Nonterminal, expr: &Expr) -> Result<(), GrammarError> {
        self.rules.entry(nonterminal.clone()).or_default();
        let alternate = self.rules[nonterminal].len();
        let mut symbols = Vec::new();
        self.flatten(expr, nonterminal, alternate, &mut symbols)?;
        if symbols.is_empty() {
            symbols.push(Terminal::Empty.into());
        }
        self.rules
            .get_mut(nonterminal)
            .expect("rule entry reserved above")
            .push(symbols);
        Ok(())
    }

    fn flatten(
        &mut self,
        expr: &Expr,
        rule: &Nonterminal,
        alternate: usize,
        out: &mut Vec<Symbol>,
    ) -> Result<(), GrammarError> {
        match expr {
            Expr::Symbol(symbol) => out.push(symbol.clone()),
            Expr::Sequence(items) => {
                for item in items {
                    self.flatten(item, rule, alternate, out)?;
                }
            }
            Expr::Choice(arms) => {
                let name = self.fresh(rule.name(), "choice");
                self.define(&name, arms.clone())?;
                out.push(name.into());
            }
            Expr::Optional(inner) => {
                let name = self.fresh(rule.name(), "opt");
                self.define(&name, vec![(**inner).clone(), empty()])?;
                out.push(name.into());
            }
            Expr::Star(inner) => {
                // R -> inner R | ()
                let name = self.fresh(rule.name(), "star");
                let recursive = seq(vec![(**inner).clone(), Expr::Symbol(name.clone().into())]);
                self.define(&name, vec![recursive, empty()])?;
                out.push(name.into());
            }
            Expr::Plus(inner) => {
                // R -> inner R | inner
                let name = self.fresh(rule.name(), "plus");
                let recursive = seq(vec![(**inner).clone(), Expr::Symbol(name.clone().into())]);
                self.define(&name, vec![recursive, (**inner).clone()])?;
                out.push(name.into());
            }
            Expr::Repeat {
                expr: inner,
                minimum,
                maximum,
            } => {
                if minimum > maximum {
                    return Err(GrammarError::new(
                        "InvalidRepeat".into(),
                        format!(
                            "Repeat bounds {}..={} in rule {:?} are reversed.",
                            minimum,
                            maximum,
                            rule.name()
                        ),
                    ));
                }
                let name = self.fresh(rule.name(), "rep");
                let arms = (*minimum..=*maximum)
                    .map(|count| {
                        if count == 0 {
                            empty()
                        } else {
                            seq(vec![(**inner).clone(); count])
                        }
                    })
                    .collect();
                self.define(&name, arms)?;
                out.push(name.into());
            }
            Expr::StarSep { expr: inner, separator } => {
                // R -> P | (), with P the separated plus list
                let name = self.fresh(rule.name(), "listopt");
                let list = Expr::PlusSep {
                    expr: inner.clone(),
                    separator: separator.clone(),
                };
                self.define(&name, vec![list, empty()])?;
                out.push(name.into());
            }
            Expr::PlusSep { expr: inner, separator } => {
                // R -> inner separator R | inner
                let name = self.fresh(rule.name(), "list");
                let recursive = seq(vec![
                    (**inner).clone(),
                    (**separator).clone(),
                    Expr::Symbol(name.clone().into()),
                ]);
                self.define(&name, vec![recursive, (**inner).clone()])?;
                out.push(name.into());
            }
            Expr::Tagged {
                expr: inner,
                kind,
                terminals,
            } => {
                let before = out.len();
                self.flatten(inner, rule, alternate, out)?;
                let position = match kind {
                    TagKind::Precede | TagKind::NotPrecede => before,
                    TagKind::Follow | TagKind::NotFollow => out.len(),
                    TagKind::Restriction => {
                        let added = &out[before..];
                        if added.len() != 1 || added[0].is_terminal() {
                            return Err(GrammarError::invalid_tag(
                                (rule.name(), alternate, before),
                                "restriction applies to a single nonterminal".into(),
                            ));
                        }
                        before
                    }
                };
                self.tags
                    .entry((rule.clone(), alternate, position))
                    .or_default()
                    .push(Tag {
                        kind: *kind,
                        terminals: terminals.clone(),
                    });
            }
        }
        Ok(())
    }
}
