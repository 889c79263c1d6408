//! gll_pt is a library to generate general context-free parsers based on the GLL
//! (Generalized LL) algorithm, producing a binary-subtree Shared Packed Parse
//! Forest ([SPPF](ParseForest)) of every derivation of the input.
//!
//! # Overview
//! Most parser tools restrict the accepted grammar class (LL(k), LALR, PEG) to keep
//! parsing deterministic, and reject ambiguous or left-recursive rules outright.
//! This library takes the opposite route: any context-free grammar is accepted —
//! ambiguous, left-recursive and nullable productions included — and the parser
//! returns a compact shared forest of *all* derivations, or a [ParseError] when the
//! input is not in the language.
//!
//! # Design
//!
//! A grammar is plain data: a start [Nonterminal](grammar::Nonterminal) and a
//! mapping from nonterminals to alternatives over [Symbol](grammar::Symbol)s, where
//! terminals are exact literals or character classes ([Terminal](grammar::Terminal)).
//! The [Grammar](grammar::Grammar) computes nullability, FIRST, FOLLOW and TEST
//! sets and segments alternatives into GLL blocks. From a grammar and an optional
//! map of disambiguation tags (precede, follow and restriction constraints),
//! [generate_parser](generator::generate_parser) lowers everything into a
//! declarative [ParserDefinition](definition::ParserDefinition): grammar slots,
//! input checks, ambiguity checks, straight-line parse functions and a goto table.
//! A [Parser] executes that definition against an input string with the GLL
//! machinery — descriptor worklist, graph-structured stack and SPPF node tables.
//!
//! Grammars can be written directly against the data model, or through the
//! combinator layer in [grammar::builder] which desugars alternation, repetition
//! and look-around constraints into plain rules.
//!
//! # Example
//!
//! ```
//! use gll_pt::generator::generate_parser;
//! use gll_pt::grammar::{Grammar, Nonterminal, Terminal};
//! use gll_pt::Parser;
//!
//! // S -> 'a' S | 'b'
//! let s = Nonterminal::new("S");
//! let grammar = Grammar::new(
//!     s.clone(),
//!     [(
//!         s.clone(),
//!         vec![
//!             vec![Terminal::literal("a").into(), s.clone().into()],
//!             vec![Terminal::literal("b").into()],
//!         ],
//!     )],
//! );
//!
//! let definition = generate_parser("recursion", &grammar, &Default::default()).unwrap();
//! let parser = Parser::new(definition);
//!
//! let forest = parser.parse("aab").unwrap();
//! forest.print().unwrap();
//! assert!(parser.parse("ba").is_err());
//! ```
//!
//! Disambiguation tags veto derivations based on the input surrounding a grammar
//! position. Below, the recursive alternative may not continue into a `'b'`:
//!
//! ```
//! use gll_pt::generator::generate_parser;
//! use gll_pt::grammar::builder::{lit, not_follow, nt, seq, GrammarBuilder};
//! use gll_pt::grammar::Terminal;
//! use gll_pt::Parser;
//!
//! // S -> 'a' S | 'b' | 'c', where 'a' must not be followed by 'b'
//! let mut builder = GrammarBuilder::new();
//! builder.rule(
//!     "S",
//!     vec![
//!         seq(vec![not_follow(lit("a"), vec![Terminal::literal("b")]), nt("S")]),
//!         lit("b"),
//!         lit("c"),
//!     ],
//! );
//! let (grammar, tags) = builder.build("S").unwrap();
//!
//! let parser = Parser::new(generate_parser("lookahead", &grammar, &tags).unwrap());
//! assert!(parser.parse("aac").is_ok());
//! assert!(parser.parse("b").is_ok());
//! assert!(parser.parse("aab").is_err());
//! ```

//! # License
//! [gll_pt](crate) is provided under the MIT license.
mod error;
mod forest;
mod trees;

pub mod definition;
pub mod examples;
pub mod generator;
pub mod grammar;
pub mod runtime;
pub mod util;

pub use crate::forest::ParseForest;
pub use crate::runtime::Parser;
pub use crate::trees::ForestView;

#[derive(Debug)]
/// An error returned due to failed validation of a grammar, a tag map, or a
/// parser definition.
///
/// Grammar errors are raised eagerly while building a
/// [ParserDefinition](crate::definition::ParserDefinition), before any input is
/// seen: referencing an undefined nonterminal, supplying an empty alternative
/// list, or attaching a tag to a position that does not exist all fail here.
pub struct GrammarError {
    message: String,
    what: String,
}

#[derive(Debug, Clone)]
/// An error returned when the parser failed to derive the input from the grammar.
///
/// The parse worklist ran dry without producing a completed forest node spanning
/// the whole input. No partial tree and no failure position are reported.
pub struct ParseError {
    pub message: String,
}
