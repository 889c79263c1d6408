//! A small expression language showing disambiguation tags doing real work:
//! identifiers are arbitrary letter runs except the reserved words, enforced
//! with a restriction tag instead of extra grammar rules.

use crate::generator::generate_parser;
use crate::grammar::builder::{chars, lit, nt, plus, restrict, seq, GrammarBuilder};
use crate::grammar::Terminal;
use crate::runtime::Parser;

/// `expr -> expr '+' expr | ident | int`, where `ident` may not be one of the
/// reserved words `let` and `in`.
///
/// The restriction fires on the exact span the identifier covers, so `letter`
/// and `input` stay valid identifiers while `let` and `in` are rejected.
pub fn reserved_word_expression_parser() -> Parser {
    let mut builder = GrammarBuilder::new();
    builder.rule(
        "expr",
        vec![
            seq(vec![nt("expr"), lit("+"), nt("expr")]),
            restrict(
                nt("ident"),
                vec![Terminal::literal("let"), Terminal::literal("in")],
            ),
            nt("int"),
        ],
    );
    builder.rule("ident", vec![plus(chars(&[('a', 'z')]))]);
    builder.rule("int", vec![plus(chars(&[('0', '9')]))]);

    let (grammar, tags) = builder.build("expr").expect("a well-formed grammar");
    let definition = generate_parser("reserved", &grammar, &tags).expect("a well-formed grammar");
    Parser::new(definition)
}
