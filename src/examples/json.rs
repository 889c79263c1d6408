//! A JSON fragment written with the combinator builder and parsed lexerless,
//! one code point at a time.

use crate::generator::generate_parser;
use crate::grammar::builder::{chars, lit, nt, opt, plus, plus_sep, seq, star, GrammarBuilder};
use crate::runtime::Parser;

/// Objects, arrays, escape-free strings, decimal numbers and the three
/// constants, with insignificant whitespace.
pub fn json_parser() -> Parser {
    let digit = || chars(&[('0', '9')]);
    let ws = || nt("ws");

    let mut builder = GrammarBuilder::new();
    builder.rule("json", vec![seq(vec![ws(), nt("value"), ws()])]);
    builder.rule(
        "value",
        vec![
            nt("object"),
            nt("array"),
            nt("string"),
            nt("number"),
            lit("true"),
            lit("false"),
            lit("null"),
        ],
    );
    builder.rule(
        "object",
        vec![
            seq(vec![lit("{"), ws(), lit("}")]),
            seq(vec![lit("{"), plus_sep(nt("pair"), lit(",")), lit("}")]),
        ],
    );
    builder.rule(
        "pair",
        vec![seq(vec![
            ws(),
            nt("string"),
            ws(),
            lit(":"),
            ws(),
            nt("value"),
            ws(),
        ])],
    );
    builder.rule(
        "array",
        vec![
            seq(vec![lit("["), ws(), lit("]")]),
            seq(vec![lit("["), plus_sep(nt("element"), lit(",")), lit("]")]),
        ],
    );
    builder.rule("element", vec![seq(vec![ws(), nt("value"), ws()])]);
    // Anything but '"', '\' and the C0 controls.
    builder.rule(
        "string",
        vec![seq(vec![
            lit("\""),
            star(chars(&[('\u{20}', '!'), ('#', '['), (']', '\u{10FFFF}')])),
            lit("\""),
        ])],
    );
    builder.rule(
        "number",
        vec![seq(vec![
            opt(lit("-")),
            plus(digit()),
            opt(seq(vec![lit("."), plus(digit())])),
        ])],
    );
    builder.rule("ws", vec![star(chars(&[('\t', '\n'), ('\r', '\r'), (' ', ' ')]))]);

    let (grammar, tags) = builder.build("json").expect("a well-formed grammar");
    let definition = generate_parser("json", &grammar, &tags).expect("a well-formed grammar");
    Parser::new(definition)
}
