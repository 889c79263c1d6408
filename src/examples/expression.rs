//! A deliberately ambiguous arithmetic expression grammar built directly
//! against the grammar data model.

use crate::generator::generate_parser;
use crate::grammar::{Grammar, Nonterminal, TagMap, Terminal};
use crate::runtime::Parser;

/// `E -> E '+' E | E '*' E | [0-9]`
///
/// Both binary alternatives are left- and right-recursive, so every operator
/// chain has several derivations; the resulting forest shares them below one
/// completed root per span.
pub fn ambiguous_expression_parser() -> Parser {
    let e = Nonterminal::new("E");
    let grammar = Grammar::new(
        e.clone(),
        [(
            e.clone(),
            vec![
                vec![
                    e.clone().into(),
                    Terminal::literal("+").into(),
                    e.clone().into(),
                ],
                vec![
                    e.clone().into(),
                    Terminal::literal("*").into(),
                    e.clone().into(),
                ],
                vec![Terminal::chars([('0', '9')]).into()],
            ],
        )],
    );
    let definition =
        generate_parser("expression", &grammar, &TagMap::new()).expect("a well-formed grammar");
    Parser::new(definition)
}
