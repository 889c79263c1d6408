mod parsing_test;

use crate::generator::generate_parser;
use crate::grammar::{Grammar, TagMap};
use crate::runtime::Parser;

pub(crate) fn build_parser(grammar: &Grammar, tags: &TagMap) -> Parser {
    Parser::new(generate_parser("TestParser", grammar, tags).unwrap())
}

pub(crate) fn assert_parses(parser: &Parser, input: &str) {
    if let Err(error) = parser.parse(input) {
        panic!("expected {:?} to parse, got {}", input, error);
    }
}

pub(crate) fn assert_fails(parser: &Parser, input: &str) {
    if parser.parse(input).is_ok() {
        panic!("expected {:?} to be rejected", input);
    }
}
