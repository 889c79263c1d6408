use crate::{GrammarError, ParseError};
use std::fmt::{Display, Formatter};

impl GrammarError {
    pub fn new(what: String, message: String) -> Self {
        Self { message, what }
    }

    pub fn undefined_nonterminal(name: &str, referenced_from: &str) -> Self {
        Self::new(
            "UndefinedNonterminal".into(),
            format!(
                "Nonterminal {:?} is referenced from {:?} but has no rule.",
                name, referenced_from
            ),
        )
    }

    pub fn invalid_tag(position: (&str, usize, usize), message: String) -> Self {
        let (nonterminal, alternate, index) = position;
        Self::new(
            "InvalidTag".into(),
            format!(
                "Tag at ({}, {}, {}): {}",
                nonterminal, alternate, index, message
            ),
        )
    }
}

impl Display for GrammarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "GrammarError: {}-{}", self.what, self.message)
    }
}

impl std::error::Error for GrammarError {}

impl ParseError {
    pub fn new(message: String) -> Self {
        Self { message }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "ParseError: {}", self.message)
    }
}

impl std::error::Error for ParseError {}
