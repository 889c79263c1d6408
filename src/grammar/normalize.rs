use super::{Alternative, Grammar, Symbol, Terminal};

impl Grammar {
    /// Remove redundant `Empty` terminals: an alternative made entirely of
    /// them collapses to a single `Empty`, interior ones are dropped.
    pub fn normalize_null(&self) -> Grammar {
        Grammar::new(
            self.start().clone(),
            self.rules().iter().map(|(nonterminal, alternatives)| {
                (
                    nonterminal.clone(),
                    alternatives.iter().map(normalize_alternative).collect(),
                )
            }),
        )
    }

    /// Fuse runs of adjacent literal-like terminals (literals, `Empty`, and
    /// single-code-point classes) into one literal terminal.
    pub fn compress(&self) -> Grammar {
        Grammar::new(
            self.start().clone(),
            self.rules().iter().map(|(nonterminal, alternatives)| {
                (
                    nonterminal.clone(),
                    alternatives.iter().map(compress_alternative).collect(),
                )
            }),
        )
    }
}

fn normalize_alternative(alternative: &Alternative) -> Alternative {
    if alternative.iter().all(Symbol::is_empty_terminal) {
        return vec![Terminal::Empty.into()];
    }
    alternative
        .iter()
        .filter(|symbol| !symbol.is_empty_terminal())
        .cloned()
        .collect()
}

fn compress_alternative(alternative: &Alternative) -> Alternative {
    let mut parts = Vec::new();
    let mut run: Option<String> = None;
    for symbol in alternative {
        match literal_text(symbol) {
            Some(text) => run.get_or_insert_with(String::new).push_str(&text),
            None => {
                if let Some(text) = run.take() {
                    parts.push(Terminal::literal(text).into());
                }
                parts.push(symbol.clone());
            }
        }
    }
    if let Some(text) = run {
        parts.push(Terminal::literal(text).into());
    }
    parts
}

// The text of a symbol which matches exactly one fixed string, if any.
fn literal_text(symbol: &Symbol) -> Option<String> {
    match symbol {
        Symbol::Terminal(Terminal::Empty) => Some(String::new()),
        Symbol::Terminal(Terminal::Literal(text)) => Some(text.clone()),
        Symbol::Terminal(Terminal::Class(set)) => match set.ranges() {
            &[(start, stop)] if start == stop => char::from_u32(start).map(String::from),
            _ => None,
        },
        Symbol::Nonterminal(_) => None,
    }
}
