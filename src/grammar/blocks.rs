use super::{Grammar, Symbol};

impl Grammar {
    /// Divide an alternative into GLL blocks.
    ///
    /// A block is a maximal prefix of one of two shapes: zero or more
    /// terminals followed by one nonterminal, or one or more trailing
    /// terminals. Each entry pairs the block with its start position inside
    /// the alternative. When the alternative ends in a nonterminal, a
    /// synthetic empty tail block at position `alternative.len()` is appended;
    /// it carries the final pop.
    pub fn gll_blocks(alternative: &[Symbol]) -> Vec<(usize, Vec<Symbol>)> {
        let mut blocks = Vec::new();
        let mut start = 0;
        let mut stop = 0;
        let mut last_is_nonterminal = false;
        while start < alternative.len() {
            while stop < alternative.len() && alternative[stop].is_terminal() {
                stop += 1;
            }
            if stop == alternative.len() {
                let block = alternative[start..stop].to_vec();
                last_is_nonterminal = block.last().map_or(false, |s| !s.is_terminal());
                blocks.push((start, block));
                break;
            }
            stop += 1;
            let block = alternative[start..stop].to_vec();
            last_is_nonterminal = true;
            blocks.push((start, block));
            start = stop;
        }
        if last_is_nonterminal {
            blocks.push((alternative.len(), Vec::new()));
        }
        blocks
    }
}
