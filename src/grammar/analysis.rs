use super::{Alternative, Grammar, Nonterminal, Symbol, Terminal};
use crate::util::Relation;
use std::collections::{BTreeSet, HashMap, HashSet};

impl Grammar {
    /// Whether the nonterminal can derive the empty string.
    pub fn is_nullable(&self, nonterminal: &Nonterminal) -> bool {
        self.nullables().contains(nonterminal)
    }

    /// The set of nullable nonterminals, computed by fixed-point iteration:
    /// a nonterminal is nullable iff some alternative consists entirely of
    /// `Empty` terminals and nullable nonterminals.
    pub fn nullables(&self) -> &HashSet<Nonterminal> {
        self.nullables.get_or_init(|| {
            let mut nullables: HashSet<Nonterminal> = HashSet::new();
            loop {
                let additions: Vec<Nonterminal> = self
                    .rules()
                    .iter()
                    .filter(|(nonterminal, alternatives)| {
                        !nullables.contains(*nonterminal)
                            && alternatives
                                .iter()
                                .any(|alternative| alternative_is_nullable(alternative, &nullables))
                    })
                    .map(|(nonterminal, _)| nonterminal.clone())
                    .collect();
                if additions.is_empty() {
                    break;
                }
                nullables.extend(additions);
            }
            nullables
        })
    }

    /// FIRST of a single symbol. For a terminal this is the terminal itself;
    /// for a nonterminal it is read from the FIRST table.
    pub fn first(&self, symbol: &Symbol) -> BTreeSet<Terminal> {
        match symbol {
            Symbol::Terminal(terminal) => BTreeSet::from([terminal.clone()]),
            Symbol::Nonterminal(nonterminal) => self
                .first_table()
                .get(nonterminal)
                .cloned()
                .unwrap_or_default(),
        }
    }

    // first(x) is computed by considering the transitive closure of the
    // begins-with relation R: x R y iff some alternative of x starts with y
    // after a nullable prefix. The closure projected onto terminals is the
    // FIRST table.
    fn first_table(&self) -> &HashMap<Nonterminal, BTreeSet<Terminal>> {
        self.first.get_or_init(|| {
            let relation = Relation::new(self.begins_with_pairs());
            let closure = relation.transitive_closure().as_map();
            self.rules()
                .keys()
                .map(|nonterminal| {
                    let first = closure
                        .get(&Symbol::Nonterminal(nonterminal.clone()))
                        .map(|related| {
                            related
                                .iter()
                                .filter_map(|symbol| match symbol {
                                    Symbol::Terminal(terminal) => Some(terminal.clone()),
                                    Symbol::Nonterminal(_) => None,
                                })
                                .collect()
                        })
                        .unwrap_or_default();
                    (nonterminal.clone(), first)
                })
                .collect()
        })
    }

    fn begins_with_pairs(&self) -> HashSet<(Symbol, Symbol)> {
        let mut pairs = HashSet::new();
        for (nonterminal, alternatives) in self.rules() {
            let left = Symbol::Nonterminal(nonterminal.clone());
            for alternative in alternatives {
                let mut completed = true;
                for symbol in alternative {
                    match symbol {
                        Symbol::Nonterminal(inner) => {
                            pairs.insert((left.clone(), symbol.clone()));
                            if !self.is_nullable(inner) {
                                completed = false;
                                break;
                            }
                        }
                        Symbol::Terminal(Terminal::Empty) => {
                            pairs.insert((left.clone(), Terminal::Empty.into()));
                        }
                        Symbol::Terminal(_) => {
                            pairs.insert((left.clone(), symbol.clone()));
                            completed = false;
                            break;
                        }
                    }
                }
                if completed {
                    pairs.insert((left.clone(), Terminal::Empty.into()));
                }
            }
        }
        pairs
    }

    /// FOLLOW of a nonterminal.
    pub fn follow(&self, nonterminal: &Nonterminal) -> BTreeSet<Terminal> {
        self.follow_table()
            .get(nonterminal)
            .cloned()
            .unwrap_or_default()
    }

    // Two steps. First, seed FOLLOW(y) with the FIRST sets of whatever can
    // directly follow y, and record the subsumption pair follow(x) <= follow(y)
    // whenever y ends an alternative of x up to nullable material. Second,
    // close the table under the subsumption pairs by fixed-point iteration.
    fn follow_table(&self) -> &HashMap<Nonterminal, BTreeSet<Terminal>> {
        self.follow.get_or_init(|| {
            let mut mapping: HashMap<Nonterminal, BTreeSet<Terminal>> = self
                .rules()
                .keys()
                .map(|nonterminal| (nonterminal.clone(), BTreeSet::new()))
                .collect();
            let mut subsumptions: HashSet<(Nonterminal, Nonterminal)> = HashSet::new();

            for (nonterminal, alternatives) in self.rules() {
                for alternative in alternatives {
                    for (index, symbol) in alternative.iter().enumerate() {
                        let Symbol::Nonterminal(followed) = symbol else {
                            continue;
                        };
                        let remainder = &alternative[index + 1..];
                        if remainder.is_empty() {
                            subsumptions.insert((nonterminal.clone(), followed.clone()));
                            continue;
                        }
                        let mut nullable_remainder = true;
                        for remainder_symbol in remainder {
                            let first = self.first(remainder_symbol);
                            let entry = mapping
                                .get_mut(followed)
                                .expect("every nonterminal is seeded in the follow table");
                            entry.extend(
                                first
                                    .iter()
                                    .filter(|terminal| !terminal.is_empty_terminal())
                                    .cloned(),
                            );
                            if !first.contains(&Terminal::Empty) {
                                nullable_remainder = false;
                                break;
                            }
                        }
                        if nullable_remainder {
                            subsumptions.insert((nonterminal.clone(), followed.clone()));
                        }
                    }
                }
            }

            loop {
                let mut changed = false;
                for (x, y) in &subsumptions {
                    let source = mapping.get(x).cloned().unwrap_or_default();
                    let target = mapping
                        .get_mut(y)
                        .expect("every nonterminal is seeded in the follow table");
                    if !source.is_subset(target) {
                        target.extend(source);
                        changed = true;
                    }
                }
                if !changed {
                    break;
                }
            }

            mapping
        })
    }

    /// The TEST set of a nonterminal: FIRST, extended with FOLLOW when the
    /// nonterminal is nullable.
    pub fn test(&self, nonterminal: &Nonterminal) -> BTreeSet<Terminal> {
        let mut first = self.first(&Symbol::Nonterminal(nonterminal.clone()));
        if first.contains(&Terminal::Empty) {
            first.extend(self.follow(nonterminal));
        }
        first
    }

    /// FIRST of the alternative suffix starting at `index`: union the FIRST
    /// sets minus `Empty`, stopping at the first non-nullable symbol; if the
    /// walk completes, `Empty` is included.
    pub fn first_for_sequence(
        &self,
        nonterminal: &Nonterminal,
        alternate: usize,
        index: usize,
    ) -> BTreeSet<Terminal> {
        let sequence = &self.alternatives(nonterminal)[alternate][index..];
        let mut first = BTreeSet::new();
        let mut completed = true;
        for symbol in sequence {
            let addition = self.first(symbol);
            let continues = addition.contains(&Terminal::Empty);
            first.extend(
                addition
                    .into_iter()
                    .filter(|terminal| !terminal.is_empty_terminal()),
            );
            if !continues {
                completed = false;
                break;
            }
        }
        if completed {
            first.insert(Terminal::Empty);
        }
        first
    }

    /// What can follow the symbol at `index` inside its alternative: FIRST of
    /// the remainder, extended with FOLLOW of the rule's nonterminal when the
    /// remainder is nullable.
    pub fn follow_for_sequence(
        &self,
        nonterminal: &Nonterminal,
        alternate: usize,
        index: usize,
    ) -> BTreeSet<Terminal> {
        let sequence = &self.alternatives(nonterminal)[alternate][index + 1..];
        let mut follow = BTreeSet::new();
        let mut completed = true;
        for symbol in sequence {
            let first = self.first(symbol);
            let continues = first.contains(&Terminal::Empty);
            follow.extend(
                first
                    .into_iter()
                    .filter(|terminal| !terminal.is_empty_terminal()),
            );
            if !continues {
                completed = false;
                break;
            }
        }
        if completed {
            follow.extend(self.follow(nonterminal));
        }
        follow
    }

    /// The TEST set for the grammar position `(A, alternate, index)`: the
    /// terminals on which the remaining suffix of the alternative can be
    /// entered. A null-only suffix collapses to `{Empty}`.
    pub fn test_for_sequence(
        &self,
        nonterminal: &Nonterminal,
        alternate: usize,
        index: usize,
    ) -> BTreeSet<Terminal> {
        let suffix = &self.alternatives(nonterminal)[alternate][index..];
        if !suffix.is_empty() && suffix.iter().all(Symbol::is_empty_terminal) {
            return BTreeSet::from([Terminal::Empty]);
        }
        let mut test = self.first_for_sequence(nonterminal, alternate, index);
        if test.contains(&Terminal::Empty) {
            test.extend(self.follow_for_sequence(nonterminal, alternate, index));
        }
        test
    }
}

fn alternative_is_nullable(alternative: &Alternative, nullables: &HashSet<Nonterminal>) -> bool {
    alternative.iter().all(|symbol| match symbol {
        Symbol::Nonterminal(nonterminal) => nullables.contains(nonterminal),
        Symbol::Terminal(terminal) => terminal.is_empty_terminal(),
    })
}
