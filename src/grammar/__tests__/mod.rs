use crate::grammar::builder::{lit, nt, opt, plus, seq, star_sep, GrammarBuilder};
use crate::grammar::{Grammar, Nonterminal, Symbol, Terminal};
use std::collections::BTreeSet;

// S -> A S 'd' | () ; A -> 'a' | 'c'
fn nullable_grammar() -> Grammar {
    let s = Nonterminal::new("S");
    let a = Nonterminal::new("A");
    Grammar::new(
        s.clone(),
        [
            (
                s.clone(),
                vec![
                    vec![a.clone().into(), s.clone().into(), Terminal::literal("d").into()],
                    vec![Terminal::Empty.into()],
                ],
            ),
            (
                a.clone(),
                vec![
                    vec![Terminal::literal("a").into()],
                    vec![Terminal::literal("c").into()],
                ],
            ),
        ],
    )
}

fn terminals(set: &BTreeSet<Terminal>) -> Vec<Terminal> {
    set.iter().cloned().collect()
}

#[test]
fn nullable_fixed_point() {
    let grammar = nullable_grammar();
    assert!(grammar.is_nullable(&Nonterminal::new("S")));
    assert!(!grammar.is_nullable(&Nonterminal::new("A")));
}

#[test]
fn first_contains_empty_iff_nullable() {
    let grammar = nullable_grammar();
    let first_s = grammar.first(&Symbol::Nonterminal(Nonterminal::new("S")));
    let first_a = grammar.first(&Symbol::Nonterminal(Nonterminal::new("A")));
    assert!(first_s.contains(&Terminal::Empty));
    assert!(!first_a.contains(&Terminal::Empty));
    assert_eq!(
        terminals(&first_a),
        vec![Terminal::literal("a"), Terminal::literal("c")]
    );
    // S starts with whatever A starts with, or nothing.
    assert!(first_s.contains(&Terminal::literal("a")));
    assert!(first_s.contains(&Terminal::literal("c")));
}

#[test]
fn follow_through_subsumption() {
    let grammar = nullable_grammar();
    // A is followed by S 'd'; S is nullable, so 'd' and FIRST(S) follow A.
    let follow_a = grammar.follow(&Nonterminal::new("A"));
    assert!(follow_a.contains(&Terminal::literal("d")));
    assert!(follow_a.contains(&Terminal::literal("a")));
    assert!(follow_a.contains(&Terminal::literal("c")));
    // S inside alternative 0 is followed by 'd'.
    let follow_s = grammar.follow(&Nonterminal::new("S"));
    assert!(follow_s.contains(&Terminal::literal("d")));
}

#[test]
fn test_sets_per_position() {
    let grammar = nullable_grammar();
    let s = Nonterminal::new("S");

    // At (S, 0, 0) the suffix A S 'd' starts with FIRST(A).
    let test0 = grammar.test_for_sequence(&s, 0, 0);
    assert!(test0.contains(&Terminal::literal("a")));
    assert!(test0.contains(&Terminal::literal("c")));
    assert!(!test0.contains(&Terminal::Empty));

    // The null-only alternative collapses to {Empty}.
    let test1 = grammar.test_for_sequence(&s, 1, 0);
    assert_eq!(terminals(&test1), vec![Terminal::Empty]);

    // Every well-formed position has a non-empty TEST set.
    for (nonterminal, alternatives) in grammar.rules() {
        for (k, alternative) in alternatives.iter().enumerate() {
            for j in 0..alternative.len() {
                assert!(
                    !grammar.test_for_sequence(nonterminal, k, j).is_empty(),
                    "empty TEST set at ({}, {}, {})",
                    nonterminal,
                    k,
                    j
                );
            }
        }
    }
}

#[test]
fn gll_block_segmentation() {
    let s = Nonterminal::new("S");
    let a = Terminal::literal("a");
    let b = Terminal::literal("b");

    // 'a' S -> ['a' S] plus a synthetic empty tail
    let alternative = vec![a.clone().into(), s.clone().into()];
    let blocks = Grammar::gll_blocks(&alternative);
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].0, 0);
    assert_eq!(blocks[0].1.len(), 2);
    assert_eq!(blocks[1], (2, vec![]));

    // 'a' 'b' -> one tail block, no synthetic tail
    let alternative = vec![a.clone().into(), b.clone().into()];
    let blocks = Grammar::gll_blocks(&alternative);
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].0, 0);

    // S 'a' S -> [S] ['a' S] plus a synthetic tail
    let alternative = vec![s.clone().into(), a.clone().into(), s.clone().into()];
    let blocks = Grammar::gll_blocks(&alternative);
    assert_eq!(blocks.len(), 3);
    assert_eq!(blocks[0], (0, vec![Symbol::Nonterminal(s.clone())]));
    assert_eq!(blocks[1].0, 1);
    assert_eq!(blocks[2], (3, vec![]));

    // Concatenation of blocks reproduces the alternative.
    let rebuilt: Vec<Symbol> = blocks.iter().flat_map(|(_, block)| block.clone()).collect();
    assert_eq!(rebuilt, alternative);
}

#[test]
fn normalize_and_compress() {
    let s = Nonterminal::new("S");
    let grammar = Grammar::new(
        s.clone(),
        [(
            s.clone(),
            vec![
                vec![
                    Terminal::Empty.into(),
                    Terminal::literal("a").into(),
                    Terminal::Empty.into(),
                    Terminal::literal("b").into(),
                ],
                vec![Terminal::Empty.into(), Terminal::Empty.into()],
            ],
        )],
    );

    let normalized = grammar.normalize_null();
    let alternatives = normalized.alternatives(&s);
    assert_eq!(
        alternatives[0],
        vec![
            Symbol::Terminal(Terminal::literal("a")),
            Symbol::Terminal(Terminal::literal("b"))
        ]
    );
    assert_eq!(alternatives[1], vec![Symbol::Terminal(Terminal::Empty)]);

    let compressed = normalized.compress();
    assert_eq!(
        compressed.alternatives(&s)[0],
        vec![Symbol::Terminal(Terminal::literal("ab"))]
    );
}

#[test]
fn validation_rejects_undefined_reference() {
    let s = Nonterminal::new("S");
    let grammar = Grammar::new(
        s.clone(),
        [(s.clone(), vec![vec![Nonterminal::new("Missing").into()]])],
    );
    assert!(grammar.validate().is_err());

    let valid = nullable_grammar();
    assert!(valid.validate().is_ok());
}

#[test]
fn builder_desugars_groups() {
    let mut builder = GrammarBuilder::new();
    builder.rule(
        "item",
        vec![seq(vec![
            lit("("),
            opt(lit("-")),
            plus(nt("item")),
            lit(")"),
        ])],
    );
    let (grammar, tags) = builder.build("item").unwrap();
    assert!(tags.is_empty());

    // item, item__opt0, item__plus1
    assert_eq!(grammar.rules().len(), 3);
    let item = grammar.alternatives(&Nonterminal::new("item"));
    assert_eq!(item.len(), 1);
    assert_eq!(item[0].len(), 4);

    let opt_rule = grammar
        .rules()
        .keys()
        .find(|name| name.name().contains("opt"))
        .unwrap();
    let opt_alternatives = grammar.alternatives(opt_rule);
    assert_eq!(opt_alternatives.len(), 2);
    assert_eq!(opt_alternatives[1], vec![Symbol::Terminal(Terminal::Empty)]);
    assert!(grammar.is_nullable(opt_rule));
}

#[test]
fn builder_star_sep_accepts_zero_items() {
    let mut builder = GrammarBuilder::new();
    builder.rule(
        "list",
        vec![seq(vec![
            lit("["),
            star_sep(lit("x"), lit(",")),
            lit("]"),
        ])],
    );
    let (grammar, _) = builder.build("list").unwrap();
    // The separated list option rule is nullable, the list rule is not.
    let listopt = grammar
        .rules()
        .keys()
        .find(|name| name.name().contains("listopt"))
        .unwrap();
    assert!(grammar.is_nullable(listopt));
    assert!(!grammar.is_nullable(&Nonterminal::new("list")));
}
