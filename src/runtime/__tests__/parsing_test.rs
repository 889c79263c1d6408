use super::{assert_fails, assert_parses, build_parser};
use crate::grammar::{Grammar, Nonterminal, TagMap, Terminal};
use crate::runtime::sppf::{SppfKey, SppfNode};
use crate::ParseForest;
use std::collections::BTreeSet;

// S -> 'a' S | 'b' | 'a'
fn right_recursive_grammar() -> Grammar {
    let s = Nonterminal::new("S");
    Grammar::new(
        s.clone(),
        [(
            s.clone(),
            vec![
                vec![Terminal::literal("a").into(), s.clone().into()],
                vec![Terminal::literal("b").into()],
                vec![Terminal::literal("a").into()],
            ],
        )],
    )
}

// S -> S S | 'a'
fn doubling_grammar() -> Grammar {
    let s = Nonterminal::new("S");
    Grammar::new(
        s.clone(),
        [(
            s.clone(),
            vec![
                vec![s.clone().into(), s.clone().into()],
                vec![Terminal::literal("a").into()],
            ],
        )],
    )
}

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
                    vec![
                        a.clone().into(),
                        s.clone().into(),
                        Terminal::literal("d").into(),
                    ],
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

#[test]
fn recursion_accepts_and_rejects() {
    let parser = build_parser(&right_recursive_grammar(), &TagMap::new());
    for input in ["b", "a", "ab", "aab", "aaab", "aa", "aaa"] {
        assert_parses(&parser, input);
    }
    for input in ["c", "ba", "", "abb"] {
        assert_fails(&parser, input);
    }
}

#[test]
fn left_recursion_terminates() {
    // S -> S 'a' | 'a'
    let s = Nonterminal::new("S");
    let grammar = Grammar::new(
        s.clone(),
        [(
            s.clone(),
            vec![
                vec![s.clone().into(), Terminal::literal("a").into()],
                vec![Terminal::literal("a").into()],
            ],
        )],
    );
    let parser = build_parser(&grammar, &TagMap::new());
    for input in ["a", "aa", "aaaaa"] {
        assert_parses(&parser, input);
    }
    for input in ["", "b", "ab"] {
        assert_fails(&parser, input);
    }
}

#[test]
fn multi_code_point_literals() {
    // S -> 'ab' S | 'c'
    let s = Nonterminal::new("S");
    let grammar = Grammar::new(
        s.clone(),
        [(
            s.clone(),
            vec![
                vec![Terminal::literal("ab").into(), s.clone().into()],
                vec![Terminal::literal("c").into()],
            ],
        )],
    );
    let parser = build_parser(&grammar, &TagMap::new());
    for input in ["c", "abc", "ababc"] {
        assert_parses(&parser, input);
    }
    for input in ["ab", "ac", "abab", "abcc"] {
        assert_fails(&parser, input);
    }
}

#[test]
fn character_classes_match_one_code_point() {
    // S -> [0-9] S | [0-9]
    let s = Nonterminal::new("S");
    let digit = Terminal::chars([('0', '9')]);
    let grammar = Grammar::new(
        s.clone(),
        [(
            s.clone(),
            vec![
                vec![digit.clone().into(), s.clone().into()],
                vec![digit.clone().into()],
            ],
        )],
    );
    let parser = build_parser(&grammar, &TagMap::new());
    assert_parses(&parser, "7");
    assert_parses(&parser, "0123456789");
    assert_fails(&parser, "");
    assert_fails(&parser, "12x");
}

#[test]
fn ambiguity_is_shared_in_one_root() {
    let parser = build_parser(&doubling_grammar(), &TagMap::new());
    let forest = parser.parse("aaa").unwrap();

    let root = forest.root_node();
    let SppfNode::Intermediate {
        key: SppfKey::Completed { left, right, .. },
        children,
    } = root
    else {
        panic!("root is the completed start nonterminal");
    };
    assert_eq!((*left, *right), (0, 3));

    // Two derivations, split after the first or the second 'a'.
    assert_eq!(children.len(), 2);
    let splits: BTreeSet<usize> = children.keys().map(|key| key.split).collect();
    assert_eq!(splits, BTreeSet::from([1, 2]));
}

#[test]
fn nullable_alternation() {
    let parser = build_parser(&nullable_grammar(), &TagMap::new());
    for input in ["", "ad", "cd", "acdd", "cadd", "aacddd"] {
        assert_parses(&parser, input);
    }
    for input in ["a", "d", "ac", "acd", "add"] {
        assert_fails(&parser, input);
    }
}

#[test]
fn empty_input_needs_a_nullable_start() {
    let nullable = build_parser(&nullable_grammar(), &TagMap::new());
    assert_parses(&nullable, "");
    let strict = build_parser(&right_recursive_grammar(), &TagMap::new());
    assert_fails(&strict, "");
}

fn forest_signature(forest: &ParseForest) -> BTreeSet<String> {
    (0..forest.node_count())
        .map(|index| {
            let id = crate::runtime::sppf::NodeId(index);
            let (left, right) = forest.extents(id);
            let splits: Vec<usize> = forest
                .packed_children(id)
                .iter()
                .map(|packed| packed.split)
                .collect();
            format!("{} {}-{} {:?}", forest.label(id), left, right, splits)
        })
        .collect()
}

#[test]
fn repeated_parses_build_equal_forests() {
    let parser = build_parser(&doubling_grammar(), &TagMap::new());
    let first = parser.parse("aaaa").unwrap();
    let second = parser.parse("aaaa").unwrap();
    assert_eq!(forest_signature(&first), forest_signature(&second));
    assert_eq!(first.node_count(), second.node_count());
}

#[test]
fn extents_are_ordered_and_contained() {
    let parser = build_parser(&doubling_grammar(), &TagMap::new());
    let forest = parser.parse("aaaa").unwrap();
    for index in 0..forest.node_count() {
        let id = crate::runtime::sppf::NodeId(index);
        let (left, right) = forest.extents(id);
        assert!(left <= right);
        for packed in forest.packed_children(id) {
            assert!(left <= packed.split && packed.split <= right);
            if let Some(left_child) = packed.left {
                let (child_left, child_right) = forest.extents(left_child);
                assert!(left <= child_left && child_right <= right);
            }
            let (child_left, child_right) = forest.extents(packed.right);
            assert!(left <= child_left && child_right <= right);
        }
    }
}

#[test]
fn terminal_nodes_are_deduplicated() {
    let parser = build_parser(&doubling_grammar(), &TagMap::new());
    let forest = parser.parse("aaa").unwrap();
    let mut seen = BTreeSet::new();
    for index in 0..forest.node_count() {
        let id = crate::runtime::sppf::NodeId(index);
        if let SppfNode::Terminal { symbol, left, right } = forest.node(id) {
            assert!(
                seen.insert((symbol.clone(), *left, *right)),
                "duplicate terminal node {:?} at {}-{}",
                symbol,
                left,
                right
            );
        }
    }
}

#[test]
fn forest_prints_without_error() {
    let parser = build_parser(&right_recursive_grammar(), &TagMap::new());
    let forest = parser.parse("aab").unwrap();
    forest.print().unwrap();
}
