use crate::definition::Statement;
use crate::generator::generate_parser;
use crate::grammar::{Grammar, Nonterminal, Tag, TagKind, TagMap, Terminal};

// S -> 'a' S | 'b'
fn recursive_grammar() -> Grammar {
    let s = Nonterminal::new("S");
    Grammar::new(
        s.clone(),
        [(
            s.clone(),
            vec![
                vec![Terminal::literal("a").into(), s.clone().into()],
                vec![Terminal::literal("b").into()],
            ],
        )],
    )
}

#[test]
fn slots_and_functions_are_generated() {
    let definition = generate_parser("test", &recursive_grammar(), &TagMap::new()).unwrap();

    // One start function plus one function per GLL block:
    // alt0 has blocks ['a' S] and [], alt1 has block ['b'].
    assert_eq!(definition.functions.len(), 4);
    let names: Vec<&str> = definition
        .functions
        .iter()
        .map(|function| function.name.as_str())
        .collect();
    assert!(names.contains(&"parse_S"));
    assert!(names.contains(&"parse_S_alt0"));
    assert!(names.contains(&"parse_S_alt0_b1"));
    assert!(names.contains(&"parse_S_alt1"));

    // The initial slot resolves to the start function through the goto table.
    let start = definition
        .goto(definition.start_slot)
        .expect("start slot has a goto entry");
    assert_eq!(definition.function(start).name, "parse_S");
    assert_eq!(definition.slot(definition.start_slot).name, "S");
    assert!(definition.slot(definition.start_slot).is_nonterminal_slot());
}

#[test]
fn slot_specials_are_precomputed() {
    let definition = generate_parser("test", &recursive_grammar(), &TagMap::new()).unwrap();

    let slot = |name: &str| {
        definition
            .slots
            .iter()
            .find(|slot| slot.name == name)
            .unwrap_or_else(|| panic!("missing slot {}", name))
    };

    // After the single-terminal prefix 'a' the slot is alpha-special; the
    // dot is not at the end, so it is not beta-special.
    let after_a = slot("S_alt0_pos1");
    assert!(after_a.alpha_special);
    assert!(!after_a.beta_special);

    // The dot at the end of 'a' S.
    let end = slot("S_alt0_pos2");
    assert!(!end.alpha_special);
    assert!(end.beta_special);

    // The dot at the end of the single-terminal alternative 'b'.
    let end_b = slot("S_alt1_pos1");
    assert!(end_b.alpha_special);
    assert!(end_b.beta_special);
}

#[test]
fn start_function_guards_alternatives_with_test_checks() {
    let definition = generate_parser("test", &recursive_grammar(), &TagMap::new()).unwrap();
    let start = definition
        .functions
        .iter()
        .find(|function| function.name == "parse_S")
        .unwrap();
    assert_eq!(start.body.len(), 2);
    for statement in &start.body {
        let Statement::Conditional { checks, body } = statement else {
            panic!("start function bodies are TEST conditionals");
        };
        assert_eq!(checks.len(), 1);
        assert_eq!(body.len(), 1);
        assert!(matches!(body[0], Statement::Add { .. }));
    }
}

#[test]
fn synthetic_tail_block_pops() {
    let definition = generate_parser("test", &recursive_grammar(), &TagMap::new()).unwrap();
    let tail = definition
        .functions
        .iter()
        .find(|function| function.name == "parse_S_alt0_b1")
        .unwrap();
    assert!(matches!(tail.body.as_slice(), [Statement::Pop]));
}

#[test]
fn later_block_terminals_are_guarded() {
    // S -> 'x' T 'y' ; T -> 'a' : the 'y' step runs in a block entered by a
    // pop and must re-check the input.
    let s = Nonterminal::new("S");
    let t = Nonterminal::new("T");
    let grammar = Grammar::new(
        s.clone(),
        [
            (
                s.clone(),
                vec![vec![
                    Terminal::literal("x").into(),
                    t.clone().into(),
                    Terminal::literal("y").into(),
                ]],
            ),
            (t.clone(), vec![vec![Terminal::literal("a").into()]]),
        ],
    );
    let definition = generate_parser("test", &grammar, &TagMap::new()).unwrap();
    let block = definition
        .functions
        .iter()
        .find(|function| function.name == "parse_S_alt0_b1")
        .unwrap();
    let [Statement::Conditional { checks, body }] = block.body.as_slice() else {
        panic!("tail terminal block is one guarded conditional");
    };
    assert_eq!(checks.len(), 1);
    assert!(matches!(body[0], Statement::NodeT { .. }));
    assert!(matches!(body.last(), Some(Statement::Pop)));
}

#[test]
fn follow_tag_next_to_nonterminal_registers_in_pop() {
    let grammar = recursive_grammar();
    let mut tags = TagMap::new();
    tags.insert(
        (Nonterminal::new("S"), 0, 1),
        vec![Tag {
            kind: TagKind::NotFollow,
            terminals: vec![Terminal::literal("b")],
        }],
    );
    let definition = generate_parser("test", &grammar, &tags).unwrap();
    assert_eq!(definition.ambiguity_checks.len(), 1);
    let check = &definition.ambiguity_checks[0];
    assert!(check.in_pop);
    assert!(check.negated);
    assert_eq!(check.literals, vec!["b".to_owned()]);
    assert_eq!(definition.slot(check.slot).name, "S_alt0_pos2");
}

#[test]
fn precede_tag_lowers_to_inline_disambiguate() {
    let grammar = recursive_grammar();
    let mut tags = TagMap::new();
    tags.insert(
        (Nonterminal::new("S"), 1, 0),
        vec![Tag {
            kind: TagKind::NotPrecede,
            terminals: vec![Terminal::literal("a")],
        }],
    );
    let definition = generate_parser("test", &grammar, &tags).unwrap();
    assert_eq!(definition.ambiguity_checks.len(), 1);
    assert!(!definition.ambiguity_checks[0].in_pop);

    let alt1 = definition
        .functions
        .iter()
        .find(|function| function.name == "parse_S_alt1")
        .unwrap();
    let [Statement::Conditional { body, .. }] = alt1.body.as_slice() else {
        panic!("guarded terminal block expected");
    };
    assert!(matches!(body[0], Statement::Disambiguate { .. }));
}

#[test]
fn tag_validation_is_eager() {
    let grammar = recursive_grammar();

    let mut tags = TagMap::new();
    tags.insert(
        (Nonterminal::new("S"), 0, 9),
        vec![Tag {
            kind: TagKind::NotFollow,
            terminals: vec![Terminal::literal("b")],
        }],
    );
    assert!(generate_parser("test", &grammar, &tags).is_err());

    let mut tags = TagMap::new();
    tags.insert(
        (Nonterminal::new("S"), 0, 0),
        vec![Tag {
            kind: TagKind::Restriction,
            terminals: vec![Terminal::literal("a")],
        }],
    );
    // Restriction at a terminal position is rejected.
    assert!(generate_parser("test", &grammar, &tags).is_err());

    let mut tags = TagMap::new();
    tags.insert(
        (Nonterminal::new("Missing"), 0, 0),
        vec![Tag {
            kind: TagKind::Follow,
            terminals: vec![Terminal::literal("b")],
        }],
    );
    assert!(generate_parser("test", &grammar, &tags).is_err());
}

#[test]
fn undefined_reference_fails_before_parsing() {
    let s = Nonterminal::new("S");
    let grammar = Grammar::new(
        s.clone(),
        [(s.clone(), vec![vec![Nonterminal::new("Missing").into()]])],
    );
    assert!(generate_parser("test", &grammar, &TagMap::new()).is_err());
}

#[test]
fn definition_display_names_every_function() {
    let definition = generate_parser("display", &recursive_grammar(), &TagMap::new()).unwrap();
    let rendered = format!("{}", definition);
    assert!(rendered.contains("parser display"));
    assert!(rendered.contains("fn parse_S"));
    assert!(rendered.contains("pop"));
}