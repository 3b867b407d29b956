use super::*;
use crate::{Reassembly, Rule, Template};

fn parse(text: &str) -> Result<Script> {
    Script::parse(text, &Options::default())
}

fn entry<'a>(script: &'a Script, keyword: &str) -> &'a DictionaryEntry {
    script.entry(keyword).unwrap_or_else(|| panic!("no entry for {keyword}"))
}

fn response_rule<'a>(script: &'a Script, keyword: &str, n: usize) -> &'a Rule {
    script.rule(entry(script, keyword).response_rules[n]).unwrap()
}

#[test]
fn well_formed_scripts_parse() {
    let cases = [
        "STOP (BADRULE...)",
        "() HONK",
        "(DOG MEMORY ((DOG 0)(WAU)))",
        "(MEMORY DOG ((DOG 0)(WUFF)))",
        "(MEMORY MEMORY ((0)(MOO)))",
        "(DOG MEMORY ((DOG 0)(WAU))((0)(WUFF)))",
        "(I = YOU)",
        "(YOU = I 1)",
        "(CAT = ANIMAL 7 ((CAT 0)(MEOW)))",
        "(KEYWORD DLIST ())",
        "(DOG DLIST (PET ANIMAL))",
        "(DOG DLIST (/ PET ANIMAL))",
        "(CAT 1 ((0)(PUSSY)))",
        "(PUSSY (=CAT))",
        "(CAT (= PUSSY))",
        "(PUSSY ((0)(NEWKEY)))",
        "(MOUSE ((MICKY MOUSE)(=HERO)))",
        "(MOUSE ((0 MOUSE 0)(PRE (MOUSE 3)(=CAT))))",
        "",
    ];

    for case in cases {
        assert!(parse(case).is_ok(), "{case:?} should parse: {:?}", parse(case).err());
    }
}

#[test]
fn malformed_scripts_are_rejected() {
    let cases = [
        "HONK",
        "0",
        "(KEYWORD)",
        "(() ABC)",
        "(123 ABC)",
        "(KEYWORD HONK)",
        "(KEYWORD = ())",
        "(KEYWORD MEMORY)",
        "(KEYWORD MEMORY NOPE)",
        "(KEYWORD MEMORY ((0)(NOPE)) KING)",
        "(KEYWORD MEMORY (KING))",
        "(KEYWORD MEMORY ((0)(=KING)))",
        "(KEYWORD MEMORY ((0)(NEWKEY)))",
        "(KEYWORD DLIST)",
        "(KEYWORD DLIST 7)",
        "(KEYWORD DLIST (0))",
        "(KEYWORD DLIST (A) ((0)(X)))",
        "(KEYWORD MEMORY (0)(NOT_A_LIST))",
        "(KEYWORD (=KING HENRY))",
        "(KEYWORD ((0) KING))",
        "(KEYWORD ((0)(BLAH)) KING)",
        "(KEYWORD (()(BLAH)))",
        "(KEYWORD ((1.0)(BLAH)))",
        "(KEYWORD ((0 1)(BLAH)))",
        "(KEYWORD ((WORD 0 1)(BLAH)))",
        "(KEYWORD ((0)))",
        "(KEYWORD ((0)(X)) (=OTHER))",
        "(KEYWORD -1 ((0)(X)))",
        "(KEYWORD 5)",
        "(KEYWORD ((0)(PRE (X) (=TWO WORDS))))",
    ];

    for case in cases {
        let err = parse(case).err().unwrap_or_else(|| panic!("{case:?} should be rejected"));
        assert!(
            matches!(err, ScriptError::MalformedEntry { .. } | ScriptError::MalformedRule { .. }),
            "{case:?} gave {err}"
        );
    }
}

#[test]
fn unbalanced_scripts_are_syntax_errors() {
    for case in ["(FOO", "BAR)"] {
        assert!(matches!(parse(case), Err(ScriptError::Syntax { .. })), "{case:?}");
    }
}

#[test]
fn malformed_errors_carry_the_offending_form() {
    let err = parse("(KEYWORD DLIST)").unwrap_err();
    assert_eq!(err.to_string(), "malformed entry: (KEYWORD DLIST)");

    let err = parse("(KEYWORD ((0)(BLAH)) KING)").unwrap_err();
    assert_eq!(err.to_string(), "malformed rule: KING");
}

#[test]
fn stop_truncates_the_script() {
    let script = parse("(A ((0)(X))) STOP (B ((0)(Y))) (BROKEN").unwrap_err();
    // The reader sees the whole text before parsing starts.
    assert!(matches!(script, ScriptError::Syntax { .. }));

    let script = parse("(A ((0)(X))) () (B ((0)(Y)))").unwrap();
    assert!(script.contains("A"));
    assert!(!script.contains("B"));

    let script = parse("(A ((0)(X))) STOP (B ((0)(Y))) (NOT A VALID ENTRY)").unwrap();
    assert_eq!(script.len(), 1);
}

#[test]
fn alias_rank_and_rules() {
    let script = parse("(CAT = ANIMAL 7 ((CAT 0)(MEOW 2)(=DOG)))").unwrap();
    let cat = entry(&script, "CAT");
    assert_eq!(cat.alias.as_deref(), Some("ANIMAL"));
    assert_eq!(cat.rank, Some(7));
    assert_eq!(cat.response_rules.len(), 1);

    let Rule::Pattern { decomposition, reassemblies } = response_rule(&script, "CAT", 0) else {
        panic!("expected a pattern rule");
    };
    assert_eq!(decomposition.source(), "CAT 0");
    assert_eq!(reassemblies.to_string(), "(MEOW 2) (=DOG)");
}

#[test]
fn reassembly_kinds_are_classified() {
    let script = parse("(K ((0 K 0)(PLAIN 3)(=OTHER)(= SPACED)(PRE (X 3) (=TARGET))(NEWKEY)))").unwrap();
    let Rule::Pattern { reassemblies, .. } = response_rule(&script, "K", 0) else {
        panic!("expected a pattern rule");
    };

    let mut list = reassemblies.clone();
    let kinds: Vec<Reassembly> = (0..list.len()).map(|_| list.next().clone()).collect();
    assert_eq!(
        kinds,
        vec![
            Reassembly::Text(Template::compile("PLAIN 3")),
            Reassembly::Redirect("OTHER".into()),
            Reassembly::Redirect("SPACED".into()),
            Reassembly::Preformat { template: Template::compile("X 3"), target: "TARGET".into() },
            Reassembly::NewKey,
        ]
    );
}

#[test]
fn redirection_rule_shapes() {
    for (script, target) in [("(A (=B))", "B"), ("(A (= B))", "B"), ("(A (B))", "B"), ("(A (=b))", "B")] {
        let script = parse(script).unwrap();
        assert_eq!(response_rule(&script, "A", 0), &Rule::Redirect { target: target.into() });
    }
}

#[test]
fn default_rank_policy() {
    let script = parse("(A ((0)(X))) (B 0 ((0)(Y))) (NONE ((0)(Z))) (I = YOU)").unwrap();
    assert_eq!(entry(&script, "A").rank, Some(1));
    assert_eq!(entry(&script, "B").rank, Some(0));
    assert_eq!(entry(&script, "NONE").rank, None);
    assert_eq!(entry(&script, "I").rank, Some(1));

    let options = Options { default_rank: 0, unranked_keywords: vec!["A".into()], ..Options::default() };
    let script = Script::parse("(A ((0)(X))) (NONE ((0)(Z)))", &options).unwrap();
    assert_eq!(entry(&script, "A").rank, None);
    assert_eq!(entry(&script, "NONE").rank, Some(0));
}

#[test]
fn memory_rules_merge_with_response_rules() {
    let script = parse("(MY = YOUR 2 ((0 YOUR 0)(YOUR 3))) (MEMORY MY ((0 YOUR 0)(EARLIER 3))((0)(ANYWAY)))").unwrap();
    let my = entry(&script, "MY");
    assert_eq!(my.alias.as_deref(), Some("YOUR"));
    assert_eq!(my.rank, Some(2));
    assert_eq!(my.response_rules.len(), 1);
    assert_eq!(my.memory_rules.len(), 2);

    let memory_only = parse("(DOG MEMORY ((DOG 0)(WAU)))").unwrap();
    assert_eq!(entry(&memory_only, "DOG").rank, None);
}

#[test]
fn later_rule_lists_replace_earlier_ones() {
    let script = parse("(A 3 ((0)(FIRST))((X)(SECOND))) (A ((0)(THIRD)))").unwrap();
    let a = entry(&script, "A");
    assert_eq!(a.response_rules.len(), 1);
    assert_eq!(a.rank, Some(1));
    assert_eq!(response_rule(&script, "A", 0).to_string(), "((0) (THIRD))");

    // The replaced rules stay in the arena but no longer count.
    assert_eq!(script.rules().len(), 3);
    assert_eq!(script.statistics(), ScriptStatistics { rules: 1, reassemblies: 1 });
}

#[test]
fn append_response_rule_accumulates() {
    let mut script = parse("(A ((0)(FIRST)))").unwrap();
    script.append_response_rule("A", Rule::Redirect { target: "B".into() });
    assert_eq!(entry(&script, "A").response_rules.len(), 2);

    script.append_response_rule("NEW", Rule::Redirect { target: "A".into() });
    assert_eq!(entry(&script, "NEW").rank, None);
}

#[test]
fn categories_are_recorded_with_slashes_stripped() {
    let script =
        parse("(MOTHER DLIST (/FAMILY)) (FATHER DLIST (/ FAMILY NOUN)) (FEEL DLIST (BELIEF)) (THINK = FEEL DLIST (BELIEF))")
            .unwrap();
    let categories = script.categories();
    assert_eq!(categories.members("FAMILY").unwrap(), ["MOTHER", "FATHER"]);
    assert_eq!(categories.members("NOUN").unwrap(), ["FATHER"]);
    assert_eq!(categories.members("BELIEF").unwrap(), ["FEEL", "THINK"]);

    // DLIST alone does not create a dictionary entry; an alias does.
    assert!(!script.contains("MOTHER"));
    assert_eq!(entry(&script, "THINK").alias.as_deref(), Some("FEEL"));
}

#[test]
fn statistics_count_response_and_memory_rules() {
    let script = parse("(A ((0)(X)(Y))((1)(Z))) (B (=A)) (A MEMORY ((0)(M)))").unwrap();
    assert_eq!(script.statistics(), ScriptStatistics { rules: 4, reassemblies: 4 });
}

#[test]
fn loads_from_a_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    std::io::Write::write_all(&mut file, b"(HELLO ((0)(HI THERE)))").unwrap();

    let script = Script::from_file(file.path(), &Options::default()).unwrap();
    assert!(script.contains("HELLO"));
}

#[test]
fn missing_file_is_an_io_error() {
    let err = Script::from_file("/definitely/not/here.eliza", &Options::default()).unwrap_err();
    assert!(matches!(err, ScriptError::Io { .. }));
}
