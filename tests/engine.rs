use argvet::{ArgKind, ParseError, ParseOutcome, Registry, RegistryError};

fn vocabulary() -> Registry {
    let mut registry = Registry::new();
    registry.register_unary("--verbose", Some("-v")).unwrap();
    registry.register_unary("--force", Some("-f")).unwrap();
    registry.register_keyword("--out", Some("-o")).unwrap();
    registry.register_keyword("--mode", Some("-m")).unwrap();
    registry
}

#[test]
fn test_declared_names_parse_cleanly() {
    let registry = vocabulary();
    let outcome = registry.parse(&["prog", "-v", "--out", "a.txt", "-m=fast"]);

    assert!(outcome.is_clean(), "{:?}", outcome.errors());
    assert_eq!(outcome.exec_name(), Some("prog"));
    assert!(outcome.unary_defined("--verbose").unwrap());
    assert!(!outcome.unary_defined("--force").unwrap());
    assert_eq!(outcome.keyword_value("--out").unwrap(), Some("a.txt"));
    assert_eq!(outcome.keyword_value("--mode").unwrap(), Some("fast"));
}

#[test]
fn test_shared_label_rejected_in_either_order() {
    let pairs = [
        (ArgKind::Unary, "--x", None, ArgKind::Keyword, "--x", None),
        (ArgKind::Keyword, "--x", Some("-x"), ArgKind::Unary, "-x", None),
        (ArgKind::Unary, "--a", Some("-s"), ArgKind::Keyword, "--b", Some("-s")),
        (ArgKind::Unary, "--a", Some("-s"), ArgKind::Unary, "--b", Some("-s")),
    ];

    for (kind_a, name_a, abbr_a, kind_b, name_b, abbr_b) in pairs {
        let mut forward = Registry::new();
        register(&mut forward, kind_a, name_a, abbr_a).unwrap();
        assert!(register(&mut forward, kind_b, name_b, abbr_b).is_err());

        let mut backward = Registry::new();
        register(&mut backward, kind_b, name_b, abbr_b).unwrap();
        assert!(register(&mut backward, kind_a, name_a, abbr_a).is_err());
    }
}

fn register(
    registry: &mut Registry,
    kind: ArgKind,
    name: &str,
    abbreviation: Option<&str>,
) -> Result<(), RegistryError> {
    match kind {
        ArgKind::Unary => registry.register_unary(name, abbreviation),
        ArgKind::Keyword => registry.register_keyword(name, abbreviation),
    }
}

#[test]
fn test_unary_redefinition_collapses() {
    let registry = vocabulary();

    let outcome = registry.parse(&["prog", "--verbose", "--verbose"]);
    assert_eq!(
        outcome.errors(),
        &[ParseError::RedefinitionOfUnaryArg {
            name: "--verbose".to_string(),
            count: 2
        }]
    );

    let outcome = registry.parse(&["prog", "--verbose", "--verbose", "--verbose"]);
    assert_eq!(outcome.errors().len(), 1);
    assert_eq!(outcome.errors()[0].count(), Some(3));
}

#[test]
fn test_keyword_redefinition_last_write_wins() {
    let registry = vocabulary();
    let outcome = registry.parse(&["prog", "--out=a.txt", "--out=b.txt"]);

    assert_eq!(
        outcome.errors(),
        &[ParseError::RedefinitionOfKey {
            key: "--out".to_string(),
            count: 2
        }]
    );
    assert_eq!(outcome.keyword_value("--out").unwrap(), Some("b.txt"));
}

#[test]
fn test_dangling_keyword() {
    let registry = vocabulary();

    let outcome = registry.parse(&["prog", "--out"]);
    assert_eq!(
        outcome.errors(),
        &[ParseError::NoValueForKey {
            key: "--out".to_string()
        }]
    );

    let outcome = registry.parse(&["prog", "x", "--out"]);
    assert_eq!(
        outcome.errors(),
        &[
            ParseError::UnrecognizedArg {
                token: "x".to_string()
            },
            ParseError::NoValueForKey {
                key: "--out".to_string()
            },
        ]
    );
}

#[test]
fn test_unknown_token() {
    let registry = vocabulary();
    let outcome = registry.parse(&["prog", "foo"]);
    assert_eq!(
        outcome.errors(),
        &[ParseError::UnrecognizedArg {
            token: "foo".to_string()
        }]
    );
}

#[test]
fn test_parse_is_repeatable() {
    let registry = vocabulary();
    let args = ["prog", "-v", "-v", "bogus", "--out=1", "-o", "2", "-m"];
    let first = registry.parse(&args);
    let second = registry.parse(&args);
    assert_eq!(first, second);
}

#[test]
fn test_rejected_separator_change_keeps_old_set() {
    let mut registry = vocabulary();
    registry.register_keyword("--a:b", None).unwrap();

    let err = registry.set_separators([':']).unwrap_err();
    assert!(matches!(
        err,
        RegistryError::SeparatorInName { separator: ':', .. }
    ));
    assert_eq!(registry.separators(), &['=']);

    let outcome = registry.parse(&["prog", "--out=kept", "--a:b=x"]);
    assert!(outcome.is_clean(), "{:?}", outcome.errors());
    assert_eq!(outcome.keyword_value("--out").unwrap(), Some("kept"));
    assert_eq!(outcome.keyword_value("--a:b").unwrap(), Some("x"));
}

#[test]
fn test_concurrent_parses_share_registry() {
    let registry = vocabulary();

    let outcomes: Vec<ParseOutcome> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = &registry;
                scope.spawn(move || {
                    let value = i.to_string();
                    let args = vec!["prog", "--out", value.as_str(), "-v"];
                    registry.parse(&args)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for (i, outcome) in outcomes.iter().enumerate() {
        assert!(outcome.is_clean());
        assert_eq!(
            outcome.keyword_value("--out").unwrap(),
            Some(i.to_string().as_str())
        );
    }
}
