//! Rendering of a [`ParseOutcome`] for display.

use crate::parser::ParseOutcome;
use crate::registry::ArgKind;

/// Render an outcome as plain text, one line per argument then one per error.
pub fn render_text(outcome: &ParseOutcome) -> String {
    let mut output = String::new();

    if let Some(exec_name) = outcome.exec_name() {
        output.push_str(&format!("exec {}\n", exec_name));
    }

    for arg in outcome.args() {
        let state = match (arg.kind, arg.value.as_deref()) {
            (ArgKind::Unary, _) if arg.defined => "present".to_string(),
            (ArgKind::Keyword, Some(value)) => format!("{:?}", value),
            _ => "-".to_string(),
        };
        output.push_str(&format!("{} {} {}\n", arg.kind, arg.name, state));
    }

    for error in outcome.errors() {
        output.push_str(&format!("error: {}\n", error));
    }

    output
}

/// Render an outcome as pretty-printed JSON.
pub fn render_json(outcome: &ParseOutcome) -> serde_json::Result<String> {
    serde_json::to_string_pretty(outcome)
}

/// Render only the error lines, for stderr.
pub fn render_errors(outcome: &ParseOutcome, program: &str) -> String {
    outcome
        .errors()
        .iter()
        .map(|e| format!("{}: {}\n", program, e))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry.register_unary("--verbose", Some("-v")).unwrap();
        registry.register_keyword("--out", Some("-o")).unwrap();
        registry.register_keyword("--level", None).unwrap();
        registry
    }

    #[test]
    fn test_text_clean() {
        let outcome = registry().parse(&["prog", "-v", "--out=a b.txt"]);
        let text = render_text(&outcome);

        assert_eq!(
            text,
            "exec prog\n\
             unary --verbose present\n\
             keyword --out \"a b.txt\"\n\
             keyword --level -\n"
        );
    }

    #[test]
    fn test_text_with_errors() {
        let outcome = registry().parse(&["prog", "foo", "-v", "-v"]);
        let text = render_text(&outcome);

        assert!(text.contains("error: unrecognized argument: \"foo\"\n"));
        assert!(text.contains("error: unary argument \"--verbose\" has been redefined\n"));
    }

    #[test]
    fn test_text_empty_args() {
        let outcome = registry().parse::<&str>(&[]);
        let text = render_text(&outcome);
        assert!(!text.contains("exec"));
        assert!(text.starts_with("unary --verbose -\n"));
    }

    #[test]
    fn test_json_shape() {
        let outcome = registry().parse(&["prog", "--out", "x", "--out=y", "--bad"]);
        let json = render_json(&outcome).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["exec_name"], "prog");
        assert_eq!(value["args"][1]["name"], "--out");
        assert_eq!(value["args"][1]["value"], "y");
        assert!(value["args"][0].get("value").is_none());
        assert_eq!(value["errors"][0]["kind"], "redefinition_of_key");
        assert_eq!(value["errors"][0]["count"], 2);
        assert_eq!(value["errors"][1]["kind"], "unrecognized_arg");
        assert_eq!(value["errors"][1]["token"], "--bad");
    }

    #[test]
    fn test_render_errors() {
        let outcome = registry().parse(&["prog", "x", "--level"]);
        let errors = render_errors(&outcome, "prog");
        assert_eq!(
            errors,
            "prog: unrecognized argument: \"x\"\n\
             prog: no corresponding value for keyword argument \"--level\"\n"
        );
    }
}
