//! Search routing regression suite
//!
//! Loads cases from tests/data/search_routing.toml and checks that each
//! question translates to the expected template and parameters, or to
//! nothing at all. Fast, deterministic, no database.

use serde::Deserialize;

use hemobank_common::QueryTranslator;

#[derive(Debug, Deserialize)]
struct Case {
    id: String,
    query: String,
    /// "match" or "none"
    expect: String,
    #[serde(default)]
    sql_contains: String,
    #[serde(default)]
    params: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Suite {
    case: Vec<Case>,
}

#[test]
fn routing_cases_from_data_file() {
    let suite: Suite = toml::from_str(include_str!("data/search_routing.toml")).unwrap();
    assert!(!suite.case.is_empty());

    let translator = QueryTranslator::new();
    for case in &suite.case {
        match translator.translate(&case.query) {
            Some(query) => {
                assert_eq!(
                    case.expect, "match",
                    "case {}: query unexpectedly matched",
                    case.id
                );
                assert!(
                    query.sql.contains(&case.sql_contains),
                    "case {}: template does not contain {:?}",
                    case.id,
                    case.sql_contains
                );
                assert_eq!(query.params, case.params, "case {}: wrong parameters", case.id);
            }
            None => {
                assert_eq!(
                    case.expect, "none",
                    "case {}: query failed to match",
                    case.id
                );
            }
        }
    }
}
