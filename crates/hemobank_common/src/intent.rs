//! Free-text search translation
//!
//! Maps a plain-language question onto one of a fixed set of parameterized
//! queries. Rules are held in an ordered list and tried top to bottom, so
//! matching is deterministic: the first rule whose pattern matches wins.
//!
//! User text is sanitized before matching (trimmed, lowercased, with `;`,
//! `'` and `"` removed). All user-derived values are bound as parameters,
//! never spliced into the SQL text.

use regex::Regex;

/// How a captured fragment is rewritten before it is bound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// Bind the capture as-is
    Verbatim,
    /// Uppercase the capture so "a+" matches the stored "A+"
    BloodGroup,
    /// Wrap the capture in `%...%` for a LIKE substring match
    NameSubstring,
}

impl Transform {
    fn apply(self, raw: &str) -> String {
        match self {
            Transform::Verbatim => raw.to_string(),
            Transform::BloodGroup => raw.to_uppercase(),
            Transform::NameSubstring => format!("%{raw}%"),
        }
    }
}

/// A translated question: SQL template plus its bound parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundQuery {
    pub sql: &'static str,
    pub params: Vec<String>,
}

struct Rule {
    pattern: Regex,
    sql: &'static str,
    /// None for parameterless templates
    binds: Option<Transform>,
}

/// Ordered question-to-query translator
pub struct QueryTranslator {
    rules: Vec<Rule>,
}

impl QueryTranslator {
    /// Build the rule table. Priority is list order; every pattern anchors
    /// on the end of the sanitized input, so leading filler words
    /// ("show me available blood") still match.
    pub fn new() -> Self {
        let rules = vec![
            Rule {
                pattern: Regex::new(r"available blood$").unwrap(),
                sql: "SELECT Blood_grp, SUM(Quantity) AS Total_Units \
                      FROM Storage_House GROUP BY Blood_grp",
                binds: None,
            },
            Rule {
                pattern: Regex::new(r"donors with ([a-z0-9+-]+)$").unwrap(),
                sql: "SELECT Dona_id, Dona_name, Blood_grp, Dona_contact \
                      FROM Donor WHERE Blood_grp = ?1",
                binds: Some(Transform::BloodGroup),
            },
            Rule {
                pattern: Regex::new(r"contact of (.+)$").unwrap(),
                sql: "SELECT Dona_name, Dona_contact FROM Donor WHERE Dona_name LIKE ?1",
                binds: Some(Transform::NameSubstring),
            },
            Rule {
                pattern: Regex::new(r"who donated blood$").unwrap(),
                sql: "SELECT Dona_name, Blood_grp FROM Donor",
                binds: None,
            },
            Rule {
                pattern: Regex::new(r"location of blood bank$").unwrap(),
                sql: "SELECT Emp_name, BB_address FROM Employee",
                binds: None,
            },
            Rule {
                pattern: Regex::new(r"hospital orders$").unwrap(),
                sql: "SELECT o.Order_id, h.Hosp_name, o.Blood_grp, o.Quantity, o.Status \
                      FROM Orders o JOIN Hospital h ON o.Hosp_id = h.Hosp_id",
                binds: None,
            },
            Rule {
                pattern: Regex::new(r"blood supply$").unwrap(),
                sql: "SELECT s.Supply_id, h.Hosp_name, s.Blood_grp, s.Quantity \
                      FROM Supply s JOIN Hospital h ON s.Hosp_id = h.Hosp_id",
                binds: None,
            },
        ];
        Self { rules }
    }

    /// Translate a question, or return None when no rule matches
    pub fn translate(&self, input: &str) -> Option<BoundQuery> {
        let cleaned = sanitize(input);
        if cleaned.is_empty() {
            return None;
        }

        for rule in &self.rules {
            if let Some(caps) = rule.pattern.captures(&cleaned) {
                let params = match rule.binds {
                    None => Vec::new(),
                    Some(transform) => {
                        let raw = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
                        vec![transform.apply(raw)]
                    }
                };
                return Some(BoundQuery { sql: rule.sql, params });
            }
        }
        None
    }
}

impl Default for QueryTranslator {
    fn default() -> Self {
        Self::new()
    }
}

/// Example questions shown when nothing matches
pub const EXAMPLE_QUESTIONS: [&str; 4] = [
    "available blood",
    "donors with A+",
    "contact of Asha",
    "hospital orders",
];

/// Trim, lowercase, and strip `;`, `'` and `"` from user text
pub fn sanitize(input: &str) -> String {
    input
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, ';' | '\'' | '"'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translate(input: &str) -> Option<BoundQuery> {
        QueryTranslator::new().translate(input)
    }

    #[test]
    fn sanitize_strips_quotes_and_semicolons() {
        assert_eq!(sanitize("donors with a+;drop"), "donors with a+drop");
        assert_eq!(sanitize("  Contact of \"Asha\"  "), "contact of asha");
        assert_eq!(sanitize("it's"), "its");
    }

    #[test]
    fn available_blood_has_no_parameters() {
        let q = translate("Available Blood").unwrap();
        assert!(q.sql.contains("Storage_House"));
        assert!(q.params.is_empty());
    }

    #[test]
    fn leading_words_are_tolerated() {
        assert!(translate("show me available blood").is_some());
        // the anchor rejects trailing words
        assert!(translate("available blood please").is_none());
    }

    #[test]
    fn donors_with_group_uppercases_the_capture() {
        let q = translate("donors with a+").unwrap();
        assert!(q.sql.contains("Blood_grp = ?1"));
        assert_eq!(q.params, vec!["A+".to_string()]);
    }

    #[test]
    fn contact_of_wraps_in_like_wildcards() {
        let q = translate("contact of Asha").unwrap();
        assert!(q.sql.contains("LIKE ?1"));
        assert_eq!(q.params, vec!["%asha%".to_string()]);
    }

    #[test]
    fn fixed_questions_route_to_their_tables() {
        assert!(translate("who donated blood").unwrap().sql.contains("FROM Donor"));
        assert!(translate("location of blood bank")
            .unwrap()
            .sql
            .contains("BB_address"));
        assert!(translate("hospital orders").unwrap().sql.contains("JOIN Hospital"));
        assert!(translate("blood supply").unwrap().sql.contains("FROM Supply"));
    }

    #[test]
    fn sanitized_injection_attempt_still_binds() {
        let q = translate("donors with a+;drop").unwrap();
        // the stripped text ends in "a+drop", which is captured and bound,
        // never spliced into the SQL
        assert_eq!(q.params, vec!["A+DROP".to_string()]);
        assert!(q.sql.contains("?1"));
    }

    #[test]
    fn unmatched_and_empty_input_return_none() {
        assert!(translate("what is the meaning of life").is_none());
        assert!(translate("").is_none());
        assert!(translate("  ;'\"  ").is_none());
    }
}
