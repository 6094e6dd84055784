//! Validators for the free-text relationship hints carried in foreign-key
//! comments. Each parser returns a typed value or "absent" — never invalid
//! data; rejected tokens are dropped with a log line and the documented
//! default applies downstream.

use tracing::debug;

use crate::util::parse_comment_tag;

const CASCADE_VALUES: [&str; 5] = ["persist", "remove", "merge", "detach", "all"];
const FETCH_VALUES: [&str; 3] = ["EAGER", "LAZY", "EXTRA_LAZY"];

/// Comma-separated cascade tokens, lower-cased and restricted to the values
/// Doctrine accepts. Unknown tokens are silently dropped; an empty result is
/// absent.
pub fn cascade_option(raw: Option<&str>) -> Option<Vec<String>> {
    let raw = raw?;
    let values: Vec<String> = raw
        .split(',')
        .map(|token| token.trim().to_lowercase())
        .filter(|token| {
            let known = CASCADE_VALUES.contains(&token.as_str());
            if !known && !token.is_empty() {
                debug!("dropping unknown cascade token `{}`", token);
            }
            known
        })
        .collect();
    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}

/// Single fetch mode, upper-cased; anything outside the whitelist is absent.
pub fn fetch_option(raw: Option<&str>) -> Option<String> {
    let value = raw?.trim().to_uppercase();
    if FETCH_VALUES.contains(&value.as_str()) {
        Some(value)
    } else {
        debug!("dropping unknown fetch mode `{}`", value);
        None
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}

impl SortDir {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Newline-separated `column[,ASC|DESC]` pairs. The default direction is
/// `ASC`; a repeated column overrides its earlier entry while keeping the
/// original insertion position.
pub fn order_option(raw: Option<&str>) -> Vec<(String, SortDir)> {
    let mut orders: Vec<(String, SortDir)> = Vec::new();
    let raw = match raw {
        Some(raw) => raw.trim(),
        None => return orders,
    };
    for line in raw.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let mut values = line.split(',').map(str::trim);
        let column = match values.next() {
            Some(column) if !column.is_empty() => column.to_string(),
            _ => continue,
        };
        let dir = match values.next().map(str::to_uppercase).as_deref() {
            Some("DESC") => SortDir::Desc,
            Some("ASC") | None => SortDir::Asc,
            Some(other) => {
                debug!("unrecognized sort direction `{}`, defaulting to ASC", other);
                SortDir::Asc
            }
        };
        match orders.iter_mut().find(|(c, _)| *c == column) {
            Some(entry) => entry.1 = dir,
            None => orders.push((column, dir)),
        }
    }
    orders
}

/// Case-insensitive `true`/`false`; anything else is absent, not `false`.
pub fn boolean_option(raw: Option<&str>) -> Option<bool> {
    match raw?.trim().to_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        other => {
            debug!("dropping invalid boolean literal `{}`", other);
            None
        }
    }
}

/// `NO ACTION`, `RESTRICT` and the empty string all normalize to "no rule";
/// anything else passes through verbatim.
pub fn delete_rule(raw: Option<&str>) -> Option<String> {
    let value = raw?.trim().to_string();
    if value.is_empty() || value == "NO ACTION" || value == "RESTRICT" {
        None
    } else {
        Some(value)
    }
}

/// The typed hint bundle parsed once from a foreign-key comment.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RelationHints {
    pub cascade: Option<Vec<String>>,
    pub fetch: Option<String>,
    pub order: Vec<(String, SortDir)>,
    pub orphan_removal: Option<bool>,
    pub owning_side: Option<bool>,
    pub unidirectional: bool,
    pub ignore: bool,
    /// Disambiguating token for relation accessors.
    pub related: Option<String>,
}

impl RelationHints {
    pub fn parse(comment: &str) -> Self {
        let tag = |name: &str| parse_comment_tag(comment, name);
        Self {
            cascade: cascade_option(tag("cascade").as_deref()),
            fetch: fetch_option(tag("fetch").as_deref()),
            order: order_option(tag("order").as_deref()),
            orphan_removal: boolean_option(tag("orphanRemoval").as_deref()),
            owning_side: boolean_option(tag("owningSide").as_deref()),
            unidirectional: boolean_option(tag("unidirectional").as_deref()) == Some(true),
            ignore: boolean_option(tag("ignore").as_deref()) == Some(true),
            related: tag("related"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn cascade_keeps_known_tokens_only() {
        assert_eq!(
            cascade_option(Some("persist, bogus, remove")),
            Some(vec!["persist".to_string(), "remove".to_string()])
        );
        assert_eq!(cascade_option(Some("bogus")), None);
        assert_eq!(cascade_option(None), None);
    }

    #[test]
    fn fetch_rejects_unknown_modes() {
        assert_eq!(fetch_option(Some("lazy")), Some("LAZY".to_string()));
        assert_eq!(fetch_option(Some("extra_lazy")), Some("EXTRA_LAZY".to_string()));
        assert_eq!(fetch_option(Some("BOGUS")), None);
    }

    #[test]
    fn order_defaults_and_overrides() {
        let orders = order_option(Some("name\ncreated_at, DESC\nname, desc"));
        assert_eq!(
            orders,
            vec![
                ("name".to_string(), SortDir::Desc),
                ("created_at".to_string(), SortDir::Desc),
            ]
        );
        let fallback = order_option(Some("name, SIDEWAYS"));
        assert_eq!(fallback, vec![("name".to_string(), SortDir::Asc)]);
    }

    #[test]
    fn boolean_is_absent_on_garbage() {
        assert_eq!(boolean_option(Some("TRUE")), Some(true));
        assert_eq!(boolean_option(Some("false")), Some(false));
        assert_eq!(boolean_option(Some("yes")), None);
    }

    #[test]
    fn delete_rule_normalizes_defaults() {
        assert_eq!(delete_rule(Some("NO ACTION")), None);
        assert_eq!(delete_rule(Some("RESTRICT")), None);
        assert_eq!(delete_rule(Some("")), None);
        assert_eq!(delete_rule(Some("CASCADE")), Some("CASCADE".to_string()));
        assert_eq!(delete_rule(Some("SET NULL")), Some("SET NULL".to_string()));
    }

    #[test]
    fn hints_parse_from_tagged_comment() {
        let hints = RelationHints::parse(
            "{d:cascade}persist{/d:cascade} {d:owningSide}true{/d:owningSide} {d:related}Spare{/d:related}",
        );
        assert_eq!(hints.cascade, Some(vec!["persist".to_string()]));
        assert_eq!(hints.owning_side, Some(true));
        assert_eq!(hints.related.as_deref(), Some("Spare"));
        assert!(!hints.unidirectional);
    }
}
