/// Extract the content of a `{d:tag}...{/d:tag}` directive from a free-text
/// schema comment. Both the `d` and `doctrine` prefixes are recognized.
/// Returns the trimmed content, or `None` when the tag is absent.
pub(crate) fn parse_comment_tag(comment: &str, tag: &str) -> Option<String> {
    for prefix in COMMENT_TAG_PREFIXES {
        let open = format!("{{{}:{}}}", prefix, tag);
        let close = format!("{{/{}:{}}}", prefix, tag);
        if let Some(start) = comment.find(&open) {
            let rest = &comment[start + open.len()..];
            if let Some(end) = rest.find(&close) {
                let content = rest[..end].trim();
                if !content.is_empty() {
                    return Some(content.to_string());
                }
                return None;
            }
        }
    }
    None
}

/// Strip every `{d:tag}...{/d:tag}` directive, leaving the human-readable
/// remainder of a comment.
pub(crate) fn strip_comment_tags(comment: &str) -> String {
    let mut out = String::with_capacity(comment.len());
    let mut rest = comment;
    'outer: while !rest.is_empty() {
        for prefix in COMMENT_TAG_PREFIXES {
            let open_start = format!("{{{}:", prefix);
            if let Some(start) = rest.find(&open_start) {
                if let Some(tag_end) = rest[start..].find('}') {
                    let tag = &rest[start + open_start.len()..start + tag_end];
                    let close = format!("{{/{}:{}}}", prefix, tag);
                    if let Some(end) = rest[start..].find(&close) {
                        out.push_str(&rest[..start]);
                        rest = &rest[start + end + close.len()..];
                        continue 'outer;
                    }
                }
            }
        }
        out.push_str(rest);
        break;
    }
    out.trim().to_string()
}

pub(crate) const COMMENT_TAG_PREFIXES: [&str; 2] = ["d", "doctrine"];

pub(crate) fn lcfirst(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

pub(crate) fn ucfirst(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

pub(crate) fn is_reserved_word(word: &str) -> bool {
    let lowered = word.to_lowercase();
    RESERVED_WORDS.iter().any(|w| *w == lowered)
}

/// Reserved words of the target mapping dialect (MySQL). Identifiers that
/// collide with one of these are wrapped in backticks under the `auto`
/// quoting strategy.
pub(crate) const RESERVED_WORDS: [&str; 93] = [
    "accessible", "add", "all", "alter", "analyze", "and", "as", "asc", "before", "between",
    "bigint", "binary", "blob", "both", "by", "call", "cascade", "case", "change", "char",
    "check", "collate", "column", "condition", "constraint", "continue", "convert", "create",
    "cross", "current_date", "current_time", "current_timestamp", "database", "databases",
    "decimal", "declare", "default", "delete", "desc", "describe", "distinct", "double", "drop",
    "each", "else", "exists", "explain", "false", "float", "for", "force", "foreign", "from",
    "grant", "group", "having", "if", "ignore", "in", "index", "inner", "insert", "int",
    "integer", "interval", "into", "is", "join", "key", "keys", "kill", "leading", "left",
    "like", "limit", "lock", "match", "natural", "not", "null", "on", "or", "order", "outer",
    "primary", "references", "select", "set", "table", "then", "to", "update", "where",
];
