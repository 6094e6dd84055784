/// Schema-type to Doctrine-type conversion.
///
/// The raw type is whatever the schema reader recorded, e.g. `VARCHAR(45)`
/// or `TINYINT(1)`; only the base keyword decides the mapping.

pub(crate) fn doctrine_type(raw: &str) -> String {
    let base = base_type(raw);
    match base.as_str() {
        "int" | "integer" | "mediumint" => "integer",
        "tinyint" => {
            if raw.replace(' ', "").to_lowercase().starts_with("tinyint(1)") {
                "boolean"
            } else {
                "integer"
            }
        }
        "smallint" => "smallint",
        "bigint" => "bigint",
        "varchar" | "char" | "nvarchar" | "nchar" => "string",
        "text" | "tinytext" | "mediumtext" | "longtext" => "text",
        "decimal" | "numeric" => "decimal",
        "float" | "double" | "real" => "float",
        "bool" | "boolean" => "boolean",
        "date" => "date",
        "datetime" | "timestamp" => "datetime",
        "time" => "time",
        "json" => "json",
        "blob" | "tinyblob" | "mediumblob" | "longblob" | "binary" | "varbinary" => "blob",
        other => return other.to_string(),
    }
    .to_string()
}

/// Declared length for sized string types, used for `@Column(length=...)`.
pub(crate) fn length(raw: &str) -> Option<i64> {
    if doctrine_type(raw) != "string" {
        return None;
    }
    let start = raw.find('(')?;
    let end = raw.find(')')?;
    raw[start + 1..end].trim().parse().ok()
}

/// Doctrine types a discriminator column may use: the native set minus
/// blob, datetime, date, time and object.
pub(crate) const DISCRIMINATOR_TYPES: [&str; 9] = [
    "bigint", "boolean", "decimal", "float", "integer", "json", "smallint", "string", "text",
];

pub(crate) fn is_discriminator_type(doctrine: &str) -> bool {
    DISCRIMINATOR_TYPES.iter().any(|t| *t == doctrine)
}

/// Type hint used in accessor docblocks.
pub(crate) fn php_type_hint(doctrine: &str) -> &'static str {
    match doctrine {
        "integer" | "smallint" | "bigint" => "integer",
        "string" | "text" => "string",
        "decimal" | "float" => "float",
        "boolean" => "boolean",
        "date" | "datetime" | "time" => "\\DateTime",
        "json" => "array",
        _ => "mixed",
    }
}

fn base_type(raw: &str) -> String {
    let trimmed = raw.trim();
    let end = trimmed
        .find(|c: char| c == '(' || c.is_whitespace())
        .unwrap_or(trimmed.len());
    trimmed[..end].to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn common_types_convert() {
        assert_eq!(doctrine_type("INT"), "integer");
        assert_eq!(doctrine_type("VARCHAR(45)"), "string");
        assert_eq!(doctrine_type("TINYINT(1)"), "boolean");
        assert_eq!(doctrine_type("TINYINT(4)"), "integer");
        assert_eq!(doctrine_type("DATETIME"), "datetime");
        assert_eq!(doctrine_type("DECIMAL(10,2)"), "decimal");
    }

    #[test]
    fn length_only_for_strings() {
        assert_eq!(length("VARCHAR(45)"), Some(45));
        assert_eq!(length("VARCHAR"), None);
        assert_eq!(length("INT(11)"), None);
    }

    #[test]
    fn discriminator_type_set() {
        assert!(is_discriminator_type("string"));
        assert!(is_discriminator_type("integer"));
        assert!(!is_discriminator_type("datetime"));
        assert!(!is_discriminator_type("blob"));
    }
}
