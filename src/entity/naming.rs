//! Pure name derivation: raw schema identifiers to class and member names,
//! pluralized collection names, disambiguated relation accessors and quoted
//! identifiers. No I/O, deterministic.

use heck::CamelCase;

use crate::util::is_reserved_word;

use super::{QuoteStrategy, Table};

/// Singular, case-normalized class name: `persons` becomes `Person`.
pub fn model_name(table: &Table) -> String {
    model_name_of(&table.name)
}

/// Pluralized class name used for collection accessors: `Person` becomes
/// `People`.
pub fn plural_model_name(table: &Table) -> String {
    plural_model_name_of(&table.name)
}

pub fn model_name_of(raw_table_name: &str) -> String {
    singularize(raw_table_name).to_camel_case()
}

pub fn plural_model_name_of(raw_table_name: &str) -> String {
    pluralize(&model_name_of(raw_table_name))
}

/// Accessor token for a relation towards `target_name`, optionally carrying
/// a disambiguating suffix. With two foreign keys from `Tool` to `Person`
/// and a `Spare` suffix on the second, the collections become `tools` and
/// `toolsAsSpare`-style names instead of colliding, following the
/// `%name%%related%` template from configuration.
pub fn related_var_name(
    target_name: &str,
    related: Option<&str>,
    plural_form: bool,
    format: &str,
) -> String {
    let name = if plural_form {
        pluralize(target_name)
    } else {
        target_name.to_string()
    };
    match related {
        Some(related) => format
            .replace("%name%", &name)
            .replace("%related%", related),
        None => name,
    }
}

/// Quote a table/column identifier when it collides with a reserved word of
/// the mapping dialect, governed by the configured strategy.
pub fn quote_identifier(name: &str, strategy: QuoteStrategy) -> String {
    let quote = match strategy {
        QuoteStrategy::Never => false,
        QuoteStrategy::Auto => is_reserved_word(name),
        QuoteStrategy::Always => true,
    };
    if quote {
        format!("`{}`", name)
    } else {
        name.to_string()
    }
}

fn singularize(name: &str) -> String {
    pluralizer::pluralize(name, 1, false)
}

fn pluralize(name: &str) -> String {
    let plural = pluralizer::pluralize(name, 2, false);
    if plural == name {
        // Uncountable per the pluralizer; force a plural so collection and
        // scalar accessors never collide.
        format!("{}s", name)
    } else {
        plural
    }
}
