use crate::util::{parse_comment_tag, strip_comment_tags};

use super::{Column, ForeignKey};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndexKind {
    Primary,
    Unique,
    Index,
}

#[derive(Clone, Debug)]
pub struct Index {
    pub name: String,
    pub columns: Vec<String>,
    pub kind: IndexKind,
}

impl Index {
    pub fn new(name: impl Into<String>, columns: Vec<&str>, kind: IndexKind) -> Self {
        Self {
            name: name.into(),
            columns: columns.into_iter().map(str::to_string).collect(),
            kind,
        }
    }
}

/// A schema table: raw name, ordered columns, indexes and the foreign keys
/// it declares. Keys declared by other tables referencing this one are
/// derived by the schema-wide lookup, never stored here.
#[derive(Clone, Debug)]
pub struct Table {
    pub name: String,
    pub comment: String,
    pub columns: Vec<Column>,
    pub indexes: Vec<Index>,
    pub foreign_keys: Vec<ForeignKey>,
}

impl Table {
    pub fn new(name: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comment: comment.into(),
            columns: Vec::new(),
            indexes: Vec::new(),
            foreign_keys: Vec::new(),
        }
    }

    pub fn columns(mut self, columns: Vec<Column>) -> Self {
        self.columns = columns;
        self
    }

    pub fn indexes(mut self, indexes: Vec<Index>) -> Self {
        self.indexes = indexes;
        self
    }

    pub fn foreign_keys(mut self, foreign_keys: Vec<ForeignKey>) -> Self {
        self.foreign_keys = foreign_keys;
        self
    }

    pub fn parse_comment(&self, tag: &str) -> Option<String> {
        parse_comment_tag(&self.comment, tag)
    }

    /// Human-readable remainder of the comment once hint tags are removed.
    pub fn display_comment(&self) -> String {
        strip_comment_tags(&self.comment)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|col| col.name == name)
    }

    /// Reference-only table: consumed by relations but never emitted.
    pub fn is_external(&self) -> bool {
        self.parse_comment("external").as_deref() == Some("true")
    }

    /// A pure many-to-many junction: exactly two foreign keys and no
    /// meaningful columns beyond the key columns themselves. A `m2m=false`
    /// hint vetoes the structural detection, as does an external marker.
    pub fn is_many_to_many(&self) -> bool {
        if self.parse_comment("m2m").as_deref() == Some("false") || self.is_external() {
            return false;
        }
        if self.foreign_keys.len() != 2 {
            return false;
        }
        self.columns.iter().all(|col| {
            col.primary
                || self
                    .foreign_keys
                    .iter()
                    .any(|fk| fk.local_columns.contains(&col.name))
        })
    }

    /// Primary-key column names, merging per-column flags with an explicit
    /// primary index when the schema reader recorded one.
    pub fn primary_key_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .columns
            .iter()
            .filter(|col| col.primary)
            .map(|col| col.name.as_str())
            .collect();
        for index in self.indexes.iter().filter(|i| i.kind == IndexKind::Primary) {
            for column in &index.columns {
                if !names.contains(&column.as_str()) {
                    names.push(column.as_str());
                }
            }
        }
        names
    }

    pub fn unique_index_column_sets(&self) -> Vec<Vec<&str>> {
        self.indexes
            .iter()
            .filter(|index| index.kind == IndexKind::Unique)
            .map(|index| index.columns.iter().map(String::as_str).collect())
            .collect()
    }

    /// Whether `column` participates in any locally declared foreign key.
    pub fn column_has_relation(&self, column: &str) -> bool {
        self.foreign_keys
            .iter()
            .any(|fk| fk.local_columns.iter().any(|c| c == column))
    }

    /// Lifecycle-callback handlers from the `lifecycleCallbacks` hint:
    /// newline-separated `event:handler` entries, grouped per event in
    /// encounter order.
    pub fn lifecycle_callbacks(&self) -> Vec<(String, Vec<String>)> {
        let mut callbacks: Vec<(String, Vec<String>)> = Vec::new();
        let raw = match self.parse_comment("lifecycleCallbacks") {
            Some(raw) => raw,
            None => return callbacks,
        };
        for line in raw.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let mut parts = line.splitn(2, ':').map(str::trim);
            let (event, handler) = match (parts.next(), parts.next()) {
                (Some(event), Some(handler)) if !event.is_empty() && !handler.is_empty() => {
                    (event.to_string(), handler.to_string())
                }
                _ => continue,
            };
            match callbacks.iter_mut().find(|(e, _)| *e == event) {
                Some((_, handlers)) => handlers.push(handler),
                None => callbacks.push((event, vec![handler])),
            }
        }
        callbacks
    }
}
