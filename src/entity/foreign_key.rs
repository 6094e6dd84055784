use crate::util::parse_comment_tag;

use super::{RelationHints, Table};

/// A directional foreign-key descriptor. Tables are referenced by raw name
/// so the schema stays an acyclic value graph; resolution goes through the
/// schema-wide lookup.
#[derive(Clone, Debug)]
pub struct ForeignKey {
    /// Constraint name; used for stable ordering and diagnostics.
    pub name: String,
    /// Raw name of the table declaring this key.
    pub owning_table: String,
    /// Raw name of the referenced table.
    pub referenced_table: String,
    pub local_columns: Vec<String>,
    pub foreign_columns: Vec<String>,
    /// Raw delete rule as recorded by the schema reader; normalized through
    /// the delete-rule parser at emission time.
    pub delete_rule: Option<String>,
    pub comment: String,
}

impl ForeignKey {
    pub fn new(
        name: impl Into<String>,
        owning_table: impl Into<String>,
        referenced_table: impl Into<String>,
        local_columns: Vec<&str>,
        foreign_columns: Vec<&str>,
    ) -> Self {
        Self {
            name: name.into(),
            owning_table: owning_table.into(),
            referenced_table: referenced_table.into(),
            local_columns: local_columns.into_iter().map(str::to_string).collect(),
            foreign_columns: foreign_columns.into_iter().map(str::to_string).collect(),
            delete_rule: None,
            comment: String::new(),
        }
    }

    pub fn delete_rule(mut self, rule: impl Into<String>) -> Self {
        self.delete_rule = Some(rule.into());
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn parse_comment(&self, tag: &str) -> Option<String> {
        parse_comment_tag(&self.comment, tag)
    }

    /// Typed hint bundle, parsed fresh so schema mutations between passes
    /// can never leak stale options.
    pub fn hints(&self) -> RelationHints {
        RelationHints::parse(&self.comment)
    }

    pub fn is_self_referencing(&self) -> bool {
        self.owning_table == self.referenced_table
    }

    /// A foreign key is many-to-one unless its local columns exactly cover
    /// the declaring table's primary key or one of its unique indexes, in
    /// which case the relation collapses to one-to-one.
    pub fn is_many_to_one(&self, owning: &Table) -> bool {
        let mut locals: Vec<&str> = self.local_columns.iter().map(String::as_str).collect();
        locals.sort_unstable();

        let mut primary: Vec<&str> = owning.primary_key_names();
        primary.sort_unstable();
        if !primary.is_empty() && primary == locals {
            return false;
        }
        for mut unique in owning.unique_index_column_sets() {
            unique.sort_unstable();
            if unique == locals {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Column, Index, IndexKind};

    fn owning_table() -> Table {
        let mut table = Table::new("tools", "");
        table.columns = vec![
            Column::new(1, "id", "INT").primary().auto_increment(),
            Column::new(2, "persons_id", "INT"),
        ];
        table.indexes = vec![Index::new("uq_tools_persons", vec!["persons_id"], IndexKind::Unique)];
        table
    }

    #[test]
    fn plain_key_is_many_to_one() {
        let table = Table::new("tools", "");
        let fk = ForeignKey::new("fk", "tools", "persons", vec!["persons_id"], vec!["id"]);
        assert!(fk.is_many_to_one(&table));
    }

    #[test]
    fn unique_local_columns_collapse_to_one_to_one() {
        let table = owning_table();
        let fk = ForeignKey::new("fk", "tools", "persons", vec!["persons_id"], vec!["id"]);
        assert!(!fk.is_many_to_one(&table));

        let pk_fk = ForeignKey::new("fk2", "tools", "persons", vec!["id"], vec!["id"]);
        assert!(!pk_fk.is_many_to_one(&table));
    }
}
