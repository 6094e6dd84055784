//! Schema-wide assembly: the raw-name lookup, derivation of the keys that
//! reference a given table and collection of the many-to-many descriptors
//! implied by junction tables. All derived sequences are sorted so repeated
//! runs over the same schema yield identical iteration order.

use std::collections::BTreeMap;

use tracing::debug;

use super::{naming, ForeignKey, ManyToManyRelation, Table};
use crate::Error;

#[derive(Clone, Debug)]
pub struct Schema {
    tables: Vec<Table>,
    by_name: BTreeMap<String, usize>,
}

impl Schema {
    /// Build the schema lookup. Fails when two tables collapse onto the
    /// same model name after singularization, since generated classes would
    /// overwrite each other.
    pub fn new(tables: Vec<Table>) -> Result<Self, Error> {
        let mut models: BTreeMap<String, String> = BTreeMap::new();
        for table in &tables {
            let model = naming::model_name(table);
            if let Some(first) = models.get(&model) {
                return Err(Error::DuplicateModelName {
                    model,
                    first: first.clone(),
                    second: table.name.clone(),
                });
            }
            models.insert(model, table.name.clone());
        }
        let by_name = tables
            .iter()
            .enumerate()
            .map(|(idx, table)| (table.name.clone(), idx))
            .collect();
        Ok(Self { tables, by_name })
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn table(&self, raw_name: &str) -> Option<&Table> {
        self.by_name.get(raw_name).map(|idx| &self.tables[*idx])
    }

    /// Foreign keys declared by other tables that reference `table`,
    /// ordered by declaring table and constraint name.
    pub fn referencing_keys(&self, table: &str) -> Vec<&ForeignKey> {
        let mut keys: Vec<&ForeignKey> = self
            .tables
            .iter()
            .flat_map(|t| t.foreign_keys.iter())
            .filter(|fk| fk.referenced_table == table)
            .collect();
        keys.sort_by(|a, b| {
            (&a.owning_table, &a.name, &a.local_columns)
                .cmp(&(&b.owning_table, &b.name, &b.local_columns))
        });
        keys
    }

    /// Many-to-many descriptors for `table`: one per junction key pointing
    /// at it, paired with the junction's other key. Ordered by junction
    /// name, then constraint name for self-paired junctions.
    pub fn many_to_many_relations(&self, table: &str) -> Vec<ManyToManyRelation> {
        let mut relations = Vec::new();
        for junction in self.tables.iter().filter(|t| t.is_many_to_many()) {
            let fks = &junction.foreign_keys;
            debug_assert_eq!(fks.len(), 2);
            for (reference, companion) in [(&fks[0], &fks[1]), (&fks[1], &fks[0])] {
                if reference.referenced_table != table {
                    continue;
                }
                if self.table(&companion.referenced_table).is_none() {
                    debug!(
                        "junction `{}` references unknown table `{}`, skipped",
                        junction.name, companion.referenced_table
                    );
                    continue;
                }
                relations.push(ManyToManyRelation {
                    junction: junction.name.clone(),
                    reference: reference.clone(),
                    companion: companion.clone(),
                    ref_table: companion.referenced_table.clone(),
                });
            }
        }
        relations.sort_by(|a, b| {
            (&a.junction, &a.reference.name).cmp(&(&b.junction, &b.reference.name))
        });
        relations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Column;
    use pretty_assertions::assert_eq;

    fn sample_schema() -> Schema {
        let persons = Table::new("persons", "").columns(vec![Column::new(1, "id", "INT").primary()]);
        let skills = Table::new("skills", "").columns(vec![Column::new(5, "id", "INT").primary()]);
        let tools = Table::new("tools", "")
            .columns(vec![
                Column::new(10, "id", "INT").primary(),
                Column::new(11, "persons_id", "INT"),
            ])
            .foreign_keys(vec![ForeignKey::new(
                "fk_tools_persons",
                "tools",
                "persons",
                vec!["persons_id"],
                vec!["id"],
            )]);
        let junction = Table::new("persons_has_skills", "")
            .columns(vec![
                Column::new(20, "persons_id", "INT").primary(),
                Column::new(21, "skills_id", "INT").primary(),
            ])
            .foreign_keys(vec![
                ForeignKey::new("fk_phs_persons", "persons_has_skills", "persons", vec!["persons_id"], vec!["id"]),
                ForeignKey::new("fk_phs_skills", "persons_has_skills", "skills", vec!["skills_id"], vec!["id"]),
            ]);
        Schema::new(vec![persons, skills, tools, junction]).unwrap()
    }

    #[test]
    fn referencing_keys_are_sorted_and_complete() {
        let schema = sample_schema();
        let keys = schema.referencing_keys("persons");
        let names: Vec<&str> = keys.iter().map(|fk| fk.name.as_str()).collect();
        assert_eq!(names, vec!["fk_phs_persons", "fk_tools_persons"]);
    }

    #[test]
    fn junctions_yield_one_descriptor_per_endpoint() {
        let schema = sample_schema();
        let persons_side = schema.many_to_many_relations("persons");
        assert_eq!(persons_side.len(), 1);
        assert_eq!(persons_side[0].ref_table, "skills");
        assert_eq!(persons_side[0].reference.name, "fk_phs_persons");
        assert_eq!(persons_side[0].companion.name, "fk_phs_skills");

        let skills_side = schema.many_to_many_relations("skills");
        assert_eq!(skills_side.len(), 1);
        assert_eq!(skills_side[0].ref_table, "persons");
    }

    #[test]
    fn duplicate_model_names_are_rejected() {
        let err = Schema::new(vec![Table::new("persons", ""), Table::new("person", "")]).unwrap_err();
        assert!(matches!(err, Error::DuplicateModelName { .. }));
    }
}
