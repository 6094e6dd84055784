//! Relationship classification: cardinality is decided on the foreign key
//! itself (`ForeignKey::is_many_to_one`); this module derives many-to-many
//! descriptors from junction tables, resolves the owning side and hosts the
//! skip predicates consulted by the emission pipeline.

use heck::CamelCase;
use tracing::{debug, warn};

use super::{GeneratorConfig, ForeignKey, Schema};

/// A many-to-many relation seen from one endpoint. Transient: recomputed
/// per emission pass from the junction's two foreign keys.
#[derive(Clone, Debug)]
pub struct ManyToManyRelation {
    /// Raw name of the junction table.
    pub junction: String,
    /// Key from the junction to the endpoint this descriptor belongs to.
    pub reference: ForeignKey,
    /// Key from the junction to the opposite endpoint.
    pub companion: ForeignKey,
    /// Raw name of the opposite endpoint table.
    pub ref_table: String,
}

impl ManyToManyRelation {
    /// Resolve which endpoint owns the relation (carries the join table).
    ///
    /// An explicit `owningSide=true` hint wins; the reference side is
    /// checked first, so contradictory hints on both keys resolve to the
    /// reference side and are flagged as ambiguous. Without hints the side
    /// whose first junction column has the lower schema-assigned column id
    /// becomes owning — deterministic for a fixed column-id numbering,
    /// nothing more.
    pub fn is_owning_side(&self, schema: &Schema) -> bool {
        let reference_hint = self.reference.hints().owning_side;
        let companion_hint = self.companion.hints().owning_side;
        if reference_hint == Some(true) && companion_hint == Some(true) {
            warn!(
                "contradictory owningSide hints on `{}` and `{}`, using `{}`",
                self.reference.name, self.companion.name, self.reference.name
            );
            return true;
        }
        if reference_hint == Some(true) {
            return true;
        }
        if companion_hint == Some(true) {
            return false;
        }

        let column_id = |fk: &ForeignKey| {
            schema
                .table(&self.junction)
                .and_then(|junction| fk.local_columns.first().and_then(|name| junction.column(name)))
                .map(|col| col.id)
                .unwrap_or(u64::MAX)
        };
        column_id(&self.reference) < column_id(&self.companion)
    }
}

/// Disambiguating suffix for a relation accessor. Applies when the key
/// carries an explicit `related` hint, or when its declaring table holds
/// more than one key towards the same target (suffix derived from the local
/// column names).
pub fn related_suffix(schema: &Schema, fk: &ForeignKey) -> Option<String> {
    if let Some(related) = fk.hints().related {
        return Some(related);
    }
    let siblings = schema
        .table(&fk.owning_table)
        .map(|table| {
            table
                .foreign_keys
                .iter()
                .filter(|other| other.referenced_table == fk.referenced_table)
                .count()
        })
        .unwrap_or(0);
    if siblings > 1 {
        let columns = fk
            .local_columns
            .iter()
            .map(|col| col.to_camel_case())
            .collect::<Vec<_>>()
            .join("");
        Some(format!("RelatedBy{}", columns))
    } else {
        None
    }
}

/// Human-readable form of the suffix for accessor docblocks.
pub fn related_text(fk: &ForeignKey) -> Option<String> {
    if let Some(related) = fk.hints().related {
        return Some(format!("related by `{}`", related));
    }
    None
}

/// Whether a key declared by another table referencing `self` must be left
/// out of the inverse side: its declaring table is a folded junction, or
/// the relation is unidirectional or explicitly ignored.
pub fn is_referencing_key_ignored(schema: &Schema, config: &GeneratorConfig, fk: &ForeignKey) -> bool {
    if config.skip_m2m_tables
        && schema
            .table(&fk.owning_table)
            .map(|t| t.is_many_to_many())
            .unwrap_or(false)
    {
        debug!("inverse relation via junction `{}` folds into many-to-many", fk.owning_table);
        return true;
    }
    let hints = fk.hints();
    if hints.unidirectional {
        debug!("inverse side of unidirectional relation `{}` suppressed", fk.name);
        return true;
    }
    if hints.ignore {
        debug!("relation `{}` ignored by hint", fk.name);
        return true;
    }
    false
}

/// Whether a locally declared key must be left out of the owning side: it
/// points at a folded junction, or is explicitly ignored.
pub fn is_local_key_ignored(schema: &Schema, config: &GeneratorConfig, fk: &ForeignKey) -> bool {
    if config.skip_m2m_tables
        && schema
            .table(&fk.referenced_table)
            .map(|t| t.is_many_to_many())
            .unwrap_or(false)
    {
        debug!("relation `{}` targets a folded junction, skipped", fk.name);
        return true;
    }
    if fk.hints().ignore {
        debug!("relation `{}` ignored by hint", fk.name);
        return true;
    }
    false
}
