//! Single-table-inheritance resolution: discriminator column, data type and
//! the ordered key-to-class map, including the synthesized entry that keeps
//! the root class representable when the schema declared none.

use crate::Error;

use super::{datatype, naming, GeneratorConfig, Table};

#[derive(Clone, Debug, PartialEq)]
pub struct DiscriminatorColumn {
    pub name: String,
    /// Doctrine type of the discriminator values.
    pub dtype: String,
}

/// Per-root-table inheritance descriptor. An empty map means the table does
/// not participate in single-table inheritance.
#[derive(Clone, Debug, PartialEq)]
pub struct Discriminator {
    pub column: DiscriminatorColumn,
    /// Ordered discriminator key to concrete class name; duplicate keys
    /// overwrite earlier entries in place.
    pub map: Vec<(String, String)>,
}

impl Discriminator {
    pub fn is_single_inheritance(&self) -> bool {
        !self.map.is_empty()
    }
}

pub fn resolve(table: &Table, config: &GeneratorConfig) -> Result<Discriminator, Error> {
    let class_name = naming::model_name(table);
    let column = discriminator_column(table, config)?;
    let mut map = parse_map(table);

    // An "extendable with single inheritance" table, or any table with an
    // explicit map, must be able to name its own class as a concrete
    // discriminator value.
    let participates = config.extendable_entity_single_inheritance || !map.is_empty();
    if participates && !map.iter().any(|(_, class)| *class == class_name) {
        let key = if matches!(column.dtype.as_str(), "string" | "text") {
            if config.generate_extendable_entity {
                "extended".to_string()
            } else {
                class_name.to_lowercase()
            }
        } else {
            "1".to_string()
        };
        insert(&mut map, key, class_name);
    }

    Ok(Discriminator { column, map })
}

fn discriminator_column(table: &Table, config: &GeneratorConfig) -> Result<DiscriminatorColumn, Error> {
    if let Some(column_name) = table.parse_comment("discriminator") {
        let column = table.column(&column_name).ok_or_else(|| {
            Error::DiscriminatorColumnNotFound {
                table: naming::model_name(table),
                column: column_name.clone(),
            }
        })?;
        return Ok(DiscriminatorColumn {
            name: column_name,
            dtype: column.doctrine_type(),
        });
    }

    let dtype = match table.parse_comment("discriminatorType") {
        Some(raw) => {
            let dtype = raw.trim().to_lowercase();
            if !datatype::is_discriminator_type(&dtype) {
                return Err(Error::DiscriminatorTypeNotAllowed(dtype));
            }
            dtype
        }
        None => config.default_discriminator_type.clone(),
    };
    Ok(DiscriminatorColumn {
        name: "discr".to_string(),
        dtype,
    })
}

/// `key=ClassName, key=ClassName, ...` in encounter order, last wins.
fn parse_map(table: &Table) -> Vec<(String, String)> {
    let mut map = Vec::new();
    let raw = match table.parse_comment("discriminatorMap") {
        Some(raw) => raw,
        None => return map,
    };
    for mapping in raw.split(',') {
        let mut parts = mapping.splitn(2, '=').map(str::trim);
        if let (Some(key), Some(class)) = (parts.next(), parts.next()) {
            if !key.is_empty() && !class.is_empty() {
                insert(&mut map, key.to_string(), class.to_string());
            }
        }
    }
    map
}

fn insert(map: &mut Vec<(String, String)>, key: String, class: String) {
    match map.iter_mut().find(|(k, _)| *k == key) {
        Some(entry) => entry.1 = class,
        None => map.push((key, class)),
    }
}
