use std::str::FromStr;

use crate::Error;

/// Identifier quoting strategy for table and column names that collide
/// with reserved words of the mapping dialect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuoteStrategy {
    Never,
    Auto,
    Always,
}

impl FromStr for QuoteStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "never" => Self::Never,
            "auto" => Self::Auto,
            "always" => Self::Always,
            v => return Err(Error::UnsupportedOption(v.to_string())),
        })
    }
}

/// Strategy emitted with `@GeneratedValue` on auto-increment primary keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeneratedValueStrategy {
    Auto,
    Identity,
    Sequence,
    Table,
    None,
}

impl GeneratedValueStrategy {
    /// Annotation literal, or `None` when the strategy suppresses the
    /// annotation altogether.
    pub fn as_annotation(&self) -> Option<&'static str> {
        match self {
            Self::Auto => Some("AUTO"),
            Self::Identity => Some("IDENTITY"),
            Self::Sequence => Some("SEQUENCE"),
            Self::Table => Some("TABLE"),
            Self::None => None,
        }
    }
}

impl FromStr for GeneratedValueStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "auto" => Self::Auto,
            "identity" => Self::Identity,
            "sequence" => Self::Sequence,
            "table" => Self::Table,
            "none" => Self::None,
            v => return Err(Error::UnsupportedOption(v.to_string())),
        })
    }
}

/// The full named-option set consumed from the configuration collaborator.
/// Defaults mirror a plain bundle-less Doctrine project.
#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    pub bundle_namespace: String,
    pub entity_namespace: String,
    pub base_entity_namespace: String,
    pub repository_namespace: String,
    /// Prepended to every annotation name, e.g. `ORM\` yields `@ORM\Entity`.
    pub annotation_prefix: String,
    pub indentation: usize,
    pub quote_identifier_strategy: QuoteStrategy,
    /// Fold pure junction tables into `ManyToMany` fields on their endpoints
    /// instead of emitting them as entities.
    pub skip_m2m_tables: bool,
    pub skip_getter_setter: bool,
    /// Drop plain column fields already covered by a relation field.
    pub skip_column_with_relation: bool,
    pub generate_entity_serialization: bool,
    pub generate_extendable_entity: bool,
    pub extendable_entity_single_inheritance: bool,
    pub overwrite_extended_entities: bool,
    pub automatic_repository: bool,
    pub default_discriminator_type: String,
    /// Template for disambiguated relation accessors; `%name%` and
    /// `%related%` are substituted.
    pub related_var_name_format: String,
    pub generated_value_strategy: GeneratedValueStrategy,
    pub file_extension: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            bundle_namespace: String::new(),
            entity_namespace: "Entity".to_string(),
            base_entity_namespace: "Entity".to_string(),
            repository_namespace: "Entity".to_string(),
            annotation_prefix: "ORM\\".to_string(),
            indentation: 4,
            quote_identifier_strategy: QuoteStrategy::Auto,
            skip_m2m_tables: true,
            skip_getter_setter: false,
            skip_column_with_relation: false,
            generate_entity_serialization: true,
            generate_extendable_entity: false,
            extendable_entity_single_inheritance: false,
            overwrite_extended_entities: false,
            automatic_repository: true,
            default_discriminator_type: "string".to_string(),
            related_var_name_format: "%name%%related%".to_string(),
            generated_value_strategy: GeneratedValueStrategy::Auto,
            file_extension: "php".to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Entity namespace including the bundle prefix; `base` selects the
    /// base-entity namespace used by extendable generation.
    pub fn entity_namespace(&self, base: bool) -> String {
        let ns = if base {
            &self.base_entity_namespace
        } else {
            &self.entity_namespace
        };
        join_namespace(&self.bundle_namespace, ns)
    }

    pub fn repository_namespace(&self) -> String {
        join_namespace(&self.bundle_namespace, &self.repository_namespace)
    }

    /// Whether base and concrete entities share one namespace, in which case
    /// base classes carry a `Base` name prefix instead of a separate path.
    pub fn base_shares_namespace(&self) -> bool {
        self.entity_namespace == self.base_entity_namespace
    }
}

pub(crate) fn join_namespace(left: &str, right: &str) -> String {
    match (left.is_empty(), right.is_empty()) {
        (true, _) => right.to_string(),
        (_, true) => left.to_string(),
        _ => format!("{}\\{}", left, right),
    }
}
