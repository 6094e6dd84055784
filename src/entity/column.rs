use crate::util::parse_comment_tag;

/// A schema column as delivered by the schema-model collaborator.
/// Immutable once the schema is loaded.
#[derive(Clone, Debug)]
pub struct Column {
    /// Insertion-order ordinal assigned by the schema reader; the
    /// many-to-many owning-side tie-break compares these.
    pub id: u64,
    pub name: String,
    /// Raw schema type, e.g. `VARCHAR(45)`.
    pub col_type: String,
    pub nullable: bool,
    pub primary: bool,
    pub auto_increment: bool,
    pub comment: String,
}

impl Column {
    pub fn new(id: u64, name: impl Into<String>, col_type: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            col_type: col_type.into(),
            nullable: false,
            primary: false,
            auto_increment: false,
            comment: String::new(),
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn primary(mut self) -> Self {
        self.primary = true;
        self
    }

    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn parse_comment(&self, tag: &str) -> Option<String> {
        parse_comment_tag(&self.comment, tag)
    }

    pub(crate) fn doctrine_type(&self) -> String {
        super::datatype::doctrine_type(&self.col_type)
    }
}
