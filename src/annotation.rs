/// A single mapping annotation, e.g. `@ORM\Table(name="persons", ...)`.
///
/// Arguments are kept in insertion order; named arguments built from `None`
/// are elided so callers can pass optional hint values straight through.
#[derive(Clone, Debug, PartialEq)]
pub struct Annotation {
    name: String,
    args: Vec<(Option<String>, Value)>,
    multiline: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Str(String),
    Literal(String),
    Bool(bool),
    Int(i64),
    List(Vec<Value>),
    Map(Vec<(String, Value)>, MapStyle),
    Annotation(Annotation),
}

/// Doctrine renders `@DiscriminatorMap({"key":"Class"})` but
/// `@OrderBy({"column" = "ASC"})`; the map style picks the separator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MapStyle {
    Colon,
    Equals,
}

impl Annotation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
            multiline: false,
        }
    }

    /// Positional argument.
    pub fn arg(mut self, value: Value) -> Self {
        self.args.push((None, value));
        self
    }

    /// Named argument; `None` is dropped entirely.
    pub fn opt(mut self, key: &str, value: Option<Value>) -> Self {
        if let Some(value) = value {
            self.args.push((Some(key.to_string()), value));
        }
        self
    }

    /// Render each argument on its own continuation line of the enclosing
    /// docblock. Used for `@JoinTable`.
    pub fn multiline(mut self) -> Self {
        self.multiline = true;
        self
    }

    pub fn render(&self) -> String {
        if self.args.is_empty() {
            return format!("@{}", self.name);
        }
        let rendered: Vec<String> = self
            .args
            .iter()
            .map(|(key, value)| match key {
                Some(key) => format!("{}={}", key, value.render()),
                None => value.render(),
            })
            .collect();
        if self.multiline {
            // Continuation lines carry the docblock asterisk themselves; the
            // line writer splits on '\n' and indents every physical line.
            let body = rendered
                .iter()
                .map(|arg| format!(" *     {}", arg))
                .collect::<Vec<_>>()
                .join(",\n");
            format!("@{}(\n{}\n * )", self.name, body)
        } else {
            format!("@{}({})", self.name, rendered.join(", "))
        }
    }
}

impl Value {
    pub fn string(value: impl Into<String>) -> Self {
        Self::Str(value.into())
    }

    pub fn strings(values: impl IntoIterator<Item = String>) -> Self {
        Self::List(values.into_iter().map(Value::Str).collect())
    }

    pub fn render(&self) -> String {
        match self {
            Self::Str(s) => format!("\"{}\"", s.replace('"', "\\\"")),
            Self::Literal(s) => s.clone(),
            Self::Bool(b) => b.to_string(),
            Self::Int(i) => i.to_string(),
            Self::List(items) => {
                let items: Vec<String> = items.iter().map(Value::render).collect();
                format!("{{{}}}", items.join(", "))
            }
            Self::Map(entries, style) => {
                let sep = match style {
                    MapStyle::Colon => ":",
                    MapStyle::Equals => " = ",
                };
                let entries: Vec<String> = entries
                    .iter()
                    .map(|(k, v)| format!("\"{}\"{}{}", k, sep, v.render()))
                    .collect();
                format!("{{{}}}", entries.join(", "))
            }
            Self::Annotation(inner) => inner.render(),
        }
    }
}

/// Render a lifecycle-callback marker, e.g. `@PrePersist` from `prePersist`.
pub fn callback_marker(event: &str) -> String {
    format!("@{}", crate::util::ucfirst(event))
}
