use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Destination namespace for generated files. The overwrite policy queries
/// `has_file` before deciding whether an extended entity may be rewritten,
/// so implementations must reflect files that existed before the run.
pub trait Storage {
    fn has_file(&self, path: &str) -> bool;

    fn put_file(&mut self, path: &str, content: String) -> io::Result<()>;
}

/// In-memory storage backend, used by the test suite and by callers that
/// post-process generated sources before flushing them elsewhere.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    files: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }
}

impl Storage for MemoryStorage {
    fn has_file(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    fn put_file(&mut self, path: &str, content: String) -> io::Result<()> {
        self.files.insert(path.to_string(), content);
        Ok(())
    }
}

/// Filesystem-backed storage rooted at an output directory.
#[derive(Debug)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Storage for FileStorage {
    fn has_file(&self, path: &str) -> bool {
        self.root.join(path).is_file()
    }

    fn put_file(&mut self, path: &str, content: String) -> io::Result<()> {
        let target = self.root.join(path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(target, content)
    }
}

/// Buffers formatted lines for one output file and flushes them to the
/// storage backend on `close`. Indentation is tracked as a scope; multi-line
/// payloads are split so every physical line receives the current indent.
pub struct LineWriter<'a> {
    storage: &'a mut dyn Storage,
    path: String,
    indent_width: usize,
    level: usize,
    lines: Vec<String>,
}

impl<'a> LineWriter<'a> {
    pub fn open(storage: &'a mut dyn Storage, path: impl Into<String>, indent_width: usize) -> Self {
        Self {
            storage,
            path: path.into(),
            indent_width,
            level: 0,
            lines: Vec::new(),
        }
    }

    pub fn write(&mut self, line: impl AsRef<str>) -> &mut Self {
        let pad = " ".repeat(self.indent_width * self.level);
        for part in line.as_ref().split('\n') {
            if part.is_empty() {
                self.lines.push(String::new());
            } else {
                self.lines.push(format!("{}{}", pad, part));
            }
        }
        self
    }

    pub fn write_if(&mut self, condition: bool, line: impl AsRef<str>) -> &mut Self {
        if condition {
            self.write(line);
        }
        self
    }

    pub fn indent(&mut self) -> &mut Self {
        self.level += 1;
        self
    }

    pub fn outdent(&mut self) -> &mut Self {
        self.level = self.level.saturating_sub(1);
        self
    }

    pub fn close(self) -> io::Result<()> {
        let mut content = self.lines.join("\n");
        content.push('\n');
        self.storage.put_file(&self.path, content)
    }
}
