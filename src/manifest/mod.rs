//! package.json reading and writing
//!
//! The manifest is held as an ordered JSON object so untouched fields keep
//! their position. Indentation is sniffed from the file itself and reused
//! when the manifest is written back.

use anyhow::{Context, Result, bail};
use serde::Serialize;
use serde_json::{Map, Value, json, ser::PrettyFormatter};
use std::fs;
use std::path::{Path, PathBuf};

mod indent;

pub use indent::Indent;

/// A parsed package manifest
#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
    indent: Indent,
    trailing_newline: bool,
    fields: Map<String, Value>,
}

impl Manifest {
    /// Read and parse the manifest at `path`
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
        Self::parse(path, &raw)
    }

    /// Parse manifest text that was read from `path`
    pub fn parse(path: impl Into<PathBuf>, raw: &str) -> Result<Self> {
        let path = path.into();
        let value: Value = serde_json::from_str(raw)
            .with_context(|| format!("Failed to parse manifest: {}", path.display()))?;

        let Value::Object(fields) = value else {
            bail!("Manifest is not a JSON object: {}", path.display());
        };

        Ok(Self {
            indent: Indent::detect(raw),
            trailing_newline: raw.ends_with('\n'),
            path,
            fields,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory containing the manifest; `.` for a bare file name
    pub fn directory(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    pub fn indent(&self) -> &Indent {
        &self.indent
    }

    /// Current `repository` value, if set
    pub fn repository(&self) -> Option<&Value> {
        self.field("repository")
    }

    /// Current `homepage` value, if set
    pub fn homepage(&self) -> Option<&Value> {
        self.field("homepage")
    }

    /// Whether `repository` is already `{ "type": "git", "url": url }`
    pub fn repository_matches(&self, url: &str) -> bool {
        self.repository().is_some_and(|repo| {
            repo.get("type").and_then(Value::as_str) == Some("git")
                && repo.get("url").and_then(Value::as_str) == Some(url)
        })
    }

    /// Whether `homepage` is already `url`
    pub fn homepage_matches(&self, url: &str) -> bool {
        self.homepage().and_then(Value::as_str) == Some(url)
    }

    pub fn set_repository(&mut self, url: &str) {
        self.fields.insert(
            "repository".to_string(),
            json!({ "type": "git", "url": url }),
        );
    }

    pub fn set_homepage(&mut self, url: &str) {
        self.fields
            .insert("homepage".to_string(), Value::String(url.to_string()));
    }

    /// Serialize with the detected indentation
    pub fn render(&self) -> Result<String> {
        let mut rendered = if self.indent.is_empty() {
            serde_json::to_string(&self.fields)?
        } else {
            let mut buf = Vec::new();
            let formatter = PrettyFormatter::with_indent(self.indent.as_bytes());
            let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
            self.fields.serialize(&mut serializer)?;
            String::from_utf8(buf).context("Serialized manifest is not valid UTF-8")?
        };

        if self.trailing_newline {
            rendered.push('\n');
        }
        Ok(rendered)
    }

    /// Write the manifest back to its path, replacing the previous contents
    pub fn save(&self) -> Result<()> {
        let rendered = self.render()?;
        fs::write(&self.path, rendered)
            .with_context(|| format!("Failed to write manifest: {}", self.path.display()))?;
        tracing::debug!("Wrote {}", self.path.display());
        Ok(())
    }

    // null, false, 0 and "" count as unset
    fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key).filter(|value| match value {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
            Value::String(s) => !s.is_empty(),
            _ => true,
        })
    }
}
