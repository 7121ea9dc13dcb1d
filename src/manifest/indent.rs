/// Indentation unit of a JSON document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Indent(String);

impl Indent {
    /// Indentation of `width` spaces
    pub fn spaces(width: usize) -> Self {
        Self(" ".repeat(width))
    }

    /// Sniff the indentation from the leading whitespace of the second line.
    ///
    /// The first line of a pretty-printed manifest is the opening brace, so the
    /// second line holds the first key at one level of nesting. A missing or
    /// blank second line means the document is compact.
    pub fn detect(raw: &str) -> Self {
        let Some(second) = raw.split('\n').nth(1) else {
            return Self::default();
        };
        let second = second.trim_end();
        let content = second.trim_start();
        Self(second[..second.len() - content.len()].to_string())
    }

    /// Number of whitespace characters per level
    pub fn width(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}
