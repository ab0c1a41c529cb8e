//! Structured placeholder keys.
//!
//! Template markers are textual (`${vulnerability.name#2}`), but call sites
//! never concatenate strings: a [`TemplateKey`] carries the base name plus
//! an ordered list of 1-based indices and serializes to the exact marker
//! form. Nested regions extend the index list, so the attachment `j` of
//! vulnerability `i` addresses `vulnerability.attachment.image#i#j`.

use std::fmt;

/// A placeholder name plus its clone indices.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TemplateKey {
    name: String,
    indices: Vec<usize>,
}

impl TemplateKey {
    /// Key without indices (a top-level placeholder or region name).
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            indices: Vec::new(),
        }
    }

    /// Append a 1-based clone index, producing the key inside that clone.
    pub fn index(&self, index: usize) -> Self {
        debug_assert!(index >= 1, "clone indices are 1-based");
        let mut indices = self.indices.clone();
        indices.push(index);
        Self {
            name: self.name.clone(),
            indices,
        }
    }

    /// Base name without indices.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Clone indices, outermost first.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Parse the textual form `name#i#j`.
    ///
    /// Returns `None` for malformed suffixes (non-numeric or zero index).
    pub fn parse(text: &str) -> Option<Self> {
        let mut parts = text.split('#');
        let name = parts.next()?;
        if name.is_empty() {
            return None;
        }
        let mut indices = Vec::new();
        for part in parts {
            let index: usize = part.parse().ok()?;
            if index == 0 {
                return None;
            }
            indices.push(index);
        }
        Some(Self {
            name: name.to_string(),
            indices,
        })
    }

    /// The `${...}` marker for this key.
    pub fn marker(&self) -> String {
        format!("${{{}}}", self)
    }
}

impl fmt::Display for TemplateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for index in &self.indices {
            write!(f, "#{}", index)?;
        }
        Ok(())
    }
}

impl From<&str> for TemplateKey {
    fn from(name: &str) -> Self {
        TemplateKey::new(name)
    }
}
