// qualified.rs
//
// Dotted names such as unit names (`System.SysUtils`).

use std::fmt;

/// A dotted name, compared segment by segment without regard to ASCII case.
#[derive(Debug, Clone, Default)]
pub struct QualifiedName {
    segments: Vec<String>,
}

impl QualifiedName {
    pub fn new(segments: Vec<String>) -> Self {
        Self { segments }
    }

    /// Split a dotted image into segments.
    pub fn parse(image: &str) -> Self {
        Self {
            segments: image.split('.').map(str::to_string).collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// True if `parts` spells this whole name, ignoring case.
    pub fn matches<S: AsRef<str>>(&self, parts: &[S]) -> bool {
        self.segments.len() == parts.len()
            && self
                .segments
                .iter()
                .zip(parts)
                .all(|(a, b)| a.eq_ignore_ascii_case(b.as_ref()))
    }

    /// Join the segments with dots.
    pub fn image(&self) -> String {
        self.segments.join(".")
    }
}

impl PartialEq for QualifiedName {
    fn eq(&self, other: &Self) -> bool {
        self.matches(&other.segments)
    }
}

impl Eq for QualifiedName {}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.image())
    }
}
