//! Path element and path types.

use jsonptr::PointerBuf;
use std::fmt;

/// PathElement represents one level of path navigation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathElement {
    /// Field name for map fields.
    FieldName(String),
    /// Index for list elements.
    Index(usize),
}

impl PathElement {
    /// Creates a new field name path element.
    pub fn field_name(name: impl Into<String>) -> Self {
        PathElement::FieldName(name.into())
    }

    /// Creates a new index path element.
    pub fn index(i: usize) -> Self {
        PathElement::Index(i)
    }

    fn token(&self) -> String {
        match self {
            PathElement::FieldName(name) => name.clone(),
            PathElement::Index(i) => i.to_string(),
        }
    }
}

/// Path represents a complete path to a nested field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    elements: Vec<PathElement>,
}

impl Path {
    /// Creates a new empty path.
    pub fn new() -> Self {
        Path {
            elements: Vec::new(),
        }
    }

    /// Creates a path made only of field names.
    pub fn fields<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names
            .into_iter()
            .map(|name| PathElement::FieldName(name.into()))
            .collect()
    }

    /// Returns the number of elements in the path.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true if the path is empty.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Appends a path element.
    pub fn push(&mut self, element: PathElement) {
        self.elements.push(element);
    }

    /// Returns a new path with a field name appended.
    pub fn with_field(&self, name: impl Into<String>) -> Self {
        self.with(PathElement::field_name(name))
    }

    /// Returns a new path with a list index appended.
    pub fn with_index(&self, i: usize) -> Self {
        self.with(PathElement::index(i))
    }

    /// Creates a new path with the given element appended.
    pub fn with(&self, element: PathElement) -> Self {
        let mut new_path = self.clone();
        new_path.push(element);
        new_path
    }

    /// Renders the path as an RFC 6901 JSON pointer.
    ///
    /// `~` and `/` inside field names are escaped, so annotation keys
    /// carrying a prefix stay a single segment.
    pub fn to_pointer(&self) -> PointerBuf {
        let tokens: Vec<String> = self.elements.iter().map(PathElement::token).collect();
        PointerBuf::from_tokens(tokens.iter().map(String::as_str))
    }
}

impl FromIterator<PathElement> for Path {
    fn from_iter<T: IntoIterator<Item = PathElement>>(iter: T) -> Self {
        Path {
            elements: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a PathElement;
    type IntoIter = std::slice::Iter<'a, PathElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl fmt::Display for PathElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathElement::FieldName(name) => write!(f, ".{}", name),
            PathElement::Index(i) => write!(f, "[{}]", i),
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for element in &self.elements {
            write!(f, "{}", element)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_display() {
        let path = Path::fields(["spec", "ports"]).with_index(1).with_field("nodePort");
        assert_eq!(path.to_string(), ".spec.ports[1].nodePort");
        assert_eq!(path.len(), 4);
    }

    #[test]
    fn test_to_pointer() {
        let path = Path::fields(["spec", "template", "spec", "containers"])
            .with_index(0)
            .with_field("image");
        assert_eq!(
            path.to_pointer().to_string(),
            "/spec/template/spec/containers/0/image"
        );
    }

    #[test]
    fn test_to_pointer_escapes_segments() {
        let path = Path::fields([
            "metadata",
            "annotations",
            "kubectl.kubernetes.io/last-applied-configuration",
        ]);
        assert_eq!(
            path.to_pointer().to_string(),
            "/metadata/annotations/kubectl.kubernetes.io~1last-applied-configuration"
        );

        let tilde = Path::fields(["metadata", "annotations", "a~b"]);
        assert_eq!(tilde.to_pointer().to_string(), "/metadata/annotations/a~0b");
    }

    #[test]
    fn test_empty_path() {
        let path = Path::new();
        assert!(path.is_empty());
        assert_eq!(path.to_pointer().to_string(), "");
    }
}
