//! Structural paths into a schema tree.
//!
//! A path is rendered the way users write field references: `address.city`,
//! `orders[].customerId` for a schema position, `orders[2].customerId` for a
//! concrete generated position.

use smallvec::SmallVec;
use std::fmt;

/// One step of a [`SchemaPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Named object property
    Field(String),
    /// Array item at a concrete position
    Item(usize),
    /// Array item schema (any position)
    Items,
}

/// Path from the root of a schema to one of its nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SchemaPath {
    segments: SmallVec<[PathSegment; 8]>,
}

impl SchemaPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Extend with a property name.
    pub fn field(&self, name: &str) -> Self {
        let mut next = self.clone();
        next.segments.push(PathSegment::Field(name.to_string()));
        next
    }

    /// Extend with a concrete array position.
    pub fn item(&self, index: usize) -> Self {
        let mut next = self.clone();
        next.segments.push(PathSegment::Item(index));
        next
    }

    /// Extend with the array item schema.
    pub fn items(&self) -> Self {
        let mut next = self.clone();
        next.segments.push(PathSegment::Items);
        next
    }

    /// Name of the last property segment, if any.
    pub fn leaf_name(&self) -> Option<&str> {
        self.segments.iter().rev().find_map(|s| match s {
            PathSegment::Field(name) => Some(name.as_str()),
            _ => None,
        })
    }

    /// Position-independent key: concrete item positions collapse to `[]`.
    ///
    /// Two generated locations share a key exactly when they were produced
    /// by the same schema node.
    pub fn schema_key(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                PathSegment::Field(name) => {
                    if !out.is_empty() {
                        out.push('.');
                    }
                    out.push_str(name);
                }
                PathSegment::Item(_) | PathSegment::Items => out.push_str("[]"),
            }
        }
        out
    }
}

impl fmt::Display for SchemaPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "<root>");
        }
        let mut first = true;
        for segment in &self.segments {
            match segment {
                PathSegment::Field(name) => {
                    if !first {
                        write!(f, ".")?;
                    }
                    write!(f, "{}", name)?;
                }
                PathSegment::Item(index) => write!(f, "[{}]", index)?,
                PathSegment::Items => write!(f, "[]")?,
            }
            first = false;
        }
        Ok(())
    }
}
