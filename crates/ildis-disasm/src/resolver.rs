//! Metadata token resolution.
//!
//! The disassembler never parses metadata tables. Token operands are handed
//! to a [`SymbolResolver`], which may be backed by live reflection, a
//! metadata reader, or the in-memory [`MetadataMap`].

use std::collections::HashMap;
use std::fmt;

use ildis_core::MetadataToken;

/// A method or field together with the type that declares it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MemberRef {
    /// Full name of the declaring type, e.g. `System.DateTime`.
    pub declaring_type: String,
    /// Member name, e.g. `get_Now`.
    pub name: String,
}

impl MemberRef {
    pub fn new(declaring_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            declaring_type: declaring_type.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for MemberRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.declaring_type, self.name)
    }
}

/// Resolves metadata tokens to display names.
///
/// Each method returns `None` when the token does not name a symbol of the
/// requested kind.
pub trait SymbolResolver {
    /// Resolve a MethodDef, MemberRef or MethodSpec token.
    fn resolve_method(&self, token: MetadataToken) -> Option<MemberRef>;

    /// Resolve a Field or MemberRef token.
    fn resolve_field(&self, token: MetadataToken) -> Option<MemberRef>;

    /// Resolve a TypeDef, TypeRef or TypeSpec token to the type's full name.
    fn resolve_type(&self, token: MetadataToken) -> Option<String>;

    /// Resolve a user string token to its contents.
    fn resolve_string(&self, token: MetadataToken) -> Option<String>;
}

impl<R: SymbolResolver + ?Sized> SymbolResolver for &R {
    fn resolve_method(&self, token: MetadataToken) -> Option<MemberRef> {
        (**self).resolve_method(token)
    }

    fn resolve_field(&self, token: MetadataToken) -> Option<MemberRef> {
        (**self).resolve_field(token)
    }

    fn resolve_type(&self, token: MetadataToken) -> Option<String> {
        (**self).resolve_type(token)
    }

    fn resolve_string(&self, token: MetadataToken) -> Option<String> {
        (**self).resolve_string(token)
    }
}

/// In-memory symbol table keyed by token.
#[derive(Debug, Clone, Default)]
pub struct MetadataMap {
    methods: HashMap<MetadataToken, MemberRef>,
    fields: HashMap<MetadataToken, MemberRef>,
    types: HashMap<MetadataToken, String>,
    strings: HashMap<MetadataToken, String>,
}

impl MetadataMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a method.
    pub fn with_method(
        mut self,
        token: impl Into<MetadataToken>,
        declaring_type: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        self.methods
            .insert(token.into(), MemberRef::new(declaring_type, name));
        self
    }

    /// Adds a field.
    pub fn with_field(
        mut self,
        token: impl Into<MetadataToken>,
        declaring_type: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        self.fields
            .insert(token.into(), MemberRef::new(declaring_type, name));
        self
    }

    /// Adds a type.
    pub fn with_type(
        mut self,
        token: impl Into<MetadataToken>,
        full_name: impl Into<String>,
    ) -> Self {
        self.types.insert(token.into(), full_name.into());
        self
    }

    /// Adds a user string.
    pub fn with_string(
        mut self,
        token: impl Into<MetadataToken>,
        value: impl Into<String>,
    ) -> Self {
        self.strings.insert(token.into(), value.into());
        self
    }

    /// Returns the total number of entries.
    pub fn len(&self) -> usize {
        self.methods.len() + self.fields.len() + self.types.len() + self.strings.len()
    }

    /// Returns true if no symbols are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SymbolResolver for MetadataMap {
    fn resolve_method(&self, token: MetadataToken) -> Option<MemberRef> {
        self.methods.get(&token).cloned()
    }

    fn resolve_field(&self, token: MetadataToken) -> Option<MemberRef> {
        self.fields.get(&token).cloned()
    }

    fn resolve_type(&self, token: MetadataToken) -> Option<String> {
        self.types.get(&token).cloned()
    }

    fn resolve_string(&self, token: MetadataToken) -> Option<String> {
        self.strings.get(&token).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_map_lookup() {
        let map = MetadataMap::new()
            .with_method(0x0A00_0001u32, "System.DateTime", "get_Now")
            .with_field(0x0400_0001u32, "Program", "counter")
            .with_type(0x0100_0002u32, "System.DateTime")
            .with_string(0x7000_0001u32, "hello");

        assert_eq!(map.len(), 4);
        assert_eq!(
            map.resolve_method(MetadataToken(0x0A00_0001)),
            Some(MemberRef::new("System.DateTime", "get_Now"))
        );
        assert_eq!(
            map.resolve_field(MetadataToken(0x0400_0001)).unwrap().to_string(),
            "Program.counter"
        );
        assert_eq!(
            map.resolve_type(MetadataToken(0x0100_0002)).as_deref(),
            Some("System.DateTime")
        );
        assert_eq!(
            map.resolve_string(MetadataToken(0x7000_0001)).as_deref(),
            Some("hello")
        );
    }

    #[test]
    fn test_kinds_are_separate() {
        let map = MetadataMap::new().with_type(0x0100_0002u32, "System.DateTime");
        assert!(map.resolve_method(MetadataToken(0x0100_0002)).is_none());
        assert!(map.resolve_string(MetadataToken(0x0100_0002)).is_none());
    }

    #[test]
    fn test_empty_map() {
        let map = MetadataMap::new();
        assert!(map.is_empty());
        assert!(map.resolve_type(MetadataToken(1)).is_none());
    }
}
