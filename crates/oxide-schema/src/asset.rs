//! Named schema assets.
//!
//! Every table, column, index, foreign key, sequence and namespace is
//! addressed through an [`Identifier`]: a possibly namespaced, possibly
//! pre-quoted name. The helpers here are the single place where names get
//! normalized for lookups and re-quoted for a platform.

use serde::{Deserialize, Serialize};

use crate::platform::Platform;

/// Characters accepted as identifier quotes.
const QUOTE_CHARS: [char; 4] = ['`', '"', '[', ']'];

/// Returns whether a raw name starts with a quote character.
#[must_use]
pub fn is_identifier_quoted(identifier: &str) -> bool {
    matches!(identifier.chars().next(), Some('`' | '"' | '['))
}

/// Removes every quote character from an identifier.
#[must_use]
pub fn trim_quotes(identifier: &str) -> String {
    identifier.chars().filter(|c| !QUOTE_CHARS.contains(c)).collect()
}

/// Normalizes an identifier for map lookups: lowercase, quotes stripped.
#[must_use]
pub fn normalize_identifier(identifier: &str) -> String {
    trim_quotes(&identifier.to_lowercase())
}

/// Generates a deterministic name for an index or constraint.
///
/// Each name is hashed with CRC32 and rendered as lowercase hex without
/// padding. The hashes are concatenated, prefixed with `prefix_`, uppercased
/// and cut to `max_length` characters.
#[must_use]
pub fn generate_identifier_name<S: AsRef<str>>(
    column_names: &[S],
    prefix: &str,
    max_length: usize,
) -> String {
    let hash: String = column_names
        .iter()
        .map(|name| format!("{:x}", crc32fast::hash(name.as_ref().as_bytes())))
        .collect();

    format!("{prefix}_{hash}")
        .to_uppercase()
        .chars()
        .take(max_length)
        .collect()
}

/// A parsed asset name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Identifier {
    name: String,
    namespace: Option<String>,
    quoted: bool,
}

impl Identifier {
    /// Parses a raw name such as `foo`, `ns.foo` or `` `foo` ``.
    #[must_use]
    pub fn new(raw: &str) -> Self {
        let mut quoted = false;
        let mut name = raw.to_string();

        if is_identifier_quoted(&name) {
            quoted = true;
            name = trim_quotes(&name);
        }

        let mut namespace = None;
        if name.contains('.') {
            let mut parts = name.split('.');
            namespace = parts.next().map(str::to_string);
            name = parts.next().unwrap_or_default().to_string();
        }

        Self {
            name,
            namespace,
            quoted,
        }
    }

    /// Returns the name, prefixed with its namespace when it has one.
    #[must_use]
    pub fn name(&self) -> String {
        match &self.namespace {
            Some(ns) if !ns.is_empty() => format!("{ns}.{}", self.name),
            _ => self.name.clone(),
        }
    }

    /// Returns the name without its namespace.
    #[must_use]
    pub fn unqualified_name(&self) -> &str {
        &self.name
    }

    /// Returns the namespace, if any.
    #[must_use]
    pub fn namespace_name(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Returns whether the raw name was quoted.
    #[must_use]
    pub const fn is_quoted(&self) -> bool {
        self.quoted
    }

    /// Returns whether the asset lives in `default_namespace` (or in none).
    #[must_use]
    pub fn is_in_default_namespace(&self, default_namespace: &str) -> bool {
        self.namespace
            .as_deref()
            .is_none_or(|ns| ns == default_namespace)
    }

    /// Returns the lowercased name, dropping the namespace when it equals
    /// `default_namespace`.
    #[must_use]
    pub fn shortest_name(&self, default_namespace: Option<&str>) -> String {
        if self.namespace.as_deref() == default_namespace {
            self.name.to_lowercase()
        } else {
            self.name().to_lowercase()
        }
    }

    /// Returns the lowercased name, always namespaced.
    #[must_use]
    pub fn full_qualified_name(&self, default_namespace: &str) -> String {
        match self.namespace.as_deref() {
            Some(ns) if !ns.is_empty() => self.name().to_lowercase(),
            _ => format!("{default_namespace}.{}", self.name).to_lowercase(),
        }
    }

    /// Quotes each dotted segment that was quoted originally or is a
    /// reserved word of `platform`.
    #[must_use]
    pub fn quoted_name<P: Platform + ?Sized>(&self, platform: &P) -> String {
        let keywords = platform.reserved_keywords();
        self.name()
            .split('.')
            .map(|part| {
                if self.quoted || keywords.is_keyword(part) {
                    platform.quote_identifier(part)
                } else {
                    part.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl From<&str> for Identifier {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for Identifier {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}

/// Shared behavior of every named schema object.
pub trait Asset {
    /// Returns the parsed identifier.
    fn identifier(&self) -> &Identifier;

    /// Returns the (possibly namespaced) name.
    fn name(&self) -> String {
        self.identifier().name()
    }

    /// Returns the namespace, if any.
    fn namespace_name(&self) -> Option<&str> {
        self.identifier().namespace_name()
    }

    /// Returns whether the raw name was quoted.
    fn is_quoted(&self) -> bool {
        self.identifier().is_quoted()
    }

    /// See [`Identifier::is_in_default_namespace`].
    fn is_in_default_namespace(&self, default_namespace: &str) -> bool {
        self.identifier().is_in_default_namespace(default_namespace)
    }

    /// See [`Identifier::shortest_name`].
    fn shortest_name(&self, default_namespace: Option<&str>) -> String {
        self.identifier().shortest_name(default_namespace)
    }

    /// See [`Identifier::full_qualified_name`].
    fn full_qualified_name(&self, default_namespace: &str) -> String {
        self.identifier().full_qualified_name(default_namespace)
    }

    /// See [`Identifier::quoted_name`].
    fn quoted_name<P: Platform + ?Sized>(&self, platform: &P) -> String {
        self.identifier().quoted_name(platform)
    }
}

impl Asset for Identifier {
    fn identifier(&self) -> &Identifier {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MySqlPlatform;

    #[test]
    fn test_parse_plain() {
        let id = Identifier::new("foo");
        assert_eq!(id.name(), "foo");
        assert_eq!(id.namespace_name(), None);
        assert!(!id.is_quoted());
    }

    #[test]
    fn test_parse_quoted_and_namespaced() {
        let id = Identifier::new("`bar`.`baz`");
        assert!(id.is_quoted());
        assert_eq!(id.namespace_name(), Some("bar"));
        assert_eq!(id.unqualified_name(), "baz");
        assert_eq!(id.name(), "bar.baz");
    }

    #[test]
    fn test_shortest_and_full_names() {
        let id = Identifier::new("Public.Foo");
        assert_eq!(id.shortest_name(Some("Public")), "foo");
        assert_eq!(id.shortest_name(Some("other")), "public.foo");
        assert_eq!(id.full_qualified_name("other"), "public.foo");

        let bare = Identifier::new("Foo");
        assert_eq!(bare.full_qualified_name("public"), "public.foo");
        assert!(bare.is_in_default_namespace("public"));
        assert!(!id.is_in_default_namespace("other"));
    }

    #[test]
    fn test_quoted_name_uses_keywords() {
        let platform = MySqlPlatform::new();
        assert_eq!(Identifier::new("create").quoted_name(&platform), "`create`");
        assert_eq!(Identifier::new("foo").quoted_name(&platform), "foo");
        assert_eq!(Identifier::new("\"foo\"").quoted_name(&platform), "`foo`");
        assert_eq!(
            Identifier::new("ns.table").quoted_name(&platform),
            "ns.`table`"
        );
    }

    #[test]
    fn test_normalize_identifier() {
        assert_eq!(normalize_identifier("`FooBar`"), "foobar");
        assert_eq!(normalize_identifier("[Baz]"), "baz");
    }

    #[test]
    fn test_generate_identifier_name() {
        assert_eq!(
            generate_identifier_name(&["test", "foo", "bar"], "uniq", 63),
            "UNIQ_D87F7E0C8C73652176FF8CAA"
        );
        assert_eq!(
            generate_identifier_name(&["foreign_table", "fk_id"], "idx", 63),
            "IDX_5690FFE2A57719D0"
        );
    }

    #[test]
    fn test_generate_identifier_name_is_bounded() {
        let cols = ["a", "b", "c", "d", "e", "f", "g", "h", "i"];
        let first = generate_identifier_name(&cols, "idx", 30);
        let second = generate_identifier_name(&cols, "idx", 30);
        assert_eq!(first, second);
        assert!(first.len() <= 30);
        assert!(first.starts_with("IDX_"));
    }
}
