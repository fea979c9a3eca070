use serde::{Deserialize, Serialize};
use std::fmt;

/// The type URL prefix used when a file does not declare its own.
pub const DEFAULT_TYPE_URL_PREFIX: &str = "type.googleapis.com";

/// Name of a message or enum type.
///
/// Nested types keep the simple names of their enclosing messages in
/// `nesting_type_names`, outermost first. The enclosing type itself is never
/// referenced directly, only by name.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeName {
    pub package_name: String,
    pub nesting_type_names: Vec<String>,
    pub simple_name: String,
    pub type_url_prefix: String,
}

impl TypeName {
    pub fn new(package_name: impl Into<String>, simple_name: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            nesting_type_names: Vec::new(),
            simple_name: simple_name.into(),
            type_url_prefix: DEFAULT_TYPE_URL_PREFIX.to_string(),
        }
    }

    /// Creates the name of a type nested into the type with this name.
    pub fn nested(&self, simple_name: impl Into<String>) -> Self {
        let mut nesting = self.nesting_type_names.clone();
        nesting.push(self.simple_name.clone());
        Self {
            package_name: self.package_name.clone(),
            nesting_type_names: nesting,
            simple_name: simple_name.into(),
            type_url_prefix: self.type_url_prefix.clone(),
        }
    }

    /// Parses a dotted proto name, e.g. `acme.Outer.Inner`, given the package it belongs to.
    ///
    /// A leading dot, as used by descriptor type references, is ignored.
    pub fn parse(package_name: &str, qualified: &str) -> Self {
        let qualified = qualified.trim_start_matches('.');
        let local = if package_name.is_empty() {
            qualified
        } else {
            qualified
                .strip_prefix(package_name)
                .and_then(|rest| rest.strip_prefix('.'))
                .unwrap_or(qualified)
        };
        let mut parts: Vec<String> = local.split('.').map(str::to_string).collect();
        let simple_name = parts.pop().unwrap_or_default();
        Self {
            package_name: package_name.to_string(),
            nesting_type_names: parts,
            simple_name,
            type_url_prefix: DEFAULT_TYPE_URL_PREFIX.to_string(),
        }
    }

    pub fn qualified_name(&self) -> String {
        qualify(
            &self.package_name,
            self.nesting_type_names
                .iter()
                .map(String::as_str)
                .chain(std::iter::once(self.simple_name.as_str())),
        )
    }

    pub fn type_url(&self) -> String {
        format!("{}/{}", self.type_url_prefix, self.qualified_name())
    }

    /// Name of the type declaring this one, if this type is nested.
    pub fn declaring_type(&self) -> Option<TypeName> {
        let mut nesting = self.nesting_type_names.clone();
        let simple_name = nesting.pop()?;
        Some(Self {
            package_name: self.package_name.clone(),
            nesting_type_names: nesting,
            simple_name,
            type_url_prefix: self.type_url_prefix.clone(),
        })
    }

    pub fn is_nested(&self) -> bool {
        !self.nesting_type_names.is_empty()
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified_name())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceName {
    pub package_name: String,
    pub simple_name: String,
    pub type_url_prefix: String,
}

impl ServiceName {
    pub fn new(package_name: impl Into<String>, simple_name: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            simple_name: simple_name.into(),
            type_url_prefix: DEFAULT_TYPE_URL_PREFIX.to_string(),
        }
    }

    pub fn qualified_name(&self) -> String {
        qualify(&self.package_name, std::iter::once(self.simple_name.as_str()))
    }

    pub fn type_url(&self) -> String {
        format!("{}/{}", self.type_url_prefix, self.qualified_name())
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified_name())
    }
}

fn qualify<'a>(package: &str, rest: impl Iterator<Item = &'a str>) -> String {
    let mut out = String::from(package);
    for part in rest {
        if !out.is_empty() {
            out.push('.');
        }
        out.push_str(part);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_qualified_name_and_url() {
        let outer = TypeName::new("acme.zoo", "Animal");
        let inner = outer.nested("Paw");

        assert_eq!(inner.qualified_name(), "acme.zoo.Animal.Paw");
        assert_eq!(inner.type_url(), "type.googleapis.com/acme.zoo.Animal.Paw");
        assert_eq!(inner.declaring_type(), Some(outer.clone()));
        assert_eq!(outer.declaring_type(), None);
    }

    #[test]
    fn test_parse_strips_package_and_leading_dot() {
        let name = TypeName::parse("acme", ".acme.Outer.Inner");
        assert_eq!(name.nesting_type_names, vec!["Outer".to_string()]);
        assert_eq!(name.simple_name, "Inner");

        let no_package = TypeName::parse("", "Solo");
        assert_eq!(no_package.qualified_name(), "Solo");
    }
}
