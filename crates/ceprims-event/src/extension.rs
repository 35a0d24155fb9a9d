use std::fmt;

/// Value of an extension attribute.
///
/// Both encodings must carry the declared kind: structured JSON maps it to
/// the matching JSON type, binary headers rely on a fixed text grammar.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExtensionValue {
    String(String),
    Boolean(bool),
    Integer(i32),
}

impl ExtensionValue {
    /// Kind name used in diagnostics and CLI output.
    pub fn kind(&self) -> &'static str {
        match self {
            ExtensionValue::String(_) => "string",
            ExtensionValue::Boolean(_) => "boolean",
            ExtensionValue::Integer(_) => "integer",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ExtensionValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ExtensionValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            ExtensionValue::Integer(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for ExtensionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtensionValue::String(s) => f.write_str(s),
            ExtensionValue::Boolean(b) => write!(f, "{b}"),
            ExtensionValue::Integer(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for ExtensionValue {
    fn from(value: &str) -> Self {
        ExtensionValue::String(value.to_string())
    }
}

impl From<String> for ExtensionValue {
    fn from(value: String) -> Self {
        ExtensionValue::String(value)
    }
}

impl From<bool> for ExtensionValue {
    fn from(value: bool) -> Self {
        ExtensionValue::Boolean(value)
    }
}

impl From<i32> for ExtensionValue {
    fn from(value: i32) -> Self {
        ExtensionValue::Integer(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_renders_wire_text() {
        assert_eq!(ExtensionValue::from("aaa").to_string(), "aaa");
        assert_eq!(ExtensionValue::from(true).to_string(), "true");
        assert_eq!(ExtensionValue::from(-10).to_string(), "-10");
    }

    #[test]
    fn accessors_match_kind() {
        let value = ExtensionValue::from(10);
        assert_eq!(value.kind(), "integer");
        assert_eq!(value.as_i32(), Some(10));
        assert_eq!(value.as_bool(), None);
        assert_eq!(value.as_str(), None);
    }
}
