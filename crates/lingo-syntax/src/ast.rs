//! Runtime AST produced by the parser.
//!
//! The shapes are tuned for resolution rather than for round-tripping source
//! text: comments and junk are dropped, simple values collapse to plain
//! strings, and identifiers keep their `-` prefix to mark terms.

use serde::{Deserialize, Serialize};

/// Prefix that marks a private entry (term).
pub const TERM_PREFIX: char = '-';

/// Whether `id` names a term rather than a message.
#[must_use]
pub fn is_term_id(id: &str) -> bool {
    id.starts_with(TERM_PREFIX)
}

/// A parsed entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Entry {
    /// Single-line plain value without attributes.
    Text(String),
    /// Anything with placeables, continuation lines or attributes.
    Message(Message),
}

impl Entry {
    /// The value pattern, if any. Plain entries are returned as `None` here;
    /// use [`Entry::as_text`] for them.
    #[must_use]
    pub const fn value(&self) -> Option<&Pattern> {
        match self {
            Self::Text(_) => None,
            Self::Message(message) => message.value.as_ref(),
        }
    }

    /// The plain value of a fast-path entry.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Message(_) => None,
        }
    }

    /// Whether the entry has a value at all.
    #[must_use]
    pub const fn has_value(&self) -> bool {
        match self {
            Self::Text(_) => true,
            Self::Message(message) => message.value.is_some(),
        }
    }

    /// Look up an attribute by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Pattern> {
        match self {
            Self::Text(_) => None,
            Self::Message(message) => message
                .attributes
                .iter()
                .find(|attr| attr.id == name)
                .map(|attr| &attr.value),
        }
    }

    /// All attributes in source order.
    #[must_use]
    pub fn attributes(&self) -> &[Attribute] {
        match self {
            Self::Text(_) => &[],
            Self::Message(message) => &message.attributes,
        }
    }
}

/// Structured form of an entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Main value.
    #[serde(rename = "val", default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Pattern>,
    /// Ordered attributes.
    #[serde(rename = "attrs", default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<Attribute>,
}

/// `.name = pattern` line attached to an entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    /// Attribute name.
    pub id: String,
    /// Attribute value.
    pub value: Pattern,
}

/// A translatable text with optional placeables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Pattern {
    /// No placeables: the text is used as is.
    Text(String),
    /// Interleaved literal text and placeables.
    Elements(Vec<PatternElement>),
}

impl Pattern {
    /// Variants of a term value written as a bare variant list
    /// (`-brand = { *[nom] Firefox [gen] Firefoxa }`).
    #[must_use]
    pub fn as_variant_list(&self) -> Option<&[Variant]> {
        match self {
            Self::Elements(elements) => match elements.first() {
                Some(PatternElement::Placeable(Expression::Select {
                    selector: None,
                    variants,
                    ..
                })) => Some(variants),
                _ => None,
            },
            Self::Text(_) => None,
        }
    }
}

/// One element of a structured pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatternElement {
    /// Literal text.
    Text(String),
    /// `{ expression }`
    Placeable(Expression),
}

/// Expressions that may appear inside a placeable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Expression {
    /// `$name`
    Variable {
        /// Variable name without the `$`.
        name: String,
    },
    /// `42`, `-1.5`; the source spelling is kept.
    NumberLiteral {
        /// Literal text.
        value: String,
    },
    /// `"text"` with escapes already applied.
    StringLiteral {
        /// Unescaped contents.
        value: String,
    },
    /// `message-id` or `-term-id`
    Reference {
        /// Entry identifier.
        id: String,
    },
    /// `id.attribute`
    AttributeReference {
        /// Entry identifier.
        id: String,
        /// Attribute name.
        name: String,
    },
    /// `-term[key]`
    VariantReference {
        /// Entry identifier.
        id: String,
        /// Requested variant key.
        key: VariantKey,
    },
    /// `selector -> [key] value ...` or a bare variant list.
    Select {
        /// Absent for variant lists.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        selector: Option<Box<Expression>>,
        /// Variants in source order.
        variants: Vec<Variant>,
        /// Index of the `*` variant.
        default: usize,
    },
    /// `FUNCTION(positional, name: value)`
    Call {
        /// Upper-case function name.
        callee: String,
        /// Positional arguments.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        positional: Vec<Expression>,
        /// Named arguments.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        named: Vec<NamedArgument>,
    },
}

/// `[key] pattern`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    /// Key compared against the selector.
    pub key: VariantKey,
    /// Value used when the key matches.
    pub value: Pattern,
}

/// Key of a variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum VariantKey {
    /// `[1]`, `[-0.5]`
    Number(String),
    /// `[one]`, `[masculine]`
    Keyword(String),
}

impl VariantKey {
    /// Source spelling of the key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Number(raw) | Self::Keyword(raw) => raw,
        }
    }
}

impl std::fmt::Display for VariantKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `name: value` inside a call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedArgument {
    /// Option name.
    pub name: String,
    /// String or number literal.
    pub value: Expression,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_list_detection() {
        let list = Pattern::Elements(vec![PatternElement::Placeable(Expression::Select {
            selector: None,
            variants: vec![Variant {
                key: VariantKey::Keyword("nom".to_string()),
                value: Pattern::Text("Firefox".to_string()),
            }],
            default: 0,
        })]);
        assert_eq!(list.as_variant_list().map(<[Variant]>::len), Some(1));

        let select = Pattern::Elements(vec![PatternElement::Placeable(Expression::Select {
            selector: Some(Box::new(Expression::Variable {
                name: "n".to_string(),
            })),
            variants: Vec::new(),
            default: 0,
        })]);
        assert!(select.as_variant_list().is_none());
        assert!(Pattern::Text("x".to_string()).as_variant_list().is_none());
    }

    #[test]
    fn test_entry_accessors() {
        let entry = Entry::Message(Message {
            value: None,
            attributes: vec![Attribute {
                id: "title".to_string(),
                value: Pattern::Text("Title".to_string()),
            }],
        });

        assert!(!entry.has_value());
        assert_eq!(
            entry.attribute("title"),
            Some(&Pattern::Text("Title".to_string()))
        );
        assert!(entry.attribute("label").is_none());
        assert!(Entry::Text("hi".to_string()).has_value());
        assert!(is_term_id("-brand"));
        assert!(!is_term_id("brand"));
    }
}
