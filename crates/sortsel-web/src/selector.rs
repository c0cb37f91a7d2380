#![forbid(unsafe_code)]

//! Compound element selectors used by the configuration.
//!
//! Only the subset the stock markup needs is understood: an optional tag
//! name followed by any number of `.class` and `[attribute]` parts, e.g.
//! `select.chosen-select[multiple]` or `.search-choice-close`. Combinators,
//! selector lists, and attribute value tests are rejected at parse time.

use std::fmt;

/// Something a [`Selector`] can be matched against.
pub trait SelectorTarget {
    /// Lower-case tag name.
    fn tag(&self) -> &str;
    fn has_class(&self, class: &str) -> bool;
    fn has_attribute(&self, name: &str) -> bool;
}

/// A pressed element as reported by the host: its tag and class list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PressedElement<'a> {
    pub tag: &'a str,
    pub classes: &'a [&'a str],
}

impl<'a> PressedElement<'a> {
    #[must_use]
    pub const fn new(tag: &'a str, classes: &'a [&'a str]) -> Self {
        Self { tag, classes }
    }
}

impl SelectorTarget for PressedElement<'_> {
    fn tag(&self) -> &str {
        self.tag
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|own| *own == class)
    }

    fn has_attribute(&self, _name: &str) -> bool {
        false
    }
}

/// Parsed compound selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    tag: Option<String>,
    classes: Vec<String>,
    attributes: Vec<String>,
}

impl Selector {
    /// Parse `raw`, ignoring surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Empty input, an empty name after `.` or `[`, an unclosed `[`, or any
    /// character outside the supported grammar.
    pub fn parse(raw: &str) -> Result<Self, SelectorError> {
        let text = raw.trim();
        if text.is_empty() {
            return Err(SelectorError::Empty);
        }
        let bytes = text.as_bytes();
        let mut pos = ident_end(bytes, 0);
        let tag = (pos > 0).then(|| text[..pos].to_ascii_lowercase());
        let mut classes = Vec::new();
        let mut attributes = Vec::new();

        while pos < bytes.len() {
            match bytes[pos] {
                b'.' => {
                    let end = ident_end(bytes, pos + 1);
                    if end == pos + 1 {
                        return Err(SelectorError::EmptyName { at: pos });
                    }
                    classes.push(text[pos + 1..end].to_owned());
                    pos = end;
                }
                b'[' => {
                    let end = ident_end(bytes, pos + 1);
                    if end == pos + 1 {
                        return Err(SelectorError::EmptyName { at: pos });
                    }
                    match bytes.get(end) {
                        Some(b']') => {}
                        Some(_) => {
                            return Err(SelectorError::Unsupported {
                                at: end,
                                found: char_at(text, end),
                            });
                        }
                        None => return Err(SelectorError::UnclosedAttribute { at: pos }),
                    }
                    attributes.push(text[pos + 1..end].to_ascii_lowercase());
                    pos = end + 1;
                }
                _ => {
                    return Err(SelectorError::Unsupported {
                        at: pos,
                        found: char_at(text, pos),
                    });
                }
            }
        }

        Ok(Self {
            tag,
            classes,
            attributes,
        })
    }

    /// Whether `target` satisfies every part of the selector.
    #[must_use]
    pub fn matches<T: SelectorTarget + ?Sized>(&self, target: &T) -> bool {
        self.tag
            .as_deref()
            .is_none_or(|tag| target.tag().eq_ignore_ascii_case(tag))
            && self.classes.iter().all(|class| target.has_class(class))
            && self.attributes.iter().all(|name| target.has_attribute(name))
    }
}

fn ident_end(bytes: &[u8], start: usize) -> usize {
    let len = bytes[start.min(bytes.len())..]
        .iter()
        .take_while(|b| b.is_ascii_alphanumeric() || **b == b'-' || **b == b'_')
        .count();
    start + len
}

fn char_at(text: &str, at: usize) -> char {
    text.get(at..)
        .and_then(|rest| rest.chars().next())
        .unwrap_or('\u{fffd}')
}

/// Why a selector string was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    Empty,
    /// `.` or `[` not followed by a name.
    EmptyName { at: usize },
    UnclosedAttribute { at: usize },
    /// Combinators, lists, pseudo-classes, attribute values, ...
    Unsupported { at: usize, found: char },
}

impl fmt::Display for SelectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "selector is empty"),
            Self::EmptyName { at } => write!(f, "missing name at byte {at}"),
            Self::UnclosedAttribute { at } => write!(f, "unclosed `[` at byte {at}"),
            Self::Unsupported { at, found } => {
                write!(f, "unsupported {found:?} at byte {at}")
            }
        }
    }
}

impl std::error::Error for SelectorError {}
