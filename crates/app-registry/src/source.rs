use std::fmt;

use serde::{Deserialize, Serialize};

pub const CLASS_BODY_INDENT: &str = "    ";

/// Source text of a class-level method or property.
///
/// Stored dedented with surrounding blank lines removed, so the same text can
/// be declared at any indentation and always lands in a class body the same
/// way.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct MemberSource(String);
impl MemberSource {
    #[must_use]
    pub fn new<T: AsRef<str>>(text: T) -> Self {
        Self(dedent(text.as_ref()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The source indented into a class body, terminated by a newline.
    #[must_use]
    pub fn in_class_body(&self) -> String {
        let mut out = String::with_capacity(self.0.len() + 16);
        for line in self.0.lines() {
            if !line.is_empty() {
                out.push_str(CLASS_BODY_INDENT);
                out.push_str(line);
            }
            out.push('\n');
        }

        out
    }
}
impl From<String> for MemberSource {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
impl From<&str> for MemberSource {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
impl From<MemberSource> for String {
    fn from(value: MemberSource) -> Self {
        value.0
    }
}
impl fmt::Display for MemberSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Indentation Python's tokenizer counts: spaces and tabs only.
fn indent_of(line: &str) -> &str {
    &line[..line.len() - line.trim_start_matches([' ', '\t']).len()]
}

fn dedent(text: &str) -> String {
    let lines = text
        .lines()
        .map(|x| x.trim_end_matches([' ', '\t']))
        .skip_while(|x| x.is_empty())
        .collect::<Vec<_>>();
    let end = lines
        .iter()
        .rposition(|x| !x.is_empty())
        .map_or(0, |x| x + 1);
    let lines = &lines[..end];

    // Lines opening with other whitespace can only continue a string literal,
    // so they do not constrain the margin.
    let margin = lines
        .iter()
        .filter(|x| !x.is_empty())
        .filter(|x| !x[indent_of(x).len()..].starts_with(char::is_whitespace))
        .map(|x| indent_of(x))
        .reduce(common_prefix)
        .unwrap_or_default();

    lines
        .iter()
        .map(|x| &x[common_prefix(indent_of(x), margin).len()..])
        .collect::<Vec<_>>()
        .join("\n")
}

fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let len = a
        .bytes()
        .zip(b.bytes())
        .take_while(|(x, y)| x == y)
        .count();

    &a[..len]
}
