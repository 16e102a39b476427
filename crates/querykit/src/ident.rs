//! Strictly validated identifiers.
//!
//! [`Ident`] is the strict counterpart of the sanitizer: instead of cleaning
//! the input it rejects anything that is not a plain dotted name.
//!
//! - Unquoted parts must match `[A-Za-z_][A-Za-z0-9_$]*`
//! - Quoted parts (`"x"`, `` `x` `` or `[x]`) allow anything except NUL
//!
//! Quoted parts are re-quoted for the target dialect on output.
//!
//! ```
//! use querykit::{Dialect, Ident};
//!
//! let t = Ident::parse(r#"public."UserTable""#)?;
//! assert_eq!(t.to_sql(Dialect::MySql), "public.`UserTable`");
//! # Ok::<(), querykit::BuildError>(())
//! ```

use crate::dialect::Dialect;
use crate::error::{BuildError, BuildResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentPart {
    Unquoted(String),
    Quoted(String),
}

/// A dotted SQL identifier (`schema.table.column`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub parts: Vec<IdentPart>,
}

impl Ident {
    /// Parse an identifier, supporting dotted and quoted forms.
    pub fn parse(s: &str) -> BuildResult<Self> {
        if s.is_empty() {
            return Err(BuildError::invalid_identifier("identifier cannot be empty"));
        }
        if s.contains('\0') {
            return Err(BuildError::invalid_identifier(
                "identifier cannot contain NUL character",
            ));
        }

        let mut parts = Vec::new();
        let mut chars = s.chars().peekable();

        while chars.peek().is_some() {
            if !parts.is_empty() {
                match chars.next() {
                    Some('.') if chars.peek().is_none() => {
                        return Err(BuildError::invalid_identifier(format!(
                            "trailing '.' in {s:?}"
                        )));
                    }
                    Some('.') => {}
                    Some(c) => {
                        return Err(BuildError::invalid_identifier(format!(
                            "expected '.' between parts of {s:?}, got '{c}'"
                        )));
                    }
                    None => break,
                }
            }

            let close = match chars.peek() {
                Some('"') => Some('"'),
                Some('`') => Some('`'),
                Some('[') => Some(']'),
                _ => None,
            };

            if let Some(close) = close {
                chars.next();
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some(c) if c == close => {
                            // Doubled closing character escapes itself.
                            if chars.peek() == Some(&close) {
                                chars.next();
                                name.push(close);
                            } else {
                                break;
                            }
                        }
                        Some(c) => name.push(c),
                        None => {
                            return Err(BuildError::invalid_identifier(format!(
                                "unclosed quoted identifier in {s:?}"
                            )));
                        }
                    }
                }
                if name.is_empty() {
                    return Err(BuildError::invalid_identifier("empty quoted identifier"));
                }
                parts.push(IdentPart::Quoted(name));
                continue;
            }

            let mut name = String::new();
            while let Some(&c) = chars.peek() {
                if c == '.' {
                    break;
                }
                let ok = if name.is_empty() {
                    c == '_' || c.is_ascii_alphabetic()
                } else {
                    c == '_' || c == '$' || c.is_ascii_alphanumeric()
                };
                if !ok {
                    return Err(BuildError::invalid_identifier(format!(
                        "invalid character '{c}' in {s:?}"
                    )));
                }
                name.push(c);
                chars.next();
            }
            if name.is_empty() {
                return Err(BuildError::invalid_identifier(format!(
                    "empty segment in {s:?}"
                )));
            }
            parts.push(IdentPart::Unquoted(name));
        }

        Ok(Self { parts })
    }

    /// Render the identifier with the dialect's quoting.
    pub fn to_sql(&self, dialect: Dialect) -> String {
        let mut out = String::new();
        self.write_sql(dialect, &mut out);
        out
    }

    pub(crate) fn write_sql(&self, dialect: Dialect, out: &mut String) {
        let (open, close) = match dialect {
            Dialect::MySql => ('`', '`'),
            Dialect::SqlServer => ('[', ']'),
            Dialect::Postgres | Dialect::Sqlite | Dialect::Oracle => ('"', '"'),
        };
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            match part {
                IdentPart::Unquoted(s) => out.push_str(s),
                IdentPart::Quoted(s) => {
                    out.push(open);
                    for ch in s.chars() {
                        if ch == close {
                            out.push(close);
                        }
                        out.push(ch);
                    }
                    out.push(close);
                }
            }
        }
    }
}
