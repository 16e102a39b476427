//! Unnumbered SQL fragments.
//!
//! A [`Fragment`] keeps SQL text and bound values interleaved in order.
//! Placeholders are only numbered when the outermost fragment is rendered, so
//! nested queries can be spliced anywhere without renumbering.

use crate::dialect::Dialect;
use crate::prepared::PreparedQuery;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
enum SqlPart {
    Raw(String),
    Param(Value),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Fragment {
    parts: Vec<SqlPart>,
}

impl Fragment {
    pub(crate) fn new(sql: impl Into<String>) -> Self {
        let mut f = Self::default();
        f.push(&sql.into());
        f
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub(crate) fn param_count(&self) -> usize {
        self.parts
            .iter()
            .filter(|p| matches!(p, SqlPart::Param(_)))
            .count()
    }

    /// Append raw SQL (no parameters).
    pub(crate) fn push(&mut self, sql: &str) -> &mut Self {
        if sql.is_empty() {
            return self;
        }
        match self.parts.last_mut() {
            Some(SqlPart::Raw(last)) => last.push_str(sql),
            _ => self.parts.push(SqlPart::Raw(sql.to_string())),
        }
        self
    }

    /// Append a parameter placeholder bound to `value`.
    pub(crate) fn push_bind(&mut self, value: Value) -> &mut Self {
        self.parts.push(SqlPart::Param(value));
        self
    }

    /// Append a comma-separated list of placeholders.
    pub(crate) fn push_bind_list(&mut self, values: impl IntoIterator<Item = Value>) -> &mut Self {
        for (i, v) in values.into_iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.push_bind(v);
        }
        self
    }

    /// Append another fragment, consuming it.
    pub(crate) fn append(&mut self, other: Fragment) -> &mut Self {
        for part in other.parts {
            match part {
                SqlPart::Raw(s) => {
                    self.push(&s);
                }
                SqlPart::Param(v) => {
                    self.push_bind(v);
                }
            }
        }
        self
    }

    /// Append `template`, binding `?` markers to `args` left to right.
    ///
    /// `?` inside single-quoted literals is left alone, as is any `?` past the
    /// last argument (so operators like Postgres' `?|` survive). Returns the
    /// number of arguments that had no marker to bind to.
    pub(crate) fn push_template(
        &mut self,
        template: &str,
        args: impl IntoIterator<Item = Value>,
    ) -> usize {
        let mut args = args.into_iter();
        let mut in_literal = false;
        let mut start = 0;

        for (i, c) in template.char_indices() {
            match c {
                '\'' => in_literal = !in_literal,
                '?' if !in_literal => {
                    if let Some(v) = args.next() {
                        self.push(&template[start..i]);
                        self.push_bind(v);
                        start = i + 1;
                    }
                }
                _ => {}
            }
        }
        self.push(&template[start..]);
        args.count()
    }

    pub(crate) fn render(self, dialect: Dialect) -> PreparedQuery {
        let raw_len: usize = self
            .parts
            .iter()
            .map(|p| match p {
                SqlPart::Raw(s) => s.len(),
                SqlPart::Param(_) => 3,
            })
            .sum();
        let mut out = PreparedQuery::with_capacity(dialect, raw_len, self.param_count());
        for part in self.parts {
            match part {
                SqlPart::Raw(s) => out.push_raw(&s),
                SqlPart::Param(v) => out.push_param(v),
            }
        }
        out
    }
}
