//! Best-effort text sanitization for identifiers, inline literals and raw SQL.
//!
//! None of this is a substitute for bound parameters. [`QueryBuilder::build`]
//! keeps values out of the SQL text entirely; the helpers here only matter for
//! identifiers (which cannot be parameterized) and for inline rendering, which
//! is meant for display and debugging.
//!
//! [`QueryBuilder::build`]: crate::QueryBuilder::build

use std::sync::OnceLock;

use regex::Regex;

/// Replacement emitted for identifiers that contain a denied keyword.
pub const INVALID_IDENTIFIER: &str = "invalid_identifier";

fn identifier_denylist() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(?:drop|delete|insert|update|truncate|alter|create|exec|execute|union|grant|revoke|shutdown)\b|--|/\*|\*/",
        )
        .expect("invalid built-in identifier denylist")
    })
}

fn value_denylist() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(?:select|insert|update|delete|drop|truncate|alter|create|exec|execute|union|grant|revoke|shutdown|declare)\b|--|/\*|\*/",
        )
        .expect("invalid built-in value denylist")
    })
}

fn raw_denylist() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(?:drop|truncate|alter|grant|revoke|exec|execute|shutdown|union)\b|--|/\*")
            .expect("invalid built-in raw SQL denylist")
    })
}

/// Sanitize a table or column expression.
///
/// - Everything after the first `;` is discarded.
/// - Input containing a denied keyword becomes [`INVALID_IDENTIFIER`].
/// - Function calls, `CASE` expressions, window functions, JSON paths,
///   quoted names or literals and `*` projections pass through verbatim when
///   the shape spans the whole input, optionally followed by an alias.
/// - Anything else is reduced to `[A-Za-z0-9_]` with one optional `.` for
///   qualified names, plus an optional alias or sort direction.
pub fn sanitize_identifier(input: &str) -> String {
    let cut = match input.find(';') {
        Some(pos) => &input[..pos],
        None => input,
    };
    let cut = cut.trim();
    if cut.is_empty() {
        return String::new();
    }
    if identifier_denylist().is_match(cut) {
        return INVALID_IDENTIFIER.to_string();
    }
    if is_structural(cut) {
        return cut.to_string();
    }

    let tokens: Vec<&str> = cut.split_whitespace().collect();
    let cleaned = match tokens.as_slice() {
        [name] => clean_qualified(name),
        [name, word] => join_word(clean_qualified(name), clean_word(word)),
        [name, kw, alias] if kw.eq_ignore_ascii_case("as") => {
            let name = clean_qualified(name);
            let alias = clean_word(alias);
            if name.is_empty() || alias.is_empty() {
                name
            } else {
                format!("{name} {kw} {alias}")
            }
        }
        _ => clean_qualified(&tokens.concat()),
    };

    if cleaned.is_empty() {
        INVALID_IDENTIFIER.to_string()
    } else {
        cleaned
    }
}

fn star_projection() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"^(?:(?:[A-Za-z_]\w*|"(?:[^"]|"")*")\.)*\*$"#)
            .expect("invalid built-in projection pattern")
    })
}

fn call_head() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z_]\w*(?:\.[A-Za-z_]\w*)?\s*\(")
            .expect("invalid built-in function call pattern")
    })
}

fn json_path() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)^[A-Za-z_]\w*(?:\.[A-Za-z_]\w*)?(?:\s*(?:->>?|#>>?)\s*(?:'[^']*'|\d+))+(?:\s+(?:as\s+)?[A-Za-z_]\w*)?$",
        )
        .expect("invalid built-in JSON path pattern")
    })
}

fn quoted_token() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let quoted = r#"'(?:[^']|'')*'|"(?:[^"]|"")*"|`(?:[^`]|``)*`|\[[^\]]*\]"#;
        Regex::new(&format!(
            r"(?i)^(?:{quoted})(?:\.(?:{quoted}|[A-Za-z_]\w*|\*))*(?:\s+(?:as\s+)?[A-Za-z_]\w*)?$"
        ))
        .expect("invalid built-in quoted token pattern")
    })
}

fn case_expr() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?is)^case\b.*\bend(?:\s+(?:as\s+)?[A-Za-z_]\w*)?$")
            .expect("invalid built-in CASE pattern")
    })
}

fn alias_tail() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(?:as\s+)?[A-Za-z_]\w*$").expect("invalid built-in alias pattern")
    })
}

/// Expressions that are kept verbatim: a whole expression of one recognized
/// shape, never a shape followed by extra SQL.
fn is_structural(s: &str) -> bool {
    star_projection().is_match(s)
        || json_path().is_match(s)
        || quoted_token().is_match(s)
        || (case_expr().is_match(s) && is_balanced(s))
        || is_call(s)
}

/// `name(...)`, optionally `OVER (...)`, then an optional alias or direction.
fn is_call(s: &str) -> bool {
    let Some(head) = call_head().find(s) else {
        return false;
    };
    let Some(rest) = skip_group(&s[head.end() - 1..]) else {
        return false;
    };
    let mut rest = rest.trim_start();
    if starts_with_word(rest, "OVER") {
        match skip_group(rest[4..].trim_start()) {
            Some(after) => rest = after.trim_start(),
            None => return false,
        }
    }
    rest.is_empty() || alias_tail().is_match(rest)
}

/// Skip one parenthesized group at the start of `s`, honoring quotes.
/// Returns the text after the matching `)`.
fn skip_group(s: &str) -> Option<&str> {
    if !s.starts_with('(') {
        return None;
    }
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    for (i, c) in s.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '\'' | '"' => quote = Some(c),
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(&s[i + 1..]);
                    }
                }
                _ => {}
            },
        }
    }
    None
}

fn is_balanced(s: &str) -> bool {
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    for c in s.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '\'' | '"' => quote = Some(c),
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth < 0 {
                        return false;
                    }
                }
                _ => {}
            },
        }
    }
    quote.is_none() && depth == 0
}

fn clean_qualified(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut seen_dot = false;
    for c in s.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            out.push(c);
        } else if c == '.' && !seen_dot && !out.is_empty() {
            seen_dot = true;
            out.push(c);
        }
    }
    if out.ends_with('.') {
        out.pop();
    }
    out
}

fn clean_word(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

fn join_word(name: String, word: String) -> String {
    if name.is_empty() || word.is_empty() {
        return name;
    }
    format!("{name} {word}")
}

/// Quote a string as a SQL literal for inline rendering.
///
/// Single quotes are doubled, backslashes are doubled, NUL is dropped and
/// CR, LF and Ctrl-Z are written as escapes. Denied keywords and comment
/// markers are then removed until none remain. Quotes always stay paired, so
/// the literal cannot be closed early.
pub fn quote_string(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len() + 2);
    for c in s.chars() {
        match c {
            '\'' => escaped.push_str("''"),
            '\\' => escaped.push_str("\\\\"),
            '\0' => {}
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\x1a' => escaped.push_str("\\Z"),
            c => escaped.push(c),
        }
    }

    let re = value_denylist();
    while re.is_match(&escaped) {
        escaped = re.replace_all(&escaped, "").into_owned();
    }

    let mut out = String::with_capacity(escaped.len() + 2);
    out.push('\'');
    out.push_str(&escaped);
    out.push('\'');
    out
}

/// Check raw SQL before it is spliced into a query.
///
/// Returns the rejection reason for a `;` or a denied keyword.
pub(crate) fn check_raw(sql: &str) -> Result<(), String> {
    if sql.contains(';') {
        return Err("statement separator ';' is not allowed".to_string());
    }
    if let Some(m) = raw_denylist().find(sql) {
        return Err(format!("denied token `{}`", m.as_str()));
    }
    Ok(())
}

/// Strip leading whitespace, SQL comments (`--` and `/* */`), and parentheses
/// from a SQL string to find the first meaningful keyword.
pub(crate) fn strip_sql_prefix(sql: &str) -> &str {
    let mut s = sql;
    loop {
        let before = s;
        s = s.trim_start();
        if s.starts_with("--") {
            if let Some(pos) = s.find('\n') {
                s = &s[pos + 1..];
                continue;
            }
            return "";
        }
        if s.starts_with("/*") {
            if let Some(pos) = s.find("*/") {
                s = &s[pos + 2..];
                continue;
            }
            return "";
        }
        if let Some(rest) = s.strip_prefix('(') {
            s = rest;
            continue;
        }
        if s == before {
            break;
        }
    }
    s
}

/// Case-insensitive keyword prefix match that stops at a word boundary.
pub(crate) fn starts_with_word(s: &str, keyword: &str) -> bool {
    let Some(prefix) = s.get(0..keyword.len()) else {
        return false;
    };
    if !prefix.eq_ignore_ascii_case(keyword) {
        return false;
    }
    !s[keyword.len()..]
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
}
