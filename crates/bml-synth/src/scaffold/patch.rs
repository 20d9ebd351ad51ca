//! Textual patching of scaffold sources.
//!
//! Scaffolds are hand-written Java files. They are never fully parsed: a
//! lightweight scanner skips comments, string, character and text-block
//! literals and tracks brace depth, which is enough to find a top-level
//! class body, a method body inside it and the import section. Everything
//! outside the patched ranges is preserved byte for byte.

use std::path::Path;

use bml_core::ScaffoldError;
use bml_target::{Block, Member, Printer};

use super::ScaffoldEdit;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    /// Identifier, keyword or number.
    Word,
    /// String, character or text-block literal.
    Literal,
    Punct(u8),
}

#[derive(Debug, Clone, Copy)]
struct Token {
    kind: TokenKind,
    start: usize,
    end: usize,
}

/// Significant tokens of a source file.
struct Scan<'s> {
    source: &'s str,
    tokens: Vec<Token>,
}

impl<'s> Scan<'s> {
    fn new(source: &'s str, path: &Path) -> Result<Self, ScaffoldError> {
        let malformed = |message: &str| ScaffoldError::Malformed {
            path: path.to_path_buf(),
            message: message.to_string(),
        };
        let tokens = tokenize(source).map_err(malformed)?;

        let mut depth: i64 = 0;
        for token in &tokens {
            match token.kind {
                TokenKind::Punct(b'{') => depth += 1,
                TokenKind::Punct(b'}') => {
                    depth -= 1;
                    if depth < 0 {
                        return Err(malformed("unbalanced braces"));
                    }
                }
                _ => {}
            }
        }
        if depth != 0 {
            return Err(malformed("unbalanced braces"));
        }
        Ok(Self { source, tokens })
    }

    fn text(&self, index: usize) -> &'s str {
        self.tokens
            .get(index)
            .map_or("", |t| &self.source[t.start..t.end])
    }

    fn is_punct(&self, index: usize, c: u8) -> bool {
        self.tokens
            .get(index)
            .is_some_and(|t| t.kind == TokenKind::Punct(c))
    }

    fn is_word(&self, index: usize, word: &str) -> bool {
        self.tokens
            .get(index)
            .is_some_and(|t| t.kind == TokenKind::Word)
            && self.text(index) == word
    }

    /// Index of the token closing the bracket opened at `open`.
    fn matching(&self, open: usize) -> Option<usize> {
        let TokenKind::Punct(opener) = self.tokens.get(open)?.kind else {
            return None;
        };
        let closer = match opener {
            b'{' => b'}',
            b'(' => b')',
            _ => return None,
        };
        let mut depth = 0usize;
        for (i, token) in self.tokens.iter().enumerate().skip(open) {
            if token.kind == TokenKind::Punct(opener) {
                depth += 1;
            } else if token.kind == TokenKind::Punct(closer) {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
        }
        None
    }

    /// Brace token indices of a top-level class body.
    fn class_body(&self, class: &str) -> Option<(usize, usize)> {
        let mut depth = 0usize;
        for i in 0..self.tokens.len() {
            if self.is_punct(i, b'{') {
                depth += 1;
            } else if self.is_punct(i, b'}') {
                depth = depth.saturating_sub(1);
            } else if depth == 0 && self.is_word(i, "class") && self.is_word(i + 1, class) {
                let open = (i + 2..self.tokens.len()).find(|&j| self.is_punct(j, b'{'))?;
                return Some((open, self.matching(open)?));
            }
        }
        None
    }

    /// Brace token indices of a method body declared directly in a class
    /// body.
    fn method_body(&self, (open, close): (usize, usize), method: &str) -> Option<(usize, usize)> {
        let mut depth = 0usize;
        let mut i = open + 1;
        while i < close {
            if self.is_punct(i, b'{') {
                depth += 1;
            } else if self.is_punct(i, b'}') {
                depth = depth.saturating_sub(1);
            } else if depth == 0 && self.is_word(i, method) && self.is_punct(i + 1, b'(') {
                let params_end = self.matching(i + 1)?;
                let body = (params_end + 1..close)
                    .find(|&j| self.is_punct(j, b'{') || self.is_punct(j, b';') || self.is_punct(j, b'='))?;
                if self.is_punct(body, b'{') {
                    return Some((body, self.matching(body)?));
                }
                i = params_end;
            }
            i += 1;
        }
        None
    }

    fn start(&self, index: usize) -> usize {
        self.tokens[index].start
    }

    fn end(&self, index: usize) -> usize {
        self.tokens[index].end
    }
}

fn tokenize(source: &str) -> Result<Vec<Token>, &'static str> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        let start = i;
        match c {
            _ if c.is_ascii_whitespace() => {
                i += 1;
                continue;
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
                continue;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let end = source[i + 2..].find("*/").ok_or("unterminated comment")?;
                i += 2 + end + 2;
                continue;
            }
            b'"' if source[i..].starts_with("\"\"\"") => {
                i += 3;
                loop {
                    match bytes.get(i) {
                        None => return Err("unterminated text block"),
                        Some(b'\\') => i += 2,
                        Some(b'"') if source[i..].starts_with("\"\"\"") => {
                            i += 3;
                            break;
                        }
                        Some(_) => i += 1,
                    }
                }
                tokens.push(Token {
                    kind: TokenKind::Literal,
                    start,
                    end: i,
                });
            }
            b'"' | b'\'' => {
                i += 1;
                loop {
                    match bytes.get(i) {
                        None | Some(b'\n') => return Err("unterminated literal"),
                        Some(b'\\') => i += 2,
                        Some(&q) if q == c => {
                            i += 1;
                            break;
                        }
                        Some(_) => i += 1,
                    }
                }
                tokens.push(Token {
                    kind: TokenKind::Literal,
                    start,
                    end: i,
                });
            }
            _ if is_word_byte(c) => {
                while i < bytes.len() && is_word_byte(bytes[i]) {
                    i += 1;
                }
                tokens.push(Token {
                    kind: TokenKind::Word,
                    start,
                    end: i,
                });
            }
            _ => {
                i += 1;
                tokens.push(Token {
                    kind: TokenKind::Punct(c),
                    start,
                    end: i,
                });
            }
        }
    }
    Ok(tokens)
}

// Non-ASCII bytes are treated as identifier bytes so every token boundary
// falls on a char boundary.
fn is_word_byte(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_' || c == b'$' || c >= 0x80
}

fn missing_class(class: &str, path: &Path) -> ScaffoldError {
    ScaffoldError::MissingClass {
        class: class.to_string(),
        path: path.to_path_buf(),
    }
}

/// Leading whitespace of the line containing byte offset `at`.
fn line_indent(source: &str, at: usize) -> &str {
    let line_start = source[..at].rfind('\n').map_or(0, |i| i + 1);
    let line = &source[line_start..at];
    &line[..line.len() - line.trim_start().len()]
}

// ============================================================================
// Edits
// ============================================================================

/// Apply `edits` to the source of the scaffold declaring `class`.
pub fn apply(source: &str, class: &str, edits: &[ScaffoldEdit], path: &Path) -> Result<String, ScaffoldError> {
    if Scan::new(source, path)?.class_body(class).is_none() {
        return Err(missing_class(class, path));
    }

    let mut text = source.to_string();
    for edit in edits {
        if let ScaffoldEdit::ReplaceMethodBody { method, body } = edit {
            text = replace_method_body(&text, class, method, body, path)?;
        }
    }

    let members: Vec<&Member> = edits
        .iter()
        .filter_map(|edit| match edit {
            ScaffoldEdit::AddMember(member) => Some(member),
            _ => None,
        })
        .collect();
    if !members.is_empty() {
        text = add_members(&text, class, &members, path)?;
    }

    for edit in edits {
        if let ScaffoldEdit::AddImport(import) = edit {
            text = add_import(&text, import, path)?;
        }
    }
    Ok(text)
}

/// Append members at the end of the class body.
pub fn add_members(source: &str, class: &str, members: &[&Member], path: &Path) -> Result<String, ScaffoldError> {
    let scan = Scan::new(source, path)?;
    let (_, close) = scan.class_body(class).ok_or_else(|| missing_class(class, path))?;
    let close_at = scan.start(close);

    let before = source[..close_at].trim_end();
    let mut out = String::with_capacity(source.len() + 256);
    out.push_str(before);
    out.push_str(if before.ends_with('{') { "\n" } else { "\n\n" });

    let mut previous: Option<&Member> = None;
    for &member in members {
        let both_fields = matches!((previous, member), (Some(Member::Field(_)), Member::Field(_)));
        if previous.is_some() && !both_fields {
            out.push('\n');
        }
        let mut printer = Printer::with_indent(1);
        printer.member(member);
        out.push_str(&printer.finish());
        previous = Some(member);
    }

    out.push_str(line_indent(source, close_at));
    out.push_str(&source[close_at..]);
    Ok(out)
}

/// Replace the statements of `class.method`, keeping its signature.
pub fn replace_method_body(
    source: &str,
    class: &str,
    method: &str,
    body: &Block,
    path: &Path,
) -> Result<String, ScaffoldError> {
    let scan = Scan::new(source, path)?;
    let class_body = scan.class_body(class).ok_or_else(|| missing_class(class, path))?;
    let (open, close) = scan
        .method_body(class_body, method)
        .ok_or_else(|| ScaffoldError::MissingMethod {
            class: class.to_string(),
            method: method.to_string(),
            path: path.to_path_buf(),
        })?;

    let open_at = scan.start(open);
    let indent = line_indent(source, open_at);
    let mut printer = Printer::with_indent(1);
    printer.block_body(body);

    let mut out = String::with_capacity(source.len() + 256);
    out.push_str(&source[..open_at]);
    out.push_str("{\n");
    out.push_str(&printer.finish());
    out.push_str(indent);
    out.push('}');
    out.push_str(&source[scan.end(close)..]);
    Ok(out)
}

/// Add `import fqn;` after the existing imports unless already present.
pub fn add_import(source: &str, fqn: &str, path: &Path) -> Result<String, ScaffoldError> {
    let scan = Scan::new(source, path)?;

    let mut depth = 0usize;
    let mut package_end = None;
    let mut last_import_end = None;
    let mut i = 0;
    while i < scan.tokens.len() {
        if scan.is_punct(i, b'{') {
            depth += 1;
        } else if scan.is_punct(i, b'}') {
            depth = depth.saturating_sub(1);
        } else if depth == 0 && (scan.is_word(i, "import") || scan.is_word(i, "package")) {
            let Some(semi) = (i + 1..scan.tokens.len()).find(|&j| scan.is_punct(j, b';')) else {
                break;
            };
            if scan.is_word(i, "package") {
                package_end = Some(scan.end(semi));
            } else {
                let mut name: String = (i + 1..semi).map(|j| scan.text(j)).collect();
                if let Some(rest) = name.strip_prefix("static") {
                    name = format!("static {}", rest);
                }
                if name == fqn {
                    return Ok(source.to_string());
                }
                last_import_end = Some(scan.end(semi));
            }
            i = semi;
        }
        i += 1;
    }

    let line = format!("import {};", fqn);
    let out = match (last_import_end, package_end) {
        (Some(at), _) => format!("{}\n{}{}", &source[..at], line, &source[at..]),
        (None, Some(at)) => format!("{}\n\n{}{}", &source[..at], line, &source[at..]),
        (None, None) => format!("{}\n\n{}", line, source),
    };
    Ok(out)
}
