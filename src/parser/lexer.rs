//! Tokenizer / Parser
//!
//! Converts macro source text into an ordered sequence of `Command` records.
//! The grammar is line-oriented: no nesting, no operator precedence, so the
//! "parser" is a single-pass lexer over one logical line at a time.

use super::types::{is_valid_key, Command, ParseException, Parameter};

/// Character-vector lexer, one logical line at a time. `pos`/`line`/`column`
/// track position for diagnostics, mirroring how a recursive-descent parser
/// would, even though this grammar never recurses.
struct LineLexer<'a> {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    raw: &'a str,
}

impl<'a> LineLexer<'a> {
    fn new(raw: &'a str, line: usize) -> Self {
        Self { chars: raw.chars().collect(), pos: 0, line, column: 1, raw }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        self.column += 1;
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c == ' ' || c == '\t') {
            self.advance();
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    /// Reads one whitespace-delimited token. A `"` anywhere in the token
    /// (not only at its start, so `KEY="a b"` works) opens a quoted section
    /// that may contain spaces, closed by a `"` not immediately followed by
    /// another `"` (`""` is a literal escaped quote).
    fn read_token(&mut self) -> Result<String, ParseException> {
        let mut out = String::new();
        loop {
            match self.peek() {
                None | Some(' ') | Some('\t') => break,
                Some('"') => {
                    self.advance();
                    loop {
                        match self.advance() {
                            Some('"') => {
                                if self.peek() == Some('"') {
                                    out.push('"');
                                    self.advance();
                                } else {
                                    break;
                                }
                            }
                            Some(c) => out.push(c),
                            None => {
                                return Err(ParseException::new(
                                    "unterminated quoted string",
                                    self.line,
                                    self.column,
                                ))
                            }
                        }
                    }
                }
                Some(_) => out.push(self.advance().unwrap()),
            }
        }
        Ok(out)
    }
}

/// Splits a raw token into a `Parameter`: `KEY=VALUE` when the text before
/// the first unquoted `=` matches `[A-Za-z_][A-Za-z0-9_]*`, positional
/// otherwise. The quoting pass has already resolved `""` escapes, so this
/// only needs to find the split point in the remaining unquoted text.
fn split_param(raw_token: &str, original: &str) -> Parameter {
    // A key is always unquoted ASCII, so it occupies identical byte ranges
    // in both the original source token and its dequoted form: find the
    // first '=' in the original, and if the text before it is a valid key,
    // slice the dequoted token at that same offset for the value.
    if let Some(eq_pos) = original.find('=') {
        let key_candidate = &original[..eq_pos];
        if !key_candidate.contains('"') && is_valid_key(key_candidate) {
            let value = raw_token.get(key_candidate.len() + 1..).unwrap_or("").to_string();
            return Parameter::named(key_candidate.to_ascii_uppercase(), value);
        }
    }
    Parameter::positional(raw_token.to_string())
}

/// Collects `{{name}}` references from a parameter value, trimming the
/// inner text, for parse-time diagnostics.
fn scan_referenced_variables(value: &str, out: &mut Vec<String>) {
    let bytes = value.as_bytes();
    let mut i = 0;
    while i + 1 < bytes.len() {
        if bytes[i] == b'{' && bytes[i + 1] == b'{' {
            if let Some(end) = value[i + 2..].find("}}") {
                let name = value[i + 2..i + 2 + end].trim().to_string();
                if !name.is_empty() {
                    out.push(name);
                }
                i += 2 + end + 2;
                continue;
            }
        }
        i += 1;
    }
}

/// Merges `\`-continued lines and strips comment-only lines, returning
/// `(logical_line, starting_line_number, raw_text)` triples. `raw_text`
/// preserves the joined source (continuation lines are newline-joined) for
/// the `Command::raw` field.
fn join_continuations(source: &str) -> Vec<(usize, String, String)> {
    let mut result = Vec::new();
    let lines: Vec<&str> = source.lines().collect();
    let mut i = 0;
    while i < lines.len() {
        let start_line = i + 1;
        let mut logical = String::new();
        let mut raw = String::new();
        loop {
            let line = lines[i];
            let trimmed_end = line.trim_end_matches(['\r']);
            if let Some(stripped) = trimmed_end.strip_suffix('\\') {
                logical.push_str(stripped);
                raw.push_str(trimmed_end);
                raw.push('\n');
                i += 1;
                if i >= lines.len() {
                    break;
                }
            } else {
                logical.push_str(trimmed_end);
                raw.push_str(trimmed_end);
                i += 1;
                break;
            }
        }
        result.push((start_line, logical, raw));
    }
    result
}

fn is_comment(line: &str) -> bool {
    let t = line.trim_start();
    t.starts_with('\'') || t.starts_with("//")
}

/// Parses complete macro source text into an ordered `Vec<Command>`.
/// Unknown command kinds are never a parse failure; only malformed quoting
/// aborts the parse.
pub fn parse(source: &str) -> Result<Vec<Command>, ParseException> {
    let mut commands = Vec::new();
    for (line_number, logical, raw) in join_continuations(source) {
        if logical.trim().is_empty() || is_comment(&logical) {
            continue;
        }
        let mut lexer = LineLexer::new(&logical, line_number);
        lexer.skip_whitespace();
        let kind_raw = lexer.read_token()?;
        if kind_raw.is_empty() {
            continue;
        }
        let kind = kind_raw.to_ascii_uppercase();

        let mut parameters = Vec::new();
        let mut referenced_variables = Vec::new();
        loop {
            lexer.skip_whitespace();
            if lexer.at_end() {
                break;
            }
            let token_start = lexer.pos;
            let token = lexer.read_token()?;
            if token.is_empty() {
                break;
            }
            let original_slice: String = lexer.chars[token_start..lexer.pos].iter().collect();
            let param = split_param(&token, &original_slice);
            scan_referenced_variables(&param.value, &mut referenced_variables);
            parameters.push(param);
        }

        commands.push(Command {
            kind,
            parameters,
            raw: raw.trim_end_matches('\n').to_string(),
            line_number,
            referenced_variables,
        });
        let _ = lexer.raw;
    }
    Ok(commands)
}
