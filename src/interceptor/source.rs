//! Settings source loading and accessor-call extraction

use lazy_static::lazy_static;
use regex::Regex;
use std::ops::Range;
use std::path::{Path, PathBuf};

use super::ValueType;
use crate::error::{Result, SkeletonizeError};

lazy_static! {
    /// `name = [module.]ConfigParser(` and its Raw/Safe variants
    static ref PARSER_BINDING: Regex = Regex::new(
        r"(?m)^[ \t]*([A-Za-z_][\w.]*)[ \t]*=[ \t]*(?:[A-Za-z_]\w*\.)*(?:Raw|Safe)?ConfigParser[ \t]*\("
    )
    .expect("parser binding regex");

    /// `receiver.accessor(`
    static ref ACCESSOR_CALL: Regex = Regex::new(
        r"\b([A-Za-z_]\w*)\s*\.\s*(getboolean|getint|getfloat|get)\s*\("
    )
    .expect("accessor call regex");

    /// A plain or prefixed single-line string literal
    static ref STRING_LITERAL: Regex = Regex::new(
        r#"^(?:[rRuU])?(?:'((?:[^'\\]|\\.)*)'|"((?:[^"\\]|\\.)*)")$"#
    )
    .expect("string literal regex");
}

/// Which accessor a call used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accessor {
    Get,
    Typed(ValueType),
}

impl Accessor {
    fn from_name(name: &str) -> Self {
        match name {
            "getboolean" => Self::Typed(ValueType::Boolean),
            "getint" => Self::Typed(ValueType::Integer),
            "getfloat" => Self::Typed(ValueType::Float),
            _ => Self::Get,
        }
    }
}

/// One accessor call found in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessCall {
    pub receiver: String,
    pub accessor: Accessor,
    /// `None` when the argument is not a string literal
    pub section: Option<String>,
    pub key: Option<String>,
    pub line: usize,
}

/// A loaded settings module, with comments blanked out
#[derive(Debug)]
pub struct SourceFile {
    path: PathBuf,
    code: String,
    /// Byte ranges of string literals in `code`, quotes included
    strings: Vec<Range<usize>>,
}

impl SourceFile {
    /// Read the settings module from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| SkeletonizeError::SourceNotFound {
            path: path.to_path_buf(),
            source,
        })?;
        let text = String::from_utf8(bytes).map_err(|e| SkeletonizeError::Execution {
            path: path.to_path_buf(),
            line: 1,
            message: format!("source is not valid UTF-8: {e}"),
        })?;
        tracing::debug!("Loaded: {}", path.display());
        Ok(Self::from_source(path, &text))
    }

    pub fn from_source<P: AsRef<Path>>(path: P, text: &str) -> Self {
        let (code, strings) = lex(text);
        Self {
            path: path.as_ref().to_path_buf(),
            code,
            strings,
        }
    }

    /// True when `offset` falls inside a string literal
    fn in_string(&self, offset: usize) -> bool {
        let after = self.strings.partition_point(|range| range.end <= offset);
        self.strings
            .get(after)
            .is_some_and(|range| range.contains(&offset))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Identifiers bound to a config-parser constructor, in source order
    pub fn parser_bindings(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for caps in PARSER_BINDING.captures_iter(&self.code) {
            let Some(target) = caps.get(1) else {
                continue;
            };
            if self.in_string(target.start()) {
                continue;
            }
            let target = target.as_str();
            let name = target.rsplit('.').next().unwrap_or(target).to_string();
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    /// Every accessor call made on one of `receivers`
    pub fn access_calls(&self, receivers: &[String]) -> Result<Vec<AccessCall>> {
        let mut calls = Vec::new();
        for caps in ACCESSOR_CALL.captures_iter(&self.code) {
            let receiver = &caps[1];
            if !receivers.iter().any(|r| r == receiver) {
                continue;
            }
            let whole = caps.get(0).map(|m| (m.start(), m.end())).unwrap_or_default();
            if self.in_string(whole.0) {
                continue;
            }
            let line = line_of(&self.code, whole.0);
            let Some(args) = split_call_args(&self.code[whole.1..]) else {
                return Err(SkeletonizeError::Execution {
                    path: self.path.clone(),
                    line,
                    message: format!("unterminated call to {receiver}.{}", &caps[2]),
                });
            };

            let (section, key) = section_and_key(&args);
            calls.push(AccessCall {
                receiver: receiver.to_string(),
                accessor: Accessor::from_name(&caps[2]),
                section,
                key,
                line,
            });
        }
        Ok(calls)
    }
}

fn line_of(code: &str, offset: usize) -> usize {
    code[..offset].matches('\n').count() + 1
}

/// Pick section/option from positional or `section=`/`option=` arguments
fn section_and_key(args: &[String]) -> (Option<String>, Option<String>) {
    let mut positional = Vec::new();
    let mut section = None;
    let mut key = None;

    for arg in args {
        match keyword(arg) {
            Some(("section", value)) => section = Some(literal(value)),
            Some(("option", value)) => key = Some(literal(value)),
            Some(_) => {}
            None => positional.push(arg.as_str()),
        }
    }

    let mut positional = positional.into_iter();
    let section = section.or_else(|| positional.next().map(literal)).flatten();
    let key = key.or_else(|| positional.next().map(literal)).flatten();
    (section, key)
}

fn keyword(arg: &str) -> Option<(&str, &str)> {
    let (name, value) = arg.split_once('=')?;
    let name = name.trim();
    let is_ident = !name.is_empty()
        && name.chars().all(|c| c.is_alphanumeric() || c == '_')
        && !value.starts_with('=');
    is_ident.then(|| (name, value.trim()))
}

/// The unescaped content of a string literal argument
fn literal(arg: &str) -> Option<String> {
    let caps = STRING_LITERAL.captures(arg.trim())?;
    let raw = caps.get(1).or_else(|| caps.get(2))?.as_str();
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    Some(out)
}

/// Split the text following an opening parenthesis into top-level arguments.
/// Returns `None` when the closing parenthesis is missing.
fn split_call_args(rest: &str) -> Option<Vec<String>> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut chars = rest.chars();

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            current.push(c);
            if c == '\\' {
                current.extend(chars.next());
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => {
                quote = Some(c);
                current.push(c);
            }
            '(' | '[' | '{' => {
                depth += 1;
                current.push(c);
            }
            ')' if depth == 0 => {
                if !current.trim().is_empty() {
                    args.push(current.trim().to_string());
                }
                return Some(args);
            }
            ')' | ']' | '}' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            ',' if depth == 0 => {
                args.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    None
}

#[derive(Clone, Copy)]
enum LexState {
    Code,
    Comment,
    Str { quote: char, triple: bool, start: usize },
}

/// Replace comment text with spaces, leaving strings and line structure intact.
/// Also returns the byte range of every string literal in the output.
fn lex(src: &str) -> (String, Vec<Range<usize>>) {
    let chars: Vec<char> = src.chars().collect();
    let mut out = String::with_capacity(src.len());
    let mut strings = Vec::new();
    let mut state = LexState::Code;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match state {
            LexState::Code => match c {
                '#' => {
                    state = LexState::Comment;
                    out.push(' ');
                }
                '\'' | '"' => {
                    let start = out.len();
                    let triple = chars.get(i + 1) == Some(&c) && chars.get(i + 2) == Some(&c);
                    if triple {
                        out.extend([c, c, c]);
                        i += 2;
                    } else {
                        out.push(c);
                    }
                    state = LexState::Str { quote: c, triple, start };
                }
                _ => out.push(c),
            },
            LexState::Comment => {
                if c == '\n' {
                    out.push('\n');
                    state = LexState::Code;
                } else {
                    out.push(' ');
                }
            }
            LexState::Str { quote, triple, start } => {
                out.push(c);
                let mut closed = false;
                if c == '\\' {
                    if let Some(&next) = chars.get(i + 1) {
                        out.push(next);
                        i += 1;
                    }
                } else if c == quote {
                    if !triple {
                        closed = true;
                    } else if chars.get(i + 1) == Some(&quote) && chars.get(i + 2) == Some(&quote) {
                        out.extend([quote, quote]);
                        i += 2;
                        closed = true;
                    }
                } else if c == '\n' && !triple {
                    closed = true;
                }
                if closed {
                    strings.push(start..out.len());
                    state = LexState::Code;
                }
            }
        }
        i += 1;
    }
    if let LexState::Str { start, .. } = state {
        strings.push(start..out.len());
    }
    (out, strings)
}
