// This module is a small C preprocessor covering only the directive subset the generator
// emits, used to check a generated header against a compile target without a C toolchain.
// It strips block comments (keeping line numbers intact), joins backslash continuations,
// tracks nested #if/#ifdef/#ifndef/#else/#endif state, records #define in active regions
// (function-like macros are recorded by name only) and ignores everything else. #if
// conditions are the shapes architecture guards render to: &&-joined terms of defined(X),
// !defined(X), X == N, or a bare literal. The result is the macro table in effect at the
// end of the header, with object-like macros resolvable through chains such as
// __NR_x -> __LTP__NR_INVALID_SYSCALL -> -1.

//! Minimal preprocessor for evaluating generated headers.

use hashbrown::HashMap;

use crate::core::{GenError, GenResult};
use crate::guard::Target;

/// Upper bound on object-macro indirection when resolving.
const MAX_EXPANSION_DEPTH: usize = 32;

/// A recorded macro definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MacroDef {
    /// Object-like macro and its replacement text.
    Object(String),
    /// Function-like macro; the body is not tracked.
    Function,
}

/// Macros defined at the end of evaluation.
#[derive(Debug, Clone, Default)]
pub struct MacroTable {
    macros: HashMap<String, MacroDef>,
}

impl MacroTable {
    /// Table seeded with a target's predefined macros.
    pub fn for_target(target: &Target) -> Self {
        let mut table = Self::default();
        for (name, value) in target.macros() {
            table.define(name, MacroDef::Object(value.to_string()));
        }
        table
    }

    fn define(&mut self, name: &str, def: MacroDef) {
        self.macros.insert(name.to_string(), def);
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.macros.contains_key(name)
    }

    /// Replacement text of `name` after following object-macro aliases.
    pub fn resolve(&self, name: &str) -> Option<String> {
        let mut current = match self.macros.get(name)? {
            MacroDef::Object(body) => body.trim().to_string(),
            MacroDef::Function => return None,
        };

        for _ in 0..MAX_EXPANSION_DEPTH {
            if !is_identifier(&current) {
                break;
            }
            match self.macros.get(current.as_str()) {
                Some(MacroDef::Object(body)) => current = body.trim().to_string(),
                _ => break,
            }
        }
        Some(current)
    }

    /// Numeric value of `name`, when it resolves to an integer literal.
    pub fn resolve_number(&self, name: &str) -> Option<i64> {
        self.resolve(name).and_then(|text| parse_integer(&text))
    }
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn parse_integer(text: &str) -> Option<i64> {
    let text = text.trim();
    let text = text
        .strip_prefix('(')
        .and_then(|t| t.strip_suffix(')'))
        .unwrap_or(text)
        .trim();
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        return i64::from_str_radix(hex, 16).ok();
    }
    text.parse().ok()
}

/// One open conditional.
#[derive(Debug)]
struct Frame {
    parent_active: bool,
    active: bool,
    taken: bool,
    line: usize,
}

/// Evaluate `text` for `target` and return the resulting macro table.
pub fn evaluate(text: &str, target: &Target) -> GenResult<MacroTable> {
    let mut macros = MacroTable::for_target(target);
    let mut stack: Vec<Frame> = Vec::new();
    let source = strip_comments(text);

    for (line, logical) in logical_lines(&source) {
        let trimmed = logical.trim();
        let Some(directive) = trimmed.strip_prefix('#') else {
            continue;
        };
        let directive = directive.trim_start();
        let keyword_len = directive
            .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
            .unwrap_or(directive.len());
        let (keyword, args) = directive.split_at(keyword_len);
        let args = args.trim();
        let active = stack.last().map_or(true, |f| f.active);
        let fail = |reason: String| GenError::Evaluate { line, reason };

        match keyword {
            "ifdef" | "ifndef" | "if" => {
                let cond = if !active {
                    false
                } else if keyword == "if" {
                    eval_condition(args, &macros).map_err(fail)?
                } else {
                    let defined = macros.is_defined(first_identifier(args).map_err(fail)?);
                    defined == (keyword == "ifdef")
                };
                stack.push(Frame {
                    parent_active: active,
                    active: cond,
                    taken: cond,
                    line,
                });
            }
            "elif" => return Err(fail("#elif is not supported".to_string())),
            "else" => {
                let frame = stack
                    .last_mut()
                    .ok_or_else(|| fail("#else without #if".to_string()))?;
                frame.active = frame.parent_active && !frame.taken;
                frame.taken = true;
            }
            "endif" => {
                stack
                    .pop()
                    .ok_or_else(|| fail("#endif without #if".to_string()))?;
            }
            "define" if active => {
                let name = first_identifier(args).map_err(fail)?;
                let rest = &args[name.len()..];
                let def = if rest.starts_with('(') {
                    MacroDef::Function
                } else {
                    MacroDef::Object(rest.trim().to_string())
                };
                log::trace!("line {}: define {} {:?}", line, name, def);
                macros.define(name, def);
            }
            _ => {}
        }
    }

    if let Some(frame) = stack.last() {
        return Err(GenError::Evaluate {
            line: frame.line,
            reason: "unterminated conditional".to_string(),
        });
    }

    Ok(macros)
}

fn first_identifier(args: &str) -> Result<&str, String> {
    let end = args
        .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
        .unwrap_or(args.len());
    let name = &args[..end];
    if is_identifier(name) {
        Ok(name)
    } else {
        Err(format!("expected macro name, found {:?}", args))
    }
}

/// Replace `/* ... */` comments with spaces, keeping newlines.
fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut in_comment = false;

    while let Some(c) = chars.next() {
        if in_comment {
            if c == '*' && chars.peek() == Some(&'/') {
                chars.next();
                in_comment = false;
                out.push(' ');
            } else if c == '\n' {
                out.push('\n');
            }
        } else if c == '/' && chars.peek() == Some(&'*') {
            chars.next();
            in_comment = true;
        } else {
            out.push(c);
        }
    }
    out
}

/// Physical lines joined across trailing backslashes, with 1-based start line.
fn logical_lines(text: &str) -> Vec<(usize, String)> {
    let mut lines = Vec::new();
    let mut pending: Option<(usize, String)> = None;

    for (idx, raw) in text.lines().enumerate() {
        let (start, mut acc) = pending.take().unwrap_or((idx + 1, String::new()));
        match raw.strip_suffix('\\') {
            Some(head) => {
                acc.push_str(head);
                acc.push(' ');
                pending = Some((start, acc));
            }
            None => {
                acc.push_str(raw);
                lines.push((start, acc));
            }
        }
    }
    if let Some(rest) = pending {
        lines.push(rest);
    }
    lines
}

/// Evaluate an `#if` condition: `&&`-joined terms of `defined(X)`,
/// `!term`, `X == N` or a single operand.
fn eval_condition(expr: &str, macros: &MacroTable) -> Result<bool, String> {
    if expr.is_empty() {
        return Err("#if with no expression".to_string());
    }
    for term in expr.split("&&") {
        if !eval_term(term.trim(), macros)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn eval_term(term: &str, macros: &MacroTable) -> Result<bool, String> {
    if let Some(rest) = term.strip_prefix('!') {
        return Ok(!eval_term(rest.trim_start(), macros)?);
    }
    if let Some(rest) = term.strip_prefix("defined") {
        if rest.starts_with(|c: char| c == '(' || c.is_whitespace()) {
            let name = rest.trim().trim_start_matches('(').trim_end_matches(')').trim();
            if !is_identifier(name) {
                return Err(format!("expected macro name after defined, found {:?}", rest));
            }
            return Ok(macros.is_defined(name));
        }
    }
    if let Some((lhs, rhs)) = term.split_once("==") {
        return Ok(operand(lhs, macros)? == operand(rhs, macros)?);
    }
    Ok(operand(term, macros)? != 0)
}

/// An integer literal, or an identifier taking its numeric macro value or 0.
fn operand(text: &str, macros: &MacroTable) -> Result<i64, String> {
    let text = text.trim();
    if let Some(value) = parse_integer(text) {
        return Ok(value);
    }
    if is_identifier(text) {
        return Ok(macros.resolve_number(text).unwrap_or(0));
    }
    Err(format!("unsupported operand {:?} in condition", text))
}
