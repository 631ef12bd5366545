//! Parser for Java class templates.
//!
//! Scans a masked copy of the source (comments and literal contents blanked,
//! byte offsets preserved) to find structure, then slices the source text.
//! Handles the shapes class templates use: one top-level class, fields,
//! methods and constructors with bodies. Anything else inside the class body
//! is kept as verbatim member text.

use std::sync::LazyLock;

use regex::Regex;

use super::model::{
    split_top_level, ClassDecl, CompilationUnit, Member, Parameter, Routine, Statement, TypeRef,
};
use super::TemplateKind;
use crate::error::{CodegenError, CodegenResult};

static PACKAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bpackage\s+([\w.]+)\s*;").expect("package pattern is valid"));

static IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bimport\s+((?:static\s+)?[\w.]+(?:\.\*)?)\s*;").expect("import pattern is valid")
});

static CLASS_ROOT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(class|interface)\s+([A-Za-z_$][\w$]*)").expect("class pattern is valid")
});

static EXTENDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bextends\b").expect("extends pattern is valid"));

static IMPLEMENTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bimplements\b").expect("implements pattern is valid"));

const MODIFIERS: &[&str] = &[
    "public",
    "protected",
    "private",
    "static",
    "final",
    "abstract",
    "synchronized",
    "native",
    "strictfp",
    "default",
    "transient",
    "volatile",
    "sealed",
    "non-sealed",
];

/// Parse a class template into a [`CompilationUnit`].
pub(crate) fn parse_compilation_unit(
    kind: TemplateKind,
    source: &str,
) -> CodegenResult<CompilationUnit> {
    let masked = mask_comments_and_literals(source);

    let root = CLASS_ROOT
        .captures(&masked)
        .ok_or(CodegenError::DeclarationRootNotFound { kind })?;
    let (Some(keyword), Some(name)) = (root.get(1), root.get(2)) else {
        return Err(CodegenError::DeclarationRootNotFound { kind });
    };
    let preamble = &masked[..keyword.start()];

    let mut header_end = 0;
    let package = PACKAGE.captures(preamble).map(|caps| {
        header_end = header_end.max(caps.get(0).map_or(0, |m| m.end()));
        caps[1].to_string()
    });
    let mut imports = Vec::new();
    for caps in IMPORT.captures_iter(preamble) {
        header_end = header_end.max(caps.get(0).map_or(0, |m| m.end()));
        imports.push(caps[1].split_whitespace().collect::<Vec<_>>().join(" "));
    }

    let (annotations, modifiers, _) = scan_modifiers(
        &masked[header_end..keyword.start()],
        &source[header_end..keyword.start()],
    );

    let open = masked[name.end()..]
        .find('{')
        .map(|offset| name.end() + offset)
        .ok_or_else(|| CodegenError::MalformedTemplate {
            kind,
            reason: format!("class '{}' has no body", name.as_str()),
        })?;
    let close = matching(masked.as_bytes(), open, b'{', b'}').ok_or_else(|| {
        CodegenError::MalformedTemplate {
            kind,
            reason: format!("class '{}' body is not closed", name.as_str()),
        }
    })?;

    let (type_parameters, extends, implements) = parse_type_clause(&masked[name.end()..open]);

    let members = member_spans(&masked, open + 1, close)
        .into_iter()
        .map(|(start, end)| parse_member(&masked, source, start, end))
        .collect();

    Ok(CompilationUnit {
        comments: Vec::new(),
        package,
        imports,
        class: ClassDecl {
            annotations,
            modifiers,
            keyword: keyword.as_str().to_string(),
            name: name.as_str().to_string(),
            type_parameters,
            extends,
            implements,
            members,
        },
    })
}

/// Blank comment and string/char literal contents, keeping newlines and
/// byte offsets.
fn mask_comments_and_literals(source: &str) -> String {
    let bytes = source.as_bytes();
    let len = bytes.len();
    let mut out = bytes.to_vec();
    let blank = |out: &mut Vec<u8>, from: usize, to: usize| {
        for byte in &mut out[from..to.min(len)] {
            if *byte != b'\n' {
                *byte = b' ';
            }
        }
    };

    let mut i = 0;
    while i < len {
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                let end = source[i..].find('\n').map_or(len, |offset| i + offset);
                blank(&mut out, i, end);
                i = end;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let end = source[i + 2..].find("*/").map_or(len, |offset| i + 2 + offset + 2);
                blank(&mut out, i, end);
                i = end;
            }
            quote @ (b'"' | b'\'') => {
                let mut j = i + 1;
                while j < len && bytes[j] != quote && bytes[j] != b'\n' {
                    if bytes[j] == b'\\' {
                        j += 1;
                    }
                    j += 1;
                }
                blank(&mut out, i + 1, j);
                i = j + 1;
            }
            _ => i += 1,
        }
    }

    // Only whole characters inside ASCII-delimited ranges were replaced.
    String::from_utf8(out).unwrap_or_else(|_| source.to_string())
}

/// Index of the delimiter closing the one at `open`.
fn matching(bytes: &[u8], open: usize, open_byte: u8, close_byte: u8) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, &byte) in bytes.iter().enumerate().skip(open) {
        if byte == open_byte {
            depth += 1;
        } else if byte == close_byte {
            depth = depth.checked_sub(1)?;
            if depth == 0 {
                return Some(idx);
            }
        }
    }
    None
}

/// Leading annotations and modifiers of a declaration header. Returns the
/// offset where the remaining declaration starts.
fn scan_modifiers(masked: &str, source: &str) -> (Vec<String>, Vec<String>, usize) {
    let bytes = masked.as_bytes();
    let len = bytes.len();
    let mut annotations = Vec::new();
    let mut modifiers = Vec::new();
    let mut i = 0;

    loop {
        while i < len && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= len {
            break;
        }
        if bytes[i] == b'@' && !masked[i..].starts_with("@interface") {
            let start = i;
            i += 1;
            while i < len
                && (bytes[i].is_ascii_alphanumeric() || matches!(bytes[i], b'_' | b'.' | b'$'))
            {
                i += 1;
            }
            let mut j = i;
            while j < len && bytes[j].is_ascii_whitespace() {
                j += 1;
            }
            if j < len && bytes[j] == b'(' {
                if let Some(close) = matching(bytes, j, b'(', b')') {
                    i = close + 1;
                }
            }
            annotations.push(collapse_whitespace(&source[start..i]));
            continue;
        }
        if bytes[i] == b'<' {
            if let Some(close) = matching(bytes, i, b'<', b'>') {
                modifiers.push(source[i..=close].to_string());
                i = close + 1;
                continue;
            }
        }
        let start = i;
        while i < len && !bytes[i].is_ascii_whitespace() && !matches!(bytes[i], b'(' | b'<' | b'@')
        {
            i += 1;
        }
        let word = &masked[start..i];
        if MODIFIERS.contains(&word) {
            modifiers.push(word.to_string());
            continue;
        }
        i = start;
        break;
    }

    (annotations, modifiers, i)
}

/// `<T> extends A implements B<C>, D` between the class name and its body.
fn parse_type_clause(clause: &str) -> (Option<String>, Vec<TypeRef>, Vec<TypeRef>) {
    let mut rest = clause.trim();
    let mut type_parameters = None;
    if rest.starts_with('<') {
        if let Some(close) = matching(rest.as_bytes(), 0, b'<', b'>') {
            type_parameters = Some(rest[..=close].to_string());
            rest = rest[close + 1..].trim();
        }
    }

    let implements_at = IMPLEMENTS.find(rest);
    let extends_at = EXTENDS
        .find(rest)
        .filter(|m| implements_at.map_or(true, |imp| m.start() < imp.start()));

    let type_list = |text: &str| -> Vec<TypeRef> {
        split_top_level(text, ',')
            .into_iter()
            .filter(|part| !part.trim().is_empty())
            .map(TypeRef::parse)
            .collect()
    };

    let extends = extends_at
        .map(|m| {
            let end = implements_at.map_or(rest.len(), |imp| imp.start());
            type_list(&rest[m.end()..end])
        })
        .unwrap_or_default();
    let implements = implements_at
        .map(|m| type_list(&rest[m.end()..]))
        .unwrap_or_default();

    (type_parameters, extends, implements)
}

/// Byte spans of top-level members between `start` and `end`.
fn member_spans(masked: &str, start: usize, end: usize) -> Vec<(usize, usize)> {
    let bytes = masked.as_bytes();
    let mut spans = Vec::new();
    let mut depth = 0usize;
    let mut member_start = start;

    for idx in start..end {
        match bytes[idx] {
            b'{' => depth += 1,
            b'}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    let head = &masked[member_start..idx];
                    let head = &head[..head.find('{').unwrap_or(head.len())];
                    // `= new X() { ... };` continues until its semicolon
                    if !has_top_level_assignment(head) {
                        spans.push((member_start, idx + 1));
                        member_start = idx + 1;
                    }
                }
            }
            b';' if depth == 0 => {
                spans.push((member_start, idx + 1));
                member_start = idx + 1;
            }
            _ => {}
        }
    }
    spans.push((member_start, end));

    spans
        .into_iter()
        .filter(|&(s, e)| !masked[s..e].trim().is_empty() && masked[s..e].trim() != ";")
        .collect()
}

fn has_top_level_assignment(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut depth = 0i32;
    for (idx, &byte) in bytes.iter().enumerate() {
        match byte {
            b'(' => depth += 1,
            b')' => depth -= 1,
            b'=' if depth == 0 => {
                let prev = idx.checked_sub(1).map(|p| bytes[p]);
                let next = bytes.get(idx + 1).copied();
                let comparison = matches!(prev, Some(b'=' | b'!' | b'<' | b'>')) || next == Some(b'=');
                if !comparison {
                    return true;
                }
            }
            _ => {}
        }
    }
    false
}

fn parse_member(masked: &str, source: &str, start: usize, end: usize) -> Member {
    parse_routine(&masked[start..end], &source[start..end])
        .map(Member::Routine)
        .unwrap_or_else(|| Member::Verbatim(dedent(&source[line_start(source, start)..end])))
}

/// Parse `annotations modifiers Type name(params) throws X { body }`.
fn parse_routine(masked: &str, source: &str) -> Option<Routine> {
    let open = masked.find('{')?;
    if !masked.trim_end().ends_with('}') {
        return None;
    }
    let close = masked.rfind('}')?;

    let (annotations, modifiers, offset) = scan_modifiers(&masked[..open], &source[..open]);
    let rest_masked = &masked[offset..open];
    let rest_source = &source[offset..open];

    let paren = rest_masked.find('(')?;
    if has_top_level_assignment(&rest_masked[..paren]) {
        return None;
    }
    let paren_close = matching(rest_masked.as_bytes(), paren, b'(', b')')?;

    let before = rest_source[..paren].trim_end();
    let name_start = before
        .rfind(|c: char| !(c.is_alphanumeric() || c == '_' || c == '$'))
        .map_or(0, |idx| idx + 1);
    let name = &before[name_start..];
    if name.is_empty() {
        return None;
    }
    let return_type = collapse_whitespace(before[..name_start].trim());
    if matches!(return_type.as_str(), "class" | "interface" | "enum" | "record" | "new") {
        return None;
    }

    let parameters = split_top_level(&rest_source[paren + 1..paren_close], ',')
        .into_iter()
        .filter(|param| !param.trim().is_empty())
        .filter_map(parse_parameter)
        .collect();

    let throws = rest_source[paren_close + 1..]
        .trim()
        .strip_prefix("throws")
        .map(|t| collapse_whitespace(t.trim()))
        .filter(|t| !t.is_empty());

    let body = dedent(&source[open + 1..close])
        .into_iter()
        .map(Statement::Raw)
        .collect();

    Some(Routine {
        annotations,
        modifiers,
        return_type: (!return_type.is_empty()).then_some(return_type),
        name: name.to_string(),
        parameters,
        throws,
        body,
    })
}

fn parse_parameter(text: &str) -> Option<Parameter> {
    let text = text.trim();
    let split = text.rfind(char::is_whitespace)?;
    Some(Parameter::new(
        collapse_whitespace(text[..split].trim()),
        text[split..].trim(),
    ))
}

/// Start of the line containing `idx` when only indentation precedes it.
fn line_start(source: &str, idx: usize) -> usize {
    let before = &source[..idx];
    let line_begin = before.rfind('\n').map_or(0, |nl| nl + 1);
    if before[line_begin..].chars().all(|c| c == ' ' || c == '\t') {
        line_begin
    } else {
        idx
    }
}

/// Drop surrounding blank lines and the common indentation.
fn dedent(text: &str) -> Vec<String> {
    let lines: Vec<&str> = text.lines().collect();
    let Some(first) = lines.iter().position(|l| !l.trim().is_empty()) else {
        return Vec::new();
    };
    let last = lines
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .unwrap_or(first);
    let kept = &lines[first..=last];

    let indent = kept
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.chars().take_while(|c| c.is_whitespace()).count())
        .min()
        .unwrap_or(0);

    kept.iter()
        .map(|l| {
            if l.trim().is_empty() {
                String::new()
            } else {
                l.chars().skip(indent).collect::<String>().trim_end().to_string()
            }
        })
        .collect()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
