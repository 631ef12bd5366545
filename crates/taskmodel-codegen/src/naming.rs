//! Deterministic artifact naming.
//!
//! Names are derived from `(process id, node id, kind)` only, so regenerating
//! a node always yields the same identifiers. Collisions between distinct
//! inputs that sanitize to the same text (e.g. `a-b` and `a_b`) are not
//! detected here; process and node ids are expected to be unique already.

use std::fmt;

/// The three artifacts produced per task node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Input,
    Output,
    Model,
}

impl ArtifactKind {
    pub fn suffix(self) -> &'static str {
        match self {
            ArtifactKind::Input => "TaskInput",
            ArtifactKind::Output => "TaskOutput",
            ArtifactKind::Model => "TaskModel",
        }
    }

    /// Lower-case label used in header comments ("Task input for ...").
    pub fn label(self) -> &'static str {
        match self {
            ArtifactKind::Input => "input",
            ArtifactKind::Output => "output",
            ArtifactKind::Model => "model",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.suffix())
    }
}

/// Simple and package-qualified name of one generated artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactName {
    pub simple_name: String,
    pub qualified_name: String,
}

impl ArtifactName {
    /// Derive the artifact name for a node.
    pub fn derive(package_name: &str, process_id: &str, node_id: &str, kind: ArtifactKind) -> Self {
        let simple_name = artifact_simple_name(process_id, node_id, kind);
        let qualified_name = format!("{package_name}.{simple_name}");
        Self {
            simple_name,
            qualified_name,
        }
    }

    /// Source path relative to an output root (`org/acme/Foo_TaskInput.java`).
    pub fn relative_path(&self) -> String {
        format!("{}.java", self.qualified_name.replace('.', "/"))
    }
}

/// The three names of a task node, computed once per generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactNames {
    pub input: ArtifactName,
    pub output: ArtifactName,
    pub model: ArtifactName,
}

impl ArtifactNames {
    pub fn derive(package_name: &str, process_id: &str, node_id: &str) -> Self {
        Self {
            input: ArtifactName::derive(package_name, process_id, node_id, ArtifactKind::Input),
            output: ArtifactName::derive(package_name, process_id, node_id, ArtifactKind::Output),
            model: ArtifactName::derive(package_name, process_id, node_id, ArtifactKind::Model),
        }
    }

    pub fn get(&self, kind: ArtifactKind) -> &ArtifactName {
        match kind {
            ArtifactKind::Input => &self.input,
            ArtifactKind::Output => &self.output,
            ArtifactKind::Model => &self.model,
        }
    }
}

/// `sanitize(shortProcessId + "_" + nodeId + "_" + suffix)`.
pub fn artifact_simple_name(process_id: &str, node_id: &str, kind: ArtifactKind) -> String {
    sanitize_class_name(&format!(
        "{}_{}_{}",
        short_process_id(process_id),
        node_id,
        kind.suffix()
    ))
}

/// The last dot-separated segment of a process id.
pub fn short_process_id(process_id: &str) -> &str {
    match process_id.rfind('.') {
        Some(idx) => &process_id[idx + 1..],
        None => process_id,
    }
}

/// Turn arbitrary text into a class name: invalid characters become `_`,
/// a leading digit is prefixed with `_`, and the first character is upper-cased.
pub fn sanitize_class_name(raw: &str) -> String {
    let mut name = replace_invalid(raw);
    if let Some(first) = name.chars().next() {
        if first.is_lowercase() {
            let upper: String = first.to_uppercase().collect();
            name.replace_range(..first.len_utf8(), &upper);
        }
    }
    name
}

/// Turn a parameter name into a field identifier, keeping its case.
pub fn sanitize_identifier(raw: &str) -> String {
    let name = replace_invalid(raw);
    if is_java_keyword(&name) {
        format!("{name}_")
    } else {
        name
    }
}

fn replace_invalid(raw: &str) -> String {
    let mut name: String = raw
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    match name.chars().next() {
        None => name.push('_'),
        Some(first) if first.is_numeric() => name.insert(0, '_'),
        Some(_) => {}
    }
    name
}

/// Upper-case the first character (bean accessor suffix).
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Quote text as a Java string literal.
pub fn java_string_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn is_java_keyword(name: &str) -> bool {
    matches!(
        name,
        "_" | "abstract"
            | "assert"
            | "boolean"
            | "break"
            | "byte"
            | "case"
            | "catch"
            | "char"
            | "class"
            | "const"
            | "continue"
            | "default"
            | "do"
            | "double"
            | "else"
            | "enum"
            | "extends"
            | "false"
            | "final"
            | "finally"
            | "float"
            | "for"
            | "goto"
            | "if"
            | "implements"
            | "import"
            | "instanceof"
            | "int"
            | "interface"
            | "long"
            | "native"
            | "new"
            | "null"
            | "package"
            | "private"
            | "protected"
            | "public"
            | "return"
            | "short"
            | "static"
            | "strictfp"
            | "super"
            | "switch"
            | "synchronized"
            | "this"
            | "throw"
            | "throws"
            | "transient"
            | "true"
            | "try"
            | "void"
            | "volatile"
            | "while"
    )
}
