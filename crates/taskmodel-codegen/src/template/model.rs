//! Declaration model of a generated compilation unit.
//!
//! Templates are parsed into this model, rewritten in place, and serialized
//! by [`super::render`]. Only the constructs the generator rewrites are
//! modelled; everything else is carried as verbatim member text.

use std::fmt;

/// One Java source file: header comments, package, imports and a single
/// top-level class.
#[derive(Debug, Clone, PartialEq)]
pub struct CompilationUnit {
    pub comments: Vec<String>,
    pub package: Option<String>,
    pub imports: Vec<String>,
    pub class: ClassDecl,
}

impl CompilationUnit {
    pub fn set_package(&mut self, package: impl Into<String>) {
        self.package = Some(package.into());
    }

    pub fn add_comment(&mut self, comment: impl Into<String>) {
        self.comments.push(comment.into());
    }

    /// Add an import unless it is already present.
    pub fn add_import(&mut self, import: &str) {
        if !self.imports.iter().any(|existing| existing == import) {
            self.imports.push(import.to_string());
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub annotations: Vec<String>,
    pub modifiers: Vec<String>,
    /// `class` or `interface`.
    pub keyword: String,
    pub name: String,
    pub type_parameters: Option<String>,
    pub extends: Vec<TypeRef>,
    pub implements: Vec<TypeRef>,
    pub members: Vec<Member>,
}

impl ClassDecl {
    /// `public class Foo extends Bar implements Baz<A, B>`
    pub fn declaration(&self) -> String {
        let mut parts: Vec<String> = self.modifiers.clone();
        parts.push(self.keyword.clone());
        let mut name = self.name.clone();
        if let Some(params) = &self.type_parameters {
            name.push_str(params);
        }
        parts.push(name);
        if !self.extends.is_empty() {
            parts.push("extends".to_string());
            parts.push(join_types(&self.extends));
        }
        if !self.implements.is_empty() {
            parts.push("implements".to_string());
            parts.push(join_types(&self.implements));
        }
        parts.join(" ")
    }

    pub fn add_annotation(&mut self, annotation: impl Into<String>) {
        self.annotations.push(annotation.into());
    }

    pub fn add_member(&mut self, member: Member) {
        self.members.push(member);
    }

    pub fn routine(&self, name: &str) -> Option<&Routine> {
        self.members.iter().find_map(|member| match member {
            Member::Routine(routine) if routine.name == name => Some(routine),
            _ => None,
        })
    }

    pub fn routine_mut(&mut self, name: &str) -> Option<&mut Routine> {
        self.members.iter_mut().find_map(|member| match member {
            Member::Routine(routine) if routine.name == name => Some(routine),
            _ => None,
        })
    }

    /// Synthesized field declarations, in member order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDecl> {
        self.members.iter().filter_map(|member| match member {
            Member::Field(field) => Some(field),
            _ => None,
        })
    }
}

fn join_types(types: &[TypeRef]) -> String {
    types
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A class or interface reference with optional type arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    pub base: String,
    pub arguments: Vec<String>,
}

impl TypeRef {
    /// Parse `Base<A, B<C>>` into its base and top-level arguments.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        match (text.find('<'), text.rfind('>')) {
            (Some(open), Some(close)) if close > open => Self {
                base: text[..open].trim().to_string(),
                arguments: split_top_level(&text[open + 1..close], ',')
                    .into_iter()
                    .map(|arg| arg.trim().to_string())
                    .filter(|arg| !arg.is_empty())
                    .collect(),
            },
            _ => Self {
                base: text.to_string(),
                arguments: Vec::new(),
            },
        }
    }

    pub fn set_type_arguments(&mut self, arguments: Vec<String>) {
        self.arguments = arguments;
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.arguments.is_empty() {
            write!(f, "{}", self.base)
        } else {
            write!(f, "{}<{}>", self.base, self.arguments.join(", "))
        }
    }
}

/// Split on `separator` at generic/paren nesting depth zero.
pub(crate) fn split_top_level(text: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (idx, c) in text.char_indices() {
        match c {
            '<' | '(' | '[' => depth += 1,
            '>' | ')' | ']' => depth -= 1,
            c if c == separator && depth == 0 => {
                parts.push(&text[start..idx]);
                start = idx + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    Field(FieldDecl),
    Routine(Routine),
    /// Template text kept as written (dedented lines).
    Verbatim(Vec<String>),
}

impl Member {
    /// Source lines of this member, relative to the class body indentation.
    pub fn lines(&self) -> Vec<String> {
        match self {
            Member::Field(field) => field.lines(),
            Member::Routine(routine) => routine.lines(),
            Member::Verbatim(lines) => lines.clone(),
        }
    }

    /// Apply token substitutions to every textual part of the member.
    pub fn substitute(&mut self, substitutions: &Substitutions) {
        match self {
            Member::Field(field) => {
                substitute_all(&mut field.annotations, substitutions);
                field.type_name = substitutions.apply(&field.type_name);
                field.name = substitutions.apply(&field.name);
                if let Some(init) = &mut field.initializer {
                    *init = substitutions.apply(init);
                }
            }
            Member::Routine(routine) => {
                substitute_all(&mut routine.annotations, substitutions);
                if let Some(ret) = &mut routine.return_type {
                    *ret = substitutions.apply(ret);
                }
                routine.name = substitutions.apply(&routine.name);
                for param in &mut routine.parameters {
                    param.type_name = substitutions.apply(&param.type_name);
                    param.name = substitutions.apply(&param.name);
                }
                if let Some(throws) = &mut routine.throws {
                    *throws = substitutions.apply(throws);
                }
                for statement in &mut routine.body {
                    statement.substitute(substitutions);
                }
            }
            Member::Verbatim(lines) => substitute_all(lines, substitutions),
        }
    }
}

fn substitute_all(texts: &mut [String], substitutions: &Substitutions) {
    for text in texts {
        *text = substitutions.apply(text);
    }
}

/// A field declaration with a single declarator.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub annotations: Vec<String>,
    pub modifiers: Vec<String>,
    pub type_name: String,
    pub name: String,
    pub initializer: Option<String>,
}

impl FieldDecl {
    pub fn private(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            annotations: Vec::new(),
            modifiers: vec!["private".to_string()],
            type_name: type_name.into(),
            name: name.into(),
            initializer: None,
        }
    }

    fn lines(&self) -> Vec<String> {
        let mut lines = self.annotations.clone();
        let mut decl = prefixed(&self.modifiers, &format!("{} {}", self.type_name, self.name));
        if let Some(init) = &self.initializer {
            decl.push_str(" = ");
            decl.push_str(init);
        }
        decl.push(';');
        lines.push(decl);
        lines
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub type_name: String,
    pub name: String,
}

impl Parameter {
    pub fn new(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            name: name.into(),
        }
    }
}

/// A method or constructor with a body.
#[derive(Debug, Clone, PartialEq)]
pub struct Routine {
    pub annotations: Vec<String>,
    pub modifiers: Vec<String>,
    /// `None` for constructors.
    pub return_type: Option<String>,
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub throws: Option<String>,
    pub body: Vec<Statement>,
}

impl Routine {
    pub fn method(
        modifiers: &[&str],
        return_type: impl Into<String>,
        name: impl Into<String>,
        parameters: Vec<Parameter>,
        body: Vec<Statement>,
    ) -> Self {
        Self {
            annotations: Vec::new(),
            modifiers: modifiers.iter().map(|m| (*m).to_string()).collect(),
            return_type: Some(return_type.into()),
            name: name.into(),
            parameters,
            throws: None,
            body,
        }
    }

    pub fn is_static(&self) -> bool {
        self.modifiers.iter().any(|m| m == "static")
    }

    pub fn set_return_type(&mut self, return_type: impl Into<String>) {
        self.return_type = Some(return_type.into());
    }

    pub fn set_body(&mut self, body: Vec<Statement>) {
        self.body = body;
    }

    /// Name of the first parameter, if any.
    pub fn first_parameter(&self) -> Option<&str> {
        self.parameters.first().map(|p| p.name.as_str())
    }

    pub fn signature(&self) -> String {
        let params = self
            .parameters
            .iter()
            .map(|p| format!("{} {}", p.type_name, p.name))
            .collect::<Vec<_>>()
            .join(", ");
        let head = match &self.return_type {
            Some(ret) => format!("{ret} {}({params})", self.name),
            None => format!("{}({params})", self.name),
        };
        let mut signature = prefixed(&self.modifiers, &head);
        if let Some(throws) = &self.throws {
            signature.push_str(" throws ");
            signature.push_str(throws);
        }
        signature
    }

    fn lines(&self) -> Vec<String> {
        let mut lines = self.annotations.clone();
        lines.push(format!("{} {{", self.signature()));
        for statement in &self.body {
            let text = statement.to_string();
            if text.trim().is_empty() {
                lines.push(String::new());
            } else {
                lines.push(format!("    {text}"));
            }
        }
        lines.push("}".to_string());
        lines
    }
}

fn prefixed(modifiers: &[String], rest: &str) -> String {
    if modifiers.is_empty() {
        rest.to_string()
    } else {
        format!("{} {rest}", modifiers.join(" "))
    }
}

/// One statement of a routine body.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `Type name = init;`
    Local {
        type_name: String,
        name: String,
        init: String,
    },
    /// `target = value;`
    Assign { target: String, value: String },
    /// `expression;`
    Expression(String),
    /// `return value;`
    Return(String),
    /// A template line kept as written, including its relative indentation.
    Raw(String),
}

impl Statement {
    fn substitute(&mut self, substitutions: &Substitutions) {
        match self {
            Statement::Local {
                type_name,
                name,
                init,
            } => {
                *type_name = substitutions.apply(type_name);
                *name = substitutions.apply(name);
                *init = substitutions.apply(init);
            }
            Statement::Assign { target, value } => {
                *target = substitutions.apply(target);
                *value = substitutions.apply(value);
            }
            Statement::Expression(text) | Statement::Return(text) | Statement::Raw(text) => {
                *text = substitutions.apply(text);
            }
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Local {
                type_name,
                name,
                init,
            } => write!(f, "{type_name} {name} = {init};"),
            Statement::Assign { target, value } => write!(f, "{target} = {value};"),
            Statement::Expression(expr) => write!(f, "{expr};"),
            Statement::Return(value) => write!(f, "return {value};"),
            Statement::Raw(text) => write!(f, "{text}"),
        }
    }
}

/// Ordered `{token -> replacement}` map applied as literal string replacement.
///
/// Entries are applied in insertion order to each text; a replacement is
/// never rescanned for tokens inserted before it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitutions {
    entries: Vec<(String, String)>,
}

impl Substitutions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(mut self, token: impl Into<String>, replacement: impl Into<String>) -> Self {
        self.entries.push((token.into(), replacement.into()));
        self
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(token, _)| token.as_str())
    }

    pub fn apply(&self, text: &str) -> String {
        self.entries
            .iter()
            .fold(text.to_string(), |acc, (token, replacement)| {
                acc.replace(token.as_str(), replacement)
            })
    }
}
