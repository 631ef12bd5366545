//! Type registry: declared type names to concrete type descriptors.
//!
//! The registry is an explicit dependency of the generator. Embedding systems
//! that know about domain classes register them on a [`StandardTypeRegistry`]
//! or provide their own [`TypeRegistry`] implementation.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

/// Value category of a type, used to parse literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataKind {
    Text,
    Integer,
    Long,
    Float,
    Double,
    Boolean,
    /// Any structured or user type; literals are read as JSON.
    Object,
}

/// A resolved type: its category and the canonical name emitted in source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    kind: DataKind,
    type_name: String,
}

/// A literal that could not be read under a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{raw}' is not a valid {type_name} literal")]
pub struct LiteralError {
    pub raw: String,
    pub type_name: String,
}

impl TypeDescriptor {
    pub fn new(kind: DataKind, type_name: impl Into<String>) -> Self {
        Self {
            kind,
            type_name: type_name.into(),
        }
    }

    pub fn text() -> Self {
        Self::new(DataKind::Text, "java.lang.String")
    }

    pub fn integer() -> Self {
        Self::new(DataKind::Integer, "java.lang.Integer")
    }

    pub fn long() -> Self {
        Self::new(DataKind::Long, "java.lang.Long")
    }

    pub fn float() -> Self {
        Self::new(DataKind::Float, "java.lang.Float")
    }

    pub fn double() -> Self {
        Self::new(DataKind::Double, "java.lang.Double")
    }

    pub fn boolean() -> Self {
        Self::new(DataKind::Boolean, "java.lang.Boolean")
    }

    pub fn object() -> Self {
        Self::new(DataKind::Object, "java.lang.Object")
    }

    /// An object-kinded user type (`com.acme.Order`).
    pub fn class(type_name: impl Into<String>) -> Self {
        Self::new(DataKind::Object, type_name)
    }

    pub fn kind(&self) -> DataKind {
        self.kind
    }

    /// Canonical type text used for declarations and casts.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Parse literal text as a value of this type.
    pub fn read_literal(&self, text: &str) -> Result<Value, LiteralError> {
        let fail = || LiteralError {
            raw: text.to_string(),
            type_name: self.type_name.clone(),
        };
        let trimmed = text.trim();
        match self.kind {
            DataKind::Text => Ok(Value::String(text.to_string())),
            DataKind::Integer => trimmed
                .parse::<i32>()
                .map(Value::from)
                .map_err(|_| fail()),
            DataKind::Long => trimmed
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| fail()),
            DataKind::Float | DataKind::Double => {
                let parsed: f64 = if self.kind == DataKind::Float {
                    trimmed.parse::<f32>().map(f64::from).map_err(|_| fail())?
                } else {
                    trimmed.parse::<f64>().map_err(|_| fail())?
                };
                serde_json::Number::from_f64(parsed)
                    .map(Value::Number)
                    .ok_or_else(fail)
            }
            DataKind::Boolean => {
                if trimmed.eq_ignore_ascii_case("true") {
                    Ok(Value::Bool(true))
                } else if trimmed.eq_ignore_ascii_case("false") {
                    Ok(Value::Bool(false))
                } else {
                    Err(fail())
                }
            }
            DataKind::Object => Ok(serde_json::from_str(trimmed)
                .unwrap_or_else(|_| Value::String(text.to_string()))),
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name)
    }
}

/// Resolves declared type names and infers types of runtime values.
///
/// Implementations must support concurrent read-only lookups.
pub trait TypeRegistry: Send + Sync + fmt::Debug {
    /// Resolve a declared type name. `None` means the name is unknown.
    fn resolve(&self, type_name: &str) -> Option<TypeDescriptor>;

    /// Infer the type of a static work parameter value.
    fn from_runtime_value(&self, value: &Value) -> TypeDescriptor;
}

/// Registry of the built-in scalar and collection types plus registered
/// user classes.
#[derive(Debug, Clone, Default)]
pub struct StandardTypeRegistry {
    custom: HashMap<String, TypeDescriptor>,
}

impl StandardTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user type under its own name.
    pub fn register_class(&mut self, type_name: impl Into<String>) -> &mut Self {
        let type_name = type_name.into();
        self.custom
            .insert(type_name.clone(), TypeDescriptor::class(type_name));
        self
    }

    /// Register an alias resolving to an explicit descriptor.
    pub fn register(&mut self, alias: impl Into<String>, descriptor: TypeDescriptor) -> &mut Self {
        self.custom.insert(alias.into(), descriptor);
        self
    }

    fn builtin(type_name: &str) -> Option<TypeDescriptor> {
        let descriptor = match type_name {
            "" | "Object" | "java.lang.Object" => TypeDescriptor::object(),
            "String" | "java.lang.String" => TypeDescriptor::text(),
            "Integer" | "int" | "java.lang.Integer" => TypeDescriptor::integer(),
            "Long" | "long" | "java.lang.Long" => TypeDescriptor::long(),
            "Float" | "float" | "java.lang.Float" => TypeDescriptor::float(),
            "Double" | "double" | "java.lang.Double" => TypeDescriptor::double(),
            "Boolean" | "boolean" | "java.lang.Boolean" => TypeDescriptor::boolean(),
            "java.util.List" | "java.util.Map" | "java.util.Date" => {
                TypeDescriptor::class(type_name)
            }
            _ => return None,
        };
        Some(descriptor)
    }
}

impl TypeRegistry for StandardTypeRegistry {
    fn resolve(&self, type_name: &str) -> Option<TypeDescriptor> {
        let type_name = type_name.trim();
        Self::builtin(type_name).or_else(|| self.custom.get(type_name).cloned())
    }

    fn from_runtime_value(&self, value: &Value) -> TypeDescriptor {
        match value {
            Value::String(_) => TypeDescriptor::text(),
            Value::Bool(_) => TypeDescriptor::boolean(),
            Value::Number(n) => match n.as_i64() {
                Some(i) if i32::try_from(i).is_ok() => TypeDescriptor::integer(),
                Some(_) => TypeDescriptor::long(),
                None if n.is_u64() => TypeDescriptor::long(),
                None => TypeDescriptor::double(),
            },
            Value::Array(_) => TypeDescriptor::class("java.util.List"),
            Value::Object(_) => TypeDescriptor::class("java.util.Map"),
            Value::Null => TypeDescriptor::object(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolves_simple_and_canonical_names() {
        let registry = StandardTypeRegistry::new();
        assert_eq!(registry.resolve("Double"), Some(TypeDescriptor::double()));
        assert_eq!(
            registry.resolve("java.lang.String"),
            Some(TypeDescriptor::text())
        );
        assert_eq!(registry.resolve("int"), Some(TypeDescriptor::integer()));
        assert_eq!(registry.resolve(""), Some(TypeDescriptor::object()));
        assert_eq!(registry.resolve("com.acme.Order"), None);
    }

    #[test]
    fn test_registered_classes_resolve() {
        let mut registry = StandardTypeRegistry::new();
        registry
            .register_class("com.acme.Order")
            .register("Amount", TypeDescriptor::double());
        let order = registry.resolve("com.acme.Order").unwrap();
        assert_eq!(order.kind(), DataKind::Object);
        assert_eq!(order.type_name(), "com.acme.Order");
        assert_eq!(registry.resolve("Amount"), Some(TypeDescriptor::double()));
    }

    #[test]
    fn test_read_literal_per_kind() {
        assert_eq!(
            TypeDescriptor::text().read_literal(" hi ").unwrap(),
            json!(" hi ")
        );
        assert_eq!(TypeDescriptor::integer().read_literal("42").unwrap(), json!(42));
        assert_eq!(
            TypeDescriptor::long().read_literal("9000000000").unwrap(),
            json!(9_000_000_000i64)
        );
        assert_eq!(
            TypeDescriptor::double().read_literal("2.5").unwrap(),
            json!(2.5)
        );
        assert_eq!(
            TypeDescriptor::boolean().read_literal("TRUE").unwrap(),
            json!(true)
        );
        assert_eq!(
            TypeDescriptor::object().read_literal("{\"a\": 1}").unwrap(),
            json!({"a": 1})
        );
        assert_eq!(
            TypeDescriptor::object().read_literal("plain words").unwrap(),
            json!("plain words")
        );
    }

    #[test]
    fn test_read_literal_failures() {
        let err = TypeDescriptor::integer().read_literal("4.2").unwrap_err();
        assert_eq!(err.raw, "4.2");
        assert_eq!(err.type_name, "java.lang.Integer");
        assert!(TypeDescriptor::integer().read_literal("3000000000").is_err());
        assert!(TypeDescriptor::boolean().read_literal("yes").is_err());
        assert!(TypeDescriptor::double().read_literal("NaN").is_err());
    }

    #[test]
    fn test_from_runtime_value() {
        let registry = StandardTypeRegistry::new();
        assert_eq!(
            registry.from_runtime_value(&json!(5)),
            TypeDescriptor::integer()
        );
        assert_eq!(
            registry.from_runtime_value(&json!(5_000_000_000i64)),
            TypeDescriptor::long()
        );
        assert_eq!(
            registry.from_runtime_value(&json!(0.5)),
            TypeDescriptor::double()
        );
        assert_eq!(
            registry.from_runtime_value(&json!("x")),
            TypeDescriptor::text()
        );
        assert_eq!(
            registry.from_runtime_value(&json!([1, 2])).type_name(),
            "java.util.List"
        );
        assert_eq!(
            registry.from_runtime_value(&json!({"k": "v"})).type_name(),
            "java.util.Map"
        );
    }

    #[test]
    fn test_registry_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StandardTypeRegistry>();
    }
}
