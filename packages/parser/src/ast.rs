use serde::{Deserialize, Serialize};

/// Closed set of primitive type names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    String,
    Number,
    Boolean,
    Null,
    Undefined,
    Any,
    Unknown,
}

impl PrimitiveType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveType::String => "string",
            PrimitiveType::Number => "number",
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Null => "null",
            PrimitiveType::Undefined => "undefined",
            PrimitiveType::Any => "any",
            PrimitiveType::Unknown => "unknown",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(PrimitiveType::String),
            "number" => Some(PrimitiveType::Number),
            "boolean" => Some(PrimitiveType::Boolean),
            "null" => Some(PrimitiveType::Null),
            "undefined" => Some(PrimitiveType::Undefined),
            "any" => Some(PrimitiveType::Any),
            "unknown" => Some(PrimitiveType::Unknown),
            _ => None,
        }
    }
}

/// Built-in container type heads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuiltInType {
    Array,
    Tuple,
    Set,
    Map,
    Object,
    Generic,
}

impl BuiltInType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuiltInType::Array => "Array",
            BuiltInType::Tuple => "Tuple",
            BuiltInType::Set => "Set",
            BuiltInType::Map => "Map",
            BuiltInType::Object => "Object",
            BuiltInType::Generic => "Generic",
        }
    }
}

/// Declaration kind of a type box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Interface,
    Type,
    Enum,
    Alias,
}

impl TypeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKind::Interface => "interface",
            TypeKind::Type => "type",
            TypeKind::Enum => "enum",
            TypeKind::Alias => "alias",
        }
    }
}

impl Default for TypeKind {
    fn default() -> Self {
        TypeKind::Type
    }
}

/// A structured type expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TypeValue {
    Primitive {
        name: PrimitiveType,
    },
    Custom {
        name: String,
    },
    Union {
        members: Vec<TypeValue>,
    },
    Intersection {
        members: Vec<TypeValue>,
    },
    #[serde(rename_all = "camelCase")]
    BuiltIn {
        name: BuiltInType,
        generic_args: Vec<TypeValue>,
    },
}

impl TypeValue {
    pub fn primitive(name: PrimitiveType) -> Self {
        TypeValue::Primitive { name }
    }

    pub fn custom(name: impl Into<String>) -> Self {
        TypeValue::Custom { name: name.into() }
    }

    pub fn union(members: Vec<TypeValue>) -> Self {
        TypeValue::Union { members }
    }

    pub fn intersection(members: Vec<TypeValue>) -> Self {
        TypeValue::Intersection { members }
    }

    pub fn built_in(name: BuiltInType, generic_args: Vec<TypeValue>) -> Self {
        TypeValue::BuiltIn { name, generic_args }
    }

    pub fn array_of(element: TypeValue) -> Self {
        TypeValue::built_in(BuiltInType::Array, vec![element])
    }

    /// Render the compact display label for this type
    pub fn label(&self) -> String {
        match self {
            TypeValue::Primitive { name } => name.as_str().to_string(),
            TypeValue::Custom { name } => name.clone(),
            TypeValue::Union { members } => {
                let parts: Vec<String> = members.iter().map(|m| m.label()).collect();
                parts.join(" | ")
            }
            TypeValue::Intersection { members } => {
                let parts: Vec<String> = members.iter().map(|m| m.label()).collect();
                parts.join(" & ")
            }
            TypeValue::BuiltIn { name, generic_args } => match name {
                BuiltInType::Array => match generic_args.as_slice() {
                    [] => "any[]".to_string(),
                    [element] => match element {
                        TypeValue::Union { .. } | TypeValue::Intersection { .. } => {
                            format!("({})[]", element.label())
                        }
                        _ => format!("{}[]", element.label()),
                    },
                    many => {
                        let parts: Vec<String> = many.iter().map(|m| m.label()).collect();
                        format!("({})[]", parts.join(" | "))
                    }
                },
                BuiltInType::Tuple => {
                    let parts: Vec<String> = generic_args.iter().map(|m| m.label()).collect();
                    format!("[{}]", parts.join(", "))
                }
                BuiltInType::Set => {
                    format!("Set<{}>", arg_or(generic_args, 0, "unknown"))
                }
                BuiltInType::Map => format!(
                    "Map<{}, {}>",
                    arg_or(generic_args, 0, "unknown"),
                    arg_or(generic_args, 1, "unknown")
                ),
                BuiltInType::Object => format!(
                    "Record<{}, {}>",
                    arg_or(generic_args, 0, "string"),
                    arg_or(generic_args, 1, "unknown")
                ),
                BuiltInType::Generic => {
                    if generic_args.is_empty() {
                        "Generic".to_string()
                    } else {
                        let parts: Vec<String> =
                            generic_args.iter().map(|m| m.label()).collect();
                        format!("Generic<{}>", parts.join(", "))
                    }
                }
            },
        }
    }
}

fn arg_or(args: &[TypeValue], index: usize, fallback: &str) -> String {
    args.get(index)
        .map(|arg| arg.label())
        .unwrap_or_else(|| fallback.to_string())
}

/// A named member of a type box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub type_value: TypeValue,
    pub optional: bool,
    pub readonly: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Property {
    pub fn new(id: impl Into<String>, name: impl Into<String>, type_value: TypeValue) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            type_value,
            optional: false,
            readonly: false,
            comment: None,
        }
    }
}

/// Canvas coordinates of a type box
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A single type declaration on the canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeBoxModel {
    pub id: String,
    pub name: String,
    pub kind: TypeKind,
    pub properties: Vec<Property>,
    pub position: Position,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extends: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub union_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub intersection_types: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl TypeBoxModel {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: TypeKind) -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            properties: Vec::new(),
            position: Position::default(),
            extends: Vec::new(),
            union_types: Vec::new(),
            intersection_types: Vec::new(),
            comment: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().timestamp_millis();
    }
}
