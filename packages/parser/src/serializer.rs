use crate::ast::{BuiltInType, Property, TypeBoxModel, TypeKind, TypeValue};

/// Render a type expression as declaration-source text.
///
/// Array is special-cased: no arguments renders `any[]`, a single
/// non-union argument renders the `T[]` suffix form, and anything
/// else falls back to the explicit `Array<...>` call form.
pub fn serialize_type(value: &TypeValue) -> String {
    match value {
        TypeValue::Primitive { name } => name.as_str().to_string(),
        TypeValue::Custom { name } => name.clone(),
        TypeValue::Union { members } => {
            let parts: Vec<String> = members.iter().map(serialize_type).collect();
            parts.join(" | ")
        }
        TypeValue::Intersection { members } => {
            let parts: Vec<String> = members.iter().map(serialize_type).collect();
            parts.join(" & ")
        }
        TypeValue::BuiltIn { name, generic_args } => serialize_built_in(*name, generic_args),
    }
}

fn serialize_built_in(name: BuiltInType, generic_args: &[TypeValue]) -> String {
    match name {
        BuiltInType::Array => match generic_args {
            [] => "any[]".to_string(),
            [element] => match element {
                TypeValue::Union { .. } | TypeValue::Intersection { .. } => {
                    format!("({})[]", serialize_type(element))
                }
                _ => format!("{}[]", serialize_type(element)),
            },
            many => {
                let parts: Vec<String> = many.iter().map(serialize_type).collect();
                format!("Array<{}>", parts.join(", "))
            }
        },
        BuiltInType::Tuple => {
            let parts: Vec<String> = generic_args.iter().map(serialize_type).collect();
            format!("[{}]", parts.join(", "))
        }
        BuiltInType::Set => format!("Set<{}>", type_arg(generic_args, 0, "unknown")),
        BuiltInType::Map => format!(
            "Map<{}, {}>",
            type_arg(generic_args, 0, "unknown"),
            type_arg(generic_args, 1, "unknown")
        ),
        BuiltInType::Object => format!(
            "Record<{}, {}>",
            type_arg(generic_args, 0, "string"),
            type_arg(generic_args, 1, "unknown")
        ),
        BuiltInType::Generic => {
            if generic_args.is_empty() {
                "Generic".to_string()
            } else {
                let parts: Vec<String> = generic_args.iter().map(serialize_type).collect();
                format!("Generic<{}>", parts.join(", "))
            }
        }
    }
}

fn type_arg(args: &[TypeValue], index: usize, fallback: &str) -> String {
    args.get(index)
        .map(serialize_type)
        .unwrap_or_else(|| fallback.to_string())
}

/// Render a single property as a standalone line
pub fn serialize_property(property: &Property) -> String {
    format!("{};", serialize_property_inline(property))
}

fn serialize_property_inline(property: &Property) -> String {
    let mut out = String::new();
    if property.readonly {
        out.push_str("readonly ");
    }
    out.push_str(&property.name);
    if property.optional {
        out.push('?');
    }
    out.push_str(": ");
    out.push_str(&serialize_type(&property.type_value));
    out
}

/// Render a full type box declaration with default indentation
pub fn serialize_box(model: &TypeBoxModel) -> String {
    Serializer::new().serialize_box(model)
}

/// Render many boxes as one declaration buffer, blank line between each
pub fn serialize_batch<'a, I>(models: I) -> String
where
    I: IntoIterator<Item = &'a TypeBoxModel>,
{
    let rendered: Vec<String> = models.into_iter().map(serialize_box).collect();
    rendered.join("\n\n")
}

/// Declaration renderer with configurable indentation
pub struct Serializer {
    indent_string: String,
}

impl Serializer {
    pub fn new() -> Self {
        Self {
            indent_string: "  ".to_string(),
        }
    }

    pub fn with_indent(indent: impl Into<String>) -> Self {
        Self {
            indent_string: indent.into(),
        }
    }

    pub fn serialize_box(&self, model: &TypeBoxModel) -> String {
        let mut out = String::new();

        if let Some(comment) = &model.comment {
            out.push_str("/**\n");
            for line in comment.lines() {
                out.push_str(" * ");
                out.push_str(line);
                out.push('\n');
            }
            out.push_str(" */\n");
        }

        match model.kind {
            TypeKind::Interface => self.serialize_interface(model, &mut out),
            TypeKind::Enum => {
                out.push_str("enum ");
                out.push_str(&model.name);
                out.push_str(" {\n}");
            }
            TypeKind::Type | TypeKind::Alias => {
                out.push_str("type ");
                out.push_str(&model.name);
                out.push_str(" = ");
                out.push_str(&self.alias_root(model));
                out.push(';');
            }
        }

        out
    }

    fn serialize_interface(&self, model: &TypeBoxModel, out: &mut String) {
        out.push_str("interface ");
        out.push_str(&model.name);
        if !model.extends.is_empty() {
            out.push_str(" extends ");
            out.push_str(&model.extends.join(", "));
        }
        out.push_str(" {\n");
        for property in &model.properties {
            if let Some(comment) = &property.comment {
                out.push_str(&self.indent_string);
                out.push_str("/** ");
                // A terminator inside the comment text would end the
                // block early
                out.push_str(&comment.replace("*/", "* /"));
                out.push_str(" */\n");
            }
            out.push_str(&self.indent_string);
            out.push_str(&serialize_property(property));
            out.push('\n');
        }
        out.push('}');
    }

    fn alias_root(&self, model: &TypeBoxModel) -> String {
        if !model.union_types.is_empty() {
            return model.union_types.join(" | ");
        }
        if !model.intersection_types.is_empty() {
            return model.intersection_types.join(" & ");
        }
        if !model.properties.is_empty() {
            let members: Vec<String> = model
                .properties
                .iter()
                .map(serialize_property_inline)
                .collect();
            return format!("{{ {}; }}", members.join("; "));
        }
        "unknown".to_string()
    }
}

impl Default for Serializer {
    fn default() -> Self {
        Self::new()
    }
}
