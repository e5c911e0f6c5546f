use crate::ast::{BuiltInType, PrimitiveType, Property, TypeBoxModel, TypeKind, TypeValue};
use crate::error::{ParseError, ParseResult};
use crate::id_generator::IdGenerator;
use crate::tokenizer::{tokenize, Token};

/// Split `src` at top-level occurrences of `delimiter`, respecting
/// `<`/`(`/`[` nesting. Empty segments before a delimiter are kept so
/// callers see exactly one slot per delimiter.
pub fn split_top_level(src: &str, delimiter: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth: usize = 0;
    let mut token = String::new();
    for ch in src.chars() {
        match ch {
            '<' | '(' | '[' => depth += 1,
            '>' | ')' | ']' => depth = depth.saturating_sub(1),
            _ => {}
        }
        if ch == delimiter && depth == 0 {
            parts.push(token.trim().to_string());
            token.clear();
            continue;
        }
        token.push(ch);
    }
    if !token.trim().is_empty() {
        parts.push(token.trim().to_string());
    }
    parts
}

/// Comma variant of [`split_top_level`]; empty segments are dropped
fn split_top_level_commas(src: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth: usize = 0;
    let mut current = String::new();
    for ch in src.chars() {
        match ch {
            '<' | '(' | '[' => depth += 1,
            '>' | ')' | ']' => depth = depth.saturating_sub(1),
            _ => {}
        }
        if ch == ',' && depth == 0 {
            parts.push(current.trim().to_string());
            current.clear();
            continue;
        }
        current.push(ch);
    }
    if !current.trim().is_empty() {
        parts.push(current.trim().to_string());
    }
    parts.retain(|part| !part.is_empty());
    parts
}

/// Parse a type-expression string into a [`TypeValue`]. Total: every
/// input maps to some value, unrecognized text becomes a custom
/// reference.
pub fn parse_type(raw: &str) -> TypeValue {
    let src = raw.trim();
    if src.is_empty() {
        return TypeValue::primitive(PrimitiveType::Any);
    }

    // Array suffix notation, possibly stacked: number[][]
    if src.ends_with("[]") {
        let mut base = src;
        let mut levels = 0;
        while let Some(stripped) = base.strip_suffix("[]") {
            base = stripped;
            levels += 1;
        }
        let mut node = parse_type(base);
        for _ in 0..levels {
            node = TypeValue::array_of(node);
        }
        return node;
    }

    // Tuple literal: [A, B]
    if let Some(inner) = src.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        let args = split_top_level_commas(inner)
            .iter()
            .map(|element| parse_type(element))
            .collect();
        return TypeValue::built_in(BuiltInType::Tuple, args);
    }

    // Union binds looser than intersection
    if src.contains('|') {
        let parts = split_top_level(src, '|');
        if parts.len() > 1 {
            return TypeValue::union(parts.iter().map(|part| parse_type(part)).collect());
        }
    }
    if src.contains('&') {
        let parts = split_top_level(src, '&');
        if parts.len() > 1 {
            return TypeValue::intersection(parts.iter().map(|part| parse_type(part)).collect());
        }
    }

    // Generic call: Name<...>
    if let Some(lt) = src.find('<') {
        if src.ends_with('>') && lt + 1 < src.len() - 1 {
            let name = &src[..lt];
            let inner = &src[lt + 1..src.len() - 1];
            if is_identifier(name) {
                return generic_call(name, inner);
            }
        }
    }

    if let Some(primitive) = PrimitiveType::from_name(src) {
        return TypeValue::primitive(primitive);
    }

    // Bare built-in heads; arguments are filled in at render time
    if src == "Object" {
        return TypeValue::built_in(BuiltInType::Object, vec![]);
    }
    if src == "Map" {
        return TypeValue::built_in(BuiltInType::Map, vec![]);
    }

    TypeValue::custom(src)
}

fn generic_call(name: &str, inner: &str) -> TypeValue {
    let mut args: Vec<TypeValue> = split_top_level_commas(inner)
        .iter()
        .map(|arg| parse_type(arg))
        .collect();
    match name {
        "Array" => {
            args.truncate(1);
            TypeValue::built_in(BuiltInType::Array, args)
        }
        "Set" => {
            args.truncate(1);
            TypeValue::built_in(BuiltInType::Set, args)
        }
        "Map" => {
            let mut iter = args.into_iter();
            let key = iter
                .next()
                .unwrap_or_else(|| TypeValue::primitive(PrimitiveType::Unknown));
            let value = iter
                .next()
                .unwrap_or_else(|| TypeValue::primitive(PrimitiveType::Unknown));
            TypeValue::built_in(BuiltInType::Map, vec![key, value])
        }
        "Record" => {
            let mut iter = args.into_iter();
            let key = iter
                .next()
                .unwrap_or_else(|| TypeValue::primitive(PrimitiveType::String));
            let value = iter
                .next()
                .unwrap_or_else(|| TypeValue::primitive(PrimitiveType::Unknown));
            TypeValue::built_in(BuiltInType::Object, vec![key, value])
        }
        "Tuple" => TypeValue::built_in(BuiltInType::Tuple, args),
        // Unrecognized generic roots collapse to a bare custom
        // reference; the arguments are not modeled
        _ => TypeValue::custom(name),
    }
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {
            chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '$')
        }
        _ => false,
    }
}

/// Declaration parser. Owns the id generator that mints ids for the
/// box and property skeletons it produces.
pub struct Parser {
    ids: IdGenerator,
}

impl Parser {
    pub fn new(ids: IdGenerator) -> Self {
        Self { ids }
    }

    /// Parse one member line of shape `[readonly] name[?]: type;`.
    /// Method signatures, index signatures, and anything else that is
    /// not a plain member return `None`.
    pub fn parse_property_line(&mut self, line: &str) -> Option<Property> {
        let trimmed = line.trim();
        let trimmed = trimmed.strip_suffix(';').unwrap_or(trimmed);
        if trimmed.is_empty() {
            return None;
        }

        let tokens = tokenize(trimmed);
        let (first, first_span) = tokens.first()?;
        if first_span.start != 0 {
            return None;
        }

        let mut index = 0;
        let mut readonly = false;
        // `readonly` is a modifier only when a member name follows;
        // `readonly: string` is a member named readonly
        if *first == Token::Readonly
            && tokens
                .get(1)
                .map_or(false, |(token, _)| token.ident_text().is_some())
        {
            readonly = true;
            index = 1;
        }

        let name = tokens.get(index).and_then(|(token, _)| token.ident_text())?;
        index += 1;

        let mut optional = false;
        if matches!(tokens.get(index), Some((Token::Question, _))) {
            optional = true;
            index += 1;
        }

        let colon = match tokens.get(index) {
            Some((Token::Colon, span)) => span.clone(),
            _ => return None,
        };

        let type_text = trimmed[colon.end..].trim();
        if type_text.is_empty() {
            return None;
        }

        let mut property = Property::new(self.ids.new_id(), name, parse_type(type_text));
        property.optional = optional;
        property.readonly = readonly;
        Some(property)
    }

    /// Parse one `interface` or `type` declaration into a box
    /// skeleton. Skeletons carry fresh ids and a zeroed position; the
    /// store assigns the final id and placement on insertion.
    pub fn parse_box(&mut self, source: &str) -> ParseResult<TypeBoxModel> {
        let trimmed = source.trim();
        if trimmed.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        let (comment, body) = split_leading_comment(trimmed);
        let tokens = tokenize(body);
        match tokens.first() {
            Some((Token::Interface, span)) if span.start == 0 => {
                self.parse_interface(body, &tokens, comment)
            }
            Some((Token::Type, span)) if span.start == 0 => {
                self.parse_alias(body, &tokens, comment)
            }
            _ => Err(ParseError::UnsupportedDeclaration),
        }
    }

    fn parse_interface(
        &mut self,
        body: &str,
        tokens: &[(Token, std::ops::Range<usize>)],
        comment: Option<String>,
    ) -> ParseResult<TypeBoxModel> {
        let name = tokens
            .get(1)
            .and_then(|(token, _)| token.ident_text())
            .ok_or_else(|| ParseError::malformed("interface", "missing name"))?;

        let mut index = 2;
        let mut extends = Vec::new();
        if matches!(tokens.get(index), Some((Token::Extends, _))) {
            index += 1;
            while let Some((token, _)) = tokens.get(index) {
                match token.ident_text() {
                    Some(base) => {
                        extends.push(base.to_string());
                        index += 1;
                        if matches!(tokens.get(index), Some((Token::Comma, _))) {
                            index += 1;
                        }
                    }
                    None => break,
                }
            }
            if extends.is_empty() {
                return Err(ParseError::malformed("interface", "empty extends clause"));
            }
        }

        let lbrace = match tokens.get(index) {
            Some((Token::LBrace, span)) => span.clone(),
            _ => return Err(ParseError::malformed("interface", "expected `{` to open the body")),
        };
        if !body.ends_with('}') {
            return Err(ParseError::malformed("interface", "missing closing `}`"));
        }

        let interior = &body[lbrace.end..body.len() - 1];
        let mut model = TypeBoxModel::new(self.ids.new_id(), name, TypeKind::Interface);
        model.extends = extends;
        model.properties = self.parse_property_block(interior);
        model.comment = comment;
        Ok(model)
    }

    fn parse_alias(
        &mut self,
        body: &str,
        tokens: &[(Token, std::ops::Range<usize>)],
        comment: Option<String>,
    ) -> ParseResult<TypeBoxModel> {
        let name = tokens
            .get(1)
            .and_then(|(token, _)| token.ident_text())
            .ok_or_else(|| ParseError::malformed("type", "missing name"))?;

        let equals = match tokens.get(2) {
            Some((Token::Equals, span)) => span.clone(),
            _ => return Err(ParseError::malformed("type", "expected `=` after the name")),
        };

        let rhs = body[equals.end..].trim();
        let rhs = rhs.strip_suffix(';').unwrap_or(rhs).trim_end();
        if rhs.is_empty() {
            return Err(ParseError::malformed("type", "empty right-hand side"));
        }

        let mut model = TypeBoxModel::new(self.ids.new_id(), name, TypeKind::Type);
        model.comment = comment;
        if let Some(interior) = rhs.strip_prefix('{').and_then(|r| r.strip_suffix('}')) {
            model.properties = self.parse_property_block(interior);
        } else if rhs.contains('|') {
            model.union_types = split_top_level(rhs, '|');
        } else if rhs.contains('&') {
            model.intersection_types = split_top_level(rhs, '&');
        }
        Ok(model)
    }

    /// Parse the member lines of an interface or object-literal body.
    /// A standalone `/** ... */` line attaches to the next member that
    /// parses; unparseable lines are skipped.
    fn parse_property_block(&mut self, body: &str) -> Vec<Property> {
        let mut properties = Vec::new();
        let mut pending_comment: Option<String> = None;
        for raw_line in body.lines() {
            let line = strip_line_comment(raw_line).trim();
            if line.is_empty() {
                continue;
            }
            if line.starts_with("/**") && line.ends_with("*/") {
                let (comment, rest) = split_leading_comment(line);
                if rest.is_empty() {
                    pending_comment = comment;
                    continue;
                }
            }
            match self.parse_property_line(line) {
                Some(mut property) => {
                    property.comment = pending_comment.take();
                    properties.push(property);
                }
                None => {
                    pending_comment = None;
                }
            }
        }
        properties
    }

    /// Parse a whole declaration buffer, best effort. Blocks that do
    /// not parse are skipped; callers only see the successes.
    pub fn parse_buffer(&mut self, buffer: &str) -> Vec<TypeBoxModel> {
        let mut models = Vec::new();
        for block in split_declarations(buffer) {
            match self.parse_box(&block) {
                Ok(model) => models.push(model),
                Err(error) => {
                    tracing::debug!(
                        %error,
                        block = %block.lines().next().unwrap_or(""),
                        "skipping unparseable declaration block"
                    );
                }
            }
        }
        models
    }
}

/// Split a buffer into declaration blocks. A line whose first tokens
/// are `interface`/`type` plus a name starts a new block; a post-pass
/// re-attaches blocks whose trailing doc comment is still open so
/// leading comments stay with their declaration.
pub fn split_declarations(buffer: &str) -> Vec<String> {
    let mut blocks: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in buffer.lines() {
        if starts_declaration(line) && !current.is_empty() {
            push_block(&mut blocks, &current);
            current.clear();
        }
        current.push(line);
    }
    push_block(&mut blocks, &current);

    let mut index = 0;
    while index + 1 < blocks.len() {
        if has_open_doc_comment(&blocks[index]) {
            let next = blocks.remove(index + 1);
            let merged = format!("{}\n{}", blocks[index], next);
            blocks[index] = merged;
        } else {
            index += 1;
        }
    }
    blocks
}

fn push_block(blocks: &mut Vec<String>, lines: &[&str]) {
    let block = lines.join("\n");
    let block = block.trim();
    if !block.is_empty() {
        blocks.push(block.to_string());
    }
}

fn starts_declaration(line: &str) -> bool {
    let leading = line.len() - line.trim_start().len();
    let tokens = tokenize(line);
    match (tokens.first(), tokens.get(1)) {
        (Some((Token::Interface | Token::Type, span)), Some((second, _))) => {
            span.start == leading && second.ident_text().is_some()
        }
        _ => false,
    }
}

fn has_open_doc_comment(block: &str) -> bool {
    match block.rfind("/**") {
        Some(position) => !block[position + 3..].contains("*/"),
        None => false,
    }
}

/// Split a leading `/** ... */` block off the front of a declaration.
/// Returns the dedented comment text (if any) and the remaining text.
fn split_leading_comment(source: &str) -> (Option<String>, &str) {
    if !source.starts_with("/**") {
        return (None, source);
    }
    let Some(end) = source[3..].find("*/") else {
        return (None, source);
    };
    let interior = &source[3..3 + end];
    let rest = source[3 + end + 2..].trim_start();
    (dedent_comment(interior), rest)
}

fn dedent_comment(interior: &str) -> Option<String> {
    let lines: Vec<&str> = interior
        .lines()
        .map(|line| {
            let stripped = line.trim_start();
            match stripped.strip_prefix('*') {
                Some(rest) => rest.strip_prefix(' ').unwrap_or(rest),
                None => line,
            }
        })
        .collect();
    let text = lines.join("\n");
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

fn strip_line_comment(line: &str) -> &str {
    match line.find("//") {
        Some(position) => &line[..position],
        None => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> Parser {
        Parser::new(IdGenerator::new("test"))
    }

    #[test]
    fn test_split_top_level_respects_nesting() {
        assert_eq!(
            split_top_level("Array<A, B> | C", '|'),
            vec!["Array<A, B>".to_string(), "C".to_string()]
        );
        assert_eq!(
            split_top_level("A | Array<B | C>", '|'),
            vec!["A".to_string(), "Array<B | C>".to_string()]
        );
        assert_eq!(
            split_top_level_commas("Array<A, B>, C"),
            vec!["Array<A, B>".to_string(), "C".to_string()]
        );
    }

    #[test]
    fn test_split_top_level_keeps_empty_slots() {
        assert_eq!(
            split_top_level("| A", '|'),
            vec!["".to_string(), "A".to_string()]
        );
        assert!(split_top_level_commas(", A").len() == 1);
    }

    #[test]
    fn test_parse_type_empty_and_fallback() {
        assert_eq!(parse_type(""), TypeValue::primitive(PrimitiveType::Any));
        assert_eq!(parse_type("  "), TypeValue::primitive(PrimitiveType::Any));
        assert_eq!(parse_type("UserProfile"), TypeValue::custom("UserProfile"));
    }

    #[test]
    fn test_parse_type_array_suffix_stacking() {
        assert_eq!(
            parse_type("number[][]"),
            TypeValue::array_of(TypeValue::array_of(TypeValue::primitive(
                PrimitiveType::Number
            )))
        );
        // Bare [] is an array of any, not an empty tuple
        assert_eq!(
            parse_type("[]"),
            TypeValue::array_of(TypeValue::primitive(PrimitiveType::Any))
        );
        assert_eq!(
            parse_type("[ ]"),
            TypeValue::built_in(BuiltInType::Tuple, vec![])
        );
    }

    #[test]
    fn test_parse_type_tuple_literal() {
        assert_eq!(
            parse_type("[string, number]"),
            TypeValue::built_in(
                BuiltInType::Tuple,
                vec![
                    TypeValue::primitive(PrimitiveType::String),
                    TypeValue::primitive(PrimitiveType::Number),
                ]
            )
        );
    }

    #[test]
    fn test_parse_type_union_and_intersection() {
        assert_eq!(
            parse_type("string | null"),
            TypeValue::union(vec![
                TypeValue::primitive(PrimitiveType::String),
                TypeValue::primitive(PrimitiveType::Null),
            ])
        );
        assert_eq!(
            parse_type("A & B"),
            TypeValue::intersection(vec![TypeValue::custom("A"), TypeValue::custom("B")])
        );
        // Nested delimiters do not split
        assert_eq!(
            parse_type("Array<A | B>"),
            TypeValue::built_in(
                BuiltInType::Array,
                vec![TypeValue::union(vec![
                    TypeValue::custom("A"),
                    TypeValue::custom("B"),
                ])]
            )
        );
    }

    #[test]
    fn test_parse_type_generic_dispatch() {
        assert_eq!(
            parse_type("Map<string, Set<number>>"),
            TypeValue::built_in(
                BuiltInType::Map,
                vec![
                    TypeValue::primitive(PrimitiveType::String),
                    TypeValue::built_in(
                        BuiltInType::Set,
                        vec![TypeValue::primitive(PrimitiveType::Number)]
                    ),
                ]
            )
        );
        assert_eq!(
            parse_type("Record<string, number>"),
            TypeValue::built_in(
                BuiltInType::Object,
                vec![
                    TypeValue::primitive(PrimitiveType::String),
                    TypeValue::primitive(PrimitiveType::Number),
                ]
            )
        );
        assert_eq!(
            parse_type("Map<string>"),
            TypeValue::built_in(
                BuiltInType::Map,
                vec![
                    TypeValue::primitive(PrimitiveType::String),
                    TypeValue::primitive(PrimitiveType::Unknown),
                ]
            )
        );
    }

    #[test]
    fn test_parse_type_unknown_generic_root_is_lossy() {
        assert_eq!(parse_type("Foo<Bar>"), TypeValue::custom("Foo"));
        assert_eq!(parse_type("Promise<string>"), TypeValue::custom("Promise"));
    }

    #[test]
    fn test_parse_type_bare_built_ins() {
        assert_eq!(
            parse_type("Object"),
            TypeValue::built_in(BuiltInType::Object, vec![])
        );
        assert_eq!(
            parse_type("Map"),
            TypeValue::built_in(BuiltInType::Map, vec![])
        );
    }

    #[test]
    fn test_parse_property_line_modifiers() {
        let mut p = parser();
        let property = p.parse_property_line("readonly tags?: string[];").unwrap();
        assert_eq!(property.name, "tags");
        assert!(property.readonly);
        assert!(property.optional);
        assert_eq!(
            property.type_value,
            TypeValue::array_of(TypeValue::primitive(PrimitiveType::String))
        );
    }

    #[test]
    fn test_parse_property_line_keyword_names() {
        let mut p = parser();
        let property = p.parse_property_line("type: string").unwrap();
        assert_eq!(property.name, "type");

        let property = p.parse_property_line("readonly: string").unwrap();
        assert_eq!(property.name, "readonly");
        assert!(!property.readonly);
    }

    #[test]
    fn test_parse_property_line_rejects_non_members() {
        let mut p = parser();
        assert_eq!(p.parse_property_line("foo(): void;"), None);
        assert_eq!(p.parse_property_line("[key: string]: any;"), None);
        assert_eq!(p.parse_property_line("- junk: string"), None);
        assert_eq!(p.parse_property_line("name"), None);
        assert_eq!(p.parse_property_line(""), None);
    }

    #[test]
    fn test_parse_box_interface() {
        let mut p = parser();
        let model = p
            .parse_box(
                "/** A registered person. */\ninterface Person extends Base, Audit {\n  id: string;\n  name?: string; // display name\n  tags: string[];\n}",
            )
            .unwrap();

        assert_eq!(model.name, "Person");
        assert_eq!(model.kind, TypeKind::Interface);
        assert_eq!(model.extends, vec!["Base".to_string(), "Audit".to_string()]);
        assert_eq!(model.comment.as_deref(), Some("A registered person."));
        assert_eq!(model.properties.len(), 3);
        assert!(model.properties[1].optional);
        assert_eq!(model.position, crate::ast::Position::default());
    }

    #[test]
    fn test_parse_box_inline_property_comment() {
        let mut p = parser();
        let model = p
            .parse_box("interface User {\n  /** Stable identifier */\n  id: string;\n}")
            .unwrap();
        assert_eq!(
            model.properties[0].comment.as_deref(),
            Some("Stable identifier")
        );
    }

    #[test]
    fn test_parse_box_alias_forms() {
        let mut p = parser();

        let union = p.parse_box("type Id = string | number;").unwrap();
        assert_eq!(union.kind, TypeKind::Type);
        assert_eq!(
            union.union_types,
            vec!["string".to_string(), "number".to_string()]
        );

        let intersection = p.parse_box("type Both = A & B").unwrap();
        assert_eq!(
            intersection.intersection_types,
            vec!["A".to_string(), "B".to_string()]
        );

        let object = p.parse_box("type Point = {\n x: number;\n y: number;\n}").unwrap();
        assert_eq!(object.properties.len(), 2);
        assert!(object.union_types.is_empty());

        let reference = p.parse_box("type Alias = Something").unwrap();
        assert!(reference.properties.is_empty());
        assert!(reference.union_types.is_empty());
        assert!(reference.intersection_types.is_empty());
    }

    #[test]
    fn test_parse_box_rejections() {
        let mut p = parser();
        assert_eq!(p.parse_box("   "), Err(ParseError::EmptyInput));
        assert_eq!(
            p.parse_box("enum Color { Red }"),
            Err(ParseError::UnsupportedDeclaration)
        );
        assert_eq!(
            p.parse_box("const x = 1;"),
            Err(ParseError::UnsupportedDeclaration)
        );
        assert!(matches!(
            p.parse_box("type Bad = ;"),
            Err(ParseError::MalformedDeclaration { kind: "type", .. })
        ));
        assert!(matches!(
            p.parse_box("interface Broken { id: string;"),
            Err(ParseError::MalformedDeclaration { kind: "interface", .. })
        ));
    }

    #[test]
    fn test_split_declarations_basic() {
        let buffer = "interface A {\n  id: string;\n}\n\ntype B = string | null;\n";
        let blocks = split_declarations(buffer);
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].starts_with("interface A"));
        assert!(blocks[1].starts_with("type B"));
    }

    #[test]
    fn test_split_declarations_merges_open_doc_comment() {
        let buffer = "type A = X;\n/** pending note\ntype B = Y;";
        let blocks = split_declarations(buffer);
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].contains("type B"));
    }

    #[test]
    fn test_split_declarations_terminated_comment_stays_separate() {
        // A closed comment block severed from its declaration is its
        // own block; the batch path later drops it as a no-match
        let buffer = "/**\n * Orphan.\n */\ninterface A {}";
        let blocks = split_declarations(buffer);
        assert_eq!(blocks.len(), 2);
        assert!(blocks[1].starts_with("interface A"));
    }

    #[test]
    fn test_split_declarations_ignores_keyword_inside_comment_line() {
        // A comment line mentioning `interface` does not open a new
        // block
        let buffer = "interface Real {\n  /** interface Fake */\n  id: string;\n}";
        let blocks = split_declarations(buffer);
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].contains("interface Real"));
    }

    #[test]
    fn test_parse_buffer_skips_bad_blocks() {
        let mut p = parser();
        let models = p.parse_buffer("interface Foo { a: string; }\n\ntype Bad = ;\n");
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].name, "Foo");
    }
}
