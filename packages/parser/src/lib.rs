//! Data model, parser, and serializer for typed-schema declaration
//! text. The parser turns pasted `interface`/`type` declarations into
//! box skeletons; the serializer renders box models back into the
//! same syntax subset.

pub mod ast;
pub mod error;
pub mod id_generator;
pub mod parser;
pub mod serializer;
pub mod tokenizer;

pub use ast::{
    BuiltInType, Position, PrimitiveType, Property, TypeBoxModel, TypeKind, TypeValue,
};
pub use error::{ParseError, ParseResult};
pub use id_generator::{graph_seed, IdGenerator};
pub use parser::{parse_type, split_declarations, split_top_level, Parser};
pub use serializer::{
    serialize_batch, serialize_box, serialize_property, serialize_type, Serializer,
};
