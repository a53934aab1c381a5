//! Parser for attribute metadata definition files.
//!
//! A definition file lists object types and, per object type, the attributes
//! it carries together with their value kind:
//!
//! ```text
//! /* Port attributes */
//! object SAI_OBJECT_TYPE_PORT = 1 {
//!     attribute SAI_PORT_ATTR_SPEED = 3 : SAI_ATTR_VALUE_TYPE_UINT32;
//!     attribute SAI_PORT_ATTR_ADMIN_STATE = 0x1f : BOOL; // prefix is optional
//! }
//! ```

use std::path::{Path, PathBuf};

use miette::{Diagnostic, NamedSource, SourceSpan};
use nom::{
    branch::alt,
    bytes::complete::{is_not, tag, tag_no_case, take_until, take_while, take_while1},
    character::complete::{digit1, hex_digit1, multispace1},
    combinator::{map, opt, recognize, value},
    error::{ErrorKind, ParseError as NomParseError},
    multi::{many0, many1},
    sequence::{pair, tuple},
    IResult, Parser,
};
use nom_greedyerror::GreedyError;
use nom_locate::LocatedSpan;
use nom_supreme::ParserExt;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{AttrId, AttrMetadata, ObjectType, Registry, ValueKind};

type Span<'a> = LocatedSpan<&'a str>;
type ParseError<'a> = GreedyError<Span<'a>, ErrorKind>;

/// Fetch the deepest location of an error within an error type
pub trait DeepestIndex {
    fn deepest_index(&self) -> Option<usize>;
}

impl<E> DeepestIndex for nom::Err<E>
where
    E: DeepestIndex,
{
    fn deepest_index(&self) -> Option<usize> {
        match self {
            nom::Err::Error(e) | nom::Err::Failure(e) => e.deepest_index(),
            nom::Err::Incomplete(_) => None,
        }
    }
}

impl DeepestIndex for GreedyError<Span<'_>, ErrorKind> {
    fn deepest_index(&self) -> Option<usize> {
        self.errors.iter().map(|(p, _k)| p.location_offset()).max()
    }
}

fn fail<O>(span: Span, kind: ErrorKind) -> IResult<Span, O, ParseError> {
    Err(nom::Err::Failure(ParseError::from_error_kind(span, kind)))
}

/// Parses a hex-formated integer
///
/// ```
/// use sai_meta::defs::hex_integer;
///
/// let result = hex_integer("0x1f abc".into()).expect("Valid");
/// assert_eq!(result.0.fragment().to_string(), " abc");
/// assert_eq!(result.1, 0x1f);
/// ```
pub fn hex_integer(span: Span) -> IResult<Span, u64, ParseError> {
    let (rest, digits) = hex_digit1::<Span, ParseError>
        .preceded_by(tag_no_case("0x"))
        .parse(span)?;

    match u64::from_str_radix(digits.fragment(), 16) {
        Ok(v) => Ok((rest, v)),
        Err(_) => fail(span, ErrorKind::TooLarge),
    }
}

/// Parses a decimal-formated integer
pub fn decimal_integer(span: Span) -> IResult<Span, u64, ParseError> {
    let (rest, digits) = digit1::<Span, ParseError>(span)?;

    match digits.fragment().parse::<u64>() {
        Ok(v) => Ok((rest, v)),
        Err(_) => fail(span, ErrorKind::TooLarge),
    }
}

/// Parses a positive integer (hex or decimal)
pub fn positive_integer(span: Span) -> IResult<Span, u64, ParseError> {
    // hex first, otherwise `0x12` parses as `0` followed by garbage
    if let Ok(r) = hex_integer(span) {
        return Ok(r);
    }
    decimal_integer(span)
}

/// Parses a positive integer that must fit into `T`.
fn bounded_integer<T>(span: Span) -> IResult<Span, T, ParseError>
where
    T: TryFrom<u64>,
{
    let (rest, v) = positive_integer(span)?;

    match T::try_from(v) {
        Ok(v) => Ok((rest, v)),
        Err(_) => fail(span, ErrorKind::TooLarge),
    }
}

/// Parses one block of whitespace or a comment (`// ...` or `/* ... */`).
fn whitespace_group(span: Span) -> IResult<Span, (), ParseError> {
    alt((
        value((), pair(tag("//"), opt(is_not("\n\r")))),
        value((), tuple((tag("/*"), take_until("*/"), tag("*/")))),
        value((), multispace1),
    ))
    .parse(span)
}

/// Parses 0 or more whitespaces/comments. It can NEVER fail.
///
/// ```
/// use sai_meta::defs::whitespace0;
///
/// let result = whitespace0(" /*comment*/ // line\n12 abc".into()).expect("Valid");
/// assert_eq!(result.0.fragment().to_string(), "12 abc");
/// ```
pub fn whitespace0(span: Span) -> IResult<Span, (), ParseError> {
    value((), many0(whitespace_group)).parse(span)
}

/// Parses at least one whitespace or comment.
pub fn whitespace1(span: Span) -> IResult<Span, (), ParseError> {
    value((), many1(whitespace_group)).parse(span)
}

/// Parses a name id, of the form /[a-zA-Z_][a-zA-Z0-9_]*/
pub fn parse_id(span: Span) -> IResult<Span, &str, ParseError> {
    let valid_first = |c: char| c.is_ascii_alphabetic() || c == '_';
    let valid_second = |c: char| c.is_ascii_alphanumeric() || c == '_';
    map(
        recognize(tuple((take_while1(valid_first), take_while(valid_second)))),
        |data: Span| *data.fragment(),
    )(span)
}

/// Parses a value kind name, with or without the `SAI_ATTR_VALUE_TYPE_` prefix.
pub fn value_kind(span: Span) -> IResult<Span, ValueKind, ParseError> {
    let (rest, name) = parse_id(span)?;

    match name.parse::<ValueKind>() {
        Ok(kind) => Ok((rest, kind)),
        Err(_) => Err(nom::Err::Error(ParseError::from_error_kind(
            span,
            ErrorKind::Tag,
        ))),
    }
}

/// A single `attribute NAME = ID : KIND;` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeDef {
    pub name: String,
    pub id: AttrId,
    pub kind: ValueKind,
}

/// An `object NAME = CODE { ... }` block.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ObjectDef {
    pub name: String,
    pub code: i32,
    pub attributes: Vec<AttributeDef>,
}

/// Parses an attribute definition. Does NOT consume preceding whitespace.
///
/// ```
/// use sai_meta::ValueKind;
/// use sai_meta::defs::{attribute_def, AttributeDef};
///
/// let parsed = attribute_def("attribute SAI_PORT_ATTR_SPEED = 3 : UINT32;".into()).expect("valid");
/// assert_eq!(parsed.0.fragment().to_string(), "");
/// assert_eq!(
///     parsed.1,
///     AttributeDef { name: "SAI_PORT_ATTR_SPEED".into(), id: 3, kind: ValueKind::Uint32 }
/// );
/// ```
pub fn attribute_def(span: Span) -> IResult<Span, AttributeDef, ParseError> {
    let (span, _) = tuple((tag_no_case("attribute"), whitespace1)).parse(span)?;

    tuple((
        parse_id,
        whitespace0,
        tag("="),
        whitespace0,
        bounded_integer::<AttrId>,
        whitespace0,
        tag(":"),
        whitespace0,
        value_kind,
        whitespace0,
        tag(";"),
    ))
    .map(|(name, _, _, _, id, _, _, _, kind, _, _)| AttributeDef {
        name: name.into(),
        id,
        kind,
    })
    .parse(span)
}

/// Parses an object definition block. Does NOT consume preceding whitespace.
pub fn object_def(span: Span) -> IResult<Span, ObjectDef, ParseError> {
    let (mut span, (_, _, name, _, _, _, code, _, _)) = tuple((
        tag_no_case("object"),
        whitespace1,
        parse_id,
        whitespace0,
        tag("="),
        whitespace0,
        bounded_integer::<i32>,
        whitespace0,
        tag("{"),
    ))
    .parse(span)?;

    let mut object = ObjectDef {
        name: name.into(),
        code,
        attributes: Vec::new(),
    };

    loop {
        let (rest, _) = whitespace0(span)?;

        match attribute_def(rest) {
            Ok((after, attr)) => {
                if object.attributes.iter().any(|a| a.id == attr.id) {
                    warn!("Duplicate attribute id {} in {}", attr.id, object.name);
                    return fail(rest, ErrorKind::Verify);
                }

                object.attributes.push(attr);
                span = after;
            }
            Err(nom::Err::Error(_)) => break,
            Err(e) => return Err(e),
        }
    }

    value(object, tag("}").preceded_by(whitespace0)).parse(span)
}

#[derive(Error, Debug, Diagnostic)]
#[error("Failed to parse attribute definitions.")]
#[diagnostic(
    code("sai::defs::parse::failure"),
    help("Failed to parse attribute definitions. Check the definition file format")
)]
pub struct DefsParsingError {
    #[source_code]
    pub src: NamedSource,

    #[label("Parse error location")]
    pub error_location: SourceSpan,
}

impl DefsParsingError {
    fn at(input: Span, pos: usize) -> Self {
        DefsParsingError {
            src: NamedSource::new("input definitions", input.fragment().to_string()),
            error_location: (pos, 1).into(),
        }
    }

    fn from<'a>(input: Span<'a>, span: Span<'a>, error: nom::Err<ParseError<'a>>) -> Self {
        let pos = match error.deepest_index() {
            None => input.len() - span.len(),
            Some(error_pos) => error_pos,
        };

        warn!("Definitions parse error: {:?}", error);

        Self::at(input, pos)
    }
}

/// Failure loading a definition file from disk.
#[derive(Error, Debug, Diagnostic)]
pub enum DefsError {
    #[error("Failed to read definition file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] DefsParsingError),
}

/// The parsed content of a definition file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Defs {
    pub objects: Vec<ObjectDef>,
}

impl Defs {
    pub fn parse(input: Span) -> Result<Defs, DefsParsingError> {
        let mut defs = Defs::default();

        let mut span = input;
        while !span.is_empty() {
            let (rest, parsed) = alt((object_def.map(Some), value(None, whitespace1)))
                .parse(span)
                .map_err(|e| DefsParsingError::from(input, span, e))?;

            if let Some(object) = parsed {
                if defs
                    .objects
                    .iter()
                    .any(|o| o.code == object.code || o.name == object.name)
                {
                    warn!("Duplicate object {} = {}", object.name, object.code);
                    return Err(DefsParsingError::at(input, span.location_offset()));
                }

                defs.objects.push(object);
            }

            span = rest;
        }

        Ok(defs)
    }
}

impl From<Defs> for Registry {
    fn from(defs: Defs) -> Self {
        let mut registry = Registry::new();

        for object in defs.objects {
            let object_type = ObjectType(object.code);

            for attr in object.attributes {
                registry.insert(AttrMetadata::new(object_type, attr.id, attr.kind, attr.name));
            }

            registry.insert_object(object_type, object.name);
        }

        registry
    }
}

impl Registry {
    /// Build a registry from definition text.
    pub fn parse(text: &str) -> Result<Registry, DefsParsingError> {
        Defs::parse(text.into()).map(Into::into)
    }

    /// Build a registry from a definition file.
    pub fn load(path: impl AsRef<Path>) -> Result<Registry, DefsError> {
        let path = path.as_ref();

        let text = std::fs::read_to_string(path).map_err(|source| DefsError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let registry = Registry::parse(&text)?;

        debug!(
            "Loaded {} attribute definitions from {}",
            registry.len(),
            path.display()
        );

        Ok(registry)
    }
}
