use winnow::ascii::space1;
use winnow::combinator::{alt, cut_err, eof, opt, preceded, repeat, terminated};
use winnow::error::{AddContext, ContextError, ErrMode, ModalResult, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::stream::Stream;
use winnow::token::{one_of, take_while};

use crate::{AccessLevel, ElementReference, Finality, Visibility};

// -- Access tokens ----------------------------------------------------------

fn visibility(input: &mut &str) -> ModalResult<Visibility> {
    alt((
        "public".value(Visibility::Public),
        "protected".value(Visibility::Protected),
        "default".value(Visibility::Default),
        "private".value(Visibility::Private),
    ))
    .context(StrContext::Expected(StrContextValue::Description(
        "access token (public, protected, default, private)",
    )))
    .parse_next(input)
}

fn finality(input: &mut &str) -> ModalResult<Finality> {
    opt(alt((
        "+f".value(Finality::ForceFinal),
        "-f".value(Finality::ForceNonFinal),
    )))
    .map(Option::unwrap_or_default)
    .parse_next(input)
}

pub(crate) fn access_level(input: &mut &str) -> ModalResult<AccessLevel> {
    (visibility, finality)
        .map(|(v, f)| AccessLevel::new(v, f))
        .parse_next(input)
}

// -- Names --------------------------------------------------------------------

/// A JVM internal class name: `/`-separated, no empty segments.
///
/// Parentheses are excluded so a descriptor glued to its member name fails
/// instead of reading as a class.
fn internal_name<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., |c: char| {
        !c.is_whitespace() && !matches!(c, '.' | ';' | '[' | '(' | ')')
    })
    .verify(|name: &str| name.split('/').all(|segment| !segment.is_empty()))
    .context(StrContext::Expected(StrContextValue::Description(
        "internal class name",
    )))
    .parse_next(input)
}

fn member_name<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., |c: char| {
        !c.is_whitespace() && !matches!(c, '.' | ';' | '[' | '/' | '(' | ')')
    })
    .context(StrContext::Expected(StrContextValue::Description(
        "member name",
    )))
    .parse_next(input)
}

// -- Descriptors --------------------------------------------------------------

fn field_type(input: &mut &str) -> ModalResult<()> {
    let _: () = repeat(0.., '[').parse_next(input)?;
    alt((
        one_of(['B', 'C', 'D', 'F', 'I', 'J', 'S', 'Z']).void(),
        ('L', internal_name, ';').void(),
    ))
    .parse_next(input)
}

fn method_descriptor<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    let params = repeat::<_, _, (), _, _>(0.., field_type);
    ('(', params, ')', alt(('V'.void(), field_type)))
        .take()
        .parse_next(input)
}

fn field_descriptor<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    field_type.take().parse_next(input)
}

enum Descriptor<'i> {
    Field(&'i str),
    Method(&'i str),
}

fn descriptor<'i>(input: &mut &'i str) -> ModalResult<Descriptor<'i>> {
    alt((
        method_descriptor.map(Descriptor::Method),
        field_descriptor.map(Descriptor::Field),
    ))
    .context(StrContext::Expected(StrContextValue::Description(
        "type descriptor",
    )))
    .parse_next(input)
}

// -- Targets ------------------------------------------------------------------

fn expected(input: &&str, what: &'static str) -> ErrMode<ContextError> {
    let start = input.checkpoint();
    ErrMode::Cut(ContextError::new().add_context(
        input,
        &start,
        StrContext::Expected(StrContextValue::Description(what)),
    ))
}

fn member(owner: &str, name: &str, descriptor: Option<Descriptor<'_>>) -> ElementReference {
    match descriptor {
        None => ElementReference::field(owner, name, None),
        Some(Descriptor::Field(desc)) => ElementReference::field(owner, name, Some(desc)),
        Some(Descriptor::Method(desc)) => ElementReference::method(owner, name, desc),
    }
}

/// `owner`, `owner.name`, `owner.name desc` or `owner/name desc`.
fn target(input: &mut &str) -> ModalResult<ElementReference> {
    let path = internal_name.parse_next(input)?;
    let dotted = opt(preceded('.', cut_err(member_name))).parse_next(input)?;
    let desc = opt(preceded(space1, cut_err(descriptor))).parse_next(input)?;

    match (dotted, desc) {
        (None, None) => Ok(ElementReference::class(path)),
        (Some(name), desc) => Ok(member(path, name, desc)),
        (None, Some(desc)) => match path.rsplit_once('/') {
            Some((owner, name)) => Ok(member(owner, name, Some(desc))),
            None => Err(expected(input, "owner/name before descriptor")),
        },
    }
}

// -- Rule lines ---------------------------------------------------------------

/// One non-comment rule line: `<access-token> <target>`.
pub(crate) fn rule_line(input: &mut &str) -> ModalResult<(AccessLevel, ElementReference)> {
    let level = access_level.parse_next(input)?;
    cut_err(space1)
        .context(StrContext::Expected(StrContextValue::Description(
            "whitespace after access token",
        )))
        .parse_next(input)?;
    let element = cut_err(target).parse_next(input)?;
    cut_err(eof)
        .context(StrContext::Expected(StrContextValue::Description(
            "end of line",
        )))
        .parse_next(input)?;
    Ok((level, element))
}

pub(crate) fn access_token(input: &mut &str) -> ModalResult<AccessLevel> {
    terminated(
        access_level,
        cut_err(eof).context(StrContext::Expected(StrContextValue::Description(
            "end of access token",
        ))),
    )
    .parse_next(input)
}
