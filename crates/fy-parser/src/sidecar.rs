use chumsky::prelude::*;
use fy_core::SidecarBlock;

const HEADER_PREFIX: &str = "Diagram:";

/// `Diagram: <name>` with an optional `(<type>)` suffix, on a single line.
///
/// The name runs up to the first `(`; the type runs up to the first `)`. Only
/// whitespace may follow.
fn header_line_parser<'a>()
-> impl Parser<'a, &'a str, (&'a str, Option<&'a str>), extra::Err<Rich<'a, char>>> {
    let name = any()
        .filter(|c: &char| *c != '(')
        .repeated()
        .at_least(1)
        .to_slice();
    let kind = just('(')
        .ignore_then(
            any()
                .filter(|c: &char| *c != ')')
                .repeated()
                .at_least(1)
                .to_slice(),
        )
        .then_ignore(just(')'));

    just(HEADER_PREFIX)
        .ignore_then(name)
        .then(kind.or_not())
        .then_ignore(any().filter(|c: &char| c.is_whitespace()).repeated())
        .then_ignore(end())
}

/// Attach the `Diagram: <name> (<type>)` header fields to a sidecar body.
///
/// The first matching line wins. `content` is always the input unchanged; a
/// body without a header (or whose name is blank) has neither field set.
#[must_use]
pub fn parse_sidecar_header(content: &str) -> SidecarBlock {
    let parser = header_line_parser();
    let header = content
        .lines()
        .filter(|line| line.starts_with(HEADER_PREFIX))
        .find_map(|line| {
            let (name, kind) = parser.parse(line).into_output()?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            let kind = kind.map(str::trim).filter(|kind| !kind.is_empty());
            Some((name.to_string(), kind.map(str::to_string)))
        });

    let (name, kind) = header.unzip();
    SidecarBlock {
        content: content.to_string(),
        name,
        kind: kind.flatten(),
    }
}
