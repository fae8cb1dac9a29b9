//! Field tag tokenizer
//!
//! A tag is a comma-separated list of parts. Empty parts are ignored; every other
//! part becomes one [`Segment`].

/// Tag part excluding the field from the schema.
pub const TAG_SKIP: &str = "-";
/// Tag part allowing the field to be absent or empty.
pub const TAG_OMITEMPTY: &str = "omitempty";
/// Key of the explicit `alias=<name>` part.
pub const TAG_ALIAS: &str = "alias";

/// One parsed part of a field tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// `alias=<name>`
    Alias(&'a str),
    /// `omitempty`
    OmitEmpty,
    /// Any other bare word, a candidate positional alias
    Positional(&'a str),
    /// `-`
    Skip,
    /// A part with more than one `=`, or a `key=value` form with an unknown key
    Invalid(&'a str),
}

impl<'a> Segment<'a> {
    /// Classify a single non-empty tag part.
    pub fn parse(part: &'a str) -> Self {
        if part == TAG_SKIP {
            return Segment::Skip;
        }
        match part.split_once('=') {
            None if part == TAG_OMITEMPTY => Segment::OmitEmpty,
            None => Segment::Positional(part),
            Some((_, value)) if value.contains('=') => Segment::Invalid(part),
            Some((TAG_ALIAS, value)) => Segment::Alias(value),
            Some(_) => Segment::Invalid(part),
        }
    }
}

/// Split a tag into its segments, in order.
pub fn segments(tag: &str) -> impl Iterator<Item = Segment<'_>> {
    tag.split(',')
        .filter(|part| !part.is_empty())
        .map(Segment::parse)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_all(tag: &str) -> Vec<Segment<'_>> {
        segments(tag).collect()
    }

    #[test]
    fn test_bare_parts() {
        assert_eq!(
            parse_all("email,omitempty"),
            vec![Segment::Positional("email"), Segment::OmitEmpty]
        );
        assert_eq!(parse_all("-"), vec![Segment::Skip]);
    }

    #[test]
    fn test_empty_parts_are_dropped() {
        assert!(parse_all("").is_empty());
        assert_eq!(parse_all(",,name,"), vec![Segment::Positional("name")]);
    }

    #[test]
    fn test_keyed_parts() {
        assert_eq!(parse_all("alias=age"), vec![Segment::Alias("age")]);
        assert_eq!(parse_all("alias="), vec![Segment::Alias("")]);
        assert_eq!(
            parse_all("omitempty=true"),
            vec![Segment::Invalid("omitempty=true")]
        );
        assert_eq!(parse_all("foo=bar"), vec![Segment::Invalid("foo=bar")]);
    }

    #[test]
    fn test_more_than_one_equals_is_invalid() {
        assert_eq!(parse_all("alias==name"), vec![Segment::Invalid("alias==name")]);
        assert_eq!(parse_all("alias=age=A"), vec![Segment::Invalid("alias=age=A")]);
    }
}
