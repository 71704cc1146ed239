//! Space-run field tokenizer for listing entry lines.
//!
//! Both dump formats pad their columns with a variable number of spaces, and
//! the final column — the entry name — may itself contain spaces.  So a line
//! is split into a *required* number of fields: the first `n - 1` end at the
//! next run of spaces, and the last one swallows the rest of the line
//! verbatim.

use thiserror::Error;

/// A line had fewer fields than the format requires.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected {expected} whitespace-separated fields")]
pub struct FieldCountError {
    pub expected: usize,
}

/// Split `line` into exactly `count` fields (`count` ≥ 2).
///
/// Fields `0..count-2` run up to the next space; each separating space run
/// must be followed by further non-space text.  The final field is the
/// remainder of the line, embedded spaces included.
pub fn split_fields(line: &str, count: usize) -> Result<Vec<&str>, FieldCountError> {
    debug_assert!(count >= 2);
    let mut fields = Vec::with_capacity(count);
    let mut rest = line;

    for _ in 0..count - 1 {
        let space = rest.find(' ').ok_or(FieldCountError { expected: count })?;
        let tail = rest[space..].trim_start_matches(' ');
        if tail.is_empty() {
            return Err(FieldCountError { expected: count });
        }
        fields.push(&rest[..space]);
        rest = tail;
    }
    fields.push(rest);

    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_field_keeps_embedded_spaces() {
        let fields = split_fields("a b c  long name with spaces", 4).unwrap();
        assert_eq!(fields, ["a", "b", "c", "long name with spaces"]);
    }

    #[test]
    fn space_runs_of_any_length_delimit() {
        let fields = split_fields("12/05/2021  03:16 PM             1,024 a.txt", 5).unwrap();
        assert_eq!(fields, ["12/05/2021", "03:16", "PM", "1,024", "a.txt"]);
    }

    #[test]
    fn too_few_fields_is_an_error() {
        assert_eq!(
            split_fields("a b", 4),
            Err(FieldCountError { expected: 4 })
        );
    }

    #[test]
    fn trailing_spaces_do_not_count_as_a_field() {
        assert_eq!(
            split_fields("a b c   ", 4),
            Err(FieldCountError { expected: 4 })
        );
    }

    #[test]
    fn exact_field_count_consumes_the_whole_line() {
        let fields = split_fields("x y", 2).unwrap();
        assert_eq!(fields, ["x", "y"]);
    }
}
