//! Query file parsing for batch runs.
//!
//! One query per line: `rate seedlings confidence`, separated by
//! whitespace or commas. Blank lines and lines starting with `#` are
//! skipped.
//!
//! ```text
//! # rate  seedlings  confidence
//! 0.6     10         0.95
//! 0.85, 40, 0.9
//! ```

use crate::error::CliError;

/// A single parsed query line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Query {
    /// 1-based line number in the source.
    pub line: usize,
    /// Germination rate.
    pub rate: f64,
    /// Desired seedlings.
    pub seedlings: u32,
    /// Confidence threshold.
    pub confidence: f64,
}

/// Parse every query in `input`.
///
/// Range checks are left to the estimator; this only checks shape.
pub fn parse_queries(input: &str) -> Result<Vec<Query>, CliError> {
    input
        .lines()
        .enumerate()
        .filter_map(|(index, raw)| {
            let text = raw.trim();
            if text.is_empty() || text.starts_with('#') {
                None
            } else {
                Some(parse_line(index.saturating_add(1), text))
            }
        })
        .collect()
}

fn parse_line(line: usize, text: &str) -> Result<Query, CliError> {
    let fields: Vec<&str> = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|field| !field.is_empty())
        .collect();

    let [rate, seedlings, confidence] = fields.as_slice() else {
        return Err(CliError::Query {
            line,
            reason: format!("expected 3 fields (rate seedlings confidence), found {}", fields.len()),
        });
    };

    Ok(Query {
        line,
        rate: parse_field(line, "rate", rate)?,
        seedlings: parse_field(line, "seedlings", seedlings)?,
        confidence: parse_field(line, "confidence", confidence)?,
    })
}

fn parse_field<T>(line: usize, name: &str, raw: &str) -> Result<T, CliError>
where
    T: core::str::FromStr,
    T::Err: core::fmt::Display,
{
    raw.parse().map_err(|e| CliError::Query {
        line,
        reason: format!("invalid {name} {raw:?}: {e}"),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_whitespace_and_commas() {
        let input = "# rate seedlings confidence\n0.6 10 0.95\n\n0.85, 40, 0.9\n";
        let queries = parse_queries(input).unwrap();
        assert_eq!(queries.len(), 2);

        let first = queries.first().unwrap();
        assert_eq!(first.line, 2);
        assert_eq!(first.seedlings, 10);
        assert!((first.rate - 0.6).abs() < f64::EPSILON);

        let second = queries.get(1).unwrap();
        assert_eq!(second.line, 4);
        assert_eq!(second.seedlings, 40);
        assert!((second.confidence - 0.9).abs() < f64::EPSILON);
    }

    #[test]
    fn wrong_field_count_names_line() {
        let err = parse_queries("0.6 10 0.95\n0.6 10\n").unwrap_err();
        assert!(matches!(err, CliError::Query { line: 2, .. }));
    }

    #[test]
    fn bad_number_names_field() {
        let err = parse_queries("0.6 ten 0.95").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("line 1"));
        assert!(msg.contains("seedlings"));
    }

    #[test]
    fn empty_input_has_no_queries() {
        assert!(parse_queries("\n# nothing\n").unwrap().is_empty());
    }
}
