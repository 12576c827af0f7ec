//! Flat text encoding of schedules: `[t0, s0, t1, s1, ...]`
//!
//! This is the form stored in the `Parameter` column of results tables and
//! the `Schedule` column of trial logs.

use super::{Schedule, SchedulePoint};
use crate::{Error, Result};

impl Schedule {
    /// Encode as a bracketed, comma-separated flat list of numbers.
    #[must_use]
    pub fn to_flat_text(&self) -> String {
        let values: Vec<String> = self
            .points
            .iter()
            .flat_map(|p| [p.time, p.fraction])
            .map(|v| format!("{v:?}"))
            .collect();
        format!("[{}]", values.join(", "))
    }

    /// Parse the flat text form back into a schedule, taking consecutive
    /// values as `(time, s)` pairs.
    ///
    /// Brackets are ignored wherever they appear, so the nested form
    /// `[[0.0, 0.0], [20.0, 1.0]]` parses as well.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParseError`] for non-numeric tokens or an odd number
    /// of values, and [`Error::InvalidSchedule`] if the decoded points break
    /// a schedule invariant.
    pub fn parse_flat_text(text: &str) -> Result<Self> {
        let stripped: String = text.chars().filter(|c| *c != '[' && *c != ']').collect();

        let values = stripped
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| {
                token.parse::<f64>().map_err(|e| {
                    Error::ParseError(format!("invalid schedule value '{token}' in '{text}': {e}"))
                })
            })
            .collect::<Result<Vec<f64>>>()?;

        if values.len() % 2 != 0 {
            return Err(Error::ParseError(format!(
                "schedule '{text}' has an odd number of values ({})",
                values.len()
            )));
        }

        Self::new(
            values
                .chunks_exact(2)
                .map(|pair| SchedulePoint::new(pair[0], pair[1]))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flat_list() {
        let schedule = Schedule::parse_flat_text("[0.0, 0.0, 10.0, 0.4, 20.0, 1.0]").unwrap();
        assert_eq!(
            schedule.to_pairs(),
            vec![[0.0, 0.0], [10.0, 0.4], [20.0, 1.0]]
        );
    }

    #[test]
    fn test_parse_nested_list() {
        let schedule = Schedule::parse_flat_text("[[0.0, 0.0], [10.0, 0.4], [20.0, 1.0]]").unwrap();
        assert_eq!(schedule.len(), 3);
    }

    #[test]
    fn test_encode_matches_flat_form() {
        let schedule = Schedule::from_pairs(&[[0.0, 0.0], [10.0, 0.4], [20.0, 1.0]]).unwrap();
        assert_eq!(schedule.to_flat_text(), "[0.0, 0.0, 10.0, 0.4, 20.0, 1.0]");
    }

    #[test]
    fn test_parse_odd_length() {
        let err = Schedule::parse_flat_text("[0.0, 0.0, 10.0]").unwrap_err();
        assert!(matches!(err, Error::ParseError(_)));
    }

    #[test]
    fn test_parse_garbage() {
        let err = Schedule::parse_flat_text("[0.0, zero, 10.0, 1.0]").unwrap_err();
        assert!(err.to_string().contains("zero"));
    }

    #[test]
    fn test_parse_invalid_schedule() {
        let err = Schedule::parse_flat_text("[0.0, 0.0, 10.0, 0.5]").unwrap_err();
        assert!(matches!(err, Error::InvalidSchedule(_)));
    }
}
