use std::sync::LazyLock;

use regex::Regex;

use crate::error::CorrectionError;

static YEAR_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{4}").expect("valid year regex"));

/// Four-digit tokens of a label, left to right, non-overlapping.
pub fn year_tokens(label: &str) -> Vec<i32> {
    YEAR_TOKEN
        .find_iter(label)
        .filter_map(|token| token.as_str().parse().ok())
        .collect()
}

/// Year whose raw-data sheet receives the correction for `label`.
///
/// This is the leftmost year token, not the chronologically earlier one: a
/// label written `2021-2020` targets 2021.
pub fn target_year(label: &str) -> Result<i32, CorrectionError> {
    match year_tokens(label).as_slice() {
        [first, _] => Ok(*first),
        tokens => Err(CorrectionError::MalformedYearPairLabel {
            label: label.to_string(),
            found: tokens.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_non_overlapping() {
        assert_eq!(year_tokens("2019-2020"), vec![2019, 2020]);
        assert_eq!(year_tokens("20192020"), vec![2019, 2020]);
        assert_eq!(year_tokens("Y2019 to Y2020"), vec![2019, 2020]);
        assert_eq!(year_tokens("12345"), vec![1234]);
        assert!(year_tokens("19-20").is_empty());
    }

    #[test]
    fn target_is_leftmost_year() {
        assert_eq!(target_year("2020-2021").unwrap(), 2020);
        assert_eq!(target_year("2021-2020").unwrap(), 2021);
    }

    #[test]
    fn labels_need_exactly_two_years() {
        let three = target_year("2019-2020-2021").unwrap_err();
        assert!(matches!(
            three,
            CorrectionError::MalformedYearPairLabel { found: 3, .. }
        ));
        let one = target_year("2019").unwrap_err();
        assert!(matches!(
            one,
            CorrectionError::MalformedYearPairLabel { found: 1, .. }
        ));
        assert!(target_year("").is_err());
    }
}
