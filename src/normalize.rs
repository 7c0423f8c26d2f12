// Value normalizer: one datastream sample value -> f64

use std::num::ParseFloatError;

use thiserror::Error;

use crate::models::SampleValue;

/// Result of normalizing a value the series can carry.
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    Value(f64),
    /// String that is not a finite base-10 number; the sample is dropped.
    Skip(SkipReason),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SkipReason {
    #[error("{0}")]
    Parse(#[from] ParseFloatError),

    #[error("non-finite value {0}")]
    NonFinite(f64),
}

/// The value's type can never be numeric (bool, null, object, array).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnsupportedValue {
    pub kind: &'static str,
}

/// Integers widen exactly up to 2^53. Unparseable strings are skipped,
/// non-numeric types are rejected.
pub fn normalize(value: &SampleValue) -> Result<Normalized, UnsupportedValue> {
    match value {
        SampleValue::Float(f) => Ok(Normalized::Value(*f)),
        SampleValue::Integer(i) => Ok(Normalized::Value(*i as f64)),
        SampleValue::NumericString(s) => Ok(match s.parse::<f64>() {
            Ok(f) if f.is_finite() => Normalized::Value(f),
            Ok(f) => Normalized::Skip(SkipReason::NonFinite(f)),
            Err(e) => Normalized::Skip(SkipReason::Parse(e)),
        }),
        other @ SampleValue::Other(_) => Err(UnsupportedValue { kind: other.kind() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_float_passes_through() {
        assert_eq!(
            normalize(&SampleValue::Float(-12.75)),
            Ok(Normalized::Value(-12.75))
        );
    }

    #[test]
    fn test_integer_widens_exactly() {
        let max_exact = 1_i64 << 53;
        assert_eq!(
            normalize(&SampleValue::Integer(max_exact)),
            Ok(Normalized::Value(9_007_199_254_740_992.0))
        );
        assert_eq!(
            normalize(&SampleValue::Integer(-42)),
            Ok(Normalized::Value(-42.0))
        );
    }

    #[test]
    fn test_numeric_string_parses() {
        assert_eq!(
            normalize(&SampleValue::NumericString("3.14".into())),
            Ok(Normalized::Value(3.14))
        );
        assert_eq!(
            normalize(&SampleValue::NumericString("9223372036854775807".into())),
            Ok(Normalized::Value(9_223_372_036_854_775_807_i64 as f64))
        );
    }

    #[test]
    fn test_garbage_string_is_skipped() {
        assert!(matches!(
            normalize(&SampleValue::NumericString("abc".into())),
            Ok(Normalized::Skip(_))
        ));
        assert!(matches!(
            normalize(&SampleValue::NumericString(" 1.0".into())),
            Ok(Normalized::Skip(_))
        ));
    }

    #[test]
    fn test_non_finite_strings_are_skipped() {
        for s in ["NaN", "nan", "inf", "-inf", "infinity", "+Infinity", "1e400"] {
            assert!(
                matches!(
                    normalize(&SampleValue::NumericString(s.into())),
                    Ok(Normalized::Skip(SkipReason::NonFinite(_)))
                ),
                "{}",
                s
            );
        }
    }

    #[test]
    fn test_other_types_are_rejected() {
        for (value, kind) in [
            (json!(true), "boolean"),
            (json!(null), "null"),
            (json!({"a": 1}), "object"),
            (json!([1, 2]), "array"),
        ] {
            assert_eq!(
                normalize(&SampleValue::Other(value)),
                Err(UnsupportedValue { kind })
            );
        }
    }
}
