//! Field value kinds and typed scalar values
//!
//! A `ValueKind` selects the storage family of a declared field and owns the
//! type-specific conversion from arbitrary JSON scalars into typed values.

use crate::error::FathomError;
use crate::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field value kind
///
/// Determines how a field's values are converted, indexed and queried.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// Full-text searchable string, analyzed at index and query time
    #[default]
    Text,
    /// 32-bit signed integer
    Integer,
    /// 64-bit signed integer
    Long,
    /// 32-bit floating point
    Float,
    /// 64-bit floating point
    Double,
    /// true/false value
    Boolean,
    /// Latitude/longitude point for bounding-box queries
    GeoPoint,
}

impl ValueKind {
    /// Get the internal storage type name
    pub fn storage_type(&self) -> &'static str {
        match self {
            ValueKind::Text => "text",
            ValueKind::Integer => "integer",
            ValueKind::Long => "long",
            ValueKind::Float => "float",
            ValueKind::Double => "double",
            ValueKind::Boolean => "boolean",
            ValueKind::GeoPoint => "geo_point",
        }
    }

    /// Check if this kind supports numeric range queries
    pub fn supports_range(&self) -> bool {
        matches!(
            self,
            ValueKind::Integer | ValueKind::Long | ValueKind::Float | ValueKind::Double
        )
    }

    /// Check if this kind supports sorting through doc values
    pub fn supports_sorting(&self) -> bool {
        !matches!(self, ValueKind::GeoPoint)
    }

    /// The kind's minimum value, used as the lower-bound sentinel of
    /// half-open range queries
    pub fn min_scalar(&self) -> Option<FieldScalar> {
        match self {
            ValueKind::Integer => Some(FieldScalar::Integer(i32::MIN)),
            ValueKind::Long => Some(FieldScalar::Long(i64::MIN)),
            ValueKind::Float => Some(FieldScalar::Float(f32::MIN)),
            ValueKind::Double => Some(FieldScalar::Double(f64::MIN)),
            _ => None,
        }
    }

    /// The kind's maximum value, used as the upper-bound sentinel of
    /// half-open range queries
    pub fn max_scalar(&self) -> Option<FieldScalar> {
        match self {
            ValueKind::Integer => Some(FieldScalar::Integer(i32::MAX)),
            ValueKind::Long => Some(FieldScalar::Long(i64::MAX)),
            ValueKind::Float => Some(FieldScalar::Float(f32::MAX)),
            ValueKind::Double => Some(FieldScalar::Double(f64::MAX)),
            _ => None,
        }
    }

    /// Convert a JSON scalar into a typed value of this kind
    ///
    /// Numeric kinds accept numbers and parseable strings. A value whose
    /// shape cannot be converted fails with `UnsupportedValueType`.
    pub fn convert(&self, field: &str, value: &Value) -> Result<FieldScalar> {
        let unsupported = |reason: &str| FathomError::UnsupportedValueType {
            field: field.to_string(),
            reason: reason.to_string(),
        };
        match self {
            ValueKind::Text => match value {
                Value::String(s) => Ok(FieldScalar::Text(s.clone())),
                Value::Number(n) => Ok(FieldScalar::Text(n.to_string())),
                Value::Bool(b) => Ok(FieldScalar::Text(b.to_string())),
                _ => Err(unsupported("expected a string")),
            },
            ValueKind::Integer => match integral_value(value) {
                Some(i) => i32::try_from(i)
                    .map(FieldScalar::Integer)
                    .map_err(|_| unsupported("integer out of 32-bit range")),
                None => Err(unsupported("expected an integer")),
            },
            ValueKind::Long => match integral_value(value) {
                Some(i) => Ok(FieldScalar::Long(i)),
                None => Err(unsupported("expected an integer")),
            },
            ValueKind::Float => match floating_value(value) {
                Some(f) => Ok(FieldScalar::Float(f as f32)),
                None => Err(unsupported("expected a number")),
            },
            ValueKind::Double => match floating_value(value) {
                Some(f) => Ok(FieldScalar::Double(f)),
                None => Err(unsupported("expected a number")),
            },
            ValueKind::Boolean => match value {
                Value::Bool(b) => Ok(FieldScalar::Boolean(*b)),
                Value::String(s) => s
                    .parse::<bool>()
                    .map(FieldScalar::Boolean)
                    .map_err(|_| unsupported("expected a boolean")),
                _ => Err(unsupported("expected a boolean")),
            },
            ValueKind::GeoPoint => geo_value(value).ok_or_else(|| {
                unsupported("expected a [latitude, longitude] pair or a 'lat,lon' string")
            }),
        }
    }

    /// Infer a kind from a value's runtime shape
    ///
    /// Smart inference produces only text, long and double; every other shape
    /// is unsupported. Arrays infer from their first non-null element.
    pub fn infer(value: &Value) -> Option<ValueKind> {
        match value {
            Value::String(_) => Some(ValueKind::Text),
            Value::Number(n) => {
                if n.is_i64() || n.is_u64() {
                    Some(ValueKind::Long)
                } else {
                    Some(ValueKind::Double)
                }
            }
            Value::Array(arr) => arr.iter().find(|v| !v.is_null()).and_then(ValueKind::infer),
            _ => None,
        }
    }
}

fn integral_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i)
            } else {
                // A float with no fractional part boxes into the integral kinds
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && f.is_finite())
                    .map(|f| f as i64)
            }
        }
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn floating_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn geo_value(value: &Value) -> Option<FieldScalar> {
    match value {
        Value::Array(arr) if arr.len() == 2 => {
            let latitude = arr[0].as_f64()?;
            let longitude = arr[1].as_f64()?;
            Some(FieldScalar::Geo {
                latitude,
                longitude,
            })
        }
        Value::String(s) => {
            let (lat, lon) = s.split_once(',')?;
            Some(FieldScalar::Geo {
                latitude: lat.trim().parse().ok()?,
                longitude: lon.trim().parse().ok()?,
            })
        }
        _ => None,
    }
}

/// A typed scalar value produced by field dispatch
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldScalar {
    Text(String),
    Integer(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Boolean(bool),
    Geo { latitude: f64, longitude: f64 },
}

impl FieldScalar {
    /// The kind this scalar belongs to
    pub fn kind(&self) -> ValueKind {
        match self {
            FieldScalar::Text(_) => ValueKind::Text,
            FieldScalar::Integer(_) => ValueKind::Integer,
            FieldScalar::Long(_) => ValueKind::Long,
            FieldScalar::Float(_) => ValueKind::Float,
            FieldScalar::Double(_) => ValueKind::Double,
            FieldScalar::Boolean(_) => ValueKind::Boolean,
            FieldScalar::Geo { .. } => ValueKind::GeoPoint,
        }
    }

    /// View as text, if textual
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldScalar::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view, widening to f64
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldScalar::Integer(i) => Some(*i as f64),
            FieldScalar::Long(l) => Some(*l as f64),
            FieldScalar::Float(f) => Some(*f as f64),
            FieldScalar::Double(d) => Some(*d),
            _ => None,
        }
    }

    /// Integral view, if losslessly integral
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldScalar::Integer(i) => Some(*i as i64),
            FieldScalar::Long(l) => Some(*l),
            _ => None,
        }
    }

    /// The term string this scalar indexes under
    pub fn term_string(&self) -> String {
        match self {
            FieldScalar::Text(s) => s.clone(),
            FieldScalar::Integer(i) => i.to_string(),
            FieldScalar::Long(l) => l.to_string(),
            FieldScalar::Float(f) => f.to_string(),
            FieldScalar::Double(d) => d.to_string(),
            FieldScalar::Boolean(b) => b.to_string(),
            FieldScalar::Geo {
                latitude,
                longitude,
            } => format!("{latitude},{longitude}"),
        }
    }

    /// Convert into a JSON value for result records
    pub fn to_json(&self) -> Value {
        match self {
            FieldScalar::Text(s) => Value::String(s.clone()),
            FieldScalar::Integer(i) => Value::from(*i),
            FieldScalar::Long(l) => Value::from(*l),
            FieldScalar::Float(f) => Value::from(*f as f64),
            FieldScalar::Double(d) => Value::from(*d),
            FieldScalar::Boolean(b) => Value::from(*b),
            FieldScalar::Geo {
                latitude,
                longitude,
            } => Value::from(vec![*latitude, *longitude]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_convert_text() {
        let v = ValueKind::Text.convert("title", &json!("hello")).unwrap();
        assert_eq!(v, FieldScalar::Text("hello".to_string()));
        // Numbers stringify into text fields
        let v = ValueKind::Text.convert("title", &json!(42)).unwrap();
        assert_eq!(v, FieldScalar::Text("42".to_string()));
        assert!(ValueKind::Text.convert("title", &json!([1])).is_err());
    }

    #[test]
    fn test_convert_numeric() {
        assert_eq!(
            ValueKind::Long.convert("n", &json!(7)).unwrap(),
            FieldScalar::Long(7)
        );
        assert_eq!(
            ValueKind::Long.convert("n", &json!("12")).unwrap(),
            FieldScalar::Long(12)
        );
        assert_eq!(
            ValueKind::Double.convert("n", &json!(3)).unwrap(),
            FieldScalar::Double(3.0)
        );
        assert!(ValueKind::Long.convert("n", &json!("abc")).is_err());
    }

    #[test]
    fn test_convert_integer_range() {
        assert_eq!(
            ValueKind::Integer.convert("n", &json!(123)).unwrap(),
            FieldScalar::Integer(123)
        );
        assert!(ValueKind::Integer
            .convert("n", &json!(i64::from(i32::MAX) + 1))
            .is_err());
    }

    #[test]
    fn test_convert_boolean() {
        assert_eq!(
            ValueKind::Boolean.convert("b", &json!(true)).unwrap(),
            FieldScalar::Boolean(true)
        );
        assert_eq!(
            ValueKind::Boolean.convert("b", &json!("false")).unwrap(),
            FieldScalar::Boolean(false)
        );
        assert!(ValueKind::Boolean.convert("b", &json!(1)).is_err());
    }

    #[test]
    fn test_convert_geo() {
        let v = ValueKind::GeoPoint.convert("loc", &json!([48.85, 2.35])).unwrap();
        assert_eq!(
            v,
            FieldScalar::Geo {
                latitude: 48.85,
                longitude: 2.35
            }
        );
        let v = ValueKind::GeoPoint.convert("loc", &json!("48.85, 2.35")).unwrap();
        assert!(matches!(v, FieldScalar::Geo { .. }));
        assert!(ValueKind::GeoPoint.convert("loc", &json!([1.0])).is_err());
    }

    #[test]
    fn test_infer() {
        assert_eq!(ValueKind::infer(&json!("hello")), Some(ValueKind::Text));
        assert_eq!(ValueKind::infer(&json!(42)), Some(ValueKind::Long));
        assert_eq!(ValueKind::infer(&json!(3.5)), Some(ValueKind::Double));
        assert_eq!(ValueKind::infer(&json!(["a", "b"])), Some(ValueKind::Text));
        assert_eq!(ValueKind::infer(&json!(true)), None);
        assert_eq!(ValueKind::infer(&json!({"a": 1})), None);
    }

    #[test]
    fn test_range_sentinels() {
        assert_eq!(
            ValueKind::Double.min_scalar(),
            Some(FieldScalar::Double(f64::MIN))
        );
        assert_eq!(
            ValueKind::Long.max_scalar(),
            Some(FieldScalar::Long(i64::MAX))
        );
        assert_eq!(ValueKind::Text.min_scalar(), None);
    }
}
