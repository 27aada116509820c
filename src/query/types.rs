//! Core types for the query system

use crate::schema::{FieldScalar, ValueKind};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Bound value of a numeric exact/range query
///
/// Bounds arrive untyped from the query descriptor and coerce to the resolved
/// field's value kind at resolution time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RangeValue {
    /// Integral bound
    Long(i64),
    /// Floating-point bound
    Double(OrderedFloat<f64>),
}

impl RangeValue {
    /// Integral view
    pub fn as_i64(&self) -> i64 {
        match self {
            RangeValue::Long(v) => *v,
            RangeValue::Double(v) => v.0 as i64,
        }
    }

    /// Floating-point view
    pub fn as_f64(&self) -> f64 {
        match self {
            RangeValue::Long(v) => *v as f64,
            RangeValue::Double(v) => v.0,
        }
    }

    /// Coerce to a typed scalar of the given kind
    pub fn to_scalar(&self, kind: ValueKind) -> Option<FieldScalar> {
        match kind {
            ValueKind::Integer => i32::try_from(self.as_i64()).ok().map(FieldScalar::Integer),
            ValueKind::Long => Some(FieldScalar::Long(self.as_i64())),
            ValueKind::Float => Some(FieldScalar::Float(self.as_f64() as f32)),
            ValueKind::Double => Some(FieldScalar::Double(self.as_f64())),
            _ => None,
        }
    }
}

impl From<i64> for RangeValue {
    fn from(value: i64) -> Self {
        RangeValue::Long(value)
    }
}

impl From<f64> for RangeValue {
    fn from(value: f64) -> Self {
        RangeValue::Double(OrderedFloat(value))
    }
}

/// Minimum number of should clauses that must match
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MinimumShouldMatch {
    /// Exact count
    Count(usize),
    /// Percentage of the should clauses (e.g. "75%")
    Percentage(String),
}

impl MinimumShouldMatch {
    /// Calculate the minimum number of clauses that should match
    pub fn calculate(&self, total_clauses: usize) -> usize {
        match self {
            MinimumShouldMatch::Count(n) => *n,
            MinimumShouldMatch::Percentage(s) => {
                let pct: f64 = s.trim_end_matches('%').parse().unwrap_or(100.0) / 100.0;
                ((total_clauses as f64) * pct).ceil() as usize
            }
        }
    }
}

impl Default for MinimumShouldMatch {
    fn default() -> Self {
        MinimumShouldMatch::Count(1)
    }
}
