//! Engine-native query representation
//!
//! Query nodes resolve into this closed representation, which is the only
//! query shape crossing the index-engine boundary. The `Display` rendering is
//! the `debug_query` string of result descriptors.

use crate::schema::FieldScalar;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Score combination mode of a cross-index join
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreMode {
    /// Foreign scores are ignored
    #[default]
    None,
    /// Average of matching foreign scores
    Avg,
    /// Maximum of matching foreign scores
    Max,
    /// Sum of matching foreign scores
    Total,
}

/// Executable query handed to the index engine
#[derive(Clone, Debug, PartialEq)]
pub enum EngineQuery {
    /// Matches every document
    MatchAll,
    /// Single un-analyzed term
    Term { field: String, term: String },
    /// Set of correlated terms produced by a join
    TermsSet {
        field: String,
        terms: Vec<FieldScalar>,
        score_mode: ScoreMode,
    },
    /// Exact numeric match over point or doc-value storage
    NumericExact {
        field: String,
        value: FieldScalar,
        doc_values: bool,
    },
    /// Closed numeric range; half-open input bounds were substituted with
    /// the value type's minimum/maximum before reaching the engine
    NumericRange {
        field: String,
        lower: FieldScalar,
        upper: FieldScalar,
        doc_values: bool,
    },
    /// Ordered term sequence with slop tolerance
    Phrase {
        field: String,
        terms: Vec<String>,
        slop: u32,
    },
    /// Geographic bounding box over a geo-point field
    GeoBoundingBox {
        field: String,
        min_latitude: f64,
        max_latitude: f64,
        min_longitude: f64,
        max_longitude: f64,
    },
    /// Boolean composition
    Bool {
        must: Vec<EngineQuery>,
        should: Vec<EngineQuery>,
        must_not: Vec<EngineQuery>,
        filter: Vec<EngineQuery>,
        minimum_should_match: usize,
    },
}

impl fmt::Display for EngineQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineQuery::MatchAll => write!(f, "*:*"),
            EngineQuery::Term { field, term } => write!(f, "{field}:{term}"),
            EngineQuery::TermsSet { field, terms, .. } => {
                write!(f, "{field}:(")?;
                for (i, term) in terms.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", term.term_string())?;
                }
                write!(f, ")")
            }
            EngineQuery::NumericExact { field, value, .. } => {
                let value = value.term_string();
                write!(f, "{field}:[{value} TO {value}]")
            }
            EngineQuery::NumericRange {
                field,
                lower,
                upper,
                ..
            } => write!(
                f,
                "{field}:[{} TO {}]",
                lower.term_string(),
                upper.term_string()
            ),
            EngineQuery::Phrase { field, terms, slop } => {
                write!(f, "{field}:\"{}\"", terms.join(" "))?;
                if *slop > 0 {
                    write!(f, "~{slop}")?;
                }
                Ok(())
            }
            EngineQuery::GeoBoundingBox {
                field,
                min_latitude,
                max_latitude,
                min_longitude,
                max_longitude,
            } => write!(
                f,
                "{field}:[{min_latitude},{min_longitude} TO {max_latitude},{max_longitude}]"
            ),
            EngineQuery::Bool {
                must,
                should,
                must_not,
                filter,
                ..
            } => {
                let mut parts = Vec::new();
                for query in must {
                    parts.push(format!("+({query})"));
                }
                for query in should {
                    parts.push(format!("({query})"));
                }
                for query in must_not {
                    parts.push(format!("-({query})"));
                }
                for query in filter {
                    parts.push(format!("#({query})"));
                }
                write!(f, "{}", parts.join(" "))
            }
        }
    }
}
