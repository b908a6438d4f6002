//! Stop conditions: declarative per-session termination predicates.
//!
//! A [`StopCondition`] names a metric in a session's reported statistics and
//! pairs it with a [`Comparison`] such as `> 40`. The external driver checks
//! conditions against each stats snapshot it records and ends the session
//! once one is met.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::TuneError;
use crate::session::StatsSnapshot;

/// Symbolic comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareOp {
    Gt,
    Ge,
    Lt,
    Le,
    Eq,
    Ne,
}

impl CompareOp {
    pub fn apply(&self, lhs: f64, rhs: f64) -> bool {
        match self {
            Self::Gt => lhs > rhs,
            Self::Ge => lhs >= rhs,
            Self::Lt => lhs < rhs,
            Self::Le => lhs <= rhs,
            Self::Eq => lhs == rhs,
            Self::Ne => lhs != rhs,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Eq => "==",
            Self::Ne => "!=",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for CompareOp {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ">" => Ok(Self::Gt),
            ">=" => Ok(Self::Ge),
            "<" => Ok(Self::Lt),
            "<=" => Ok(Self::Le),
            "==" => Ok(Self::Eq),
            "!=" => Ok(Self::Ne),
            _ => Err(()),
        }
    }
}

/// An operator plus threshold, parsed from expressions like `"> 40"`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub op: CompareOp,
    pub threshold: f64,
}

impl Comparison {
    pub fn new(op: CompareOp, threshold: f64) -> Self {
        Self { op, threshold }
    }

    /// Apply the comparison to an observed metric value.
    pub fn evaluate(&self, value: f64) -> bool {
        self.op.apply(value, self.threshold)
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.op, self.threshold)
    }
}

impl FromStr for Comparison {
    type Err = TuneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let op_token = parts.next().ok_or_else(|| TuneError::Comparison {
            expr: s.to_string(),
            reason: "empty expression".to_string(),
        })?;
        let op = CompareOp::from_str(op_token).map_err(|_| TuneError::Comparison {
            expr: s.to_string(),
            reason: format!("unknown operator {op_token:?}"),
        })?;
        let threshold_token = parts.next().ok_or_else(|| TuneError::Comparison {
            expr: s.to_string(),
            reason: "missing threshold".to_string(),
        })?;
        let threshold: f64 = threshold_token.parse().map_err(|_| TuneError::Comparison {
            expr: s.to_string(),
            reason: format!("threshold {threshold_token:?} is not a number"),
        })?;
        if parts.next().is_some() {
            return Err(TuneError::Comparison {
                expr: s.to_string(),
                reason: "trailing tokens after threshold".to_string(),
            });
        }
        Ok(Self { op, threshold })
    }
}

/// A termination predicate over one metric of a session's reported stats.
///
/// Immutable after creation; owned by the [`TrainingData`](crate::TrainingData)
/// it is attached to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopCondition {
    /// Key into a session's reported statistics (e.g. "episode_length").
    pub metric: String,
    pub comparison: Comparison,
}

impl StopCondition {
    pub fn new(metric: impl Into<String>, comparison: Comparison) -> Self {
        Self {
            metric: metric.into(),
            comparison,
        }
    }

    /// Parse a condition from a metric name and a comparison expression
    /// such as `"> 40"`.
    pub fn parse(metric: impl Into<String>, expr: &str) -> Result<Self, TuneError> {
        Ok(Self {
            metric: metric.into(),
            comparison: expr.parse()?,
        })
    }

    /// True if the snapshot reports the metric and the comparison holds.
    /// A snapshot that does not report the metric never satisfies the
    /// condition.
    pub fn is_met(&self, stats: &StatsSnapshot) -> bool {
        stats
            .get(&self.metric)
            .is_some_and(|value| self.comparison.evaluate(*value))
    }
}

impl fmt::Display for StopCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.metric, self.comparison)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn parse_simple_expression() {
        let cond = StopCondition::parse("episode_length", "> 40").unwrap();
        assert_eq!(cond.metric, "episode_length");
        assert_eq!(cond.comparison.op, CompareOp::Gt);
        assert_eq!(cond.comparison.threshold, 40.0);
    }

    #[test]
    fn parse_all_operators() {
        for (expr, op) in [
            ("> 1", CompareOp::Gt),
            (">= 1", CompareOp::Ge),
            ("< 1", CompareOp::Lt),
            ("<= 1", CompareOp::Le),
            ("== 1", CompareOp::Eq),
            ("!= 1", CompareOp::Ne),
        ] {
            let cmp: Comparison = expr.parse().unwrap();
            assert_eq!(cmp.op, op, "expr: {expr}");
        }
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(Comparison::from_str("").is_err());
        assert!(Comparison::from_str(">> 40").is_err());
        assert!(Comparison::from_str("> forty").is_err());
        assert!(Comparison::from_str("> 40 extra").is_err());
    }

    #[test]
    fn evaluation_against_snapshot() {
        let cond = StopCondition::parse("episode_length", "> 40").unwrap();

        let mut stats: StatsSnapshot = HashMap::new();
        stats.insert("episode_length".to_string(), 41.0);
        assert!(cond.is_met(&stats));

        stats.insert("episode_length".to_string(), 40.0);
        assert!(!cond.is_met(&stats));

        // Metric absent from the snapshot
        let empty: StatsSnapshot = HashMap::new();
        assert!(!cond.is_met(&empty));
    }

    #[test]
    fn display_round_trip() {
        let cmp: Comparison = ">= 0.5".parse().unwrap();
        let again: Comparison = cmp.to_string().parse().unwrap();
        assert_eq!(cmp, again);
    }

    #[test]
    fn serde_round_trip() {
        let cond = StopCondition::parse("reward", "<= 100").unwrap();
        let json = serde_json::to_string(&cond).unwrap();
        let back: StopCondition = serde_json::from_str(&json).unwrap();
        assert_eq!(cond, back);
    }
}
