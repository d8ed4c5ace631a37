//! Consensus aggregation
//!
//! A consensus mechanism is a `"filter:method"` pair such as `"mad:mean"`.
//! The filter narrows the provider values, the method reduces what is left
//! to a single value.
//!
//! ## Filters
//!
//! - `none` - keep everything
//! - `mad` - keep values within one mean absolute deviation of the mean
//! - `majority` - keep the most frequent value(s)
//!
//! ## Methods
//!
//! - `median` - middle value (truncating average for even lengths)
//! - `mean` - truncating integer mean
//! - `random` - one value picked uniformly

pub mod filters;
pub mod methods;

use crate::types::Numeric;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsensusError {
    #[error("Invalid consensus filter: {0}")]
    UnknownFilter(String),
    #[error("Invalid consensus method: {0}")]
    UnknownMethod(String),
    #[error("Consensus method {0} needs at least one value")]
    EmptyInput(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsensusFilter {
    None,
    Mad,
    Majority,
}

impl ConsensusFilter {
    pub fn apply(&self, values: Vec<Numeric>) -> Vec<Numeric> {
        match self {
            ConsensusFilter::None => filters::none(values),
            ConsensusFilter::Mad => filters::mad(values),
            ConsensusFilter::Majority => filters::majority(values),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConsensusFilter::None => "none",
            ConsensusFilter::Mad => "mad",
            ConsensusFilter::Majority => "majority",
        }
    }
}

impl FromStr for ConsensusFilter {
    type Err = ConsensusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(ConsensusFilter::None),
            "mad" => Ok(ConsensusFilter::Mad),
            "majority" => Ok(ConsensusFilter::Majority),
            other => Err(ConsensusError::UnknownFilter(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsensusMethod {
    Median,
    Mean,
    Random,
}

impl ConsensusMethod {
    pub fn apply(&self, values: Vec<Numeric>) -> Result<Numeric, ConsensusError> {
        match self {
            ConsensusMethod::Median => methods::median(values),
            ConsensusMethod::Mean => Ok(methods::mean(values)),
            ConsensusMethod::Random => methods::random(values),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConsensusMethod::Median => "median",
            ConsensusMethod::Mean => "mean",
            ConsensusMethod::Random => "random",
        }
    }
}

impl FromStr for ConsensusMethod {
    type Err = ConsensusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "median" => Ok(ConsensusMethod::Median),
            "mean" => Ok(ConsensusMethod::Mean),
            "random" => Ok(ConsensusMethod::Random),
            other => Err(ConsensusError::UnknownMethod(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsensusMechanism {
    pub filter: ConsensusFilter,
    pub method: ConsensusMethod,
}

impl Default for ConsensusMechanism {
    fn default() -> Self {
        Self {
            filter: ConsensusFilter::Mad,
            method: ConsensusMethod::Mean,
        }
    }
}

impl FromStr for ConsensusMechanism {
    type Err = ConsensusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        unwrap_consensus_mechanism(s)
    }
}

impl fmt::Display for ConsensusMechanism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.filter.as_str(), self.method.as_str())
    }
}

/// Parse a `"filter:method"` string, accepting only known ids
pub fn unwrap_consensus_mechanism(raw: &str) -> Result<ConsensusMechanism, ConsensusError> {
    let mut parts = raw.split(':');
    let filter: ConsensusFilter = parts.next().unwrap_or_default().parse()?;
    let method: ConsensusMethod = parts.next().unwrap_or_default().parse()?;
    Ok(ConsensusMechanism { filter, method })
}

/// `method(filter(values))`
pub fn reach_consensus(
    values: Vec<Numeric>,
    mechanism: &ConsensusMechanism,
) -> Result<Numeric, ConsensusError> {
    mechanism.method.apply(mechanism.filter.apply(values))
}

/// Parse the mechanism first, then reduce
///
/// A bad filter or method id fails before any value is touched.
pub fn reach_consensus_str(values: Vec<Numeric>, mechanism: &str) -> Result<Numeric, ConsensusError> {
    let mechanism = unwrap_consensus_mechanism(mechanism)?;
    reach_consensus(values, &mechanism)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nums(raw: &[i64]) -> Vec<Numeric> {
        raw.iter().map(|v| Numeric::from(*v)).collect()
    }

    #[test]
    fn test_unwrap_mechanism() {
        let mechanism = unwrap_consensus_mechanism("mad:mean").unwrap();
        assert_eq!(mechanism, ConsensusMechanism::default());
        assert_eq!(mechanism.to_string(), "mad:mean");

        let mechanism = unwrap_consensus_mechanism("majority:median").unwrap();
        assert_eq!(mechanism.filter, ConsensusFilter::Majority);
        assert_eq!(mechanism.method, ConsensusMethod::Median);
    }

    #[test]
    fn test_unwrap_mechanism_rejects_unknown_ids() {
        assert_eq!(
            unwrap_consensus_mechanism("trimmed:mean"),
            Err(ConsensusError::UnknownFilter("trimmed".to_string()))
        );
        assert_eq!(
            unwrap_consensus_mechanism("mad:mode"),
            Err(ConsensusError::UnknownMethod("mode".to_string()))
        );
        assert_eq!(
            unwrap_consensus_mechanism("mad"),
            Err(ConsensusError::UnknownMethod(String::new()))
        );
        assert!(unwrap_consensus_mechanism("MAD:MEAN").is_err());
    }

    #[test]
    fn test_reach_consensus() {
        let values = nums(&[10, 20, 30, 40, 50, 60, 70, 80, 90, 100]);
        // mad keeps 30..=80, mean of those is 55
        assert_eq!(
            reach_consensus_str(values.clone(), "mad:mean").unwrap(),
            Numeric::from(55)
        );
        assert_eq!(
            reach_consensus_str(values, "none:median").unwrap(),
            Numeric::from(55)
        );
        assert_eq!(
            reach_consensus_str(nums(&[7, 7, 9]), "majority:mean").unwrap(),
            Numeric::from(7)
        );
    }

    #[test]
    fn test_reach_consensus_bad_mechanism_fails_first() {
        // An empty list would make median fail; the unknown filter must win
        assert_eq!(
            reach_consensus_str(vec![], "bogus:median"),
            Err(ConsensusError::UnknownFilter("bogus".to_string()))
        );
        assert_eq!(
            reach_consensus_str(nums(&[1]), "none:bogus"),
            Err(ConsensusError::UnknownMethod("bogus".to_string()))
        );
    }
}
