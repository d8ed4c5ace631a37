//! Consensus methods: reduce a filtered list of values to one value

use super::ConsensusError;
use crate::types::Numeric;
use num_traits::Zero;
use rand::Rng;

/// Middle value of the sorted list
///
/// For an even length this is the average of the two central values with
/// the remainder dropped (`(20 + 30) / 2 = 25`, `(20 + 31) / 2 = 25`).
/// Published feeds depend on that truncation.
pub fn median(mut values: Vec<Numeric>) -> Result<Numeric, ConsensusError> {
    if values.is_empty() {
        return Err(ConsensusError::EmptyInput("median"));
    }

    values.sort();
    let middle = values.len() / 2;

    if values.len() % 2 == 0 {
        Ok((&values[middle - 1] + &values[middle]) / Numeric::from(2))
    } else {
        Ok(values.swap_remove(middle))
    }
}

/// Truncating integer mean; zero for an empty list
pub fn mean(values: Vec<Numeric>) -> Numeric {
    if values.is_empty() {
        return Numeric::zero();
    }

    let count = Numeric::from(values.len());
    values.into_iter().fold(Numeric::zero(), |acc, v| acc + v) / count
}

/// Uniformly pick one of the values
pub fn random(mut values: Vec<Numeric>) -> Result<Numeric, ConsensusError> {
    if values.is_empty() {
        return Err(ConsensusError::EmptyInput("random"));
    }

    let index = rand::thread_rng().gen_range(0..values.len());
    Ok(values.swap_remove(index))
}
