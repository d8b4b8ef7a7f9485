//! Uniform and weighted selection over blended candidates.
//!
//! Randomness comes in through [`RandomSource`] so callers decide where the
//! draws come from: any `rand` generator in production, a seeded `StdRng`
//! or a scripted sequence in tests.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use rand::{Rng, RngCore};

use super::table::Attribute;
use crate::error::ShiftError;

/// Night bias for the `next` attribute. Unlisted moods weigh 1.
const NIGHT_WEIGHTS: [(&str, f64); 4] = [
    ("calm", 2.0),
    ("rested", 2.0),
    ("grounded", 1.5),
    ("uplifted", 1.0),
];

static NIGHT: Lazy<SelectionWeights> = Lazy::new(|| SelectionWeights {
    weights: NIGHT_WEIGHTS
        .iter()
        .map(|&(value, weight)| (value.to_string(), weight))
        .collect(),
});

/// Uniform draws in `[0, 1)`.
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;
}

impl<R: RngCore> RandomSource for R {
    fn next_unit(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Candidate value to weight. Weights are validated on construction, so a
/// built table only ever holds finite, strictly positive values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionWeights {
    weights: HashMap<String, f64>,
}

impl SelectionWeights {
    pub fn new<I, K>(pairs: I) -> Result<Self, ShiftError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let mut weights = HashMap::new();
        for (value, weight) in pairs {
            let value = value.into();
            if !weight.is_finite() || weight <= 0.0 {
                return Err(ShiftError::InvalidWeight { value, weight });
            }
            weights.insert(value, weight);
        }
        Ok(Self { weights })
    }

    pub fn night() -> &'static Self {
        &NIGHT
    }

    pub fn weight_of(&self, candidate: &str) -> f64 {
        self.weights.get(candidate).copied().unwrap_or(1.0)
    }
}

/// Pick one candidate, weighted when `weights` is given, uniform otherwise.
pub fn pick<'a, R>(
    attribute: Attribute,
    candidates: &'a [String],
    weights: Option<&SelectionWeights>,
    rng: &mut R,
) -> Result<&'a str, ShiftError>
where
    R: RandomSource + ?Sized,
{
    match weights {
        Some(weights) => pick_weighted(attribute, candidates, weights, rng),
        None => pick_uniform(attribute, candidates, rng),
    }
}

pub fn pick_uniform<'a, R>(
    attribute: Attribute,
    candidates: &'a [String],
    rng: &mut R,
) -> Result<&'a str, ShiftError>
where
    R: RandomSource + ?Sized,
{
    if candidates.is_empty() {
        return Err(ShiftError::EmptyCandidates {
            attribute: attribute.as_str(),
        });
    }
    let idx = (rng.next_unit() * candidates.len() as f64) as usize;
    Ok(&candidates[idx.min(candidates.len() - 1)])
}

/// Subtractive walk: `r = u * total`, then `r -= w` per candidate until
/// `r < 0`. A draw landing exactly on a boundary goes to the later
/// candidate. Rounding residue past the end falls to the last candidate.
pub fn pick_weighted<'a, R>(
    attribute: Attribute,
    candidates: &'a [String],
    weights: &SelectionWeights,
    rng: &mut R,
) -> Result<&'a str, ShiftError>
where
    R: RandomSource + ?Sized,
{
    let Some(last) = candidates.last() else {
        return Err(ShiftError::EmptyCandidates {
            attribute: attribute.as_str(),
        });
    };

    let total: f64 = candidates.iter().map(|c| weights.weight_of(c)).sum();
    let mut r = rng.next_unit() * total;
    for candidate in candidates {
        r -= weights.weight_of(candidate);
        if r < 0.0 {
            return Ok(candidate);
        }
    }
    Ok(last)
}
