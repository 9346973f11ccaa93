//! Exact-equality grouping keys for numeric observations.
//!
//! Conditional expectations group paths whose observations are *identical*.
//! Integers are their own key. Floats are keyed on their bit pattern so that
//! two partial sums only share a group when they are stored identically; the
//! sole normalization is `-0.0 == +0.0`.

use std::fmt::Debug;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A numeric cell that can be grouped on exactly and averaged.
pub trait Observation: Copy {
    /// Hashable key with exact equality semantics.
    type Key: Eq + Hash + Clone + Debug;

    /// Key used to group this observation.
    fn key(self) -> Self::Key;

    /// Value used when averaging.
    fn value(self) -> f64;

    /// Numeric value represented by a key.
    fn key_value(key: &Self::Key) -> f64;
}

macro_rules! integer_observation {
    ($($ty:ty),*) => {
        $(
            impl Observation for $ty {
                type Key = $ty;

                fn key(self) -> Self::Key {
                    self
                }

                fn value(self) -> f64 {
                    self as f64
                }

                fn key_value(key: &Self::Key) -> f64 {
                    *key as f64
                }
            }
        )*
    };
}

integer_observation!(i8, i32, i64, i128);

/// `f64` wrapper compared and hashed on its bit pattern.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ExactF64(f64);

impl ExactF64 {
    #[must_use]
    pub fn new(value: f64) -> Self {
        // fold -0.0 into +0.0; every other value keeps its exact bits
        if value == 0.0 {
            Self(0.0)
        } else {
            Self(value)
        }
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<f64> for ExactF64 {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl PartialEq for ExactF64 {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for ExactF64 {}

impl Hash for ExactF64 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl Observation for f64 {
    type Key = ExactF64;

    fn key(self) -> Self::Key {
        ExactF64::new(self)
    }

    fn value(self) -> f64 {
        self
    }

    fn key_value(key: &Self::Key) -> f64 {
        key.value()
    }
}
