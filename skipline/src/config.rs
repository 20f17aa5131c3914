use std::fmt;
use std::str::FromStr;

use derivative::Derivative;
use thiserror::Error;

#[derive(Clone, Debug, Derivative, PartialEq)]
#[derivative(Default)]
pub struct BvhConfig {
    pub builder: BuilderKind,
    pub sah: SahParams,

    /// Whether to run the verifier between building and linking the tree.
    #[derivative(Default(value = "true"))]
    pub verify: bool,
}

impl BvhConfig {
    pub fn with_builder(mut self, builder: BuilderKind) -> Self {
        self.builder = builder;
        self
    }

    pub fn with_sah(mut self, sah: SahParams) -> Self {
        self.sah = sah;
        self
    }

    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.sah.validate()
    }
}

/// Cost model used by the SAH builder.
#[derive(Clone, Copy, Debug, Derivative, PartialEq)]
#[derivative(Default)]
pub struct SahParams {
    /// Cost of a single traversal step (`Ct`)
    #[derivative(Default(value = "1.0"))]
    pub traversal_cost: f32,

    /// Cost of a single ray-triangle test (`Ci`)
    #[derivative(Default(value = "1.0"))]
    pub intersection_cost: f32,

    /// Upper bound on how many split positions get evaluated per axis; larger
    /// subsets get sampled with a proportionally larger stride.
    #[derivative(Default(value = "60"))]
    pub max_split_candidates: usize,
}

impl SahParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, cost) in [
            ("traversal_cost", self.traversal_cost),
            ("intersection_cost", self.intersection_cost),
        ] {
            if !cost.is_finite() || cost <= 0.0 {
                return Err(ConfigError::InvalidCost { name, cost });
            }
        }

        if self.max_split_candidates == 0 {
            return Err(ConfigError::NoSplitCandidates);
        }

        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BuilderKind {
    /// Top-down partitioning driven by the surface area heuristic
    #[default]
    Sah,

    /// Bottom-up, greedy pairing of the nodes with smallest combined area
    Clustering,
}

impl FromStr for BuilderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sah" => Ok(Self::Sah),
            "clustering" => Ok(Self::Clustering),
            _ => Err(ConfigError::UnknownBuilder(s.to_owned())),
        }
    }
}

impl fmt::Display for BuilderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuilderKind::Sah => write!(f, "sah"),
            BuilderKind::Clustering => write!(f, "clustering"),
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("unknown builder `{0}` (expected `sah` or `clustering`)")]
    UnknownBuilder(String),

    #[error("`{name}` must be positive and finite, got {cost}")]
    InvalidCost { name: &'static str, cost: f32 },

    #[error("`max_split_candidates` must be at least one")]
    NoSplitCandidates,
}
