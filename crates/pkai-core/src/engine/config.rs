use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Default radius, in Angstroms, of the sphere around a site's reference atoms.
pub const DEFAULT_CUTOFF_RADIUS: f64 = 15.0;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{parameter}': {reason}")]
    InvalidValue {
        parameter: &'static str,
        reason: String,
    },
}

/// What to do with an environment atom that cannot be encoded: its class is
/// not in the catalog, or it coincides with a reference atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnmappedPolicy {
    /// Abort encoding of the site with an error naming the atom.
    #[default]
    Fail,
    /// Drop the atom from the environment and log a warning.
    Skip,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown unmapped-class policy '{0}'. Expected 'fail' or 'skip'.")]
pub struct ParseUnmappedPolicyError(pub String);

impl FromStr for UnmappedPolicy {
    type Err = ParseUnmappedPolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fail" => Ok(UnmappedPolicy::Fail),
            "skip" => Ok(UnmappedPolicy::Skip),
            _ => Err(ParseUnmappedPolicyError(s.to_string())),
        }
    }
}

impl fmt::Display for UnmappedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UnmappedPolicy::Fail => "fail",
            UnmappedPolicy::Skip => "skip",
        })
    }
}

/// Parameters of the feature pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionConfig {
    /// Environment cutoff radius in Angstroms.
    pub cutoff_radius: f64,
    /// Handling of environment atoms without a catalog class.
    pub unmapped_policy: UnmappedPolicy,
    /// Upper bound on the number of retained atoms; `None` disables the check.
    pub max_atoms: Option<usize>,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            cutoff_radius: DEFAULT_CUTOFF_RADIUS,
            unmapped_policy: UnmappedPolicy::default(),
            max_atoms: None,
        }
    }
}

#[derive(Default)]
pub struct PredictionConfigBuilder {
    cutoff_radius: Option<f64>,
    unmapped_policy: Option<UnmappedPolicy>,
    max_atoms: Option<usize>,
}

impl PredictionConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cutoff_radius(mut self, radius: f64) -> Self {
        self.cutoff_radius = Some(radius);
        self
    }
    pub fn unmapped_policy(mut self, policy: UnmappedPolicy) -> Self {
        self.unmapped_policy = Some(policy);
        self
    }
    pub fn max_atoms(mut self, max_atoms: Option<usize>) -> Self {
        self.max_atoms = max_atoms;
        self
    }

    pub fn build(self) -> Result<PredictionConfig, ConfigError> {
        let cutoff_radius = self
            .cutoff_radius
            .ok_or(ConfigError::MissingParameter("cutoff_radius"))?;
        if !cutoff_radius.is_finite() || cutoff_radius <= 0.0 {
            return Err(ConfigError::InvalidValue {
                parameter: "cutoff_radius",
                reason: format!("must be a finite positive number, got {}", cutoff_radius),
            });
        }
        if self.max_atoms == Some(0) {
            return Err(ConfigError::InvalidValue {
                parameter: "max_atoms",
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(PredictionConfig {
            cutoff_radius,
            unmapped_policy: self.unmapped_policy.unwrap_or_default(),
            max_atoms: self.max_atoms,
        })
    }
}
