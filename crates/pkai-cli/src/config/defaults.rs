use pkai::engine::config::{DEFAULT_CUTOFF_RADIUS, UnmappedPolicy};
use pkai::model::registry::DEFAULT_MODEL;

pub struct DefaultsConfig {
    pub model: String,
    pub load_retries: u32,
    pub retry_delay_ms: u64,
    pub cutoff_radius: f64,
    pub unmapped_policy: UnmappedPolicy,
    pub max_atoms: Option<usize>,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            load_retries: 2,
            retry_delay_ms: 500,
            cutoff_radius: DEFAULT_CUTOFF_RADIUS,
            unmapped_policy: UnmappedPolicy::Fail,
            max_atoms: None,
        }
    }
}
