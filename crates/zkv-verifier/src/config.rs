//! Runtime limits of a [`crate::StarkVerifier`].

use zkv_stark::params::{DEFAULT_MAX_PROOF_BYTES, DEFAULT_MAX_VK_BYTES};

/// Size limits and parallelism.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifierConfig {
    /// Largest accepted proof envelope, in bytes.
    pub max_proof_bytes: usize,
    /// Largest accepted verification-key envelope, in bytes.
    pub max_vk_bytes: usize,
    /// Check queries on the rayon pool (needs the `parallel` feature).
    pub parallel: bool,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            max_proof_bytes: DEFAULT_MAX_PROOF_BYTES,
            max_vk_bytes: DEFAULT_MAX_VK_BYTES,
            parallel: cfg!(feature = "parallel"),
        }
    }
}

impl VerifierConfig {
    /// Set the proof size limit.
    #[must_use]
    pub const fn with_max_proof_bytes(mut self, n: usize) -> Self {
        self.max_proof_bytes = n;
        self
    }

    /// Set the key size limit.
    #[must_use]
    pub const fn with_max_vk_bytes(mut self, n: usize) -> Self {
        self.max_vk_bytes = n;
        self
    }

    /// Enable or disable parallel query checks.
    #[must_use]
    pub const fn with_parallel(mut self, on: bool) -> Self {
        self.parallel = on;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let c = VerifierConfig::default()
            .with_max_proof_bytes(1024)
            .with_max_vk_bytes(64)
            .with_parallel(false);
        assert_eq!(c.max_proof_bytes, 1024);
        assert_eq!(c.max_vk_bytes, 64);
        assert!(!c.parallel);
        assert_eq!(VerifierConfig::default().max_vk_bytes, DEFAULT_MAX_VK_BYTES);
    }
}
