//! Stand-in gateway for a provider that could not be set up
//!
//! Lets the calculator start without a working AI service: the health check
//! fails (so the surface shows the usual warning) and every prompt fails with
//! the reason the real gateway could not be built.

use async_trait::async_trait;

use super::traits::{AiGateway, CalculationResult, RemoteFailure};

/// Gateway that answers every prompt with a failure
#[derive(Clone, Debug)]
pub struct UnavailableGateway {
    provider: &'static str,
    missing_key: bool,
    reason: String,
}

impl UnavailableGateway {
    /// Remember why `provider` could not be built
    #[must_use]
    pub fn new(provider: &'static str, failure: &RemoteFailure) -> Self {
        Self {
            provider,
            missing_key: matches!(failure, RemoteFailure::MissingApiKey { .. }),
            reason: failure.to_string(),
        }
    }

    /// Why the real gateway is missing
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

#[async_trait]
impl AiGateway for UnavailableGateway {
    fn name(&self) -> &str {
        self.provider
    }

    async fn health_check(&self) -> bool {
        false
    }

    async fn solve(&self, _prompt: &str) -> Result<CalculationResult, RemoteFailure> {
        if self.missing_key {
            return Err(RemoteFailure::MissingApiKey {
                provider: self.provider,
            });
        }
        Err(RemoteFailure::Unavailable {
            provider: self.provider,
            reason: self.reason.clone(),
        })
    }
}
