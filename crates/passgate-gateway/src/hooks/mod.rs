//! Hook chain: ordered authorization stages run for every tracker request.
//!
//! Hooks are declared in config by tag and resolved once at startup through
//! `build_hook`; nothing registers itself globally.

pub mod passkey_approval;

use std::sync::Arc;

use async_trait::async_trait;

use passgate_core::error::Result;
use passgate_core::{Outcome, RequestContext, TrackerRequest};

use crate::config::HookConfig;
use crate::obs::GatewayMetrics;

pub use passkey_approval::PasskeyApproval;

/// One authorization stage.
#[async_trait]
pub trait Hook: Send + Sync {
    fn name(&self) -> &'static str;

    async fn handle_announce(&self, req: &TrackerRequest, ctx: &mut RequestContext) -> Outcome;

    /// Scrapes pass through unless a hook says otherwise.
    async fn handle_scrape(&self, _req: &TrackerRequest, _ctx: &mut RequestContext) -> Outcome {
        Outcome::Approved
    }
}

/// Resolve a configured hook by its tag.
pub fn build_hook(cfg: &HookConfig, metrics: Arc<GatewayMetrics>) -> Result<Arc<dyn Hook>> {
    match cfg {
        HookConfig::PasskeyApproval(opts) => {
            Ok(Arc::new(PasskeyApproval::from_config(opts.clone(), metrics)?))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Announce,
    Scrape,
}

impl RequestKind {
    fn as_str(self) -> &'static str {
        match self {
            RequestKind::Announce => "announce",
            RequestKind::Scrape => "scrape",
        }
    }
}

/// Ordered hooks; the first non-approved outcome stops the chain.
pub struct HookChain {
    hooks: Vec<Arc<dyn Hook>>,
    metrics: Arc<GatewayMetrics>,
}

impl HookChain {
    pub fn new(hooks: Vec<Arc<dyn Hook>>, metrics: Arc<GatewayMetrics>) -> Self {
        Self { hooks, metrics }
    }

    pub fn from_config(cfgs: &[HookConfig], metrics: Arc<GatewayMetrics>) -> Result<Self> {
        let hooks = cfgs
            .iter()
            .map(|c| build_hook(c, Arc::clone(&metrics)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(hooks, metrics))
    }

    pub fn hook_names(&self) -> Vec<&'static str> {
        self.hooks.iter().map(|h| h.name()).collect()
    }

    /// Run every hook for one request and return the enriched context.
    pub async fn run(&self, kind: RequestKind, req: &TrackerRequest) -> (RequestContext, Outcome) {
        let mut ctx = RequestContext::new();

        for hook in &self.hooks {
            let outcome = match kind {
                RequestKind::Announce => hook.handle_announce(req, &mut ctx).await,
                RequestKind::Scrape => hook.handle_scrape(req, &mut ctx).await,
            };
            self.metrics.outcomes.inc(&[
                ("hook", hook.name()),
                ("kind", kind.as_str()),
                ("outcome", outcome.as_str()),
            ]);

            if !outcome.is_approved() {
                tracing::debug!(hook = hook.name(), kind = kind.as_str(), outcome = outcome.as_str(), "request rejected");
                return (ctx, outcome);
            }
        }

        (ctx, Outcome::Approved)
    }
}
