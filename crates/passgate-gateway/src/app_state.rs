//! Shared application state for the passgate gateway.
//!
//! Built once at startup: config, metrics registry and the resolved hook
//! chain. Startup errors are returned, not panicked.

use std::sync::Arc;

use passgate_core::error::Result;

use crate::config::PassgateConfig;
use crate::hooks::HookChain;
use crate::obs::GatewayMetrics;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: PassgateConfig,
    chain: HookChain,
    metrics: Arc<GatewayMetrics>,
}

impl AppState {
    pub fn new(cfg: PassgateConfig) -> Result<Self> {
        let metrics = Arc::new(GatewayMetrics::new());
        let chain = HookChain::from_config(&cfg.hooks, Arc::clone(&metrics))?;
        Ok(Self::with_chain(cfg, chain, metrics))
    }

    /// Assemble from an already built chain (tests, embedding).
    pub fn with_chain(cfg: PassgateConfig, chain: HookChain, metrics: Arc<GatewayMetrics>) -> Self {
        tracing::info!(hooks = ?chain.hook_names(), "hook chain ready");
        Self {
            inner: Arc::new(AppStateInner { cfg, chain, metrics }),
        }
    }

    pub fn cfg(&self) -> &PassgateConfig {
        &self.inner.cfg
    }

    pub fn chain(&self) -> &HookChain {
        &self.inner.chain
    }

    pub fn metrics(&self) -> &GatewayMetrics {
        &self.inner.metrics
    }
}
