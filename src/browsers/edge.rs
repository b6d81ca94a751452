//! Microsoft Edge adapter.
//!
//! Edge is Chromium-based, so the cookie schema matches Chrome's; only the
//! directory layout and process names differ.

use crate::browsers::{AdapterContext, BrowserAdapter, BrowserKind, BrowserTarget, ExpiryEpoch};

pub const TARGET: BrowserTarget = BrowserTarget {
    kind: BrowserKind::Edge,
    display_name: "Edge",
    process_names: &["msedge", "Microsoft Edge"],
    table: "cookies",
    host_column: "host_key",
    expiry_column: "expires_utc",
    expiry_epoch: ExpiryEpoch::Chromium,
};

#[derive(Debug)]
pub struct Edge {
    ctx: AdapterContext,
}

impl Edge {
    pub fn new(ctx: AdapterContext) -> Self {
        Self { ctx }
    }
}

impl BrowserAdapter for Edge {
    fn target(&self) -> &'static BrowserTarget {
        &TARGET
    }

    fn context(&self) -> &AdapterContext {
        &self.ctx
    }
}
