//! Firefox adapter.
//!
//! Firefox stores cookies in `moz_cookies` inside the profile's
//! `cookies.sqlite`, with Unix-second expiry.

use crate::browsers::{AdapterContext, BrowserAdapter, BrowserKind, BrowserTarget, ExpiryEpoch};

pub const TARGET: BrowserTarget = BrowserTarget {
    kind: BrowserKind::Firefox,
    display_name: "Firefox",
    process_names: &["firefox"],
    table: "moz_cookies",
    host_column: "host",
    expiry_column: "expiry",
    expiry_epoch: ExpiryEpoch::Unix,
};

#[derive(Debug)]
pub struct Firefox {
    ctx: AdapterContext,
}

impl Firefox {
    pub fn new(ctx: AdapterContext) -> Self {
        Self { ctx }
    }
}

impl BrowserAdapter for Firefox {
    fn target(&self) -> &'static BrowserTarget {
        &TARGET
    }

    fn context(&self) -> &AdapterContext {
        &self.ctx
    }
}
