//! Site server for the artwork browsing frontend.
//!
//! Serves the pages that embed the external viewer widget, proxies the
//! collection API with stale-while-revalidate caching, and keeps a kiosk
//! channel that returns idle displays to the attract screen.

pub mod kiosk;
pub mod proxy;
pub mod server;

pub use kiosk::{ClientEvent, KioskMessage, KioskSession};
pub use proxy::{Freshness, ProxyConfig, SwrCache};
pub use server::{FeaturedItem, KioskConfig, ServerError, SiteConfig, SiteServer};
