//! Telemetry core for the pickleball live-analytics dashboard.
//!
//! The modules turn the loosely shaped `live_stats` payloads emitted by the
//! video-processing backend into a stable, fully defaulted view model the
//! dashboard panels can render without defensive checks, and provide the
//! store and poll bookkeeping that keep out-of-order poll completions from
//! tearing the displayed snapshot.

pub mod court;
pub mod live_stats;
pub mod metrics;
pub mod normalize;
pub mod poll;
pub mod store;
pub mod view;

pub use normalize::normalize;
pub use store::TelemetryStore;
pub use view::ViewModel;
