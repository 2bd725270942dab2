pub mod raw;
pub mod status;

pub use raw::{
    RawKitchen, RawLiveStats, RawOperational, RawRally, RawSpatial, RawTelemetry, RawZoneCounts,
};
pub use status::JobStatus;
