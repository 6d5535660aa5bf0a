/// Route component constants shared across crates
pub const API_ROUTE_COMPONENT: &str = "api";
pub const API_ROUTE_PREFIX: &str = const_str::concat!("/", API_ROUTE_COMPONENT);

pub const APP_ROUTE_COMPONENT: &str = "app";
pub const APP_ROUTE_PREFIX: &str = const_str::concat!(API_ROUTE_PREFIX, "/", APP_ROUTE_COMPONENT);

pub const REPEAT_ROUTE_COMPONENT: &str = "repeat";
pub const REPEAT_ROUTE_PREFIX: &str =
    const_str::concat!(APP_ROUTE_PREFIX, "/", REPEAT_ROUTE_COMPONENT);

/// Upper bound on preview length when a series has no occurrence count.
pub const PREVIEW_CAP: u32 = 52;

/// Number of preview dates the meeting dialog lists before summarising.
pub const PREVIEW_SHOWN: usize = 10;

/// Occurrence count assumed when `endType = after` arrives without one.
pub const DEFAULT_OCCURRENCES: u32 = 10;

/// Largest `occurrences` a client may request for an `after` series.
pub const MAX_OCCURRENCES: u32 = 365;
