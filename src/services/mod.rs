pub mod announcements;
pub mod filters;
pub mod formatter;
pub mod http;
pub mod metrics;
pub mod single_flight;
