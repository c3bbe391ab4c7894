// Data definitions shared across the crate.

// `settings.json` contents.
pub mod app_config;
// Static sidecar table and installed-binary records.
pub mod sidecar;
// Release URLs for downloadable sidecars.
pub mod sources;
