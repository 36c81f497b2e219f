pub mod admin;

// Re-export handler functions for use in routing
pub use admin::waitlist_summary;
