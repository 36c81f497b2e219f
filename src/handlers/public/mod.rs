pub mod login;
pub mod waitlist;

// Re-export handler functions for use in routing
pub use login::login as admin_login;
pub use waitlist::submit as waitlist_submit;
