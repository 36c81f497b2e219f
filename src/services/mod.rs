pub mod admin_auth;

pub use admin_auth::{
    AdminAuthService, AdminSession, AuthGateError, Identity, IdentityError, IdentityProvider,
    StaticIdentityProvider,
};
