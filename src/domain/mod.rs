pub mod email;
pub mod entry;
pub mod name;

pub use email::{redact_email, EmailAddress};
pub use entry::{
    validate_field, validate_form, validate_request, Audience, CompanySize, Field, FieldErrors,
    FormValues, HiresPerYear, Industry, NewWaitlistEntry, WaitlistRequest,
};
pub use name::FullName;
