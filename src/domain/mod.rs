//! Domain value objects.
//!
//! Type-safe wrappers for document names, email addresses and phone numbers.
//! Each one validates at construction so request handlers can reject bad
//! input before any document is touched.

pub mod doc_name;
pub mod email;
pub mod errors;
pub mod phone;

pub use doc_name::DocName;
pub use email::EmailAddress;
pub use errors::ValidationError;
pub use phone::PhoneNumber;
