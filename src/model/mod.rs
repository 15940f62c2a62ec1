//! Typed document schema and the store's wire envelope.

pub mod contents;
pub mod document;
pub mod member;
pub mod registration;
pub mod submission;

pub use document::{Document, DocumentConfig};
pub use member::{Availability, Day, Member, TimeSlot};
pub use registration::{RegistrationApplication, RegistrationStatus};
pub use submission::{MemberSubmission, RegistrationSubmission};
