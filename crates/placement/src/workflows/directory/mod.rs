//! Student directory: registration, roster import, and eligibility previews.

pub mod domain;
pub mod repository;
pub mod roster;
pub mod router;
pub mod service;

pub use domain::{Student, Usn};
pub use repository::StudentRepository;
pub use roster::{RosterCandidate, RosterImportError};
pub use router::directory_router;
pub use service::{
    DirectoryError, DirectoryService, NewStudent, RosterImportSummary, StudentUpdate,
};
