//! Placement drives: eligibility evaluation, candidate ranking, and the
//! publish/shortlist lifecycle.

pub mod domain;
pub mod eligibility;
pub mod ranking;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicationStatus, Drive, DriveApplication, DriveId, DriveStatus, EligibilityCriteria,
    RankingTier,
};
pub use eligibility::{eligible_set, evaluate, EligibilityVerdict};
pub use ranking::{rank, RankedCandidate};
pub use repository::DriveRepository;
pub use router::drive_router;
pub use service::{
    DriveEligibilityView, DriveService, DriveServiceError, DriveUpdate, NewDrive, PublishOutcome,
    ShortlistOutcome, StatusChange,
};
