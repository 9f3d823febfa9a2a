pub mod assessments;
pub mod directory;
pub mod drives;
pub mod interviews;
pub mod notifications;
pub mod reporting;
