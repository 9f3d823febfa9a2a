use std::io::Read;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::storage::RepositoryError;
use crate::workflows::drives::domain::EligibilityCriteria;
use crate::workflows::drives::eligibility;

use super::domain::{Student, Usn};
use super::repository::StudentRepository;
use super::roster::{self, RosterImportError};

/// Registration payload for a single student.
#[derive(Debug, Clone, Deserialize)]
pub struct NewStudent {
    pub name: String,
    pub usn: String,
    pub branch: String,
    #[serde(default)]
    pub year: Option<u32>,
    #[serde(default)]
    pub cgpa: Option<f64>,
    #[serde(default)]
    pub backlogs: Option<u32>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

/// Partial update applied to an existing record; absent fields are kept.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentUpdate {
    pub name: Option<String>,
    pub branch: Option<String>,
    pub year: Option<u32>,
    pub cgpa: Option<f64>,
    pub backlogs: Option<u32>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Result of a roster import run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RosterImportSummary {
    pub added: usize,
    pub skipped: usize,
}

/// Error raised by directory operations.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("student not found")]
    NotFound,
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Import(#[from] RosterImportError),
}

/// Service owning student CRUD, roster import, and eligibility previews.
pub struct DirectoryService<S> {
    students: Arc<S>,
}

impl<S> DirectoryService<S>
where
    S: StudentRepository + 'static,
{
    pub fn new(students: Arc<S>) -> Self {
        Self { students }
    }

    pub fn register(&self, new: NewStudent) -> Result<Student, DirectoryError> {
        if new.name.trim().is_empty() {
            return Err(DirectoryError::Validation("name is required".to_string()));
        }
        if new.usn.trim().is_empty() {
            return Err(DirectoryError::Validation("usn is required".to_string()));
        }

        let student = Student {
            name: new.name.trim().to_string(),
            usn: Usn::new(&new.usn),
            branch: new.branch.trim().to_string(),
            year: new.year,
            cgpa: new.cgpa,
            backlogs: new.backlogs,
            email: new.email,
            phone: new.phone,
            assessment_scores: Vec::new(),
            drive_applications: Vec::new(),
            created_at: Utc::now(),
        };

        Ok(self.students.insert(student)?)
    }

    pub fn fetch(&self, usn: &Usn) -> Result<Student, DirectoryError> {
        self.students.fetch(usn)?.ok_or(DirectoryError::NotFound)
    }

    pub fn list(&self) -> Result<Vec<Student>, DirectoryError> {
        Ok(self.students.list()?)
    }

    pub fn update_profile(
        &self,
        usn: &Usn,
        update: StudentUpdate,
    ) -> Result<Student, DirectoryError> {
        let mut student = self.fetch(usn)?;

        if let Some(name) = update.name {
            student.name = name;
        }
        if let Some(branch) = update.branch {
            student.branch = branch;
        }
        if let Some(year) = update.year {
            student.year = Some(year);
        }
        if let Some(cgpa) = update.cgpa {
            student.cgpa = Some(cgpa);
        }
        if let Some(backlogs) = update.backlogs {
            student.backlogs = Some(backlogs);
        }
        if let Some(email) = update.email {
            student.email = email;
        }
        if let Some(phone) = update.phone {
            student.phone = phone;
        }

        self.students.update(student.clone())?;
        Ok(student)
    }

    pub fn remove(&self, usn: &Usn) -> Result<(), DirectoryError> {
        self.students.remove(usn).map_err(|err| match err {
            RepositoryError::NotFound => DirectoryError::NotFound,
            other => DirectoryError::Repository(other),
        })
    }

    /// All students currently satisfying a criterion, for operator previews
    /// and the eligible-count snapshot captured at drive creation.
    pub fn eligible_for(
        &self,
        criteria: &EligibilityCriteria,
    ) -> Result<Vec<Student>, DirectoryError> {
        let students = self.students.list()?;
        Ok(eligibility::eligible_set(students, criteria))
    }

    /// Upsert every importable roster row by USN; rows missing a name or USN
    /// are skipped and counted. Existing application and score sublists are
    /// preserved across re-imports.
    pub fn import_roster<R: Read>(&self, reader: R) -> Result<RosterImportSummary, DirectoryError> {
        let candidates = roster::parse_candidates(reader)?;

        let mut added = 0;
        let mut skipped = 0;
        for candidate in candidates {
            if !candidate.is_importable() {
                skipped += 1;
                continue;
            }

            match self.students.fetch(&candidate.usn)? {
                Some(mut existing) => {
                    existing.name = candidate.name;
                    existing.branch = candidate.branch;
                    existing.year = candidate.year;
                    existing.cgpa = candidate.cgpa;
                    existing.backlogs = candidate.backlogs;
                    existing.email = candidate.email;
                    existing.phone = candidate.phone;
                    self.students.update(existing)?;
                }
                None => {
                    let student = Student {
                        name: candidate.name,
                        usn: candidate.usn,
                        branch: candidate.branch,
                        year: candidate.year,
                        cgpa: candidate.cgpa,
                        backlogs: candidate.backlogs,
                        email: candidate.email,
                        phone: candidate.phone,
                        assessment_scores: Vec::new(),
                        drive_applications: Vec::new(),
                        created_at: Utc::now(),
                    };
                    self.students.insert(student)?;
                }
            }
            added += 1;
        }

        Ok(RosterImportSummary { added, skipped })
    }
}
