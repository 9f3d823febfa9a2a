//! CSV roster import: parses operator-uploaded student lists into candidate
//! records the directory service validates and upserts.

use std::io::Read;

use serde::{Deserialize, Deserializer};

use super::domain::Usn;

/// One parsed roster row, prior to validation. `name`/`usn` may be empty;
/// the directory service skips such rows and reports them.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterCandidate {
    pub name: String,
    pub usn: Usn,
    pub branch: String,
    pub year: Option<u32>,
    pub cgpa: Option<f64>,
    pub backlogs: Option<u32>,
    pub email: String,
    pub phone: String,
}

impl RosterCandidate {
    /// A row needs at least a name and a USN to be upserted.
    pub fn is_importable(&self) -> bool {
        !self.name.is_empty() && !self.usn.0.is_empty()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RosterImportError {
    #[error("failed to read roster csv: {0}")]
    Csv(#[from] csv::Error),
}

pub fn parse_candidates<R: Read>(reader: R) -> Result<Vec<RosterCandidate>, RosterImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut candidates = Vec::new();
    for record in csv_reader.deserialize::<RosterRow>() {
        let row = record?;
        candidates.push(row.into_candidate());
    }

    Ok(candidates)
}

#[derive(Debug, Deserialize)]
struct RosterRow {
    #[serde(rename = "Name", alias = "name", default, deserialize_with = "empty_string_as_none")]
    name: Option<String>,
    #[serde(rename = "USN", alias = "usn", default, deserialize_with = "empty_string_as_none")]
    usn: Option<String>,
    #[serde(rename = "Branch", alias = "branch", default, deserialize_with = "empty_string_as_none")]
    branch: Option<String>,
    #[serde(rename = "Year", alias = "year", default, deserialize_with = "empty_string_as_none")]
    year: Option<String>,
    #[serde(rename = "CGPA", alias = "cgpa", default, deserialize_with = "empty_string_as_none")]
    cgpa: Option<String>,
    #[serde(rename = "Backlogs", alias = "backlogs", default, deserialize_with = "empty_string_as_none")]
    backlogs: Option<String>,
    #[serde(rename = "Email", alias = "email", default, deserialize_with = "empty_string_as_none")]
    email: Option<String>,
    #[serde(rename = "Phone", alias = "phone", default, deserialize_with = "empty_string_as_none")]
    phone: Option<String>,
}

impl RosterRow {
    fn into_candidate(self) -> RosterCandidate {
        RosterCandidate {
            name: self.name.unwrap_or_default(),
            usn: Usn::new(&self.usn.unwrap_or_default()),
            branch: self.branch.unwrap_or_default(),
            // Rosters are exported per final-year batch; missing years mean 4.
            year: Some(
                self.year
                    .as_deref()
                    .and_then(|value| value.parse::<u32>().ok())
                    .unwrap_or(4),
            ),
            cgpa: self.cgpa.as_deref().and_then(|value| value.parse::<f64>().ok()),
            backlogs: Some(
                self.backlogs
                    .as_deref()
                    .and_then(|value| value.parse::<u32>().ok())
                    .unwrap_or(0),
            ),
            email: self.email.unwrap_or_default(),
            phone: self.phone.unwrap_or_default(),
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
