// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// One county-level observation, as handed over by the CSV reader.
///
/// All fields are kept as raw strings. The `candidate` field is the full
/// name in `"Last, First"` form and `votes` is the unparsed count.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RawRecord {
    pub office: String,
    pub district: String,
    pub candidate: String,
    pub party: String,
    pub date: String,
    pub votes: String,
    pub county: String,
}

/// A raw record after name splitting and vote parsing.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct NormalizedRecord {
    pub office: String,
    pub district: String,
    pub candidate: String,
    pub party: String,
    pub date: String,
    pub county: String,
    pub first_name: String,
    pub last_name: String,
    pub votes: u64,
}

impl NormalizedRecord {
    /// The grouping key of the contest this record belongs to:
    /// the office, with `-district` appended when the district is non-empty.
    pub fn race_key(&self) -> String {
        if self.district.is_empty() {
            self.office.clone()
        } else {
            format!("{}-{}", self.office, self.district)
        }
    }

    /// The grouping key of the candidate within a race: party and raw full
    /// name. Two candidates sharing both are merged (see crate docs).
    pub fn candidate_key(&self) -> String {
        format!("{}-{}", self.party, self.candidate)
    }
}

// ******** Output data structures *********

/// Totals for one candidate within one race.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CandidateSummary {
    pub first_name: String,
    pub last_name: String,
    pub party: String,
    /// Sum of this candidate's votes over all counties in the race.
    pub votes: u64,
    pub winner: bool,
}

/// Totals for one race, with candidates sorted from highest to lowest
/// vote count. Ties keep the order in which the candidates were first
/// encountered in the input.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RaceSummary {
    pub date: String,
    pub office: String,
    pub district: String,
    /// Sum of all candidate totals in this race.
    pub all_votes: u64,
    pub candidates: Vec<CandidateSummary>,
}

/// One line of the flat report: a (race, candidate) pair.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ReportRow {
    pub date: String,
    pub office: String,
    pub district: String,
    pub last_name: String,
    pub first_name: String,
    pub party: String,
    pub all_votes: u64,
    pub votes: u64,
    /// `"X"` for the race winner, empty otherwise.
    pub winner: String,
}

/// Errors raised while normalizing raw records.
///
/// A single bad record fails the whole batch. There is no partial
/// recovery: the report is either complete or absent.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum TallyError {
    /// The candidate field did not split into exactly two
    /// comma-separated parts.
    MalformedName { candidate: String },
    /// The votes field was not a base-10 unsigned integer.
    InvalidVoteCount { candidate: String, votes: String },
}

impl Error for TallyError {}

impl Display for TallyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TallyError::MalformedName { candidate } => {
                write!(f, "malformed candidate name: {:?}", candidate)
            }
            TallyError::InvalidVoteCount { candidate, votes } => {
                write!(
                    f,
                    "invalid vote count {:?} for candidate {:?}",
                    votes, candidate
                )
            }
        }
    }
}
