mod records;
use log::{debug, info};

use std::collections::HashMap;

pub use crate::records::*;

// **** Private structures ****

// All the rows of one candidate within one race, in input order.
#[derive(Eq, PartialEq, Debug, Clone)]
struct CandidateGroup {
    key: String,
    rows: Vec<NormalizedRecord>,
}

// One race with its candidates in first-seen order.
//
// The grouping is a list of groups plus a key index, so iteration order
// never depends on map internals.
#[derive(Eq, PartialEq, Debug, Clone)]
struct RaceGroup {
    key: String,
    candidates: Vec<CandidateGroup>,
    candidate_index: HashMap<String, usize>,
}

impl RaceGroup {
    fn push(&mut self, record: &NormalizedRecord) {
        let cand_key = record.candidate_key();
        let idx = match self.candidate_index.get(&cand_key) {
            Some(idx) => *idx,
            None => {
                self.candidates.push(CandidateGroup {
                    key: cand_key.clone(),
                    rows: Vec::new(),
                });
                let idx = self.candidates.len() - 1;
                self.candidate_index.insert(cand_key, idx);
                idx
            }
        };
        self.candidates[idx].rows.push(record.clone());
    }
}

/// Splits candidate names and parses vote counts, keeping input order.
///
/// The first record that cannot be normalized fails the whole batch:
/// a report built from a subset of the rows would silently under-count.
pub fn normalize_records(records: &[RawRecord]) -> Result<Vec<NormalizedRecord>, TallyError> {
    info!("normalize_records: processing {} raw records", records.len());
    let mut res: Vec<NormalizedRecord> = Vec::with_capacity(records.len());
    for record in records.iter() {
        let parts: Vec<&str> = record.candidate.split(',').collect();
        let (last_name, first_name) = match parts.as_slice() {
            [last, first] => (last.trim().to_string(), first.trim().to_string()),
            _ => {
                return Err(TallyError::MalformedName {
                    candidate: record.candidate.clone(),
                });
            }
        };
        // u64 rejects negative counts along with everything non-numeric.
        let votes = match record.votes.trim().parse::<u64>() {
            Ok(x) => x,
            Err(_) => {
                return Err(TallyError::InvalidVoteCount {
                    candidate: record.candidate.clone(),
                    votes: record.votes.clone(),
                });
            }
        };
        res.push(NormalizedRecord {
            office: record.office.clone(),
            district: record.district.clone(),
            candidate: record.candidate.clone(),
            party: record.party.clone(),
            date: record.date.clone(),
            county: record.county.clone(),
            first_name,
            last_name,
            votes,
        });
    }
    Ok(res)
}

// Two-level grouping: race key first, candidate key second, both levels
// in first-seen order.
fn group_records(records: &[NormalizedRecord]) -> Vec<RaceGroup> {
    let mut races: Vec<RaceGroup> = Vec::new();
    let mut race_index: HashMap<String, usize> = HashMap::new();
    for record in records.iter() {
        let race_key = record.race_key();
        let idx = match race_index.get(&race_key) {
            Some(idx) => *idx,
            None => {
                races.push(RaceGroup {
                    key: race_key.clone(),
                    candidates: Vec::new(),
                    candidate_index: HashMap::new(),
                });
                let idx = races.len() - 1;
                race_index.insert(race_key, idx);
                idx
            }
        };
        races[idx].push(record);
    }
    races
}

/// Tallies normalized records into one summary per race.
///
/// Races come out in the order their first row appeared in the input.
/// Within a race, candidates are sorted by descending vote total; ties
/// keep first-seen order (the sort is stable). The winner flag is set
/// on the top candidate only when its total strictly exceeds the
/// runner-up's. A lone candidate has no runner-up and is marked winner.
/// A tie for first place leaves every flag unset.
pub fn summarize(records: &[NormalizedRecord]) -> Vec<RaceSummary> {
    let races = group_records(records);
    info!(
        "summarize: {} records in {} races",
        records.len(),
        races.len()
    );

    let mut summaries: Vec<RaceSummary> = Vec::with_capacity(races.len());
    for race in races.iter() {
        let mut all_votes: u64 = 0;
        let mut cands: Vec<CandidateSummary> = Vec::with_capacity(race.candidates.len());
        for group in race.candidates.iter() {
            // All rows in a group share name and party by construction.
            let first = &group.rows[0];
            let total: u64 = group.rows.iter().map(|r| r.votes).sum();
            debug!(
                "summarize: race {:?} candidate {:?}: {} votes over {} counties",
                race.key,
                group.key,
                total,
                group.rows.len()
            );
            all_votes += total;
            cands.push(CandidateSummary {
                first_name: first.first_name.clone(),
                last_name: first.last_name.clone(),
                party: first.party.clone(),
                votes: total,
                winner: false,
            });
        }

        // Stable sort: equal totals keep their first-seen order, the only
        // reproducible tie-break available here.
        cands.sort_by(|a, b| b.votes.cmp(&a.votes));

        match cands.as_mut_slice() {
            [] => {}
            [only] => {
                only.winner = true;
            }
            [first, second, ..] => {
                if first.votes > second.votes {
                    first.winner = true;
                }
            }
        }

        // Race metadata comes from any row of the race; take the first.
        let meta = &race.candidates[0].rows[0];
        summaries.push(RaceSummary {
            date: meta.date.clone(),
            office: meta.office.clone(),
            district: meta.district.clone(),
            all_votes,
            candidates: cands,
        });
    }
    summaries
}

/// Flattens race summaries into one report row per (race, candidate),
/// races in summary order, candidates in rank order.
pub fn build_report(summaries: &[RaceSummary]) -> Vec<ReportRow> {
    let mut rows: Vec<ReportRow> = Vec::new();
    for race in summaries.iter() {
        for cand in race.candidates.iter() {
            rows.push(ReportRow {
                date: race.date.clone(),
                office: race.office.clone(),
                district: race.district.clone(),
                last_name: cand.last_name.clone(),
                first_name: cand.first_name.clone(),
                party: cand.party.clone(),
                all_votes: race.all_votes,
                votes: cand.votes,
                winner: if cand.winner {
                    "X".to_string()
                } else {
                    "".to_string()
                },
            });
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(
        office: &str,
        district: &str,
        candidate: &str,
        party: &str,
        votes: &str,
        county: &str,
    ) -> RawRecord {
        RawRecord {
            office: office.to_string(),
            district: district.to_string(),
            candidate: candidate.to_string(),
            party: party.to_string(),
            date: "2012-11-06".to_string(),
            votes: votes.to_string(),
            county: county.to_string(),
        }
    }

    fn president_rows() -> Vec<RawRecord> {
        vec![
            raw("President", "", "Smith, Joe", "GOP", "10", "Fairfax"),
            raw("President", "", "Smith, Joe", "GOP", "5", "Arlington"),
            raw("President", "", "Doe, Jane", "DEM", "20", "Fairfax"),
            raw("President", "", "Doe, Jane", "DEM", "11", "Arlington"),
        ]
    }

    #[test]
    fn name_parsing() {
        let normalized = normalize_records(&president_rows()).unwrap();
        assert_eq!(normalized[0].first_name, "Joe");
        assert_eq!(normalized[0].last_name, "Smith");
        // Whitespace around either part is trimmed.
        let spaced = vec![raw("President", "", "  Doe ,  Jane  ", "DEM", "3", "Fairfax")];
        let normalized = normalize_records(&spaced).unwrap();
        assert_eq!(normalized[0].first_name, "Jane");
        assert_eq!(normalized[0].last_name, "Doe");
    }

    #[test]
    fn candidate_and_racewide_totals() {
        let normalized = normalize_records(&president_rows()).unwrap();
        let summaries = summarize(&normalized);
        assert_eq!(summaries.len(), 1);
        let race = &summaries[0];
        assert_eq!(race.all_votes, 46);
        let smith = race
            .candidates
            .iter()
            .find(|c| c.last_name == "Smith")
            .unwrap();
        assert_eq!(smith.votes, 15);
        let doe = race
            .candidates
            .iter()
            .find(|c| c.last_name == "Doe")
            .unwrap();
        assert_eq!(doe.votes, 31);
        // Conservation: candidate totals add up to the racewide total.
        let total: u64 = race.candidates.iter().map(|c| c.votes).sum();
        assert_eq!(total, race.all_votes);
    }

    #[test]
    fn winner_flag_on_top_candidate_only() {
        let normalized = normalize_records(&president_rows()).unwrap();
        let summaries = summarize(&normalized);
        let race = &summaries[0];
        assert_eq!(race.candidates[0].last_name, "Doe");
        assert!(race.candidates[0].winner);
        assert!(!race.candidates[1].winner);
    }

    #[test]
    fn tie_race_has_no_winner() {
        let rows = vec![
            raw("President", "", "Smith, Joe", "GOP", "20", "Fairfax"),
            raw("President", "", "Doe, Jane", "DEM", "20", "Fairfax"),
        ];
        let summaries = summarize(&normalize_records(&rows).unwrap());
        for cand in summaries[0].candidates.iter() {
            assert!(!cand.winner);
        }
    }

    #[test]
    fn tied_candidates_keep_first_seen_order() {
        let rows = vec![
            raw("Senate", "", "Brown, Ann", "IND", "7", "Fairfax"),
            raw("Senate", "", "Green, Bob", "IND", "7", "Fairfax"),
            raw("Senate", "", "White, Cal", "IND", "9", "Fairfax"),
        ];
        let summaries = summarize(&normalize_records(&rows).unwrap());
        let names: Vec<&str> = summaries[0]
            .candidates
            .iter()
            .map(|c| c.last_name.as_str())
            .collect();
        assert_eq!(names, vec!["White", "Brown", "Green"]);
    }

    #[test]
    fn district_is_part_of_the_race_key() {
        let rows = vec![
            raw("House", "5", "Smith, Joe", "GOP", "10", "Fairfax"),
            raw("House", "7", "Doe, Jane", "DEM", "12", "Fairfax"),
            raw("House", "5", "Smith, Joe", "GOP", "4", "Arlington"),
        ];
        let normalized = normalize_records(&rows).unwrap();
        assert_eq!(normalized[0].race_key(), "House-5");
        assert_eq!(normalized[1].race_key(), "House-7");
        let summaries = summarize(&normalized);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].district, "5");
        assert_eq!(summaries[0].all_votes, 14);
        assert_eq!(summaries[1].district, "7");
        assert_eq!(summaries[1].all_votes, 12);
    }

    #[test]
    fn same_name_distinct_parties_stay_distinct() {
        let rows = vec![
            raw("Governor", "", "Smith, Joe", "GOP", "10", "Fairfax"),
            raw("Governor", "", "Smith, Joe", "IND", "3", "Fairfax"),
        ];
        let summaries = summarize(&normalize_records(&rows).unwrap());
        assert_eq!(summaries[0].candidates.len(), 2);
    }

    #[test]
    fn malformed_name_fails_the_batch() {
        let rows = vec![
            raw("President", "", "Doe, Jane", "DEM", "20", "Fairfax"),
            raw("President", "", "Smith Joe", "GOP", "10", "Fairfax"),
        ];
        let res = normalize_records(&rows);
        assert_eq!(
            res,
            Err(TallyError::MalformedName {
                candidate: "Smith Joe".to_string()
            })
        );
    }

    #[test]
    fn too_many_commas_fails_the_batch() {
        let rows = vec![raw(
            "President",
            "",
            "Smith, Joe, Jr",
            "GOP",
            "10",
            "Fairfax",
        )];
        assert!(matches!(
            normalize_records(&rows),
            Err(TallyError::MalformedName { .. })
        ));
    }

    #[test]
    fn invalid_vote_count_fails_the_batch() {
        let rows = vec![raw("President", "", "Smith, Joe", "GOP", "abc", "Fairfax")];
        let res = normalize_records(&rows);
        assert_eq!(
            res,
            Err(TallyError::InvalidVoteCount {
                candidate: "Smith, Joe".to_string(),
                votes: "abc".to_string()
            })
        );
    }

    #[test]
    fn negative_vote_count_is_rejected() {
        let rows = vec![raw("President", "", "Smith, Joe", "GOP", "-5", "Fairfax")];
        assert!(matches!(
            normalize_records(&rows),
            Err(TallyError::InvalidVoteCount { .. })
        ));
    }

    #[test]
    fn lone_candidate_is_the_winner() {
        let rows = vec![
            raw("Sheriff", "", "Lone, Sam", "IND", "12", "Fairfax"),
            raw("Sheriff", "", "Lone, Sam", "IND", "8", "Arlington"),
        ];
        let summaries = summarize(&normalize_records(&rows).unwrap());
        assert_eq!(summaries[0].candidates.len(), 1);
        assert_eq!(summaries[0].candidates[0].votes, 20);
        assert!(summaries[0].candidates[0].winner);
    }

    #[test]
    fn empty_input_gives_empty_summary() {
        let summaries = summarize(&[]);
        assert!(summaries.is_empty());
        assert!(build_report(&summaries).is_empty());
    }

    #[test]
    fn summarize_is_idempotent() {
        let normalized = normalize_records(&president_rows()).unwrap();
        assert_eq!(summarize(&normalized), summarize(&normalized));
    }

    #[test]
    fn races_come_out_in_first_seen_order() {
        let rows = vec![
            raw("Senate", "", "Brown, Ann", "IND", "7", "Fairfax"),
            raw("President", "", "Doe, Jane", "DEM", "20", "Fairfax"),
            raw("Senate", "", "Green, Bob", "GOP", "9", "Fairfax"),
        ];
        let summaries = summarize(&normalize_records(&rows).unwrap());
        let offices: Vec<&str> = summaries.iter().map(|s| s.office.as_str()).collect();
        assert_eq!(offices, vec!["Senate", "President"]);
    }

    #[test]
    fn report_rows_follow_race_then_rank_order() {
        let mut rows = president_rows();
        rows.push(raw("House", "5", "Lone, Sam", "IND", "9", "Fairfax"));
        let summaries = summarize(&normalize_records(&rows).unwrap());
        let report = build_report(&summaries);
        assert_eq!(report.len(), 3);

        assert_eq!(report[0].last_name, "Doe");
        assert_eq!(report[0].winner, "X");
        assert_eq!(report[0].all_votes, 46);
        assert_eq!(report[0].votes, 31);

        assert_eq!(report[1].last_name, "Smith");
        assert_eq!(report[1].winner, "");
        assert_eq!(report[1].all_votes, 46);

        assert_eq!(report[2].office, "House");
        assert_eq!(report[2].district, "5");
        assert_eq!(report[2].all_votes, 9);
        assert_eq!(report[2].winner, "X");
    }
}
