// Primitives for reading the raw results CSV and writing the report.

use log::debug;

use serde::{Deserialize, Serialize};
use snafu::prelude::*;

use vote_tally::{RawRecord, ReportRow};

use crate::pipeline::*;

// One line of the downloaded results file. Column order does not
// matter, the fields are matched against the header by name.
#[derive(Eq, PartialEq, Debug, Clone, Deserialize)]
struct ResultsCsvRecord {
    office: String,
    district: String,
    candidate: String,
    party: String,
    date: String,
    votes: String,
    county: String,
}

// One line of the report, with the fixed output column order.
#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
struct ReportCsvRecord {
    date: String,
    office: String,
    district: String,
    last_name: String,
    first_name: String,
    party: String,
    all_votes: u64,
    votes: u64,
    winner: String,
}

pub fn read_results(path: &str) -> PipelineResult<Vec<RawRecord>> {
    let mut rdr = csv::Reader::from_path(path).context(CsvOpenSnafu { path })?;
    let mut res: Vec<RawRecord> = Vec::new();
    for (idx, record_r) in rdr.deserialize::<ResultsCsvRecord>().enumerate() {
        // Line 1 is the header row.
        let lineno = idx + 2;
        debug!("read_results: {:?} {:?}", lineno, record_r);
        let record = record_r.context(CsvRecordParseSnafu { lineno })?;
        res.push(RawRecord {
            office: record.office,
            district: record.district,
            candidate: record.candidate,
            party: record.party,
            date: record.date,
            votes: record.votes,
            county: record.county,
        });
    }
    Ok(res)
}

pub fn write_report(path: &str, rows: &[ReportRow]) -> PipelineResult<()> {
    // Default quoting is minimal: fields are only quoted when needed.
    let mut wtr = csv::Writer::from_path(path).context(CsvWriteSnafu { path })?;
    for row in rows.iter() {
        let record = ReportCsvRecord {
            date: row.date.clone(),
            office: row.office.clone(),
            district: row.district.clone(),
            last_name: row.last_name.clone(),
            first_name: row.first_name.clone(),
            party: row.party.clone(),
            all_votes: row.all_votes,
            votes: row.votes,
            winner: row.winner.clone(),
        };
        wtr.serialize(&record).context(CsvWriteSnafu { path })?;
    }
    wtr.flush().context(ReportFlushSnafu { path })?;
    Ok(())
}
