use clap::Parser;

/// Summarizes county-level election results into racewide totals with winners.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A local CSV file with county-level results. When provided,
    /// no download is attempted and the file is read as-is.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (url, optional) Overrides the location the raw results file is downloaded from.
    #[clap(short, long, value_parser)]
    pub url: Option<String>,

    /// (file path) Where the flat summary report is written.
    #[clap(short, long, value_parser, default_value = "summary_results.csv")]
    pub out: String,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
