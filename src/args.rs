use clap::Parser;

/// Ranks hazards by planning priority, from the importance you give to each planning attribute.
#[derive(Parser, Debug, Clone, Default)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The JSON file describing the survey: the tables, the relevance scale,
    /// the profiles and the answers. Paths in this file are relative to it.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path, csv or xlsx) The attributes table. Overrides the one in the configuration.
    #[clap(long, value_parser)]
    pub attributes: Option<String>,

    /// (file path, csv or xlsx) The hazards table. Overrides the one in the configuration.
    #[clap(long, value_parser)]
    pub hazards: Option<String>,

    /// (file path, csv or xlsx) The hazard x attribute relevance table. Overrides the one in the configuration.
    #[clap(long, value_parser)]
    pub relevance: Option<String>,

    /// (file path, csv or xlsx, optional) The exposure table. The exposure axis is disabled when
    /// it is missing or cannot be read.
    #[clap(long, value_parser)]
    pub exposure: Option<String>,

    /// (file path, json or csv) The importance (1 to 5) given to each attribute. Attributes
    /// without an answer count as 3.
    #[clap(short, long, value_parser)]
    pub answers: Option<String>,

    /// (default all) The weighting profile.
    #[clap(short, long, value_parser)]
    pub profile: Option<String>,

    /// (default: first available) The exposure metric, for example "All assets" or "Lands".
    #[clap(long, value_parser)]
    pub exposure_metric: Option<String>,

    /// (planning or linear) The relevance scale that turns letters into priorities.
    #[clap(long, value_parser)]
    pub scale: Option<String>,

    /// (file path or 'stdout') If specified, the full ranking is exported in CSV format to this location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path or 'stdout') If specified, a summary of the ranking is written in JSON format to this location.
    #[clap(short, long, value_parser)]
    pub summary: Option<String>,

    /// (file path) A reference summary in JSON format. If provided, hazrank will check that the
    /// computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (default 10) The number of hazards shown in the terminal. The export always contains all of them.
    #[clap(long, value_parser)]
    pub top: Option<usize>,

    /// (hazard code) Shows the contribution of every attribute to the score of this hazard.
    #[clap(long, value_parser)]
    pub explain: Option<String>,

    /// Lists the profiles and the exposure metrics, then stops.
    #[clap(long, takes_value = false)]
    pub list_profiles: bool,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
