use clap::{Parser, Subcommand};

/// Collects coffee habit survey answers and prepares the data of the library and coffee dashboard.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON configuration file. Relative paths inside it are read from the
    /// directory of the configuration file. See the manual for the format.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path, default data.csv) The CSV file holding the survey answers. Setting this option
    /// overrides the path that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub data: Option<String>,

    /// (file path, default data.json) The JSON file with the library comparison dataset. Setting
    /// this option overrides the path that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the page will be written in JSON format to the
    /// given location instead of the standard output.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Adds one answer to the survey.
    Submit {
        /// Which coffee shop do you visit most often?
        #[clap(long, value_parser)]
        shop: String,
        /// What is your favorite drink?
        #[clap(long, value_parser)]
        drink: String,
        /// When do you usually visit? (morning/afternoon/evening)
        #[clap(long, value_parser)]
        visit_time: String,
        /// How many times per week do you visit? (0 to 20)
        #[clap(long, value_parser, default_value_t = 2)]
        visits: u32,
    },
    /// Shows the summary and the content of the survey file.
    Show,
    /// Builds the chart data of the dashboard.
    Visuals {
        /// (hours_accessible, study_seat_availability or wifi_speed_mbps) The library metric to compare.
        #[clap(long, value_parser)]
        metric: Option<String>,
        /// (asc or desc) The order of the library comparison.
        #[clap(long, value_parser)]
        sort: Option<String>,
        /// (averageVisits, visitDistribution or timePattern) The view of the survey answers.
        #[clap(long, value_parser)]
        chart_style: Option<String>,
        /// (bar or line) How the survey chart should be drawn.
        #[clap(long, value_parser)]
        graph_type: Option<String>,
        /// Switches the graph type between bar and line.
        #[clap(long, takes_value = false)]
        switch_graph_type: bool,
    },
}
