// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One submitted survey response.
///
/// Field names follow the columns of the record file, except for the favorite
/// drink which is stored under the historical `favdrink` column.
#[derive(Eq, PartialEq, Debug, Clone, Hash, Serialize, Deserialize)]
pub struct SurveyEntry {
    pub timestamp: String,
    pub coffee_shop: String,
    #[serde(rename = "favdrink")]
    pub favorite_drink: String,
    pub visit_time: String,
    pub visits_per_week: u32,
}

/// Column names of the record file, in the order they are written.
pub const RECORD_HEADER: [&str; 5] = [
    "timestamp",
    "coffee_shop",
    "favdrink",
    "visit_time",
    "visits_per_week",
];

/// Inclusive upper bound of the visits per week answer.
pub const MAX_VISITS_PER_WEEK: u32 = 20;

#[derive(PartialEq, Debug, Clone)]
pub struct Library {
    pub name: String,
    pub study_seats: u64,
    /// The other numeric attributes of the library, in file order.
    pub attributes: Vec<(String, f64)>,
}

/// The values of one comparison metric, in the order of the dataset file.
#[derive(PartialEq, Debug, Clone)]
pub struct MetricTable {
    pub metric: Metric,
    pub values: Vec<(String, f64)>,
}

/// The static library comparison data.
#[derive(PartialEq, Debug, Clone)]
pub struct ReferenceDataset {
    pub libraries: Vec<Library>,
    pub metrics: Vec<MetricTable>,
}

impl ReferenceDataset {
    pub fn metric_table(&self, metric: Metric) -> Option<&MetricTable> {
        self.metrics.iter().find(|t| t.metric == metric)
    }
}

// ******** Output data structures *********

#[derive(PartialEq, Debug, Clone, Copy)]
pub struct Summary {
    pub count: usize,
    pub unique_shops: usize,
    pub avg_visits: f64,
}

/// Errors that prevent an aggregation from completing.
#[derive(PartialEq, Debug, Clone)]
pub enum StatsError {
    /// The requested metric is not one of the comparison metrics.
    UnknownMetric(String),
    /// The metric is known but the dataset does not carry it.
    MissingMetric(Metric),
}

impl Error for StatsError {}

impl Display for StatsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsError::UnknownMetric(name) => write!(f, "unknown metric {:?}", name),
            StatsError::MissingMetric(m) => {
                write!(f, "metric {} is missing from the dataset", m.name())
            }
        }
    }
}

// ********* Display options **********

// These are the selections made by whoever presents the data. They are passed
// explicitly with every call, nothing is remembered between calls.

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum Metric {
    HoursAccessible,
    StudySeatAvailability,
    WifiSpeed,
}

impl Metric {
    pub const ALL: [Metric; 3] = [
        Metric::HoursAccessible,
        Metric::StudySeatAvailability,
        Metric::WifiSpeed,
    ];

    /// The key of the metric in the dataset.
    pub fn name(&self) -> &'static str {
        match self {
            Metric::HoursAccessible => "hours_accessible",
            Metric::StudySeatAvailability => "study_seat_availability",
            Metric::WifiSpeed => "wifi_speed_mbps",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Metric::HoursAccessible => "Hours Accessible",
            Metric::StudySeatAvailability => "Study Seat Availability",
            Metric::WifiSpeed => "WiFi Speed",
        }
    }
}

impl FromStr for Metric {
    type Err = StatsError;

    /// Accepts both the dataset key and the display label.
    fn from_str(s: &str) -> Result<Metric, StatsError> {
        Metric::ALL
            .iter()
            .find(|m| m.name() == s || m.label() == s)
            .copied()
            .ok_or_else(|| StatsError::UnknownMetric(s.to_string()))
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn from_ascending(ascending: bool) -> SortOrder {
        if ascending {
            SortOrder::Ascending
        } else {
            SortOrder::Descending
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "ascending",
            SortOrder::Descending => "descending",
        }
    }
}

/// The three views of the survey answers.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum ChartStyle {
    AverageVisits,
    VisitDistribution,
    TimePattern,
}

impl ChartStyle {
    pub fn name(&self) -> &'static str {
        match self {
            ChartStyle::AverageVisits => "averageVisits",
            ChartStyle::VisitDistribution => "visitDistribution",
            ChartStyle::TimePattern => "timePattern",
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum GraphType {
    Bar,
    Line,
}

impl GraphType {
    pub fn toggled(self) -> GraphType {
        match self {
            GraphType::Bar => GraphType::Line,
            GraphType::Line => GraphType::Bar,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GraphType::Bar => "bar",
            GraphType::Line => "line",
        }
    }
}

/// The display state of one dashboard session.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct SessionConfig {
    pub graph_type: GraphType,
    pub chart_style: ChartStyle,
    pub metric: Metric,
    pub sort_order: SortOrder,
}

impl SessionConfig {
    pub const DEFAULT_SESSION: SessionConfig = SessionConfig {
        graph_type: GraphType::Bar,
        chart_style: ChartStyle::AverageVisits,
        metric: Metric::HoursAccessible,
        sort_order: SortOrder::Ascending,
    };
}
