mod config;
pub mod manual;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use log::{debug, info, warn};

use std::{
    collections::{BTreeMap, HashSet},
    ops::AddAssign,
};

pub use crate::config::*;

// **** Private structures ****

// Running totals for one coffee shop.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
struct ShopTally {
    visits: u64,
    entries: u64,
}

impl ShopTally {
    fn mean(&self) -> f64 {
        if self.entries == 0 {
            0.0
        } else {
            self.visits as f64 / self.entries as f64
        }
    }
}

impl AddAssign<u32> for ShopTally {
    fn add_assign(&mut self, visits: u32) {
        self.visits += visits as u64;
        self.entries += 1;
    }
}

// Timestamp layouts accepted for the time pattern, tried in order.
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];
const DATE_FORMAT: &str = "%Y-%m-%d";

// **** Survey answers ****

/// Headline numbers of the survey.
///
/// The average is 0.0 when there are no entries.
pub fn summary(entries: &[SurveyEntry]) -> Summary {
    let unique_shops: HashSet<&str> = entries.iter().map(|e| e.coffee_shop.as_str()).collect();
    let mut tally = ShopTally::default();
    for e in entries.iter() {
        tally += e.visits_per_week;
    }
    Summary {
        count: entries.len(),
        unique_shops: unique_shops.len(),
        avg_visits: tally.mean(),
    }
}

/// The mean number of weekly visits for each coffee shop, ordered by shop name.
pub fn average_visits_by_shop(entries: &[SurveyEntry]) -> BTreeMap<String, f64> {
    let mut tallies: BTreeMap<String, ShopTally> = BTreeMap::new();
    for e in entries.iter() {
        *tallies.entry(e.coffee_shop.clone()).or_default() += e.visits_per_week;
    }
    debug!("average_visits_by_shop: tallies: {:?}", tallies);
    tallies
        .into_iter()
        .map(|(shop, tally)| (shop, tally.mean()))
        .collect()
}

/// Total weekly visits reported on each day, in ascending date order.
///
/// Entries whose timestamp cannot be read as a date are left out of the
/// series. Each of them is reported with a warning.
pub fn visits_over_time(entries: &[SurveyEntry]) -> Vec<(NaiveDate, u64)> {
    let mut totals: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    let mut skipped: usize = 0;
    for e in entries.iter() {
        match parse_entry_date(&e.timestamp) {
            Some(date) => {
                *totals.entry(date).or_insert(0) += e.visits_per_week as u64;
            }
            None => {
                warn!(
                    "visits_over_time: skipping entry with unreadable timestamp {:?}",
                    e.timestamp
                );
                skipped += 1;
            }
        }
    }
    if skipped > 0 {
        info!(
            "visits_over_time: {} of {} entries skipped",
            skipped,
            entries.len()
        );
    }
    totals.into_iter().collect()
}

/// Reads the calendar day of a submission timestamp.
pub fn parse_entry_date(timestamp: &str) -> Option<NaiveDate> {
    let ts = timestamp.trim();
    for fmt in DATETIME_FORMATS.iter() {
        if let Ok(dt) = NaiveDateTime::parse_from_str(ts, fmt) {
            return Some(dt.date());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        return Some(dt.date_naive());
    }
    NaiveDate::parse_from_str(ts, DATE_FORMAT).ok()
}

/// One (visits, shop) point per entry, in input order.
pub fn visit_distribution(entries: &[SurveyEntry]) -> Vec<(u32, String)> {
    entries
        .iter()
        .map(|e| (e.visits_per_week, e.coffee_shop.clone()))
        .collect()
}

/// The data behind the coffee shop chart.
#[derive(PartialEq, Debug, Clone)]
pub enum ShopChartData {
    AverageVisits(BTreeMap<String, f64>),
    VisitDistribution(Vec<(u32, String)>),
    TimePattern(Vec<(NaiveDate, u64)>),
}

#[derive(PartialEq, Debug, Clone)]
pub struct ShopChart {
    pub graph_type: GraphType,
    pub chart_style: ChartStyle,
    pub data: ShopChartData,
}

/// Builds the coffee shop chart selected in the session.
///
/// The graph type only matters to whoever draws the chart, it is passed
/// through untouched.
pub fn shop_visits_chart(entries: &[SurveyEntry], session: &SessionConfig) -> ShopChart {
    let data = match session.chart_style {
        ChartStyle::AverageVisits => ShopChartData::AverageVisits(average_visits_by_shop(entries)),
        ChartStyle::VisitDistribution => {
            ShopChartData::VisitDistribution(visit_distribution(entries))
        }
        ChartStyle::TimePattern => ShopChartData::TimePattern(visits_over_time(entries)),
    };
    ShopChart {
        graph_type: session.graph_type,
        chart_style: session.chart_style,
        data,
    }
}

// **** Library comparison ****

/// The value of one comparison metric for each library, sorted by value.
///
/// The sort is stable: libraries with the same value keep the order of the
/// dataset, whatever the direction.
pub fn metric_series(
    dataset: &ReferenceDataset,
    metric_name: &str,
    order: SortOrder,
) -> Result<Vec<(String, f64)>, StatsError> {
    let metric: Metric = metric_name.parse()?;
    let table = dataset
        .metric_table(metric)
        .ok_or(StatsError::MissingMetric(metric))?;
    let mut series: Vec<(String, f64)> = table.values.clone();
    match order {
        SortOrder::Ascending => series.sort_by(|a, b| a.1.total_cmp(&b.1)),
        SortOrder::Descending => series.sort_by(|a, b| b.1.total_cmp(&a.1)),
    }
    debug!(
        "metric_series: {} {}: {:?}",
        metric.name(),
        order.name(),
        series
    );
    Ok(series)
}

/// Study seats of each library, in dataset order.
pub fn study_seats_series(dataset: &ReferenceDataset) -> Vec<(String, u64)> {
    dataset
        .libraries
        .iter()
        .map(|lib| (lib.name.clone(), lib.study_seats))
        .collect()
}
