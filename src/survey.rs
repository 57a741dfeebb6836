use log::{debug, info, warn};

pub use survey_stats::*;
use snafu::{prelude::*, ErrorCompat, Snafu};

use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;

use crate::args::{Args, Command};
use crate::survey::config_reader::*;
use crate::survey::io_common::{display_path, resolve_path, write_output};
use crate::survey::io_csv::RecordStore;
use crate::survey::io_json::read_reference_dataset;

pub mod config_reader;
mod io_common;
pub mod io_csv;
mod io_json;

/// Layout of the submission timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const DEFAULT_DATA_PATH: &str = "data.csv";
pub const DEFAULT_REFERENCE_PATH: &str = "data.json";

#[derive(Debug, Snafu)]
pub enum SurveyError {
    #[snafu(display("Invalid {field}: {reason}"))]
    Validation { field: String, reason: String },

    #[snafu(display("Error opening record file {path}"))]
    CsvOpen {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error reading record file {path}"))]
    CsvRead { source: csv::Error, path: String },
    #[snafu(display("Error encoding a row for {path}"))]
    CsvWrite { source: csv::Error, path: String },
    #[snafu(display("Error reading the header of {path}"))]
    CsvHeader { source: csv::Error, path: String },
    #[snafu(display("Column {column} is missing from the header of {path}"))]
    CsvMissingColumn { column: String, path: String },
    #[snafu(display("Malformed row at line {lineno} of {path}: {source}"))]
    CsvLineParse {
        source: csv::Error,
        path: String,
        lineno: u64,
    },
    #[snafu(display("I/O error on {path}"))]
    FileIo {
        source: std::io::Error,
        path: String,
    },

    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON file {path}: {source}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Expected a number for {key}"))]
    ParsingJsonNumber { key: String },
    #[snafu(display("Missing entry {key}"))]
    MissingJsonKey { key: String },
    #[snafu(display("Cannot find the directory of {path}"))]
    MissingParentDir { path: String },

    #[snafu(display("{source}"))]
    Stats { source: StatsError },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type SurveyResult<T> = Result<T, SurveyError>;
pub type BSurveyResult<T> = Result<T, Box<SurveyError>>;

/// Where the data lives and how to show it, after merging the
/// configuration file and the command line.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Settings {
    pub data_path: PathBuf,
    pub reference_path: PathBuf,
    /// None writes to the standard output.
    pub out: Option<String>,
    pub session: SessionConfig,
}

// ******** Entries *********

/// Checks a submitted entry and returns it with its text fields trimmed.
pub fn validate_entry(entry: &SurveyEntry) -> SurveyResult<SurveyEntry> {
    let required = |field: &str, value: &str| -> SurveyResult<String> {
        let v = value.trim();
        ensure!(
            !v.is_empty(),
            ValidationSnafu {
                field,
                reason: "must not be empty"
            }
        );
        Ok(v.to_string())
    };
    let coffee_shop = required("coffee shop", &entry.coffee_shop)?;
    let favorite_drink = required("favorite drink", &entry.favorite_drink)?;
    let visit_time = required("visit time", &entry.visit_time)?;
    ensure!(
        entry.visits_per_week <= MAX_VISITS_PER_WEEK,
        ValidationSnafu {
            field: "visits per week",
            reason: format!(
                "must be between 0 and {}, got {}",
                MAX_VISITS_PER_WEEK, entry.visits_per_week
            )
        }
    );
    Ok(SurveyEntry {
        timestamp: entry.timestamp.trim().to_string(),
        coffee_shop,
        favorite_drink,
        visit_time,
        visits_per_week: entry.visits_per_week,
    })
}

/// A new entry stamped with the current local time.
pub fn new_entry(
    coffee_shop: &str,
    favorite_drink: &str,
    visit_time: &str,
    visits_per_week: u32,
) -> SurveyEntry {
    SurveyEntry {
        timestamp: chrono::Local::now().format(TIMESTAMP_FORMAT).to_string(),
        coffee_shop: coffee_shop.to_string(),
        favorite_drink: favorite_drink.to_string(),
        visit_time: visit_time.to_string(),
        visits_per_week,
    }
}

// ******** Settings *********

/// Merges the optional configuration file with the command line.
///
/// Paths in the configuration file are relative to the file itself; paths on
/// the command line are used as given.
pub fn resolve_settings(args: &Args) -> BSurveyResult<Settings> {
    let (config, root): (SurveyConfig, Option<PathBuf>) = match &args.config {
        Some(config_path) => {
            let config = read_config(config_path)?;
            let root = Path::new(config_path)
                .parent()
                .context(MissingParentDirSnafu {
                    path: config_path.clone(),
                })?
                .to_path_buf();
            (config, Some(root))
        }
        None => (SurveyConfig::default(), None),
    };
    debug!("resolve_settings: config: {:?} root: {:?}", config, root);

    let data_path = match &args.data {
        Some(p) => PathBuf::from(p),
        None => resolve_path(
            root.as_deref(),
            config.data_path.as_deref().unwrap_or(DEFAULT_DATA_PATH),
        ),
    };
    let reference_path = match &args.reference {
        Some(p) => PathBuf::from(p),
        None => resolve_path(
            root.as_deref(),
            config
                .reference_path
                .as_deref()
                .unwrap_or(DEFAULT_REFERENCE_PATH),
        ),
    };
    let out = args
        .out
        .clone()
        .or_else(|| config.output_settings.output_path.clone())
        .filter(|o| o != "stdout");

    let mut session = validate_display(&config.display)?;
    if let Command::Visuals {
        metric,
        sort,
        chart_style,
        graph_type,
        switch_graph_type,
    } = &args.command
    {
        if let Some(m) = metric {
            session.metric = m.parse::<Metric>().context(StatsSnafu {})?;
        }
        if let Some(s) = sort {
            session.sort_order = parse_sort_order(s)?;
        }
        if let Some(c) = chart_style {
            session.chart_style = parse_chart_style(c)?;
        }
        if let Some(g) = graph_type {
            session.graph_type = parse_graph_type(g)?;
        }
        if *switch_graph_type {
            session.graph_type = session.graph_type.toggled();
        }
    }

    Ok(Settings {
        data_path,
        reference_path,
        out,
        session,
    })
}

// ******** Pages *********

fn entry_to_json(e: &SurveyEntry) -> JSValue {
    json!({
        "timestamp": e.timestamp,
        "coffeeShop": e.coffee_shop,
        "favoriteDrink": e.favorite_drink,
        "visitTime": e.visit_time,
        "visitsPerWeek": e.visits_per_week,
    })
}

fn summary_to_json(s: &Summary) -> JSValue {
    json!({
        "totalEntries": s.count,
        "uniqueCoffeeShops": s.unique_shops,
        "avgVisitsPerWeek": s.avg_visits,
        "avgVisitsPerWeekDisplay": format!("{:.1}", s.avg_visits),
    })
}

fn shop_chart_to_json(chart: &ShopChart) -> JSValue {
    let series: Vec<JSValue> = match &chart.data {
        ShopChartData::AverageVisits(avg) => avg
            .iter()
            .map(|(shop, v)| json!({"coffeeShop": shop, "avgVisitsPerWeek": v}))
            .collect(),
        ShopChartData::VisitDistribution(points) => points
            .iter()
            .map(|(v, shop)| json!({"visitsPerWeek": v, "coffeeShop": shop}))
            .collect(),
        ShopChartData::TimePattern(days) => days
            .iter()
            .map(|(d, total)| json!({"date": d.to_string(), "visitsPerWeek": total}))
            .collect(),
    };
    json!({
        "chartStyle": chart.chart_style.name(),
        "graphType": chart.graph_type.name(),
        "series": series,
    })
}

/// Validates and stores one answer, then reports what was stored.
pub fn submit_page(settings: &Settings, entry: &SurveyEntry) -> BSurveyResult<JSValue> {
    let store = RecordStore::new(&settings.data_path);
    let stored = store.append(entry)?;
    Ok(json!({
        "page": "survey",
        "submitted": entry_to_json(&stored),
        "dataPath": display_path(store.path()),
    }))
}

/// The content of the record file and its summary.
///
/// A record file that cannot be read is reported under `warnings`.
pub fn show_page(settings: &Settings) -> JSValue {
    let store = RecordStore::new(&settings.data_path);
    let mut page: JSMap<String, JSValue> = JSMap::new();
    page.insert("page".to_string(), json!("survey"));
    page.insert("dataPath".to_string(), json!(display_path(store.path())));
    match store.load_all() {
        Ok(entries) if entries.is_empty() => {
            let msg = format!(
                "The file {} is empty or does not exist yet.",
                display_path(store.path())
            );
            warn!("{}", msg);
            page.insert("warnings".to_string(), json!([msg]));
        }
        Ok(entries) => {
            page.insert("summary".to_string(), summary_to_json(&summary(&entries)));
            let rows: Vec<JSValue> = entries.iter().map(entry_to_json).collect();
            page.insert("entries".to_string(), JSValue::Array(rows));
        }
        Err(e) => {
            let msg = format!("Error loading survey data: {}", e);
            warn!("{}", msg);
            page.insert("warnings".to_string(), json!([msg]));
        }
    }
    JSValue::Object(page)
}

/// The dashboard: library charts from the reference dataset and the coffee
/// chart from the record file.
///
/// Each file that cannot be read only removes the charts that depend on it;
/// the reason is listed under `warnings`.
pub fn visuals_page(settings: &Settings) -> JSValue {
    let session = &settings.session;
    let mut warnings: Vec<String> = Vec::new();
    let mut page: JSMap<String, JSValue> = JSMap::new();
    page.insert("page".to_string(), json!("visuals"));

    let store = RecordStore::new(&settings.data_path);
    let entries: Option<Vec<SurveyEntry>> = match store.load_all() {
        Ok(entries) if entries.is_empty() => {
            warnings.push("No survey data found. Submit some survey data first.".to_string());
            None
        }
        Ok(entries) => Some(entries),
        Err(e) => {
            warnings.push(format!("Error loading survey data: {}", e));
            None
        }
    };
    page.insert(
        "surveyEntries".to_string(),
        json!(entries.as_ref().map(|e| e.len()).unwrap_or(0)),
    );

    let reference_path = display_path(&settings.reference_path);
    match read_reference_dataset(&settings.reference_path) {
        Ok(dataset) => {
            let seats: Vec<JSValue> = study_seats_series(&dataset)
                .iter()
                .map(|(name, seats)| json!({"library": name, "studySeats": seats}))
                .collect();
            page.insert("studySeats".to_string(), JSValue::Array(seats));

            match metric_series(&dataset, session.metric.name(), session.sort_order) {
                Ok(series) => {
                    let values: Vec<JSValue> = series
                        .iter()
                        .map(|(name, v)| json!({"library": name, "value": v}))
                        .collect();
                    page.insert(
                        "metricComparison".to_string(),
                        json!({
                            "metric": session.metric.name(),
                            "label": session.metric.label(),
                            "sortOrder": session.sort_order.name(),
                            "series": values,
                        }),
                    );
                }
                Err(e) => warnings.push(format!("Cannot compare libraries: {}", e)),
            }
        }
        Err(e) => match *e {
            SurveyError::OpeningJson { ref source, .. }
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                warnings.push(format!("Reference dataset {} not found.", reference_path))
            }
            ref other => warnings.push(format!("Error loading reference dataset: {}", other)),
        },
    }

    if let Some(entries) = &entries {
        let chart = shop_visits_chart(entries, session);
        page.insert("coffeeChart".to_string(), shop_chart_to_json(&chart));
    }

    for w in warnings.iter() {
        warn!("{}", w);
    }
    page.insert("warnings".to_string(), json!(warnings));
    JSValue::Object(page)
}

/// Runs the command given on the command line.
pub fn run(args: &Args) -> BSurveyResult<()> {
    let settings = resolve_settings(args)?;
    info!("settings: {:?}", settings);
    let page = match &args.command {
        Command::Submit {
            shop,
            drink,
            visit_time,
            visits,
        } => {
            let entry = new_entry(shop, drink, visit_time, *visits);
            submit_page(&settings, &entry)?
        }
        Command::Show => show_page(&settings),
        Command::Visuals { .. } => visuals_page(&settings),
    };
    write_output(&settings.out, &page)
}

/// Prints an error with its causes and backtrace, if any.
pub fn report_error(e: &SurveyError) {
    eprintln!("An error occured: {}", e);
    let mut cause = std::error::Error::source(e);
    while let Some(c) = cause {
        eprintln!("  caused by: {}", c);
        cause = std::error::Error::source(c);
    }
    if let Some(bt) = ErrorCompat::backtrace(e) {
        eprintln!("trace: {}", bt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn entry(shop: &str, drink: &str, time: &str, visits: u32) -> SurveyEntry {
        SurveyEntry {
            timestamp: "2024-03-01 08:00:00".to_string(),
            coffee_shop: shop.to_string(),
            favorite_drink: drink.to_string(),
            visit_time: time.to_string(),
            visits_per_week: visits,
        }
    }

    fn settings(dir: &TempDir) -> Settings {
        Settings {
            data_path: dir.path().join("data.csv"),
            reference_path: dir.path().join("data.json"),
            out: None,
            session: SessionConfig::DEFAULT_SESSION,
        }
    }

    const DATASET: &str = r#"{
      "library_comparison": {
        "libraries": [
          {"name": "Main", "study_seats": 120, "floors": 4},
          {"name": "Science", "study_seats": 80}
        ],
        "comparison_metrics": {
          "hours_accessible": {"Main": 16, "Science": 12},
          "study_seat_availability": {"Main": 0.4, "Science": 0.7},
          "wifi_speed_mbps": {"Main": 100, "Science": 250}
        }
      }
    }"#;

    #[test]
    fn append_then_load_returns_entry_last() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::new(dir.path().join("data.csv"));
        store.append(&entry("A", "latte", "morning", 2)).unwrap();
        let e = entry("Blue Bottle", "cortado", "evening", 20);
        store.append(&e).unwrap();
        let loaded = store.load_all().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.last(), Some(&e));
    }

    #[test]
    fn round_trip_trims_and_keeps_order() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::new(dir.path().join("data.csv"));
        let submitted = vec![
            entry("  A  ", "latte", "morning", 0),
            entry("B, the one downtown", "flat \"white\"", " afternoon", 7),
            entry("C", "mocha\t", "evening", 20),
        ];
        for e in submitted.iter() {
            store.append(e).unwrap();
        }
        let loaded = store.load_all().unwrap();
        let expected: Vec<SurveyEntry> = submitted
            .iter()
            .map(|e| validate_entry(e).unwrap())
            .collect();
        assert_eq!(loaded, expected);
        assert_eq!(loaded[1].coffee_shop, "B, the one downtown");
        assert_eq!(loaded[1].favorite_drink, "flat \"white\"");
    }

    #[test]
    fn header_written_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.csv");
        let store = RecordStore::new(&path);
        store.append(&entry("A", "latte", "morning", 2)).unwrap();
        store.append(&entry("B", "mocha", "evening", 3)).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(
            lines[0],
            "timestamp,coffee_shop,favdrink,visit_time,visits_per_week"
        );
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2], "2024-03-01 08:00:00,B,mocha,evening,3");
        assert!(contents.ends_with('\n'));
    }

    #[test]
    fn header_written_into_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(&path, "").unwrap();
        let store = RecordStore::new(&path);
        store.append(&entry("A", "latte", "morning", 2)).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("timestamp,coffee_shop,"));
    }

    #[test]
    fn append_after_unterminated_row() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(
            &path,
            "timestamp,coffee_shop,favdrink,visit_time,visits_per_week\n2024-01-01 10:00:00,A,tea,morning,1",
        )
        .unwrap();
        let store = RecordStore::new(&path);
        store.append(&entry("B", "latte", "evening", 4)).unwrap();
        let loaded = store.load_all().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].coffee_shop, "A");
        assert_eq!(loaded[1].coffee_shop, "B");
    }

    #[test]
    fn missing_or_empty_file_loads_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.csv");
        let store = RecordStore::new(&path);
        assert_eq!(store.load_all().unwrap(), vec![]);
        fs::write(&path, "").unwrap();
        assert_eq!(store.load_all().unwrap(), vec![]);
    }

    #[test]
    fn rejected_entry_leaves_file_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.csv");
        let store = RecordStore::new(&path);
        let err = store.append(&entry("   ", "latte", "morning", 2)).unwrap_err();
        assert!(matches!(*err, SurveyError::Validation { .. }));
        assert!(!path.exists());

        store.append(&entry("A", "latte", "morning", 2)).unwrap();
        let before = fs::read_to_string(&path).unwrap();
        let err = store.append(&entry("A", "latte", "morning", 21)).unwrap_err();
        assert!(matches!(*err, SurveyError::Validation { .. }));
        let err = store.append(&entry("A", "", "morning", 2)).unwrap_err();
        assert!(matches!(*err, SurveyError::Validation { .. }));
        let err = store.append(&entry("A", "latte", "\t", 2)).unwrap_err();
        assert!(matches!(*err, SurveyError::Validation { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn columns_matched_by_name() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(
            &path,
            "coffee_shop,visits_per_week,timestamp,visit_time,favdrink\nA,3,2024-01-01 10:00:00,morning,tea\n",
        )
        .unwrap();
        let loaded = RecordStore::new(&path).load_all().unwrap();
        let mut expected = entry("A", "tea", "morning", 3);
        expected.timestamp = "2024-01-01 10:00:00".to_string();
        assert_eq!(loaded, vec![expected]);
    }

    #[test]
    fn append_follows_existing_header_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(
            &path,
            "coffee_shop,visits_per_week,timestamp,visit_time,favdrink\nA,3,2024-01-01 10:00:00,morning,tea\n",
        )
        .unwrap();
        let store = RecordStore::new(&path);
        let e = entry("B", "mocha", "evening", 4);
        store.append(&e).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents.lines().last(),
            Some("B,4,2024-03-01 08:00:00,evening,mocha")
        );
        let loaded = store.load_all().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].coffee_shop, "A");
        assert_eq!(loaded.last(), Some(&e));
    }

    #[test]
    fn extra_columns_are_left_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(
            &path,
            "timestamp,coffee_shop,note,favdrink,visit_time,visits_per_week\n",
        )
        .unwrap();
        let store = RecordStore::new(&path);
        let e = entry("A", "latte", "morning", 2);
        store.append(&e).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents.lines().last(),
            Some("2024-03-01 08:00:00,A,,latte,morning,2")
        );
        assert_eq!(store.load_all().unwrap(), vec![e]);
    }

    #[test]
    fn append_rejected_when_header_lacks_a_column() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.csv");
        let before = "timestamp,coffee_shop,visit_time,visits_per_week\n";
        fs::write(&path, before).unwrap();
        let err = RecordStore::new(&path)
            .append(&entry("A", "latte", "morning", 2))
            .unwrap_err();
        assert!(matches!(*err, SurveyError::CsvMissingColumn { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn whitespace_only_file_counts_as_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(&path, "\n  \n").unwrap();
        let store = RecordStore::new(&path);
        assert_eq!(store.load_all().unwrap(), vec![]);

        let e = entry("A", "latte", "morning", 2);
        store.append(&e).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("timestamp,coffee_shop,favdrink,visit_time,visits_per_week\n"));
        assert_eq!(store.load_all().unwrap(), vec![e]);
    }

    #[test]
    fn malformed_rows_are_parse_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.csv");
        let header = "timestamp,coffee_shop,favdrink,visit_time,visits_per_week\n";

        fs::write(
            &path,
            format!("{}2024-01-01 10:00:00,A,tea,morning,3\n2024-01-02 10:00:00,B,tea,morning,often\n", header),
        )
        .unwrap();
        let err = RecordStore::new(&path).load_all().unwrap_err();
        assert!(matches!(*err, SurveyError::CsvLineParse { lineno: 3, .. }));

        fs::write(&path, format!("{}2024-01-01 10:00:00,A,tea\n", header)).unwrap();
        let err = RecordStore::new(&path).load_all().unwrap_err();
        assert!(matches!(*err, SurveyError::CsvLineParse { lineno: 2, .. }));

        fs::write(&path, "timestamp,coffee_shop,visit_time,visits_per_week\n").unwrap();
        let err = RecordStore::new(&path).load_all().unwrap_err();
        assert!(matches!(*err, SurveyError::CsvMissingColumn { .. }));
    }

    #[test]
    fn new_entry_timestamp_is_readable() {
        let e = new_entry("A", "latte", "morning", 2);
        assert!(parse_entry_date(&e.timestamp).is_some());
    }

    #[test]
    fn show_page_reports_summary() {
        let dir = TempDir::new().unwrap();
        let settings = settings(&dir);
        let page = show_page(&settings);
        assert_eq!(page["warnings"].as_array().unwrap().len(), 1);

        submit_page(&settings, &entry("A", "latte", "morning", 4)).unwrap();
        submit_page(&settings, &entry("A", "mocha", "evening", 6)).unwrap();
        submit_page(&settings, &entry("B", "tea", "morning", 5)).unwrap();
        let page = show_page(&settings);
        assert_eq!(page["summary"]["totalEntries"], json!(3));
        assert_eq!(page["summary"]["uniqueCoffeeShops"], json!(2));
        assert_eq!(page["summary"]["avgVisitsPerWeekDisplay"], json!("5.0"));
        assert_eq!(page["entries"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn visuals_page_degrades_without_files() {
        let dir = TempDir::new().unwrap();
        let page = visuals_page(&settings(&dir));
        assert_eq!(page["warnings"].as_array().unwrap().len(), 2);
        assert!(page.get("studySeats").is_none());
        assert!(page.get("coffeeChart").is_none());
    }

    #[test]
    fn visuals_page_builds_all_charts() {
        let dir = TempDir::new().unwrap();
        let mut settings = settings(&dir);
        fs::write(&settings.reference_path, DATASET).unwrap();
        submit_page(&settings, &entry("A", "latte", "morning", 4)).unwrap();
        settings.session.metric = Metric::WifiSpeed;
        settings.session.sort_order = SortOrder::Descending;
        settings.session.graph_type = settings.session.graph_type.toggled();

        let page = visuals_page(&settings);
        assert_eq!(page["warnings"], json!([]));
        assert_eq!(page["studySeats"][0], json!({"library": "Main", "studySeats": 120}));
        assert_eq!(page["metricComparison"]["series"][0]["library"], json!("Science"));
        assert_eq!(page["coffeeChart"]["graphType"], json!("line"));
        assert_eq!(
            page["coffeeChart"]["series"],
            json!([{"coffeeShop": "A", "avgVisitsPerWeek": 4.0}])
        );
    }

    #[test]
    fn show_page_reports_broken_record_file() {
        let dir = TempDir::new().unwrap();
        let settings = settings(&dir);
        fs::write(
            &settings.data_path,
            "timestamp,coffee_shop,favdrink,visit_time,visits_per_week\nx,A,tea,morning,lots\n",
        )
        .unwrap();
        let page = show_page(&settings);
        let warnings = page["warnings"].as_array().unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].as_str().unwrap().contains("line 2"));
        assert!(page.get("entries").is_none());
    }

    #[test]
    fn visuals_page_reports_broken_record_file() {
        let dir = TempDir::new().unwrap();
        let settings = settings(&dir);
        fs::write(&settings.reference_path, DATASET).unwrap();
        fs::write(
            &settings.data_path,
            "timestamp,coffee_shop,favdrink,visit_time,visits_per_week\nx,A,tea,morning,lots\n",
        )
        .unwrap();
        let page = visuals_page(&settings);
        let warnings = page["warnings"].as_array().unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].as_str().unwrap().contains("line 2"));
        assert!(page.get("metricComparison").is_some());
    }
}
