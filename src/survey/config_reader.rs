use std::fs;

use log::debug;
use serde::{Deserialize, Serialize};
use snafu::prelude::*;

use crate::survey::*;

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSettings {
    /// A file path, or "stdout".
    #[serde(rename = "outputPath")]
    pub output_path: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplaySettings {
    #[serde(rename = "graphType")]
    pub graph_type: Option<String>,
    #[serde(rename = "chartStyle")]
    pub chart_style: Option<String>,
    pub metric: Option<String>,
    #[serde(rename = "sortOrder")]
    pub sort_order: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct SurveyConfig {
    #[serde(rename = "dataPath")]
    pub data_path: Option<String>,
    #[serde(rename = "referencePath")]
    pub reference_path: Option<String>,
    #[serde(rename = "outputSettings", default)]
    pub output_settings: OutputSettings,
    #[serde(default)]
    pub display: DisplaySettings,
}

pub fn read_config(path: &str) -> BSurveyResult<SurveyConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: SurveyConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    debug!("read_config: {:?}", config);
    Ok(config)
}

/// Turns the display section of the configuration into a session.
/// Missing entries keep their default value.
pub fn validate_display(display: &DisplaySettings) -> SurveyResult<SessionConfig> {
    let mut session = SessionConfig::DEFAULT_SESSION;
    if let Some(g) = &display.graph_type {
        session.graph_type = parse_graph_type(g)?;
    }
    if let Some(c) = &display.chart_style {
        session.chart_style = parse_chart_style(c)?;
    }
    if let Some(m) = &display.metric {
        session.metric = m.parse::<Metric>().context(StatsSnafu {})?;
    }
    if let Some(s) = &display.sort_order {
        session.sort_order = parse_sort_order(s)?;
    }
    Ok(session)
}

pub fn parse_graph_type(s: &str) -> SurveyResult<GraphType> {
    match s.to_lowercase().as_str() {
        "bar" => Ok(GraphType::Bar),
        "line" => Ok(GraphType::Line),
        _ => whatever!("unknown graph type: {} (expected bar or line)", s),
    }
}

pub fn parse_chart_style(s: &str) -> SurveyResult<ChartStyle> {
    match s {
        "averageVisits" | "average-visits" | "Average Visits" => Ok(ChartStyle::AverageVisits),
        "visitDistribution" | "visit-distribution" | "Visit Distribution" => {
            Ok(ChartStyle::VisitDistribution)
        }
        "timePattern" | "time-pattern" | "Time Pattern" => Ok(ChartStyle::TimePattern),
        _ => whatever!("unknown chart style: {}", s),
    }
}

pub fn parse_sort_order(s: &str) -> SurveyResult<SortOrder> {
    match s.to_lowercase().as_str() {
        "asc" | "ascending" => Ok(SortOrder::Ascending),
        "desc" | "descending" => Ok(SortOrder::Descending),
        _ => whatever!("unknown sort order: {} (expected asc or desc)", s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_gives_defaults() {
        let config: SurveyConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, SurveyConfig::default());
        assert_eq!(
            validate_display(&config.display).unwrap(),
            SessionConfig::DEFAULT_SESSION
        );
    }

    #[test]
    fn display_section_is_read() {
        let config: SurveyConfig = serde_json::from_str(
            r#"{
                "dataPath": "answers.csv",
                "outputSettings": {"outputPath": "stdout"},
                "display": {
                    "graphType": "line",
                    "chartStyle": "timePattern",
                    "metric": "WiFi Speed",
                    "sortOrder": "descending"
                }
            }"#,
        )
        .unwrap();
        assert_eq!(config.data_path.as_deref(), Some("answers.csv"));
        let session = validate_display(&config.display).unwrap();
        assert_eq!(
            session,
            SessionConfig {
                graph_type: GraphType::Line,
                chart_style: ChartStyle::TimePattern,
                metric: Metric::WifiSpeed,
                sort_order: SortOrder::Descending,
            }
        );
    }

    #[test]
    fn unknown_display_values_are_rejected() {
        let display = DisplaySettings {
            metric: Some("unknown_metric".to_string()),
            ..DisplaySettings::default()
        };
        let err = validate_display(&display).unwrap_err();
        assert!(matches!(
            err,
            SurveyError::Stats {
                source: StatsError::UnknownMetric(_)
            }
        ));
        assert!(parse_sort_order("sideways").is_err());
        assert!(parse_graph_type("pie").is_err());
        assert!(parse_chart_style("Heat Map").is_err());
    }
}
