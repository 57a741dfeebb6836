// Reading the library comparison dataset.

use std::fs;
use std::path::Path;

use log::debug;
use serde::Deserialize;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use snafu::prelude::*;

use crate::survey::{io_common::display_path, *};

#[derive(PartialEq, Debug, Clone, Deserialize)]
struct RawDataset {
    library_comparison: RawComparison,
}

#[derive(PartialEq, Debug, Clone, Deserialize)]
struct RawComparison {
    libraries: Vec<RawLibrary>,
    comparison_metrics: JSMap<String, JSValue>,
}

#[derive(PartialEq, Debug, Clone, Deserialize)]
struct RawLibrary {
    name: String,
    study_seats: u64,
    #[serde(flatten)]
    other: JSMap<String, JSValue>,
}

pub fn read_reference_dataset(path: &Path) -> BSurveyResult<ReferenceDataset> {
    let p = display_path(path);
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path: p.clone() })?;
    parse_reference_dataset(&contents, &p)
}

pub fn parse_reference_dataset(contents: &str, path: &str) -> BSurveyResult<ReferenceDataset> {
    let raw: RawDataset = serde_json::from_str(contents).context(ParsingJsonSnafu { path })?;
    let comparison = raw.library_comparison;

    let libraries: Vec<Library> = comparison
        .libraries
        .into_iter()
        .map(|lib| Library {
            name: lib.name,
            study_seats: lib.study_seats,
            attributes: lib
                .other
                .iter()
                .filter_map(|(k, v)| v.as_f64().map(|x| (k.clone(), x)))
                .collect(),
        })
        .collect();

    let mut metrics: Vec<MetricTable> = Vec::new();
    for metric in Metric::ALL.iter() {
        let key = format!("library_comparison.comparison_metrics.{}", metric.name());
        let table = comparison
            .comparison_metrics
            .get(metric.name())
            .and_then(|js| js.as_object())
            .context(MissingJsonKeySnafu { key: key.clone() })?;
        let mut values: Vec<(String, f64)> = Vec::new();
        for (name, js) in table.iter() {
            let v = js.as_f64().context(ParsingJsonNumberSnafu {
                key: format!("{}.{}", key, name),
            })?;
            values.push((name.clone(), v));
        }
        debug!("parse_reference_dataset: {}: {:?}", metric.name(), values);
        metrics.push(MetricTable {
            metric: *metric,
            values,
        });
    }

    Ok(ReferenceDataset { libraries, metrics })
}
