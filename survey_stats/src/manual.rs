/*!

This is the long-form manual for `survey_stats` and the `survey` command.

## Files

### The record file (`data.csv` by default)

Survey answers are appended to a comma separated file. The first line is always the header:

```text
timestamp,coffee_shop,favdrink,visit_time,visits_per_week
2024-03-01 08:12:45,Blue Bottle,Cortado,morning,3
```

Rows are only ever appended. The columns may be reordered by hand (for instance after editing
the file in a spreadsheet), they are matched by name when reading and new rows follow the
order of the existing header. A file holding only blank lines counts as empty.

### The reference dataset (`data.json` by default)

```json
{
  "library_comparison": {
    "libraries": [
      { "name": "Main Library", "study_seats": 450 },
      { "name": "Science Library", "study_seats": 220 }
    ],
    "comparison_metrics": {
      "hours_accessible": { "Main Library": 18, "Science Library": 14 },
      "study_seat_availability": { "Main Library": 0.35, "Science Library": 0.6 },
      "wifi_speed_mbps": { "Main Library": 300, "Science Library": 500 }
    }
  }
}
```

The order of the libraries inside each metric is kept: two libraries with the same value are
always displayed in that order.

## Timestamps

The time pattern chart groups answers by day. The following forms are read:
* `2024-03-01 08:12:45` (the form written by `survey submit`)
* `2024-03-01T08:12:45`, optionally with fractional seconds
* `2024-03-01T08:12:45+01:00` (RFC 3339)
* `2024-03-01`

Any other value is left out of the chart and reported in the logs.

## Metrics

| name                      | label                     |
|---------------------------|---------------------------|
| `hours_accessible`        | Hours Accessible          |
| `study_seat_availability` | Study Seat Availability   |
| `wifi_speed_mbps`         | WiFi Speed                |

Both forms are accepted wherever a metric is asked for.

*/
