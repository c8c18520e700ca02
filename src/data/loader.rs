use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde_json::Value as JsonValue;

use super::model::{SensorDataset, SensorReading};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a readings file.  Dispatch by extension.
///
/// Supported formats:
/// * `.json` – `[{ "id": 1, "sensorId": "TEMP_001", ... }, ...]`
/// * `.csv`  – header `id,sensorId,vehicleId,trackLayout,sensorValue,year`,
///   or a data logger export (see [`parse_logger_export`])
pub fn load_file(path: &Path) -> Result<SensorDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let readings = match ext.as_str() {
        "json" => {
            let text = std::fs::read_to_string(path).context("reading JSON file")?;
            parse_json(&text)?
        }
        "csv" => {
            let text = std::fs::read_to_string(path).context("reading CSV file")?;
            if is_readings_csv(&text) {
                parse_csv(text.as_bytes())?
            } else {
                log::info!("{} looks like a logger export", path.display());
                parse_logger_export(&text)?
            }
        }
        other => bail!("Unsupported file extension: .{other}"),
    };

    check_unique_ids(&readings)?;
    Ok(SensorDataset::from_readings(readings))
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

/// Records-oriented JSON, one object per reading:
///
/// ```json
/// [
///   { "id": 1, "sensorId": "TEMP_001", "vehicleId": "MK1",
///     "trackLayout": "Oval", "sensorValue": 95.5, "year": 2022 },
///   ...
/// ]
/// ```
pub fn parse_json(text: &str) -> Result<Vec<SensorReading>> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    records
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            if !rec.is_object() {
                bail!("Row {i} is not a JSON object");
            }
            serde_json::from_value::<SensorReading>(rec.clone())
                .with_context(|| format!("Row {i}: invalid reading"))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// CSV with a header row naming the camelCase fields. Column order is free.
pub fn parse_csv<R: Read>(input: R) -> Result<Vec<SensorReading>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);

    let mut readings = Vec::new();
    for (row_no, result) in reader.deserialize::<SensorReading>().enumerate() {
        let reading = result.with_context(|| format!("CSV row {row_no}"))?;
        readings.push(reading);
    }
    Ok(readings)
}

/// A readings CSV names `sensorId` in its header row; anything else is
/// treated as a logger export.
fn is_readings_csv(text: &str) -> bool {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());
    match reader.records().next() {
        Some(Ok(header)) => header.iter().any(|field| field == "sensorId"),
        _ => true,
    }
}

// ---------------------------------------------------------------------------
// Data logger export
// ---------------------------------------------------------------------------

/// Lines of `"key","value"` session metadata at the top of an export.
pub const EXPORT_METADATA_LINES: usize = 13;

/// Lines before the channel header row.
pub const EXPORT_HEADER_ROW: usize = 15;

/// Sample timestamp column, not a sensor channel.
const TIME_CHANNEL: &str = "Time";

/// Track layout for exports without a `Segment` entry.
pub const UNKNOWN_LAYOUT: &str = "Unknown";

/// Parse the `"key","value"` metadata block (`Vehicle`, `Racer`, `Date`,
/// `Time`, `Sample Rate`, `Duration`, `Segment`, ...). Lines with fewer than
/// two fields are ignored.
pub fn parse_export_metadata(text: &str) -> Result<BTreeMap<String, String>> {
    let head = text
        .lines()
        .take(EXPORT_METADATA_LINES)
        .collect::<Vec<_>>()
        .join("\n");
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(head.as_bytes());

    let mut metadata = BTreeMap::new();
    for (line_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("Export metadata line {line_no}"))?;
        if let (Some(key), Some(value)) = (record.get(0), record.get(1)) {
            metadata.insert(key.to_string(), value.to_string());
        }
    }
    Ok(metadata)
}

/// Convert a logger export into one reading per channel.
///
/// Layout: [`EXPORT_METADATA_LINES`] metadata lines, then the channel header
/// on line [`EXPORT_HEADER_ROW`] (0-based) followed by one row per sample.
/// `Vehicle` becomes the vehicle id, the four-digit year in `Date` the year,
/// `Segment` the track layout. Each channel except `Time` yields a reading
/// whose value is the channel's peak sample; blank or non-numeric cells are
/// skipped, and channels without any numeric sample produce no reading.
pub fn parse_logger_export(text: &str) -> Result<Vec<SensorReading>> {
    if text.lines().count() <= EXPORT_HEADER_ROW {
        bail!("Logger export ends before the channel header (line {})", EXPORT_HEADER_ROW + 1);
    }

    let metadata = parse_export_metadata(text)?;
    let vehicle = metadata
        .get("Vehicle")
        .filter(|v| !v.is_empty())
        .context("Export metadata missing 'Vehicle'")?;
    let date = metadata
        .get("Date")
        .context("Export metadata missing 'Date'")?;
    let year = year_from_date(date).with_context(|| format!("No year in export date '{date}'"))?;
    let layout = metadata
        .get("Segment")
        .filter(|s| !s.is_empty())
        .map(String::as_str)
        .unwrap_or(UNKNOWN_LAYOUT);

    let body = text
        .lines()
        .skip(EXPORT_HEADER_ROW)
        .collect::<Vec<_>>()
        .join("\n");
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let channels: Vec<String> = reader
        .headers()
        .context("reading export channel header")?
        .iter()
        .map(|h| h.to_string())
        .collect();
    let mut peaks: Vec<Option<f64>> = vec![None; channels.len()];

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("Export data row {row_no}"))?;
        for (peak, cell) in peaks.iter_mut().zip(record.iter()) {
            let Ok(value) = cell.parse::<f64>() else {
                continue;
            };
            if value.is_finite() {
                *peak = Some(peak.map_or(value, |p| p.max(value)));
            }
        }
    }

    let readings: Vec<SensorReading> = channels
        .iter()
        .zip(peaks)
        .filter(|(name, _)| !name.is_empty() && name.as_str() != TIME_CHANNEL)
        .filter_map(|(name, peak)| peak.map(|value| (name, value)))
        .enumerate()
        .map(|(i, (name, value))| {
            SensorReading::new(i as i64 + 1, name, vehicle, layout, value, year)
        })
        .collect();

    log::debug!(
        "Logger export for {vehicle} ({year}, {layout}): {} channels with data",
        readings.len()
    );
    Ok(readings)
}

/// First run of exactly four digits, e.g. `2022` in `14/05/2022` or `2022-05-14`.
fn year_from_date(date: &str) -> Option<i64> {
    date.split(|c: char| !c.is_ascii_digit())
        .find(|part| part.len() == 4)
        .and_then(|part| part.parse().ok())
}

fn check_unique_ids(readings: &[SensorReading]) -> Result<()> {
    let mut seen = BTreeSet::new();
    for reading in readings {
        if !seen.insert(reading.id) {
            bail!("Duplicate reading id {}", reading.id);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_readings() {
        let text = r#"[
            {"id": 1, "sensorId": "TEMP_001", "vehicleId": "MK1",
             "trackLayout": "Oval", "sensorValue": 95.5, "year": 2022},
            {"id": 2, "sensorId": "PRES_002", "vehicleId": "EV1",
             "trackLayout": "Street", "sensorValue": 2, "year": 2024}
        ]"#;
        let readings = parse_json(text).unwrap();
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0], SensorReading::new(1, "TEMP_001", "MK1", "Oval", 95.5, 2022));
        assert_eq!(readings[1].sensor_value, 2.0);
    }

    #[test]
    fn test_parse_json_rejects_non_array() {
        let err = parse_json(r#"{"id": 1}"#).unwrap_err();
        assert!(err.to_string().contains("top-level JSON array"));
    }

    #[test]
    fn test_parse_json_reports_bad_row() {
        let text = r#"[{"id": 1, "sensorId": "A", "vehicleId": "B",
                        "trackLayout": "Oval", "sensorValue": "hot", "year": 2022}]"#;
        let err = parse_json(text).unwrap_err();
        assert!(format!("{err:#}").contains("Row 0"));
    }

    #[test]
    fn test_parse_csv_readings() {
        let text = "\
id,sensorId,vehicleId,trackLayout,sensorValue,year
4,SPEED_003,MK3,Road,180.5,2023
5, PRES_002 ,MK2,Street,2.3,2022
";
        let readings = parse_csv(text.as_bytes()).unwrap();
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0], SensorReading::new(4, "SPEED_003", "MK3", "Road", 180.5, 2023));
        assert_eq!(readings[1].sensor_id, "PRES_002");
    }

    #[test]
    fn test_parse_csv_reports_bad_row() {
        let text = "id,sensorId,vehicleId,trackLayout,sensorValue,year\nx,A,B,Oval,1.0,2022\n";
        let err = parse_csv(text.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("CSV row 0"));
    }

    #[test]
    fn test_empty_inputs_are_valid() {
        assert!(parse_json("[]").unwrap().is_empty());
        let header_only = "id,sensorId,vehicleId,trackLayout,sensorValue,year\n";
        assert!(parse_csv(header_only.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let readings = vec![
            SensorReading::new(1, "A", "B", "Oval", 1.0, 2022),
            SensorReading::new(1, "C", "D", "Road", 2.0, 2023),
        ];
        assert!(check_unique_ids(&readings).is_err());
        assert!(check_unique_ids(&readings[..1]).is_ok());
    }

    const LOGGER_EXPORT: &str = r#""Format","MoTeC CSV File"
"Venue","Calder"
"Vehicle","MK4"
"Racer","J. Doe"
"Device","ADL"
"Comment",""
"Date","14/05/2022"
"Time","10:31:07"
"Sample Rate","20"
"Duration","0.15"
"Segment","Oval"
"Event","Practice"
"Session","1"
"Beacon Markers","61.2"
"Segment Times","1:01.2"
"Time","LoggerTemp","Speed1","ECU RPM","Luminosity"
"0.00","41.5","0.0","900",""
"0.05","41.7","12.4","3200",""
"0.10","41.6","13.0","",""
"#;

    #[test]
    fn test_parse_export_metadata() {
        let metadata = parse_export_metadata(LOGGER_EXPORT).unwrap();
        assert_eq!(metadata.len(), 13);
        assert_eq!(metadata["Vehicle"], "MK4");
        assert_eq!(metadata["Racer"], "J. Doe");
        assert_eq!(metadata["Sample Rate"], "20");
        assert_eq!(metadata["Comment"], "");
        assert!(!metadata.contains_key("Beacon Markers"));
    }

    #[test]
    fn test_parse_logger_export() {
        let readings = parse_logger_export(LOGGER_EXPORT).unwrap();
        assert_eq!(
            readings,
            vec![
                SensorReading::new(1, "LoggerTemp", "MK4", "Oval", 41.7, 2022),
                SensorReading::new(2, "Speed1", "MK4", "Oval", 13.0, 2022),
                SensorReading::new(3, "ECU RPM", "MK4", "Oval", 3200.0, 2022),
            ]
        );
    }

    #[test]
    fn test_logger_export_needs_vehicle_and_year() {
        let no_vehicle = LOGGER_EXPORT.replace(r#""Vehicle","MK4""#, r#""Vehicle","""#);
        let err = parse_logger_export(&no_vehicle).unwrap_err();
        assert!(err.to_string().contains("Vehicle"));

        let no_year = LOGGER_EXPORT.replace("14/05/2022", "14/05/22");
        let err = parse_logger_export(&no_year).unwrap_err();
        assert!(err.to_string().contains("14/05/22"));
    }

    #[test]
    fn test_logger_export_without_segment_uses_unknown_layout() {
        let text = LOGGER_EXPORT.replace(r#""Segment","Oval""#, r#""Notes","dry""#);
        let readings = parse_logger_export(&text).unwrap();
        assert!(readings.iter().all(|r| r.track_layout == UNKNOWN_LAYOUT));
    }

    #[test]
    fn test_truncated_logger_export() {
        let head: Vec<&str> = LOGGER_EXPORT.lines().take(10).collect();
        assert!(parse_logger_export(&head.join("\n")).is_err());
    }

    #[test]
    fn test_csv_kind_detection() {
        assert!(!is_readings_csv(LOGGER_EXPORT));
        assert!(is_readings_csv("id,sensorId,vehicleId,trackLayout,sensorValue,year\n"));
        assert!(is_readings_csv("\"id\",\"sensorId\",\"vehicleId\"\n"));
        assert!(is_readings_csv(""));
    }

    #[test]
    fn test_year_from_date() {
        assert_eq!(year_from_date("2023-08-01"), Some(2023));
        assert_eq!(year_from_date("8/1/2023"), Some(2023));
        assert_eq!(year_from_date("01.08.23"), None);
    }

    #[test]
    fn test_integral_floats_accepted() {
        let text = r#"[{"id": 1.0, "sensorId": "TEMP_001", "vehicleId": "MK1",
                        "trackLayout": "Oval", "sensorValue": 95.5, "year": 2022.0}]"#;
        let readings = parse_json(text).unwrap();
        assert_eq!(readings[0].id, 1);
        assert_eq!(readings[0].year, 2022);

        let csv_text = "id,sensorId,vehicleId,trackLayout,sensorValue,year\n2,PRES_002,EV1,Street,2.1,2024.0\n";
        assert_eq!(parse_csv(csv_text.as_bytes()).unwrap()[0].year, 2024);
    }

    #[test]
    fn test_fractional_year_rejected() {
        let text = r#"[{"id": 1, "sensorId": "TEMP_001", "vehicleId": "MK1",
                        "trackLayout": "Oval", "sensorValue": 95.5, "year": 2022.5}]"#;
        let err = parse_json(text).unwrap_err();
        assert!(format!("{err:#}").contains("Row 0"));
    }

    #[test]
    fn test_unknown_extension() {
        let err = load_file(Path::new("readings.xlsx")).unwrap_err();
        assert!(err.to_string().contains(".xlsx"));
    }
}
