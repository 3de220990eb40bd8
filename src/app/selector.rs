//! Observation Selector
//!
//! Picks the most recent observation of a result set by start time and
//! renders a short summary of it.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::app::models::ObservationRecord;
use crate::errors::SelectionError;

/// Milliseconds in one day
const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Select the observation with the latest start time
///
/// Records without a start time are ignored. Among records sharing the
/// maximal start time, the first one in input order wins.
///
/// # Errors
///
/// Returns [`SelectionError::NoTimingInformation`] when no record carries
/// a start time (typically a proposal whose observations are still planned).
pub fn select_latest(records: &[ObservationRecord]) -> Result<&ObservationRecord, SelectionError> {
    let mut latest: Option<(&ObservationRecord, f64)> = None;

    for record in records.iter().filter(|r| r.is_timed()) {
        let Some(t_min) = record.t_min else { continue };
        match latest {
            Some((_, best)) if t_min <= best => {}
            _ => latest = Some((record, t_min)),
        }
    }

    latest
        .map(|(record, _)| record)
        .ok_or(SelectionError::NoTimingInformation {
            records: records.len(),
        })
}

/// Convert a Modified Julian Date to a UTC timestamp
///
/// MJD 0 is 1858-11-17T00:00:00. The value is rounded to the nearest
/// millisecond.
pub fn mjd_to_datetime(mjd: f64) -> Option<NaiveDateTime> {
    if !mjd.is_finite() {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1858, 11, 17)?.and_hms_opt(0, 0, 0)?;
    let millis = (mjd * MILLIS_PER_DAY).round();
    if millis.abs() > i64::MAX as f64 {
        return None;
    }
    epoch.checked_add_signed(Duration::milliseconds(millis as i64))
}

/// Format a Modified Julian Date as ISO-8601 (`YYYY-MM-DDTHH:MM:SS.sss`)
pub fn mjd_to_isot(mjd: f64) -> Option<String> {
    mjd_to_datetime(mjd).map(|dt| dt.format("%Y-%m-%dT%H:%M:%S%.3f").to_string())
}

/// Printable summary of the selected observation
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationSummary {
    pub obsid: String,
    pub proposal_id: String,
    pub principal_investigator: String,
    pub target_name: String,
    pub start_time: String,
}

impl ObservationSummary {
    /// Build the summary of a record
    pub fn from_record(record: &ObservationRecord) -> Self {
        let or_unknown = |value: &Option<String>| value.clone().unwrap_or_else(|| "None".to_string());
        Self {
            obsid: record.obsid.clone(),
            proposal_id: or_unknown(&record.proposal_id),
            principal_investigator: or_unknown(&record.proposal_pi),
            target_name: or_unknown(&record.target_name),
            start_time: record
                .t_min
                .and_then(mjd_to_isot)
                .unwrap_or_else(|| "None".to_string()),
        }
    }

    /// Status lines shown to the operator
    pub fn lines(&self) -> Vec<String> {
        vec![
            "     LATEST OBSERVATION:".to_string(),
            format!("     obsid: {}", self.obsid),
            format!("     proposal_id: {}", self.proposal_id),
            format!("     PI: {}", self.principal_investigator),
            format!("     target_name: {}", self.target_name),
            format!("     t_min: {}", self.start_time),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(obsid: &str, t_min: Option<f64>) -> ObservationRecord {
        ObservationRecord {
            obsid: obsid.to_string(),
            proposal_id: Some("1234".to_string()),
            proposal_pi: Some("Smith, Jane".to_string()),
            target_name: Some("NGC 1234".to_string()),
            t_min,
        }
    }

    #[test]
    fn test_select_latest_skips_untimed() {
        // Test that null start times are neither oldest nor newest
        let records = vec![
            record("a", None),
            record("b", Some(59000.5)),
            record("c", Some(59010.2)),
        ];
        assert_eq!(select_latest(&records).unwrap().obsid, "c");
    }

    #[test]
    fn test_select_latest_first_of_ties() {
        // Test that equal maxima resolve to the first occurrence
        let records = vec![
            record("a", Some(59000.0)),
            record("b", Some(59010.0)),
            record("c", Some(59010.0)),
            record("d", Some(58000.0)),
        ];
        assert_eq!(select_latest(&records).unwrap().obsid, "b");
    }

    #[test]
    fn test_select_latest_all_untimed() {
        let records = vec![record("a", None), record("b", None)];
        assert_eq!(
            select_latest(&records),
            Err(SelectionError::NoTimingInformation { records: 2 })
        );
        assert!(select_latest(&[]).is_err());
    }

    #[test]
    fn test_select_latest_ignores_nan() {
        let records = vec![record("a", Some(f64::NAN)), record("b", Some(1.0))];
        assert_eq!(select_latest(&records).unwrap().obsid, "b");
    }

    #[test]
    fn test_mjd_conversion() {
        // Test well-known reference dates
        assert_eq!(mjd_to_isot(0.0).unwrap(), "1858-11-17T00:00:00.000");
        assert_eq!(mjd_to_isot(51544.0).unwrap(), "2000-01-01T00:00:00.000");
        assert_eq!(mjd_to_isot(59000.5).unwrap(), "2020-05-31T12:00:00.000");
        assert!(mjd_to_isot(f64::INFINITY).is_none());
    }

    #[test]
    fn test_summary_lines() {
        let summary = ObservationSummary::from_record(&record("2003839997", Some(51544.25)));
        let lines = summary.lines();

        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "     LATEST OBSERVATION:");
        assert_eq!(lines[1], "     obsid: 2003839997");
        assert_eq!(lines[3], "     PI: Smith, Jane");
        assert_eq!(lines[5], "     t_min: 2000-01-01T06:00:00.000");
    }
}
