use std::{collections::BTreeMap, sync::Arc};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

/// A single block of work as reported by the data source.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
pub struct LogEntry {
    pub project: Arc<str>,
    pub task: Arc<str>,
    /// Wall clock label of when the work started, for example `09:30`. Never parsed.
    #[serde(default)]
    pub start: Arc<str>,
    /// Seconds.
    pub duration: u64,
}

impl LogEntry {
    pub fn task_key(&self) -> String {
        format!("{} - {}", self.project, self.task)
    }
}

/// Entries grouped by the day they belong to. Days and entries keep the order in which the data
/// source sent them. That order decides slice order in task share views, so a plain map can't be
/// used here.
#[derive(PartialEq, Eq, Debug, Clone, Default)]
pub struct DailyLog {
    days: Vec<(NaiveDate, Vec<LogEntry>)>,
}

impl DailyLog {
    pub fn days(&self) -> impl DoubleEndedIterator<Item = (NaiveDate, &[LogEntry])> {
        self.days
            .iter()
            .map(|(date, entries)| (*date, entries.as_slice()))
    }

    /// All entries of all days, in source order.
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.days.iter().flat_map(|(_, entries)| entries.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Adds entries for a day. A repeated day replaces the previous entries but keeps its
    /// original position, which matches how the data source's JSON objects behave.
    pub fn insert(&mut self, date: NaiveDate, entries: Vec<LogEntry>) {
        match self.days.iter_mut().find(|(day, _)| *day == date) {
            Some((_, existing)) => *existing = entries,
            None => self.days.push((date, entries)),
        }
    }
}

impl FromIterator<(NaiveDate, Vec<LogEntry>)> for DailyLog {
    fn from_iter<T: IntoIterator<Item = (NaiveDate, Vec<LogEntry>)>>(iter: T) -> Self {
        let mut log = DailyLog::default();
        for (date, entries) in iter {
            log.insert(date, entries);
        }
        log
    }
}

impl<'de> Deserialize<'de> for DailyLog {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_map(daily_log_de::DailyLogVisitor)
    }
}

mod daily_log_de {
    use std::fmt;

    use chrono::NaiveDate;
    use serde::de::{MapAccess, Visitor};

    use super::{DailyLog, LogEntry};

    pub struct DailyLogVisitor;

    impl<'de> Visitor<'de> for DailyLogVisitor {
        type Value = DailyLog;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a map from YYYY-MM-DD dates to lists of log entries")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut log = DailyLog::default();
            while let Some((date, entries)) = map.next_entry::<NaiveDate, Vec<LogEntry>>()? {
                log.insert(date, entries);
            }
            Ok(log)
        }
    }
}

/// Total seconds per day. Supplied by the data source and never recomputed from a [DailyLog].
pub type DailyTotal = BTreeMap<NaiveDate, u64>;

/// Payload of `/api/day/...` endpoints.
#[derive(PartialEq, Eq, Debug, Deserialize, Clone, Default)]
pub struct DayLogData {
    #[serde(default)]
    pub logs: DailyLog,
    #[serde(default)]
    pub total: DailyTotal,
}

/// A point of a pre-aggregated running total, from `/api/cumulative/...`.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
pub struct CumulativeSnapshot {
    pub end_time: String,
    /// Seconds.
    pub total: u64,
}

/// Every response of the data source is wrapped into this. Anything but `code == 0` is a failure
/// and `data` then describes the failure. `data` is kept as raw text because decoding it through
/// [serde_json::Value] would lose key order.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    pub code: i64,
    #[serde(default)]
    pub data: Option<Box<RawValue>>,
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::NaiveDate;
    use serde_json::json;

    use super::{DayLogData, LogEntry};

    fn date(value: &str) -> NaiveDate {
        value.parse().unwrap()
    }

    #[test]
    fn test_daily_log_keeps_source_order() -> Result<()> {
        // serde_json::Value sorts keys, so this has to start from text.
        let raw = r#"{
            "logs": {
                "2024-01-03": [{"project": "B", "task": "y", "start": "10:00", "duration": 60}],
                "2024-01-01": [
                    {"project": "A", "task": "x", "start": "09:00", "duration": 30},
                    {"project": "C", "task": "z", "start": "08:00", "duration": 10}
                ]
            },
            "total": {"2024-01-03": 60, "2024-01-01": 40}
        }"#;
        let data: DayLogData = serde_json::from_str(raw)?;

        let days: Vec<_> = data.logs.days().map(|(date, _)| date).collect();
        assert_eq!(days, vec![date("2024-01-03"), date("2024-01-01")]);

        let projects: Vec<_> = data.logs.entries().map(|e| e.project.to_string()).collect();
        assert_eq!(projects, vec!["B", "A", "C"]);

        assert_eq!(data.total.get(&date("2024-01-01")), Some(&40));
        Ok(())
    }

    #[test]
    fn test_repeated_day_replaces_in_place() -> Result<()> {
        let raw = r#"{"logs": {
            "2024-01-01": [{"project": "A", "task": "x", "start": "", "duration": 1}],
            "2024-01-02": [],
            "2024-01-01": [{"project": "B", "task": "x", "start": "", "duration": 2}]
        }}"#;
        let data: DayLogData = serde_json::from_str(raw)?;

        let days: Vec<_> = data.logs.days().collect();
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].0, date("2024-01-01"));
        assert_eq!(days[0].1[0].project.as_ref(), "B");
        Ok(())
    }

    #[test]
    fn test_missing_parts_default_to_empty() -> Result<()> {
        let data: DayLogData = serde_json::from_value(json!({}))?;
        assert!(data.logs.is_empty());
        assert!(data.total.is_empty());
        Ok(())
    }

    #[test]
    fn test_invalid_date_key_is_rejected() {
        let result = serde_json::from_value::<DayLogData>(json!({"logs": {"yesterday": []}}));
        assert!(result.is_err());
    }

    #[test]
    fn test_task_key() {
        let entry = LogEntry {
            project: "worktally".into(),
            task: "review".into(),
            start: "10:00".into(),
            duration: 0,
        };
        assert_eq!(entry.task_key(), "worktally - review");
    }
}
