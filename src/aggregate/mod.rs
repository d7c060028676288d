//! Turns raw work logs into the series shown by the views. Everything here is pure: the same input
//! always gives the same output and nothing is cached between calls.

pub mod daily;
pub mod snapshot;
pub mod task_share;

use serde::Serialize;

use crate::utils::time::round_to;

/// Index aligned labels and values. Values are rounded to `decimals` when they are pushed, and
/// [Series::formatted_values] renders them with exactly that many decimals.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Series {
    labels: Vec<String>,
    values: Vec<f64>,
    decimals: usize,
}

impl Series {
    pub fn with_decimals(decimals: usize) -> Self {
        Self {
            labels: vec![],
            values: vec![],
            decimals,
        }
    }

    pub fn push(&mut self, label: impl Into<String>, value: f64) {
        self.labels.push(label.into());
        self.values.push(round_to(value, self.decimals));
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn decimals(&self) -> usize {
        self.decimals
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn formatted_values(&self) -> Vec<String> {
        self.values
            .iter()
            .map(|v| format!("{:.*}", self.decimals, v))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}
