// Bounded in-memory history per metric series

use std::collections::{BTreeMap, VecDeque};

/// Fixed-capacity rolling window of past values. Appending past capacity
/// evicts exactly the oldest value; nothing is ever persisted.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    capacity: usize,
    values: VecDeque<f64>,
}

impl HistoryBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            values: VecDeque::with_capacity(capacity.max(1)),
        }
    }

    pub fn push(&mut self, value: f64) {
        if self.values.len() == self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn latest(&self) -> Option<f64> {
        self.values.back().copied()
    }

    /// Last `n` values, oldest first. Shorter than `n` when the series is
    /// young; the renderer left-pads.
    pub fn tail(&self, n: usize) -> Vec<f64> {
        let skip = self.values.len().saturating_sub(n);
        self.values.iter().skip(skip).copied().collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.values.iter().copied().collect()
    }
}

/// Keyed series store the sampling pipeline appends into and the renderer
/// reads from. Series names are stable ("cpu", "mem", "disk.read",
/// "disk.write", "net.down", "net.up", "gpu.<id>.util", "gpu.<id>.mem").
#[derive(Debug)]
pub struct HistoryStore {
    capacity: usize,
    series: BTreeMap<String, HistoryBuffer>,
}

impl HistoryStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            series: BTreeMap::new(),
        }
    }

    pub fn push(&mut self, key: &str, value: f64) {
        self.series
            .entry(key.to_string())
            .or_insert_with(|| HistoryBuffer::new(self.capacity))
            .push(value);
    }

    pub fn series(&self, key: &str) -> Option<&HistoryBuffer> {
        self.series.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }
}
