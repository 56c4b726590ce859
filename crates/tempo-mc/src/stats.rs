//! Run statistics.

use memory_stats::memory_stats;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Instant;

/// Counters and timing of a reachability run.
#[derive(Debug, Clone, Default)]
pub struct Stats {
    /// States dequeued from the waiting container.
    pub visited_states: usize,
    /// Transitions computed from visited states.
    pub visited_transitions: usize,
    /// Whether a state satisfying the labels was reached.
    pub reachable: bool,
    start: Option<Instant>,
    end: Option<Instant>,
}

impl Stats {
    pub fn new() -> Stats {
        Stats::default()
    }

    pub fn set_start_time(&mut self) {
        self.start = Some(Instant::now());
    }

    pub fn set_end_time(&mut self) {
        self.end = Some(Instant::now());
    }

    /// Seconds between the start and end marks; zero when either is unset.
    pub fn running_time(&self) -> f64 {
        match (self.start, self.end) {
            (Some(start), Some(end)) => end.duration_since(start).as_secs_f64(),
            _ => 0.0,
        }
    }

    /// Resident set size in KiB as reported by the OS, `-1` when
    /// unavailable.
    pub fn max_rss(&self) -> i64 {
        match memory_stats() {
            Some(usage) => (usage.physical_mem / 1024) as i64,
            None => -1,
        }
    }

    /// Dumps the statistics as key/value attributes.
    pub fn attributes(&self, map: &mut BTreeMap<String, String>) {
        map.insert(
            "RUNNING_TIME_SECONDS".to_string(),
            self.running_time().to_string(),
        );
        map.insert("MEMORY_MAX_RSS".to_string(), self.max_rss().to_string());
        map.insert(
            "VISITED_STATES".to_string(),
            self.visited_states.to_string(),
        );
        map.insert(
            "VISITED_TRANSITIONS".to_string(),
            self.visited_transitions.to_string(),
        );
        map.insert("REACHABLE".to_string(), self.reachable.to_string());
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "visited_states={} visited_transitions={} reachable={}",
            self.visited_states, self.visited_transitions, self.reachable
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn running_time_is_non_negative() {
        let mut stats = Stats::new();
        assert_eq!(stats.running_time(), 0.0);
        stats.set_start_time();
        stats.set_end_time();
        assert!(stats.running_time() >= 0.0);
    }

    #[test]
    fn attributes_contain_the_standard_keys() {
        let mut stats = Stats::new();
        stats.visited_states = 3;
        stats.visited_transitions = 2;
        let mut map = BTreeMap::new();
        stats.attributes(&mut map);
        assert!(map.contains_key("RUNNING_TIME_SECONDS"));
        assert!(map.contains_key("MEMORY_MAX_RSS"));
        assert_eq!(map["VISITED_STATES"], "3");
        assert_eq!(map["VISITED_TRANSITIONS"], "2");
        assert_eq!(map["REACHABLE"], "false");
    }
}
