use std::collections::HashMap;
use std::hash::Hash;

/// Options for one intersection observer.
#[derive(Clone, Debug, PartialEq)]
pub struct ObserveConfig {
    pub root_margin: String,
    pub thresholds: Vec<f64>,
    /// Stop watching an element after it has been seen once.
    pub once: bool,
}

impl ObserveConfig {
    /// Fires as soon as the element comes within `margin` of the viewport, then stops.
    pub fn lazy_load(margin: &str) -> Self {
        Self {
            root_margin: margin.to_string(),
            thresholds: vec![0.0],
            once: true,
        }
    }

    pub fn presence(threshold: f64) -> Self {
        Self {
            root_margin: "0px".to_string(),
            thresholds: vec![threshold],
            once: false,
        }
    }

    pub fn reveal(threshold: f64) -> Self {
        Self {
            root_margin: "0px".to_string(),
            thresholds: vec![threshold],
            once: true,
        }
    }

    fn min_threshold(&self) -> f64 {
        self.thresholds
            .iter()
            .copied()
            .fold(f64::INFINITY, f64::min)
            .max(0.0)
            .min(1.0)
    }

    fn counts_as_visible(&self, record: VisibilityRecord) -> bool {
        let threshold = self.min_threshold();
        record.is_intersecting && (threshold == 0.0 || record.ratio >= threshold)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisibilityRecord {
    pub is_intersecting: bool,
    pub ratio: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisibilityChange {
    Entered,
    Exited,
}

impl VisibilityChange {
    pub fn is_entered(self) -> bool {
        self == VisibilityChange::Entered
    }
}

/// Per-observer bookkeeping: which elements are watched and whether each one
/// was last seen inside the viewport. Browser callbacks feed `record`, which
/// only reports actual flips.
#[derive(Debug)]
pub struct VisibilityTracker<K> {
    config: ObserveConfig,
    watched: HashMap<K, bool>,
    degraded: bool,
}

impl<K: Eq + Hash + Clone> VisibilityTracker<K> {
    pub fn new(config: ObserveConfig) -> Self {
        Self {
            config,
            watched: HashMap::new(),
            degraded: false,
        }
    }

    /// Tracker for a page without intersection support: everything is visible.
    pub fn degraded(config: ObserveConfig) -> Self {
        Self {
            degraded: true,
            ..Self::new(config)
        }
    }

    #[cfg(test)]
    pub fn config(&self) -> &ObserveConfig {
        &self.config
    }

    #[cfg(test)]
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Starts watching `key`. A degraded tracker answers with an immediate entry.
    pub fn observe(&mut self, key: K) -> Option<VisibilityChange> {
        if self.degraded {
            if !self.config.once {
                self.watched.insert(key, true);
            }
            return Some(VisibilityChange::Entered);
        }
        self.watched.entry(key).or_insert(false);
        None
    }

    pub fn unobserve(&mut self, key: &K) -> bool {
        self.watched.remove(key).is_some()
    }

    pub fn is_observing(&self, key: &K) -> bool {
        self.watched.contains_key(key)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.watched.len()
    }

    pub fn record(&mut self, key: &K, record: VisibilityRecord) -> Option<VisibilityChange> {
        let visible = self.config.counts_as_visible(record);
        let was_visible = self.watched.get_mut(key)?;
        if *was_visible == visible {
            return None;
        }
        *was_visible = visible;

        if visible {
            if self.config.once {
                self.watched.remove(key);
            }
            Some(VisibilityChange::Entered)
        } else {
            Some(VisibilityChange::Exited)
        }
    }
}
