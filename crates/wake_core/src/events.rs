//! Intersection events
//!
//! Visibility notifications delivered by the host's intersection observer.
//! Entries arrive in batches; ordering is only guaranteed per element.

use std::sync::Arc;

use smallvec::{smallvec, SmallVec};

use crate::error::{HostError, Result};
use crate::host::{ElementId, ElementRef};

/// Visibility change of one observed element
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntersectionEntry {
    pub target: ElementId,
    pub is_intersecting: bool,
    /// Visible fraction of the element (0.0 to 1.0)
    pub intersection_ratio: f64,
}

/// Observer configuration (`IntersectionObserverInit`)
#[derive(Clone, Debug, PartialEq)]
pub struct ObserverInit {
    pub thresholds: SmallVec<[f64; 4]>,
    /// CSS margin around the root, e.g. `0px 0px -10% 0px`
    pub root_margin: String,
}

impl Default for ObserverInit {
    fn default() -> Self {
        Self {
            thresholds: smallvec![0.0],
            root_margin: "0px".to_string(),
        }
    }
}

impl ObserverInit {
    pub fn new(threshold: f64, root_margin: impl Into<String>) -> Self {
        Self {
            thresholds: smallvec![threshold],
            root_margin: root_margin.into(),
        }
    }

    /// Smallest threshold, the one that decides entering vs leaving
    pub fn min_threshold(&self) -> f64 {
        self.thresholds
            .iter()
            .copied()
            .fold(f64::INFINITY, f64::min)
            .min(1.0)
    }

    /// Check thresholds and margin the way the browser constructor does
    pub fn validate(&self) -> Result<()> {
        if let Some(bad) = self
            .thresholds
            .iter()
            .copied()
            .find(|t| !(0.0..=1.0).contains(t))
        {
            return Err(HostError::InvalidThreshold(bad));
        }

        let parts: Vec<&str> = self.root_margin.split_whitespace().collect();
        if parts.is_empty() || parts.len() > 4 || !parts.iter().all(|p| is_margin_length(p)) {
            return Err(HostError::InvalidRootMargin(self.root_margin.clone()));
        }

        Ok(())
    }
}

fn is_margin_length(part: &str) -> bool {
    let number = part
        .strip_suffix("px")
        .or_else(|| part.strip_suffix('%'))
        .unwrap_or(part);
    // Unitless values are only valid for zero
    if number.len() == part.len() {
        return part == "0";
    }
    number.parse::<f64>().is_ok()
}

/// Callback receiving batches of entries
pub type IntersectionCallback = Arc<dyn Fn(&[IntersectionEntry]) + Send + Sync>;

/// A live intersection observer
pub trait IntersectionObserver: Send + Sync {
    fn observe(&self, target: &ElementRef);
    /// Stop watching one element; other targets keep being observed
    fn unobserve(&self, target: &ElementRef);
    /// Stop watching everything
    fn disconnect(&self);
}

/// Constructor for intersection observers
pub trait IntersectionObserverFactory: Send + Sync {
    fn create(
        &self,
        init: ObserverInit,
        callback: IntersectionCallback,
    ) -> Result<Arc<dyn IntersectionObserver>>;
}
