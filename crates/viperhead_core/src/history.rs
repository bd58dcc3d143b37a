//! crates/viperhead_core/src/history.rs
//!
//! The in-memory image history: newest first, unbounded, process-lifetime only.
//! `add_image` and `clear_images` are the only mutators.

use chrono::Utc;
use std::collections::VecDeque;
use tokio::sync::watch;
use tracing::debug;

use crate::domain::GeneratedImageRecord;

pub struct ImageHistory {
    images: watch::Sender<VecDeque<GeneratedImageRecord>>,
}

impl Default for ImageHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageHistory {
    pub fn new() -> Self {
        let (images, _) = watch::channel(VecDeque::new());
        Self { images }
    }

    /// Prepends a record stamped with the current time.
    ///
    /// Timestamps never decrease along the sequence, even if the wall clock steps back.
    pub fn add_image(&self, url: impl Into<String>, style: Option<String>) -> GeneratedImageRecord {
        let mut record = GeneratedImageRecord {
            url: url.into(),
            style,
            timestamp: Utc::now(),
        };
        self.images.send_modify(|images| {
            if let Some(newest) = images.front() {
                record.timestamp = record.timestamp.max(newest.timestamp);
            }
            images.push_front(record.clone());
        });
        debug!(url = %record.url, "image added to history");
        record
    }

    pub fn clear_images(&self) {
        self.images.send_modify(VecDeque::clear);
        debug!("image history cleared");
    }

    /// A copy of the current sequence, newest first.
    pub fn images(&self) -> Vec<GeneratedImageRecord> {
        self.images.borrow().iter().cloned().collect()
    }

    pub fn latest(&self) -> Option<GeneratedImageRecord> {
        self.images.borrow().front().cloned()
    }

    pub fn len(&self) -> usize {
        self.images.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.borrow().is_empty()
    }

    /// Observe changes to the sequence.
    pub fn subscribe(&self) -> watch::Receiver<VecDeque<GeneratedImageRecord>> {
        self.images.subscribe()
    }
}
