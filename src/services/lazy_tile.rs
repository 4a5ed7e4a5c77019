//! Deferred video tiles.
//!
//! A video tile starts `Hidden` (a placeholder) and becomes `Visible` the
//! first time its container intersects the viewport. The transition happens
//! once; scrolling away never hides it again. Image tiles are not deferred
//! and rely on the browser's native `loading="lazy"`.

use crate::models::{MediaRecord, MediaType};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TileState {
    Hidden,
    Visible,
}

/// Outcome of one visibility callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// Still hidden; keep observing.
    Waiting,
    /// Just became visible; the observer should detach.
    Revealed,
    /// Already visible; the callback should not have fired.
    Detached,
}

/// Parameters handed to the browser's IntersectionObserver.
#[derive(Debug, Clone, Serialize)]
pub struct ObserverOptions {
    pub root_margin: &'static str,
    pub threshold: f64,
}

pub const OBSERVER_OPTIONS: ObserverOptions = ObserverOptions {
    root_margin: "50px 0px",
    threshold: 0.1,
};

pub const PLACEHOLDER_TEXT: &str = "Loading video...";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LazyTile {
    pub src: String,
    pub title: String,
    pub state: TileState,
}

impl LazyTile {
    pub fn new(src: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            title: title.into(),
            state: TileState::Hidden,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.state == TileState::Visible
    }

    pub fn observe(&mut self, intersecting: bool) -> Observation {
        match (self.state, intersecting) {
            (TileState::Visible, _) => Observation::Detached,
            (TileState::Hidden, false) => Observation::Waiting,
            (TileState::Hidden, true) => {
                self.state = TileState::Visible;
                Observation::Revealed
            }
        }
    }
}

/// One gallery card as the templates see it.
#[derive(Debug, Clone, Serialize)]
pub struct Tile {
    pub record: MediaRecord,
    /// Present for videos only.
    pub lazy: Option<LazyTile>,
}

pub fn tiles_for(rows: &[MediaRecord]) -> Vec<Tile> {
    rows.iter()
        .map(|record| Tile {
            lazy: match record.media_type {
                MediaType::Video => Some(LazyTile::new(&record.cloudinary_url, &record.title)),
                MediaType::Image => None,
            },
            record: record.clone(),
        })
        .collect()
}
