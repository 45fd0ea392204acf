//! Core model of the compliance overlay client
//!
//! Browser-independent pieces: selection state, overlay layout and
//! composition, zoom math, the device matrix, server wire types and
//! preferences. The wasm app wires these to the DOM.

pub mod api;
pub mod busy;
pub mod config;
pub mod error;
pub mod grid;
pub mod http;
pub mod layout;
pub mod overlay;
pub mod prefs;
pub mod snapshot;
pub mod state;
pub mod viewport;

pub use api::{
    batch_cards, snapshot_to_lines, BatchCard, BatchItem, BatchResponse, ContentPayload,
    ExportLinks, ExportRequest, ExtractResponse,
};
pub use busy::{BusyState, BusyView};
pub use config::ClientConfig;
pub use error::{OverlayError, Result};
pub use layout::{OverlayLayoutMap, PageLayout};
pub use overlay::{compose, DrawSurface, MemorySurface, OverlayElement, OverlayRenderer};
pub use prefs::{MemoryPreferences, PreferenceStore, Preferences, Theme};
pub use snapshot::{ProjectLevel, SelectionSnapshot, TickId};
pub use state::{SelectionStore, SubscriptionId};
pub use viewport::{clamp_scale, PageSize, Viewport, ZoomController};
