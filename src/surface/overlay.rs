//! Overlay placement
//!
//! Lyrics and tala markers are drawn in elements floating over the textarea,
//! anchored at character indices. Each render pass measures all anchors of a
//! line in one batched lookup.

use serde::{Deserialize, Serialize};

use crate::mirror::{MirrorBackend, MirrorService, SurfaceKey};
use crate::models::{OverlayItem, OverlayKind};

/// An overlay item with its measured pixel position
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PlacedOverlay {
    pub kind: OverlayKind,
    pub char_index: usize,
    pub content: String,
    pub x: f64,
    pub y: f64,
}

/// Measure the anchors of `items` and pair each item with its position
pub fn place_overlays<B: MirrorBackend>(
    mirrors: &mut MirrorService<B>,
    key: SurfaceKey,
    source: &B::Source,
    items: &[(OverlayKind, OverlayItem)],
) -> Vec<PlacedOverlay> {
    if items.is_empty() {
        return Vec::new();
    }

    let indices: Vec<usize> = items.iter().map(|(_, item)| item.char_index).collect();
    let positions = mirrors.get_character_positions(key, source, &indices);

    items
        .iter()
        .map(|(kind, item)| {
            let point = positions
                .get(&item.char_index)
                .copied()
                .unwrap_or(mirrors.fallback());
            PlacedOverlay {
                kind: *kind,
                char_index: item.char_index,
                content: item.content.clone(),
                x: point.x,
                y: point.y,
            }
        })
        .collect()
}
