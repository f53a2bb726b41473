//! Measurement cache (mirror service)
//!
//! Pixel positions of characters inside a textarea are not exposed by the
//! browser. We keep one hidden mirror element per textarea, styled like it,
//! fill it with `[text before, marker, text after]` and read the marker's box.
//! Results are cached per character index until the textarea's text changes,
//! the cache is invalidated, or styles are re-synced.
//!
//! Per-surface lifecycle: `Uncreated -> Styled -> Measuring -> Cached`, back to
//! `Styled` on any invalidation. The DOM side lives behind [`MirrorBackend`]
//! so the cache logic runs natively in tests.

pub mod dom;

use std::collections::{BTreeMap, HashMap};

use crate::models::{Point, Rect};
use crate::text::codec::{char_count, split_at_char};

/// Identifies one live text-input surface
pub type SurfaceKey = u32;

/// DOM operations the mirror service needs
pub trait MirrorBackend {
    /// The text-input element being measured
    type Source;
    /// The hidden element measurements are taken in
    type Mirror;

    fn is_connected(&self, source: &Self::Source) -> bool;

    fn source_text(&self, source: &Self::Source) -> String;

    /// Create and attach a mirror for `source`; `None` if the document is unavailable
    fn create_mirror(&mut self, source: &Self::Source) -> Option<Self::Mirror>;

    /// Replicate the source's computed text styling onto the mirror
    fn copy_styles(&mut self, source: &Self::Source, mirror: &Self::Mirror);

    /// Lay out `[before, marker, after]` and return the marker's offset from
    /// the mirror's border box
    fn measure_marker(&mut self, mirror: &Self::Mirror, before: &str, after: &str) -> Option<Point>;

    /// Detach the mirror from the document
    fn remove_mirror(&mut self, mirror: Self::Mirror);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorState {
    Uncreated,
    Styled,
    Measuring,
    Cached,
}

struct MirrorEntry<M> {
    mirror: M,
    state: MirrorState,
    /// Source text the cached positions were measured against
    measured_text: Option<String>,
    positions: HashMap<usize, Point>,
}

impl<M> MirrorEntry<M> {
    fn invalidate(&mut self) {
        self.positions.clear();
        self.measured_text = None;
        self.state = MirrorState::Styled;
    }
}

pub struct MirrorService<B: MirrorBackend> {
    backend: B,
    entries: HashMap<SurfaceKey, MirrorEntry<B::Mirror>>,
    fallback: Point,
}

impl<B: MirrorBackend> MirrorService<B> {
    pub fn new(backend: B, fallback: Point) -> Self {
        Self {
            backend,
            entries: HashMap::new(),
            fallback,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn fallback(&self) -> Point {
        self.fallback
    }

    pub fn state(&self, key: SurfaceKey) -> MirrorState {
        self.entries
            .get(&key)
            .map(|entry| entry.state)
            .unwrap_or(MirrorState::Uncreated)
    }

    /// Number of cached positions for a surface
    pub fn cached_len(&self, key: SurfaceKey) -> usize {
        self.entries.get(&key).map(|entry| entry.positions.len()).unwrap_or(0)
    }

    /// Pixel position of the boundary before `char_index`
    pub fn get_character_position(
        &mut self,
        key: SurfaceKey,
        source: &B::Source,
        char_index: usize,
    ) -> Point {
        self.get_character_positions(key, source, &[char_index])
            .get(&char_index)
            .copied()
            .unwrap_or(self.fallback)
    }

    /// Batched lookup; cached indices are answered without touching the DOM,
    /// the rest are measured in ascending order, one marker move each.
    pub fn get_character_positions(
        &mut self,
        key: SurfaceKey,
        source: &B::Source,
        indices: &[usize],
    ) -> BTreeMap<usize, Point> {
        let mut result = BTreeMap::new();

        let text = match self.prepare(key, source) {
            Some(text) => text,
            None => {
                for &index in indices {
                    result.insert(index, self.fallback);
                }
                return result;
            }
        };

        let total = char_count(&text);
        let Some(entry) = self.entries.get_mut(&key) else {
            return result;
        };

        let mut pending: Vec<usize> = indices
            .iter()
            .map(|&index| index.min(total))
            .filter(|index| !entry.positions.contains_key(index))
            .collect();
        pending.sort_unstable();
        pending.dedup();

        if !pending.is_empty() {
            entry.state = MirrorState::Measuring;
            for index in pending {
                let (before, after) = split_at_char(&text, index);
                match self.backend.measure_marker(&entry.mirror, before, after) {
                    Some(point) => {
                        entry.positions.insert(index, point);
                    }
                    None => crate::wasm_warn!("mirror measurement failed at char {}", index),
                }
            }
            entry.state = if entry.positions.is_empty() {
                MirrorState::Styled
            } else {
                MirrorState::Cached
            };
        }

        for &index in indices {
            let point = entry
                .positions
                .get(&index.min(total))
                .copied()
                .unwrap_or(self.fallback);
            result.insert(index, point);
        }
        result
    }

    /// Ensure a styled mirror exists and its cache matches the current text.
    /// Returns the source text, or `None` when the source is detached.
    fn prepare(&mut self, key: SurfaceKey, source: &B::Source) -> Option<String> {
        if !self.backend.is_connected(source) {
            return None;
        }
        let text = self.backend.source_text(source);

        if !self.entries.contains_key(&key) {
            let mirror = self.backend.create_mirror(source)?;
            self.backend.copy_styles(source, &mirror);
            self.entries.insert(
                key,
                MirrorEntry {
                    mirror,
                    state: MirrorState::Styled,
                    measured_text: None,
                    positions: HashMap::new(),
                },
            );
        }

        let entry = self.entries.get_mut(&key)?;
        if entry.measured_text.as_deref() != Some(text.as_str()) {
            entry.invalidate();
            entry.measured_text = Some(text.clone());
        }
        Some(text)
    }

    pub fn invalidate_cache(&mut self, key: SurfaceKey) {
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.invalidate();
        }
    }

    /// Re-copy styles (font or zoom changed) and drop cached positions
    pub fn sync_styles(&mut self, key: SurfaceKey, source: &B::Source) {
        if let Some(entry) = self.entries.get_mut(&key) {
            self.backend.copy_styles(source, &entry.mirror);
            entry.invalidate();
        }
    }

    /// Re-copy styles for every live mirror
    pub fn sync_all_styles<'a>(&mut self, sources: impl IntoIterator<Item = (SurfaceKey, &'a B::Source)>)
    where
        B::Source: 'a,
    {
        for (key, source) in sources {
            self.sync_styles(key, source);
        }
    }

    /// Drop the surface's cache and detach its mirror from the document
    pub fn release(&mut self, key: SurfaceKey) {
        if let Some(entry) = self.entries.remove(&key) {
            self.backend.remove_mirror(entry.mirror);
        }
    }

    pub fn release_all(&mut self) {
        let keys: Vec<SurfaceKey> = self.entries.keys().copied().collect();
        for key in keys {
            self.release(key);
        }
    }

    /// Character index nearest to a pixel point (mouse hit-testing).
    ///
    /// Picks the visual row containing `point.y`, then the closest boundary on
    /// that row. Detached sources hit index 0.
    pub fn hit_test(&mut self, key: SurfaceKey, source: &B::Source, point: Point) -> usize {
        if !self.backend.is_connected(source) {
            return 0;
        }
        let total = char_count(&self.backend.source_text(source));
        let indices: Vec<usize> = (0..=total).collect();
        let positions = self.get_character_positions(key, source, &indices);

        let row_y = positions
            .values()
            .map(|p| p.y)
            .filter(|&y| y <= point.y)
            .reduce(f64::max)
            .or_else(|| positions.values().map(|p| p.y).reduce(f64::min));

        let Some(row_y) = row_y else {
            return 0;
        };

        positions
            .iter()
            .filter(|(_, p)| p.y == row_y)
            .min_by(|(_, a), (_, b)| {
                (a.x - point.x)
                    .abs()
                    .partial_cmp(&(b.x - point.x).abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(&index, _)| index)
            .unwrap_or(0)
    }

    /// Rectangles approximating a selection, one per wrapped row.
    ///
    /// A character spans from its own boundary to the next one on the same
    /// row. The last character of a wrapped row has no right-hand boundary
    /// there, so it borrows the advance of its left neighbour.
    pub fn selection_rects(
        &mut self,
        key: SurfaceKey,
        source: &B::Source,
        start: usize,
        end: usize,
        line_height: f64,
    ) -> Vec<Rect> {
        if start >= end || !self.backend.is_connected(source) {
            return Vec::new();
        }
        let indices: Vec<usize> = (start.saturating_sub(1)..=end).collect();
        let positions = self.get_character_positions(key, source, &indices);

        let mut rects: Vec<Rect> = Vec::new();
        let mut row: Option<(f64, f64, f64)> = None; // (y, left, right)
        let mut last_advance = 0.0;
        for index in start..end {
            let Some(&left) = positions.get(&index) else {
                continue;
            };
            let same_row = |other: Option<&Point>| other.filter(|p| p.y == left.y).copied();

            let right = match same_row(positions.get(&(index + 1))) {
                Some(next) => next.x,
                None => {
                    let advance = index
                        .checked_sub(1)
                        .and_then(|prev| same_row(positions.get(&prev)))
                        .map_or(last_advance, |prev| left.x - prev.x);
                    left.x + advance
                }
            };
            if right > left.x {
                last_advance = right - left.x;
            }

            row = match row {
                Some((y, row_left, row_right)) if y == left.y => {
                    Some((y, row_left.min(left.x), row_right.max(right)))
                }
                Some((y, row_left, row_right)) => {
                    rects.push(Rect::new(row_left, y, row_right - row_left, line_height));
                    Some((left.y, left.x, right))
                }
                None => Some((left.y, left.x, right)),
            };
        }
        if let Some((y, left, right)) = row {
            rects.push(Rect::new(left, y, right - left, line_height));
        }
        rects.retain(|rect| !rect.is_empty());
        rects
    }
}

impl<B: MirrorBackend> Drop for MirrorService<B> {
    fn drop(&mut self) {
        self.release_all();
    }
}
