// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glyph measurement and the per-font metric cache.

mod lru;

use hashbrown::HashMap;

use crate::style::{FontKey, TextStyle};
use lru::LruCache;

/// Measured metrics of a single glyph.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct GlyphMetrics {
    /// Horizontal advance of the glyph.
    pub width: f32,
    /// Distance from the baseline to the top of the glyph box.
    pub ascent: f32,
    /// Distance from the baseline to the bottom of the glyph box.
    pub descent: f32,
}

/// Host-supplied source of glyph metrics.
///
/// Implementations must be deterministic: the same `(ch, style)` pair must
/// always produce the same metrics, since results are memoized. If the
/// underlying metrics change (a font finished loading, say), the host must
/// evict the affected bucket or clear the cache so the epoch advances.
pub trait GlyphMeasurer {
    /// Measures one character under a fully resolved text style.
    fn measure_glyph(&self, ch: char, style: &TextStyle) -> GlyphMetrics;
}

/// Default number of glyphs cached per font bucket.
pub const DEFAULT_MAX_GLYPHS_PER_FONT: usize = 1024;

/// A memoizing glyph-metric cache, bucketed per font.
///
/// Buckets are keyed by [`FontKey`] (family, size, weight, slant; letter
/// spacing excluded) and individually bounded by an LRU policy. The cache
/// carries a global *epoch* that participates in every paragraph's layout
/// key: wholesale invalidation (bucket eviction, full clear, or an explicit
/// bump) advances the epoch and thereby forces relayout, while ordinary LRU
/// churn inside a bucket only causes a silent re-measure.
pub struct FontMeasureCache<M> {
    measurer: M,
    fonts: HashMap<FontKey, LruCache<char, GlyphMetrics>>,
    epoch: u64,
    max_glyphs_per_font: usize,
}

impl<M> core::fmt::Debug for FontMeasureCache<M> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FontMeasureCache")
            .field("fonts", &self.fonts.len())
            .field("epoch", &self.epoch)
            .field("max_glyphs_per_font", &self.max_glyphs_per_font)
            .finish_non_exhaustive()
    }
}

impl<M: GlyphMeasurer> FontMeasureCache<M> {
    /// Creates a cache around `measurer` with the default per-font capacity.
    pub fn new(measurer: M) -> Self {
        Self::with_capacity(measurer, DEFAULT_MAX_GLYPHS_PER_FONT)
    }

    /// Creates a cache holding at most `max_glyphs_per_font` glyphs per
    /// bucket.
    ///
    /// # Panics
    ///
    /// Panics if `max_glyphs_per_font` is zero.
    pub fn with_capacity(measurer: M, max_glyphs_per_font: usize) -> Self {
        assert!(
            max_glyphs_per_font > 0,
            "per-font glyph capacity must be greater than zero"
        );
        Self {
            measurer,
            fonts: HashMap::new(),
            epoch: 1,
            max_glyphs_per_font,
        }
    }

    /// The current invalidation epoch.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Returns the metrics for `ch` under `style`, measuring on a miss.
    pub fn measure_glyph(&mut self, ch: char, style: &TextStyle) -> GlyphMetrics {
        let key = FontKey::new(style);
        let bucket = self
            .fonts
            .entry(key)
            .or_insert_with(|| LruCache::new(self.max_glyphs_per_font));
        if let Some(metrics) = bucket.get(&ch) {
            return *metrics;
        }
        let metrics = self.measurer.measure_glyph(ch, style);
        bucket.insert(ch, metrics);
        metrics
    }

    /// Evicts the whole bucket for `style`'s font.
    ///
    /// Returns `true` (and advances the epoch) if a bucket existed.
    pub fn evict_font(&mut self, style: &TextStyle) -> bool {
        let removed = self.fonts.remove(&FontKey::new(style)).is_some();
        if removed {
            self.epoch += 1;
            tracing::debug!(epoch = self.epoch, "font bucket evicted");
        }
        removed
    }

    /// Drops every cached metric.
    ///
    /// Advances the epoch only when something was actually cached.
    pub fn clear(&mut self) {
        if self.fonts.is_empty() {
            return;
        }
        self.fonts.clear();
        self.epoch += 1;
        tracing::debug!(epoch = self.epoch, "glyph cache cleared");
    }

    /// Unconditionally advances the epoch, forcing every paragraph to be
    /// re-laid-out on the next layout pass.
    pub fn bump_epoch(&mut self) {
        self.epoch += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct CountingMeasurer {
        calls: RefCell<Vec<char>>,
    }

    impl CountingMeasurer {
        fn new() -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl GlyphMeasurer for CountingMeasurer {
        fn measure_glyph(&self, ch: char, _style: &TextStyle) -> GlyphMetrics {
            self.calls.borrow_mut().push(ch);
            GlyphMetrics {
                width: if ch == ' ' { 4.0 } else { 8.0 },
                ascent: 7.0,
                descent: 3.0,
            }
        }
    }

    fn calls(cache: &FontMeasureCache<CountingMeasurer>) -> Vec<char> {
        cache.measurer.calls.borrow().clone()
    }

    #[test]
    fn reuses_cached_metrics_within_a_bucket() {
        let mut cache = FontMeasureCache::with_capacity(CountingMeasurer::new(), 4);
        let style = TextStyle::default();
        cache.measure_glyph('a', &style);
        cache.measure_glyph('a', &style);
        assert_eq!(calls(&cache), vec!['a']);
    }

    #[test]
    fn lru_churn_remeasures_without_bumping_the_epoch() {
        let mut cache = FontMeasureCache::with_capacity(CountingMeasurer::new(), 4);
        let style = TextStyle::default();
        let before = cache.epoch();
        for ch in ['a', 'b', 'c', 'd'] {
            cache.measure_glyph(ch, &style);
        }
        cache.measure_glyph('a', &style);
        cache.measure_glyph('e', &style); // evicts 'b'
        cache.measure_glyph('b', &style);
        assert_eq!(calls(&cache), vec!['a', 'b', 'c', 'd', 'e', 'b']);
        assert_eq!(cache.epoch(), before);
    }

    #[test]
    fn letter_spacing_shares_a_bucket() {
        let mut cache = FontMeasureCache::with_capacity(CountingMeasurer::new(), 4);
        let plain = TextStyle::default();
        let spaced = TextStyle {
            letter_spacing: 2.0,
            ..plain.clone()
        };
        cache.measure_glyph('a', &plain);
        cache.measure_glyph('a', &spaced);
        assert_eq!(calls(&cache), vec!['a']);
    }

    #[test]
    fn evicting_a_font_bumps_the_epoch() {
        let mut cache = FontMeasureCache::with_capacity(CountingMeasurer::new(), 4);
        let style = TextStyle::default();
        let before = cache.epoch();
        cache.measure_glyph('a', &style);
        assert!(cache.evict_font(&style));
        assert_eq!(cache.epoch(), before + 1);
        assert!(!cache.evict_font(&style));
        assert_eq!(cache.epoch(), before + 1);
    }

    #[test]
    fn clearing_an_empty_cache_keeps_the_epoch() {
        let mut cache = FontMeasureCache::with_capacity(CountingMeasurer::new(), 4);
        let before = cache.epoch();
        cache.clear();
        assert_eq!(cache.epoch(), before);
        cache.measure_glyph('a', &TextStyle::default());
        cache.clear();
        assert_eq!(cache.epoch(), before + 1);
    }
}
