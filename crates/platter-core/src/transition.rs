//! Shared-element transition engine
//!
//! Given the layout being left and the layout being entered, every element
//! whose key appears in both is interpolated from its old geometry to its new
//! one along a spring curve, so it reads as one continuous element. Elements
//! present on only one side cross-fade: leaving elements fade out in place,
//! entering elements fade in at their final position.
//!
//! The engine is generic over the element key so it does not care what the
//! elements are.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::animation::Spring;
use crate::layout::Rect;

/// How an element participates in the transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Present in both layouts, geometry interpolated
    Matched,
    /// Only in the layout being left, fading out
    Leaving,
    /// Only in the layout being entered, fading in
    Entering,
}

/// One element of an in-flight frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameElement<K> {
    pub key: K,
    pub rect: Rect,
    pub opacity: f32,
    pub phase: Phase,
}

/// An animated move from one keyed layout to another
#[derive(Debug, Clone)]
pub struct Transition<K: Eq + Hash> {
    from: Vec<(K, Rect)>,
    /// Opacity at the start for elements that were mid-fade; absent means 1
    from_opacity: HashMap<K, f32>,
    to: Vec<(K, Rect)>,
    spring: Spring,
    elapsed: f32,
}

impl<K: Clone + Eq + Hash> Transition<K> {
    pub fn new(from: Vec<(K, Rect)>, to: Vec<(K, Rect)>, spring: Spring) -> Self {
        Self {
            from,
            from_opacity: HashMap::new(),
            to,
            spring,
            elapsed: 0.0,
        }
    }

    /// Start a new transition from wherever `self` currently is
    ///
    /// Elements that have fully faded out are dropped; everything else
    /// starts from its in-flight geometry and opacity.
    pub fn redirect(&self, to: Vec<(K, Rect)>) -> Self {
        let visible: Vec<FrameElement<K>> = self
            .frame()
            .into_iter()
            .filter(|e| e.opacity > 0.0)
            .collect();
        let from_opacity = visible
            .iter()
            .filter(|e| e.opacity < 1.0)
            .map(|e| (e.key.clone(), e.opacity))
            .collect();
        let from = visible.into_iter().map(|e| (e.key, e.rect)).collect();
        Self {
            from_opacity,
            ..Self::new(from, to, self.spring)
        }
    }

    /// Move the destination without restarting the clock
    ///
    /// Used when the space the layout was computed for changes mid-flight.
    pub fn set_target(&mut self, to: Vec<(K, Rect)>) {
        self.to = to;
    }

    /// Advance by `dt` seconds
    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt.max(0.0);
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Spring value, may briefly exceed 1
    pub fn progress(&self) -> f32 {
        self.spring.value(self.elapsed)
    }

    pub fn is_settled(&self) -> bool {
        self.elapsed >= self.spring.settling_duration()
    }

    /// Keys of the destination layout, in order
    pub fn target_keys(&self) -> impl Iterator<Item = &K> {
        self.to.iter().map(|(k, _)| k)
    }

    /// Geometry and opacity of every element at the current time
    ///
    /// Leaving elements come first so entering and matched elements draw
    /// over them; within each group the layout order is kept.
    pub fn frame(&self) -> Vec<FrameElement<K>> {
        let progress = self.progress();
        let fade = progress.clamp(0.0, 1.0);

        let from_rects: HashMap<&K, Rect> = self.from.iter().map(|(k, r)| (k, *r)).collect();
        let to_keys: HashSet<&K> = self.to.iter().map(|(k, _)| k).collect();

        let mut elements = Vec::with_capacity(self.from.len() + self.to.len());
        for (key, rect) in &self.from {
            if !to_keys.contains(key) {
                elements.push(FrameElement {
                    key: key.clone(),
                    rect: *rect,
                    opacity: self.start_opacity(key) * (1.0 - fade),
                    phase: Phase::Leaving,
                });
            }
        }
        for (key, rect) in &self.to {
            match from_rects.get(key) {
                Some(start) => {
                    let opacity = self.start_opacity(key);
                    elements.push(FrameElement {
                        key: key.clone(),
                        rect: start.lerp(rect, progress),
                        opacity: opacity + (1.0 - opacity) * fade,
                        phase: Phase::Matched,
                    })
                }
                None => elements.push(FrameElement {
                    key: key.clone(),
                    rect: *rect,
                    opacity: fade,
                    phase: Phase::Entering,
                }),
            }
        }
        elements
    }

    fn start_opacity(&self, key: &K) -> f32 {
        self.from_opacity.get(key).copied().unwrap_or(1.0)
    }

    /// Current state of a single element
    pub fn element(&self, key: &K) -> Option<FrameElement<K>> {
        self.frame().into_iter().find(|e| &e.key == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spring() -> Spring {
        Spring::default()
    }

    fn cell() -> Rect {
        Rect::new(8.0, 8.0, 100.0, 100.0)
    }

    fn frame_rect() -> Rect {
        Rect::new(0.0, 0.0, 400.0, 400.0)
    }

    #[test]
    fn test_matched_element_moves_continuously() {
        let mut t = Transition::new(
            vec![("shape", cell())],
            vec![("shape", frame_rect())],
            spring(),
        );

        let start = t.element(&"shape").unwrap();
        assert_eq!(start.phase, Phase::Matched);
        assert_eq!(start.rect, cell());
        assert_eq!(start.opacity, 1.0);

        t.advance(0.1);
        let mid = t.element(&"shape").unwrap();
        assert!(mid.rect.width > cell().width && mid.rect.width < frame_rect().width);
        assert_eq!(mid.opacity, 1.0, "matched elements never cross-fade");

        t.advance(5.0);
        assert!(t.is_settled());
        assert_eq!(t.element(&"shape").unwrap().rect, frame_rect());
    }

    #[test]
    fn test_unmatched_elements_cross_fade() {
        let mut t = Transition::new(
            vec![("a", cell()), ("shared", cell())],
            vec![("shared", frame_rect()), ("b", frame_rect())],
            spring(),
        );

        let frame = t.frame();
        assert_eq!(frame.len(), 3);
        assert_eq!(frame[0].key, "a");
        assert_eq!(frame[0].phase, Phase::Leaving);
        assert_eq!(frame[0].opacity, 1.0);
        let b = t.element(&"b").unwrap();
        assert_eq!(b.phase, Phase::Entering);
        assert_eq!(b.opacity, 0.0);
        assert_eq!(b.rect, frame_rect());

        t.advance(0.1);
        let a = t.element(&"a").unwrap();
        let b = t.element(&"b").unwrap();
        assert!(a.opacity > 0.0 && a.opacity < 1.0);
        assert!((a.opacity + b.opacity - 1.0).abs() < 1e-6);
        // Leaving elements stay where they were
        assert_eq!(a.rect, cell());

        t.advance(5.0);
        assert_eq!(t.element(&"a").unwrap().opacity, 0.0);
        assert_eq!(t.element(&"b").unwrap().opacity, 1.0);
    }

    #[test]
    fn test_redirect_starts_from_in_flight_geometry() {
        let mut forward = Transition::new(
            vec![("shape", cell()), ("other", cell())],
            vec![("shape", frame_rect()), ("close", frame_rect())],
            spring(),
        );
        forward.advance(0.08);
        let in_flight = forward.element(&"shape").unwrap().rect;

        let back = forward.redirect(vec![("shape", cell()), ("other", cell())]);
        assert_eq!(back.elapsed(), 0.0);
        assert_eq!(back.element(&"shape").unwrap().rect, in_flight);
        // "other" was still partly visible, so it is matched on the way back
        // and fades back in from where it was
        let other_before = forward.element(&"other").unwrap().opacity;
        let other = back.element(&"other").unwrap();
        assert_eq!(other.phase, Phase::Matched);
        assert!((other.opacity - other_before).abs() < 1e-6);
        let mut settled = back.clone();
        settled.advance(5.0);
        assert_eq!(settled.element(&"other").unwrap().opacity, 1.0);
        // "close" had only partly faded in and now fades out
        assert_eq!(back.element(&"close").unwrap().phase, Phase::Leaving);
    }

    #[test]
    fn test_redirect_drops_invisible_elements() {
        let t = Transition::new(
            vec![("shape", cell())],
            vec![("shape", frame_rect()), ("close", frame_rect())],
            spring(),
        );
        // At t=0 "close" has opacity 0
        let back = t.redirect(vec![("shape", cell())]);
        assert!(back.element(&"close").is_none());
    }

    #[test]
    fn test_target_keys_order() {
        let t = Transition::new(
            vec![],
            vec![("x", cell()), ("y", cell()), ("z", cell())],
            spring(),
        );
        let keys: Vec<_> = t.target_keys().copied().collect();
        assert_eq!(keys, vec!["x", "y", "z"]);
    }

    #[test]
    fn test_set_target_keeps_clock() {
        let mut t = Transition::new(
            vec![("shape", cell()), ("title", cell())],
            vec![("shape", frame_rect())],
            spring(),
        );
        t.advance(0.1);
        let before = t.element(&"shape").unwrap().rect;

        let wider = Rect::new(0.0, 0.0, 600.0, 400.0);
        t.set_target(vec![("shape", wider)]);
        assert_eq!(t.elapsed(), 0.1);
        let after = t.element(&"shape").unwrap().rect;
        assert!(after.width > before.width);
        assert_eq!(t.element(&"title").unwrap().phase, Phase::Leaving);

        t.advance(5.0);
        assert_eq!(t.element(&"shape").unwrap().rect, wider);
    }
}
