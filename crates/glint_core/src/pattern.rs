//! Procedural color patterns.
//!
//! A pattern is an opaque `point -> color` function supplied by the host
//! (noise, marble, wood, checkers...). Generating those is not this crate's
//! business; it only stores them under names so scene descriptions can refer
//! to them. The registry is an ordinary value handed to scene construction,
//! so two scenes never share hidden pattern state.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use glint_math::Vec3;

use crate::Color;

/// A shareable 3D color sampler.
#[derive(Clone)]
pub struct Pattern(Arc<dyn Fn(Vec3) -> Color + Send + Sync>);

impl Pattern {
    /// Wrap a sampling function.
    pub fn new(f: impl Fn(Vec3) -> Color + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// A pattern that ignores the point.
    pub fn solid(color: Color) -> Self {
        Self::new(move |_| color)
    }

    /// Sample the pattern at a world-space point.
    #[inline]
    pub fn sample(&self, point: Vec3) -> Color {
        (self.0)(point)
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Pattern(<fn>)")
    }
}

/// Named patterns available to scene construction.
#[derive(Default, Debug, Clone)]
pub struct PatternRegistry {
    patterns: HashMap<String, Pattern>,
}

impl PatternRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a pattern under `name`.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        f: impl Fn(Vec3) -> Color + Send + Sync + 'static,
    ) -> Pattern {
        let pattern = Pattern::new(f);
        self.insert(name, pattern.clone());
        pattern
    }

    /// Insert an existing pattern under `name`.
    pub fn insert(&mut self, name: impl Into<String>, pattern: Pattern) {
        let name = name.into();
        if self.patterns.insert(name.clone(), pattern).is_some() {
            log::debug!("Replaced pattern '{}'", name);
        }
    }

    pub fn get(&self, name: &str) -> Option<Pattern> {
        self.patterns.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.patterns.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
