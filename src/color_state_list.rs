//! State-dependent color resolution.
//!
//! A [`ColorStateList`] maps [`StateSpec`]s to colors. Resolution scans the
//! entries in order and returns the color of the first spec that matches.
//!
//! # Example
//! ```
//! use drawables::{ColorStateList, StateSet, StateSpec};
//!
//! let colors = ColorStateList::new(vec![
//!     (StateSpec::with(StateSet::PRESSED), 0xFF0000FF),
//!     (StateSpec::ANY, 0xFF888888),
//! ]);
//! assert_eq!(colors.color_for_state(StateSet::PRESSED, 0), 0xFF0000FF);
//! assert_eq!(colors.default_color(), 0xFF888888);
//! ```

use crate::color::ColorInt;
use crate::state::{StateSet, StateSpec};

#[derive(Debug, Clone, PartialEq)]
pub struct ColorStateList {
    entries: Vec<(StateSpec, ColorInt)>,
    default_color: ColorInt,
}

impl ColorStateList {
    /// Create a list from `(spec, color)` pairs in priority order.
    ///
    /// The default color is the color of the first wildcard entry, or the
    /// first entry when there is none, or opaque black for an empty list.
    pub fn new(entries: Vec<(StateSpec, ColorInt)>) -> Self {
        let default_color = entries
            .iter()
            .find(|(spec, _)| spec.is_wildcard())
            .or_else(|| entries.first())
            .map(|(_, color)| *color)
            .unwrap_or(0xFF00_0000);
        Self {
            entries,
            default_color,
        }
    }

    /// A list holding a single color for every state.
    pub fn value_of(color: ColorInt) -> Self {
        Self::new(vec![(StateSpec::ANY, color)])
    }

    /// Resolve the color for `state`, or `fallback` when no entry matches.
    pub fn color_for_state(&self, state: StateSet, fallback: ColorInt) -> ColorInt {
        self.entries
            .iter()
            .find(|(spec, _)| spec.matches(state))
            .map(|(_, color)| *color)
            .unwrap_or(fallback)
    }

    pub fn default_color(&self) -> ColorInt {
        self.default_color
    }

    /// Whether the resolved color can differ between state sets.
    pub fn is_stateful(&self) -> bool {
        self.entries.len() > 1 || self.entries.iter().any(|(spec, _)| !spec.is_wildcard())
    }

    pub fn has_focus_state_specified(&self) -> bool {
        self.entries
            .iter()
            .any(|(spec, _)| spec.mentions(StateSet::FOCUSED))
    }

    /// Whether every entry is fully opaque.
    pub fn is_opaque(&self) -> bool {
        self.entries.iter().all(|(_, color)| color >> 24 == 0xFF)
    }

    pub fn entries(&self) -> &[(StateSpec, ColorInt)] {
        &self.entries
    }
}
