//! UI state flags used to resolve state-dependent drawables.

use bitflags::bitflags;

bitflags! {
    /// Set of interaction states a drawable is displayed in.
    ///
    /// The empty set is the wildcard state: it matches any state spec that
    /// requires nothing.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct StateSet: u16 {
        const ENABLED        = 1 << 0;
        const FOCUSED        = 1 << 1;
        const PRESSED        = 1 << 2;
        const HOVERED        = 1 << 3;
        const SELECTED       = 1 << 4;
        const CHECKED        = 1 << 5;
        const ACTIVATED      = 1 << 6;
        const WINDOW_FOCUSED = 1 << 7;
        const DRAG_HOVERED   = 1 << 8;
    }
}

impl StateSet {
    /// The state set a drawable starts in.
    pub const WILDCARD: StateSet = StateSet::empty();
}

/// A pattern over [`StateSet`]: every `required` flag must be present and
/// every `excluded` flag must be absent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct StateSpec {
    pub required: StateSet,
    pub excluded: StateSet,
}

impl StateSpec {
    /// Spec matching every state set.
    pub const ANY: StateSpec = StateSpec {
        required: StateSet::empty(),
        excluded: StateSet::empty(),
    };

    pub const fn with(required: StateSet) -> Self {
        Self {
            required,
            excluded: StateSet::empty(),
        }
    }

    /// Also require `state` to be absent.
    pub const fn without(mut self, state: StateSet) -> Self {
        self.excluded = self.excluded.union(state);
        self
    }

    pub fn is_wildcard(&self) -> bool {
        self.required.is_empty() && self.excluded.is_empty()
    }

    /// Whether the spec mentions `state`, either as required or excluded.
    pub fn mentions(&self, state: StateSet) -> bool {
        self.required.intersects(state) || self.excluded.intersects(state)
    }

    pub fn matches(&self, state: StateSet) -> bool {
        state.contains(self.required) && !state.intersects(self.excluded)
    }
}

impl From<StateSet> for StateSpec {
    fn from(required: StateSet) -> Self {
        StateSpec::with(required)
    }
}
