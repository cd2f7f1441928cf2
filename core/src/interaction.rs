//! Four-state interaction machine that decides when a location panel may open.
//!
//! The machine is a plain value: every transition consumes the current state and
//! returns the next one, so the world stores it and the interaction system and
//! the session only ever request transitions. Keeping the suppression latch
//! inside the variant makes "suppressed without a location" unrepresentable.

use serde::{Deserialize, Serialize};

use crate::LocationId;

/// Interaction mode of the avatar relative to the location registry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InteractionState {
    /// The avatar overlaps no location.
    #[default]
    Idle,
    /// The avatar stands on a location whose panel was already offered; the
    /// interaction prompt is visible.
    Focused(LocationId),
    /// The avatar stands on a location right after a panel was closed; auto-open
    /// stays disarmed until every location has been left.
    Suppressed(LocationId),
    /// A modal panel is visible.
    PanelOpen {
        /// Location whose panel is displayed.
        location: LocationId,
        /// Location the avatar currently overlaps, tracked while the panel is up.
        overlap: Option<LocationId>,
    },
}

impl InteractionState {
    /// Location the machine currently considers active, if any.
    #[must_use]
    pub const fn active_location(&self) -> Option<LocationId> {
        match *self {
            Self::Idle => None,
            Self::Focused(location) | Self::Suppressed(location) => Some(location),
            Self::PanelOpen { location, .. } => Some(location),
        }
    }

    /// Location the avatar is standing on, as far as the machine knows.
    ///
    /// Differs from [`Self::active_location`] only while a panel is open: the
    /// panel keeps its location, the highlight follows the overlap.
    #[must_use]
    pub const fn highlighted(&self) -> Option<LocationId> {
        match *self {
            Self::Idle => None,
            Self::Focused(location) | Self::Suppressed(location) => Some(location),
            Self::PanelOpen { overlap, .. } => overlap,
        }
    }

    /// Location whose panel is open, if any.
    #[must_use]
    pub const fn open_panel(&self) -> Option<LocationId> {
        match *self {
            Self::PanelOpen { location, .. } => Some(location),
            _ => None,
        }
    }

    /// Whether the "press to interact" prompt should be shown.
    #[must_use]
    pub const fn prompt_visible(&self) -> bool {
        matches!(self, Self::Focused(_))
    }

    /// Whether auto-open is currently disarmed.
    #[must_use]
    pub const fn is_suppressed(&self) -> bool {
        matches!(self, Self::Suppressed(_))
    }

    /// Applies one overlap observation.
    ///
    /// `overlap` is the first location (in registry order) intersecting the
    /// avatar. `hosts_panel` reports whether a location can show a panel at all;
    /// a fresh entry into a location without one lands in [`Self::Focused`].
    #[must_use]
    pub fn observe<F>(self, overlap: Option<LocationId>, hosts_panel: F) -> Self
    where
        F: Fn(LocationId) -> bool,
    {
        match (self, overlap) {
            (Self::PanelOpen { location, .. }, overlap) => Self::PanelOpen { location, overlap },
            (_, None) => Self::Idle,
            (Self::Suppressed(_), Some(found)) => Self::Suppressed(found),
            (Self::Focused(previous), Some(found)) if previous == found => Self::Focused(found),
            (Self::Idle | Self::Focused(_), Some(found)) => {
                if hosts_panel(found) {
                    Self::PanelOpen {
                        location: found,
                        overlap: Some(found),
                    }
                } else {
                    Self::Focused(found)
                }
            }
        }
    }

    /// Handles an explicit open request from the interact key or a pointer.
    ///
    /// Only a focused or suppressed location may be opened manually; every
    /// other state is returned unchanged.
    #[must_use]
    pub fn request_panel<F>(self, hosts_panel: F) -> Self
    where
        F: Fn(LocationId) -> bool,
    {
        match self {
            Self::Focused(location) | Self::Suppressed(location) if hosts_panel(location) => {
                Self::PanelOpen {
                    location,
                    overlap: Some(location),
                }
            }
            other => other,
        }
    }

    /// Handles an explicit close action.
    ///
    /// The avatar keeps standing on whatever it overlaps, so the state becomes
    /// suppressed for that location. Closing after walking off every location
    /// goes straight to [`Self::Idle`].
    #[must_use]
    pub fn close_panel(self) -> Self {
        match self {
            Self::PanelOpen {
                overlap: Some(found),
                ..
            } => Self::Suppressed(found),
            Self::PanelOpen { overlap: None, .. } => Self::Idle,
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn always(_: LocationId) -> bool {
        true
    }

    #[test]
    fn fresh_entry_opens_panel() {
        let next = InteractionState::Idle.observe(Some(LocationId::Dorm), always);
        assert_eq!(
            next,
            InteractionState::PanelOpen {
                location: LocationId::Dorm,
                overlap: Some(LocationId::Dorm),
            }
        );
        assert_eq!(next.active_location(), Some(LocationId::Dorm));
        assert!(!next.prompt_visible());
    }

    #[test]
    fn standing_still_stays_focused() {
        let mut state = InteractionState::Focused(LocationId::Library);
        for _ in 0..5 {
            state = state.observe(Some(LocationId::Library), always);
            assert_eq!(state, InteractionState::Focused(LocationId::Library));
            assert!(state.prompt_visible());
        }
    }

    #[test]
    fn moving_between_locations_while_focused_opens_the_new_one() {
        let next = InteractionState::Focused(LocationId::Library)
            .observe(Some(LocationId::Cafeteria), always);
        assert_eq!(next.open_panel(), Some(LocationId::Cafeteria));
    }

    #[test]
    fn suppression_follows_location_switches_until_exit() {
        let state = InteractionState::Suppressed(LocationId::Admin)
            .observe(Some(LocationId::Cafeteria), always);
        assert_eq!(state, InteractionState::Suppressed(LocationId::Cafeteria));
        assert!(state.is_suppressed());
        assert!(!state.prompt_visible());

        let cleared = state.observe(None, always);
        assert_eq!(cleared, InteractionState::Idle);
        assert!(!cleared.is_suppressed());
        assert_eq!(cleared.active_location(), None);
    }

    #[test]
    fn panel_open_tracks_overlap_without_reopening() {
        let open = InteractionState::PanelOpen {
            location: LocationId::Dorm,
            overlap: Some(LocationId::Dorm),
        };
        let walked_off = open.observe(None, always);
        assert_eq!(
            walked_off,
            InteractionState::PanelOpen {
                location: LocationId::Dorm,
                overlap: None,
            }
        );
        assert_eq!(walked_off.active_location(), Some(LocationId::Dorm));
        assert_eq!(walked_off.highlighted(), None);
        assert_eq!(walked_off.close_panel(), InteractionState::Idle);

        let elsewhere = open.observe(Some(LocationId::Admin), always);
        assert_eq!(elsewhere.highlighted(), Some(LocationId::Admin));
        assert_eq!(elsewhere.open_panel(), Some(LocationId::Dorm));
        assert_eq!(
            elsewhere.close_panel(),
            InteractionState::Suppressed(LocationId::Admin)
        );
    }

    #[test]
    fn manual_open_requires_an_active_location() {
        assert_eq!(
            InteractionState::Idle.request_panel(always),
            InteractionState::Idle
        );
        assert_eq!(
            InteractionState::Suppressed(LocationId::Classroom)
                .request_panel(always)
                .open_panel(),
            Some(LocationId::Classroom)
        );
        let open = InteractionState::PanelOpen {
            location: LocationId::Dorm,
            overlap: Some(LocationId::Dorm),
        };
        assert_eq!(open.request_panel(always), open);
    }

    #[test]
    fn locations_without_panels_only_focus() {
        let no_panels = |_: LocationId| false;
        let state = InteractionState::Idle.observe(Some(LocationId::Admin), no_panels);
        assert_eq!(state, InteractionState::Focused(LocationId::Admin));
        assert_eq!(state.request_panel(no_panels), state);
    }

    #[test]
    fn close_outside_panel_is_a_no_op() {
        let focused = InteractionState::Focused(LocationId::Dorm);
        assert_eq!(focused.close_panel(), focused);
    }
}
