use foundation::time::Time;

use crate::hotspot::{Hotspot, HotspotId};

/// How long the hover pause stays suppressed after a hotspot activation.
pub const CLICK_COOLDOWN_S: f64 = 1.0;

/// Informal state machine from the interaction contract:
/// `Rotating <-> HoverPaused`, with a one-shot `ClickCooldown` entered on
/// hotspot activation that reverts to `Rotating` once the deadline passes.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Mode {
    Rotating,
    HoverPaused,
    ClickCooldown { until: Time },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Cursor {
    Default,
    Pointer,
}

/// Result of resolving one pointer position against the scene.
///
/// Produced by a pure hit-testing pass; consumed here. Side effects (cursor
/// style, navigation, recolor) stay in the thin handler that owns the DOM.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerSample {
    pub over_solid: bool,
    pub hotspot: Option<HotspotId>,
}

impl PointerSample {
    pub fn miss() -> Self {
        Self {
            over_solid: false,
            hotspot: None,
        }
    }
}

/// Exactly one navigation action per successful click.
#[derive(Debug, Clone, PartialEq)]
pub struct Activation {
    pub id: HotspotId,
    pub url: String,
}

/// Explicit interaction state, passed into the render step each frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct InteractionState {
    pub mode: Mode,
    pub cursor: Cursor,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionState {
    pub fn new() -> Self {
        Self {
            mode: Mode::Rotating,
            cursor: Cursor::Default,
        }
    }

    /// Fold one pointer sample into the state.
    ///
    /// Cursor feedback always follows the markers. The hover pause is
    /// ignored while a click cooldown is active, so rotation resume stays
    /// predictable after navigation.
    pub fn on_pointer_move(&mut self, sample: PointerSample, now: Time) {
        self.cursor = if sample.hotspot.is_some() {
            Cursor::Pointer
        } else {
            Cursor::Default
        };

        if let Mode::ClickCooldown { until } = self.mode
            && now < until
        {
            return;
        }

        self.mode = if sample.over_solid {
            Mode::HoverPaused
        } else {
            Mode::Rotating
        };
    }

    /// A click with no hotspot under it changes nothing. A hit yields
    /// exactly one activation and starts the cooldown; further clicks are
    /// swallowed until the cooldown elapses.
    pub fn on_click(&mut self, hit: Option<&Hotspot>, now: Time) -> Option<Activation> {
        if let Mode::ClickCooldown { until } = self.mode
            && now < until
        {
            return None;
        }

        let hotspot = hit?;
        self.mode = Mode::ClickCooldown {
            until: now.offset(CLICK_COOLDOWN_S),
        };
        Some(Activation {
            id: hotspot.id,
            url: hotspot.url.clone(),
        })
    }

    /// Read once per frame by the tick. An elapsed cooldown reverts to
    /// `Rotating` on the first frame at-or-after its deadline.
    pub fn rotation_paused(&mut self, now: Time) -> bool {
        match self.mode {
            Mode::Rotating => false,
            Mode::HoverPaused => true,
            Mode::ClickCooldown { until } => {
                if now >= until {
                    self.mode = Mode::Rotating;
                    false
                } else {
                    true
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CLICK_COOLDOWN_S, Cursor, InteractionState, Mode, PointerSample};
    use crate::hotspot::{Hotspot, HotspotId};
    use foundation::math::Vec3;
    use foundation::time::Time;

    fn hotspot(id: u32) -> Hotspot {
        Hotspot {
            id: HotspotId(id),
            local_position: Vec3::new(0.0, 0.0, 1.0),
            label_anchor: Vec3::new(0.0, 0.0, 1.1),
            url: format!("https://example.org/{id}"),
            label: format!("H{id}"),
            visited: false,
        }
    }

    #[test]
    fn miss_sample_means_rotating_and_default_cursor() {
        let mut state = InteractionState::new();
        state.on_pointer_move(PointerSample::miss(), Time(0.0));
        assert_eq!(state.mode, Mode::Rotating);
        assert_eq!(state.cursor, Cursor::Default);
        assert!(!state.rotation_paused(Time(0.0)));
    }

    #[test]
    fn hovering_the_solid_pauses_rotation() {
        let mut state = InteractionState::new();
        state.on_pointer_move(
            PointerSample {
                over_solid: true,
                hotspot: None,
            },
            Time(0.0),
        );
        assert_eq!(state.mode, Mode::HoverPaused);
        assert_eq!(state.cursor, Cursor::Default);
        assert!(state.rotation_paused(Time(0.0)));
    }

    #[test]
    fn marker_under_pointer_switches_cursor() {
        let mut state = InteractionState::new();
        state.on_pointer_move(
            PointerSample {
                over_solid: true,
                hotspot: Some(HotspotId(2)),
            },
            Time(0.0),
        );
        assert_eq!(state.cursor, Cursor::Pointer);
    }

    #[test]
    fn click_without_hit_changes_nothing() {
        let mut state = InteractionState::new();
        assert!(state.on_click(None, Time(0.0)).is_none());
        assert_eq!(state.mode, Mode::Rotating);
    }

    #[test]
    fn click_yields_one_activation_and_a_cooldown() {
        let mut state = InteractionState::new();
        let h = hotspot(3);
        let activation = state.on_click(Some(&h), Time(2.0)).expect("activation");
        assert_eq!(activation.id, HotspotId(3));
        assert_eq!(activation.url, "https://example.org/3");
        assert_eq!(
            state.mode,
            Mode::ClickCooldown {
                until: Time(2.0 + CLICK_COOLDOWN_S)
            }
        );
    }

    #[test]
    fn clicks_are_swallowed_while_the_cooldown_runs() {
        let mut state = InteractionState::new();
        let h = hotspot(0);
        assert!(state.on_click(Some(&h), Time(0.0)).is_some());
        assert!(state.on_click(Some(&h), Time(0.5)).is_none());

        // The deadline itself is fair game again.
        assert!(state.on_click(Some(&h), Time(CLICK_COOLDOWN_S)).is_some());
    }

    #[test]
    fn hover_is_suppressed_while_the_cooldown_runs() {
        let mut state = InteractionState::new();
        let h = hotspot(0);
        state.on_click(Some(&h), Time(0.0));

        // Pointer still parked over the solid: no re-pause.
        state.on_pointer_move(
            PointerSample {
                over_solid: true,
                hotspot: None,
            },
            Time(0.5),
        );
        assert!(matches!(state.mode, Mode::ClickCooldown { .. }));

        // After the deadline the same sample pauses again.
        state.on_pointer_move(
            PointerSample {
                over_solid: true,
                hotspot: None,
            },
            Time(1.5),
        );
        assert_eq!(state.mode, Mode::HoverPaused);
    }

    #[test]
    fn rotation_resumes_exactly_at_the_deadline() {
        let mut state = InteractionState::new();
        let h = hotspot(0);
        state.on_click(Some(&h), Time(0.0));

        assert!(state.rotation_paused(Time(0.0)));
        assert!(state.rotation_paused(Time(CLICK_COOLDOWN_S - 1e-9)));
        assert!(!state.rotation_paused(Time(CLICK_COOLDOWN_S)));
        assert_eq!(state.mode, Mode::Rotating);
    }
}
