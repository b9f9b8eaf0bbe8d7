use runtime::frame::Frame;

use crate::hotspot::Showcase;
use crate::interaction::InteractionState;

/// Fixed per-frame angular increment, applied to both axes.
pub const ROTATION_STEP_RAD: f64 = 0.003;

/// One render-loop transition, kept free of side effects.
///
/// Presenting (drawing, label DOM writes) is a separate step owned by the
/// application, so this can be driven frame-by-frame in tests without real
/// frame pacing.
pub fn advance(showcase: &mut Showcase, interaction: &mut InteractionState, frame: Frame) {
    if !interaction.rotation_paused(frame.time) {
        showcase.advance_rotation(ROTATION_STEP_RAD);
    }
}
