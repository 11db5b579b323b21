//! Keyframe playback with per-entity blend state

use ember_core::Transform;
use ember_ecs::World;

use crate::components::{Animation, AnimationBlendState, AnimationChannels, Timer};

/// Advance every animated entity and write the animated parts of its
/// blended Transform.
///
/// The Timer counts time spent on the current keyframe pair and is reset each
/// time playback moves on to the next pair.
pub fn animation_system(world: &mut World, dt: f32) {
    for (_, (animation, state, timer, transform)) in world.query_mut::<(
        &Animation,
        &mut AnimationBlendState,
        &mut Timer,
        &mut Transform,
    )>() {
        let frames = animation.keyframes.len();
        if frames == 0 {
            continue;
        }
        if state.current >= frames || state.next >= frames {
            *state = AnimationBlendState::start(frames, animation.looping);
        }

        timer.tick(dt);
        if animation.seconds_per_frame <= 0.0 {
            animation
                .channels
                .apply(&animation.keyframes[state.current], transform);
            continue;
        }

        if timer.has_elapsed(animation.seconds_per_frame) {
            state.advance(frames, animation.looping);
            timer.reset();
        }

        state.blend = (timer.elapsed / animation.seconds_per_frame).clamp(0.0, 1.0);
        let pose = Transform::lerp(
            &animation.keyframes[state.current],
            &animation.keyframes[state.next],
            state.blend,
        );
        animation.channels.apply(&pose, transform);
    }
}
