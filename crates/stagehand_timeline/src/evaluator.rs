// SPDX-License-Identifier: MIT OR Apache-2.0
//! Track sampling.
//!
//! Sampling is a pure function of the track and the time: edges clamp to the
//! first/last keyframe, `Hold` and text tracks step, everything else blends
//! with the segment's easing.

use crate::keyframe::{InterpolationMode, Interpolation, Keyframe};
use crate::track::Track;
use crate::value::{Value, ValueKind};

/// Sample a track at `time`
pub fn sample(track: &Track, time: f64) -> Value {
    let keyframes = track.keyframes();

    let (first, last) = match (keyframes.first(), keyframes.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return track.default_value.clone(),
    };

    if keyframes.len() == 1 || time <= first.time {
        return first.value.clone();
    }
    if time >= last.time {
        return last.value.clone();
    }

    // first.time < time < last.time, so 1 <= next < len
    let next = keyframes.partition_point(|k| k.time <= time);
    let k1 = &keyframes[next - 1];
    let k2 = &keyframes[next];

    if track.kind == ValueKind::Text || k1.interpolation == InterpolationMode::Hold {
        return k1.value.clone();
    }

    blend(k1, k2, time)
}

/// Blend between the bracketing keyframes of a numeric segment
fn blend(k1: &Keyframe, k2: &Keyframe, time: f64) -> Value {
    let span = k2.time - k1.time;
    if span <= 0.0 {
        return k1.value.clone();
    }

    let t = (time - k1.time) / span;
    let t = Interpolation::ease(t, k1.ease_out, k2.ease_in);

    match (&k1.value, &k2.value) {
        (Value::Scalar(a), Value::Scalar(b)) => Value::Scalar(Interpolation::lerp(*a, *b, t)),
        (Value::Vector2(a), Value::Vector2(b)) => Value::Vector2(Interpolation::lerp_vec2(*a, *b, t)),
        (Value::Text(_), Value::Text(_)) => k1.value.clone(),
        (a, b) => {
            debug_assert!(false, "mismatched keyframe kinds: {} vs {}", a.kind(), b.kind());
            k1.value.clone()
        }
    }
}
