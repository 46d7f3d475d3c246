#![allow(dead_code)]
//! Keyframe sampling with easing.
//!
//! Sampling clamps outside the key range, locates the bracketing pair with a
//! linear scan (tracks are short), and blends according to the payload
//! variant: pairs and scalars lerp, flags and textures step, everything else
//! holds the left key. Easing eases the blend parameter, except for texture
//! steps which switch on the raw segment position.

use crate::document::Vec2;
use crate::timeline::{Easing, KeyData, Keyframe, Track};

/// Sample one track at a fractional frame. `None` means the track is empty
/// and the property keeps its base value.
pub fn sample_track(track: &Track, frame: f32) -> Option<KeyData> {
    sample_keys(&track.keys, frame)
}

pub(crate) fn sample_keys(keys: &[Keyframe], frame: f32) -> Option<KeyData> {
    let first = keys.first()?;
    let last = keys.last()?;
    if frame <= first.index {
        return Some(first.data.clone());
    }
    if frame >= last.index {
        return Some(last.data.clone());
    }
    for pair in keys.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        if frame >= a.index && frame <= b.index {
            return Some(blend_segment(a, b, frame));
        }
    }
    Some(last.data.clone())
}

fn blend_segment(a: &Keyframe, b: &Keyframe, frame: f32) -> KeyData {
    let span = (b.index - a.index).max(1.0);
    let t = (frame - a.index) / span;
    let eased = apply_easing(b.easing.or(a.easing), t);
    match (&a.data, &b.data) {
        (KeyData::Pair(pa), KeyData::Pair(pb)) => KeyData::Pair(Vec2::new(
            lerp(pa.x, pb.x, eased),
            lerp(pa.y, pb.y, eased),
        )),
        (KeyData::Scalar(va), KeyData::Scalar(vb)) => KeyData::Scalar(lerp(*va, *vb, eased)),
        (KeyData::Flag(fa), KeyData::Flag(fb)) => {
            KeyData::Flag(if eased < 1.0 { *fa } else { *fb })
        }
        // Texture swaps step on the raw segment position, not the eased one.
        (KeyData::Texture(_), KeyData::Texture(_)) => {
            if t < 1.0 {
                a.data.clone()
            } else {
                b.data.clone()
            }
        }
        // Held payloads, and any mismatched pairing, stick to the left key.
        _ => a.data.clone(),
    }
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

pub(crate) fn apply_easing(easing: Option<Easing>, t: f32) -> f32 {
    match easing {
        None | Some(Easing::Linear) => t,
        Some(Easing::QuadIn) => t * t,
        Some(Easing::QuadOut) => 1.0 - (1.0 - t) * (1.0 - t),
        Some(Easing::QuadInOut) => {
            if t < 0.5 {
                2.0 * t * t
            } else {
                1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
            }
        }
        Some(Easing::Bezier { x1, y1, x2, y2 }) => bezier_y(x1, y1, x2, y2, t),
    }
}

/// Cubic polynomial fit through the control points, read off directly at `t`.
/// The x component only guards the degenerate curve: when it evaluates to
/// exactly zero the easing collapses to linear.
fn bezier_y(x1: f32, y1: f32, x2: f32, y2: f32, t: f32) -> f32 {
    let cx = 3.0 * x1;
    let bx = 3.0 * (x2 - x1) - cx;
    let ax = 1.0 - cx - bx;
    let x = ((ax * t + bx) * t + cx) * t;
    if x == 0.0 {
        return t;
    }
    let cy = 3.0 * y1;
    let by = 3.0 * (y2 - y1) - cy;
    let ay = 1.0 - cy - by;
    ((ay * t + by) * t + cy) * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::document::{FileRef, Rgb};
    use crate::timeline::Keyframe;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    fn pair_key(index: f32, x: f32, y: f32) -> Keyframe {
        Keyframe {
            index,
            easing: None,
            data: KeyData::Pair(Vec2::new(x, y)),
        }
    }

    fn expect_pair(data: KeyData) -> Vec2 {
        match data {
            KeyData::Pair(v) => v,
            other => panic!("expected pair, got {other:?}"),
        }
    }

    /// it should clamp to the first and last keyframes outside the range
    #[test]
    fn clamps_outside_the_key_range() {
        let keys = vec![pair_key(4.0, 1.0, 2.0), pair_key(10.0, 5.0, 6.0)];
        assert_eq!(expect_pair(sample_keys(&keys, -3.0).unwrap()), Vec2::new(1.0, 2.0));
        assert_eq!(expect_pair(sample_keys(&keys, 4.0).unwrap()), Vec2::new(1.0, 2.0));
        assert_eq!(expect_pair(sample_keys(&keys, 10.0).unwrap()), Vec2::new(5.0, 6.0));
        assert_eq!(expect_pair(sample_keys(&keys, 99.0).unwrap()), Vec2::new(5.0, 6.0));
        assert!(sample_keys(&[], 0.0).is_none());
    }

    /// it should lerp point pairs linearly between keys
    #[test]
    fn lerps_pairs_at_the_midpoint() {
        let keys = vec![pair_key(0.0, 0.0, 0.0), pair_key(10.0, 100.0, 0.0)];
        let mid = expect_pair(sample_keys(&keys, 5.0).unwrap());
        assert!(approx(mid.x, 50.0));
        assert!(approx(mid.y, 0.0));
    }

    /// it should apply the quadratic easing family
    #[test]
    fn quadratic_easing_values() {
        assert!(approx(apply_easing(Some(Easing::QuadIn), 0.5), 0.25));
        assert!(approx(apply_easing(Some(Easing::QuadOut), 0.5), 0.75));
        assert!(approx(apply_easing(Some(Easing::QuadInOut), 0.5), 0.5));
        assert!(approx(apply_easing(Some(Easing::QuadInOut), 0.25), 0.125));
        assert!(approx(apply_easing(Some(Easing::QuadInOut), 0.75), 0.875));
        assert!(approx(apply_easing(None, 0.3), 0.3));
    }

    /// it should read the custom curve's y component directly
    #[test]
    fn custom_curve_evaluation() {
        let ease = Easing::Bezier {
            x1: 0.42,
            y1: 0.0,
            x2: 0.58,
            y2: 1.0,
        };
        assert!(approx(apply_easing(Some(ease), 0.0), 0.0));
        assert!(approx(apply_easing(Some(ease), 0.5), 0.5));
        assert!(approx(apply_easing(Some(ease), 0.25), 0.15625));
        assert!(approx(apply_easing(Some(ease), 1.0), 1.0));
    }

    /// it should prefer the right-hand key's easing over the left's
    #[test]
    fn easing_comes_from_the_right_key_first() {
        let keys = vec![
            Keyframe {
                index: 0.0,
                easing: Some(Easing::QuadOut),
                data: KeyData::Scalar(0.0),
            },
            Keyframe {
                index: 10.0,
                easing: Some(Easing::QuadIn),
                data: KeyData::Scalar(100.0),
            },
        ];
        let KeyData::Scalar(v) = sample_keys(&keys, 5.0).unwrap() else {
            panic!("expected scalar");
        };
        assert!(approx(v, 25.0));
    }

    /// it should hold boolean values until eased progress reaches one
    #[test]
    fn booleans_step_on_eased_progress() {
        let keys = vec![
            Keyframe {
                index: 0.0,
                easing: None,
                data: KeyData::Flag(true),
            },
            Keyframe {
                index: 10.0,
                easing: None,
                data: KeyData::Flag(false),
            },
        ];
        assert_eq!(sample_keys(&keys, 9.9).unwrap(), KeyData::Flag(true));
        assert_eq!(sample_keys(&keys, 10.0).unwrap(), KeyData::Flag(false));
    }

    /// it should step textures on the raw segment position
    #[test]
    fn textures_step_ignoring_easing() {
        let early = Arc::new(FileRef {
            path: "a.png".into(),
            ..Default::default()
        });
        let late = Arc::new(FileRef {
            path: "b.png".into(),
            ..Default::default()
        });
        let keys = vec![
            Keyframe {
                index: 0.0,
                easing: None,
                data: KeyData::Texture(Some(early.clone())),
            },
            Keyframe {
                index: 10.0,
                // An eased segment must not move the switch point.
                easing: Some(Easing::QuadOut),
                data: KeyData::Texture(Some(late.clone())),
            },
        ];
        let KeyData::Texture(Some(at9)) = sample_keys(&keys, 9.0).unwrap() else {
            panic!("expected texture");
        };
        assert!(Arc::ptr_eq(&at9, &early));
        let KeyData::Texture(Some(at10)) = sample_keys(&keys, 10.0).unwrap() else {
            panic!("expected texture");
        };
        assert!(Arc::ptr_eq(&at10, &late));
    }

    /// it should hold tint payloads at the left key within a segment
    #[test]
    fn held_payloads_stick_to_the_left_key() {
        let keys = vec![
            Keyframe {
                index: 0.0,
                easing: None,
                data: KeyData::Tint(Rgb::new(255, 0, 0)),
            },
            Keyframe {
                index: 10.0,
                easing: None,
                data: KeyData::Tint(Rgb::new(0, 0, 255)),
            },
        ];
        assert_eq!(
            sample_keys(&keys, 9.99).unwrap(),
            KeyData::Tint(Rgb::new(255, 0, 0))
        );
        assert_eq!(
            sample_keys(&keys, 10.0).unwrap(),
            KeyData::Tint(Rgb::new(0, 0, 255))
        );
    }

    /// it should survive duplicate frame indexes without dividing by zero
    #[test]
    fn duplicate_indexes_use_a_unit_span() {
        let keys = vec![
            Keyframe {
                index: 5.0,
                easing: None,
                data: KeyData::Scalar(10.0),
            },
            Keyframe {
                index: 5.0,
                easing: None,
                data: KeyData::Scalar(20.0),
            },
            Keyframe {
                index: 8.0,
                easing: None,
                data: KeyData::Scalar(50.0),
            },
        ];
        let KeyData::Scalar(v) = sample_keys(&keys, 6.0).unwrap() else {
            panic!("expected scalar");
        };
        assert!(v.is_finite());
    }
}
