//! Tweens and timelines over the stage's animatable properties.
//!
//! Animations never hold references into the scene. They address a
//! [`Property`] and read/write it through a [`PropertyTarget`] each tick, so a
//! property that does not exist (for example the title when no font could be
//! loaded) simply turns the animation into a no-op.
//!
//! Code that only needs to *start* animations depends on the [`Animator`]
//! trait rather than on [`TweenEngine`], so tests can substitute an animator
//! that applies the end state immediately.

mod easing;
mod timeline;
mod tween;

pub use easing::Easing;
pub use timeline::{Position, Timeline};
pub use tween::{TweenDefaults, TweenEngine};

use glam::Vec3;

use crate::color::Color;

/// An animatable property of the stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Property {
    /// Per-axis scale of the sphere ([`Value::Vec3`]).
    SphereScale,
    /// Material color of the sphere ([`Value::Color`]).
    SphereColor,
    /// Vertical offset of the nav bar as a fraction of its own height
    /// ([`Value::Scalar`]); `-1.0` is fully off-screen above.
    NavOffset,
    /// Opacity of the title text ([`Value::Scalar`]).
    TitleOpacity,
}

/// A property value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value {
    Scalar(f32),
    Vec3(Vec3),
    Color(Color),
}

impl Value {
    /// Interpolate towards `to`. Mismatched kinds jump straight to `to`.
    pub fn lerp(self, to: Value, t: f32) -> Value {
        match (self, to) {
            (Value::Scalar(a), Value::Scalar(b)) => Value::Scalar(Interpolate::lerp(&a, &b, t)),
            (Value::Vec3(a), Value::Vec3(b)) => Value::Vec3(Interpolate::lerp(&a, &b, t)),
            (Value::Color(a), Value::Color(b)) => Value::Color(a.lerp(&b, t)),
            _ => to,
        }
    }
}

/// Values that can be linearly interpolated.
pub trait Interpolate: Copy {
    /// Linearly interpolate between self and other by factor t (0.0 to 1.0).
    fn lerp(&self, other: &Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Interpolate for Vec3 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        *self + (*other - *self) * t
    }
}

impl Interpolate for Color {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        let channel = |a: f32, b: f32| Interpolate::lerp(&a, &b, t);
        Color::rgba(
            channel(self.r, other.r),
            channel(self.g, other.g),
            channel(self.b, other.b),
            channel(self.a, other.a),
        )
    }
}

/// Read/write access to animatable properties.
pub trait PropertyTarget {
    /// Current value, or `None` if the property's owner does not exist.
    fn get(&self, property: Property) -> Option<Value>;

    /// Write a value. Writes to absent properties are ignored.
    fn set(&mut self, property: Property, value: Value);
}

/// Starts animations.
pub trait Animator {
    /// Animate `property` from wherever it is now to `to`.
    ///
    /// `duration` is in seconds; `None` uses the animator's default. Starting
    /// a new animation on a property that is already animating replaces the
    /// old one.
    fn animate_to(&mut self, property: Property, to: Value, duration: Option<f32>);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_lerp_interpolates_matching_kinds() {
        assert_eq!(Value::Scalar(-1.0).lerp(Value::Scalar(0.0), 0.25), Value::Scalar(-0.75));
        assert_eq!(
            Value::Vec3(Vec3::ZERO).lerp(Value::Vec3(Vec3::ONE), 0.5),
            Value::Vec3(Vec3::splat(0.5))
        );
        assert_eq!(
            Value::Color(Color::BLACK).lerp(Value::Color(Color::WHITE), 0.5),
            Value::Color(Color::rgb(0.5, 0.5, 0.5))
        );
    }

    #[test]
    fn value_lerp_jumps_on_kind_mismatch() {
        let to = Value::Color(Color::WHITE);
        assert_eq!(Value::Scalar(0.0).lerp(to, 0.1), to);
    }
}
