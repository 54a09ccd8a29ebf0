use serde::{Deserialize, Serialize};

use super::{Animator, Easing, Property, PropertyTarget, Value};

/// Duration and easing used when a tween does not specify its own.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TweenDefaults {
    /// Seconds.
    pub duration: f32,
    pub easing: Easing,
}

impl Default for TweenDefaults {
    fn default() -> Self {
        Self {
            duration: 0.5,
            easing: Easing::EaseOut,
        }
    }
}

/// A single in-flight property animation.
#[derive(Clone, Debug)]
struct Tween {
    property: Property,
    /// Captured on the first tick, so the tween starts from wherever the
    /// property is when it actually begins moving.
    from: Option<Value>,
    to: Value,
    duration: f32,
    elapsed: f32,
    easing: Easing,
}

impl Tween {
    fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (self.elapsed / self.duration).min(1.0)
    }
}

/// Drives `animate_to` tweens, one per property at most.
///
/// The engine is ticked from the frame loop. Starting a tween on a property
/// that is already animating replaces the running tween; the new one picks up
/// from the property's current (mid-flight) value.
#[derive(Debug, Default)]
pub struct TweenEngine {
    tweens: Vec<Tween>,
    pub defaults: TweenDefaults,
}

impl TweenEngine {
    pub fn new(defaults: TweenDefaults) -> Self {
        Self {
            tweens: Vec::with_capacity(4),
            defaults,
        }
    }

    /// Whether `property` has a tween in flight.
    pub fn is_animating(&self, property: Property) -> bool {
        self.tweens.iter().any(|tween| tween.property == property)
    }

    /// Number of tweens in flight.
    pub fn active_count(&self) -> usize {
        self.tweens.len()
    }

    /// Stop every tween where it is.
    pub fn kill_all(&mut self) {
        if !self.tweens.is_empty() {
            tracing::debug!(count = self.tweens.len(), "killing in-flight tweens");
        }
        self.tweens.clear();
    }

    /// Advance all tweens by `dt` seconds and write their values.
    pub fn tick(&mut self, dt: f32, target: &mut impl PropertyTarget) {
        self.tweens.retain_mut(|tween| {
            let from = match tween.from {
                Some(from) => from,
                None => match target.get(tween.property) {
                    Some(current) => *tween.from.insert(current),
                    None => {
                        tracing::debug!(property = ?tween.property, "tween target missing, dropping");
                        return false;
                    }
                },
            };

            tween.elapsed += dt;
            let t = tween.easing.apply(tween.progress());
            target.set(tween.property, from.lerp(tween.to, t));

            tween.progress() < 1.0
        });
    }
}

impl Animator for TweenEngine {
    fn animate_to(&mut self, property: Property, to: Value, duration: Option<f32>) {
        self.tweens.retain(|tween| tween.property != property);
        self.tweens.push(Tween {
            property,
            from: None,
            to,
            duration: duration.unwrap_or(self.defaults.duration),
            elapsed: 0.0,
            easing: self.defaults.easing,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Color, Rgb8};
    use crate::scene::Scene;

    fn linear_engine(duration: f32) -> TweenEngine {
        TweenEngine::new(TweenDefaults {
            duration,
            easing: Easing::Linear,
        })
    }

    fn sphere_color(scene: &Scene) -> Color {
        scene.sphere.material.color
    }

    #[test]
    fn tween_reaches_target_and_retires() {
        let mut scene = Scene::default();
        scene.sphere.material.color = Color::BLACK;
        let mut engine = linear_engine(1.0);

        engine.animate_to(Property::SphereColor, Value::Color(Color::WHITE), None);
        engine.tick(0.5, &mut scene);
        assert_eq!(sphere_color(&scene), Color::rgb(0.5, 0.5, 0.5));
        assert!(engine.is_animating(Property::SphereColor));

        engine.tick(0.5, &mut scene);
        assert_eq!(sphere_color(&scene), Color::WHITE);
        assert_eq!(engine.active_count(), 0);
    }

    #[test]
    fn retarget_replaces_in_flight_tween_from_current_value() {
        let mut scene = Scene::default();
        scene.sphere.material.color = Color::BLACK;
        let mut engine = linear_engine(1.0);

        engine.animate_to(Property::SphereColor, Value::Color(Color::WHITE), None);
        engine.tick(0.5, &mut scene);

        let red = Color::from_srgb8(Rgb8::new(255, 0, 0));
        engine.animate_to(Property::SphereColor, Value::Color(red), None);
        assert_eq!(engine.active_count(), 1);

        // Halfway from mid-grey to red.
        engine.tick(0.5, &mut scene);
        let color = sphere_color(&scene);
        assert!((color.r - 0.75).abs() < 1e-5);
        assert!((color.g - 0.25).abs() < 1e-5);

        engine.tick(0.5, &mut scene);
        assert_eq!(sphere_color(&scene), red);
        assert_eq!(engine.active_count(), 0);
    }

    #[test]
    fn explicit_duration_overrides_default() {
        let mut scene = Scene::default();
        let mut engine = linear_engine(10.0);

        engine.animate_to(Property::NavOffset, Value::Scalar(-1.0), Some(0.25));
        engine.tick(0.25, &mut scene);

        assert_eq!(scene.get(Property::NavOffset), Some(Value::Scalar(-1.0)));
        assert_eq!(engine.active_count(), 0);
    }

    #[test]
    fn tween_on_missing_target_is_dropped() {
        let mut scene = Scene::default();
        scene.title = None;
        let mut engine = linear_engine(1.0);

        engine.animate_to(Property::TitleOpacity, Value::Scalar(1.0), None);
        engine.tick(0.1, &mut scene);

        assert_eq!(engine.active_count(), 0);
        assert_eq!(scene.get(Property::TitleOpacity), None);
    }

    #[test]
    fn kill_all_freezes_properties() {
        let mut scene = Scene::default();
        scene.sphere.material.color = Color::BLACK;
        let mut engine = linear_engine(1.0);

        engine.animate_to(Property::SphereColor, Value::Color(Color::WHITE), None);
        engine.tick(0.25, &mut scene);
        engine.kill_all();
        engine.tick(0.75, &mut scene);

        assert_eq!(sphere_color(&scene), Color::rgb(0.25, 0.25, 0.25));
    }

    #[test]
    fn default_easing_is_ease_out() {
        let mut scene = Scene::default();
        scene.sphere.material.color = Color::BLACK;
        let mut engine = TweenEngine::default();
        assert_eq!(engine.defaults.duration, 0.5);

        engine.animate_to(Property::SphereColor, Value::Color(Color::WHITE), None);
        engine.tick(0.25, &mut scene);
        assert_eq!(sphere_color(&scene).r, 0.75);
    }
}
