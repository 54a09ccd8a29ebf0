//! The stage: one sphere, one point light and the 2D overlay elements.
//!
//! This is plain data. The renderer reads it each frame, and animations write
//! into it through [`PropertyTarget`].

use glam::Vec3;

use crate::animation::{Property, PropertyTarget, Value};
use crate::color::{Color, Rgb8};
use crate::mesh::Transform;

/// Surface parameters for a lit mesh.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StandardMaterial {
    pub color: Color,
    /// 0 is mirror-like, 1 fully diffuse.
    pub roughness: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Sphere {
    pub radius: f32,
    pub width_segments: u32,
    pub height_segments: u32,
    pub transform: Transform,
    pub material: StandardMaterial,
}

/// A light radiating from a point, fading out by `distance`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Color,
    pub intensity: f32,
    /// Range of the light; 0 means unlimited.
    pub distance: f32,
    /// Falloff exponent (2 is physically correct).
    pub decay: f32,
}

/// The top navigation bar.
#[derive(Clone, Debug, PartialEq)]
pub struct NavBar {
    /// Height in pixels.
    pub height: f32,
    /// Vertical offset as a fraction of `height`; `-1.0` hides it above the top edge.
    pub offset: f32,
    pub color: Color,
}

/// The centered title text.
#[derive(Clone, Debug, PartialEq)]
pub struct Title {
    pub text: String,
    /// Font size in pixels.
    pub size: f32,
    pub color: Color,
    pub opacity: f32,
}

/// Everything drawn each frame, apart from the camera.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    pub background: Color,
    pub sphere: Sphere,
    pub light: PointLight,
    pub nav: Option<NavBar>,
    pub title: Option<Title>,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            background: Color::BLACK,
            sphere: Sphere {
                radius: 3.0,
                width_segments: 64,
                height_segments: 64,
                transform: Transform::default(),
                material: StandardMaterial {
                    color: Color::from_srgb8(Rgb8::new(0x00, 0xff, 0x83)),
                    roughness: 0.4,
                },
            },
            light: PointLight {
                position: Vec3::new(0.0, 10.0, 10.0),
                color: Color::WHITE,
                intensity: 1.25,
                distance: 100.0,
                decay: 2.0,
            },
            nav: Some(NavBar {
                height: 64.0,
                offset: 0.0,
                color: Color::rgba(0.02, 0.02, 0.03, 0.6),
            }),
            title: Some(Title {
                text: "Give it a spin".to_string(),
                size: 48.0,
                color: Color::WHITE,
                opacity: 1.0,
            }),
        }
    }
}

impl PropertyTarget for Scene {
    fn get(&self, property: Property) -> Option<Value> {
        match property {
            Property::SphereScale => Some(Value::Vec3(self.sphere.transform.scale)),
            Property::SphereColor => Some(Value::Color(self.sphere.material.color)),
            Property::NavOffset => self.nav.as_ref().map(|nav| Value::Scalar(nav.offset)),
            Property::TitleOpacity => self.title.as_ref().map(|title| Value::Scalar(title.opacity)),
        }
    }

    fn set(&mut self, property: Property, value: Value) {
        match (property, value) {
            (Property::SphereScale, Value::Vec3(scale)) => self.sphere.transform.scale = scale,
            (Property::SphereColor, Value::Color(color)) => self.sphere.material.color = color,
            (Property::NavOffset, Value::Scalar(offset)) => {
                if let Some(nav) = &mut self.nav {
                    nav.offset = offset;
                }
            }
            (Property::TitleOpacity, Value::Scalar(opacity)) => {
                if let Some(title) = &mut self.title {
                    title.opacity = opacity.clamp(0.0, 1.0);
                }
            }
            (property, value) => {
                tracing::warn!(?property, ?value, "ignoring value of the wrong kind");
            }
        }
    }
}
