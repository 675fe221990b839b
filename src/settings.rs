//! Throw tuning
//!
//! Data-driven constants for launch feel, flight and impact. Loaded from JSON
//! by the host game; every field has a default so partial files are fine.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::{CARD_HALF_EXTENTS, GRAVITY, HIT_RADIUS, SIM_DT};
use crate::error::TuningError;
use crate::sim::IntegrationMode;

/// Upper bound on forecast points per preview
pub const MAX_PREVIEW_STEPS: usize = 4096;

/// Throw feel presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ThrowPreset {
    Casual,
    #[default]
    Standard,
    Pro,
}

impl ThrowPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThrowPreset::Casual => "Casual",
            ThrowPreset::Standard => "Standard",
            ThrowPreset::Pro => "Pro",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "casual" => Some(ThrowPreset::Casual),
            "standard" | "std" => Some(ThrowPreset::Standard),
            "pro" => Some(ThrowPreset::Pro),
            _ => None,
        }
    }

    /// Launch power multiplier for this preset
    pub fn power(&self) -> f32 {
        match self {
            ThrowPreset::Casual => 1.2,
            ThrowPreset::Standard => 1.5,
            ThrowPreset::Pro => 1.9,
        }
    }

    /// Spin power for this preset (rad/s at unit random vector)
    pub fn spin_power(&self) -> f32 {
        match self {
            ThrowPreset::Casual => 3.0,
            ThrowPreset::Standard => 8.0,
            ThrowPreset::Pro => 14.0,
        }
    }

    /// Maximum throw speed for this preset
    pub fn max_throw_speed(&self) -> f32 {
        match self {
            ThrowPreset::Casual => 14.0,
            ThrowPreset::Standard => 20.0,
            ThrowPreset::Pro => 28.0,
        }
    }
}

/// Throw tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrowTuning {
    /// Seed for spin and tilt randomness
    pub seed: u64,
    /// Feel preset the launch values were derived from
    pub preset: ThrowPreset,

    // === Flight ===
    pub gravity: Vec3,
    /// Integration used by live flight and the preview
    pub integration: IntegrationMode,
    pub mass: f32,
    /// Magnus-like lateral force coefficient
    pub spin_strength: f32,
    /// Card collision box half-extents (local X, Y, Z)
    pub half_extents: Vec3,

    // === Launch ===
    /// Vertical lift added per unit of horizontal speed
    pub lift_factor: f32,
    /// Blend toward zero applied before power (1.0 = none)
    pub launch_blend: f32,
    pub power: f32,
    pub max_throw_speed: f32,
    pub spin_power: f32,

    // === Dragging ===
    /// Height of the horizontal drag plane
    pub drag_plane_height: f32,
    /// Camera pitch (radians) below which the drag plane is raised
    pub pitch_threshold: f32,
    /// Height added per radian of pitch below the threshold
    pub pitch_boost: f32,
    pub max_pitch_boost: f32,

    // === Impact ===
    pub hit_radius: f32,
    pub embed_depth: f32,
    pub max_tilt_degrees: f32,
    /// Seconds to settle into the embed pose
    pub stick_duration: f32,

    // === Preview ===
    pub preview_steps: usize,
    pub preview_dt: f32,

    // === Out of bounds ===
    pub kill_height: f32,
    pub max_flight_time: f32,
}

impl Default for ThrowTuning {
    fn default() -> Self {
        let preset = ThrowPreset::Standard;
        Self {
            seed: 0x5EED_CA4D,
            preset,

            gravity: GRAVITY,
            integration: IntegrationMode::Ballistic,
            mass: 1.0,
            spin_strength: 0.005,
            half_extents: CARD_HALF_EXTENTS,

            lift_factor: 0.1,
            launch_blend: 0.65,
            power: preset.power(),
            max_throw_speed: preset.max_throw_speed(),
            spin_power: preset.spin_power(),

            drag_plane_height: 1.0,
            pitch_threshold: 0.6,
            pitch_boost: 0.5,
            max_pitch_boost: 0.4,

            hit_radius: HIT_RADIUS,
            embed_depth: 0.03,
            max_tilt_degrees: 8.0,
            stick_duration: 0.12,

            preview_steps: 90,
            preview_dt: SIM_DT,

            kill_height: -5.0,
            max_flight_time: 6.0,
        }
    }
}

impl ThrowTuning {
    /// Create tuning from a preset (applies preset launch values)
    pub fn from_preset(preset: ThrowPreset) -> Self {
        let mut tuning = Self::default();
        tuning.apply_preset(preset);
        tuning
    }

    /// Apply a preset (updates launch power, spin and speed cap)
    pub fn apply_preset(&mut self, preset: ThrowPreset) {
        self.preset = preset;
        self.power = preset.power();
        self.spin_power = preset.spin_power();
        self.max_throw_speed = preset.max_throw_speed();
    }

    /// Parse and validate tuning JSON
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load and validate tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded throw tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Check physical sanity of every field
    pub fn validate(&self) -> Result<(), TuningError> {
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(TuningError::InvalidMass);
        }
        if !(self.hit_radius.is_finite() && self.hit_radius >= 0.0) {
            return Err(TuningError::InvalidHitRadius);
        }
        if !(self.preview_dt.is_finite() && self.preview_dt > 0.0) {
            return Err(TuningError::InvalidTimestep { field: "preview_dt" });
        }
        if self.preview_steps > MAX_PREVIEW_STEPS {
            return Err(TuningError::PreviewSteps {
                steps: self.preview_steps,
                max: MAX_PREVIEW_STEPS,
            });
        }
        if !self.gravity.is_finite() {
            return Err(TuningError::NonFinite { field: "gravity" });
        }

        let finite = [
            ("lift_factor", self.lift_factor),
            ("drag_plane_height", self.drag_plane_height),
            ("pitch_threshold", self.pitch_threshold),
            ("kill_height", self.kill_height),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(TuningError::NonFinite { field });
            }
        }

        let non_negative = [
            ("spin_strength", self.spin_strength),
            ("launch_blend", self.launch_blend),
            ("power", self.power),
            ("max_throw_speed", self.max_throw_speed),
            ("spin_power", self.spin_power),
            ("pitch_boost", self.pitch_boost),
            ("max_pitch_boost", self.max_pitch_boost),
            ("embed_depth", self.embed_depth),
            ("max_tilt_degrees", self.max_tilt_degrees),
            ("stick_duration", self.stick_duration),
            ("max_flight_time", self.max_flight_time),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(TuningError::NegativeValue { field });
            }
        }
        if self.half_extents.min_element() < 0.0 || !self.half_extents.is_finite() {
            return Err(TuningError::NegativeValue { field: "half_extents" });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(ThrowTuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let tuning = ThrowTuning::from_json(r#"{ "power": 2.0, "hit_radius": 0.5 }"#).unwrap();
        assert_eq!(tuning.power, 2.0);
        assert_eq!(tuning.hit_radius, 0.5);
        assert_eq!(tuning.launch_blend, 0.65);
        assert_eq!(tuning.integration, IntegrationMode::Ballistic);
    }

    #[test]
    fn test_json_round_trip_preserves_preset() {
        let tuning = ThrowTuning::from_preset(ThrowPreset::Pro);
        let json = tuning.to_json().unwrap();
        let back = ThrowTuning::from_json(&json).unwrap();
        assert_eq!(back.preset, ThrowPreset::Pro);
        assert_eq!(back.max_throw_speed, ThrowPreset::Pro.max_throw_speed());
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            ThrowTuning::from_json(r#"{ "mass": 0.0 }"#),
            Err(TuningError::InvalidMass)
        ));
        assert!(matches!(
            ThrowTuning::from_json(r#"{ "preview_dt": 0.0 }"#),
            Err(TuningError::InvalidTimestep { field: "preview_dt" })
        ));
        assert!(matches!(
            ThrowTuning::from_json(r#"{ "embed_depth": -1.0 }"#),
            Err(TuningError::NegativeValue { field: "embed_depth" })
        ));
        assert!(matches!(
            ThrowTuning::from_json("not json"),
            Err(TuningError::Parse(_))
        ));
    }

    #[test]
    fn test_rejects_oversized_preview() {
        let json = format!(r#"{{ "preview_steps": {} }}"#, usize::MAX);
        assert!(matches!(
            ThrowTuning::from_json(&json),
            Err(TuningError::PreviewSteps { max: MAX_PREVIEW_STEPS, .. })
        ));

        let at_cap = format!(r#"{{ "preview_steps": {} }}"#, MAX_PREVIEW_STEPS);
        assert_eq!(ThrowTuning::from_json(&at_cap).unwrap().preview_steps, MAX_PREVIEW_STEPS);
    }

    #[test]
    fn test_rejects_overflowing_floats() {
        // serde_json reads out-of-range numbers as infinity
        assert!(matches!(
            ThrowTuning::from_json(r#"{ "lift_factor": 1e39 }"#),
            Err(TuningError::NonFinite { field: "lift_factor" })
        ));
        assert!(matches!(
            ThrowTuning::from_json(r#"{ "gravity": [0.0, 1e39, 0.0] }"#),
            Err(TuningError::NonFinite { field: "gravity" })
        ));
        for field in ["drag_plane_height", "pitch_threshold", "kill_height"] {
            let json = format!(r#"{{ "{}": -1e39 }}"#, field);
            assert!(
                matches!(ThrowTuning::from_json(&json), Err(TuningError::NonFinite { field: f }) if f == field),
                "{} accepted a non-finite value",
                field
            );
        }
        // Negative is fine for signed fields
        assert!(ThrowTuning::from_json(r#"{ "kill_height": -20.0, "lift_factor": -0.1 }"#).is_ok());
    }

    #[test]
    fn test_preset_from_str() {
        assert_eq!(ThrowPreset::from_str("PRO"), Some(ThrowPreset::Pro));
        assert_eq!(ThrowPreset::from_str("std"), Some(ThrowPreset::Standard));
        assert_eq!(ThrowPreset::from_str("wild"), None);
    }
}
