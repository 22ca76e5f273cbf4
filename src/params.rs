/*
 * Simulation Parameters Module
 *
 * This module defines the SimulationParameters struct that holds every
 * tunable read by the flocking rules. The driver owns the only mutable copy
 * and hands the core a shared reference on each step. UI edits go through
 * the fixed set of fields enumerated by ParamField.
 */

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::error::ParamError;

/// Parameters read by every boid on every step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationParameters {
    pub perception_radius: f32,
    pub separation_radius: f32,
    pub max_speed: f32,
    pub max_force: f32,
    pub cohesion_weight: f32,
    pub alignment_weight: f32,
    pub separation_weight: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            perception_radius: 75.0,
            separation_radius: 25.0,
            max_speed: 3.0,
            max_force: 0.05,
            cohesion_weight: 1.0,
            alignment_weight: 1.5,
            separation_weight: 2.0,
            width: crate::WORLD_WIDTH,
            height: crate::WORLD_HEIGHT,
        }
    }
}

impl SimulationParameters {
    pub fn get(&self, field: ParamField) -> f32 {
        match field {
            ParamField::PerceptionRadius => self.perception_radius,
            ParamField::SeparationRadius => self.separation_radius,
            ParamField::MaxSpeed => self.max_speed,
            ParamField::MaxForce => self.max_force,
            ParamField::CohesionWeight => self.cohesion_weight,
            ParamField::AlignmentWeight => self.alignment_weight,
            ParamField::SeparationWeight => self.separation_weight,
        }
    }

    /// Set a tunable field. Slider bounds are not enforced here; only
    /// non-finite values are refused.
    pub fn set(&mut self, field: ParamField, value: f32) -> Result<(), ParamError> {
        if !value.is_finite() {
            return Err(ParamError::NonFinite { field, value });
        }

        let slot = match field {
            ParamField::PerceptionRadius => &mut self.perception_radius,
            ParamField::SeparationRadius => &mut self.separation_radius,
            ParamField::MaxSpeed => &mut self.max_speed,
            ParamField::MaxForce => &mut self.max_force,
            ParamField::CohesionWeight => &mut self.cohesion_weight,
            ParamField::AlignmentWeight => &mut self.alignment_weight,
            ParamField::SeparationWeight => &mut self.separation_weight,
        };
        *slot = value;
        Ok(())
    }

    /// Update a tunable by its snake_case name, e.g. `"max_speed"`.
    pub fn update_parameter(&mut self, name: &str, value: f32) -> Result<(), ParamError> {
        let field = name.parse::<ParamField>()?;
        self.set(field, value)
    }

    /// Check the preconditions the flocking rules rely on. The core never
    /// calls this; drivers use it to refuse configurations whose behavior
    /// is undefined.
    pub fn validate(&self) -> Result<(), ParamError> {
        let positive = [
            ("perception_radius", self.perception_radius),
            ("separation_radius", self.separation_radius),
            ("max_speed", self.max_speed),
            ("width", self.width),
            ("height", self.height),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ParamError::Precondition {
                    field,
                    value,
                    requirement: "must be a finite value greater than zero",
                });
            }
        }

        let non_negative = [
            ("max_force", self.max_force),
            ("cohesion_weight", self.cohesion_weight),
            ("alignment_weight", self.alignment_weight),
            ("separation_weight", self.separation_weight),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ParamError::Precondition {
                    field,
                    value,
                    requirement: "must be a finite value of at least zero",
                });
            }
        }

        Ok(())
    }
}

/// The fields a control surface may edit between steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamField {
    PerceptionRadius,
    SeparationRadius,
    MaxSpeed,
    MaxForce,
    CohesionWeight,
    AlignmentWeight,
    SeparationWeight,
}

impl ParamField {
    pub const ALL: [ParamField; 7] = [
        ParamField::PerceptionRadius,
        ParamField::SeparationRadius,
        ParamField::MaxSpeed,
        ParamField::MaxForce,
        ParamField::CohesionWeight,
        ParamField::AlignmentWeight,
        ParamField::SeparationWeight,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ParamField::PerceptionRadius => "perception_radius",
            ParamField::SeparationRadius => "separation_radius",
            ParamField::MaxSpeed => "max_speed",
            ParamField::MaxForce => "max_force",
            ParamField::CohesionWeight => "cohesion_weight",
            ParamField::AlignmentWeight => "alignment_weight",
            ParamField::SeparationWeight => "separation_weight",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ParamField::PerceptionRadius => "Perception Radius",
            ParamField::SeparationRadius => "Separation Radius",
            ParamField::MaxSpeed => "Max Speed",
            ParamField::MaxForce => "Max Force",
            ParamField::CohesionWeight => "Cohesion Weight",
            ParamField::AlignmentWeight => "Alignment Weight",
            ParamField::SeparationWeight => "Separation Weight",
        }
    }

    // Slider bounds for the control panel
    pub fn range(self) -> RangeInclusive<f32> {
        match self {
            ParamField::PerceptionRadius => 50.0..=200.0,
            ParamField::SeparationRadius => 10.0..=50.0,
            ParamField::MaxSpeed => 1.0..=10.0,
            ParamField::MaxForce => 0.01..=0.1,
            ParamField::CohesionWeight
            | ParamField::AlignmentWeight
            | ParamField::SeparationWeight => 0.0..=3.0,
        }
    }

    // Slider step granularity
    pub fn step(self) -> f32 {
        match self {
            ParamField::PerceptionRadius | ParamField::SeparationRadius => 1.0,
            ParamField::MaxSpeed => 0.1,
            ParamField::MaxForce => 0.005,
            ParamField::CohesionWeight
            | ParamField::AlignmentWeight
            | ParamField::SeparationWeight => 0.1,
        }
    }
}

impl fmt::Display for ParamField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ParamField {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ParamField::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| ParamError::UnknownParameter(s.to_string()))
    }
}
