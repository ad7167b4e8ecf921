//! TDEE and macronutrient calculator.
//!
//! BMR uses the Mifflin-St Jeor equation (Mifflin et al., 1990):
//! `10 x weight_kg + 6.25 x height_cm - 5 x age + offset`, where the offset
//! is `+5` for men and `-161` for women. TDEE multiplies BMR by an activity
//! factor; target calories add a fixed weekly weight-change modifier.
//! Macros are a fixed 30/45/25 protein/carb/fat split.

use crate::utils::error::{BookingError, Result};
use crate::utils::validation::is_blank;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const LB_TO_KG: f64 = 0.453592;
pub const IN_TO_CM: f64 = 2.54;

pub const PROTEIN_SHARE: f64 = 0.30;
pub const CARB_SHARE: f64 = 0.45;
pub const FAT_SHARE: f64 = 0.25;

pub const KCAL_PER_G_PROTEIN: f64 = 4.0;
pub const KCAL_PER_G_CARB: f64 = 4.0;
pub const KCAL_PER_G_FAT: f64 = 9.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    fn bmr_offset(self) -> f64 {
        match self {
            Self::Male => 5.0,
            Self::Female => -161.0,
        }
    }
}

impl FromStr for Sex {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(Self::Male),
            "female" | "f" => Ok(Self::Female),
            other => Err(BookingError::validation(
                "gender",
                format!("'{}' is not male or female", other),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    pub fn weight_unit(self) -> &'static str {
        match self {
            Self::Metric => "kg",
            Self::Imperial => "lbs",
        }
    }

    pub fn height_unit(self) -> &'static str {
        match self {
            Self::Metric => "cm",
            Self::Imperial => "inches",
        }
    }
}

impl FromStr for UnitSystem {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "metric" => Ok(Self::Metric),
            "imperial" => Ok(Self::Imperial),
            other => Err(BookingError::validation(
                "unit",
                format!("'{}' is not metric or imperial", other),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    LightlyActive,
    ModeratelyActive,
    VeryActive,
    ExtremelyActive,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        Self::Sedentary,
        Self::LightlyActive,
        Self::ModeratelyActive,
        Self::VeryActive,
        Self::ExtremelyActive,
    ];

    pub fn multiplier(self) -> f64 {
        match self {
            Self::Sedentary => 1.2,
            Self::LightlyActive => 1.375,
            Self::ModeratelyActive => 1.55,
            Self::VeryActive => 1.725,
            Self::ExtremelyActive => 1.9,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Sedentary => "Sedentary",
            Self::LightlyActive => "Lightly Active",
            Self::ModeratelyActive => "Moderately Active",
            Self::VeryActive => "Very Active",
            Self::ExtremelyActive => "Extremely Active",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Sedentary => "Little or no exercise",
            Self::LightlyActive => "Light exercise 1-3 days/week",
            Self::ModeratelyActive => "Moderate exercise 3-5 days/week",
            Self::VeryActive => "Hard exercise 6-7 days/week",
            Self::ExtremelyActive => "Very hard exercise, physical job",
        }
    }

    /// Looks a level up by its multiplier ("1.55") or its name ("moderately_active").
    pub fn parse(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        if let Ok(multiplier) = trimmed.parse::<f64>() {
            return Self::ALL
                .into_iter()
                .find(|level| (level.multiplier() - multiplier).abs() < f64::EPSILON)
                .ok_or_else(|| {
                    BookingError::validation(
                        "activity level",
                        format!("{} is not a known activity multiplier", multiplier),
                    )
                });
        }
        let normalized = trimmed.to_ascii_lowercase().replace([' ', '-'], "_");
        Self::ALL
            .into_iter()
            .find(|level| level.label().to_ascii_lowercase().replace(' ', "_") == normalized)
            .ok_or_else(|| {
                BookingError::validation(
                    "activity level",
                    format!("'{}' is not a known activity level", trimmed),
                )
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeightGoal {
    #[serde(rename = "lose2")]
    LoseFast,
    #[serde(rename = "lose1")]
    Lose,
    #[serde(rename = "lose0.5")]
    LoseSlow,
    #[serde(rename = "maintain")]
    Maintain,
    #[serde(rename = "gain0.5")]
    GainSlow,
    #[serde(rename = "gain1")]
    Gain,
}

impl WeightGoal {
    pub const ALL: [WeightGoal; 6] = [
        Self::LoseFast,
        Self::Lose,
        Self::LoseSlow,
        Self::Maintain,
        Self::GainSlow,
        Self::Gain,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Self::LoseFast => "lose2",
            Self::Lose => "lose1",
            Self::LoseSlow => "lose0.5",
            Self::Maintain => "maintain",
            Self::GainSlow => "gain0.5",
            Self::Gain => "gain1",
        }
    }

    /// Daily calorie adjustment in kcal.
    pub fn modifier(self) -> f64 {
        match self {
            Self::LoseFast => -1000.0,
            Self::Lose => -500.0,
            Self::LoseSlow => -250.0,
            Self::Maintain => 0.0,
            Self::GainSlow => 250.0,
            Self::Gain => 500.0,
        }
    }

    pub fn label(self, units: UnitSystem) -> &'static str {
        match (self, units) {
            (Self::LoseFast, UnitSystem::Metric) => "Lose 1 kg/week",
            (Self::LoseFast, UnitSystem::Imperial) => "Lose 2 lbs/week",
            (Self::Lose, UnitSystem::Metric) => "Lose 0.5 kg/week",
            (Self::Lose, UnitSystem::Imperial) => "Lose 1 lb/week",
            (Self::LoseSlow, UnitSystem::Metric) => "Lose 0.25 kg/week",
            (Self::LoseSlow, UnitSystem::Imperial) => "Lose 0.5 lb/week",
            (Self::Maintain, _) => "Maintain Weight",
            (Self::GainSlow, UnitSystem::Metric) => "Gain 0.25 kg/week",
            (Self::GainSlow, UnitSystem::Imperial) => "Gain 0.5 lb/week",
            (Self::Gain, UnitSystem::Metric) => "Gain 0.5 kg/week",
            (Self::Gain, UnitSystem::Imperial) => "Gain 1 lb/week",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::LoseFast => "Aggressive fat loss",
            Self::Lose => "Moderate fat loss",
            Self::LoseSlow => "Slow fat loss",
            Self::Maintain => "Body recomposition",
            Self::GainSlow => "Lean muscle gain",
            Self::Gain => "Muscle building",
        }
    }
}

impl FromStr for WeightGoal {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|goal| goal.code() == trimmed)
            .ok_or_else(|| {
                BookingError::validation("goal", format!("'{}' is not a known goal", trimmed))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatorInput {
    pub age: u32,
    pub sex: Sex,
    pub weight: f64,
    pub height: f64,
    pub units: UnitSystem,
    pub activity: ActivityLevel,
    pub goal: WeightGoal,
}

impl CalculatorInput {
    pub fn weight_kg(&self) -> f64 {
        match self.units {
            UnitSystem::Metric => self.weight,
            UnitSystem::Imperial => self.weight * LB_TO_KG,
        }
    }

    pub fn height_cm(&self) -> f64 {
        match self.units {
            UnitSystem::Metric => self.height,
            UnitSystem::Imperial => self.height * IN_TO_CM,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalculatorResult {
    pub bmr: i64,
    pub tdee: i64,
    pub goal_calories: i64,
    pub protein_g: i64,
    pub carbs_g: i64,
    pub fats_g: i64,
}

impl CalculatorResult {
    pub fn protein_kcal(&self) -> i64 {
        self.protein_g * KCAL_PER_G_PROTEIN as i64
    }

    pub fn carbs_kcal(&self) -> i64 {
        self.carbs_g * KCAL_PER_G_CARB as i64
    }

    pub fn fats_kcal(&self) -> i64 {
        self.fats_g * KCAL_PER_G_FAT as i64
    }
}

/// Basal metabolic rate in kcal/day, unrounded.
pub fn basal_metabolic_rate(weight_kg: f64, height_cm: f64, age: u32, sex: Sex) -> f64 {
    10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age) + sex.bmr_offset()
}

pub fn total_daily_expenditure(bmr: f64, multiplier: f64) -> f64 {
    bmr * multiplier
}

fn round_kcal(value: f64) -> i64 {
    value.round() as i64
}

/// Runs the full calculation. Every call starts from scratch; nothing is cached.
pub fn calculate(input: &CalculatorInput) -> Result<CalculatorResult> {
    if input.age == 0 {
        return Err(BookingError::validation("age", "must be greater than zero"));
    }
    if !(input.weight.is_finite() && input.weight > 0.0) {
        return Err(BookingError::validation("weight", "must be greater than zero"));
    }
    if !(input.height.is_finite() && input.height > 0.0) {
        return Err(BookingError::validation("height", "must be greater than zero"));
    }

    let bmr = basal_metabolic_rate(input.weight_kg(), input.height_cm(), input.age, input.sex);
    let tdee = total_daily_expenditure(bmr, input.activity.multiplier());
    let goal_calories = tdee + input.goal.modifier();

    tracing::debug!(bmr, tdee, goal_calories, "calculated energy expenditure");

    Ok(CalculatorResult {
        bmr: round_kcal(bmr),
        tdee: round_kcal(tdee),
        goal_calories: round_kcal(goal_calories),
        protein_g: round_kcal(goal_calories * PROTEIN_SHARE / KCAL_PER_G_PROTEIN),
        carbs_g: round_kcal(goal_calories * CARB_SHARE / KCAL_PER_G_CARB),
        fats_g: round_kcal(goal_calories * FAT_SHARE / KCAL_PER_G_FAT),
    })
}

/// Raw form fields as typed into the calculator page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalculatorForm {
    pub age: String,
    pub gender: String,
    pub weight: String,
    pub height: String,
    pub activity_level: String,
    pub goal: String,
    pub unit: UnitSystem,
}

impl CalculatorForm {
    /// The "Calculate" control is enabled only when every field is filled.
    pub fn is_complete(&self) -> bool {
        [
            &self.age,
            &self.gender,
            &self.weight,
            &self.height,
            &self.activity_level,
            &self.goal,
        ]
        .iter()
        .all(|field| !is_blank(field))
    }

    pub fn parse(&self) -> Result<CalculatorInput> {
        if !self.is_complete() {
            return Err(BookingError::validation(
                "calculator",
                "all fields are required",
            ));
        }
        let age = parse_age(&self.age)?;
        let weight = parse_measure("weight", &self.weight)?;
        let height = parse_measure("height", &self.height)?;

        Ok(CalculatorInput {
            age,
            sex: self.gender.parse()?,
            weight,
            height,
            units: self.unit,
            activity: ActivityLevel::parse(&self.activity_level)?,
            goal: self.goal.parse()?,
        })
    }

    pub fn calculate(&self) -> Result<CalculatorResult> {
        calculate(&self.parse()?)
    }
}

/// Leading digits only, so "25.5" reads as 25.
fn parse_age(value: &str) -> Result<u32> {
    let trimmed = value.trim();
    let digits: String = trimmed.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits
        .parse::<u32>()
        .map_err(|_| BookingError::validation("age", format!("'{}' is not a number", trimmed)))
}

fn parse_measure(field: &str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| BookingError::validation(field, format!("'{}' is not a number", value)))
}
