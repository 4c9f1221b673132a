use serde::{Deserialize, Serialize};

/// Advice returned when no usable JSON could be recovered from the model output.
pub const FALLBACK_ADVICE: &str = "Image analysis failed. Please try another image.";

/// Dish role on the plate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoodCategory {
    Carbs,     // staple: rice, bread, noodles
    Protein,   // main dish: meat, fish, eggs, soy
    Vegetable, // side dish: salad, pickles
    Soup,
    #[default]
    Other,
}

impl FoodCategory {
    /// Unknown labels map to `Other`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "carbs" => Self::Carbs,
            "protein" => Self::Protein,
            "vegetable" => Self::Vegetable,
            "soup" => Self::Soup,
            _ => Self::Other,
        }
    }
}

/// Normalized rectangle, top-left origin. Values are not clamped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectedFood {
    pub name: String,
    pub category: FoodCategory,
    pub carbs: f64, // g
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionRecord {
    /// Flat list of recognised foods, kept for older clients.
    pub food_items: Vec<String>,
    #[serde(default)]
    pub detected_foods: Vec<DetectedFood>,
    pub calories: f64, // kcal
    pub carbs: f64,    // g, carbohydrate minus fiber
    pub protein: f64,
    pub fat: f64,
    pub fiber: f64,
    pub salt: f64,
    pub advice: String,
    pub eating_order: Vec<String>,
}

impl NutritionRecord {
    pub fn fallback() -> Self {
        Self {
            advice: FALLBACK_ADVICE.to_string(),
            ..Self::default()
        }
    }
}
