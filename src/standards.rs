//! Reference intake targets for people restricting carbohydrates.
//!
//! Hand-authored from the clinic handout "Start with what you can: health
//! promotion support". Nothing here is computed.

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/standards", get(get_nutrition_standards))
}

/// GET /api/standards
pub async fn get_nutrition_standards() -> Json<Value> {
    Json(nutrition_standards())
}

pub fn nutrition_standards() -> Value {
    json!({
        "source": "Clinic handout \"Start with what you can: health promotion support\"",
        "daily_targets": {
            "calories": {"min": 1400, "max": 2000, "unit": "kcal", "note": "adjust for activity level"},
            "carbs": {"min": 130, "max": 165, "unit": "g", "note": "staple food: one fist per meal, three meals"},
            "protein": {"min": 50, "max": 75, "unit": "g", "note": "one palm per meal, three meals"},
            "fat": {"min": 40, "max": 65, "unit": "g"},
            "fiber": {"min": 18, "max": 25, "unit": "g"},
            "vegetables": {"min": 350, "max": 400, "unit": "g", "note": "1/3 green-yellow, 2/3 light-colored vegetables"},
            "salt": {"min": 0, "max": 6, "unit": "g"},
            "fruit": {"note": "one fist per day, eaten during the daytime"},
            "snacks": {"max": 100, "unit": "kcal", "note": "before 3 pm"}
        },
        "meal_targets": {
            "description": "Per-meal guide (physician recommended)",
            "carbs": {
                "min": 40, "max": 55, "unit": "g",
                "note": "staple about the size of a fist (about 150 g of rice)",
                "visual_guide": "a fist"
            },
            "protein": {
                "min": 15, "max": 25, "unit": "g",
                "note": "about one palm (soy products may be doubled)",
                "visual_guide": "one palm, without fingers"
            },
            "fat": {"min": 10, "max": 20, "unit": "g"},
            "fiber": {"min": 6, "max": 8, "unit": "g"},
            "vegetables": {
                "min": 120, "max": 150, "unit": "g",
                "note": "eat more if your readings run high"
            },
            "salt": {"min": 0, "max": 2, "unit": "g"}
        },
        "eating_order": {
            "title": "Eating order that prevents blood glucose spikes (vegetables first)",
            "steps": [
                {
                    "order": 1,
                    "category": "Side dishes (fiber)",
                    "examples": "vegetables, salad, seaweed, mushrooms",
                    "effect": "fiber slows sugar absorption and triggers fullness"
                },
                {
                    "order": 2,
                    "category": "Main dish (protein)",
                    "examples": "meat, fish, eggs, soy products",
                    "effect": "softens the rise in blood glucose"
                },
                {
                    "order": 3,
                    "category": "Staple (carbohydrate)",
                    "examples": "rice, bread, noodles",
                    "effect": "eating it last curbs a sharp glucose spike"
                }
            ]
        },
        "advice": {
            "carbs_tips": [
                "Choose less refined staples (e.g. multigrain rice) to keep post-meal glucose lower",
                "Eat less staple food late in the day, when it is more easily stored as fat",
                "Cut the staple when side or main dishes are carb-heavy (potatoes and similar)",
                "Cut the staple when the meal is high in fat, such as fried food"
            ],
            "protein_tips": [
                "Eat a moderate amount at each of three meals rather than all at once",
                "Choose leaner cuts (pork loin rather than pork belly)",
                "Mix in fish and soy products to lower clotting risk",
                "Trimming fat and skin cuts calories"
            ],
            "timing_tips": [
                "Eat three regular meals a day; skipping meals causes glucose spikes",
                "If dinner runs late, split it: carbohydrate in the early evening, side dishes only later",
                "Right before bed, cut carbohydrate and pick easily digested, low-fat food",
                "Eat fruit during the day, not in the evening when metabolism slows"
            ],
            "general_tips": [
                "Chew well and eat slowly",
                "Light exercise for about 10 minutes after eating (a walk, squats) blunts the glucose rise",
                "Aim for about 2 liters of water a day",
                "Keep sweets within 100 kcal a day and before 3 pm",
                "Choose sugar-free, zero-calorie drinks"
            ],
            "calorie_cut_tips": [
                "Trim the fat from pork loin: -61 kcal",
                "Remove the skin from chicken thigh: -77 kcal",
                "Watch out for minced-meat dishes, which carry hidden fat",
                "Cooking method matters: chicken cutlet (428 kcal) > fried chicken (357 kcal) > yakitori (234 kcal) > steamed chicken (154 kcal)"
            ]
        },
        "rice_reference": {
            "title": "How much rice (in convenience-store rice balls)",
            "items": [
                {"name": "One convenience-store rice ball", "rice_g": 100, "carbs_g": 37},
                {"name": "Curry rice (regular)", "rice_g": 300, "carbs_g": 111, "onigiri": "3 rice balls"},
                {"name": "Curry rice (large)", "rice_g": 400, "carbs_g": 148, "onigiri": "4 rice balls"},
                {"name": "Rice bowl (regular)", "rice_g": 260, "carbs_g": 96, "onigiri": "2.6 rice balls"},
                {"name": "Rice bowl (large)", "rice_g": 320, "carbs_g": 118, "onigiri": "3.2 rice balls"},
                {"name": "Recommended (one fist)", "rice_g": 150, "carbs_g": 55, "onigiri": "1.5 rice balls"}
            ]
        },
        "protein_reference": {
            "title": "Store-bought protein foods (per 100 g)",
            "items": [
                {"name": "Canned tuna (in water)", "calories": 71, "protein_g": 16.0, "salt_g": 0.5},
                {"name": "Salad chicken", "calories": 107, "protein_g": 24.3, "salt_g": 1.1},
                {"name": "Canned salmon (in water)", "calories": 170, "protein_g": 21.2, "salt_g": 0.6},
                {"name": "Canned mackerel (in water)", "calories": 190, "protein_g": 20.9, "salt_g": 0.9},
                {"name": "Grilled fish (atka mackerel)", "calories": 200, "protein_g": 23.1, "salt_g": 2.0}
            ]
        },
        "fiber_reference": {
            "title": "High-fiber foods (per serving)",
            "items": [
                {"name": "Okara (soy pulp)", "amount_g": 50, "fiber_g": 5.8},
                {"name": "Hijiki seaweed", "amount_g": 70, "fiber_g": 2.8},
                {"name": "Broccoli", "amount_g": 60, "fiber_g": 2.6},
                {"name": "Spinach", "amount_g": 70, "fiber_g": 2.0}
            ]
        }
    })
}
