//! Turns the model's free-form answer into a [`NutritionRecord`].
//!
//! The model is asked for bare JSON but often wraps it in prose or code
//! fences, so the object is located by taking everything from the first `{`
//! to the last `}`. Missing fields get type defaults; anything that cannot be
//! coerced aborts the parse and [`parse`] returns [`NutritionRecord::fallback`].

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::dto::{BoundingBox, DetectedFood, FoodCategory, NutritionRecord};

type Object = Map<String, Value>;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("no JSON object in response")]
    NoJsonObject,
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("top-level JSON value is not an object")]
    NotAnObject,
    #[error("field `{field}` has an unusable value")]
    Coercion { field: String },
}

/// Never fails: any problem yields the fallback record.
pub fn parse(text: &str) -> NutritionRecord {
    match try_parse(text) {
        Ok(record) => record,
        Err(e) => {
            warn!(error = %e, "could not use model response; returning fallback record");
            NutritionRecord::fallback()
        }
    }
}

pub fn try_parse(text: &str) -> Result<NutritionRecord, ParseError> {
    let candidate = json_candidate(text).ok_or(ParseError::NoJsonObject)?;
    let value: Value = serde_json::from_str(candidate)?;
    let Value::Object(obj) = value else {
        return Err(ParseError::NotAnObject);
    };

    let detected_foods: Vec<DetectedFood> = match obj.get("detected_foods") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(entries)) => entries
            .iter()
            .enumerate()
            .map(|(i, entry)| detected_food(i, entry))
            .collect::<Result<Vec<_>, _>>()?,
        Some(_) => return Err(coercion("detected_foods")),
    };

    let record = NutritionRecord {
        food_items: string_list(&obj, "food_items")?,
        detected_foods,
        calories: number(&obj, "calories", "calories")?,
        carbs: number(&obj, "carbs", "carbs")?,
        protein: number(&obj, "protein", "protein")?,
        fat: number(&obj, "fat", "fat")?,
        fiber: number(&obj, "fiber", "fiber")?,
        salt: number(&obj, "salt", "salt")?,
        advice: string(&obj, "advice", "advice")?,
        eating_order: string_list(&obj, "eating_order")?,
    };
    debug!(
        foods = record.food_items.len(),
        detected = record.detected_foods.len(),
        "model response parsed"
    );
    Ok(record)
}

/// Leftmost `{` through rightmost `}`, inclusive.
fn json_candidate(text: &str) -> Option<&str> {
    lazy_static! {
        static ref JSON_OBJECT_RE: Regex = Regex::new(r"\{[\s\S]*\}").unwrap();
    }
    JSON_OBJECT_RE.find(text).map(|m| m.as_str())
}

fn detected_food(index: usize, entry: &Value) -> Result<DetectedFood, ParseError> {
    let Value::Object(obj) = entry else {
        return Err(coercion(format!("detected_foods[{index}]")));
    };
    let path = |field: &str| format!("detected_foods[{index}].{field}");

    let category = match obj.get("category") {
        Some(Value::String(label)) => FoodCategory::from_label(label),
        _ => FoodCategory::Other,
    };

    let bounding_box = match obj.get("bounding_box") {
        None | Some(Value::Null) => None,
        Some(Value::Object(b)) if b.is_empty() => None,
        Some(Value::Object(b)) => {
            let bpath = |field: &str| path(&format!("bounding_box.{field}"));
            Some(BoundingBox {
                x: number(b, "x", bpath("x"))?,
                y: number(b, "y", bpath("y"))?,
                width: number(b, "width", bpath("width"))?,
                height: number(b, "height", bpath("height"))?,
            })
        }
        Some(_) => return Err(coercion(path("bounding_box"))),
    };

    Ok(DetectedFood {
        name: string(obj, "name", path("name"))?,
        category,
        carbs: number(obj, "carbs", path("carbs"))?,
        bounding_box,
    })
}

fn coercion(field: impl Into<String>) -> ParseError {
    ParseError::Coercion {
        field: field.into(),
    }
}

/// Numbers, numeric strings and booleans coerce; `null` counts as absent.
fn number(obj: &Object, key: &str, path: impl Into<String>) -> Result<f64, ParseError> {
    let v = match obj.get(key) {
        None | Some(Value::Null) => return Ok(0.0),
        Some(v) => v,
    };
    let n = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };
    // NaN/inf would serialize as null
    n.filter(|f| f.is_finite()).ok_or_else(|| coercion(path))
}

fn string(obj: &Object, key: &str, path: impl Into<String>) -> Result<String, ParseError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(coercion(path)),
    }
}

fn string_list(obj: &Object, key: &str) -> Result<Vec<String>, ParseError> {
    let items = match obj.get(key) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(coercion(key)),
    };
    items
        .iter()
        .enumerate()
        .filter(|(_, v)| !v.is_null())
        .map(|(i, v)| match v {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            _ => Err(coercion(format!("{key}[{i}]"))),
        })
        .collect()
}

#[cfg(test)]
mod parser_tests {
    use super::*;
    use crate::analysis::dto::FALLBACK_ADVICE;

    const FULL: &str = r#"{
        "food_items": ["rice", "grilled mackerel", "miso soup", "salad"],
        "detected_foods": [
            {"name": "rice", "category": "carbs", "carbs": 55.2,
             "bounding_box": {"x": 0.1, "y": 0.5, "width": 0.3, "height": 0.35}},
            {"name": "grilled mackerel", "category": "protein", "carbs": 0.4,
             "bounding_box": {"x": 0.45, "y": 0.2, "width": 0.4, "height": 0.3}},
            {"name": "miso soup", "category": "soup", "carbs": 3.1}
        ],
        "calories": 640,
        "carbs": 62.5,
        "protein": 31.0,
        "fat": 18.2,
        "fiber": 4.5,
        "salt": 3.3,
        "advice": "Eat the salad first and halve the rice.",
        "eating_order": ["salad", "miso soup", "grilled mackerel", "rice"]
    }"#;

    fn assert_fallback(r: &NutritionRecord) {
        assert_eq!(r, &NutritionRecord::fallback());
        assert_eq!(r.advice, FALLBACK_ADVICE);
    }

    #[test]
    fn full_object_is_reproduced() {
        let r = parse(FULL);
        assert_eq!(r.food_items, vec!["rice", "grilled mackerel", "miso soup", "salad"]);
        assert_eq!(r.calories, 640.0);
        assert_eq!(r.carbs, 62.5);
        assert_eq!(r.protein, 31.0);
        assert_eq!(r.fat, 18.2);
        assert_eq!(r.fiber, 4.5);
        assert_eq!(r.salt, 3.3);
        assert_eq!(r.advice, "Eat the salad first and halve the rice.");
        assert_eq!(r.eating_order, vec!["salad", "miso soup", "grilled mackerel", "rice"]);

        assert_eq!(r.detected_foods.len(), 3);
        let rice = &r.detected_foods[0];
        assert_eq!(rice.name, "rice");
        assert_eq!(rice.category, FoodCategory::Carbs);
        assert_eq!(rice.carbs, 55.2);
        assert_eq!(
            rice.bounding_box,
            Some(BoundingBox { x: 0.1, y: 0.5, width: 0.3, height: 0.35 })
        );
        assert_eq!(r.detected_foods[1].category, FoodCategory::Protein);
        assert_eq!(r.detected_foods[2].category, FoodCategory::Soup);
    }

    #[test]
    fn prose_and_code_fences_around_object_are_ignored() {
        let text = format!("Here is the analysis:\n```json\n{FULL}\n```\nEnjoy your meal!");
        assert_eq!(parse(&text), parse(FULL));
    }

    #[test]
    fn text_without_braces_gives_fallback() {
        assert_fallback(&parse("Sorry, I cannot see any food in this picture."));
        assert_fallback(&parse(""));
        assert_fallback(&parse("} backwards {"));
        assert!(matches!(try_parse("no json"), Err(ParseError::NoJsonObject)));
    }

    #[test]
    fn invalid_json_gives_fallback_but_is_distinguishable() {
        let text = r#"{"calories": 500, "carbs": }"#;
        assert_fallback(&parse(text));
        assert!(matches!(try_parse(text), Err(ParseError::InvalidJson(_))));
    }

    #[test]
    fn greedy_span_across_two_objects_is_invalid() {
        let text = r#"first {"calories": 1} then {"calories": 2}"#;
        assert!(matches!(try_parse(text), Err(ParseError::InvalidJson(_))));
    }

    #[test]
    fn missing_carbs_defaults_to_zero_others_kept() {
        let r = parse(r#"{"calories": 420, "protein": 20, "advice": "ok", "food_items": ["toast"]}"#);
        assert_eq!(r.carbs, 0.0);
        assert_eq!(r.calories, 420.0);
        assert_eq!(r.protein, 20.0);
        assert_eq!(r.advice, "ok");
        assert_eq!(r.food_items, vec!["toast"]);
        assert!(r.detected_foods.is_empty());
        assert!(r.eating_order.is_empty());
    }

    #[test]
    fn empty_object_gives_all_defaults_with_empty_advice() {
        let r = parse("{}");
        assert_eq!(r, NutritionRecord::default());
        assert_eq!(r.advice, "");
    }

    #[test]
    fn absent_or_empty_bounding_box_is_none() {
        let r = parse(
            r#"{"detected_foods": [
                {"name": "a", "category": "vegetable", "carbs": 1},
                {"name": "b", "bounding_box": null},
                {"name": "c", "bounding_box": {}}
            ]}"#,
        );
        assert!(r.detected_foods.iter().all(|f| f.bounding_box.is_none()));
    }

    #[test]
    fn partial_bounding_box_fields_default_to_zero() {
        let r = parse(r#"{"detected_foods": [{"name": "a", "bounding_box": {"x": 0.5}}]}"#);
        assert_eq!(
            r.detected_foods[0].bounding_box,
            Some(BoundingBox { x: 0.5, y: 0.0, width: 0.0, height: 0.0 })
        );
    }

    #[test]
    fn out_of_range_box_passes_through() {
        let r = parse(
            r#"{"detected_foods": [{"name": "a", "bounding_box": {"x": -0.2, "y": 1.4, "width": 2, "height": 0.5}}]}"#,
        );
        let b = r.detected_foods[0].bounding_box.unwrap();
        assert_eq!((b.x, b.y, b.width, b.height), (-0.2, 1.4, 2.0, 0.5));
    }

    #[test]
    fn detected_food_defaults() {
        let r = parse(r#"{"detected_foods": [{}]}"#);
        let f = &r.detected_foods[0];
        assert_eq!(f.name, "");
        assert_eq!(f.category, FoodCategory::Other);
        assert_eq!(f.carbs, 0.0);
        assert!(f.bounding_box.is_none());
    }

    #[test]
    fn unknown_category_becomes_other() {
        let r = parse(r#"{"detected_foods": [{"name": "cake", "category": "dessert"}, {"name": "egg", "category": "Protein"}]}"#);
        assert_eq!(r.detected_foods[0].category, FoodCategory::Other);
        assert_eq!(r.detected_foods[1].category, FoodCategory::Protein);
    }

    #[test]
    fn numeric_strings_and_nulls_coerce() {
        let r = parse(r#"{"calories": "512.5", "carbs": " 40 ", "fat": null, "salt": true}"#);
        assert_eq!(r.calories, 512.5);
        assert_eq!(r.carbs, 40.0);
        assert_eq!(r.fat, 0.0);
        assert_eq!(r.salt, 1.0);
    }

    #[test]
    fn unconvertible_number_gives_fallback() {
        let text = r#"{"calories": "about 500", "carbs": 40}"#;
        assert_fallback(&parse(text));
        match try_parse(text) {
            Err(ParseError::Coercion { field }) => assert_eq!(field, "calories"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn nested_coercion_failure_names_the_path() {
        let text = r#"{"detected_foods": [{"name": "a"}, {"name": "b", "bounding_box": {"x": "left"}}]}"#;
        match try_parse(text) {
            Err(ParseError::Coercion { field }) => {
                assert_eq!(field, "detected_foods[1].bounding_box.x")
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert_fallback(&parse(text));
    }

    #[test]
    fn non_finite_numbers_are_rejected() {
        assert!(matches!(
            try_parse(r#"{"fat": "NaN"}"#),
            Err(ParseError::Coercion { .. })
        ));
    }

    #[test]
    fn wrong_shapes_are_coercion_failures() {
        assert!(matches!(try_parse(r#"{"food_items": "rice"}"#), Err(ParseError::Coercion { .. })));
        assert!(matches!(try_parse(r#"{"advice": 3}"#), Err(ParseError::Coercion { .. })));
        assert!(matches!(try_parse(r#"{"detected_foods": ["rice"]}"#), Err(ParseError::Coercion { .. })));
        assert!(matches!(
            try_parse(r#"{"detected_foods": [{"bounding_box": [0, 0, 1, 1]}]}"#),
            Err(ParseError::Coercion { .. })
        ));
    }

    #[test]
    fn scalar_list_items_are_stringified_and_nulls_dropped() {
        let r = parse(r#"{"food_items": ["rice", 2, null, true]}"#);
        assert_eq!(r.food_items, vec!["rice", "2", "true"]);
    }

    #[test]
    fn no_meal_visible_response() {
        let r = parse(
            r#"{"food_items": [], "detected_foods": [], "calories": 0, "carbs": 0, "protein": 0,
                "fat": 0, "fiber": 0, "salt": 0,
                "advice": "Please upload a photo of a meal.", "eating_order": []}"#,
        );
        assert!(r.food_items.is_empty());
        assert_eq!(r.advice, "Please upload a photo of a meal.");
    }

    #[test]
    fn parse_is_idempotent() {
        for text in [FULL, "nothing here", r#"{"carbs": "x"}"#, "{}"] {
            assert_eq!(parse(text), parse(text));
        }
    }
}
