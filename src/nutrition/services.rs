use lazy_static::lazy_static;
use regex::Regex;
use sqlx::SqlitePool;
use tracing::debug;

use super::matching::FoodIndex;
use crate::catalog::repo::{self, FoodRow};

pub const DEFAULT_WEIGHT_G: i64 = 100;

const MATCH_CUTOFF: f64 = 0.5;
const SUGGEST_CUTOFF: f64 = 0.4;
const SUGGEST_LIMIT: usize = 5;

/// Pulls the first `<digits>[ ]g|gram|grams` out of free text. Returns the
/// remaining text, trimmed, and the weight (100 g if absent or zero, never
/// below 1).
pub fn parse_query(text: &str) -> (String, i64) {
    lazy_static! {
        static ref WEIGHT_RE: Regex = Regex::new(r"(?i)(\d{1,5})\s*(grams|gram|g)?").unwrap();
    }
    let mut rest = text.to_string();
    let mut weight = None;
    if let Some(caps) = WEIGHT_RE.captures(text) {
        if let (Some(all), Some(digits)) = (caps.get(0), caps.get(1)) {
            if let Ok(w) = digits.as_str().parse::<i64>() {
                weight = Some(w);
                rest = format!("{}{}", &text[..all.start()], &text[all.end()..]);
            }
        }
    }
    let weight = match weight {
        Some(w) if w != 0 => w,
        _ => DEFAULT_WEIGHT_G,
    };
    (rest.trim().to_string(), weight.max(1))
}

#[derive(Debug, Clone)]
pub struct FoodMatch {
    pub food: FoodRow,
    pub name: String,
    pub confidence: f64,
}

/// Exact (case-insensitive) name first, then the best fuzzy match.
pub async fn find_food(
    db: &SqlitePool,
    index: &FoodIndex,
    query: &str,
) -> anyhow::Result<Option<FoodMatch>> {
    let q = query.trim();
    if q.is_empty() {
        return Ok(None);
    }
    if let Some(food) = repo::find_by_name_ci(db, q).await? {
        let name = food.food_name.clone();
        return Ok(Some(FoodMatch {
            food,
            name,
            confidence: 1.0,
        }));
    }
    let Some(best) = index.close_matches(q, 3, MATCH_CUTOFF).into_iter().next() else {
        return Ok(None);
    };
    let Some(food) = repo::find_by_name(db, &best).await? else {
        return Ok(None);
    };
    let confidence = if best.to_lowercase().contains(&q.to_lowercase()) {
        0.85
    } else {
        0.7
    };
    debug!(query = q, matched = %best, confidence, "fuzzy food match");
    Ok(Some(FoodMatch {
        food,
        name: best,
        confidence,
    }))
}

pub fn suggestions(index: &FoodIndex, query: &str) -> Vec<String> {
    index.close_matches(query, SUGGEST_LIMIT, SUGGEST_CUTOFF)
}

pub fn not_found_message(suggestions: &[String]) -> String {
    let mut msg = String::from("Food not found.");
    if !suggestions.is_empty() {
        msg.push_str(" Did you mean: ");
        msg.push_str(&suggestions.join(", "));
    }
    msg
}

/// Two decimals, exact halves to even (`0.125` becomes `0.12`).
fn round2(v: f64) -> f64 {
    (v * 100.0).round_ties_even() / 100.0
}

/// Integral values keep one decimal (`178.0`, `0.0`).
fn decimal(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 {
        format!("{:.1}", v)
    } else {
        v.to_string()
    }
}

/// Macros scaled from the per-100 g catalog values to `weight_g`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Portion {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl Portion {
    pub fn scale(food: &FoodRow, weight_g: i64) -> Self {
        let factor = weight_g as f64 / 100.0;
        let at = |v: Option<f64>| round2(v.unwrap_or(0.0) * factor);
        Self {
            calories: at(food.calories),
            protein: at(food.protein),
            carbs: at(food.carbs),
            fat: at(food.fat),
        }
    }

    pub fn describe(&self, name: &str, weight_g: i64) -> String {
        format!(
            "{} ({}g) Calories:{} Protein:{} Carbs:{} Fat:{}",
            name,
            weight_g,
            decimal(self.calories),
            decimal(self.protein),
            decimal(self.carbs),
            decimal(self.fat)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_is_extracted_from_text() {
        assert_eq!(parse_query("chicken 150g"), ("chicken".to_string(), 150));
        assert_eq!(parse_query("chicken 150 grams"), ("chicken".to_string(), 150));
        assert_eq!(parse_query("200G salmon"), ("salmon".to_string(), 200));
    }

    #[test]
    fn missing_or_zero_weight_defaults() {
        assert_eq!(parse_query("banana"), ("banana".to_string(), 100));
        assert_eq!(parse_query("banana 0g"), ("banana".to_string(), 100));
        assert_eq!(parse_query("   "), (String::new(), 100));
    }

    #[test]
    fn only_first_number_counts() {
        // at most five digits are taken
        assert_eq!(parse_query("rice 1234567"), ("rice 67".to_string(), 12345));
        assert_eq!(parse_query("2 eggs 50g"), ("eggs 50g".to_string(), 2));
    }

    #[test]
    fn not_found_lists_suggestions() {
        assert_eq!(not_found_message(&[]), "Food not found.");
        assert_eq!(
            not_found_message(&["apple".into(), "apple pie".into()]),
            "Food not found. Did you mean: apple, apple pie"
        );
    }

    fn row(calories: f64) -> FoodRow {
        FoodRow {
            id: 1,
            food_name: "chicken breast".into(),
            calories: Some(calories),
            protein: Some(31.0),
            carbs: Some(0.0),
            fat: None,
        }
    }

    #[test]
    fn portion_scales_and_rounds() {
        let p = Portion::scale(&row(165.0), 150);
        assert_eq!(p.calories, 247.5);
        assert_eq!(p.protein, 46.5);
        assert_eq!(p.carbs, 0.0);
        assert_eq!(p.fat, 0.0);

        let p = Portion::scale(&row(33.333), 100);
        assert_eq!(p.calories, 33.33);
    }

    #[test]
    fn exact_halves_round_to_even() {
        let food = FoodRow {
            protein: Some(0.5),
            carbs: Some(1.5),
            ..row(1.0)
        };
        let p = Portion::scale(&food, 25);
        assert_eq!(p.protein, 0.12);
        assert_eq!(p.carbs, 0.38);
        assert_eq!(p.calories, 0.25);
    }

    #[test]
    fn portion_text() {
        let p = Portion::scale(&row(165.0), 150);
        assert_eq!(
            p.describe("chicken breast", 150),
            "chicken breast (150g) Calories:247.5 Protein:46.5 Carbs:0.0 Fat:0.0"
        );
        let p = Portion::scale(&row(89.0), 200);
        assert!(p.describe("banana", 200).starts_with("banana (200g) Calories:178.0 "));
    }

    #[tokio::test]
    async fn exact_then_fuzzy_lookup() {
        use crate::catalog::{repo::insert_many, FoodRecord};

        let db = crate::db::memory().await;
        let foods = ["chicken breast", "grilled chicken breast", "salmon"].map(|n| FoodRecord {
            name: n.into(),
            calories: 100.0,
            protein: 10.0,
            carbs: 1.0,
            fat: 1.0,
        });
        insert_many(&db, &foods).await.unwrap();
        let index = FoodIndex::new(repo::list_names(&db).await.unwrap());

        let m = find_food(&db, &index, "Chicken Breast").await.unwrap().unwrap();
        assert_eq!(m.name, "chicken breast");
        assert_eq!(m.confidence, 1.0);

        let m = find_food(&db, &index, "salmn").await.unwrap().unwrap();
        assert_eq!(m.name, "salmon");
        assert_eq!(m.confidence, 0.7);

        let m = find_food(&db, &index, "grilled chicken").await.unwrap().unwrap();
        assert_eq!(m.name, "grilled chicken breast");
        assert_eq!(m.confidence, 0.85);

        assert!(find_food(&db, &index, "zzzz").await.unwrap().is_none());
        assert!(find_food(&db, &index, "  ").await.unwrap().is_none());
    }
}
