//! Wire types for `POST /api/nutrition`, as seen from the chat client.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const NOT_FOUND_TEXT: &str = "Food not found";

/// Request body. `weight_g` is absent when no weight was typed and `null`
/// when the typed weight has no leading integer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutritionQuery {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_g: Option<Option<i64>>,
}

impl NutritionQuery {
    /// Both inputs are expected trimmed.
    pub fn new(query: &str, weight_text: &str) -> Self {
        let weight_g = if weight_text.is_empty() {
            None
        } else {
            Some(leading_int(weight_text))
        };
        Self {
            query: query.to_string(),
            weight_g,
        }
    }
}

/// Leading integer of `s`: optional sign, then the run of ASCII digits up
/// to the first other character. `"12.5"` is 12, `"g12"` has none.
pub fn leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (sign, rest) = match s.as_bytes().first() {
        Some(b'-') => (-1, &s[1..]),
        Some(b'+') => (1, &s[1..]),
        _ => (1, s),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    rest[..end].parse::<i64>().ok().map(|n| sign * n)
}

/// A reply value shown as the server sent it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    Number(f64),
    Text(String),
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // shortest round-trip form: 248.0 prints as 248, 46.5 as 46.5
            Quantity::Number(n) => write!(f, "{}", n),
            Quantity::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NutritionFacts {
    pub matched_name: String,
    pub weight_g: Quantity,
    pub calories: Quantity,
    pub protein: Quantity,
    pub carbs: Quantity,
    pub fat: Quantity,
}

/// Decoded reply, discriminated by the `ok` flag. A missing or null `ok`
/// counts as a failure.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawReply")]
pub enum NutritionReply {
    Success(NutritionFacts),
    Failure { message: Option<String> },
}

#[derive(Deserialize)]
struct RawReply {
    ok: Option<bool>,
    matched_name: Option<String>,
    weight_g: Option<Quantity>,
    calories: Option<Quantity>,
    protein: Option<Quantity>,
    carbs: Option<Quantity>,
    fat: Option<Quantity>,
    message: Option<String>,
}

fn required<T>(v: Option<T>, field: &str) -> Result<T, String> {
    v.ok_or_else(|| format!("successful reply without `{}`", field))
}

impl TryFrom<RawReply> for NutritionReply {
    type Error = String;

    fn try_from(raw: RawReply) -> Result<Self, Self::Error> {
        if raw.ok != Some(true) {
            return Ok(NutritionReply::Failure {
                message: raw.message,
            });
        }
        Ok(NutritionReply::Success(NutritionFacts {
            matched_name: required(raw.matched_name, "matched_name")?,
            weight_g: required(raw.weight_g, "weight_g")?,
            calories: required(raw.calories, "calories")?,
            protein: required(raw.protein, "protein")?,
            carbs: required(raw.carbs, "carbs")?,
            fat: required(raw.fat, "fat")?,
        }))
    }
}

impl NutritionReply {
    /// Chat text for this reply.
    pub fn render(&self) -> String {
        match self {
            NutritionReply::Success(f) => format!(
                "{} ({}g)\nCalories:{} Protein:{} Carbs:{} Fat:{}",
                f.matched_name, f.weight_g, f.calories, f.protein, f.carbs, f.fat
            ),
            NutritionReply::Failure { message } => match message.as_deref() {
                Some(m) if !m.is_empty() => m.to_string(),
                _ => NOT_FOUND_TEXT.to_string(),
            },
        }
    }
}
