use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Default, Deserialize)]
pub struct NutritionRequest {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub weight_g: Option<Value>,
}

impl NutritionRequest {
    /// Malformed or missing bodies count as an empty request.
    pub fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }

    /// Explicit weight override. `null`, `0`, `""` and non-numeric values
    /// do not override; numeric strings do.
    pub fn explicit_weight(&self) -> Option<i64> {
        match self.weight_g.as_ref()? {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
                .filter(|w| *w != 0),
            Value::String(s) if !s.is_empty() => s.trim().parse::<i64>().ok(),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NutritionResponse {
    pub ok: bool,
    pub matched_name: String,
    pub confidence: f64,
    pub weight_g: i64,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub text: String,
}
