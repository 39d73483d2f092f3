use std::path::Path;

use anyhow::Context;
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::info;

use super::csv::write_record;
use super::FoodRecord;

pub const HEADER: [&str; 5] = ["Food", "Calories", "Protein", "Carbs", "Fat"];

/// Base foods, macros per 100 g: calories, protein, carbs, fat.
const BASE_FOODS: [(&str, [f64; 4]); 10] = [
    ("chicken breast", [165.0, 31.0, 0.0, 3.6]),
    ("beef steak", [250.0, 26.0, 0.0, 17.0]),
    ("salmon", [208.0, 20.4, 0.0, 13.4]),
    ("rice (cooked)", [130.0, 2.4, 28.0, 0.3]),
    ("pasta", [131.0, 5.0, 25.0, 1.1]),
    ("apple", [52.0, 0.3, 14.0, 0.2]),
    ("banana", [89.0, 1.1, 23.0, 0.3]),
    ("milk", [61.0, 3.2, 4.8, 3.3]),
    ("cheese", [403.0, 24.9, 1.3, 33.1]),
    ("avocado", [160.0, 2.0, 9.0, 15.0]),
];

const METHODS: [&str; 9] = [
    "raw", "boiled", "grilled", "fried", "baked", "steamed", "roasted", "pan-fried", "smoked",
];

const SUFFIXES: [&str; 6] = [
    "",
    " - restaurant style",
    " (home cooked)",
    " - small serving",
    " - large serving",
    "with sauce",
];

const VARIANTS_PER_FOOD: usize = 4;

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn pick<'a>(rng: &mut StdRng, items: &[&'a str]) -> &'a str {
    items[rng.gen_range(0..items.len())]
}

fn template(rng: &mut StdRng, name: &str, method: &str) -> String {
    match rng.gen_range(0..4) {
        0 => name.to_string(),
        1 => format!("{} {}", method, name),
        2 => format!("{} ({})", name, method),
        _ => format!("{} {} with herbs", method, name),
    }
}

/// Jitters each macro by its own multiplicative range, rounded to one
/// decimal; calories never drop below 0.1.
fn jitter(rng: &mut StdRng, m: [f64; 4], ranges: [(f64, f64); 4]) -> [f64; 4] {
    let mut out = [0.0; 4];
    for (i, (lo, hi)) in ranges.iter().enumerate() {
        out[i] = round1(m[i] * rng.gen_range(*lo..*hi));
    }
    out[0] = out[0].max(0.1);
    out
}

/// Deterministic synthetic catalog of `total` foods.
pub fn generate(total: usize) -> Vec<FoodRecord> {
    let mut rng = StdRng::seed_from_u64(42);

    let mut candidates: Vec<(String, [f64; 4])> = Vec::new();
    for (name, macros) in BASE_FOODS {
        candidates.push((name.to_string(), macros));
        for _ in 0..VARIANTS_PER_FOOD {
            let method = pick(&mut rng, &METHODS);
            let new_name = template(&mut rng, name, method);
            let m = jitter(
                &mut rng,
                macros,
                [(0.86, 1.22), (0.88, 1.06), (0.88, 1.1), (0.8, 1.4)],
            );
            candidates.push((new_name, m));
        }
    }

    (0..total)
        .map(|idx| {
            let (base_name, base_macros) = &candidates[idx % candidates.len()];
            let suffix = if idx % 5 == 0 { pick(&mut rng, &SUFFIXES) } else { "" };
            let m = jitter(
                &mut rng,
                *base_macros,
                [(0.9, 1.12), (0.9, 1.05), (0.9, 1.08), (0.85, 1.25)],
            );
            FoodRecord {
                name: format!("{}{}", base_name, suffix),
                calories: m[0],
                protein: m[1],
                carbs: m[2],
                fat: m[3],
            }
        })
        .collect()
}

/// Writes a generated catalog to `path` unless the file already exists.
/// Returns whether a file was written.
pub fn generate_csv(path: &Path, total: usize) -> anyhow::Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    let mut out = String::new();
    out.push_str(&write_record(&HEADER.map(String::from)));
    out.push('\n');
    for food in generate(total) {
        out.push_str(&write_record(&[
            food.name,
            food.calories.to_string(),
            food.protein.to_string(),
            food.carbs.to_string(),
            food.fat.to_string(),
        ]));
        out.push('\n');
    }
    std::fs::write(path, out).with_context(|| format!("write {}", path.display()))?;
    info!(path = %path.display(), rows = total, "generated food catalog");
    Ok(true)
}
