use serde::{Deserialize, Serialize};

use super::repo::MessageRow;

pub const DEFAULT_HISTORY_LIMIT: i64 = 30;
const MAX_HISTORY_LIMIT: i64 = 500;

#[derive(Debug, Default, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<String>,
}

impl HistoryParams {
    /// Unparseable limits fall back to the default; the result is kept in
    /// `1..=500`.
    pub fn limit(&self) -> i64 {
        self.limit
            .as_deref()
            .and_then(|v| v.trim().parse::<i64>().ok())
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
            .clamp(1, MAX_HISTORY_LIMIT)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub ok: bool,
    pub messages: Vec<MessageRow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(v: Option<&str>) -> HistoryParams {
        HistoryParams {
            limit: v.map(String::from),
        }
    }

    #[test]
    fn limit_defaults_and_clamps() {
        assert_eq!(params(None).limit(), 30);
        assert_eq!(params(Some("abc")).limit(), 30);
        assert_eq!(params(Some("5")).limit(), 5);
        assert_eq!(params(Some("0")).limit(), 1);
        assert_eq!(params(Some("-3")).limit(), 1);
        assert_eq!(params(Some("100000")).limit(), 500);
    }
}
