//! Embedding cost estimation.

/// Per-model USD price per million tokens.
///
/// Injected where needed instead of living in a global so tests and future
/// price changes stay local.
#[derive(Debug, Clone)]
pub struct PriceTable {
    per_million: Vec<(&'static str, f64)>,
}

impl Default for PriceTable {
    fn default() -> Self {
        Self {
            per_million: vec![
                ("text-embedding-3-small", 0.02),
                ("text-embedding-3-large", 0.13),
                ("text-embedding-ada-002", 0.1),
            ],
        }
    }
}

impl PriceTable {
    /// Price in USD for embedding `tokens` tokens with `model`, rounded to
    /// two decimals. An unknown model prices at 0.0 rather than erroring.
    pub fn usd_for_tokens(&self, model: &str, tokens: u64) -> f64 {
        for (name, unit) in &self.per_million {
            if *name == model {
                let raw = unit * (tokens as f64 / 1_000_000.0);
                return (raw * 100.0).round() / 100.0;
            }
        }
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_model_per_million() {
        let table = PriceTable::default();
        assert_eq!(table.usd_for_tokens("text-embedding-3-small", 1_000_000), 0.02);
    }

    #[test]
    fn test_unknown_model_is_free() {
        let table = PriceTable::default();
        assert_eq!(table.usd_for_tokens("unknown-model", 500_000), 0.0);
    }

    #[test]
    fn test_rounding_to_two_decimals() {
        let table = PriceTable::default();
        assert_eq!(table.usd_for_tokens("text-embedding-3-small", 500_000), 0.01);
        assert_eq!(table.usd_for_tokens("text-embedding-3-large", 1_000_000), 0.13);
        assert_eq!(table.usd_for_tokens("text-embedding-ada-002", 10_000_000), 1.0);
        // too few tokens to reach a cent
        assert_eq!(table.usd_for_tokens("text-embedding-3-small", 1_000), 0.0);
    }
}
