//! Supported-symbol registry and per-provider identifier mapping

use crate::common::types::{ProviderKind, SymbolInfo};

/// One tradable pair and how each provider names it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolEntry {
    /// Canonical symbol, also Binance's native identifier (e.g. BTCUSDT)
    pub symbol: String,
    /// Display label (e.g. BTC/USDT)
    pub label: String,
    /// Base asset as CryptoCompare names it (e.g. BTC)
    pub base: String,
    /// Quote currency requested from CryptoCompare (e.g. USD)
    pub quote: String,
}

impl SymbolEntry {
    pub fn new(symbol: &str, label: &str, base: &str, quote: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            label: label.to_string(),
            base: base.to_string(),
            quote: quote.to_string(),
        }
    }

    /// Identifier for this pair in the given provider's scheme
    pub fn native_id(&self, provider: ProviderKind) -> &str {
        match provider {
            ProviderKind::Binance => &self.symbol,
            ProviderKind::CryptoCompare => &self.base,
        }
    }
}

/// Static table of symbols the gateway will quote
#[derive(Debug, Clone)]
pub struct SymbolRegistry {
    entries: Vec<SymbolEntry>,
}

impl SymbolRegistry {
    pub fn new(entries: Vec<SymbolEntry>) -> Self {
        Self { entries }
    }

    pub fn get(&self, symbol: &str) -> Option<&SymbolEntry> {
        self.entries.iter().find(|e| e.symbol == symbol)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.get(symbol).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SymbolEntry> {
        self.entries.iter()
    }

    pub fn infos(&self) -> Vec<SymbolInfo> {
        self.entries
            .iter()
            .map(|e| SymbolInfo {
                symbol: e.symbol.clone(),
                label: e.label.clone(),
            })
            .collect()
    }
}

impl Default for SymbolRegistry {
    fn default() -> Self {
        Self::new(vec![
            SymbolEntry::new("BTCUSDT", "BTC/USDT", "BTC", "USD"),
            SymbolEntry::new("ETHUSDT", "ETH/USDT", "ETH", "USD"),
        ])
    }
}

/// Canonical form of a user-supplied symbol: trimmed and upper-cased
pub fn normalize_symbol(raw: &str) -> Option<String> {
    let symbol = raw.trim().to_ascii_uppercase();
    if symbol.is_empty() {
        None
    } else {
        Some(symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry() {
        let registry = SymbolRegistry::default();
        assert!(registry.contains("BTCUSDT"));
        assert!(registry.contains("ETHUSDT"));
        assert!(!registry.contains("DOGEUSDT"));
        assert_eq!(registry.infos().len(), 2);
    }

    #[test]
    fn test_native_ids() {
        let registry = SymbolRegistry::default();
        let eth = registry.get("ETHUSDT").unwrap();
        assert_eq!(eth.native_id(ProviderKind::Binance), "ETHUSDT");
        assert_eq!(eth.native_id(ProviderKind::CryptoCompare), "ETH");
        assert_eq!(eth.quote, "USD");
    }

    #[test]
    fn test_normalize_symbol() {
        assert_eq!(normalize_symbol(" btcusdt ").as_deref(), Some("BTCUSDT"));
        assert_eq!(normalize_symbol("   "), None);
    }
}
