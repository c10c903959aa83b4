//! Fee and currency engine.
//!
//! Pure functions over `(listed_price, exchange_rate)`. A handling fee is
//! added to every listed price up to and including the fee threshold; prices
//! strictly above the threshold pass through unchanged. The adjusted price is
//! then converted into the target currency and rounded to a whole unit.
//!
//! Nothing here validates its inputs: negative prices and non-finite rates
//! flow through arithmetically.

use serde::{Deserialize, Serialize};

/// Listed prices strictly above this carry no handling fee.
pub const FEE_THRESHOLD: f64 = 1000.0;

/// Fee added to listed prices at or below [`FEE_THRESHOLD`].
pub const HANDLING_FEE: f64 = 15.0;

/// Source-to-target exchange rate used until an operator sets one.
pub const DEFAULT_EXCHANGE_RATE: f64 = 37.0;

/// Fee schedule: a step function with a single breakpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRules {
    pub fee_threshold: f64,
    pub handling_fee: f64,
}

impl Default for PriceRules {
    fn default() -> Self {
        Self {
            fee_threshold: FEE_THRESHOLD,
            handling_fee: HANDLING_FEE,
        }
    }
}

/// Every number derived for one item at one exchange rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceQuote {
    pub listed_price: f64,
    pub fee_applied: bool,
    pub adjusted_price: f64,
    pub exchange_rate: f64,
    pub converted_price: i64,
}

impl PriceRules {
    /// Whether the handling fee applies to `listed_price`.
    pub fn fee_applies(&self, listed_price: f64) -> bool {
        // NaN compares false and therefore takes the fee branch.
        !(listed_price > self.fee_threshold)
    }

    pub fn adjusted_price(&self, listed_price: f64) -> f64 {
        if self.fee_applies(listed_price) {
            listed_price + self.handling_fee
        } else {
            listed_price
        }
    }

    pub fn quote(&self, listed_price: f64, exchange_rate: f64) -> PriceQuote {
        let adjusted_price = self.adjusted_price(listed_price);
        PriceQuote {
            listed_price,
            fee_applied: self.fee_applies(listed_price),
            adjusted_price,
            exchange_rate,
            converted_price: convert(adjusted_price, exchange_rate),
        }
    }

    /// Render the four-line shareable summary.
    ///
    /// ```text
    /// 品牌: Chanel
    /// 品名: Bag
    /// 💰付歐元: 500+15 = 515
    /// 💰付台幣: 515 * 37 = 19055
    /// ```
    pub fn render_summary(
        &self,
        brand: &str,
        product_name: &str,
        listed_price: f64,
        exchange_rate: f64,
    ) -> String {
        let quote = self.quote(listed_price, exchange_rate);

        let source_line = if quote.fee_applied {
            format!(
                "💰付歐元: {}+{} = {}",
                format_amount(listed_price),
                format_amount(self.handling_fee),
                format_amount(quote.adjusted_price)
            )
        } else {
            format!("💰付歐元: {}", format_amount(listed_price))
        };

        let target_line = format!(
            "💰付台幣: {} * {} = {}",
            format_amount(quote.adjusted_price),
            format_amount(exchange_rate),
            quote.converted_price
        );

        format!("品牌: {brand}\n品名: {product_name}\n{source_line}\n{target_line}")
            .trim()
            .to_string()
    }
}

/// Fee-adjusted price under the default rules.
pub fn adjusted_price(listed_price: f64) -> f64 {
    PriceRules::default().adjusted_price(listed_price)
}

/// Convert into the target currency, rounding half up to a whole unit.
///
/// Non-finite products saturate (`NaN` becomes 0).
pub fn convert(adjusted_price: f64, exchange_rate: f64) -> i64 {
    round_half_up(adjusted_price * exchange_rate) as i64
}

/// Nearest integer, exact halves toward positive infinity. Exact for every
/// finite input, including `0.49999999999999994` and integers above 2^52.
fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// Summary text under the default rules.
pub fn render_summary(
    brand: &str,
    product_name: &str,
    listed_price: f64,
    exchange_rate: f64,
) -> String {
    PriceRules::default().render_summary(brand, product_name, listed_price, exchange_rate)
}

/// Shortest human form of an amount: `500`, `36.5`, never `500.0` or `-0`.
///
/// Magnitudes from 1e21 up print in full positional digits, not exponent form.
pub fn format_amount(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{value}")
}
