//! Property tests for classification and the fee breakpoint.

use luxury_hunter::pricing::{FEE_THRESHOLD, HANDLING_FEE};
use luxury_hunter::{adjusted_price, convert, parse_numeric_input, render_summary, ExtractionResult};
use proptest::prelude::*;

proptest! {
    #[test]
    fn priced_iff_flagged_and_positive(has_price in any::<bool>(), price in -10_000.0f64..10_000.0) {
        let mut result = ExtractionResult::unpriced("Brand", "Thing");
        result.has_price = has_price;
        result.listed_price = price;

        prop_assert_eq!(result.is_priced(), has_price && price > 0.0);
    }

    #[test]
    fn fee_applies_at_or_below_threshold(price in 0.0f64..=FEE_THRESHOLD) {
        prop_assert_eq!(adjusted_price(price), price + HANDLING_FEE);
    }

    #[test]
    fn no_fee_above_threshold(price in (FEE_THRESHOLD + 0.01)..1_000_000.0f64) {
        prop_assert_eq!(adjusted_price(price), price);
    }

    #[test]
    fn whole_prices_convert_exactly(price in 0u32..100_000, rate in 1u32..100) {
        let converted = convert(price as f64, rate as f64);
        prop_assert_eq!(converted, price as i64 * rate as i64);
    }

    #[test]
    fn summary_has_four_lines(price in 1u32..20_000, rate in 1u32..60) {
        let text = render_summary("Brand", "Product", price as f64, rate as f64);
        prop_assert_eq!(text.lines().count(), 4);
        prop_assert!(text.starts_with("品牌: Brand\n品名: Product\n"));
    }

    #[test]
    fn numeric_input_never_fails(raw in ".*") {
        prop_assert!(parse_numeric_input(&raw).is_finite());
    }
}
