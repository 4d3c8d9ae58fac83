use fud_court::scoring::normalize;
use fud_court::{analyze_market, Interpretation, MarketAnalysisInput, ScoreWeights, TopCoin};
use proptest::prelude::*;

fn top_coin() -> impl Strategy<Value = TopCoin> {
    (
        prop::option::of(-50.0f64..50.0),
        0.01f64..100_000.0,
        0.0f64..200_000.0,
    )
        .prop_map(|(change, ath, current_price)| TopCoin {
            price_change_percentage_24h: change,
            ath,
            current_price,
        })
}

prop_compose! {
    fn market_input()(
        total_market_cap in 0.0f64..1e13,
        max_historical_market_cap in 1.0f64..1e13,
        total_volume_24h in 0.0f64..1e12,
        avg_30_day_volume in 1.0f64..1e12,
        btc_dominance in 0.0f64..=100.0,
        altcoin_market_cap in 0.0f64..1e13,
        btc_market_cap in 1.0f64..1e13,
        fear_and_greed_index in 0.0f64..=100.0,
        top_coins in prop::collection::vec(top_coin(), 1..60),
    ) -> MarketAnalysisInput {
        MarketAnalysisInput {
            total_market_cap,
            max_historical_market_cap,
            total_volume_24h,
            avg_30_day_volume,
            btc_dominance,
            altcoin_market_cap,
            btc_market_cap,
            fear_and_greed_index,
            top_coins,
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    #[test]
    fn sub_scores_stay_within_bounds(input in market_input()) {
        let scores = normalize(&input).unwrap();
        for value in [
            scores.market_cap,
            scores.volume,
            scores.btc_dominance,
            scores.altseason,
            scores.market_breadth,
            scores.ath,
        ] {
            prop_assert!((0.0..=100.0).contains(&value));
        }
        prop_assert_eq!(scores.fear_and_greed, input.fear_and_greed_index);
    }

    #[test]
    fn macro_score_is_bounded_and_bucketed(input in market_input()) {
        let output = analyze_market(&input, &ScoreWeights::default()).unwrap();
        prop_assert!(output.macro_score <= 100);
        prop_assert_eq!(output.interpretation, Interpretation::from_score(output.macro_score));
        prop_assert_eq!(output.summary.as_str(), output.interpretation.summary());
    }
}
