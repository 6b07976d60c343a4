//! CoinGecko response parsing.
//!
//! Listing and chart payloads are decoded into the domain types with two
//! different tolerances:
//!
//! - the listing is all-or-nothing: one invalid element fails the call
//! - a chart keeps every well-formed `[ms, price]` pair and skips the rest,
//!   so a chart with only malformed pairs parses to an empty series
//!
//! Chart timestamps arrive in milliseconds and are stored as whole seconds.

use serde_json::Value;

use super::errors::MarketError;
use super::types::{MarketChart, MarketEntry};
use crate::types::{Asset, PricePoint, Series};

pub fn parse_markets(body: &[u8]) -> Result<Vec<Asset>, MarketError> {
    let entries: Vec<MarketEntry> = serde_json::from_slice(body)?;
    entries.into_iter().map(asset_from_entry).collect()
}

pub fn parse_market_chart(body: &[u8]) -> Result<Series, MarketError> {
    let chart: MarketChart = serde_json::from_slice(body)?;
    Ok(series_from_chart(chart))
}

fn asset_from_entry(e: MarketEntry) -> Result<Asset, MarketError> {
    if !e.current_price.is_finite() || e.current_price < 0.0 {
        return Err(MarketError::InvalidResponse(format!(
            "asset {} has invalid price {}",
            e.id, e.current_price
        )));
    }

    let market_cap = match e.market_cap {
        Some(cap) if cap.is_finite() && cap >= 0.0 => Some(cap as u64),
        Some(cap) => {
            return Err(MarketError::InvalidResponse(format!(
                "asset {} has invalid market cap {}",
                e.id, cap
            )));
        }
        None => None,
    };

    Ok(Asset {
        id: e.id,
        name: e.name,
        symbol: e.symbol,
        current_price: e.current_price,
        image: e.image,
        market_cap,
        price_change_percentage_24h: e.price_change_percentage_24h,
        market_cap_rank: e.market_cap_rank,
    })
}

fn series_from_chart(chart: MarketChart) -> Series {
    chart
        .prices
        .iter()
        .filter_map(point_from_pair)
        .collect()
}

fn point_from_pair(element: &Value) -> Option<PricePoint> {
    let pair = element.as_array()?;
    let ts_ms = pair.first()?.as_f64()?;
    let price = pair.get(1)?.as_f64()?;

    if !ts_ms.is_finite() || !price.is_finite() || price < 0.0 {
        return None;
    }

    Some(PricePoint::new((ts_ms / 1000.0) as i64, price))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARKETS: &str = r#"[
        {
            "id": "bitcoin", "name": "Bitcoin", "symbol": "btc",
            "current_price": 64000.5, "image": "https://img/btc.png",
            "market_cap": 1260000000000, "price_change_percentage_24h": -1.25,
            "market_cap_rank": 1, "total_volume": 1
        },
        {
            "id": "tiny", "name": "Tiny", "symbol": "tny",
            "current_price": 0.01, "image": "https://img/tny.png",
            "market_cap": null, "price_change_percentage_24h": null,
            "market_cap_rank": 2
        }
    ]"#;

    #[test]
    fn parses_listing_with_optional_fields() {
        let assets = parse_markets(MARKETS.as_bytes()).unwrap();
        assert_eq!(assets.len(), 2);

        assert_eq!(assets[0].id, "bitcoin");
        assert_eq!(assets[0].market_cap, Some(1_260_000_000_000));
        assert_eq!(assets[0].price_change_percentage_24h, Some(-1.25));

        assert_eq!(assets[1].market_cap, None);
        assert_eq!(assets[1].price_change_percentage_24h, None);
        assert_eq!(assets[1].market_cap_rank, 2);
    }

    #[test]
    fn float_market_cap_is_accepted() {
        let body = r#"[{"id":"x","name":"X","symbol":"x","current_price":1.0,
            "image":"","market_cap":1.5e9,"market_cap_rank":3}]"#;
        let assets = parse_markets(body.as_bytes()).unwrap();
        assert_eq!(assets[0].market_cap, Some(1_500_000_000));
    }

    #[test]
    fn one_bad_listing_element_fails_the_whole_listing() {
        let body = r#"[
            {"id":"a","name":"A","symbol":"a","current_price":1.0,"image":"","market_cap_rank":1},
            {"id":"b","name":"B","symbol":"b","image":"","market_cap_rank":2}
        ]"#;
        assert!(matches!(
            parse_markets(body.as_bytes()),
            Err(MarketError::Decode(_))
        ));

        let negative = r#"[{"id":"c","name":"C","symbol":"c","current_price":-3.0,
            "image":"","market_cap_rank":1}]"#;
        assert!(matches!(
            parse_markets(negative.as_bytes()),
            Err(MarketError::InvalidResponse(_))
        ));
    }

    #[test]
    fn chart_converts_millis_to_seconds() {
        let body = r#"{"prices":[[1700000000000,100.5],[1700000300000,101.0]]}"#;
        let series = parse_market_chart(body.as_bytes()).unwrap();

        assert_eq!(
            series.points(),
            &[
                PricePoint::new(1_700_000_000, 100.5),
                PricePoint::new(1_700_000_300, 101.0)
            ]
        );
    }

    #[test]
    fn chart_skips_malformed_pairs() {
        let body = r#"{"prices":[
            [1700000000000,100.5],["x",1.0],[1700000060000],
            [1700000120000,-2.0],[1700000180000,99.0]
        ]}"#;
        let series = parse_market_chart(body.as_bytes()).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.last().unwrap().price, 99.0);
    }

    #[test]
    fn chart_skips_elements_that_are_not_pairs() {
        let body = r#"{"prices":[
            [1700000000000,100.5],null,42,{"t":1},"p",[1700000060000,101.0]
        ]}"#;
        let series = parse_market_chart(body.as_bytes()).unwrap();

        assert_eq!(
            series.points(),
            &[
                PricePoint::new(1_700_000_000, 100.5),
                PricePoint::new(1_700_000_060, 101.0)
            ]
        );
    }

    #[test]
    fn chart_without_prices_is_a_decode_error() {
        assert!(parse_market_chart(br#"{"error":"coin not found"}"#).is_err());
        assert!(parse_market_chart(b"not json").is_err());
    }

    #[test]
    fn chart_with_no_points_is_empty_not_error() {
        let series = parse_market_chart(br#"{"prices":[]}"#).unwrap();
        assert!(series.is_empty());
    }
}
