//! Tick-history and reference data tool functions (warehouse-backed)

use super::{quoted_list, run_query};
use crate::warehouse::Warehouse;
use invest_core::{DateRange, Ric, ToolEnvelope};

const TICK_HISTORY_TABLE: &str = "market_data.tick_history.lse_normalised";
const COMPANY_INFO_TABLE: &str = "reference_data.company_info";
const COMPANY_DETAIL_TABLE: &str = "reference_data.company_detail";
const SENTIMENT_INFO_TABLE: &str = "sentiment_data.company_info";
const SENTIMENT_EMOTION_TABLE: &str = "sentiment_data.company_emotion_daily";
const SIGNIFICANT_EVENTS_TABLE: &str = "reference_data.significant_developments";

/// Volume-weighted average price per RIC and trading day over the range
///
/// Aggregates qualifying trades (positive price and volume) into daily VWAP,
/// total volume, average price, trade count, and best ask/bid extremes.
pub async fn vwap(warehouse: &dyn Warehouse, rics: &[Ric], range: &DateRange) -> ToolEnvelope {
    let sql = format!(
        "WITH all_trades AS (
            SELECT date_time, ric, price, volume, ask_price, ask_size, bid_price, bid_size
            FROM `{TICK_HISTORY_TABLE}`
            WHERE price IS NOT NULL
            AND (date_time BETWEEN '{start} 00:00:00.000000' AND '{end} 23:59:59.999999')
            AND type = 'Trade'
            AND volume > 0
            AND price > 0
        )
        SELECT CAST(EXTRACT(DATE FROM date_time) AS STRING) AS trade_date, ric,
            ROUND(SAFE_DIVIDE(SUM(volume * price), SUM(volume)), 3) AS vwap,
            SUM(volume) AS total_volume, AVG(price) AS avg_price,
            COUNT(ric) AS num_trades, MAX(ask_price) AS max_ask_price,
            MAX(ask_size) AS max_ask_size, MAX(bid_price) AS max_bid_price,
            MAX(bid_size) AS max_bid_size
        FROM all_trades
        WHERE ric IN ({rics})
        GROUP BY ric, trade_date
        ORDER BY 1, 2",
        start = range.start,
        end = range.end,
        rics = quoted_list(rics),
    );

    run_query(warehouse, "vwap", sql).await
}

/// Daily market-sentiment aggregates per RIC over the range
///
/// Bipolar fields (sentiment, optimism, trust, ...) range -1..1; unipolar
/// fields (joy, anger, fear, ...) range 0..1.
pub async fn market_sentiment(
    warehouse: &dyn Warehouse,
    rics: &[Ric],
    range: &DateRange,
) -> ToolEnvelope {
    let sql = format!(
        "SELECT a.ric, b.date_, AVG(b.sentiment) AS sentiment,
            AVG(b.uncertainty) AS uncertainty, AVG(b.anger) AS anger,
            AVG(b.stress) AS stress, AVG(b.optimism) AS optimism,
            AVG(b.joy) AS joy, AVG(b.fear) AS fear, AVG(b.surprise) AS surprise,
            AVG(b.trust) AS trust, AVG(b.violence) AS violence,
            AVG(b.volatility) AS volatility, AVG(b.gloom) AS gloom,
            AVG(b.buzz) AS buzz, AVG(b.conflict) AS conflict,
            AVG(b.emotionvsfact) AS emotionvsfact, AVG(b.innovation) AS innovation,
            AVG(b.lovehate) AS lovehate, AVG(b.marketrisk) AS marketrisk
        FROM `{SENTIMENT_INFO_TABLE}` a
        INNER JOIN `{SENTIMENT_EMOTION_TABLE}` b ON a.org_perm_id = b.org_perm_id
        WHERE a.ric IN ({rics})
        AND b.date_ BETWEEN '{start} 00:00:00.000000' AND '{end} 23:59:59.999999'
        GROUP BY a.ric, b.date_
        ORDER BY a.ric, b.date_",
        start = range.start,
        end = range.end,
        rics = quoted_list(rics),
    );

    run_query(warehouse, "market_sentiment", sql).await
}

/// Company reference details for the given RICs (no date range)
pub async fn company_details(warehouse: &dyn Warehouse, rics: &[Ric]) -> ToolEnvelope {
    let sql = format!(
        "SELECT a.ric, b.*
        FROM `{COMPANY_INFO_TABLE}` a
        INNER JOIN `{COMPANY_DETAIL_TABLE}` b ON a.code = b.code
        WHERE a.ric IN ({rics})",
        rics = quoted_list(rics),
    );

    run_query(warehouse, "company_details", sql).await
}

/// Significant development records for the given RICs over the range
pub async fn significant_events(
    warehouse: &dyn Warehouse,
    rics: &[Ric],
    range: &DateRange,
) -> ToolEnvelope {
    let sql = format!(
        "SELECT *
        FROM `{SIGNIFICANT_EVENTS_TABLE}`
        WHERE ric IN ({rics})
        AND source_date BETWEEN '{start} 00:00:00.000000' AND '{end} 23:59:59.999999'",
        start = range.start,
        end = range.end,
        rics = quoted_list(rics),
    );

    run_query(warehouse, "significant_events", sql).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::warehouse::MockWarehouse;
    use invest_core::ToolStatus;
    use serde_json::json;

    fn range() -> DateRange {
        DateRange::calendar_year(2026)
    }

    #[tokio::test]
    async fn test_vwap_success_envelope() {
        let mut warehouse = MockWarehouse::new();
        warehouse.expect_query().returning(|sql| {
            assert!(sql.contains("'VOD.L'"));
            assert!(sql.contains("2026-01-01 00:00:00.000000"));
            assert!(sql.contains("2026-12-31 23:59:59.999999"));
            Ok(vec![json!({"ric": "VOD.L", "vwap": 72.514})])
        });

        let envelope = vwap(&warehouse, &[Ric::new("VOD.L")], &range()).await;
        assert_eq!(envelope.status, ToolStatus::Success);
        assert_eq!(envelope.function, "vwap");
    }

    #[tokio::test]
    async fn test_vwap_empty_result_is_success() {
        // Zero qualifying trades: still a success envelope with an empty set
        let mut warehouse = MockWarehouse::new();
        warehouse.expect_query().returning(|_| Ok(vec![]));

        let envelope = vwap(&warehouse, &[Ric::new("BT.L")], &range()).await;
        assert_eq!(envelope.status, ToolStatus::Success);
        assert_eq!(envelope.report, json!([]));
    }

    #[tokio::test]
    async fn test_vwap_failure_degrades_to_error_envelope() {
        let mut warehouse = MockWarehouse::new();
        warehouse
            .expect_query()
            .returning(|_| Err(crate::DataError::Warehouse("connection refused".to_string())));

        let envelope = vwap(&warehouse, &[Ric::new("VOD.L")], &range()).await;
        assert_eq!(envelope.status, ToolStatus::Error);
        assert_eq!(envelope.function, "vwap");
        assert!(envelope.error_reason().unwrap().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_function_names_match() {
        let mut warehouse = MockWarehouse::new();
        warehouse.expect_query().returning(|_| Ok(vec![]));

        let rics = [Ric::new("VOD.L")];
        assert_eq!(
            market_sentiment(&warehouse, &rics, &range()).await.function,
            "market_sentiment"
        );
        assert_eq!(
            company_details(&warehouse, &rics).await.function,
            "company_details"
        );
        assert_eq!(
            significant_events(&warehouse, &rics, &range()).await.function,
            "significant_events"
        );
    }
}
