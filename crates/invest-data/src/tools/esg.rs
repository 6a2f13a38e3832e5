//! ESG indicator tool functions (warehouse-backed, keyed by fiscal year)

use super::{quoted_list, run_query};
use crate::warehouse::Warehouse;
use invest_core::{FiscalYear, Ric, ToolEnvelope};

const ESG_ENV_TABLE: &str = "esg_data.environmental_indicators";
const ESG_GOV_TABLE: &str = "esg_data.governance_indicators";
const ESG_SOC_TABLE: &str = "esg_data.social_indicators";

async fn esg_indicator(
    warehouse: &dyn Warehouse,
    function: &str,
    table: &str,
    rics: &[Ric],
    fiscal_year: FiscalYear,
) -> ToolEnvelope {
    let sql = format!(
        "SELECT ric, fiscal_year, indicator_code, indicator_name, indicator_value, unit
        FROM `{table}`
        WHERE ric IN ({rics})
        AND fiscal_year = {year}
        ORDER BY ric, indicator_code",
        rics = quoted_list(rics),
        year = fiscal_year.year(),
    );

    run_query(warehouse, function, sql).await
}

/// Environmental indicators for one fiscal year
pub async fn esg_env_indicator(
    warehouse: &dyn Warehouse,
    rics: &[Ric],
    fiscal_year: FiscalYear,
) -> ToolEnvelope {
    esg_indicator(warehouse, "esg_env_indicator", ESG_ENV_TABLE, rics, fiscal_year).await
}

/// Governance indicators for one fiscal year
pub async fn esg_gov_indicator(
    warehouse: &dyn Warehouse,
    rics: &[Ric],
    fiscal_year: FiscalYear,
) -> ToolEnvelope {
    esg_indicator(warehouse, "esg_gov_indicator", ESG_GOV_TABLE, rics, fiscal_year).await
}

/// Social indicators for one fiscal year
pub async fn esg_soc_indicator(
    warehouse: &dyn Warehouse,
    rics: &[Ric],
    fiscal_year: FiscalYear,
) -> ToolEnvelope {
    esg_indicator(warehouse, "esg_soc_indicator", ESG_SOC_TABLE, rics, fiscal_year).await
}
