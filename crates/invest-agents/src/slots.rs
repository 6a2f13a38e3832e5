//! Named output slots for the parallel retrieval stage
//!
//! Each retrieval agent writes exactly one slot; the synthesis stage reads
//! all eight by name. The slot set is closed: the synthesis template refers
//! to each key, so the parallel stage must populate every one of them
//! (possibly with an error note) before synthesis proceeds.

use crate::retrieval::SectionReport;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The eight named output slots, one per retrieval agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SlotName {
    /// Company reference details and financial profile
    CompanyInfo,
    /// Volume-weighted average price
    Vwap,
    /// Market sentiment aggregates
    MarketSentiment,
    /// Significant development records
    SignificantEvents,
    /// ESG environmental indicators
    EsgEnvironmental,
    /// ESG governance indicators
    EsgGovernance,
    /// ESG social indicators
    EsgSocial,
    /// Company news
    CompanyNews,
}

impl SlotName {
    /// All slots, in report order
    pub const ALL: [SlotName; 8] = [
        SlotName::CompanyInfo,
        SlotName::Vwap,
        SlotName::MarketSentiment,
        SlotName::SignificantEvents,
        SlotName::EsgEnvironmental,
        SlotName::EsgGovernance,
        SlotName::EsgSocial,
        SlotName::CompanyNews,
    ];

    /// Slot key as referenced by the synthesis template
    pub fn key(&self) -> &'static str {
        match self {
            SlotName::CompanyInfo => "companyinfo_result",
            SlotName::Vwap => "vwap_result",
            SlotName::MarketSentiment => "marketpsycsentiment_result",
            SlotName::SignificantEvents => "significantevent_result",
            SlotName::EsgEnvironmental => "esgenvindicator_result",
            SlotName::EsgGovernance => "esggovindicator_result",
            SlotName::EsgSocial => "esgsocindicator_result",
            SlotName::CompanyNews => "companynews_result",
        }
    }

    /// Human-readable section title
    pub fn title(&self) -> &'static str {
        match self {
            SlotName::CompanyInfo => "Company Information",
            SlotName::Vwap => "VWAP",
            SlotName::MarketSentiment => "Market Sentiment",
            SlotName::SignificantEvents => "Significant Events",
            SlotName::EsgEnvironmental => "ESG: Environmental",
            SlotName::EsgGovernance => "ESG: Governance",
            SlotName::EsgSocial => "ESG: Social",
            SlotName::CompanyNews => "Company News",
        }
    }
}

impl fmt::Display for SlotName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The joined output of the parallel retrieval stage
///
/// Keyed by slot, iterated in report order.
#[derive(Debug, Clone, Default)]
pub struct SlotMap {
    sections: BTreeMap<SlotName, SectionReport>,
}

impl SlotMap {
    /// Create an empty slot map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a section under its own slot
    pub fn insert(&mut self, report: SectionReport) {
        self.sections.insert(report.slot, report);
    }

    /// Get the section for a slot
    pub fn get(&self, slot: SlotName) -> Option<&SectionReport> {
        self.sections.get(&slot)
    }

    /// Whether the slot is populated
    pub fn contains(&self, slot: SlotName) -> bool {
        self.sections.contains_key(&slot)
    }

    /// Whether all eight slots are populated
    pub fn is_complete(&self) -> bool {
        SlotName::ALL.iter().all(|slot| self.contains(*slot))
    }

    /// Number of populated slots
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether no slot is populated
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Iterate sections in report order
    pub fn iter(&self) -> impl Iterator<Item = &SectionReport> {
        SlotName::ALL.iter().filter_map(|slot| self.sections.get(slot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_keys_are_distinct() {
        let mut keys: Vec<&str> = SlotName::ALL.iter().map(SlotName::key).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), 8);
    }

    #[test]
    fn test_completeness() {
        let mut map = SlotMap::new();
        assert!(!map.is_complete());

        for slot in SlotName::ALL {
            map.insert(SectionReport::ok(slot, "body"));
        }
        assert!(map.is_complete());
        assert_eq!(map.len(), 8);
    }

    #[test]
    fn test_iteration_order() {
        let mut map = SlotMap::new();
        map.insert(SectionReport::ok(SlotName::CompanyNews, "news"));
        map.insert(SectionReport::ok(SlotName::CompanyInfo, "info"));

        let order: Vec<SlotName> = map.iter().map(|s| s.slot).collect();
        assert_eq!(order, vec![SlotName::CompanyInfo, SlotName::CompanyNews]);
    }
}
