use crate::browser::PageHandle;
use crate::config::TableSelectors;
use crate::error::{ExtractionFailure, Result};
use crate::scrape::record::{RankRecord, parse_rows};

/// Reads the leaderboard table out of a rendered page
#[derive(Debug, Clone, Copy)]
pub struct TableExtractor<'a> {
    selectors: &'a TableSelectors,
}

impl<'a> TableExtractor<'a> {
    pub fn new(selectors: &'a TableSelectors) -> Self {
        Self { selectors }
    }

    /// Rows in page order. The fallback selector is only consulted when the primary matches nothing.
    pub fn extract<P: PageHandle + ?Sized>(&self, page: &P) -> Result<Vec<RankRecord>> {
        let rows = match page.table_rows(&self.selectors.primary)? {
            Some(rows) => rows,
            None => {
                log::debug!(
                    "Table selector '{}' matched nothing, trying '{}'",
                    self.selectors.primary,
                    self.selectors.fallback
                );
                page.table_rows(&self.selectors.fallback)?.ok_or(ExtractionFailure::TableNotFound)?
            }
        };

        if rows.is_empty() {
            return Err(ExtractionFailure::EmptyTable.into());
        }

        let records = parse_rows(&rows);
        log::info!("Extracted {} rank rows", records.len());
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::PageProbe;
    use crate::error::ScrapeError;
    use std::collections::HashMap;

    struct StaticTables(HashMap<&'static str, Vec<Vec<String>>>);

    impl PageHandle for StaticTables {
        fn goto(&self, _url: &str) -> Result<()> {
            Ok(())
        }

        fn probe(&self, _table_selectors: &[&str]) -> Result<PageProbe> {
            unimplemented!("extraction never probes")
        }

        fn table_rows(&self, selector: &str) -> Result<Option<Vec<Vec<String>>>> {
            Ok(self.0.get(selector).cloned())
        }
    }

    fn rows(data: &[[&str; 3]]) -> Vec<Vec<String>> {
        data.iter().map(|r| r.iter().map(|c| c.to_string()).collect()).collect()
    }

    #[test]
    fn test_primary_selector() {
        let selectors = TableSelectors::default();
        let page = StaticTables(HashMap::from([
            ("#contest-rank-table tbody", rows(&[["1", "Alice", "50"]])),
            (".contest-rank-table tbody", rows(&[["9", "Ignored", "0"]])),
        ]));

        let records = TableExtractor::new(&selectors).extract(&page).unwrap();
        assert_eq!(records, vec![RankRecord { rank: 1, name: "Alice".to_string(), score: 50 }]);
    }

    #[test]
    fn test_falls_back_to_alternate_selector() {
        let selectors = TableSelectors::default();
        let page = StaticTables(HashMap::from([(
            ".contest-rank-table tbody",
            rows(&[["1", "Alice", "50"], ["2", "Bob", "30"]]),
        )]));

        let records = TableExtractor::new(&selectors).extract(&page).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].name, "Bob");
    }

    #[test]
    fn test_missing_table() {
        let selectors = TableSelectors::default();
        let page = StaticTables(HashMap::new());

        let err = TableExtractor::new(&selectors).extract(&page).unwrap_err();
        assert!(matches!(err, ScrapeError::Extraction(ExtractionFailure::TableNotFound)));
    }

    #[test]
    fn test_empty_table_is_not_missing_table() {
        let selectors = TableSelectors::default();
        let page = StaticTables(HashMap::from([("#contest-rank-table tbody", Vec::new())]));

        let err = TableExtractor::new(&selectors).extract(&page).unwrap_err();
        assert!(matches!(err, ScrapeError::Extraction(ExtractionFailure::EmptyTable)));
    }
}
