use crate::contest::ContestId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One leaderboard row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankRecord {
    pub rank: u32,
    pub name: String,
    pub score: u32,
}

impl RankRecord {
    /// Build a record from raw cell text. Missing or unparseable cells become `0` / `""`.
    pub fn from_cells(cells: &[String]) -> Self {
        let cell = |i: usize| cells.get(i).map(|c| c.trim()).unwrap_or("");

        Self {
            rank: parse_count(cell(0)),
            name: cell(1).to_string(),
            score: parse_count(cell(2)),
        }
    }
}

/// Lenient integer parse: the leading run of digits, `0` when there is none.
///
/// `"12th"` reads as 12. Negative numbers read as 0. Values past `u32::MAX` saturate.
pub fn parse_count(text: &str) -> u32 {
    let text = text.trim();
    let text = text.strip_prefix('+').unwrap_or(text);

    let end = text.find(|c: char| !c.is_ascii_digit()).unwrap_or(text.len());
    let digits = &text[..end];
    if digits.is_empty() {
        return 0;
    }

    digits.parse::<u32>().unwrap_or(u32::MAX)
}

/// Turn serialized table rows into records, keeping page order
pub fn parse_rows(rows: &[Vec<String>]) -> Vec<RankRecord> {
    rows.iter().map(|cells| RankRecord::from_cells(cells)).collect()
}

/// Outcome of one successful scrape run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeResult {
    rankings: Vec<RankRecord>,
    contest_code: ContestId,
    timestamp: DateTime<Utc>,
}

impl ScrapeResult {
    /// Stamp the rankings with the current time
    pub fn new(rankings: Vec<RankRecord>, contest_code: ContestId) -> Self {
        Self { rankings, contest_code, timestamp: Utc::now() }
    }

    pub fn rankings(&self) -> &[RankRecord] {
        &self.rankings
    }

    pub fn contest_code(&self) -> &ContestId {
        &self.contest_code
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn into_rankings(self) -> Vec<RankRecord> {
        self.rankings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_parse_count_like_parse_int() {
        assert_eq!(parse_count("42"), 42);
        assert_eq!(parse_count("  7 "), 7);
        assert_eq!(parse_count("12th"), 12);
        assert_eq!(parse_count("+3"), 3);
        assert_eq!(parse_count(""), 0);
        assert_eq!(parse_count("-"), 0);
        assert_eq!(parse_count("-5"), 0);
        assert_eq!(parse_count("N/A"), 0);
        assert_eq!(parse_count("99999999999999"), u32::MAX);
    }

    #[test]
    fn test_rows_keep_page_order() {
        let rows = vec![row(&["2", "Bob", "30"]), row(&["1", "Alice", "50"])];
        let records = parse_rows(&rows);

        assert_eq!(records[0], RankRecord { rank: 2, name: "Bob".to_string(), score: 30 });
        assert_eq!(records[1], RankRecord { rank: 1, name: "Alice".to_string(), score: 50 });
    }

    #[test]
    fn test_short_and_malformed_rows_degrade() {
        let rows = vec![row(&[]), row(&["x"]), row(&["3", "  Carol  "]), row(&["4", "Dan", "12 (+1)", "extra"])];
        let records = parse_rows(&rows);

        assert_eq!(records.len(), 4);
        assert_eq!(records[0], RankRecord { rank: 0, name: String::new(), score: 0 });
        assert_eq!(records[1], RankRecord { rank: 0, name: String::new(), score: 0 });
        assert_eq!(records[2], RankRecord { rank: 3, name: "Carol".to_string(), score: 0 });
        assert_eq!(records[3], RankRecord { rank: 4, name: "Dan".to_string(), score: 12 });
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let contest = ContestId::new("ABC123").unwrap();
        let result = ScrapeResult::new(vec![RankRecord { rank: 1, name: "Alice".to_string(), score: 50 }], contest);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["contestCode"], "ABC123");
        assert_eq!(json["rankings"][0]["name"], "Alice");
        assert!(json["timestamp"].is_string());
    }
}
