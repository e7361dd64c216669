/// Output formatting: terminal tables and JSON.
use anyhow::Result;
use serde::Serialize;
use songrank_core::{DiffResult, Direction, Item, RankingState, SharedItem};

#[derive(Serialize)]
struct JsonRankedItem<'a> {
    rank: usize,
    #[serde(flatten)]
    item: &'a Item,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonRanking<'a> {
    items: Vec<JsonRankedItem<'a>>,
    skipped: &'a [Item],
    total_comparisons: usize,
}

/// Which side's ranks order the shared items in a diff table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SortSide {
    Yours,
    Theirs,
}

fn column_width<'a>(values: impl Iterator<Item = &'a str>, header: &str) -> usize {
    values.map(|v| v.chars().count()).max().unwrap_or(0).max(header.len())
}

/// Render a finished ranking as a terminal table.
pub fn render_ranking_table(state: &RankingState) -> String {
    let title_width = column_width(state.ranked.iter().map(|i| i.title.as_str()), "Title");
    let artist_width = column_width(state.ranked.iter().map(|i| i.artist.as_str()), "Artist");

    let mut out = String::new();
    out.push_str(&format!("  # | {:<title_width$} | {:<artist_width$}\n", "Title", "Artist"));
    out.push_str(&format!("----|-{}-|-{}\n", "-".repeat(title_width), "-".repeat(artist_width)));

    for (i, item) in state.ranked.iter().enumerate() {
        out.push_str(&format!("{:>3} | {:<title_width$} | {:<artist_width$}\n", i + 1, item.title, item.artist));
    }

    out.push_str(&format!(
        "\n{} songs ranked ({} comparisons)\n",
        state.ranked.len(),
        state.comparison_count,
    ));
    if !state.skipped.is_empty() {
        out.push_str(&format!("Skipped ({}):\n", state.skipped.len()));
        for item in &state.skipped {
            out.push_str(&format!("  - {item}\n"));
        }
    }
    out
}

/// Render a finished ranking as JSON.
pub fn render_ranking_json(state: &RankingState) -> Result<String> {
    let output = JsonRanking {
        items: state
            .ranked
            .iter()
            .enumerate()
            .map(|(i, item)| JsonRankedItem { rank: i + 1, item })
            .collect(),
        skipped: &state.skipped,
        total_comparisons: state.comparison_count,
    };
    Ok(serde_json::to_string_pretty(&output)?)
}

fn movement(shared: &SharedItem) -> String {
    match shared.direction {
        Direction::Up => format!("▲{}", shared.diff_amount),
        Direction::Down => format!("▼{}", shared.diff_amount),
        Direction::Same => "=".to_string(),
    }
}

/// Render a diff as a terminal report.
pub fn render_diff_table(diff: &DiffResult, sort: SortSide) -> String {
    let shared = match sort {
        SortSide::Yours => diff.shared_by_rank_a(),
        SortSide::Theirs => diff.shared_by_rank_b(),
    };
    let name_width = column_width(shared.iter().map(|s| s.item.title.as_str()), "Song");

    let mut out = format!("Similarity: {}%\n\n", diff.similarity);

    if !shared.is_empty() {
        out.push_str(&format!(" Yours | Theirs | Move | {:<name_width$} | Artist\n", "Song"));
        out.push_str(&format!("-------|--------|------|-{}-|-------\n", "-".repeat(name_width)));
        for s in shared {
            out.push_str(&format!(
                "{:>6} | {:>6} | {:>4} | {:<name_width$} | {}\n",
                s.rank_a,
                s.rank_b,
                movement(s),
                s.item.title,
                s.item.artist,
            ));
        }
    }

    for (label, items) in [("Only in yours", &diff.only_in_a), ("Only in theirs", &diff.only_in_b)] {
        if items.is_empty() {
            continue;
        }
        out.push_str(&format!("\n{label} ({}):\n", items.len()));
        for item in items {
            out.push_str(&format!("  - {item}\n"));
        }
    }
    out
}

/// Render a diff as JSON.
pub fn render_diff_json(diff: &DiffResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(diff)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use songrank_core::compare_rankings;

    fn song(title: &str) -> Item {
        Item::new(title.to_lowercase(), title, "Band")
    }

    fn finished() -> RankingState {
        RankingState {
            ranked: vec![song("Alpha"), song("Beta")],
            skipped: vec![song("Gamma")],
            comparison_count: 1,
            ..RankingState::default()
        }
    }

    #[test]
    fn test_ranking_table() {
        let table = render_ranking_table(&finished());
        assert!(table.contains("  1 | Alpha | Band"));
        assert!(table.contains("  2 | Beta  | Band"));
        assert!(table.contains("2 songs ranked (1 comparisons)"));
        assert!(table.contains("- Gamma by Band"));
    }

    #[test]
    fn test_ranking_json() {
        let json = render_ranking_json(&finished()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["items"][0]["rank"], 1);
        assert_eq!(value["items"][0]["title"], "Alpha");
        assert_eq!(value["items"][1]["id"], "beta");
        assert_eq!(value["totalComparisons"], 1);
        assert_eq!(value["skipped"][0]["title"], "Gamma");
    }

    #[test]
    fn test_diff_table_sorted_by_theirs() {
        let a = vec![song("X"), song("Y"), song("Z")];
        let b = vec![song("Y"), song("X"), song("W")];
        let diff = compare_rankings(&a, &b);

        let table = render_diff_table(&diff, SortSide::Theirs);
        assert!(table.starts_with("Similarity: 67%"));
        let y_line = table.find("| Y ").unwrap();
        let x_line = table.find("| X ").unwrap();
        assert!(y_line < x_line);
        assert!(table.contains("▲1"));
        assert!(table.contains("▼1"));
        assert!(table.contains("Only in yours (1):\n  - Z by Band"));
        assert!(table.contains("Only in theirs (1):\n  - W by Band"));
    }

    #[test]
    fn test_diff_json_exposes_both_ranks() {
        let a = vec![song("X"), song("Y")];
        let b = vec![song("Y"), song("X")];
        let json = render_diff_json(&compare_rankings(&a, &b)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["similarity"], 100);
        assert_eq!(value["sharedItems"][0]["rankA"], 1);
        assert_eq!(value["sharedItems"][0]["rankB"], 2);
        assert_eq!(value["sharedItems"][0]["direction"], "down");
    }
}
