/// Loading songs, orderings and drafts from disk.
///
/// Song lists are auto-detected: a JSON array of song records, a saved
/// ranking state (its `ranked` list is used), or plain text with one
/// `Title - Artist` per line.
use anyhow::{bail, Context, Result};
use songrank_core::{items_from_records, Item, RankingState, SongRecord};
use std::path::Path;

/// Parse one plain-text line. Everything after the last ` - ` is the artist.
fn parse_line(line: &str) -> Item {
    match line.rsplit_once(" - ") {
        Some((title, artist)) if !title.trim().is_empty() => Item::untracked(title.trim(), artist.trim()),
        _ => Item::untracked(line.trim(), ""),
    }
}

/// Parse a song list in any supported format.
pub fn parse_songs_from_str(content: &str) -> Result<Vec<Item>> {
    let trimmed = content.trim();
    if trimmed.starts_with('[') {
        let records: Vec<SongRecord> = serde_json::from_str(trimmed)
            .context("Input looks like a JSON array but failed to parse as song records")?;
        Ok(items_from_records(records))
    } else if trimmed.starts_with('{') {
        let state: RankingState = serde_json::from_str(trimmed)
            .context("Input looks like a JSON object but failed to parse as a saved ranking")?;
        Ok(state.ranked)
    } else {
        Ok(trimmed
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(parse_line)
            .collect())
    }
}

pub fn load_songs(path: &Path) -> Result<Vec<Item>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_songs_from_str(&content).with_context(|| format!("Failed to load songs from {}", path.display()))
}

/// Load the new-item pool from --items and --item.
///
/// Stdin is not an item source: the session reads its answers from it.
pub fn load_items(file: Option<&Path>, inline: &[String]) -> Result<Vec<Item>> {
    let mut items = match file {
        Some(path) => load_songs(path)?,
        None => Vec::new(),
    };

    items.extend(inline.iter().map(|s| parse_line(s)));

    if items.is_empty() {
        bail!(
            "No songs to rank. Use --items <file> or --item \"Title - Artist\" \
             (stdin is reserved for answering comparisons)."
        );
    }
    Ok(items)
}

pub fn load_draft(path: &Path) -> Result<RankingState> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read draft {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse draft {}", path.display()))
}

/// Delete a draft that has been resumed to completion.
pub fn remove_draft(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("Failed to remove draft {}", path.display())),
    }
}

/// Write a state as pretty JSON. Used for both drafts and finished rankings.
pub fn save_state(path: &Path, state: &RankingState) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(state)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}
