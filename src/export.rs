use crate::models::DifficultyLevel;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

pub fn cheatsheet_filename(difficulty: DifficultyLevel, date: NaiveDate) -> String {
    let level = difficulty.label().split_whitespace().collect::<Vec<_>>().join("_");
    format!("Interview_Cheatsheet_{}_{}.md", level, date.format("%Y-%m-%d"))
}

/// Write the summary markdown verbatim into `dir`, returning the file path.
pub fn export_summary(
    dir: &Path,
    difficulty: DifficultyLevel,
    summary: &str,
    date: NaiveDate,
) -> std::io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(cheatsheet_filename(difficulty, date));
    fs::write(&path, summary)?;
    tracing::info!(path = %path.display(), bytes = summary.len(), "exported cheatsheet");
    Ok(path)
}
