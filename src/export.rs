use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use rust_xlsxwriter::Workbook;

use crate::gym_api::{ExportFormat, RankingRow};

/// Writes a server-rendered export blob to the download directory.
/// Same tmp+rename dance as the session store, so a crash never
/// leaves a truncated document behind.
pub fn save_export_blob(
    dir: &Path,
    match_id: u64,
    format: ExportFormat,
    bytes: &[u8],
) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create export dir {}", dir.display()))?;
    let name = format!("gymnastics-results-{match_id}.{}", format.extension());
    let path = dir.join(&name);
    let tmp = dir.join(format!("{name}.tmp"));
    fs::write(&tmp, bytes).with_context(|| format!("failed to write {}", tmp.display()))?;
    fs::rename(&tmp, &path).with_context(|| format!("failed to rename to {}", path.display()))?;
    Ok(path)
}

/// Renders the locally-held rankings table to a spreadsheet, for when
/// the operator wants the standings without a server round trip.
pub fn export_rankings_xlsx(
    dir: &Path,
    match_id: u64,
    rows: &[RankingRow],
) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create export dir {}", dir.display()))?;
    let path = dir.join(format!("gymnastics-rankings-{match_id}.xlsx"));

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let headers = [
        "Rank",
        "Player",
        "Team",
        "Apparatus",
        "Difficulty",
        "Execution",
        "Deductions",
        "Total",
    ];
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header)?;
    }
    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        sheet.write_number(r, 0, row.rank as f64)?;
        sheet.write_string(r, 1, &row.player_name)?;
        sheet.write_string(r, 2, row.team_name.as_deref().unwrap_or(""))?;
        sheet.write_string(r, 3, row.apparatus.as_deref().unwrap_or(""))?;
        sheet.write_number(r, 4, row.difficulty)?;
        sheet.write_number(r, 5, row.execution)?;
        sheet.write_number(r, 6, row.deductions)?;
        sheet.write_number(r, 7, row.total)?;
    }

    workbook
        .save(&path)
        .with_context(|| format!("failed to save {}", path.display()))?;
    Ok(path)
}
