use crate::sheet::model::SheetData;

/// Rows included in the analysis preview. Bounds the prompt size for long sheets.
pub const PREVIEW_ROW_LIMIT: usize = 100;

/// First `limit` rows, values in header order joined by `,`, one row per line.
pub fn build_preview(sheet: &SheetData, limit: usize) -> String {
    sheet
        .rows
        .iter()
        .take(limit)
        .map(|row| sheet.row_values(row).collect::<Vec<_>>().join(","))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Full prompt sent to the analysis model.
pub fn build_prompt(sheet: &SheetData) -> String {
    let columns = sheet.labels().collect::<Vec<_>>().join(", ");
    let preview = build_preview(sheet, PREVIEW_ROW_LIMIT);

    format!(
        "You are an expert Animation Director assistant.
Analyze the following CSV data representing an animation X-Sheet (Exposure Sheet / 律表).
The columns are: {columns}.

Data Preview (First {PREVIEW_ROW_LIMIT} frames):
{preview}

Please provide a concise analysis:
1. **Timing Overview**: What is the pace? (e.g., on ones, twos, holds).
2. **Action Density**: Which layers (cells) are most active?
3. **Scene Description**: Guess the nature of the motion based on the cell numbering patterns (e.g., is it a loop, a linear action, lip sync?).

Format the output in Markdown. Keep it encouraging and professional.
"
    )
}

#[cfg(test)]
#[path = "../../tests/unit/analysis/prompt.rs"]
mod tests;
