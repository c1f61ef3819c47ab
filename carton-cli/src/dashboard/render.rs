//! Fixed-width terminal rendering of a [`Pivot`]

use colored::*;
use unicode_width::UnicodeWidthStr;

use super::Pivot;
use crate::reconcile::CONTACT_HEADER;

const TOTAL_LABEL: &str = "Total";
const GAP: &str = "  ";

/// Render the pivot with a Total column and a Total row, two decimals
pub fn render_text(pivot: &Pivot, color: bool) -> String {
    if pivot.days.is_empty() {
        return "No \"nombre colonne carton\" day columns found.\n".to_string();
    }

    let row_totals = pivot.row_totals();
    let column_totals = pivot.column_totals();

    let mut header = vec![CONTACT_HEADER.to_string()];
    header.extend(pivot.days.iter().cloned());
    header.push(TOTAL_LABEL.to_string());

    let mut body: Vec<Vec<String>> = pivot
        .contacts
        .iter()
        .zip(&pivot.matrix)
        .zip(&row_totals)
        .map(|((contact, values), total)| {
            let mut line = vec![contact.clone()];
            line.extend(values.iter().map(|v| format!("{:.2}", v)));
            line.push(format!("{:.2}", total));
            line
        })
        .collect();

    let mut footer = vec![TOTAL_LABEL.to_string()];
    footer.extend(column_totals.iter().map(|v| format!("{:.2}", v)));
    footer.push(format!("{:.2}", pivot.grand_total()));
    body.push(footer);

    let widths: Vec<usize> = (0..header.len())
        .map(|c| {
            std::iter::once(&header)
                .chain(body.iter())
                .map(|line| line[c].width())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let header_line = format_line(&header, &widths);
    if color {
        out.push_str(&header_line.bold().cyan().to_string());
    } else {
        out.push_str(&header_line);
    }
    out.push('\n');

    let rule_width = widths.iter().sum::<usize>() + GAP.len() * (widths.len() - 1);
    out.push_str(&"-".repeat(rule_width));
    out.push('\n');

    let last = body.len() - 1;
    for (i, line) in body.iter().enumerate() {
        let text = format_line(line, &widths);
        if color && i == last {
            out.push_str(&text.bold().to_string());
        } else {
            out.push_str(&text);
        }
        out.push('\n');
    }
    out
}

/// First column left-aligned, the rest right-aligned
fn format_line(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(i, (cell, &width))| {
            let pad = " ".repeat(width.saturating_sub(cell.width()));
            if i == 0 {
                format!("{}{}", cell, pad)
            } else {
                format!("{}{}", pad, cell)
            }
        })
        .collect::<Vec<_>>()
        .join(GAP)
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pivot() -> Pivot {
        Pivot {
            days: vec!["2024-01-01".into(), "2024-01-02".into()],
            contacts: vec!["Zoé".into(), "bob".into()],
            matrix: vec![vec![1.0, 0.35], vec![10.0, 0.0]],
        }
    }

    #[test]
    fn test_render_plain_table() {
        let text = render_text(&pivot(), false);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "Contact  2024-01-01  2024-01-02  Total");
        assert_eq!(lines[2], "Zoé            1.00        0.35   1.35");
        assert_eq!(lines[3], "bob           10.00        0.00  10.00");
        assert_eq!(lines[4], "Total         11.00        0.35  11.35");
    }

    #[test]
    fn test_render_without_days() {
        let text = render_text(&Pivot::default(), false);
        assert!(text.contains("No \"nombre colonne carton\" day columns found."));
    }
}
