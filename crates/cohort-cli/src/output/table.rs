#[derive(Clone, Copy, Debug)]
pub struct TableOptions {
    pub max_width: Option<usize>,
    pub color: bool,
}

const MIN_COLUMN: usize = 6;

/// Render an aligned table for string rows.
#[must_use]
pub fn render_table(headers: &[&str], rows: &[Vec<String>], options: TableOptions) -> String {
    let mut widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            rows.iter()
                .filter_map(|row| row.get(index))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
                .max(header.len())
                .max(MIN_COLUMN)
        })
        .collect();

    if let Some(max_width) = options.max_width {
        shrink_to_fit(&mut widths, headers, max_width);
    }

    let header_line = headers
        .iter()
        .zip(&widths)
        .map(|(header, width)| pad(&truncate(header, *width), *width, 0))
        .collect::<Vec<_>>()
        .join("  ");

    let mut lines = vec![header_line.clone(), "-".repeat(header_line.chars().count())];
    for row in rows {
        let line = widths
            .iter()
            .enumerate()
            .map(|(index, width)| {
                let cell = truncate(row.get(index).map_or("-", String::as_str), *width);
                let visible = cell.chars().count();
                let cell = if options.color {
                    colorize_state(&cell)
                } else {
                    cell
                };
                pad(&cell, *width, visible)
            })
            .collect::<Vec<_>>()
            .join("  ");
        lines.push(line);
    }
    lines.join("\n")
}

/// Narrow the widest column one character at a time until the row fits.
fn shrink_to_fit(widths: &mut [usize], headers: &[&str], max_width: usize) {
    let separators = widths.len().saturating_sub(1) * 2;
    while widths.iter().sum::<usize>() + separators > max_width {
        let widest = widths
            .iter()
            .enumerate()
            .filter(|(idx, width)| **width > headers[*idx].len().max(MIN_COLUMN))
            .max_by_key(|(_, width)| **width)
            .map(|(idx, _)| idx);
        match widest {
            Some(idx) => widths[idx] -= 1,
            None => break,
        }
    }
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut out: String = value.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Left-align `value` in `width` columns. `visible` is the printable length
/// when `value` carries ANSI codes, or 0 to count `value` itself.
fn pad(value: &str, width: usize, visible: usize) -> String {
    let len = if visible == 0 {
        value.chars().count()
    } else {
        visible
    };
    format!("{value}{}", " ".repeat(width.saturating_sub(len)))
}

fn colorize_state(value: &str) -> String {
    let code = match value {
        "active" | "approved" | "true" => Some("32"),
        "pending" | "paused" => Some("33"),
        "deactivated" | "false" => Some("31"),
        _ => None,
    };
    match code {
        Some(code) => format!("\u{1b}[{code}m{value}\u{1b}[0m"),
        None => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_long_cells_with_ellipsis() {
        assert_eq!(truncate("abcdefgh", 5), "abcd…");
        assert_eq!(truncate("abc", 5), "abc");
    }

    #[test]
    fn shrinks_widest_column_first() {
        let mut widths = vec![6, 30, 10];
        shrink_to_fit(&mut widths, &["id", "name", "state"], 40);
        assert_eq!(widths, vec![6, 20, 10]);
    }

    #[test]
    fn colored_cells_keep_alignment() {
        let rows = vec![vec!["active".to_string(), "x".to_string()]];
        let colored = render_table(
            &["state", "name"],
            &rows,
            TableOptions {
                max_width: None,
                color: true,
            },
        );
        let plain = render_table(
            &["state", "name"],
            &rows,
            TableOptions {
                max_width: None,
                color: false,
            },
        );
        let strip = colored.replace("\u{1b}[32m", "").replace("\u{1b}[0m", "");
        assert_eq!(strip, plain);
    }
}
