//! Screen layout: header, tree pane, detail pane, footer and modals.
//!
//! The row and line builders are pure so they can be tested without a terminal.

use super::app::BrowserApp;
use super::mode::Mode;
use crate::format::{format_path, format_value, stringify};
use crate::tree::{Forest, Node, PathKey, Resolved};
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;
use std::path::Path;

pub const PROGRAM_NAME: &str = "bucketbrowser";

const HELP_LINES: [&str; 20] = [
    "j/↓ k/↑      move down / up",
    "g G          first / last entry",
    "Ctrl-F/B     half page down / up",
    "l/→/Enter    open or close bucket, edit pair",
    "h/←          close bucket or go to parent",
    "J K          scroll detail pane",
    "p P          new pair here / at parent",
    "b B          new bucket here / at parent",
    "e            edit value",
    "r            rename bucket or key",
    "D            delete (asks first)",
    "x            export value to file",
    "X            export as JSON",
    "/            filter pairs by key",
    "O            expand all buckets",
    "Ctrl-R       reload database",
    "?            this help",
    "q/Esc/Ctrl-C quit",
    "",
    "Press any key to close",
];

/// One line of the tree pane
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    pub text: String,
    pub selected: bool,
    pub flagged: bool,
}

/// Tree pane rows in visible order.
pub fn tree_rows(
    forest: &Forest,
    filter: &str,
    cursor: Option<&PathKey>,
    no_value: bool,
) -> Vec<TreeRow> {
    forest
        .visible_rows(filter)
        .into_iter()
        .filter_map(|row| {
            let indent = "  ".repeat(row.depth);
            let (text, flagged) = match forest.node(row.id)? {
                Node::Bucket(bucket) => {
                    let marker = if bucket.expanded { '-' } else { '+' };
                    let mut text = format!("{}{} {}", indent, marker, stringify(bucket.name.as_bytes()));
                    if bucket.error.is_some() {
                        text.push_str(" (!)");
                    }
                    (text, bucket.error.is_some())
                }
                Node::Pair(pair) => {
                    let key = stringify(pair.key.as_bytes());
                    let text = if no_value {
                        format!("{}{}", indent, key)
                    } else {
                        format!("{}{}: {}", indent, key, stringify(&pair.value))
                    };
                    (text, false)
                }
            };
            Some(TreeRow {
                selected: cursor == Some(&row.path),
                text,
                flagged,
            })
        })
        .collect()
}

/// Detail pane content for the node under the cursor.
pub fn detail_lines(forest: &Forest, cursor: Option<&PathKey>) -> Vec<String> {
    let Some(path) = cursor else {
        return Vec::new();
    };
    let mut lines = vec![format!("Path: {}", format_path(path))];
    match forest.resolve(path) {
        Resolved::Bucket(_, bucket) => {
            lines.push(format!("Buckets: {}", bucket.buckets.len()));
            lines.push(format!("Pairs: {}", bucket.pairs.len()));
            if let Some(error) = &bucket.error {
                lines.push(format!("Error: {}", error));
            }
        }
        Resolved::Pair(_, pair) => {
            lines.push(format!("Key: {}", stringify(pair.key.as_bytes())));
            let value = format_value(&pair.value);
            let mut value_lines = value.lines();
            match (value_lines.next(), value_lines.next()) {
                (None, _) => lines.push("Value: ".to_string()),
                (Some(only), None) => lines.push(format!("Value: {}", only)),
                _ => {
                    lines.push("Value:".to_string());
                    lines.extend(value.lines().map(str::to_string));
                }
            }
        }
        Resolved::NotFound => lines.push(format!("Path not found: {}", path)),
    }
    lines
}

/// First tree row to draw so the cursor stays within the top two thirds.
pub fn tree_offset(cursor_row: Option<usize>, pane_rows: usize) -> usize {
    let max_cursor = pane_rows * 2 / 3;
    match cursor_row {
        Some(row) if row > max_cursor => row - max_cursor,
        _ => 0,
    }
}

/// Header text; falls back to the file name when the full path does not fit.
pub fn header_text(file: &Path, width: usize) -> String {
    let full = format!("{}: {}", PROGRAM_NAME, file.display());
    if full.chars().count() <= width {
        return full;
    }
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string());
    format!("{}: {}", PROGRAM_NAME, name)
}

pub fn draw(frame: &mut Frame, app: &mut BrowserApp) {
    let area = frame.area();
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(area);

    let header = Paragraph::new(header_text(app.session().db_path(), area.width as usize))
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(header, header_area);

    let (tree_outer, detail_outer) = if area.width > app.split_width() {
        let [left, right] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(body_area);
        (left, Some(right))
    } else {
        (body_area, None)
    };

    draw_tree(frame, app, tree_outer);
    if let Some(detail_outer) = detail_outer {
        draw_detail(frame, app, detail_outer);
    }

    let footer = Paragraph::new(app.status_text().to_string())
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, footer_area);

    if app.mode() == &Mode::Help {
        draw_help(frame);
    } else if let Some(title) = app.mode().title() {
        draw_modal(frame, app.mode(), &title);
    }
}

fn draw_tree(frame: &mut Frame, app: &mut BrowserApp, outer: Rect) {
    let session = app.session();
    let mut title = vec![Span::styled(
        "BUCKETS",
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if !session.filter().is_empty() {
        title.push(Span::raw("  "));
        title.push(Span::styled(
            format!("filter: {}", session.filter()),
            Style::default().fg(Color::Yellow),
        ));
    }
    if session.is_read_only() {
        title.push(Span::raw("  "));
        title.push(Span::styled("read-only", Style::default().fg(Color::DarkGray)));
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(Line::from(title));
    let inner = block.inner(outer);

    let rows = tree_rows(
        session.forest(),
        session.filter(),
        session.cursor(),
        app.no_value(),
    );
    let cursor_row = rows.iter().position(|r| r.selected);
    let offset = tree_offset(cursor_row, inner.height as usize);
    let lines: Vec<Line> = rows
        .into_iter()
        .map(|row| {
            let style = if row.selected {
                Style::default().fg(Color::Black).bg(Color::Cyan)
            } else if row.flagged {
                Style::default().fg(Color::LightRed)
            } else {
                Style::default()
            };
            Line::from(Span::styled(row.text, style))
        })
        .collect();

    frame.render_widget(block, outer);
    frame.render_widget(
        Paragraph::new(lines).scroll((offset.min(u16::MAX as usize) as u16, 0)),
        inner,
    );
    app.set_page_rows(inner.height as usize);
}

fn draw_detail(frame: &mut Frame, app: &mut BrowserApp, outer: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(Span::styled(
            "DETAIL",
            Style::default().add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(outer);
    let lines = detail_lines(app.session().forest(), app.session().cursor());
    let max_scroll = lines.len().saturating_sub(inner.height as usize);
    app.clamp_detail_scroll(max_scroll.min(u16::MAX as usize) as u16);

    let text: Vec<Line> = lines.into_iter().map(Line::from).collect();
    frame.render_widget(block, outer);
    frame.render_widget(
        Paragraph::new(text)
            .scroll((app.detail_scroll(), 0))
            .wrap(Wrap { trim: false }),
        inner,
    );
}

fn draw_modal(frame: &mut Frame, mode: &Mode, title: &str) {
    let area = frame.area();
    let width_percent = if area.width > 80 { 50 } else { 90 };
    let modal = modal_rect(area, width_percent, 3);
    frame.render_widget(Clear, modal);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::White))
        .title(title.to_string());
    let inner = block.inner(modal);
    frame.render_widget(block, modal);

    match mode.input() {
        Some(input) => {
            let width = (inner.width as usize).max(1);
            let start = (input.caret() + 1).saturating_sub(width);
            let shown: String = input.text().chars().skip(start).take(width).collect();
            frame.render_widget(Paragraph::new(shown), inner);
            let x = inner.x + (input.caret() - start) as u16;
            frame.set_cursor_position(Position::new(x, inner.y));
        }
        None => {
            let text = Paragraph::new("This cannot be undone! (y/N)")
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::LightRed));
            frame.render_widget(text, inner);
        }
    }
}

fn draw_help(frame: &mut Frame) {
    let area = modal_rect(frame.area(), 60, HELP_LINES.len() as u16 + 2);
    frame.render_widget(Clear, area);
    let help = Paragraph::new(HELP_LINES.iter().map(|l| Line::from(*l)).collect::<Vec<_>>())
        .block(
            Block::default()
                .title(format!("{} help", PROGRAM_NAME))
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        );
    frame.render_widget(help, area);
}

fn modal_rect(area: Rect, width_percent: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [column] = Layout::horizontal([Constraint::Percentage(width_percent)])
        .flex(Flex::Center)
        .areas(row);
    column
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Forest {
        let mut forest = Forest::new();
        let a = forest.insert_root("A");
        let b = forest.insert_bucket(a, "B").unwrap();
        forest.insert_pair(b, "inner", b"x".to_vec()).unwrap();
        forest.insert_pair(a, "k", b"{\"n\":1}".to_vec()).unwrap();
        forest.insert_root("C");
        forest
    }

    #[test]
    fn test_tree_rows_markers_and_indent() {
        let mut forest = sample();
        forest.set_expanded(&PathKey::from(["A"]), true).unwrap();
        let cursor = PathKey::from(["A", "k"]);
        let rows = tree_rows(&forest, "", Some(&cursor), false);
        let texts: Vec<&str> = rows.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["- A", "  + B", "  k: {\"n\":1}", "+ C"]);
        assert!(rows[2].selected);
        assert!(!rows[0].selected);

        let rows = tree_rows(&forest, "", None, true);
        assert_eq!(rows[2].text, "  k");
    }

    #[test]
    fn test_flagged_bucket_row() {
        let mut forest = sample();
        let c = forest.root_bucket("C").unwrap();
        forest.flag_bucket(c, "bad value tag");
        let rows = tree_rows(&forest, "", None, false);
        assert_eq!(rows[1].text, "+ C (!)");
        assert!(rows[1].flagged);
        let details = detail_lines(&forest, Some(&PathKey::from(["C"])));
        assert_eq!(details.last().unwrap(), "Error: bad value tag");
    }

    #[test]
    fn test_detail_lines() {
        let forest = sample();
        assert_eq!(
            detail_lines(&forest, Some(&PathKey::from(["A"]))),
            vec!["Path: A", "Buckets: 1", "Pairs: 1"]
        );
        let pair = detail_lines(&forest, Some(&PathKey::from(["A", "B", "inner"])));
        assert_eq!(pair, vec!["Path: A → B → inner", "Key: inner", "Value: x"]);

        let json = detail_lines(&forest, Some(&PathKey::from(["A", "k"])));
        assert_eq!(json[2], "Value:");
        assert_eq!(&json[3..], ["{", "  \"n\": 1", "}"]);
        assert!(detail_lines(&forest, None).is_empty());
    }

    #[test]
    fn test_tree_offset_keeps_cursor_in_top_two_thirds() {
        assert_eq!(tree_offset(None, 30), 0);
        assert_eq!(tree_offset(Some(20), 30), 0);
        assert_eq!(tree_offset(Some(25), 30), 5);
    }

    #[test]
    fn test_header_falls_back_to_file_name() {
        let path = Path::new("/very/long/directory/name/my.db");
        assert_eq!(header_text(path, 200), "bucketbrowser: /very/long/directory/name/my.db");
        assert_eq!(header_text(path, 20), "bucketbrowser: my.db");
    }
}
