//! Plain-text renderers. Each returns a `String` so commands decide where it
//! goes and tests can inspect it.

use std::fmt::Write as _;

use console::style;

use crate::kanban::board::Column;
use crate::kanban::table::TaskRow;
use crate::models::{Board, Card, CardStatus, DocumentStatus, StaffDocument};
use crate::pagination::{PageItem, Pagination};
use crate::ui::icons::{BOARD, CHECK, COLUMN, CROSS, DOCUMENT, HOURGLASS, PERSON};

const WRAP_WIDTH: usize = 76;

/// How command results are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputMode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        })
    }
}

impl OutputMode {
    pub fn parse(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

fn status_label(status: CardStatus) -> String {
    let label = status.as_str();
    match status {
        CardStatus::Completed => style(label).green().to_string(),
        CardStatus::InProgress => style(label).cyan().to_string(),
        CardStatus::UnderReview => style(label).magenta().to_string(),
        CardStatus::OnHold => style(label).yellow().to_string(),
        CardStatus::Failed => style(label).red().to_string(),
        CardStatus::NotStarted => style(label).dim().to_string(),
    }
}

fn wrap(text: &str, indent: &str) -> String {
    let options = textwrap::Options::new(WRAP_WIDTH)
        .initial_indent(indent)
        .subsequent_indent(indent);
    textwrap::fill(text, options)
}

fn card_line(card: &Card) -> String {
    let mut line = format!(
        "    #{:<5} {}  [{}]",
        card.id,
        style(&card.title).bold(),
        status_label(card.status)
    );
    if !card.assignees.is_empty() {
        let names: Vec<String> = card.assignees.iter().map(|u| u.display_name()).collect();
        let _ = write!(line, "  {}{}", PERSON, names.join(", "));
    }
    if let Some(due) = card.due_date {
        let _ = write!(line, "  due {}", due);
    }
    line
}

/// One board as columns of cards, in list order.
pub fn render_board(board: &Board, columns: &[Column<'_>]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}{} {}",
        BOARD,
        style(&board.name).bold().underlined(),
        style(format!("(#{}, {} cards)", board.id, board.card_count())).dim()
    );
    for column in columns {
        let _ = writeln!(
            out,
            "\n  {}{} {}",
            COLUMN,
            style(column.name()).bold(),
            style(format!("(list #{}, {})", column.id(), column.cards().len())).dim()
        );
        if column.cards().is_empty() {
            let _ = writeln!(out, "    {}", style("no cards").dim());
        }
        for card in column.cards() {
            let _ = writeln!(out, "{}", card_line(card));
        }
    }
    out
}

pub fn render_board_summary(boards: &[Board]) -> String {
    let mut out = String::new();
    for board in boards {
        let _ = writeln!(
            out,
            "  #{:<5} {:<30} {} lists, {} cards",
            board.id,
            board.name,
            board.lists.len(),
            board.card_count()
        );
    }
    out
}

pub fn render_card(card: &Card) -> String {
    let mut out = card_line(card).trim_start().to_string();
    out.push('\n');
    let _ = writeln!(
        out,
        "  priority {}  progress {}%",
        card.priority.as_str(),
        card.progress_percentage
    );
    if let (Some(est), actual) = (card.estimated_hours, card.actual_hours) {
        let _ = writeln!(
            out,
            "  hours {:.1} estimated, {:.1} logged",
            est,
            actual.unwrap_or(0.0)
        );
    }
    if !card.tags.is_empty() {
        let _ = writeln!(out, "  tags {}", card.tags.join(", "));
    }
    if !card.description.trim().is_empty() {
        let _ = writeln!(out, "\n{}", wrap(&card.description, "  "));
    }
    out
}

pub fn render_task_rows(rows: &[TaskRow]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}",
        style(format!(
            "  {:<6} {:<32} {:<14} {:<16} {}",
            "ID", "TITLE", "STATUS", "BOARD", "ASSIGNEES"
        ))
        .bold()
    );
    for row in rows {
        let title: String = row.card.title.chars().take(32).collect();
        let assignees = row.assignee_names();
        let _ = writeln!(
            out,
            "  {:<6} {:<32} {:<14} {:<16} {}",
            row.card.id,
            title,
            row.card.status.as_str(),
            row.board_name(),
            if assignees.is_empty() {
                "-".to_string()
            } else {
                assignees.join(", ")
            }
        );
    }
    out
}

/// `‹ 1 … 4 [5] 6 … 10 ›` plus the "Showing a–b of n" summary.
pub fn render_pagination(pagination: &Pagination) -> String {
    if pagination.total_pages() <= 1 {
        return pagination.summary();
    }
    let pages: Vec<String> = pagination
        .window()
        .into_iter()
        .map(|item| match item {
            PageItem::Page {
                number,
                active: true,
            } => format!("[{}]", number),
            PageItem::Page { number, .. } => number.to_string(),
            PageItem::Ellipsis => "…".to_string(),
        })
        .collect();
    let prev = if pagination.has_prev() { "< " } else { "" };
    let next = if pagination.has_next() { " >" } else { "" };
    format!("{}   {}{}{}", pagination.summary(), prev, pages.join(" "), next)
}

pub fn document_icon(status: DocumentStatus) -> String {
    match status {
        DocumentStatus::Completed => CHECK.to_string(),
        DocumentStatus::Rejected => CROSS.to_string(),
        DocumentStatus::PendingStaff | DocumentStatus::PendingManager => HOURGLASS.to_string(),
    }
}

pub fn render_document(doc: &StaffDocument) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}{} {}",
        DOCUMENT,
        style(&doc.title).bold(),
        style(format!("[{}]", doc.status.badge())).cyan()
    );
    let _ = writeln!(out, "  staff    {} (#{})", doc.staff.username, doc.staff.id);
    if let Some(manager) = &doc.line_manager {
        let _ = writeln!(out, "  manager  {} (#{})", manager.username, manager.id);
    }
    let signed = |sig: &Option<String>, at: &Option<String>| match (sig, at) {
        (Some(_), Some(at)) => format!("signed {}", at),
        (Some(_), None) => "signed".to_string(),
        _ => "not signed".to_string(),
    };
    let _ = writeln!(
        out,
        "  staff signature    {}",
        signed(&doc.staff_signature, &doc.staff_signed_at)
    );
    let _ = writeln!(
        out,
        "  manager signature  {}",
        signed(&doc.manager_signature, &doc.manager_signed_at)
    );
    if let Some(reason) = &doc.rejection_reason {
        let _ = writeln!(out, "  rejected: {}", style(reason).red());
    }
    for comments in [&doc.staff_comments, &doc.manager_comments]
        .into_iter()
        .flatten()
    {
        let _ = writeln!(out, "{}", wrap(comments, "  > "));
    }
    if !doc.description.trim().is_empty() {
        let _ = writeln!(out, "\n{}", wrap(&doc.description, "  "));
    }
    out
}

/// A long text body wrapped for the terminal.
pub fn render_body(text: &str) -> String {
    wrap(text, "  ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kanban::fake::sample_boards;
    use crate::kanban::table::TaskTable;

    #[test]
    fn test_output_mode_parse() {
        assert_eq!(OutputMode::parse("JSON"), OutputMode::Json);
        assert_eq!(OutputMode::parse("table"), OutputMode::Text);
    }

    #[test]
    fn test_board_lists_every_card() {
        let (boards, _) = sample_boards();
        let board = &boards[0];
        let columns: Vec<Column<'_>> = board.lists.iter().map(Column::new).collect();
        let out = render_board(board, &columns);
        for title in ["Hero banner copy", "Contact form", "Blog layout"] {
            assert!(out.contains(title), "missing {title}");
        }
        assert!(out.contains("Todo"));
        assert!(out.contains("Doing"));
    }

    #[test]
    fn test_task_rows_show_board_names() {
        let (boards, users) = sample_boards();
        let table = TaskTable::new(&boards, &users);
        let out = render_task_rows(table.rows());
        assert!(out.contains("Ops"));
        assert!(out.contains("amy, ben"));
        assert_eq!(out.lines().count(), 5);
    }

    #[test]
    fn test_pagination_marks_active_page() {
        let p = Pagination::new(3, 55, 12);
        let out = render_pagination(&p);
        assert!(out.contains("[3]"));
        assert!(out.contains("Showing 25"));
        assert!(out.contains("< ") && out.ends_with(" >"));
    }

    #[test]
    fn test_pagination_hides_arrows_at_the_ends() {
        let first = render_pagination(&Pagination::new(1, 55, 12));
        assert!(!first.contains('<'));
        assert!(first.ends_with(" >"));

        let last = render_pagination(&Pagination::new(5, 55, 12));
        assert!(last.contains("< "));
        assert!(!last.contains('>'));
    }

    #[test]
    fn test_wrap_indents_every_line() {
        let text = "word ".repeat(40);
        let out = render_body(&text);
        assert!(out.lines().count() > 1);
        assert!(out.lines().all(|l| l.starts_with("  ")));
    }
}
