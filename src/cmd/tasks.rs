//! Task table commands: `tasks` and `reassign`.

use anyhow::{Context, Result, bail};

use agency_desk::kanban::table::{TaskAssigner, TaskFilter, TaskTable};
use agency_desk::models::{Card, CardStatus};
use agency_desk::pagination::Pagination;
use agency_desk::store::Mutation;
use agency_desk::ui::render::{render_pagination, render_task_rows};

use super::{Desk, print_json};

/// Flags of the `tasks` command.
#[derive(Debug, Clone, Default)]
pub struct TaskQuery {
    pub user: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
    pub page: usize,
    pub per_page: Option<usize>,
}

async fn table(desk: &mut Desk) -> Result<TaskTable> {
    let boards = desk.boards().await?;
    let users = desk.users().await?;
    Ok(TaskTable::new(&boards, &users))
}

pub async fn cmd_tasks(desk: &mut Desk, query: TaskQuery) -> Result<()> {
    desk.require_admin().await?;
    let table = table(desk).await?;

    let user = match &query.user {
        Some(key) => Some(
            table
                .find_user(key)
                .with_context(|| format!("Unknown user '{}'", key))?
                .id,
        ),
        None => None,
    };
    let status = match &query.status {
        Some(s) => Some(s.parse::<CardStatus>().map_err(|e| anyhow::anyhow!(e))?),
        None => None,
    };
    let filter = TaskFilter {
        user,
        status,
        search: query.search.clone(),
    };
    let rows = table.filter(&filter);

    let per_page = desk.page_size(query.per_page);
    let mut pagination = Pagination::new(1, rows.len(), per_page);
    pagination.go_to(query.page);
    let visible = pagination.slice(&rows);

    if desk.is_json() {
        let cards: Vec<&Card> = visible.iter().map(|r| &r.card).collect();
        return print_json(&cards);
    }

    println!();
    if rows.is_empty() {
        println!("No tasks match.");
    } else {
        print!("{}", render_task_rows(visible));
        println!();
        println!("{}", render_pagination(&pagination));
    }

    let counts: Vec<String> = table
        .status_counts()
        .into_iter()
        .filter(|(_, n)| *n > 0)
        .map(|(s, n)| format!("{} {}", n, s))
        .collect();
    if !counts.is_empty() {
        println!("{}", console::style(counts.join(" · ")).dim());
    }
    println!();
    Ok(())
}

pub async fn cmd_reassign(desk: &mut Desk, from: &str, to: &str) -> Result<()> {
    desk.require_admin().await?;
    let table = table(desk).await?;

    let from = table
        .find_user(from)
        .with_context(|| format!("Unknown user '{}'", from))?;
    let to = table
        .find_user(to)
        .with_context(|| format!("Unknown user '{}'", to))?;
    if from.id == to.id {
        bail!("--from and --to are the same user");
    }

    let affected = table.filter(&TaskFilter::by_user(from.id));
    if affected.is_empty() {
        println!("{} has no assigned tasks.", from.display_name());
        return Ok(());
    }
    if !desk.confirm(
        &format!(
            "Reassign {} task(s) from {} to {}?",
            affected.len(),
            from.display_name(),
            to.display_name()
        ),
        false,
    ) {
        println!("Cancelled.");
        return Ok(());
    }

    let assigner = TaskAssigner::new(desk.client.clone(), desk.notifier.clone());
    let outcomes = assigner.reassign_all(table.rows(), from.id, to.id).await;
    desk.mutated(Mutation::CardChanged);

    let failed: Vec<_> = outcomes.iter().filter(|o| o.result.is_err()).collect();
    for outcome in &failed {
        if let Err(err) = &outcome.result {
            eprintln!("  card #{}: {}", outcome.card_id, err.toast_message());
        }
    }
    if !failed.is_empty() {
        bail!("{} of {} reassignments failed", failed.len(), outcomes.len());
    }
    Ok(())
}
