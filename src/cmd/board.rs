//! Kanban commands: `board`, `list` and `card`.
//!
//! Each invocation loads the boards through `KanbanBoard`, applies one
//! mutation, and renders the re-fetched tree.

use anyhow::{Context, Result, bail};

use agency_desk::ApiClient;
use agency_desk::kanban::board::KanbanBoard;
use agency_desk::kanban::table::TaskTable;
use agency_desk::models::{CardStatus, Id, NewCard, Priority};
use agency_desk::store::Mutation;
use agency_desk::ui::render::{render_board, render_board_summary, render_card};
use agency_desk::ui::spinner::with_spinner;

use super::super::{BoardCommands, CardCommands, ListCommands};
use super::{Desk, print_json};

async fn load(desk: &mut Desk) -> Result<KanbanBoard<ApiClient>> {
    let mut kanban = KanbanBoard::new(desk.client.clone(), desk.notifier.clone());
    with_spinner("Loading boards...", kanban.refresh()).await?;
    Ok(kanban)
}

fn show_board(desk: &Desk, kanban: &KanbanBoard<ApiClient>, board_id: Id) -> Result<()> {
    let board = kanban
        .board(board_id)
        .with_context(|| format!("Board {} not found", board_id))?;
    if desk.is_json() {
        return print_json(board);
    }
    println!();
    print!("{}", render_board(board, &kanban.columns(board_id)));
    println!();
    Ok(())
}

fn show_card(desk: &Desk, kanban: &KanbanBoard<ApiClient>, card_id: Id) -> Result<()> {
    let (_, _, card) = kanban
        .find_card(card_id)
        .with_context(|| format!("Card {} not found", card_id))?;
    if desk.is_json() {
        return print_json(card);
    }
    println!();
    print!("{}", render_card(card));
    println!();
    Ok(())
}

pub async fn cmd_board(desk: &mut Desk, command: BoardCommands) -> Result<()> {
    desk.require_admin().await?;
    let mut kanban = load(desk).await?;

    match command {
        BoardCommands::List => {
            if desk.is_json() {
                return print_json(kanban.boards());
            }
            println!();
            if kanban.boards().is_empty() {
                println!("No boards yet. Create one with 'agency-desk board create <name>'.");
            } else {
                print!("{}", render_board_summary(kanban.boards()));
            }
            println!();
        }
        BoardCommands::Show { id, order } => {
            if let Err(list_id) = kanban.order_lists(id, &order) {
                bail!("List {} is not on board {}", list_id, id);
            }
            show_board(desk, &kanban, id)?;
        }
        BoardCommands::Create { name } => {
            let board = kanban.create_board(&name).await?;
            desk.mutated(Mutation::BoardChanged);
            show_board(desk, &kanban, board.id)?;
        }
        BoardCommands::Delete { id, force } => {
            let name = kanban
                .board(id)
                .map(|b| b.name.clone())
                .with_context(|| format!("Board {} not found", id))?;
            if !desk.confirm(
                &format!("Delete board '{}' with all its lists and cards?", name),
                force,
            ) {
                println!("Cancelled.");
                return Ok(());
            }
            kanban.delete_board(id).await?;
            desk.mutated(Mutation::BoardChanged);
        }
    }
    Ok(())
}

pub async fn cmd_list(desk: &mut Desk, command: ListCommands) -> Result<()> {
    desk.require_admin().await?;
    let mut kanban = load(desk).await?;

    match command {
        ListCommands::Create { board, name } => {
            if kanban.board(board).is_none() {
                bail!("Board {} not found", board);
            }
            kanban.create_list(board, &name).await?;
            desk.mutated(Mutation::ListChanged);
            show_board(desk, &kanban, board)?;
        }
        ListCommands::Delete { id, force } => {
            let Some((board_id, name, cards)) = kanban.boards().iter().find_map(|b| {
                b.lists
                    .iter()
                    .find(|l| l.id == id)
                    .map(|l| (b.id, l.name.clone(), l.cards.len()))
            }) else {
                bail!("List {} not found", id);
            };
            if !desk.confirm(
                &format!("Delete list '{}' and its {} card(s)?", name, cards),
                force,
            ) {
                println!("Cancelled.");
                return Ok(());
            }
            kanban.delete_list(id).await?;
            desk.mutated(Mutation::ListChanged);
            show_board(desk, &kanban, board_id)?;
        }
    }
    Ok(())
}

fn parse_status(status: &str) -> Result<CardStatus> {
    status.parse::<CardStatus>().map_err(|e| {
        let options: Vec<&str> = CardStatus::ALL.iter().map(|s| s.as_str()).collect();
        anyhow::anyhow!("{} (expected one of: {})", e, options.join(", "))
    })
}

pub async fn cmd_card(desk: &mut Desk, command: CardCommands) -> Result<()> {
    desk.require_admin().await?;
    let mut kanban = load(desk).await?;

    match command {
        CardCommands::Show { id } => show_card(desk, &kanban, id)?,
        CardCommands::Add {
            list,
            title,
            description,
            priority,
            due,
        } => {
            let mut card = NewCard::new(list, title);
            card.description = description.unwrap_or_default();
            if let Some(priority) = priority {
                card.priority = priority
                    .parse::<Priority>()
                    .map_err(|e| anyhow::anyhow!(e))?;
            }
            if let Some(due) = due {
                card.due_date = Some(
                    chrono::NaiveDate::parse_from_str(&due, "%Y-%m-%d")
                        .with_context(|| format!("Invalid due date '{}', expected YYYY-MM-DD", due))?,
                );
            }
            let created = kanban.add_card(card).await?;
            desk.mutated(Mutation::CardChanged);
            if let Some((board, _, _)) = kanban.find_card(created.id) {
                show_board(desk, &kanban, board.id)?;
            }
        }
        CardCommands::Move { id, to } => {
            kanban.move_card(id, to).await?;
            desk.mutated(Mutation::CardChanged);
            if let Some((board, _, _)) = kanban.find_card(id) {
                show_board(desk, &kanban, board.id)?;
            }
        }
        CardCommands::Delete { id, force } => {
            let title = kanban
                .find_card(id)
                .map(|(_, _, c)| c.title.clone())
                .with_context(|| format!("Card {} not found", id))?;
            if !desk.confirm(&format!("Delete card '{}'?", title), force) {
                println!("Cancelled.");
                return Ok(());
            }
            kanban.delete_card(id).await?;
            desk.mutated(Mutation::CardChanged);
        }
        CardCommands::Assign { id, users } => {
            let all_users = desk.users().await?;
            let table = TaskTable::new(kanban.boards(), &all_users);
            let mut ids = Vec::with_capacity(users.len());
            for key in &users {
                let user = table
                    .find_user(key)
                    .with_context(|| format!("Unknown user '{}'", key))?;
                ids.push(user.id);
            }
            kanban.assign(id, ids).await?;
            desk.mutated(Mutation::CardChanged);
            show_card(desk, &kanban, id)?;
        }
        CardCommands::Status { id, status } => {
            let status = parse_status(&status)?;
            kanban.set_status(id, status).await?;
            desk.mutated(Mutation::CardChanged);
            show_card(desk, &kanban, id)?;
        }
    }
    Ok(())
}
