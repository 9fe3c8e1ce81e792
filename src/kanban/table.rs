//! Flat task table over the cards of every board.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use tracing::{info, warn};

use super::TaskBackend;
use crate::errors::ApiError;
use crate::models::{Board, Card, CardPatch, CardStatus, Id, User};
use crate::notify::{Notifier, Toast};

/// Where a card lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardLocation {
    pub board_id: Id,
    pub board_name: String,
    pub list_id: Id,
    pub list_name: String,
}

/// Card id → board/list, built once per boards snapshot.
#[derive(Debug, Clone, Default)]
pub struct BoardIndex {
    locations: HashMap<Id, CardLocation>,
}

impl BoardIndex {
    pub fn build(boards: &[Board]) -> Self {
        let mut locations = HashMap::new();
        for board in boards {
            for list in &board.lists {
                for card in &list.cards {
                    locations.insert(
                        card.id,
                        CardLocation {
                            board_id: board.id,
                            board_name: board.name.clone(),
                            list_id: list.id,
                            list_name: list.name.clone(),
                        },
                    );
                }
            }
        }
        Self { locations }
    }

    pub fn locate(&self, card_id: Id) -> Option<&CardLocation> {
        self.locations.get(&card_id)
    }

    pub fn board_name(&self, card_id: Id) -> Option<&str> {
        self.locate(card_id).map(|l| l.board_name.as_str())
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskRow {
    pub card: Card,
    pub location: Option<CardLocation>,
}

impl TaskRow {
    pub fn board_name(&self) -> &str {
        self.location
            .as_ref()
            .map(|l| l.board_name.as_str())
            .unwrap_or("-")
    }

    pub fn assignee_names(&self) -> Vec<String> {
        self.card.assignees.iter().map(User::display_name).collect()
    }
}

/// Client-side filters. Every predicate is independent, so applying them is
/// idempotent and order does not matter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilter {
    pub user: Option<Id>,
    pub status: Option<CardStatus>,
    pub search: Option<String>,
}

impl TaskFilter {
    pub fn by_user(user: Id) -> Self {
        Self {
            user: Some(user),
            ..Self::default()
        }
    }

    pub fn by_status(status: CardStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn by_search(term: impl Into<String>) -> Self {
        Self {
            search: Some(term.into()),
            ..Self::default()
        }
    }

    pub fn matches(&self, row: &TaskRow) -> bool {
        if self.user.is_some_and(|user| !row.card.is_assigned_to(user)) {
            return false;
        }
        if self.status.is_some_and(|status| row.card.status != status) {
            return false;
        }
        if let Some(term) = self.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            let term = term.to_lowercase();
            let hit = row.card.title.to_lowercase().contains(&term)
                || row.card.description.to_lowercase().contains(&term)
                || row
                    .card
                    .tags
                    .iter()
                    .any(|t| t.to_lowercase().contains(&term));
            if !hit {
                return false;
            }
        }
        true
    }

    pub fn apply(&self, rows: &[TaskRow]) -> Vec<TaskRow> {
        rows.iter().filter(|r| self.matches(r)).cloned().collect()
    }
}

/// All cards of all boards as table rows, plus the users for the assign
/// control.
#[derive(Debug, Clone, Default)]
pub struct TaskTable {
    rows: Vec<TaskRow>,
    users: Vec<User>,
    index: BoardIndex,
}

impl TaskTable {
    pub fn new(boards: &[Board], users: &[User]) -> Self {
        let index = BoardIndex::build(boards);
        let rows = boards
            .iter()
            .flat_map(|b| b.lists.iter())
            .flat_map(|l| l.cards.iter())
            .map(|card| TaskRow {
                card: card.clone(),
                location: index.locate(card.id).cloned(),
            })
            .collect();
        Self {
            rows,
            users: users.to_vec(),
            index,
        }
    }

    pub fn rows(&self) -> &[TaskRow] {
        &self.rows
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn index(&self) -> &BoardIndex {
        &self.index
    }

    pub fn filter(&self, filter: &TaskFilter) -> Vec<TaskRow> {
        filter.apply(&self.rows)
    }

    pub fn find_user(&self, key: &str) -> Option<&User> {
        let by_id = key.parse::<Id>().ok();
        self.users.iter().find(|u| {
            Some(u.id) == by_id || u.username.eq_ignore_ascii_case(key) || u.email == key
        })
    }

    /// Count of rows per status, in `CardStatus::ALL` order.
    pub fn status_counts(&self) -> Vec<(CardStatus, usize)> {
        CardStatus::ALL
            .iter()
            .map(|s| (*s, self.rows.iter().filter(|r| r.card.status == *s).count()))
            .collect()
    }
}

/// Outcome of one card in a bulk reassignment.
#[derive(Debug)]
pub struct ReassignOutcome {
    pub card_id: Id,
    pub result: Result<(), ApiError>,
}

/// Bulk reassignment across every board.
pub struct TaskAssigner<B: TaskBackend> {
    backend: Arc<B>,
    notifier: Arc<dyn Notifier>,
}

impl<B: TaskBackend> TaskAssigner<B> {
    pub fn new(backend: Arc<B>, notifier: Arc<dyn Notifier>) -> Self {
        Self { backend, notifier }
    }

    /// Move every card assigned to `from` over to `to`, keeping the other
    /// assignees. Calls are issued concurrently; each card reports its own
    /// outcome.
    pub async fn reassign_all(&self, rows: &[TaskRow], from: Id, to: Id) -> Vec<ReassignOutcome> {
        let requests = rows
            .iter()
            .filter(|r| r.card.is_assigned_to(from))
            .map(|row| {
                let mut ids: Vec<Id> = row
                    .card
                    .assignees
                    .iter()
                    .map(|u| u.id)
                    .filter(|id| *id != from)
                    .collect();
                if !ids.contains(&to) {
                    ids.push(to);
                }
                let card_id = row.card.id;
                let backend = self.backend.clone();
                async move {
                    let result = backend
                        .update_card(card_id, &CardPatch::assignees(ids))
                        .await;
                    ReassignOutcome { card_id, result }
                }
            });

        let outcomes = join_all(requests).await;
        let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
        let moved = outcomes.len() - failed;

        if failed == 0 {
            info!(moved, "reassignment complete");
            self.notifier
                .notify(Toast::success(format!("Reassigned {} task(s)", moved)));
        } else {
            warn!(moved, failed, "reassignment partially failed");
            self.notifier.notify(Toast::error(format!(
                "Reassigned {} task(s); {} failed",
                moved, failed
            )));
        }
        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kanban::fake::{Call, FakeTaskBackend, sample_boards};
    use crate::notify::{RecordingNotifier, ToastLevel};

    fn table() -> TaskTable {
        let (boards, users) = sample_boards();
        TaskTable::new(&boards, &users)
    }

    fn ids(rows: &[TaskRow]) -> Vec<Id> {
        rows.iter().map(|r| r.card.id).collect()
    }

    #[test]
    fn test_rows_cover_every_card() {
        let table = table();
        assert_eq!(ids(table.rows()), vec![1, 2, 3, 4]);
        assert_eq!(table.index().len(), 4);
    }

    #[test]
    fn test_index_resolves_board_names() {
        let table = table();
        assert_eq!(table.index().board_name(3), Some("Website"));
        assert_eq!(table.index().board_name(4), Some("Ops"));
        assert_eq!(table.index().board_name(99), None);
        assert_eq!(table.rows()[3].board_name(), "Ops");
    }

    #[test]
    fn test_unlocated_row_shows_dash() {
        let mut row = table().rows()[0].clone();
        row.location = None;
        assert_eq!(row.board_name(), "-");
    }

    #[test]
    fn test_status_filter_returns_exact_subset() {
        let table = table();
        let completed = table.filter(&TaskFilter::by_status(CardStatus::Completed));
        assert_eq!(ids(&completed), vec![2, 4]);
        assert!(completed.iter().all(|r| r.card.status == CardStatus::Completed));
    }

    #[test]
    fn test_status_filter_is_idempotent() {
        let table = table();
        let filter = TaskFilter::by_status(CardStatus::Completed);
        let once = filter.apply(table.rows());
        let twice = filter.apply(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_status_and_search_filters_commute() {
        let table = table();
        let status = TaskFilter::by_status(CardStatus::Completed);
        let search = TaskFilter::by_search("form");
        let a = search.apply(&status.apply(table.rows()));
        let b = status.apply(&search.apply(table.rows()));
        assert_eq!(a, b);
        assert_eq!(ids(&a), vec![2]);

        let combined = TaskFilter {
            status: Some(CardStatus::Completed),
            search: Some("form".into()),
            ..TaskFilter::default()
        };
        assert_eq!(combined.apply(table.rows()), a);
    }

    #[test]
    fn test_user_filter() {
        let table = table();
        assert_eq!(ids(&table.filter(&TaskFilter::by_user(1))), vec![1, 3]);
        assert_eq!(ids(&table.filter(&TaskFilter::by_user(2))), vec![2, 3]);
    }

    #[test]
    fn test_blank_search_matches_everything() {
        let table = table();
        assert_eq!(table.filter(&TaskFilter::by_search("  ")).len(), 4);
    }

    #[test]
    fn test_find_user_by_id_or_name() {
        let table = table();
        assert_eq!(table.find_user("2").map(|u| u.id), Some(2));
        assert_eq!(table.find_user("AMY").map(|u| u.id), Some(1));
        assert!(table.find_user("zed").is_none());
    }

    #[test]
    fn test_status_counts() {
        let counts = table().status_counts();
        assert_eq!(counts[0], (CardStatus::NotStarted, 1));
        assert_eq!(counts[4], (CardStatus::Completed, 2));
    }

    #[tokio::test]
    async fn test_reassign_all_keeps_other_assignees() {
        let (boards, users) = sample_boards();
        let table = TaskTable::new(&boards, &users);
        let backend = Arc::new(FakeTaskBackend::new(boards, users));
        let notifier = Arc::new(RecordingNotifier::new());
        let assigner = TaskAssigner::new(backend.clone(), notifier.clone());

        let outcomes = assigner.reassign_all(table.rows(), 1, 2).await;
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|o| o.result.is_ok()));

        let calls = backend.calls();
        assert!(calls.contains(&Call::UpdateCard(1, CardPatch::assignees(vec![2]))));
        assert!(calls.contains(&Call::UpdateCard(3, CardPatch::assignees(vec![2]))));
        assert_eq!(notifier.last().unwrap().message, "Reassigned 2 task(s)");
    }
}
