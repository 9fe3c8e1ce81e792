//! Explicit application state: the session plus a tag-keyed cache of
//! fetched resources.
//!
//! Each cached value is stored under a [`ResourceTag`]. A [`Mutation`] names
//! the tags it makes stale, and [`AppStore::apply`] drops exactly those, so
//! the next read goes back to the backend.

use std::any::Any;
use std::collections::HashMap;

use tracing::debug;

use crate::admin::Session;
use crate::models::Id;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceTag {
    Boards,
    Users,
    Documents,
    Document(Id),
    Jobs,
    Applications,
    Appointments,
    Posts,
    Projects,
    Testimonials,
    Profile,
}

/// A write the client performed against the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    BoardChanged,
    ListChanged,
    CardChanged,
    DocumentCreated,
    DocumentSigned(Id),
    ApplicationReviewed,
    JobApplicationSubmitted,
    AppointmentChanged,
    PostChanged,
    ProjectChanged,
    TestimonialSubmitted,
    ProfileUpdated,
}

impl Mutation {
    pub fn invalidates(&self) -> Vec<ResourceTag> {
        use ResourceTag as T;
        match self {
            Mutation::BoardChanged | Mutation::ListChanged | Mutation::CardChanged => {
                vec![T::Boards]
            }
            Mutation::DocumentCreated => vec![T::Documents],
            Mutation::DocumentSigned(id) => vec![T::Documents, T::Document(*id)],
            Mutation::ApplicationReviewed | Mutation::JobApplicationSubmitted => {
                vec![T::Applications]
            }
            Mutation::AppointmentChanged => vec![T::Appointments],
            Mutation::PostChanged => vec![T::Posts],
            Mutation::ProjectChanged => vec![T::Projects],
            Mutation::TestimonialSubmitted => vec![T::Testimonials],
            // Assignee and author names are rendered from the profile.
            Mutation::ProfileUpdated => vec![T::Profile, T::Users],
        }
    }
}

#[derive(Default)]
pub struct AppStore {
    session: Session,
    entries: HashMap<ResourceTag, Box<dyn Any + Send + Sync>>,
}

impl AppStore {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            entries: HashMap::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn set_session(&mut self, session: Session) {
        self.session = session;
        self.entries.clear();
    }

    /// The cached value for `tag`, if present and of type `T`.
    pub fn read<T: Any + Send + Sync>(&self, tag: ResourceTag) -> Option<&T> {
        self.entries.get(&tag).and_then(|v| v.downcast_ref::<T>())
    }

    pub fn write<T: Any + Send + Sync>(&mut self, tag: ResourceTag, value: T) {
        self.entries.insert(tag, Box::new(value));
    }

    pub fn contains(&self, tag: ResourceTag) -> bool {
        self.entries.contains_key(&tag)
    }

    pub fn invalidate(&mut self, tag: ResourceTag) {
        self.entries.remove(&tag);
    }

    /// Record a completed mutation by dropping every tag it invalidates.
    pub fn apply(&mut self, mutation: Mutation) {
        let tags = mutation.invalidates();
        debug!(?mutation, ?tags, "invalidating");
        for tag in tags {
            self.entries.remove(&tag);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Board;

    fn board(id: Id) -> Board {
        Board {
            id,
            name: format!("Board {}", id),
            lists: vec![],
        }
    }

    #[test]
    fn test_read_back_what_was_written() {
        let mut store = AppStore::default();
        store.write(ResourceTag::Boards, vec![board(1)]);
        let boards = store.read::<Vec<Board>>(ResourceTag::Boards).unwrap();
        assert_eq!(boards.len(), 1);
    }

    #[test]
    fn test_read_with_wrong_type_is_none() {
        let mut store = AppStore::default();
        store.write(ResourceTag::Boards, vec![board(1)]);
        assert!(store.read::<String>(ResourceTag::Boards).is_none());
        assert!(store.contains(ResourceTag::Boards));
    }

    #[test]
    fn test_card_mutation_drops_only_boards() {
        let mut store = AppStore::default();
        store.write(ResourceTag::Boards, vec![board(1)]);
        store.write(ResourceTag::Posts, 3usize);
        store.apply(Mutation::CardChanged);
        assert!(!store.contains(ResourceTag::Boards));
        assert!(store.contains(ResourceTag::Posts));
    }

    #[test]
    fn test_signing_drops_list_and_single_document() {
        let mut store = AppStore::default();
        store.write(ResourceTag::Documents, 1u8);
        store.write(ResourceTag::Document(7), 1u8);
        store.write(ResourceTag::Document(8), 1u8);
        store.apply(Mutation::DocumentSigned(7));
        assert!(!store.contains(ResourceTag::Documents));
        assert!(!store.contains(ResourceTag::Document(7)));
        assert!(store.contains(ResourceTag::Document(8)));
    }

    #[test]
    fn test_changing_session_clears_cache() {
        let mut store = AppStore::default();
        store.write(ResourceTag::Profile, 1u8);
        store.set_session(Session::anonymous());
        assert!(!store.contains(ResourceTag::Profile));
        assert!(!store.session().is_authenticated());
    }
}
