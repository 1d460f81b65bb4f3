use uuid::Uuid;

use super::{
    notifications::{NoticeKind, Notifications},
    query::{compute_view, ContactFilters, ContactView, DEFAULT_PAGE_SIZE},
    ClientError,
};
use crate::{
    auth::dto::{AuthResponse, PublicUser},
    contacts::repo_types::Contact,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: PublicUser,
}

/// Application state of one browser tab: created on load, torn down on
/// logout, and passed explicitly to whatever needs it.
///
/// List mutations are confirm-then-update: each `contact_*` method takes the
/// record the server returned, never a locally guessed one.
#[derive(Debug)]
pub struct ClientContext {
    session: Option<Session>,
    contacts: Vec<Contact>,
    filters: ContactFilters,
    page: usize,
    page_size: usize,
    pub notifications: Notifications,
}

impl Default for ClientContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientContext {
    pub fn new() -> Self {
        Self {
            session: None,
            contacts: Vec::new(),
            filters: ContactFilters::default(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            notifications: Notifications::default(),
        }
    }

    /// Restores a session persisted by a previous load.
    pub fn restore(session: Session) -> Self {
        let mut ctx = Self::new();
        ctx.session = Some(session);
        ctx
    }

    pub fn sign_in(&mut self, auth: AuthResponse) {
        self.session = Some(Session {
            token: auth.token,
            user: auth.user,
        });
    }

    /// Forgets the session and everything loaded under it. The server is not
    /// involved; the token simply stops being sent.
    pub fn sign_out(&mut self) {
        *self = Self::new();
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn auth_header(&self) -> Option<String> {
        self.session.as_ref().map(|s| format!("Bearer {}", s.token))
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn contacts_loaded(&mut self, contacts: Vec<Contact>) {
        self.contacts = contacts;
    }

    pub fn contact_created(&mut self, contact: Contact) {
        self.contacts.insert(0, contact);
        self.notifications
            .notify(NoticeKind::Success, "Contact created", None);
    }

    pub fn contact_updated(&mut self, contact: Contact) {
        if let Some(slot) = self.contacts.iter_mut().find(|c| c.id == contact.id) {
            *slot = contact;
        }
        self.notifications
            .notify(NoticeKind::Success, "Contact updated", None);
    }

    pub fn contact_deleted(&mut self, id: Uuid) {
        self.contacts.retain(|c| c.id != id);
        self.notifications
            .notify(NoticeKind::Success, "Contact deleted", None);
    }

    /// Surfaces a failed call. A 401 means the token is no longer accepted,
    /// so the session is dropped.
    pub fn request_failed(&mut self, err: &ClientError) {
        if err.is_unauthorized() {
            self.sign_out();
        }
        self.notifications
            .notify(NoticeKind::Error, "Request failed", Some(err.user_message()));
    }

    pub fn filters(&self) -> &ContactFilters {
        &self.filters
    }

    pub fn set_filters(&mut self, filters: ContactFilters) {
        if filters != self.filters {
            self.filters = filters;
            self.page = 1;
        }
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 1;
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.page = page;
    }

    /// Recomputes the visible page and stores back the clamped page number.
    pub fn view(&mut self) -> ContactView {
        let view = compute_view(&self.contacts, &self.filters, self.page, self.page_size);
        self.page = view.current_page;
        view
    }
}
