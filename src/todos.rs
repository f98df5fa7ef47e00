//! Todo list flow component

use std::sync::Arc;

use dashwrite_account::AccountClient;
use dashwrite_databases::{DatabasesClient, Document};
use serde_json::json;

use crate::error::Error;
use crate::form::FormPhase;
use crate::refresh::{RefreshSequencer, RefreshTicket};

/// One todo record, typed at the adapter boundary.
///
/// `owner_email` is set at creation and never changes; identity is the
/// service-assigned id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoItem {
    pub id: String,
    pub owner_email: String,
    pub text: String,
}

impl TodoItem {
    fn from_document(document: &Document) -> Result<Self, Error> {
        let text = document
            .attr_str("todo")
            .ok_or_else(|| Error::service(format!("document {} has no 'todo' attribute", document.id)))?;
        let owner_email = document.attr_str("email").unwrap_or_default();

        Ok(Self {
            id: document.id.clone(),
            owner_email: owner_email.to_string(),
            text: text.to_string(),
        })
    }
}

/// Owns the dashboard's todo list cache and the form state of its
/// mutations.
///
/// The cache is refreshed explicitly; there is no push mechanism. The
/// whole collection is fetched without an owner filter, matching the
/// deployed behavior of the dashboard.
pub struct TodoStore {
    account: Arc<AccountClient>,
    databases: DatabasesClient,
    database_id: String,
    collection_id: String,
    items: Vec<TodoItem>,
    form: FormPhase,
    refresh_seq: RefreshSequencer,
}

impl TodoStore {
    pub(crate) fn new(
        account: Arc<AccountClient>,
        databases: DatabasesClient,
        database_id: String,
        collection_id: String,
    ) -> Self {
        Self {
            account,
            databases,
            database_id,
            collection_id,
            items: Vec::new(),
            form: FormPhase::default(),
            refresh_seq: RefreshSequencer::default(),
        }
    }

    /// The cached list, in fetch/append order.
    pub fn list(&self) -> &[TodoItem] {
        &self.items
    }

    /// State of the last mutation, for inline rendering.
    pub fn form(&self) -> &FormPhase {
        &self.form
    }

    // Re-derive an authed client so a login that happened after this
    // store was built is picked up.
    fn collection_client(&self) -> DatabasesClient {
        match self.account.session_secret() {
            Some(secret) => self.databases.clone().with_session(&secret),
            None => self.databases.clone(),
        }
    }

    /// Issue the ticket for a refresh that is about to start.
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.refresh_seq.issue()
    }

    /// Fetch the collection without touching the cache.
    pub async fn fetch(&self) -> Result<Vec<TodoItem>, Error> {
        let list = self
            .collection_client()
            .collection(&self.database_id, &self.collection_id)
            .list_documents()
            .await?;

        list.documents.iter().map(TodoItem::from_document).collect()
    }

    /// Apply a completed fetch unless a newer refresh was issued while it
    /// was in flight. Returns whether the result was applied.
    pub fn complete_refresh(&mut self, ticket: RefreshTicket, items: Vec<TodoItem>) -> bool {
        if !self.refresh_seq.is_current(ticket) {
            return false;
        }
        self.items = items;
        true
    }

    /// Fetch and apply in one step.
    pub async fn refresh(&mut self) -> Result<&[TodoItem], Error> {
        let ticket = self.begin_refresh();
        let items = self.fetch().await?;
        self.complete_refresh(ticket, items);
        Ok(&self.items)
    }

    /// Create a todo owned by `owner_email`.
    ///
    /// Empty or whitespace-only text fails validation before any service
    /// call and leaves the cache untouched. On success the item is
    /// appended to the cache.
    pub async fn add(&mut self, owner_email: &str, text: &str) -> Result<TodoItem, Error> {
        if text.trim().is_empty() {
            self.form.fail("Please enter a valid TODO item.");
            return Err(Error::validation("todo text cannot be empty"));
        }

        self.form.begin();

        let created = self
            .collection_client()
            .collection(&self.database_id, &self.collection_id)
            .create_document(&json!({ "email": owner_email, "todo": text }))
            .await;

        match created.map_err(Error::from).and_then(|document| TodoItem::from_document(&document)) {
            Ok(item) => {
                self.items.push(item.clone());
                self.form.succeed("Todo added successfully!");
                Ok(item)
            }
            Err(err) => {
                self.form.fail("Failed to add todo.");
                Err(err)
            }
        }
    }

    /// Replace the text of the todo with this id.
    pub async fn edit(&mut self, id: &str, new_text: &str) -> Result<TodoItem, Error> {
        self.form.begin();

        let updated = self
            .collection_client()
            .collection(&self.database_id, &self.collection_id)
            .update_document(id, &json!({ "todo": new_text }))
            .await;

        match updated.map_err(Error::from).and_then(|document| TodoItem::from_document(&document)) {
            Ok(item) => {
                if let Some(slot) = self.items.iter_mut().find(|existing| existing.id == id) {
                    *slot = item.clone();
                }
                self.form.succeed("Todo updated successfully!");
                Ok(item)
            }
            Err(err) => {
                self.form.fail("Failed to update todo.");
                Err(err)
            }
        }
    }

    /// Delete the todo with this id.
    pub async fn remove(&mut self, id: &str) -> Result<(), Error> {
        self.form.begin();

        let deleted = self
            .collection_client()
            .collection(&self.database_id, &self.collection_id)
            .delete_document(id)
            .await;

        match deleted {
            Ok(()) => {
                self.items.retain(|existing| existing.id != id);
                self.form.succeed("Todo deleted successfully!");
                Ok(())
            }
            Err(err) => {
                self.form.fail("Failed to delete todo.");
                Err(err.into())
            }
        }
    }
}
