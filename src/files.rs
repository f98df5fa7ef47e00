//! File storage flow component

use std::sync::Arc;

use bytes::Bytes;
use dashwrite_account::AccountClient;
use dashwrite_storage::{FileObject, StorageClient};
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::form::FormPhase;
use crate::refresh::{RefreshSequencer, RefreshTicket};

/// One stored file, typed at the adapter boundary.
///
/// Immutable once uploaded; the content bytes live only in the bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub id: String,
    pub name: String,
    pub size_bytes: u64,
}

impl From<FileObject> for FileRecord {
    fn from(object: FileObject) -> Self {
        Self {
            id: object.id,
            name: object.name,
            size_bytes: object.size_original,
        }
    }
}

/// A file picked for upload: its name and content bytes.
#[derive(Debug, Clone)]
pub struct Selection {
    pub file_name: String,
    pub bytes: Bytes,
}

/// Owns the storage view's file list cache and the form state of its
/// mutations.
///
/// Listing is bucket-wide; there is no per-user scoping.
pub struct FileStore {
    account: Arc<AccountClient>,
    storage: StorageClient,
    bucket_id: String,
    files: Vec<FileRecord>,
    form: FormPhase,
    refresh_seq: RefreshSequencer,
}

impl FileStore {
    pub(crate) fn new(account: Arc<AccountClient>, storage: StorageClient, bucket_id: String) -> Self {
        Self {
            account,
            storage,
            bucket_id,
            files: Vec::new(),
            form: FormPhase::default(),
            refresh_seq: RefreshSequencer::default(),
        }
    }

    /// The cached list, in fetch order.
    pub fn list(&self) -> &[FileRecord] {
        &self.files
    }

    /// State of the last mutation, for inline rendering.
    pub fn form(&self) -> &FormPhase {
        &self.form
    }

    fn bucket_client(&self) -> StorageClient {
        match self.account.session_secret() {
            Some(secret) => self.storage.clone().with_session(&secret),
            None => self.storage.clone(),
        }
    }

    /// Issue the ticket for a refresh that is about to start.
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.refresh_seq.issue()
    }

    /// Fetch the bucket listing without touching the cache.
    pub async fn fetch(&self) -> Result<Vec<FileRecord>, Error> {
        let list = self
            .bucket_client()
            .bucket(&self.bucket_id)
            .list_files()
            .await?;

        Ok(list.files.into_iter().map(FileRecord::from).collect())
    }

    /// Apply a completed fetch unless a newer refresh was issued while it
    /// was in flight. Returns whether the result was applied.
    pub fn complete_refresh(&mut self, ticket: RefreshTicket, files: Vec<FileRecord>) -> bool {
        if !self.refresh_seq.is_current(ticket) {
            return false;
        }
        self.files = files;
        true
    }

    /// Fetch and apply in one step.
    pub async fn refresh(&mut self) -> Result<&[FileRecord], Error> {
        let ticket = self.begin_refresh();
        let files = self.fetch().await?;
        self.complete_refresh(ticket, files);
        Ok(&self.files)
    }

    /// Upload the picked file and refresh the listing.
    ///
    /// No selection fails validation before any service call. A refresh
    /// failure after a successful upload is logged and swallowed; the
    /// upload itself already succeeded.
    pub async fn upload(&mut self, selection: Option<Selection>) -> Result<FileRecord, Error> {
        let Some(selection) = selection else {
            self.form.fail("Please select a file to upload.");
            return Err(Error::validation("no file selected"));
        };

        self.form.begin();

        let uploaded = self
            .bucket_client()
            .bucket(&self.bucket_id)
            .create_file(&selection.file_name, selection.bytes)
            .await;

        match uploaded {
            Ok(object) => {
                self.form.succeed("File uploaded successfully!");
                if let Err(err) = self.refresh().await {
                    debug!(%err, "post-upload refresh failed");
                }
                Ok(FileRecord::from(object))
            }
            Err(err) => {
                self.form.fail("Failed to upload the file. Please try again.");
                Err(err.into())
            }
        }
    }

    /// Delete a file and refresh the listing.
    pub async fn remove(&mut self, id: &str) -> Result<(), Error> {
        self.form.begin();

        let deleted = self
            .bucket_client()
            .bucket(&self.bucket_id)
            .delete_file(id)
            .await;

        match deleted {
            Ok(()) => {
                self.form.succeed("File deleted successfully!");
                if let Err(err) = self.refresh().await {
                    debug!(%err, "post-delete refresh failed");
                }
                Ok(())
            }
            Err(err) => {
                self.form.fail("Failed to delete the file. Please try again.");
                Err(err.into())
            }
        }
    }

    /// Resolve the download URL for a browser-native save.
    pub fn download_handle(&self, id: &str) -> Result<Url, Error> {
        Ok(self
            .bucket_client()
            .bucket(&self.bucket_id)
            .download_url(id)?)
    }
}
