//! The browser session: navigation, action dispatch and view computation.
//!
//! [`Browser`] owns the directory model, the selection, the sort spec and
//! the clipboard, and talks to the file service through the [`Transport`]
//! trait. Hosts embed it behind whatever HTTP client they have; tests
//! drive it with a scripted transport.
//!
//! Responses are applied through [`Browser::apply_response`], which drops
//! any response that no longer matches the most recently requested path.
//! A host that lets several navigations race only ever sees the listing
//! it asked for last.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tracing::debug;

use crate::actions::{compute_actions, ActionId, ActionState};
use crate::clipboard::{Clipboard, ClipboardStore, MemoryClipboardStore};
use crate::config::Config;
use crate::error::{CoreError, CoreResult};
use crate::listing::decode::{action_error, decode_response, Decoded, FileDescriptor, Response};
use crate::listing::model::DirectoryModel;
use crate::path_join;
use crate::select::SelectionModel;
use crate::sort::{sort, SortField, SortSpec};

/// The request side of the file-service protocol.
///
/// Implementations issue the HTTP request and hand back the completed
/// [`Response`]; they never interpret it.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issues a GET to `path` with the given query parameters.
    async fn get(&self, path: &str, params: &[(String, String)]) -> CoreResult<Response>;
    /// Issues a POST to `path` with the given form parameters.
    async fn post(&self, path: &str, params: &[(String, String)]) -> CoreResult<Response>;
}

/// A mutating request against the current directory: the action name and
/// its parameters, in order. Repeated parameter names are allowed (the
/// wire format is a form, not a map).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    action: String,
    params: Vec<(String, String)>,
}

impl ActionRequest {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            params: Vec::new(),
        }
    }

    /// Appends a parameter.
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }
}

/// What a completed action left behind. The refreshed listing is already
/// applied to the model by the time the caller sees this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    /// Set when the service reports a partial failure alongside the
    /// refreshed listing. The model is current either way.
    pub warning: Option<String>,
}

/// The result of applying a navigation response.
#[derive(Debug)]
pub enum NavigationOutcome {
    /// The model now holds the requested directory's listing.
    Listing,
    /// The path was a file; the model is unchanged.
    File(FileDescriptor),
    /// The response was for a path that is no longer the latest request
    /// and was discarded.
    Stale,
}

/// Everything a renderer needs to draw the current directory.
#[derive(Debug)]
pub struct ViewModel {
    pub path: String,
    /// Entry names in display order (directories first, then the sort
    /// spec within each group).
    pub names: Vec<String>,
    /// Number of selected entries.
    pub selected: usize,
    /// Size of the selection, or of the whole listing when nothing is
    /// selected.
    pub total_size: u64,
    pub actions: BTreeMap<ActionId, ActionState>,
}

/// A browsing session against one file service.
#[derive(Debug)]
pub struct Browser<T: Transport, S: ClipboardStore> {
    transport: T,
    config: Config,
    dir: DirectoryModel,
    selection: SelectionModel,
    sort: SortSpec,
    clipboard: Clipboard<S>,
    /// Path of the most recent navigation request; responses for any
    /// other path are stale.
    requested_path: Option<String>,
}

impl<T: Transport> Browser<T, MemoryClipboardStore> {
    /// A session with an in-process clipboard.
    pub fn new(transport: T, config: Config) -> Self {
        Self::with_clipboard(transport, config, MemoryClipboardStore::new())
    }
}

impl<T: Transport, S: ClipboardStore> Browser<T, S> {
    /// A session whose clipboard persists through the given store.
    pub fn with_clipboard(transport: T, config: Config, store: S) -> Self {
        let sort = SortField::from_id(&config.general.default_sort)
            .map(SortSpec::by)
            .unwrap_or_default();
        Self {
            transport,
            config,
            dir: DirectoryModel::default(),
            selection: SelectionModel::new(),
            sort,
            clipboard: Clipboard::new(store),
            requested_path: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn dir(&self) -> &DirectoryModel {
        &self.dir
    }

    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    pub fn sort_spec(&self) -> &SortSpec {
        &self.sort
    }

    /// Navigates to `path`, fetching and applying its listing.
    pub async fn navigate(&mut self, path: &str) -> CoreResult<NavigationOutcome> {
        self.navigate_with(path, &[]).await
    }

    /// Navigates to `path` at a historical revision.
    pub async fn navigate_revision(
        &mut self,
        path: &str,
        revision: u64,
    ) -> CoreResult<NavigationOutcome> {
        self.navigate_with(path, &[("r".to_string(), revision.to_string())])
            .await
    }

    async fn navigate_with(
        &mut self,
        path: &str,
        params: &[(String, String)],
    ) -> CoreResult<NavigationOutcome> {
        let path = path.trim_end_matches('/').to_string();
        self.requested_path = Some(path.clone());
        let service_path = self.service_path(&path);
        let response = self.transport.get(&service_path, params).await?;
        self.apply_response(&path, &response)
    }

    /// Applies a navigation response received for `path`.
    ///
    /// Public so hosts that schedule their own requests can feed late
    /// responses through the same staleness gate [`Browser::navigate`]
    /// uses: if `path` is not the latest requested path the response is
    /// discarded and [`NavigationOutcome::Stale`] returned, with the
    /// model, selection and clipboard untouched.
    pub fn apply_response(
        &mut self,
        path: &str,
        response: &Response,
    ) -> CoreResult<NavigationOutcome> {
        if self.requested_path.as_deref() != Some(path) {
            debug!(path, "discarding stale navigation response");
            return Ok(NavigationOutcome::Stale);
        }
        match decode_response(response)? {
            Decoded::Directory(listing) => {
                self.dir.replace(path, listing);
                self.selection.reconcile(&self.dir);
                Ok(NavigationOutcome::Listing)
            }
            Decoded::File(file) => Ok(NavigationOutcome::File(file)),
        }
    }

    /// Dispatches a mutating action against the current directory and
    /// applies the refreshed listing the service returns.
    ///
    /// A partial failure (some paths processed, some not) is not an
    /// error: the refreshed listing is applied and the service's message
    /// comes back as [`ActionOutcome::warning`].
    pub async fn perform(&mut self, request: ActionRequest) -> CoreResult<ActionOutcome> {
        let path = self.dir.path().to_string();
        let service_path = self.service_path(&path);

        let mut params = Vec::with_capacity(request.params().len() + 1);
        params.push(("action".to_string(), request.action().to_string()));
        params.extend(request.params().iter().cloned());

        let response = self.transport.post(&service_path, &params).await?;
        let warning = action_error(&response);

        match decode_response(&response)? {
            Decoded::Directory(listing) => {
                self.dir.replace(&path, listing);
                self.selection.reconcile(&self.dir);
                Ok(ActionOutcome { warning })
            }
            Decoded::File(_) => Err(CoreError::CorruptResponse(
                "action response was not a directory listing".to_string(),
            )),
        }
    }

    /// The current directory rendered for display.
    pub fn view(&self) -> ViewModel {
        ViewModel {
            path: self.dir.path().to_string(),
            names: sort(self.dir.entries(), &self.sort),
            selected: self.selection.count(),
            total_size: self.selection.total_size(&self.dir),
            actions: compute_actions(&self.dir, &self.selection, &self.config),
        }
    }

    /// Toggles one entry in or out of the selection.
    pub fn toggle_select(&mut self, name: &str) {
        self.selection.toggle(name);
    }

    /// Selects exactly one entry.
    pub fn select_only(&mut self, name: &str) {
        self.selection.select_only(name);
    }

    /// Selects every entry in the listing.
    pub fn select_all(&mut self) {
        let names: Vec<String> = self.dir.entries().keys().cloned().collect();
        self.selection.select_all(names);
    }

    /// Clears the selection.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Responds to the user picking a sort column.
    pub fn choose_sort(&mut self, field: SortField) {
        self.sort.choose(field);
    }

    /// Records the selection on the clipboard for a plain move.
    pub fn cut(&self) -> CoreResult<()> {
        self.clipboard.cut(&self.dir, &self.selection)
    }

    /// Records the selection on the clipboard for a plain copy.
    pub fn copy(&self) -> CoreResult<()> {
        self.clipboard.copy(&self.dir, &self.selection)
    }

    /// Records the selection for a history-preserving move.
    pub fn version_cut(&self) -> CoreResult<()> {
        self.clipboard.version_cut(&self.dir, &self.selection)
    }

    /// Records the selection for a history-preserving copy.
    pub fn version_copy(&self) -> CoreResult<()> {
        self.clipboard.version_copy(&self.dir, &self.selection)
    }

    /// Pastes the clipboard into the current directory.
    ///
    /// The destination check happens before any request goes out: a
    /// history-preserving record against an unversioned directory fails
    /// with [`CoreError::NotVersioned`] without touching the service.
    pub async fn paste(&mut self) -> CoreResult<ActionOutcome> {
        let request = self.clipboard.paste(&self.dir)?;
        self.perform(request).await
    }

    fn service_path(&self, path: &str) -> String {
        path_join(&[&self.config.service.service_app, path])
    }
}
