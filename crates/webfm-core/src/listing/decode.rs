//! Decoding of file-service responses.
//!
//! A completed request is described by a [`Response`] (status, headers,
//! body). [`decode_response`] turns it into either a [`DirectoryListing`]
//! or a [`FileDescriptor`], or a structured error — a non-200 status maps
//! to [`CoreError::RequestFailed`] and a malformed body to
//! [`CoreError::CorruptResponse`], which callers must keep distinct.

use std::collections::BTreeMap;

use percent_encoding::percent_decode_str;
use serde::Deserialize;

use crate::error::{CoreError, CoreResult};
use crate::listing::entry::EntryDescriptor;
use crate::nfc_string;

/// Response-type header: `"Dir"` for a directory listing, `"File"` for
/// raw file contents.
pub const RETURN_HEADER: &str = "x-fileservice-return";
/// Carries the error message when the status is not 200.
pub const RETURN_ERROR_HEADER: &str = "x-fileservice-return-error";
/// Carries a URL-escaped action error, possibly alongside a 200 listing.
pub const ACTION_ERROR_HEADER: &str = "x-fileservice-action-error";

/// A completed HTTP response, as handed over by the transport.
///
/// Header names are stored lowercased so lookups are case-insensitive.
#[derive(Debug, Clone)]
pub struct Response {
    status: u16,
    headers: BTreeMap<String, String>,
    body: Vec<u8>,
}

impl Response {
    /// Creates a response with the given status, no headers and an empty body.
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: BTreeMap::new(),
            body: Vec::new(),
        }
    }

    /// Adds a header. The name is lowercased on insertion.
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Sets the body.
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// The HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// The raw response body.
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

/// A decoded directory listing: the directory's own descriptor, its
/// entries keyed by NFC-normalized name, and the revision when the
/// listing reflects a historical snapshot.
#[derive(Debug, Clone)]
pub struct DirectoryListing {
    pub self_descriptor: EntryDescriptor,
    pub entries: BTreeMap<String, EntryDescriptor>,
    pub revision: Option<u64>,
}

/// Which external viewer a file response should be routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerKind {
    /// Open in the text editor.
    Text,
    /// Show inline as an image.
    Image,
    /// Present a play control.
    Audio,
    /// Offer as a download.
    Binary,
}

/// MIME types whose handler differs from what their first component
/// suggests. Everything else is classified by `text/*`, `image/*`,
/// `audio/*`, falling back to binary.
const HANDLER_OVERRIDES: &[(&str, HandlerKind)] = &[
    ("application/x-javascript", HandlerKind::Text),
    ("application/javascript", HandlerKind::Text),
    ("application/json", HandlerKind::Text),
    ("application/xml", HandlerKind::Text),
];

/// Picks the handler for a MIME type.
pub fn handler_for(mime_type: &str) -> HandlerKind {
    if let Some((_, kind)) = HANDLER_OVERRIDES.iter().find(|(t, _)| *t == mime_type) {
        return *kind;
    }
    match mime_type.split('/').next() {
        Some("text") => HandlerKind::Text,
        Some("image") => HandlerKind::Image,
        Some("audio") => HandlerKind::Audio,
        _ => HandlerKind::Binary,
    }
}

/// A non-directory response: the served file's type and bytes.
#[derive(Debug, Clone)]
pub struct FileDescriptor {
    pub mime_type: String,
    pub body: Vec<u8>,
}

impl FileDescriptor {
    /// The viewer this file should be routed to.
    pub fn handler(&self) -> HandlerKind {
        handler_for(&self.mime_type)
    }
}

/// The two shapes a successful response can take.
#[derive(Debug, Clone)]
pub enum Decoded {
    Directory(DirectoryListing),
    File(FileDescriptor),
}

/// Wire shape of a directory response body.
#[derive(Debug, Deserialize)]
struct WireListing {
    listing: BTreeMap<String, EntryDescriptor>,
    #[serde(default)]
    revision: Option<u64>,
}

/// Decodes a completed response into a listing or a file.
///
/// # Errors
///
/// - [`CoreError::RequestFailed`] when the status is not 200, with the
///   return-error header's value or a generic status description.
/// - [`CoreError::CorruptResponse`] when a directory body is not valid
///   JSON, does not match the listing shape, or lacks the `"."` entry.
pub fn decode_response(response: &Response) -> CoreResult<Decoded> {
    if response.status() != 200 {
        let message = response
            .header(RETURN_ERROR_HEADER)
            .map(str::to_owned)
            .unwrap_or_else(|| format!("server returned status {}", response.status()));
        return Err(CoreError::RequestFailed(message));
    }

    if response.header(RETURN_HEADER) == Some("Dir") {
        decode_directory(response.body()).map(Decoded::Directory)
    } else {
        let mime_type = response
            .header("content-type")
            .unwrap_or("text/plain")
            .to_string();
        Ok(Decoded::File(FileDescriptor {
            mime_type,
            body: response.body().to_vec(),
        }))
    }
}

/// Parses a directory body, splitting the `"."` member off into the
/// directory's own descriptor.
fn decode_directory(body: &[u8]) -> CoreResult<DirectoryListing> {
    let wire: WireListing = serde_json::from_slice(body)
        .map_err(|e| CoreError::CorruptResponse(format!("invalid directory listing: {e}")))?;

    let mut entries = BTreeMap::new();
    let mut self_descriptor = None;
    for (name, entry) in wire.listing {
        if name == "." {
            self_descriptor = Some(entry);
        } else {
            entries.insert(nfc_string(&name), entry);
        }
    }
    let self_descriptor = self_descriptor.ok_or_else(|| {
        CoreError::CorruptResponse("directory listing has no \".\" entry".to_string())
    })?;

    Ok(DirectoryListing {
        self_descriptor,
        entries,
        revision: wire.revision,
    })
}

/// Extracts and unescapes the action-error header, if any.
///
/// The header is set when an action partially failed even though the
/// response itself is a valid 200 listing, so it must be checked
/// independently of [`decode_response`].
pub fn action_error(response: &Response) -> Option<String> {
    let raw = response.header(ACTION_ERROR_HEADER)?;
    Some(percent_decode_str(raw).decode_utf8_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::entry::VersionStatus;

    fn dir_response(body: &str) -> Response {
        Response::new(200)
            .with_header("X-FileService-Return", "Dir")
            .with_body(body.as_bytes().to_vec())
    }

    const SIMPLE_LISTING: &str = r#"{
        "listing": {
            ".": {"isdir": true, "svnstatus": "normal"},
            "frog.py": {"isdir": false, "type": "text/x-python", "size": 10,
                        "svnstatus": "modified"},
            "docs": {"isdir": true, "svnstatus": "normal"}
        }
    }"#;

    #[test]
    fn decode_directory_listing() {
        let decoded = decode_response(&dir_response(SIMPLE_LISTING)).unwrap();
        let Decoded::Directory(listing) = decoded else {
            panic!("expected a directory");
        };
        assert_eq!(listing.entries.len(), 2);
        assert!(listing.entries.contains_key("frog.py"));
        assert!(!listing.entries.contains_key("."));
        assert_eq!(
            listing.self_descriptor.version_status(),
            Some(VersionStatus::Normal)
        );
        assert_eq!(listing.revision, None);
    }

    #[test]
    fn decode_directory_with_revision() {
        let body = r#"{"listing": {".": {"isdir": true, "svnstatus": "revision"}},
                       "revision": 17}"#;
        let Decoded::Directory(listing) = decode_response(&dir_response(body)).unwrap() else {
            panic!("expected a directory");
        };
        assert_eq!(listing.revision, Some(17));
        assert!(listing.entries.is_empty());
    }

    #[test]
    fn decode_file_response() {
        let response = Response::new(200)
            .with_header("X-FileService-Return", "File")
            .with_header("Content-Type", "image/png")
            .with_body(b"\x89PNG".to_vec());
        let Decoded::File(file) = decode_response(&response).unwrap() else {
            panic!("expected a file");
        };
        assert_eq!(file.mime_type, "image/png");
        assert_eq!(file.handler(), HandlerKind::Image);
        assert_eq!(file.body, b"\x89PNG");
    }

    #[test]
    fn decode_file_without_content_type_defaults_to_text() {
        let response = Response::new(200).with_header("X-FileService-Return", "File");
        let Decoded::File(file) = decode_response(&response).unwrap() else {
            panic!("expected a file");
        };
        assert_eq!(file.mime_type, "text/plain");
        assert_eq!(file.handler(), HandlerKind::Text);
    }

    #[test]
    fn non_200_uses_error_header() {
        let response = Response::new(404).with_header(RETURN_ERROR_HEADER, "File not found");
        let err = decode_response(&response).unwrap_err();
        match err {
            CoreError::RequestFailed(msg) => assert_eq!(msg, "File not found"),
            other => panic!("expected RequestFailed, got {other:?}"),
        }
    }

    #[test]
    fn non_200_without_header_uses_status() {
        let err = decode_response(&Response::new(500)).unwrap_err();
        match err {
            CoreError::RequestFailed(msg) => assert!(msg.contains("500")),
            other => panic!("expected RequestFailed, got {other:?}"),
        }
    }

    #[test]
    fn malformed_json_is_corrupt_not_failed() {
        let err = decode_response(&dir_response("{not json")).unwrap_err();
        assert!(matches!(err, CoreError::CorruptResponse(_)));
    }

    #[test]
    fn listing_without_self_entry_is_corrupt() {
        let body = r#"{"listing": {"a.txt": {"isdir": false}}}"#;
        let err = decode_response(&dir_response(body)).unwrap_err();
        assert!(matches!(err, CoreError::CorruptResponse(_)));
    }

    #[test]
    fn entry_names_are_nfc_normalized() {
        // "한" as decomposed Jamo (NFD), as macOS would store it.
        let body = "{\"listing\": {\".\": {\"isdir\": true},
                     \"\u{1112}\u{1161}\u{11ab}.txt\": {\"isdir\": false}}}";
        let Decoded::Directory(listing) = decode_response(&dir_response(body)).unwrap() else {
            panic!("expected a directory");
        };
        assert!(listing.entries.contains_key("한.txt"));
    }

    #[test]
    fn action_error_is_unescaped() {
        let response = Response::new(200)
            .with_header(ACTION_ERROR_HEADER, "Could%20not%20delete%0Atwo%20files");
        assert_eq!(
            action_error(&response).as_deref(),
            Some("Could not delete\ntwo files")
        );
    }

    #[test]
    fn action_error_absent_is_none() {
        assert_eq!(action_error(&Response::new(200)), None);
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let response = Response::new(200).with_header("X-FileService-Return", "Dir");
        assert_eq!(response.header("x-fileservice-return"), Some("Dir"));
        assert_eq!(response.header("X-FILESERVICE-RETURN"), Some("Dir"));
    }

    #[test]
    fn handler_overrides_beat_prefix_rule() {
        assert_eq!(handler_for("application/json"), HandlerKind::Text);
        assert_eq!(handler_for("application/xml"), HandlerKind::Text);
        assert_eq!(handler_for("application/javascript"), HandlerKind::Text);
    }

    #[test]
    fn handler_prefix_classification() {
        assert_eq!(handler_for("text/x-python"), HandlerKind::Text);
        assert_eq!(handler_for("image/gif"), HandlerKind::Image);
        assert_eq!(handler_for("audio/ogg"), HandlerKind::Audio);
        assert_eq!(handler_for("application/octet-stream"), HandlerKind::Binary);
        assert_eq!(handler_for("video/mp4"), HandlerKind::Binary);
    }
}
