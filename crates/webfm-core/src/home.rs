//! The composite home view.
//!
//! The home directory is not shown as a plain listing: enrollment data is
//! spliced over it. Each enrolled subject contributes a personal
//! workspace and one area per group, plus the catch-all "stuff" area, and
//! the matching top-level names are removed from the base listing so they
//! do not appear twice.
//!
//! Every area is probed with its own sub-listing request. The probes are
//! independent: they share no mutable state, tolerate any completion
//! order, and a failed probe only marks its own area as missing.

use futures::future::join_all;
use tracing::{debug, warn};

use crate::config::{HomeConfig, ServiceConfig};
use crate::error::{CoreError, CoreResult};
use crate::listing::decode::{decode_response, Decoded};
use crate::listing::model::DirectoryModel;
use crate::path_join;
use crate::service::Transport;

/// One subject the user is enrolled in.
#[derive(Debug, Clone)]
pub struct Enrollment {
    /// Short name, which is also the subject's directory name.
    pub subject_short: String,
    /// Full display name.
    pub subject_name: String,
    /// Names of the user's groups within the subject.
    pub groups: Vec<String>,
}

/// A synthesized home-view list item, before probing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeArea {
    /// Section heading (the subject's full name, or "Stuff").
    pub heading: String,
    /// The name shown for the item itself.
    pub label: String,
    /// Path of the workspace relative to the home directory.
    pub local_path: String,
    /// Path of the backing directory relative to the repository root.
    /// Differs from `local_path` for personal workspaces: the repository
    /// has no personal-directory level.
    pub repo_path: String,
    pub description: String,
}

/// What probing an area found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AreaStatus {
    /// Present and under version control; link straight to it.
    Linked,
    /// Present but not versioned; the name is in the way and the host
    /// should offer a rename.
    Blocked,
    /// Absent (or unreadable); the host should offer provisioning.
    Missing,
}

/// An area together with its probed status.
#[derive(Debug, Clone)]
pub struct HomeItem {
    pub area: HomeArea,
    pub status: AreaStatus,
}

/// Synthesizes the list of home areas from the user's enrollments.
pub fn plan(enrollments: &[Enrollment], home: &HomeConfig) -> Vec<HomeArea> {
    let mut areas = Vec::new();
    for enrollment in enrollments {
        areas.push(HomeArea {
            heading: enrollment.subject_name.clone(),
            label: home.personal_dir.clone(),
            local_path: path_join(&[&enrollment.subject_short, &home.personal_dir]),
            // The repository has no personal-directory level.
            repo_path: enrollment.subject_short.clone(),
            description: "Your own files in this subject".to_string(),
        });
        for group in &enrollment.groups {
            areas.push(HomeArea {
                heading: enrollment.subject_name.clone(),
                label: group.clone(),
                local_path: path_join(&[&enrollment.subject_short, group]),
                repo_path: path_join(&[&enrollment.subject_short, group]),
                description: "Shared files for your group".to_string(),
            });
        }
    }
    areas.push(HomeArea {
        heading: "Stuff".to_string(),
        label: home.stuff_dir.clone(),
        local_path: home.stuff_dir.clone(),
        repo_path: home.stuff_dir.clone(),
        description: "Your own files not related to a subject".to_string(),
    });
    areas
}

/// The base-listing names left over once the synthesized areas cover
/// their top-level directories; shown as a plain "junk" section.
pub fn leftover_names(
    dir: &DirectoryModel,
    enrollments: &[Enrollment],
    home: &HomeConfig,
) -> Vec<String> {
    dir.entries()
        .keys()
        .filter(|name| {
            name.as_str() != home.stuff_dir
                && !enrollments.iter().any(|e| e.subject_short == **name)
        })
        .cloned()
        .collect()
}

/// Probes one area's backing directory.
///
/// Never fails: a request or decode error means the directory is not
/// there to browse, which is exactly [`AreaStatus::Missing`].
pub async fn probe<T: Transport>(
    transport: &T,
    service: &ServiceConfig,
    home_path: &str,
    area: &HomeArea,
) -> AreaStatus {
    let path = path_join(&[&service.service_app, home_path, &area.local_path]);
    let response = match transport.get(&path, &[]).await {
        Ok(response) => response,
        Err(e) => {
            debug!(path, error = %e, "home area probe failed");
            return AreaStatus::Missing;
        }
    };
    match decode_response(&response) {
        Ok(Decoded::Directory(listing)) => {
            if listing.self_descriptor.is_versioned() {
                AreaStatus::Linked
            } else {
                AreaStatus::Blocked
            }
        }
        // A file where a workspace should be also blocks the name.
        Ok(Decoded::File(_)) => AreaStatus::Blocked,
        Err(e) => {
            debug!(path, error = %e, "home area probe failed");
            AreaStatus::Missing
        }
    }
}

/// Probes every area concurrently, preserving the input order.
pub async fn probe_all<T: Transport>(
    transport: &T,
    service: &ServiceConfig,
    home_path: &str,
    areas: Vec<HomeArea>,
) -> Vec<HomeItem> {
    let probes = areas
        .iter()
        .map(|area| probe(transport, service, home_path, area));
    let statuses = join_all(probes).await;
    areas
        .into_iter()
        .zip(statuses)
        .map(|(area, status)| HomeItem { area, status })
        .collect()
}

/// Provisions a missing area: stats the repository directory, creates it
/// there if absent, then checks it out into place.
///
/// All three requests are actions POSTed against the home directory.
///
/// # Errors
///
/// [`CoreError::RequestFailed`] when the repository directory can be
/// neither found nor created, or the checkout fails.
pub async fn provision<T: Transport>(
    transport: &T,
    service: &ServiceConfig,
    home_path: &str,
    area: &HomeArea,
) -> CoreResult<()> {
    let service_path = path_join(&[&service.service_app, home_path]);
    let repo_path = path_join(&[home_path, &area.repo_path]);

    let stat = transport
        .post(
            &service_path,
            &[
                ("action".to_string(), "svnrepostat".to_string()),
                ("path".to_string(), repo_path.clone()),
            ],
        )
        .await?;
    match stat.status() {
        200 => {}
        404 => {
            let made = transport
                .post(
                    &service_path,
                    &[
                        ("action".to_string(), "svnrepomkdir".to_string()),
                        ("path".to_string(), repo_path.clone()),
                        (
                            "logmsg".to_string(),
                            format!("Automated creation of '{repo_path}' work directory"),
                        ),
                    ],
                )
                .await?;
            if made.status() != 200 {
                warn!(repo_path, status = made.status(), "repository mkdir failed");
                return Err(CoreError::RequestFailed(format!(
                    "could not create repository directory '{repo_path}'"
                )));
            }
        }
        status => {
            return Err(CoreError::RequestFailed(format!(
                "repository stat of '{repo_path}' returned status {status}"
            )));
        }
    }

    let checkout = transport
        .post(
            &service_path,
            &[
                ("action".to_string(), "svncheckout".to_string()),
                ("path".to_string(), repo_path),
                ("path".to_string(), area.local_path.clone()),
            ],
        )
        .await?;
    decode_response(&checkout).map(|_| ())
}
