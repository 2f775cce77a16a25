//! Application routes
//!
//! Routes carry the Data Service parameters a screen needs (repository ids,
//! encrypted paths) as opaque values; the navigation controller never looks
//! inside them.

use nav_controller::NavController;
use serde::{Deserialize, Serialize};

/// Navigation controller of the main application stack
pub type MainNavController = NavController<MainRoute>;

/// All screens of the main navigation stack
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "route", content = "params")]
pub enum MainRoute {
    /// Repository list
    Repos,
    /// Files of a repository directory
    RepoFiles {
        /// Repository ID
        repo_id: String,
        /// Encrypted path of the directory
        encrypted_path: String,
    },
    /// Details of a single file
    RepoFilesDetails {
        /// Repository ID
        repo_id: String,
        /// Encrypted path of the file
        encrypted_path: String,
    },
    /// Repository info
    RepoInfo {
        /// Repository ID
        repo_id: String,
    },
    /// Repository removal confirmation
    RepoRemove {
        /// Repository ID
        repo_id: String,
    },
    /// Repository creation form
    RepoCreate,
}

impl Default for MainRoute {
    fn default() -> Self {
        MainRoute::Repos
    }
}

impl MainRoute {
    /// Files screen for the root directory of a repository
    pub fn repo_root(repo_id: impl Into<String>) -> Self {
        MainRoute::RepoFiles {
            repo_id: repo_id.into(),
            encrypted_path: "/".to_string(),
        }
    }

    /// Repository the route belongs to, if any
    pub fn repo_id(&self) -> Option<&str> {
        match self {
            MainRoute::RepoFiles { repo_id, .. }
            | MainRoute::RepoFilesDetails { repo_id, .. }
            | MainRoute::RepoInfo { repo_id }
            | MainRoute::RepoRemove { repo_id } => Some(repo_id),
            MainRoute::Repos | MainRoute::RepoCreate => None,
        }
    }

    /// Check if the screen shows decrypted content and needs the
    /// repository unlocked first
    pub fn requires_unlock(&self) -> bool {
        matches!(
            self,
            MainRoute::RepoFiles { .. } | MainRoute::RepoFilesDetails { .. }
        )
    }

    /// Get a display title for this route
    pub fn title(&self) -> &'static str {
        match self {
            MainRoute::Repos => "Safe Boxes",
            MainRoute::RepoFiles { .. } => "Files",
            MainRoute::RepoFilesDetails { .. } => "File",
            MainRoute::RepoInfo { .. } => "Safe Box",
            MainRoute::RepoRemove { .. } => "Destroy Safe Box",
            MainRoute::RepoCreate => "Create Safe Box",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_repo_id() {
        assert_eq!(MainRoute::Repos.repo_id(), None);
        assert_eq!(MainRoute::repo_root("r1").repo_id(), Some("r1"));
        assert_eq!(
            MainRoute::RepoRemove {
                repo_id: "r2".to_string()
            }
            .repo_id(),
            Some("r2")
        );
    }

    #[test]
    fn test_route_requires_unlock() {
        assert!(!MainRoute::Repos.requires_unlock());
        assert!(MainRoute::repo_root("r1").requires_unlock());
        assert!(!MainRoute::RepoInfo {
            repo_id: "r1".to_string()
        }
        .requires_unlock());
    }

    #[test]
    fn test_route_title() {
        assert_eq!(MainRoute::default().title(), "Safe Boxes");
        assert_eq!(MainRoute::RepoCreate.title(), "Create Safe Box");
    }
}
