//! The loaded audio file and the revocable URL handles that reference it

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Identity of one loaded resource. Monotonic for the whole session, so a
/// task holding an old id can always tell it has gone stale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(pub u64);

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Opaque, revocable reference to an in-memory file
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResourceUrl(String);

impl fmt::Display for ResourceUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The currently loaded, user-supplied audio file
#[derive(Clone, Debug)]
pub struct AudioResource {
    pub id: ResourceId,
    pub name: String,
    pub path: PathBuf,
    pub size_bytes: u64,
    pub mime_type: String,
    pub url: ResourceUrl,
}

impl AudioResource {
    pub fn size_mb(&self) -> f64 {
        self.size_bytes as f64 / 1024.0 / 1024.0
    }
}

/// Mints and revokes [`ResourceUrl`]s.
#[derive(Debug, Default)]
pub struct ObjectUrlRegistry {
    next_id: u64,
    live: HashMap<ResourceUrl, PathBuf>,
}

impl ObjectUrlRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh id and a live URL for `path`.
    pub fn create(&mut self, path: &Path) -> (ResourceId, ResourceUrl) {
        self.next_id += 1;
        let id = ResourceId(self.next_id);
        let url = ResourceUrl(format!("blob:audioviz/{}", self.next_id));
        self.live.insert(url.clone(), path.to_path_buf());
        (id, url)
    }

    /// Returns false if the URL was not live (already revoked or foreign).
    pub fn revoke(&mut self, url: &ResourceUrl) -> bool {
        self.live.remove(url).is_some()
    }

    #[cfg(test)]
    pub fn resolve(&self, url: &ResourceUrl) -> Option<&Path> {
        self.live.get(url).map(PathBuf::as_path)
    }

    #[cfg(test)]
    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_issues_distinct_ids_and_urls() {
        let mut registry = ObjectUrlRegistry::new();
        let (id_a, url_a) = registry.create(Path::new("a.mp3"));
        let (id_b, url_b) = registry.create(Path::new("b.mp3"));

        assert!(id_b > id_a);
        assert_ne!(url_a, url_b);
        assert_eq!(registry.live_count(), 2);
        assert_eq!(registry.resolve(&url_a), Some(Path::new("a.mp3")));
    }

    #[test]
    fn test_revoke_is_idempotent() {
        let mut registry = ObjectUrlRegistry::new();
        let (_, url) = registry.create(Path::new("a.mp3"));

        assert!(registry.revoke(&url));
        assert!(!registry.revoke(&url));
        assert!(registry.resolve(&url).is_none());
        assert_eq!(registry.live_count(), 0);
    }

    #[test]
    fn test_size_mb() {
        let resource = AudioResource {
            id: ResourceId(1),
            name: "a.mp3".to_string(),
            path: PathBuf::from("a.mp3"),
            size_bytes: 3 * 1024 * 1024 + 512 * 1024,
            mime_type: "audio/mpeg".to_string(),
            url: ResourceUrl("blob:audioviz/1".to_string()),
        };
        assert!((resource.size_mb() - 3.5).abs() < f64::EPSILON);
    }
}
