//! Global workspace registry (`<home>/workspaces.json`).

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::ids;
use crate::model::Workspace;
use crate::storage::{self, WORKSPACES_FILE};

/// Registry of every known workspace, active or archived
#[derive(Debug, Clone)]
pub struct WorkspaceStore {
    home: PathBuf,
}

impl WorkspaceStore {
    pub fn new(home: impl AsRef<Path>) -> Self {
        Self {
            home: home.as_ref().to_path_buf(),
        }
    }

    pub fn registry_file(&self) -> PathBuf {
        self.home.join(WORKSPACES_FILE)
    }

    /// All workspaces in registry order (empty if the file does not exist)
    pub fn load(&self) -> Result<Vec<Workspace>> {
        storage::read_collection(&self.registry_file())
    }

    pub fn save(&self, workspaces: &[Workspace]) -> Result<()> {
        storage::write_json(&self.registry_file(), workspaces)
    }

    pub fn find(&self, id: u32) -> Result<Option<Workspace>> {
        Ok(self.load()?.into_iter().find(|ws| ws.id == id))
    }

    /// Look up a workspace by directory, comparing normalised absolute paths
    pub fn find_by_path(&self, path: &Path) -> Result<Option<Workspace>> {
        let wanted = storage::normalize_path(path);
        Ok(self
            .load()?
            .into_iter()
            .find(|ws| storage::normalize_path(&ws.path) == wanted))
    }

    /// Append a workspace. Callers are expected to have checked `find_by_path`.
    pub fn add(&self, workspace: Workspace) -> Result<()> {
        tracing::debug!(
            id = workspace.id,
            path = %workspace.path.display(),
            "registering workspace"
        );
        self.update_all(|workspaces| {
            workspaces.push(workspace);
            Ok(())
        })
    }

    /// Remove a workspace and renumber the rest `1..=N` in list order.
    ///
    /// Returns the removed record. Nothing is written when `id` is unknown.
    pub fn remove(&self, id: u32) -> Result<Workspace> {
        self.update_all(|workspaces| {
            let index = workspaces
                .iter()
                .position(|ws| ws.id == id)
                .ok_or(Error::WorkspaceNotFound(id))?;
            let removed = workspaces.remove(index);
            let renumbered = ids::renumber_sequential(workspaces);
            tracing::debug!(id, renumbered, "workspace removed from registry");
            Ok(removed)
        })
    }

    /// Overwrite the record with the same id
    pub fn update(&self, workspace: &Workspace) -> Result<()> {
        self.update_all(|workspaces| {
            let slot = workspaces
                .iter_mut()
                .find(|ws| ws.id == workspace.id)
                .ok_or(Error::WorkspaceNotFound(workspace.id))?;
            *slot = workspace.clone();
            Ok(())
        })
    }

    /// Transaction over the whole registry
    pub fn update_all<R, F>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut Vec<Workspace>) -> Result<R>,
    {
        storage::with_collection(&self.registry_file(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WorkspaceStatus;
    use tempfile::TempDir;

    fn store() -> (TempDir, WorkspaceStore) {
        let temp = TempDir::new().unwrap();
        let store = WorkspaceStore::new(temp.path());
        (temp, store)
    }

    fn names(workspaces: &[Workspace]) -> Vec<(u32, &str)> {
        workspaces.iter().map(|ws| (ws.id, ws.name.as_str())).collect()
    }

    #[test]
    fn missing_registry_is_empty() {
        let (_temp, store) = store();
        assert!(store.load().unwrap().is_empty());
        assert!(store.find(1).unwrap().is_none());
    }

    #[test]
    fn add_creates_home_and_appends() {
        let temp = TempDir::new().unwrap();
        let store = WorkspaceStore::new(temp.path().join("nested/home"));

        store.add(Workspace::new(1, "WS1", "/tmp/ws1")).unwrap();
        store.add(Workspace::new(2, "WS2", "/tmp/ws2")).unwrap();

        assert!(store.registry_file().exists());
        assert_eq!(names(&store.load().unwrap()), vec![(1, "WS1"), (2, "WS2")]);
    }

    #[test]
    fn remove_renumbers_remaining() {
        let (_temp, store) = store();
        store
            .save(&[
                Workspace::new(1, "WS1", "/tmp/ws1"),
                Workspace::new(2, "WS2", "/tmp/ws2"),
                Workspace::new(3, "WS3", "/tmp/ws3"),
            ])
            .unwrap();

        let removed = store.remove(2).unwrap();
        assert_eq!(removed.name, "WS2");
        assert_eq!(names(&store.load().unwrap()), vec![(1, "WS1"), (2, "WS3")]);
    }

    #[test]
    fn remove_renumbers_across_statuses() {
        let (_temp, store) = store();
        store
            .save(&[
                Workspace::new(3, "A", "/tmp/a"),
                Workspace::new(1000, "B", "/tmp/b").with_status(WorkspaceStatus::Archived),
                Workspace::new(7, "C", "/tmp/c"),
            ])
            .unwrap();

        store.remove(3).unwrap();
        let workspaces = store.load().unwrap();
        assert_eq!(names(&workspaces), vec![(1, "B"), (2, "C")]);
        assert!(workspaces[0].is_archived());
    }

    #[test]
    fn remove_missing_leaves_file_untouched() {
        let (_temp, store) = store();
        store.save(&[Workspace::new(5, "WS", "/tmp/ws")]).unwrap();
        let before = std::fs::read_to_string(store.registry_file()).unwrap();

        let err = store.remove(9).unwrap_err();
        assert!(matches!(err, Error::WorkspaceNotFound(9)));
        assert_eq!(std::fs::read_to_string(store.registry_file()).unwrap(), before);
    }

    #[test]
    fn find_by_path_normalizes() {
        let (_temp, store) = store();
        store.add(Workspace::new(1, "proj", "/srv/work/proj")).unwrap();

        let found = store
            .find_by_path(Path::new("/srv/work/other/../proj/."))
            .unwrap();
        assert_eq!(found.map(|ws| ws.id), Some(1));
        assert!(store.find_by_path(Path::new("/srv/work")).unwrap().is_none());
    }

    #[test]
    fn update_overwrites_matching_record() {
        let (_temp, store) = store();
        store.add(Workspace::new(1, "proj", "/srv/proj")).unwrap();

        let mut ws = store.find(1).unwrap().unwrap();
        ws.status = WorkspaceStatus::Archived;
        store.update(&ws).unwrap();
        assert!(store.find(1).unwrap().unwrap().is_archived());

        let ghost = Workspace::new(42, "ghost", "/nowhere");
        assert!(matches!(store.update(&ghost), Err(Error::WorkspaceNotFound(42))));
    }
}
