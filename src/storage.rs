use crate::model::ParticipantRoster;
use anyhow::Context;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Stockage du roster : lu en début de session, réécrit en entier à chaque modification.
/// Pas de coordination entre sessions : le dernier qui écrit gagne.
pub trait RosterStore {
    /// Charge le roster depuis un support.
    fn load(&self) -> anyhow::Result<ParticipantRoster>;
    /// Sauvegarde de manière atomique.
    fn save(&self, roster: &ParticipantRoster) -> anyhow::Result<()>;
}

/// Roster persisté en tableau JSON de noms.
pub struct JsonRosterStore {
    path: PathBuf,
    fallback: ParticipantRoster,
}

impl JsonRosterStore {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(Self {
            path: path.as_ref().to_path_buf(),
            fallback: ParticipantRoster::new(),
        })
    }

    /// Roster renvoyé tant que le fichier n'existe pas.
    pub fn with_fallback(mut self, fallback: ParticipantRoster) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RosterStore for JsonRosterStore {
    fn load(&self) -> anyhow::Result<ParticipantRoster> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no roster file, using fallback");
            return Ok(self.fallback.clone());
        }
        let data = fs::read(&self.path).with_context(|| format!("reading {}", self.path.display()))?;
        let names: Vec<String> = serde_json::from_slice(&data)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        Ok(ParticipantRoster::from_names(names))
    }

    fn save(&self, roster: &ParticipantRoster) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(roster)?;
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).with_context(|| "atomic rename")?;
        tracing::info!(path = %self.path.display(), participants = roster.len(), "roster saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_loads_fallback() {
        let dir = tempdir().unwrap();
        let store = JsonRosterStore::open(dir.path().join("roster.json"))
            .unwrap()
            .with_fallback(ParticipantRoster::from_names(["Dr. Rossi"]));
        assert_eq!(store.load().unwrap(), ParticipantRoster::from_names(["Dr. Rossi"]));
    }

    #[test]
    fn save_replaces_roster_wholesale() {
        let dir = tempdir().unwrap();
        let store = JsonRosterStore::open(dir.path().join("roster.json")).unwrap();
        store.save(&ParticipantRoster::from_names(["A", "B", "C"])).unwrap();
        store.save(&ParticipantRoster::from_names(["C", "A"])).unwrap();
        let loaded = store.load().unwrap();
        let names: Vec<&str> = loaded.iter().map(|p| p.as_str()).collect();
        assert_eq!(names, ["C", "A"]);
    }

    #[test]
    fn corrupted_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("roster.json");
        fs::write(&path, "{not json").unwrap();
        let store = JsonRosterStore::open(&path).unwrap();
        assert!(store.load().is_err());
    }
}
