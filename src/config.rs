use crate::holiday::{HolidaySource, ItalianHolidays};
use crate::io;
use crate::model::ParticipantRoster;
use anyhow::{anyhow, Context, Result};
use chrono::Locale;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration optionnelle (JSON), les options de la CLI priment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Locale POSIX pour les noms de jours (`it_IT`, `en_US`, ...).
    pub locale: String,
    /// Roster utilisé tant qu'aucun fichier de roster n'existe.
    pub default_roster: Vec<String>,
    pub roster_path: PathBuf,
    pub output_dir: PathBuf,
    /// Table de fériés `date,name` remplaçant le calendrier italien intégré.
    pub holidays_csv: Option<PathBuf>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            locale: "it_IT".to_string(),
            default_roster: vec!["Dr. Rossi".to_string(), "Dr. Bianchi".to_string()],
            roster_path: PathBuf::from("roster.json"),
            output_dir: PathBuf::from("."),
            holidays_csv: None,
        }
    }
}

impl PlannerConfig {
    /// Charge le fichier s'il existe, sinon les valeurs par défaut.
    ///
    /// Les chemins relatifs du fichier sont résolus depuis son répertoire.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read(path).with_context(|| format!("reading config {}", path.display()))?;
        let mut cfg: PlannerConfig = serde_json::from_slice(&data)
            .with_context(|| format!("parsing config {}", path.display()))?;
        cfg.locale()?;
        if let Some(base) = path.parent() {
            cfg.resolve_from(base);
        }
        Ok(cfg)
    }

    fn resolve_from(&mut self, base: &Path) {
        let join = |p: &Path| if p.is_relative() { base.join(p) } else { p.to_path_buf() };
        self.roster_path = join(&self.roster_path);
        self.output_dir = join(&self.output_dir);
        self.holidays_csv = self.holidays_csv.as_deref().map(join);
    }

    pub fn locale(&self) -> Result<Locale> {
        Locale::try_from(self.locale.as_str()).map_err(|_| anyhow!("unknown locale: {}", self.locale))
    }

    pub fn default_roster(&self) -> ParticipantRoster {
        ParticipantRoster::from_names(&self.default_roster)
    }

    /// Source de fériés active : table CSV si configurée, sinon calendrier italien.
    pub fn holiday_source(&self) -> Result<Box<dyn HolidaySource>> {
        match &self.holidays_csv {
            Some(path) => {
                let table = io::import_holidays_csv(path)
                    .with_context(|| format!("loading holidays from {}", path.display()))?;
                tracing::debug!(entries = table.len(), "holiday table loaded");
                Ok(Box::new(table))
            }
            None => Ok(Box::new(ItalianHolidays)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let cfg = PlannerConfig::load_or_default(dir.path().join("turni.json")).unwrap();
        assert_eq!(cfg, PlannerConfig::default());
        assert_eq!(cfg.locale().unwrap(), Locale::it_IT);
        assert_eq!(cfg.default_roster().len(), 2);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("turni.json");
        fs::write(&path, r#"{ "locale": "en_US" }"#).unwrap();
        let cfg = PlannerConfig::load_or_default(&path).unwrap();
        assert_eq!(cfg.locale().unwrap(), Locale::en_US);
        assert_eq!(cfg.roster_path, dir.path().join("roster.json"));
    }

    #[test]
    fn relative_paths_follow_the_config_file() {
        let dir = tempdir().unwrap();
        let conf_dir = dir.path().join("conf");
        fs::create_dir_all(&conf_dir).unwrap();
        fs::write(conf_dir.join("hol.csv"), "date,name\n2024-04-02,Festa locale\n").unwrap();
        let path = conf_dir.join("turni.json");
        fs::write(&path, r#"{ "holidays_csv": "hol.csv", "output_dir": "out" }"#).unwrap();

        let cfg = PlannerConfig::load_or_default(&path).unwrap();
        assert_eq!(cfg.holidays_csv, Some(conf_dir.join("hol.csv")));
        assert_eq!(cfg.output_dir, conf_dir.join("out"));
        assert_eq!(cfg.roster_path, conf_dir.join("roster.json"));
        let source = cfg.holiday_source().unwrap();
        assert!(source.contains(chrono::NaiveDate::from_ymd_opt(2024, 4, 2).unwrap()));
    }

    #[test]
    fn unknown_locale_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("turni.json");
        fs::write(&path, r#"{ "locale": "xx_YY" }"#).unwrap();
        assert!(PlannerConfig::load_or_default(&path).is_err());
    }
}
