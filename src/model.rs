use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifiant d'un participant (ex. "Dr. Rossi").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().trim().to_owned())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Type d'absence pour un participant et un jour donné.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AbsenceCategory {
    #[default]
    None,
    Vacation,
    Conference,
    Lecture,
}

impl AbsenceCategory {
    pub const ALL: [AbsenceCategory; 4] = [
        AbsenceCategory::None,
        AbsenceCategory::Vacation,
        AbsenceCategory::Conference,
        AbsenceCategory::Lecture,
    ];

    /// Libellé affiché dans le tableau et les exports.
    pub fn label(self) -> &'static str {
        match self {
            AbsenceCategory::None => "Nessuna",
            AbsenceCategory::Vacation => "Ferie",
            AbsenceCategory::Conference => "Congresso",
            AbsenceCategory::Lecture => "Lezione",
        }
    }

    pub fn is_absent(self) -> bool {
        self != AbsenceCategory::None
    }
}

impl fmt::Display for AbsenceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AbsenceCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "nessuna" | "none" => Ok(AbsenceCategory::None),
            "ferie" | "vacation" => Ok(AbsenceCategory::Vacation),
            "congresso" | "conference" => Ok(AbsenceCategory::Conference),
            "lezione" | "lecture" => Ok(AbsenceCategory::Lecture),
            other => Err(format!("unknown absence category: {other}")),
        }
    }
}

/// Une ligne du calendrier : un jour du mois et ses attributs dérivés.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub weekday_name: String,
    pub is_public_holiday: bool,
    #[serde(default)]
    pub holiday_name: String,
    pub is_weekend: bool,
    pub is_clinic_day: bool,
}

impl CalendarDay {
    pub fn weekday(&self) -> Weekday {
        self.date.weekday()
    }

    /// Jour de repos : week-end ou férié.
    pub fn is_rest_day(&self) -> bool {
        self.is_weekend || self.is_public_holiday
    }
}

/// Liste ordonnée, sans doublon, des participants de la session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantRoster(Vec<ParticipantId>);

impl ParticipantRoster {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Construit un roster en ignorant les doublons et les noms vides.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut roster = Self::new();
        for name in names {
            roster.add(ParticipantId::new(name));
        }
        roster
    }

    /// Ajoute en fin de liste ; `false` si déjà présent ou vide.
    pub fn add(&mut self, id: ParticipantId) -> bool {
        if id.as_str().is_empty() || self.contains(&id) {
            return false;
        }
        self.0.push(id);
        true
    }

    pub fn remove(&mut self, id: &ParticipantId) -> bool {
        let before = self.0.len();
        self.0.retain(|p| p != id);
        before != self.0.len()
    }

    pub fn contains(&self, id: &ParticipantId) -> bool {
        self.0.iter().any(|p| p == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ParticipantId> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[ParticipantId] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a ParticipantRoster {
    type Item = &'a ParticipantId;
    type IntoIter = std::slice::Iter<'a, ParticipantId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Ligne du tableau mensuel : le jour et une absence par participant (ordre du roster).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub day: CalendarDay,
    pub absences: Vec<AbsenceCategory>,
}

/// Colonne du tableau exporté, dans l'ordre du contrat d'export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Date,
    Weekday,
    Holiday,
    HolidayName,
    Clinic,
    /// Index dans `MonthTable::participants`.
    Participant(usize),
}

/// Tableau complet d'un mois.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthTable {
    pub participants: Vec<ParticipantId>,
    pub rows: Vec<TableRow>,
}

impl MonthTable {
    /// (année, mois) du tableau, `None` s'il est vide.
    pub fn period(&self) -> Option<(i32, u32)> {
        self.rows.first().map(|r| (r.day.date.year(), r.day.date.month()))
    }

    /// Absence d'un participant pour une date ; `None` si hors tableau.
    pub fn absence(&self, participant: &ParticipantId, date: NaiveDate) -> Option<AbsenceCategory> {
        let col = self.participants.iter().position(|p| p == participant)?;
        self.rows
            .iter()
            .find(|r| r.day.date == date)
            .and_then(|r| r.absences.get(col).copied())
    }

    /// Colonnes fixes puis une colonne par participant.
    pub fn columns(&self) -> Vec<Column> {
        let mut cols = vec![
            Column::Date,
            Column::Weekday,
            Column::Holiday,
            Column::HolidayName,
            Column::Clinic,
        ];
        cols.extend((0..self.participants.len()).map(Column::Participant));
        cols
    }

    pub fn clinic_days(&self) -> usize {
        self.rows.iter().filter(|r| r.day.is_clinic_day).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absence_labels_parse_back() {
        for cat in AbsenceCategory::ALL {
            assert_eq!(cat.label().parse::<AbsenceCategory>().unwrap(), cat);
        }
        assert_eq!("Vacation".parse::<AbsenceCategory>().unwrap(), AbsenceCategory::Vacation);
        assert_eq!("".parse::<AbsenceCategory>().unwrap(), AbsenceCategory::None);
        assert!("sick".parse::<AbsenceCategory>().is_err());
    }

    #[test]
    fn roster_keeps_order_and_rejects_duplicates() {
        let mut roster = ParticipantRoster::from_names(["B", "A", "B", " "]);
        assert_eq!(roster.len(), 2);
        assert_eq!(roster.as_slice()[0].as_str(), "B");
        assert!(!roster.add("A".into()));
        assert!(roster.add("C".into()));
        assert!(roster.remove(&"B".into()));
        assert!(!roster.remove(&"B".into()));
        let names: Vec<&str> = roster.iter().map(|p| p.as_str()).collect();
        assert_eq!(names, ["A", "C"]);
    }
}
