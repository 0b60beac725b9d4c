use crate::model::{AbsenceCategory, CalendarDay, MonthTable, ParticipantId, ParticipantRoster, TableRow};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

/// Absences saisies pour la session, par (participant, date).
///
/// Une clé absente vaut [`AbsenceCategory::None`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AbsenceSelections {
    entries: HashMap<ParticipantId, BTreeMap<NaiveDate, AbsenceCategory>>,
}

impl AbsenceSelections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enregistre une absence ; `None` efface une saisie existante.
    pub fn set(&mut self, participant: ParticipantId, date: NaiveDate, category: AbsenceCategory) {
        if category.is_absent() {
            self.entries.entry(participant).or_default().insert(date, category);
        } else if let Some(days) = self.entries.get_mut(&participant) {
            days.remove(&date);
            if days.is_empty() {
                self.entries.remove(&participant);
            }
        }
    }

    pub fn get(&self, participant: &ParticipantId, date: NaiveDate) -> AbsenceCategory {
        self.entries
            .get(participant)
            .and_then(|days| days.get(&date))
            .copied()
            .unwrap_or_default()
    }

    /// Nombre de saisies (participant, date) non nulles.
    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Participants présents dans les saisies mais absents du roster (triés).
    pub fn unknown_participants(&self, roster: &ParticipantRoster) -> Vec<ParticipantId> {
        let mut out: Vec<ParticipantId> = self
            .entries
            .keys()
            .filter(|p| !roster.contains(p))
            .cloned()
            .collect();
        out.sort();
        out
    }
}

impl FromIterator<(ParticipantId, NaiveDate, AbsenceCategory)> for AbsenceSelections {
    fn from_iter<T: IntoIterator<Item = (ParticipantId, NaiveDate, AbsenceCategory)>>(iter: T) -> Self {
        let mut sel = Self::new();
        for (p, d, c) in iter {
            sel.set(p, d, c);
        }
        sel
    }
}

/// Ajoute une colonne par participant du roster aux jours donnés.
///
/// Les saisies pour des participants hors roster sont ignorées.
pub fn apply_absences(
    days: Vec<CalendarDay>,
    roster: &ParticipantRoster,
    selections: &AbsenceSelections,
) -> MonthTable {
    let ignored = selections.unknown_participants(roster);
    if !ignored.is_empty() {
        tracing::debug!(count = ignored.len(), "selections for participants outside the roster ignored");
    }

    let rows = days
        .into_iter()
        .map(|day| {
            let absences = roster.iter().map(|p| selections.get(p, day.date)).collect();
            TableRow { day, absences }
        })
        .collect();

    MonthTable {
        participants: roster.as_slice().to_vec(),
        rows,
    }
}
