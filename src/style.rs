use crate::model::{AbsenceCategory, CalendarDay, Column, TableRow};

/// Nature de la colonne pour le classement visuel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    ClinicColumn,
    ParticipantColumn,
    OtherColumn,
}

impl From<Column> for ColumnKind {
    fn from(col: Column) -> Self {
        match col {
            Column::Clinic => ColumnKind::ClinicColumn,
            Column::Participant(_) => ColumnKind::ParticipantColumn,
            _ => ColumnKind::OtherColumn,
        }
    }
}

/// Valeur de la cellule à classer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellValue {
    Absence(AbsenceCategory),
    ClinicFlag(bool),
    Other,
}

/// Catégorie visuelle d'une cellule (la couleur est décidée par le rendu).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleCategory {
    ClinicActive,
    ClinicInactive,
    AbsenceMarked,
    RestDay,
    Normal,
}

impl StyleCategory {
    /// Style CSS utilisé par l'affichage web historique.
    pub fn css(self) -> &'static str {
        match self {
            StyleCategory::ClinicInactive => {
                "background-color: black; color: white; border: 1px solid black"
            }
            StyleCategory::AbsenceMarked => "background-color: lightblue; border: 1px solid black",
            StyleCategory::RestDay => "background-color: lightgray; border: 1px solid black",
            StyleCategory::ClinicActive | StyleCategory::Normal => {
                "background-color: white; border: 1px solid black"
            }
        }
    }

    /// Couleur de fond (RGB).
    pub fn rgb(self) -> u32 {
        match self {
            StyleCategory::ClinicInactive => 0x000000,
            StyleCategory::AbsenceMarked => 0xADD8E6,
            StyleCategory::RestDay => 0xD3D3D3,
            StyleCategory::ClinicActive | StyleCategory::Normal => 0xFFFFFF,
        }
    }

    /// Couleur du texte (RGB).
    pub fn font_rgb(self) -> u32 {
        match self {
            StyleCategory::ClinicInactive => 0xFFFFFF,
            _ => 0x000000,
        }
    }

    /// Marqueur court pour l'affichage terminal.
    pub fn marker(self) -> char {
        match self {
            StyleCategory::ClinicActive => '+',
            StyleCategory::ClinicInactive => '#',
            StyleCategory::AbsenceMarked => '*',
            StyleCategory::RestDay => '~',
            StyleCategory::Normal => ' ',
        }
    }
}

/// Classe une cellule. L'ordre des règles fait foi (première qui s'applique) :
/// 1. colonne ambulatoire un jour sans ambulatoire → `ClinicInactive`
/// 2. colonne participant avec une absence → `AbsenceMarked`
/// 3. férié ou week-end → `RestDay`
/// 4. sinon `Normal`
///
/// Une colonne ambulatoire un jour d'ambulatoire donne `ClinicActive`
/// (jamais un jour de repos, donc sans effet sur les règles 2 et 3).
pub fn classify_cell(day: &CalendarDay, column: ColumnKind, value: CellValue) -> StyleCategory {
    if column == ColumnKind::ClinicColumn {
        if !day.is_clinic_day {
            return StyleCategory::ClinicInactive;
        }
        return StyleCategory::ClinicActive;
    }
    if column == ColumnKind::ParticipantColumn {
        if let CellValue::Absence(cat) = value {
            if cat.is_absent() {
                return StyleCategory::AbsenceMarked;
            }
        }
    }
    if day.is_rest_day() {
        return StyleCategory::RestDay;
    }
    StyleCategory::Normal
}

/// Classe chaque colonne d'une ligne, dans l'ordre donné.
pub fn classify_row(row: &TableRow, columns: &[Column]) -> Vec<StyleCategory> {
    columns
        .iter()
        .map(|&col| {
            let value = match col {
                Column::Clinic => CellValue::ClinicFlag(row.day.is_clinic_day),
                Column::Participant(idx) => {
                    CellValue::Absence(row.absences.get(idx).copied().unwrap_or_default())
                }
                _ => CellValue::Other,
            };
            classify_cell(&row.day, col.into(), value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{is_weekend, CLINIC_WEEKDAYS};
    use chrono::{Datelike, NaiveDate};

    fn day(y: i32, m: u32, d: u32, holiday: bool) -> CalendarDay {
        let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        CalendarDay {
            date,
            weekday_name: String::new(),
            is_public_holiday: holiday,
            holiday_name: if holiday { "X".into() } else { String::new() },
            is_weekend: is_weekend(date.weekday()),
            is_clinic_day: CLINIC_WEEKDAYS.contains(&date.weekday()) && !holiday,
        }
    }

    #[test]
    fn absence_on_saturday_wins_over_rest_day() {
        let sat = day(2024, 4, 6, false);
        assert!(sat.is_weekend);
        let style = classify_cell(
            &sat,
            ColumnKind::ParticipantColumn,
            CellValue::Absence(AbsenceCategory::Vacation),
        );
        assert_eq!(style, StyleCategory::AbsenceMarked);
        let none = classify_cell(
            &sat,
            ColumnKind::ParticipantColumn,
            CellValue::Absence(AbsenceCategory::None),
        );
        assert_eq!(none, StyleCategory::RestDay);
    }

    #[test]
    fn clinic_column_is_inactive_on_any_non_clinic_day() {
        // mardi ouvré, dimanche, lundi férié
        for d in [day(2024, 4, 2, false), day(2024, 4, 7, false), day(2024, 4, 1, true)] {
            let style = classify_cell(&d, ColumnKind::ClinicColumn, CellValue::ClinicFlag(false));
            assert_eq!(style, StyleCategory::ClinicInactive);
        }
        let wed = day(2024, 4, 3, false);
        assert_eq!(
            classify_cell(&wed, ColumnKind::ClinicColumn, CellValue::ClinicFlag(true)),
            StyleCategory::ClinicActive
        );
    }

    #[test]
    fn other_columns_follow_rest_days() {
        let hol = day(2024, 4, 25, true);
        assert_eq!(classify_cell(&hol, ColumnKind::OtherColumn, CellValue::Other), StyleCategory::RestDay);
        let tue = day(2024, 4, 2, false);
        assert_eq!(classify_cell(&tue, ColumnKind::OtherColumn, CellValue::Other), StyleCategory::Normal);
        assert_eq!(
            classify_cell(&tue, ColumnKind::ParticipantColumn, CellValue::Absence(AbsenceCategory::None)),
            StyleCategory::Normal
        );
    }

    #[test]
    fn css_keeps_historical_colours() {
        assert!(StyleCategory::ClinicInactive.css().contains("background-color: black"));
        assert!(StyleCategory::AbsenceMarked.css().contains("lightblue"));
        assert!(StyleCategory::RestDay.css().contains("lightgray"));
        assert_eq!(StyleCategory::Normal.css(), StyleCategory::ClinicActive.css());
    }

    #[test]
    fn row_classification_uses_column_order() {
        let row = TableRow {
            day: day(2024, 4, 6, false),
            absences: vec![AbsenceCategory::None, AbsenceCategory::Lecture],
        };
        let cols = [
            Column::Date,
            Column::Clinic,
            Column::Participant(0),
            Column::Participant(1),
        ];
        assert_eq!(
            classify_row(&row, &cols),
            vec![
                StyleCategory::RestDay,
                StyleCategory::ClinicInactive,
                StyleCategory::RestDay,
                StyleCategory::AbsenceMarked,
            ]
        );
    }
}
