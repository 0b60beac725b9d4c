#![forbid(unsafe_code)]
//! Turni — calendrier mensuel d'un service hospitalier (sans BD).
//!
//! - Un jour par ligne : jour de la semaine, férié, ambulatoire (lun/mer/ven hors fériés).
//! - Une colonne d'absence par participant du roster.
//! - Classement visuel des cellules, export CSV/XLSX/JSON.
//! - Calcul pur : le tableau est reconstruit entièrement à chaque passe.

pub mod calendar;
pub mod config;
pub mod error;
pub mod export;
pub mod holiday;
pub mod io;
pub mod model;
pub mod overlay;
pub mod storage;
pub mod style;

pub use calendar::{build_month, days_in_month, is_leap_year, MonthBuilder, CLINIC_WEEKDAYS};
pub use config::PlannerConfig;
pub use error::PlanError;
pub use export::{export_csv, export_json, export_xlsx, render_xlsx, write_csv};
pub use holiday::{HolidaySource, HolidayTable, ItalianHolidays, NoHolidays};
pub use model::{
    AbsenceCategory, CalendarDay, Column, MonthTable, ParticipantId, ParticipantRoster, TableRow,
};
pub use overlay::{apply_absences, AbsenceSelections};
pub use storage::{JsonRosterStore, RosterStore};
pub use style::{classify_cell, classify_row, CellValue, ColumnKind, StyleCategory};
