use crate::error::PlanError;
use crate::holiday::HolidaySource;
use crate::model::{CalendarDay, MonthTable, ParticipantRoster};
use crate::overlay::{apply_absences, AbsenceSelections};
use chrono::{Datelike, Locale, NaiveDate, Weekday};

/// Jours d'ambulatoire : lundi, mercredi, vendredi.
pub const CLINIC_WEEKDAYS: [Weekday; 3] = [Weekday::Mon, Weekday::Wed, Weekday::Fri];

/// Règle grégorienne : divisible par 4, sauf les siècles non divisibles par 400.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Nombre de jours du mois (28 à 31).
pub fn days_in_month(year: i32, month: u32) -> Result<u32, PlanError> {
    check_month(month)?;
    Ok(match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    })
}

fn check_month(month: u32) -> Result<(), PlanError> {
    if !(1..=12).contains(&month) {
        return Err(PlanError::invalid(format!("month must be in 1..=12, got {month}")));
    }
    Ok(())
}

pub fn is_weekend(weekday: Weekday) -> bool {
    matches!(weekday, Weekday::Sat | Weekday::Sun)
}

/// Construit les lignes du calendrier d'un mois.
///
/// La locale par défaut est `it_IT`. L'outil historique suivait la locale du
/// processus (noms anglais sous la locale `C`) : on retrouve ce rendu avec
/// `MonthBuilder::new(Locale::en_US)` ou la clé `locale` de la configuration.
#[derive(Debug, Clone, Copy)]
pub struct MonthBuilder {
    locale: Locale,
}

impl Default for MonthBuilder {
    fn default() -> Self {
        Self { locale: Locale::it_IT }
    }
}

impl MonthBuilder {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    /// Nom du jour de la semaine dans la locale du builder.
    pub fn weekday_name(&self, date: NaiveDate) -> String {
        date.format_localized("%A", self.locale).to_string()
    }

    /// Nom du mois (titres, noms de fichiers).
    pub fn month_name(&self, year: i32, month: u32) -> Result<String, PlanError> {
        let first = first_of_month(year, month)?;
        Ok(first.format_localized("%B", self.locale).to_string())
    }

    /// Un `CalendarDay` par jour du mois, du 1er au dernier, sans trou.
    pub fn build(
        &self,
        year: i32,
        month: u32,
        holidays: &dyn HolidaySource,
    ) -> Result<Vec<CalendarDay>, PlanError> {
        let first = first_of_month(year, month)?;
        let len = days_in_month(year, month)?;

        let mut days = Vec::with_capacity(len as usize);
        let mut current = first;
        for _ in 0..len {
            days.push(self.day(current, holidays));
            match current.succ_opt() {
                Some(next) => current = next,
                None => break,
            }
        }
        if days.len() != len as usize {
            return Err(PlanError::invalid(format!("year {year} out of supported range")));
        }
        tracing::debug!(year, month, days = days.len(), "month built");
        Ok(days)
    }

    /// Tableau complet du mois : jours puis colonnes d'absence du roster.
    pub fn table(
        &self,
        year: i32,
        month: u32,
        holidays: &dyn HolidaySource,
        roster: &ParticipantRoster,
        selections: &AbsenceSelections,
    ) -> Result<MonthTable, PlanError> {
        let days = self.build(year, month, holidays)?;
        Ok(apply_absences(days, roster, selections))
    }

    fn day(&self, date: NaiveDate, holidays: &dyn HolidaySource) -> CalendarDay {
        let weekday = date.weekday();
        let holiday_name = holidays.name_of(date);
        let is_public_holiday = holiday_name.is_some();
        CalendarDay {
            date,
            weekday_name: self.weekday_name(date),
            is_public_holiday,
            holiday_name: holiday_name.unwrap_or_default(),
            is_weekend: is_weekend(weekday),
            is_clinic_day: CLINIC_WEEKDAYS.contains(&weekday) && !is_public_holiday,
        }
    }
}

fn first_of_month(year: i32, month: u32) -> Result<NaiveDate, PlanError> {
    check_month(month)?;
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| PlanError::invalid(format!("year {year} out of supported range")))
}

/// Raccourci : builder par défaut (locale `it_IT`).
pub fn build_month(
    year: i32,
    month: u32,
    holidays: &dyn HolidaySource,
) -> Result<Vec<CalendarDay>, PlanError> {
    MonthBuilder::default().build(year, month, holidays)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::holiday::NoHolidays;

    #[test]
    fn leap_rule() {
        assert!(is_leap_year(2024));
        assert!(!is_leap_year(2023));
        assert!(!is_leap_year(1900));
        assert!(is_leap_year(2000));
    }

    #[test]
    fn days_in_month_rejects_bad_month() {
        assert_eq!(days_in_month(2024, 2), Ok(29));
        assert_eq!(days_in_month(2100, 2), Ok(28));
        assert!(matches!(days_in_month(2024, 0), Err(PlanError::InvalidInput(_))));
        assert!(matches!(days_in_month(2024, 13), Err(PlanError::InvalidInput(_))));
    }

    #[test]
    fn weekday_names_follow_locale() {
        let d = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        assert_eq!(MonthBuilder::new(Locale::en_US).weekday_name(d), "Monday");
        assert_eq!(MonthBuilder::default().weekday_name(d), "lunedì");
        assert_eq!(MonthBuilder::new(Locale::en_US).month_name(2024, 4).unwrap(), "April");
    }

    #[test]
    fn out_of_range_year_is_invalid_input() {
        let err = build_month(i32::MAX, 1, &NoHolidays).unwrap_err();
        assert!(matches!(err, PlanError::InvalidInput(_)));
    }
}
