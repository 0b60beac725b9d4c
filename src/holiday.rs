use chrono::{Datelike, Duration, NaiveDate};
use std::collections::BTreeMap;

/// Source de jours fériés interrogée jour par jour.
///
/// Le cœur ne fait aucune I/O : une source distante doit être résolue
/// (chargée dans une [`HolidayTable`] par exemple) avant le calcul.
pub trait HolidaySource {
    /// Libellé du férié, `None` si le jour est ouvré.
    fn name_of(&self, date: NaiveDate) -> Option<String>;

    fn contains(&self, date: NaiveDate) -> bool {
        self.name_of(date).is_some()
    }

    /// Fériés d'une année, triés par date.
    fn holidays_in_year(&self, year: i32) -> Vec<(NaiveDate, String)> {
        let Some(mut current) = NaiveDate::from_ymd_opt(year, 1, 1) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        while current.year() == year {
            if let Some(name) = self.name_of(current) {
                out.push((current, name));
            }
            match current.succ_opt() {
                Some(next) => current = next,
                None => break,
            }
        }
        out
    }
}

/// Aucun férié (seuls les week-ends sont des jours de repos).
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHolidays;

impl HolidaySource for NoHolidays {
    fn name_of(&self, _date: NaiveDate) -> Option<String> {
        None
    }
}

/// Calendrier des fêtes nationales italiennes.
///
/// Dates fixes (avec leurs années de validité) :
/// * Capodanno (1/1), Epifania (6/1, suspendue de 1978 à 1985)
/// * Festa della Liberazione (25/4), Festa dei Lavoratori (1/5)
/// * Festa della Repubblica (2/6, déplacée au dimanche de 1977 à 2000)
/// * Assunzione (15/8), San Francesco d'Assisi (4/10, depuis 2026)
/// * Tutti i Santi (1/11), Immacolata (8/12), Natale (25/12), Santo Stefano (26/12)
///
/// Dates mobiles : Pasqua et Lunedì dell'Angelo.
#[derive(Debug, Default, Clone, Copy)]
pub struct ItalianHolidays;

/// Férié à date fixe, observé de `from` à `until` inclus (bornes ouvertes si `None`).
#[derive(Debug, Clone, Copy)]
struct FixedHoliday {
    month: u32,
    day: u32,
    name: &'static str,
    from: Option<i32>,
    until: Option<i32>,
}

impl FixedHoliday {
    const fn always(month: u32, day: u32, name: &'static str) -> Self {
        Self { month, day, name, from: None, until: None }
    }

    const fn between(
        month: u32,
        day: u32,
        name: &'static str,
        from: Option<i32>,
        until: Option<i32>,
    ) -> Self {
        Self { month, day, name, from, until }
    }

    fn observed_in(&self, year: i32) -> bool {
        self.from.map_or(true, |f| year >= f) && self.until.map_or(true, |u| year <= u)
    }
}

const ITALIAN_FIXED: [FixedHoliday; 13] = [
    FixedHoliday::always(1, 1, "Capodanno"),
    FixedHoliday::between(1, 6, "Epifania del Signore", None, Some(1977)),
    FixedHoliday::between(1, 6, "Epifania del Signore", Some(1986), None),
    FixedHoliday::always(4, 25, "Festa della Liberazione"),
    FixedHoliday::always(5, 1, "Festa dei Lavoratori"),
    FixedHoliday::between(6, 2, "Festa della Repubblica", None, Some(1976)),
    FixedHoliday::between(6, 2, "Festa della Repubblica", Some(2001), None),
    FixedHoliday::always(8, 15, "Assunzione della Vergine"),
    FixedHoliday::between(10, 4, "San Francesco d'Assisi", Some(2026), None),
    FixedHoliday::always(11, 1, "Tutti i Santi"),
    FixedHoliday::always(12, 8, "Immacolata Concezione"),
    FixedHoliday::always(12, 25, "Natale"),
    FixedHoliday::always(12, 26, "Santo Stefano"),
];

impl ItalianHolidays {
    fn for_year(year: i32) -> Vec<(NaiveDate, &'static str)> {
        let mut out: Vec<(NaiveDate, &'static str)> = ITALIAN_FIXED
            .iter()
            .filter(|h| h.observed_in(year))
            .filter_map(|h| NaiveDate::from_ymd_opt(year, h.month, h.day).map(|date| (date, h.name)))
            .collect();
        if let Some(easter) = easter_sunday(year) {
            out.push((easter, "Pasqua di Resurrezione"));
            out.push((easter + Duration::days(1), "Lunedì dell'Angelo"));
        }
        out.sort_by_key(|(date, _)| *date);
        out
    }
}

impl HolidaySource for ItalianHolidays {
    fn name_of(&self, date: NaiveDate) -> Option<String> {
        Self::for_year(date.year())
            .into_iter()
            .find(|(d, _)| *d == date)
            .map(|(_, name)| name.to_string())
    }

    fn holidays_in_year(&self, year: i32) -> Vec<(NaiveDate, String)> {
        Self::for_year(year)
            .into_iter()
            .map(|(d, name)| (d, name.to_string()))
            .collect()
    }
}

/// Dimanche de Pâques (comput grégorien anonyme).
pub fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year.rem_euclid(19);
    let b = year.div_euclid(100);
    let c = year.rem_euclid(100);
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15).rem_euclid(30);
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k).rem_euclid(7);
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
}

/// Table explicite date → libellé (ex. chargée depuis un CSV `date,name`).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HolidayTable {
    entries: BTreeMap<NaiveDate, String>,
}

impl HolidayTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<S: Into<String>>(&mut self, date: NaiveDate, name: S) {
        self.entries.insert(date, name.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(NaiveDate, S)> for HolidayTable {
    fn from_iter<T: IntoIterator<Item = (NaiveDate, S)>>(iter: T) -> Self {
        let mut table = Self::new();
        for (date, name) in iter {
            table.insert(date, name);
        }
        table
    }
}

impl HolidaySource for HolidayTable {
    fn name_of(&self, date: NaiveDate) -> Option<String> {
        self.entries.get(&date).cloned()
    }

    fn holidays_in_year(&self, year: i32) -> Vec<(NaiveDate, String)> {
        self.entries
            .iter()
            .filter(|(d, _)| d.year() == year)
            .map(|(d, n)| (*d, n.clone()))
            .collect()
    }
}
