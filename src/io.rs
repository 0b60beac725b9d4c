use crate::holiday::HolidayTable;
use crate::model::{AbsenceCategory, ParticipantId, ParticipantRoster};
use crate::overlay::AbsenceSelections;
use anyhow::{bail, Context};
use chrono::NaiveDate;
use csv::ReaderBuilder;
use std::path::Path;

/// Import des absences depuis CSV: header `participant,date,category`
///
/// `category` accepte `Nessuna|Ferie|Congresso|Lezione` (ou les noms anglais).
pub fn import_selections_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<AbsenceSelections> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = AbsenceSelections::new();
    for (line, rec) in rdr.records().enumerate() {
        let rec = rec?;
        let participant = rec.get(0).context("missing participant")?.trim();
        let date = rec.get(1).context("missing date")?.trim();
        let category = rec.get(2).unwrap_or("").trim();
        if participant.is_empty() {
            bail!("invalid selection row {} (empty participant)", line + 1);
        }
        let date = parse_date(date)?;
        let category: AbsenceCategory = category
            .parse()
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("invalid category for {participant} on {date}"))?;
        out.set(ParticipantId::new(participant), date, category);
    }
    Ok(out)
}

/// Import d'une table de fériés: header `date,name`
pub fn import_holidays_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<HolidayTable> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut table = HolidayTable::new();
    for rec in rdr.records() {
        let rec = rec?;
        let date = parse_date(rec.get(0).context("missing date")?.trim())?;
        let name = rec.get(1).context("missing name")?.trim();
        if name.is_empty() {
            bail!("holiday on {date} has an empty name");
        }
        table.insert(date, name);
    }
    Ok(table)
}

/// Import d'un roster: header `name`, un participant par ligne.
pub fn import_roster_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<ParticipantRoster> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut roster = ParticipantRoster::new();
    for rec in rdr.records() {
        let rec = rec?;
        let name = rec.get(0).context("missing name")?.trim();
        if !roster.add(ParticipantId::new(name)) && !name.is_empty() {
            tracing::warn!(name, "duplicate participant skipped");
        }
    }
    Ok(roster)
}

fn parse_date(raw: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").with_context(|| format!("invalid date: {raw}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::holiday::HolidaySource;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn selections_parse_labels_and_skip_none() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sel.csv");
        fs::write(
            &path,
            "participant,date,category\nDr. Rossi,2024-04-05,Ferie\nDr. Rossi,2024-04-06,Nessuna\nDr. Verdi,2024-04-08,lecture\n",
        )
        .unwrap();
        let sel = import_selections_csv(&path).unwrap();
        assert_eq!(sel.len(), 2);
        let d = NaiveDate::from_ymd_opt(2024, 4, 5).unwrap();
        assert_eq!(sel.get(&"Dr. Rossi".into(), d), AbsenceCategory::Vacation);
    }

    #[test]
    fn selections_reject_unknown_category() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sel.csv");
        fs::write(&path, "participant,date,category\nA,2024-04-05,Malattia\n").unwrap();
        assert!(import_selections_csv(&path).is_err());
    }

    #[test]
    fn holidays_table_from_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("hol.csv");
        fs::write(&path, "date,name\n2024-04-25,Liberazione\n").unwrap();
        let table = import_holidays_csv(&path).unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.contains(NaiveDate::from_ymd_opt(2024, 4, 25).unwrap()));
    }

    #[test]
    fn roster_csv_dedups() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("roster.csv");
        fs::write(&path, "name\nB\nA\nB\n").unwrap();
        let roster = import_roster_csv(&path).unwrap();
        assert_eq!(roster, ParticipantRoster::from_names(["B", "A"]));
    }
}
