use crate::model::{Column, MonthTable, TableRow};
use crate::style::{classify_row, StyleCategory};
use anyhow::Context;
use csv::WriterBuilder;
use chrono::Datelike;
use rust_xlsxwriter::{ExcelDateTime, Format, FormatBorder, Workbook};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Nom de la feuille dans le classeur exporté.
pub const SHEET_NAME: &str = "Turni";

/// Nom de fichier proposé : `calendario_turni_{année}_{mois:02}.{ext}`.
pub fn default_file_name(year: i32, month: u32, ext: &str) -> String {
    format!("calendario_turni_{year}_{month:02}.{ext}")
}

pub fn column_header(table: &MonthTable, col: Column) -> String {
    match col {
        Column::Date => "Data".to_string(),
        Column::Weekday => "Giorno".to_string(),
        Column::Holiday => "Festivo".to_string(),
        Column::HolidayName => "Nome Festivo".to_string(),
        Column::Clinic => "Ambulatorio".to_string(),
        Column::Participant(idx) => table
            .participants
            .get(idx)
            .map(|p| p.as_str().to_string())
            .unwrap_or_default(),
    }
}

pub fn headers(table: &MonthTable) -> Vec<String> {
    table.columns().into_iter().map(|c| column_header(table, c)).collect()
}

/// Texte d'une cellule tel qu'écrit dans les exports texte.
pub fn cell_text(row: &TableRow, col: Column) -> String {
    match col {
        Column::Date => row.day.date.format("%Y-%m-%d").to_string(),
        Column::Weekday => row.day.weekday_name.clone(),
        Column::Holiday => row.day.is_public_holiday.to_string(),
        Column::HolidayName => row.day.holiday_name.clone(),
        Column::Clinic => {
            if row.day.is_clinic_day {
                "Ambulatorio".to_string()
            } else {
                String::new()
            }
        }
        Column::Participant(idx) => row
            .absences
            .get(idx)
            .copied()
            .unwrap_or_default()
            .label()
            .to_string(),
    }
}

/// Lignes aplaties (sans en-tête), colonnes dans l'ordre de `MonthTable::columns`.
pub fn records(table: &MonthTable) -> Vec<Vec<String>> {
    let cols = table.columns();
    table
        .rows
        .iter()
        .map(|row| cols.iter().map(|&c| cell_text(row, c)).collect())
        .collect()
}

/// Écrit le tableau en CSV (en-tête inclus) dans un flux quelconque.
pub fn write_csv<W: Write>(writer: W, table: &MonthTable) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_writer(writer);
    w.write_record(headers(table))?;
    for rec in records(table) {
        w.write_record(&rec)?;
    }
    w.flush()?;
    Ok(())
}

/// Export CSV: header `Data,Giorno,Festivo,Nome Festivo,Ambulatorio,<participants...>`
pub fn export_csv<P: AsRef<Path>>(path: P, table: &MonthTable) -> anyhow::Result<()> {
    let path = path.as_ref();
    let file = fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_csv(file, table)?;
    tracing::info!(path = %path.display(), rows = table.rows.len(), "csv export written");
    Ok(())
}

/// Export JSON du tableau (jolie mise en forme)
pub fn export_json<P: AsRef<Path>>(path: P, table: &MonthTable) -> anyhow::Result<()> {
    let path = path.as_ref();
    let s = serde_json::to_string_pretty(table)?;
    fs::write(path, s).with_context(|| format!("writing {}", path.display()))?;
    tracing::info!(path = %path.display(), "json export written");
    Ok(())
}

fn style_format(style: StyleCategory) -> Format {
    Format::new()
        .set_background_color(style.rgb())
        .set_font_color(style.font_rgb())
        .set_border(FormatBorder::Thin)
}

/// Classeur XLSX en mémoire, une feuille, cellules colorées selon [`StyleCategory`].
pub fn render_xlsx(table: &MonthTable) -> anyhow::Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    let header = Format::new().set_bold().set_border(FormatBorder::Thin);
    let cols = table.columns();
    for (c, col) in cols.iter().enumerate() {
        sheet.write_string_with_format(0, c as u16, column_header(table, *col), &header)?;
    }

    sheet.set_column_width(0, 12)?;
    sheet.set_column_width(1, 12)?;
    sheet.set_column_width(3, 26)?;
    sheet.set_column_width(4, 13)?;

    for (r, row) in table.rows.iter().enumerate() {
        let xr = (r + 1) as u32;
        let styles = classify_row(row, &cols);
        for (c, (col, style)) in cols.iter().zip(styles).enumerate() {
            let fmt = style_format(style);
            match col {
                Column::Date => {
                    let date = row.day.date;
                    let year = u16::try_from(date.year())
                        .with_context(|| format!("year {} not representable in xlsx", date.year()))?;
                    let cell = ExcelDateTime::from_ymd(year, date.month() as u8, date.day() as u8)?;
                    let fmt = fmt.set_num_format("yyyy-mm-dd");
                    sheet.write_datetime_with_format(xr, c as u16, &cell, &fmt)?;
                }
                Column::Holiday => {
                    sheet.write_boolean_with_format(xr, c as u16, row.day.is_public_holiday, &fmt)?;
                }
                _ => {
                    sheet.write_string_with_format(xr, c as u16, cell_text(row, *col), &fmt)?;
                }
            }
        }
    }

    let buffer = workbook.save_to_buffer().context("building xlsx workbook")?;
    Ok(buffer)
}

pub fn export_xlsx<P: AsRef<Path>>(path: P, table: &MonthTable) -> anyhow::Result<()> {
    let path = path.as_ref();
    let bytes = render_xlsx(table)?;
    fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
    tracing::info!(path = %path.display(), rows = table.rows.len(), "xlsx export written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AbsenceCategory, CalendarDay};
    use chrono::NaiveDate;

    fn tiny_table() -> MonthTable {
        let date = NaiveDate::from_ymd_opt(2024, 4, 25).unwrap();
        MonthTable {
            participants: vec!["A".into(), "B".into()],
            rows: vec![TableRow {
                day: CalendarDay {
                    date,
                    weekday_name: "giovedì".into(),
                    is_public_holiday: true,
                    holiday_name: "Festa della Liberazione".into(),
                    is_weekend: false,
                    is_clinic_day: false,
                },
                absences: vec![AbsenceCategory::Conference, AbsenceCategory::None],
            }],
        }
    }

    #[test]
    fn headers_follow_column_contract() {
        assert_eq!(
            headers(&tiny_table()),
            ["Data", "Giorno", "Festivo", "Nome Festivo", "Ambulatorio", "A", "B"]
        );
    }

    #[test]
    fn records_flatten_each_row() {
        assert_eq!(
            records(&tiny_table()),
            vec![vec![
                "2024-04-25",
                "giovedì",
                "true",
                "Festa della Liberazione",
                "",
                "Congresso",
                "Nessuna"
            ]]
        );
    }

    #[test]
    fn xlsx_is_a_zip_container() {
        let bytes = render_xlsx(&tiny_table()).unwrap();
        assert!(bytes.len() > 100);
        assert_eq!(&bytes[0..2], b"PK");
    }

    #[test]
    fn json_export_reads_back_as_the_same_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.json");
        let table = tiny_table();
        export_json(&path, &table).unwrap();
        let loaded: MonthTable = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded, table);
    }

    #[test]
    fn default_name_pads_month() {
        assert_eq!(default_file_name(2024, 4, "xlsx"), "calendario_turni_2024_04.xlsx");
    }
}
