#![forbid(unsafe_code)]
use anyhow::{bail, Context, Result};
use chrono::{Datelike, Local};
use clap::{Parser, Subcommand};
use std::fs;
use turni::{
    export, io,
    model::{ParticipantId, ParticipantRoster},
    overlay::AbsenceSelections,
    storage::{JsonRosterStore, RosterStore},
    style::classify_row,
    MonthBuilder, PlannerConfig,
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI du calendrier mensuel des turni (fériés, ambulatoire, assenze)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier de configuration JSON (optionnel)
    #[arg(long, global = true, default_value = "turni.json")]
    config: String,

    /// Fichier JSON du roster (remplace `roster_path` de la config)
    #[arg(long, global = true)]
    roster: Option<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Construire le tableau d'un mois, l'afficher et l'exporter
    Month {
        /// Année (défaut : année courante)
        #[arg(long)]
        year: Option<i32>,
        /// Mois 1-12 (défaut : mois courant)
        #[arg(long)]
        month: Option<u32>,
        /// CSV `participant,date,category`
        #[arg(long)]
        selections: Option<String>,
        /// liste "nom1,nom2,..." (défaut : roster stocké)
        #[arg(long)]
        participants: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
        #[arg(long)]
        out_xlsx: Option<String>,
        #[arg(long)]
        out_json: Option<String>,
        /// Écrit le XLSX sous le nom par défaut dans `output_dir`
        #[arg(long)]
        xlsx: bool,
    },

    /// Gérer le roster stocké
    Roster {
        #[command(subcommand)]
        action: RosterAction,
    },

    /// Lister les fériés d'une année
    Holidays {
        #[arg(long)]
        year: Option<i32>,
    },
}

#[derive(Subcommand, Debug)]
enum RosterAction {
    /// Afficher le roster
    List,
    /// Ajouter un participant
    Add {
        #[arg(long)]
        name: String,
    },
    /// Retirer un participant
    Remove {
        #[arg(long)]
        name: String,
    },
    /// Remplacer le roster par un CSV `name`
    Import {
        #[arg(long)]
        csv: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let cfg = PlannerConfig::load_or_default(&cli.config)?;
    let roster_path = cli
        .roster
        .clone()
        .map(Into::into)
        .unwrap_or_else(|| cfg.roster_path.clone());
    let store = JsonRosterStore::open(roster_path)?.with_fallback(cfg.default_roster());
    let builder = MonthBuilder::new(cfg.locale()?);
    let today = Local::now().date_naive();

    let code = match cli.cmd {
        Commands::Month {
            year,
            month,
            selections,
            participants,
            out_csv,
            out_xlsx,
            out_json,
            xlsx,
        } => {
            let year = year.unwrap_or_else(|| today.year());
            let month = month.unwrap_or_else(|| today.month());
            let roster = match participants {
                Some(list) => {
                    let mut out = ParticipantRoster::new();
                    for name in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                        out.add(ParticipantId::new(name));
                    }
                    out
                }
                None => store.load()?,
            };
            let selections = match selections {
                Some(path) => io::import_selections_csv(path)?,
                None => AbsenceSelections::new(),
            };
            let holidays = cfg.holiday_source()?;
            let table = builder.table(year, month, holidays.as_ref(), &roster, &selections)?;

            println!("{} {}", builder.month_name(year, month)?, year);
            println!("{}", export::headers(&table).join(" | "));
            let cols = table.columns();
            for (row, rec) in table.rows.iter().zip(export::records(&table)) {
                let styles = classify_row(row, &cols);
                let line: Vec<String> = rec
                    .iter()
                    .zip(styles)
                    .map(|(text, style)| format!("{}{}", style.marker(), text))
                    .collect();
                println!("{}", line.join(" | "));
            }

            println!("Ambulatorio: {} giorni", table.clinic_days());

            if let Some(path) = out_csv {
                export::export_csv(path, &table)?;
            }
            if let Some(path) = out_json {
                export::export_json(path, &table)?;
            }
            if let Some(path) = out_xlsx {
                export::export_xlsx(path, &table)?;
            }
            if xlsx {
                let path = cfg
                    .output_dir
                    .join(export::default_file_name(year, month, "xlsx"));
                fs::create_dir_all(&cfg.output_dir)
                    .with_context(|| format!("creating {}", cfg.output_dir.display()))?;
                export::export_xlsx(&path, &table)?;
                println!("written {}", path.display());
            }

            let ignored = selections.unknown_participants(&roster);
            if ignored.is_empty() {
                0
            } else {
                let names: Vec<&str> = ignored.iter().map(|p| p.as_str()).collect();
                eprintln!("Ignored selections for: {}", names.join(", "));
                // Code 2 = WARNING
                2
            }
        }
        Commands::Roster { action } => {
            let mut roster = store.load()?;
            match action {
                RosterAction::List => {
                    for p in &roster {
                        println!("{p}");
                    }
                }
                RosterAction::Add { name } => {
                    if !roster.add(ParticipantId::new(&name)) {
                        bail!("participant already present or empty: {name}");
                    }
                    store.save(&roster)?;
                }
                RosterAction::Remove { name } => {
                    if !roster.remove(&ParticipantId::new(&name)) {
                        bail!("unknown participant: {name}");
                    }
                    store.save(&roster)?;
                }
                RosterAction::Import { csv } => {
                    roster = io::import_roster_csv(csv)?;
                    store.save(&roster)?;
                }
            }
            0
        }
        Commands::Holidays { year } => {
            let year = year.unwrap_or_else(|| today.year());
            let holidays = cfg.holiday_source()?;
            for (date, name) in holidays.holidays_in_year(year) {
                println!("{} | {} | {}", date.format("%Y-%m-%d"), builder.weekday_name(date), name);
            }
            0
        }
    };

    std::process::exit(code);
}
