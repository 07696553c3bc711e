#![forbid(unsafe_code)]
use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use turnario::{
    engine, io,
    model::{CollaboratoreId, GranularitaRiposo},
    storage::{ArchivioRiposi, RiposiJson},
    ModalitaRiposo, OpzioniMotore, Severita,
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI minimalista del motore turni (senza base di dati)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Attiva i log (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Genera i turni della settimana da una fotografia JSON
    Genera {
        /// File JSON con il contesto di generazione
        #[arg(long)]
        contesto: String,
        /// File JSON con le giornate di chiusura (post-filtro)
        #[arg(long)]
        chiusure: Option<String>,
        #[arg(long)]
        out_json: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
        #[arg(long, default_value_t = 2)]
        max_turni_per_giorno: u8,
        #[arg(long, default_value_t = 8.0)]
        ore_riposo_minimo: f32,
    },

    /// Assegna i riposi settimanali (singolo collaboratore o batch)
    Riposi {
        #[arg(long)]
        contesto: String,
        /// Id collaboratore; in assenza si esegue il batch su tutto il roster
        #[arg(long)]
        collaboratore: Option<String>,
        /// Giorni espliciti "4,7" (1 = lunedì); solo con --collaboratore
        #[arg(long)]
        giorni: Option<String>,
        /// Granularità per i giorni espliciti: "giorno", "mattina" o "pomeriggio"
        #[arg(long)]
        granularita: Option<String>,
        /// Archivio JSON dei riposi su cui fare upsert
        #[arg(long)]
        archivio: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Verifica i conflitti di una data sui turni esistenti
    Valida {
        #[arg(long)]
        contesto: String,
        /// Data ISO (YYYY-MM-DD)
        #[arg(long)]
        data: String,
        /// Export CSV dei conflitti (opzionale)
        #[arg(long)]
        report: Option<String>,
        #[arg(long, default_value_t = 2)]
        max_turni_per_giorno: u8,
        #[arg(long, default_value_t = 8.0)]
        ore_riposo_minimo: f32,
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

    let code = match cli.cmd {
        Commands::Genera {
            contesto,
            chiusure,
            out_json,
            out_csv,
            max_turni_per_giorno,
            ore_riposo_minimo,
        } => {
            let ctx = io::carica_contesto(contesto)?;
            let opzioni = OpzioniMotore {
                max_turni_per_giorno,
                ore_riposo_minimo,
                ..OpzioniMotore::default()
            };
            let mut risultato = engine::genera(&ctx, opzioni)?;
            if let Some(path) = chiusure {
                let giorni_chiusi = io::carica_chiusure(path)?;
                engine::filtra_chiusure(&mut risultato, &giorni_chiusi);
            }
            #[cfg(feature = "logging")]
            tracing::info!(
                turni = risultato.turni.len(),
                warnings = risultato.warnings.len(),
                "generazione completata"
            );
            if let Some(path) = out_json {
                io::esporta_risultato_json(path, &risultato)?;
            }
            if let Some(path) = out_csv {
                io::esporta_turni_csv(path, &risultato.turni)?;
            }
            // stampa compatta
            for t in &risultato.turni {
                let assegnati = t
                    .collaboratori
                    .iter()
                    .map(|c| c.as_str())
                    .collect::<Vec<_>>()
                    .join(",");
                println!(
                    "{} | {} {} → {} | {}/{} | {}",
                    t.id.as_str(),
                    t.data,
                    t.inizio.format("%H:%M"),
                    t.fine.format("%H:%M"),
                    t.collaboratori.len(),
                    t.richiesti,
                    if assegnati.is_empty() { "-" } else { assegnati.as_str() }
                );
            }
            for w in &risultato.warnings {
                eprintln!("[{:?}] {}", w.severita, w.messaggio);
            }
            println!("confidenza media: {:.2}", risultato.confidenza_media);
            // Codice 2 = copertura incompleta
            if risultato
                .warnings
                .iter()
                .any(|w| w.severita != Severita::Info)
            {
                2
            } else {
                0
            }
        }

        Commands::Riposi {
            contesto,
            collaboratore,
            giorni,
            granularita,
            archivio,
            out_csv,
        } => {
            let ctx = io::carica_contesto(contesto)?;
            let granularita = match granularita.as_deref() {
                None => None,
                Some("giorno") => Some(GranularitaRiposo::GiornoIntero),
                Some("mattina") => Some(GranularitaRiposo::MezzaMattina),
                Some("pomeriggio") => Some(GranularitaRiposo::MezzoPomeriggio),
                Some(altro) => bail!("granularita non riconosciuta: {altro}"),
            };
            let (riposi, incompleto) = match collaboratore {
                Some(id) => {
                    let modalita = match giorni {
                        Some(lista) => {
                            let giorni: Vec<u8> = lista
                                .split(',')
                                .map(|s| s.trim().parse())
                                .collect::<Result<_, _>>()?;
                            ModalitaRiposo::Specifica {
                                giorni,
                                granularita,
                            }
                        }
                        None => {
                            if granularita.is_some() {
                                bail!("--granularita richiede --giorni");
                            }
                            ModalitaRiposo::Automatica
                        }
                    };
                    let esito =
                        engine::assegna_riposi(&ctx, &CollaboratoreId::new(id), &modalita)?;
                    for w in &esito.warnings {
                        eprintln!("[{:?}] {}", w.severita, w.messaggio);
                    }
                    if let Some(motivazione) = &esito.motivazione {
                        eprintln!("quota incompleta: {motivazione}");
                    }
                    (esito.riposi, !esito.successo)
                }
                None => {
                    if giorni.is_some() || granularita.is_some() {
                        bail!("--giorni e --granularita richiedono --collaboratore");
                    }
                    let esito = engine::assegna_riposi_tutti(&ctx)?;
                    for w in &esito.warnings {
                        eprintln!("[{:?}] {}", w.severita, w.messaggio);
                    }
                    println!(
                        "collaboratori elaborati: {}, saltati: {}",
                        esito.elaborati, esito.saltati
                    );
                    (esito.riposi, false)
                }
            };
            for r in &riposi {
                println!(
                    "{} | settimana {} giorno {} | {} | {:.2}",
                    r.collaboratore.as_str(),
                    r.settimana,
                    r.giorno,
                    r.granularita.as_str(),
                    r.confidenza
                );
            }
            if let Some(path) = archivio {
                let store = RiposiJson::apri(path)?;
                store.upsert(&riposi)?;
            }
            if let Some(path) = out_csv {
                io::esporta_riposi_csv(path, &riposi)?;
            }
            if incompleto {
                2
            } else {
                0
            }
        }

        Commands::Valida {
            contesto,
            data,
            report,
            max_turni_per_giorno,
            ore_riposo_minimo,
        } => {
            let ctx = io::carica_contesto(contesto)?;
            let data = data.parse()?;
            let opzioni = OpzioniMotore {
                max_turni_per_giorno,
                ore_riposo_minimo,
                ..OpzioniMotore::default()
            };
            let conflitti = engine::conflitti_del_giorno(&ctx, data, opzioni);
            if conflitti.is_empty() {
                println!("OK: no conflicts");
                0
            } else {
                eprintln!("Found {} conflict(s)", conflitti.len());
                if let Some(path) = report {
                    // CSV semplice
                    let mut w = csv::Writer::from_path(path)?;
                    w.write_record(["collaboratore", "data", "turno_a", "turno_b", "tipo"])?;
                    for c in &conflitti {
                        w.write_record([
                            c.collaboratore.as_str(),
                            &c.data.to_string(),
                            c.turno_a.as_str(),
                            c.turno_b.as_ref().map(|t| t.as_str()).unwrap_or(""),
                            match c.tipo {
                                turnario::TipoConflitto::Sovrapposizione => "sovrapposizione",
                                turnario::TipoConflitto::RiposoInsufficiente => "riposo",
                                turnario::TipoConflitto::TroppiTurni => "troppi_turni",
                            },
                        ])?;
                    }
                    w.flush()?;
                }
                2
            }
        }
    };

    std::process::exit(code);
}
