use crate::engine::{ContestoGenerazione, RisultatoGenerazione};
use crate::model::{RiposoSettimanale, Turno};
use anyhow::Context;
use chrono::NaiveDate;
use csv::WriterBuilder;
use std::fs;
use std::path::Path;

/// Carica la fotografia di generazione da un file JSON.
pub fn carica_contesto<P: AsRef<Path>>(path: P) -> anyhow::Result<ContestoGenerazione> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let ctx: ContestoGenerazione =
        serde_json::from_slice(&data).with_context(|| format!("parsing {}", path.display()))?;
    Ok(ctx)
}

/// Carica l'elenco di giornate di chiusura (array JSON di date ISO).
pub fn carica_chiusure<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<NaiveDate>> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let chiusure: Vec<NaiveDate> =
        serde_json::from_slice(&data).with_context(|| format!("parsing {}", path.display()))?;
    Ok(chiusure)
}

/// Export JSON del risultato di generazione (con indentazione).
pub fn esporta_risultato_json<P: AsRef<Path>>(
    path: P,
    risultato: &RisultatoGenerazione,
) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(risultato)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export CSV dei turni: header `id,nucleo,data,inizio,fine,richiesti,assegnati,collaboratori,confidenza`
pub fn esporta_turni_csv<P: AsRef<Path>>(path: P, turni: &[Turno]) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record([
        "id",
        "nucleo",
        "data",
        "inizio",
        "fine",
        "richiesti",
        "assegnati",
        "collaboratori",
        "confidenza",
    ])?;
    for t in turni {
        let collaboratori = t
            .collaboratori
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(";");
        w.write_record([
            t.id.as_str(),
            t.nucleo.as_str(),
            &t.data.to_string(),
            &t.inizio.format("%H:%M").to_string(),
            &t.fine.format("%H:%M").to_string(),
            &t.richiesti.to_string(),
            &t.collaboratori.len().to_string(),
            &collaboratori,
            &format!("{:.2}", t.confidenza),
        ])?;
    }
    w.flush()?;
    Ok(())
}

/// Export CSV dei riposi: header `collaboratore,settimana,giorno,granularita,provenienza,confidenza`
pub fn esporta_riposi_csv<P: AsRef<Path>>(
    path: P,
    riposi: &[RiposoSettimanale],
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record([
        "collaboratore",
        "settimana",
        "giorno",
        "granularita",
        "provenienza",
        "confidenza",
    ])?;
    for r in riposi {
        w.write_record([
            r.collaboratore.as_str(),
            &r.settimana.to_string(),
            &r.giorno.to_string(),
            r.granularita.as_str(),
            r.provenienza.as_str(),
            &format!("{:.2}", r.confidenza),
        ])?;
    }
    w.flush()?;
    Ok(())
}
