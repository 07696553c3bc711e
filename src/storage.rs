use crate::model::RiposoSettimanale;
use anyhow::Context;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Archivio dei riposi settimanali. La semantica di scrittura è upsert
/// sulla chiave (collaboratore, settimana, giorno): rieseguire un batch
/// per la stessa settimana collassa sullo stesso insieme.
pub trait ArchivioRiposi {
    /// Carica tutti i riposi persistiti (vuoto se l'archivio non esiste).
    fn carica(&self) -> anyhow::Result<Vec<RiposoSettimanale>>;
    /// Sovrascrive l'archivio in modo atomico.
    fn salva(&self, riposi: &[RiposoSettimanale]) -> anyhow::Result<()>;

    /// Insert-or-replace sulla chiave composta; restituisce l'insieme
    /// risultante. Sicuro sotto doppia invocazione.
    fn upsert(&self, nuovi: &[RiposoSettimanale]) -> anyhow::Result<Vec<RiposoSettimanale>> {
        let mut esistenti = self.carica()?;
        for nuovo in nuovi {
            match esistenti
                .iter()
                .position(|r| r.chiave() == nuovo.chiave())
            {
                Some(pos) => esistenti[pos] = nuovo.clone(),
                None => esistenti.push(nuovo.clone()),
            }
        }
        self.salva(&esistenti)?;
        Ok(esistenti)
    }
}

/// Archivio su singolo file JSON, senza base di dati.
pub struct RiposiJson {
    path: PathBuf,
}

impl RiposiJson {
    pub fn apri<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(Self {
            path: path.as_ref().to_path_buf(),
        })
    }
}

impl ArchivioRiposi for RiposiJson {
    fn carica(&self) -> anyhow::Result<Vec<RiposoSettimanale>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let data =
            fs::read(&self.path).with_context(|| format!("reading {}", self.path.display()))?;
        let riposi: Vec<RiposoSettimanale> = serde_json::from_slice(&data)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        Ok(riposi)
    }

    fn salva(&self, riposi: &[RiposoSettimanale]) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(riposi)?;
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).with_context(|| "atomic rename")?;
        Ok(())
    }
}
