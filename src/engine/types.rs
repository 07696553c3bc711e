use crate::model::{CollaboratoreId, TurnoId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opzioni del motore (vincoli e pesi di scoring)
#[derive(Debug, Clone, Copy)]
pub struct OpzioniMotore {
    pub max_turni_per_giorno: u8,
    pub ore_riposo_minimo: f32,
    /// Peso del margine di ore residue normalizzato in [0,1].
    pub peso_ore_residue: f32,
    /// Peso del segnale di preferenza.
    pub peso_preferenza: f32,
    /// Bonus per chi ha già lavorato quel (nucleo, giorno).
    pub bonus_affinita: f32,
    /// Penalità applicata quando la validazione segnala riposo breve.
    pub penalita_riposo_breve: f32,
}

impl Default for OpzioniMotore {
    fn default() -> Self {
        Self {
            max_turni_per_giorno: 2,
            ore_riposo_minimo: 8.0,
            peso_ore_residue: 0.5,
            peso_preferenza: 0.3,
            bonus_affinita: 0.2,
            penalita_riposo_breve: 0.15,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severita {
    Info,
    Avviso,
    Errore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoriaWarning {
    CoperturaInsufficiente,
    RiposoNonAssegnato,
    TurniRimossi,
    RilocazioneSuggerita,
}

/// Segnalazione non bloccante allegata a un risultato.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warning {
    pub categoria: CategoriaWarning,
    pub severita: Severita,
    pub messaggio: String,
}

impl Warning {
    pub fn nuovo<M: Into<String>>(
        categoria: CategoriaWarning,
        severita: Severita,
        messaggio: M,
    ) -> Self {
        Self {
            categoria,
            severita,
            messaggio: messaggio.into(),
        }
    }
}

/// Errori di validazione al confine del motore. L'infattibilità non passa
/// mai di qui: diventa warning o esito con motivazione.
#[derive(Error, Debug)]
pub enum MotoreError {
    #[error("week start must be a Monday: {0}")]
    SettimanaNonLunedi(NaiveDate),
    #[error("roster is empty")]
    RosterVuoto,
    #[error("no nuclei defined")]
    NucleiAssenti,
    #[error("nucleo {0}: minimum staff must be >= 1")]
    MinimoNonValido(String),
    #[error("nucleo {0}: maximum staff below minimum")]
    MassimoNonValido(String),
    #[error("invalid contract for {0}: {1}")]
    ContrattoNonValido(String, String),
    #[error("duplicate active membership: collaboratore {0}, nucleo {1}")]
    AppartenenzaDuplicata(String, String),
    #[error("invalid weekday: {0} (expected 1-7)")]
    GiornoNonValido(u8),
    #[error("unknown collaboratore: {0}")]
    CollaboratoreSconosciuto(String),
    #[error("rest quota must be > 0 for {0}")]
    QuotaRiposoNulla(String),
}

/// Esito di `valida_assegnazione`: `severita = Errore` blocca l'azione,
/// `Avviso` è consultivo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EsitoValidazione {
    pub valido: bool,
    #[serde(default)]
    pub motivo: Option<String>,
    #[serde(default)]
    pub severita: Option<Severita>,
}

impl EsitoValidazione {
    pub fn ok() -> Self {
        Self {
            valido: true,
            motivo: None,
            severita: None,
        }
    }

    pub fn respinto<M: Into<String>>(motivo: M, severita: Severita) -> Self {
        Self {
            valido: false,
            motivo: Some(motivo.into()),
            severita: Some(severita),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TipoConflitto {
    Sovrapposizione,
    RiposoInsufficiente,
    TroppiTurni,
}

/// Violazione rilevata dalla scansione per data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conflitto {
    pub collaboratore: CollaboratoreId,
    pub data: NaiveDate,
    pub turno_a: TurnoId,
    /// Assente per i conflitti che non coinvolgono una coppia (TroppiTurni).
    #[serde(default)]
    pub turno_b: Option<TurnoId>,
    pub tipo: TipoConflitto,
}
