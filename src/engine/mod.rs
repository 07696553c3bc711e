mod assignment;
mod availability;
mod conflicts;
mod demand;
mod interval;
mod rest;
mod types;

pub use availability::{valuta as valuta_disponibilita, Disponibilita};
pub use conflicts::ConflictChecker;
pub use demand::{calcola_domanda, SlotDomanda};
pub use interval::{durata_minuti, fasce_si_sovrappongono, ore_riposo, si_sovrappongono};
pub use rest::ModalitaRiposo;
pub use types::{
    CategoriaWarning, Conflitto, EsitoValidazione, MotoreError, OpzioniMotore, Severita,
    TipoConflitto, Warning,
};

use crate::model::{
    e_lunedi, AffinitaStorica, Collaboratore, CollaboratoreId, CriticitaContinuativa, Nucleo,
    PatternStorico, PeriodoCritico, PreferenzaCollaboratore, RichiestaApprovata,
    RiposoSettimanale, Turno, TurnoId,
};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Fotografia immutabile degli ingressi di una generazione: il chiamante la
/// assembla una volta dai dati persistiti, il motore non fa I/O.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContestoGenerazione {
    /// Lunedì di inizio della settimana da pianificare.
    pub settimana: NaiveDate,
    pub collaboratori: Vec<Collaboratore>,
    pub nuclei: Vec<Nucleo>,
    #[serde(default)]
    pub criticita: Vec<CriticitaContinuativa>,
    #[serde(default)]
    pub periodi_critici: Vec<PeriodoCritico>,
    #[serde(default)]
    pub pattern: Vec<PatternStorico>,
    #[serde(default)]
    pub affinita: Vec<AffinitaStorica>,
    #[serde(default)]
    pub riposi: Vec<RiposoSettimanale>,
    #[serde(default)]
    pub richieste: Vec<RichiestaApprovata>,
    #[serde(default)]
    pub preferenze: Vec<PreferenzaCollaboratore>,
    #[serde(default)]
    pub turni_esistenti: Vec<Turno>,
}

impl ContestoGenerazione {
    pub fn nuovo(settimana: NaiveDate) -> Self {
        Self {
            settimana,
            collaboratori: Vec::new(),
            nuclei: Vec::new(),
            criticita: Vec::new(),
            periodi_critici: Vec::new(),
            pattern: Vec::new(),
            affinita: Vec::new(),
            riposi: Vec::new(),
            richieste: Vec::new(),
            preferenze: Vec::new(),
            turni_esistenti: Vec::new(),
        }
    }

    /// Validazione al confine: malformazioni strutturali vengono respinte
    /// prima di qualsiasi scoring.
    pub fn valida(&self) -> Result<(), MotoreError> {
        if !e_lunedi(self.settimana) {
            return Err(MotoreError::SettimanaNonLunedi(self.settimana));
        }
        if self.collaboratori.is_empty() {
            return Err(MotoreError::RosterVuoto);
        }
        if self.nuclei.is_empty() {
            return Err(MotoreError::NucleiAssenti);
        }
        for n in &self.nuclei {
            if n.minimo == 0 {
                return Err(MotoreError::MinimoNonValido(n.id.as_str().to_string()));
            }
            if let Some(massimo) = n.massimo {
                if massimo < n.minimo {
                    return Err(MotoreError::MassimoNonValido(n.id.as_str().to_string()));
                }
            }
        }
        for c in &self.collaboratori {
            c.contratto.valida().map_err(|msg| {
                MotoreError::ContrattoNonValido(c.id.as_str().to_string(), msg)
            })?;
            // al più un'appartenenza aperta per nucleo
            let mut aperte = HashSet::new();
            for a in c.appartenenze.iter().filter(|a| a.al.is_none()) {
                if !aperte.insert(a.nucleo.clone()) {
                    return Err(MotoreError::AppartenenzaDuplicata(
                        c.id.as_str().to_string(),
                        a.nucleo.as_str().to_string(),
                    ));
                }
            }
        }
        for c in &self.criticita {
            if !(1..=7).contains(&c.giorno) {
                return Err(MotoreError::GiornoNonValido(c.giorno));
            }
        }
        for r in &self.riposi {
            if !(1..=7).contains(&r.giorno) {
                return Err(MotoreError::GiornoNonValido(r.giorno));
            }
        }
        Ok(())
    }

    fn trova_collaboratore(&self, id: &CollaboratoreId) -> Result<&Collaboratore, MotoreError> {
        self.collaboratori
            .iter()
            .find(|c| &c.id == id)
            .ok_or_else(|| MotoreError::CollaboratoreSconosciuto(id.as_str().to_string()))
    }
}

/// Risultato di una generazione settimanale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RisultatoGenerazione {
    pub turni: Vec<Turno>,
    pub warnings: Vec<Warning>,
    pub confidenza_media: f32,
}

/// Esito dell'assegnazione riposi per un singolo collaboratore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EsitoRiposi {
    pub riposi: Vec<RiposoSettimanale>,
    pub warnings: Vec<Warning>,
    pub successo: bool,
    /// Spiegazione della mancata copertura della quota, mai un errore.
    #[serde(default)]
    pub motivazione: Option<String>,
}

/// Esito della modalità batch su tutto il roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EsitoRiposiBatch {
    pub riposi: Vec<RiposoSettimanale>,
    pub warnings: Vec<Warning>,
    pub elaborati: usize,
    pub saltati: usize,
}

/// Genera i turni della settimana a partire dalla fotografia `ctx`.
/// Deterministico: stesso contesto, stesso risultato byte per byte.
pub fn genera(
    ctx: &ContestoGenerazione,
    opzioni: OpzioniMotore,
) -> Result<RisultatoGenerazione, MotoreError> {
    ctx.valida()?;
    Ok(assignment::genera(ctx, opzioni))
}

/// Assegna la quota di riposi di un singolo collaboratore.
pub fn assegna_riposi(
    ctx: &ContestoGenerazione,
    collaboratore: &CollaboratoreId,
    modalita: &ModalitaRiposo,
) -> Result<EsitoRiposi, MotoreError> {
    ctx.valida()?;
    let c = ctx.trova_collaboratore(collaboratore)?;
    if c.riposo.quantita == 0 {
        return Err(MotoreError::QuotaRiposoNulla(c.id.as_str().to_string()));
    }
    if let ModalitaRiposo::Specifica { giorni, .. } = modalita {
        for g in giorni {
            if !(1..=7).contains(g) {
                return Err(MotoreError::GiornoNonValido(*g));
            }
        }
    }
    Ok(rest::assegna(ctx, c, modalita))
}

/// Assegna i riposi a tutti i collaboratori attivi e disponibili.
pub fn assegna_riposi_tutti(
    ctx: &ContestoGenerazione,
) -> Result<EsitoRiposiBatch, MotoreError> {
    ctx.valida()?;
    Ok(rest::assegna_tutti(ctx))
}

/// Valida l'inserimento manuale di un intervallo contro i turni esistenti
/// del contesto.
pub fn valida_assegnazione(
    ctx: &ContestoGenerazione,
    collaboratore: &CollaboratoreId,
    data: NaiveDate,
    inizio: NaiveTime,
    fine: NaiveTime,
    escludi: Option<&TurnoId>,
    opzioni: OpzioniMotore,
) -> EsitoValidazione {
    ConflictChecker::da_turni(&ctx.turni_esistenti, opzioni)
        .valida_assegnazione(collaboratore, data, inizio, fine, escludi)
}

/// Tutte le violazioni di una data sui turni esistenti del contesto.
pub fn conflitti_del_giorno(
    ctx: &ContestoGenerazione,
    data: NaiveDate,
    opzioni: OpzioniMotore,
) -> Vec<Conflitto> {
    ConflictChecker::da_turni(&ctx.turni_esistenti, opzioni).conflitti_del_giorno(data)
}

/// Post-filtro di competenza del chiamante: rimuove i turni caduti su
/// giornate di chiusura e riporta il conteggio come warning informativo.
pub fn filtra_chiusure(risultato: &mut RisultatoGenerazione, chiusure: &[NaiveDate]) {
    let prima = risultato.turni.len();
    risultato.turni.retain(|t| !chiusure.contains(&t.data));
    let rimossi = prima - risultato.turni.len();
    if rimossi == 0 {
        return;
    }
    risultato.warnings.push(Warning::nuovo(
        CategoriaWarning::TurniRimossi,
        Severita::Info,
        format!("{rimossi} turni rimossi perche' caduti su giornate di chiusura"),
    ));
    risultato.confidenza_media = if risultato.turni.is_empty() {
        0.0
    } else {
        risultato.turni.iter().map(|t| t.confidenza).sum::<f32>() / risultato.turni.len() as f32
    };
}
