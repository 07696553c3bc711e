use super::interval;
use super::types::{Conflitto, EsitoValidazione, OpzioniMotore, Severita, TipoConflitto};
use crate::model::{CollaboratoreId, Turno, TurnoId};
use chrono::{NaiveDate, NaiveTime};
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct IntervalloRegistrato {
    turno: TurnoId,
    inizio: NaiveTime,
    fine: NaiveTime,
}

/// Validatore di conflitti indicizzato per (data → collaboratore → intervalli):
/// la scansione di un giorno resta O(collaboratori × turni di quel giorno).
#[derive(Debug, Default)]
pub struct ConflictChecker {
    opzioni: OpzioniMotore,
    per_giorno: HashMap<NaiveDate, HashMap<CollaboratoreId, Vec<IntervalloRegistrato>>>,
}

impl ConflictChecker {
    pub fn nuovo(opzioni: OpzioniMotore) -> Self {
        Self {
            opzioni,
            per_giorno: HashMap::new(),
        }
    }

    /// Costruisce l'indice dai turni già esistenti (uno per collaboratore assegnato).
    pub fn da_turni(turni: &[Turno], opzioni: OpzioniMotore) -> Self {
        let mut checker = Self::nuovo(opzioni);
        for t in turni {
            for c in &t.collaboratori {
                checker.registra(c.clone(), t.id.clone(), t.data, t.inizio, t.fine);
            }
        }
        checker
    }

    pub fn registra(
        &mut self,
        collaboratore: CollaboratoreId,
        turno: TurnoId,
        data: NaiveDate,
        inizio: NaiveTime,
        fine: NaiveTime,
    ) {
        self.per_giorno
            .entry(data)
            .or_default()
            .entry(collaboratore)
            .or_default()
            .push(IntervalloRegistrato {
                turno,
                inizio,
                fine,
            });
    }

    /// Valida l'aggiunta di un intervallo per un collaboratore in una data.
    /// Troppi turni e sovrapposizioni sono `Errore`; uno stacco sotto soglia
    /// è `Avviso` (le attività possono accettare cambi ravvicinati).
    pub fn valida_assegnazione(
        &self,
        collaboratore: &CollaboratoreId,
        data: NaiveDate,
        inizio: NaiveTime,
        fine: NaiveTime,
        escludi: Option<&TurnoId>,
    ) -> EsitoValidazione {
        let vuoto = Vec::new();
        let esistenti: Vec<&IntervalloRegistrato> = self
            .per_giorno
            .get(&data)
            .and_then(|g| g.get(collaboratore))
            .unwrap_or(&vuoto)
            .iter()
            .filter(|r| escludi.map_or(true, |e| &r.turno != e))
            .collect();

        if esistenti.len() >= usize::from(self.opzioni.max_turni_per_giorno) {
            return EsitoValidazione::respinto(
                format!(
                    "gia' {} turni il {} (massimo {})",
                    esistenti.len(),
                    data,
                    self.opzioni.max_turni_per_giorno
                ),
                Severita::Errore,
            );
        }

        for r in &esistenti {
            if interval::si_sovrappongono(r.inizio, r.fine, inizio, fine) {
                return EsitoValidazione::respinto(
                    format!("sovrapposizione con il turno {}", r.turno.as_str()),
                    Severita::Errore,
                );
            }
        }

        for r in &esistenti {
            let stacco = interval::ore_riposo(r.fine, inizio)
                .min(interval::ore_riposo(fine, r.inizio));
            if stacco < self.opzioni.ore_riposo_minimo {
                return EsitoValidazione::respinto(
                    format!(
                        "stacco di {stacco:.1}h dal turno {} (minimo {:.1}h)",
                        r.turno.as_str(),
                        self.opzioni.ore_riposo_minimo
                    ),
                    Severita::Avviso,
                );
            }
        }

        EsitoValidazione::ok()
    }

    /// Tutte le violazioni di una data, per la revisione manuale.
    pub fn conflitti_del_giorno(&self, data: NaiveDate) -> Vec<Conflitto> {
        let mut out = Vec::new();
        let Some(giorno) = self.per_giorno.get(&data) else {
            return out;
        };

        let mut collaboratori: Vec<&CollaboratoreId> = giorno.keys().collect();
        collaboratori.sort_by(|a, b| a.as_str().cmp(b.as_str()));

        for id in collaboratori {
            let mut turni: Vec<&IntervalloRegistrato> = giorno[id].iter().collect();
            turni.sort_by_key(|r| r.inizio);

            if turni.len() > usize::from(self.opzioni.max_turni_per_giorno) {
                out.push(Conflitto {
                    collaboratore: id.clone(),
                    data,
                    turno_a: turni[usize::from(self.opzioni.max_turni_per_giorno)]
                        .turno
                        .clone(),
                    turno_b: None,
                    tipo: TipoConflitto::TroppiTurni,
                });
            }

            for (idx, a) in turni.iter().enumerate() {
                for b in turni.iter().skip(idx + 1) {
                    if interval::si_sovrappongono(a.inizio, a.fine, b.inizio, b.fine) {
                        out.push(Conflitto {
                            collaboratore: id.clone(),
                            data,
                            turno_a: a.turno.clone(),
                            turno_b: Some(b.turno.clone()),
                            tipo: TipoConflitto::Sovrapposizione,
                        });
                        continue;
                    }
                    let stacco = interval::ore_riposo(a.fine, b.inizio)
                        .min(interval::ore_riposo(b.fine, a.inizio));
                    if stacco < self.opzioni.ore_riposo_minimo {
                        out.push(Conflitto {
                            collaboratore: id.clone(),
                            data,
                            turno_a: a.turno.clone(),
                            turno_b: Some(b.turno.clone()),
                            tipo: TipoConflitto::RiposoInsufficiente,
                        });
                    }
                }
            }
        }

        out
    }
}
