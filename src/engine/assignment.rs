use super::availability::{self, MOTIVO_NUCLEO};
use super::conflicts::ConflictChecker;
use super::demand;
use super::types::{CategoriaWarning, OpzioniMotore, Severita, Warning};
use super::{ContestoGenerazione, RisultatoGenerazione};
use crate::model::{numero_giorno, Collaboratore, CollaboratoreId, Turno};
use std::collections::HashMap;

struct Candidato {
    id: CollaboratoreId,
    punteggio: f32,
}

/// Riempimento greedy deterministico degli slot di domanda.
///
/// Gli slot arrivano già ordinati dal più vincolato; per ciascuno si valuta
/// l'intero roster, si scartano gli inidonei e chi fallisce la validazione
/// con `Errore`, si ordina per punteggio decrescente con pareggi risolti
/// sull'id, e si assegna fino al fabbisogno. Le carenze diventano warning.
pub(super) fn genera(
    ctx: &ContestoGenerazione,
    opzioni: OpzioniMotore,
) -> RisultatoGenerazione {
    let slots = demand::calcola_domanda(ctx);
    let mut checker = ConflictChecker::da_turni(&ctx.turni_esistenti, opzioni);
    let mut ore_in_corso: HashMap<CollaboratoreId, f32> = HashMap::new();

    let mut roster: Vec<&Collaboratore> = ctx.collaboratori.iter().filter(|c| c.attivo).collect();
    roster.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));

    let mut turni = Vec::with_capacity(slots.len());
    let mut warnings = Vec::new();

    for slot in &slots {
        let durata_ore =
            super::interval::durata_minuti(slot.inizio, slot.fine) as f32 / 60.0;
        let giorno = numero_giorno(slot.data);

        let mut candidati: Vec<Candidato> = Vec::new();
        let mut esclusi_solo_per_nucleo = 0usize;

        for c in &roster {
            let gia = ore_in_corso.get(&c.id).copied().unwrap_or(0.0);
            let disp = availability::valuta(ctx, c, slot, gia);
            if !disp.idoneo {
                if disp.motivo == Some(MOTIVO_NUCLEO) && disp.ore_residue >= durata_ore {
                    esclusi_solo_per_nucleo += 1;
                }
                continue;
            }

            let esito = checker.valida_assegnazione(&c.id, slot.data, slot.inizio, slot.fine, None);
            let mut penalita = 0.0f32;
            match esito.severita {
                Some(Severita::Errore) => continue,
                Some(Severita::Avviso) => penalita = opzioni.penalita_riposo_breve,
                _ => {}
            }

            let contrattuali = c.contratto.ore_settimanali().max(1.0);
            let margine = (disp.ore_residue / contrattuali).clamp(0.0, 1.0);
            let affinita = ctx.affinita.iter().any(|a| {
                a.collaboratore == c.id && a.nucleo == slot.nucleo && a.giorno == giorno
            });

            let mut punteggio = opzioni.peso_ore_residue * margine
                + opzioni.peso_preferenza * disp.peso_preferenza
                - penalita;
            if affinita {
                punteggio += opzioni.bonus_affinita;
                // il pattern storico pesa solo come spareggio
                if let Some(media) = slot.hint_storico {
                    let atteso = f32::from(slot.richiesti.max(1));
                    punteggio += 0.05 * (media / atteso).clamp(0.0, 1.0);
                }
            }

            candidati.push(Candidato {
                id: c.id.clone(),
                punteggio,
            });
        }

        candidati.sort_by(|a, b| {
            b.punteggio
                .total_cmp(&a.punteggio)
                .then_with(|| a.id.as_str().cmp(b.id.as_str()))
        });
        candidati.truncate(usize::from(slot.richiesti));

        for scelto in &candidati {
            *ore_in_corso.entry(scelto.id.clone()).or_insert(0.0) += durata_ore;
        }

        let mut turno = Turno::nuovo(
            slot.nucleo.clone(),
            slot.data,
            slot.inizio,
            slot.fine,
            slot.richiesti,
        );
        for scelto in &candidati {
            checker.registra(
                scelto.id.clone(),
                turno.id.clone(),
                slot.data,
                slot.inizio,
                slot.fine,
            );
        }
        turno.collaboratori = candidati.iter().map(|c| c.id.clone()).collect();
        turno.confidenza = if candidati.is_empty() {
            0.0
        } else {
            candidati
                .iter()
                .map(|c| c.punteggio.clamp(0.0, 1.0))
                .sum::<f32>()
                / candidati.len() as f32
        };

        let mancanti = usize::from(slot.richiesti).saturating_sub(candidati.len());
        if mancanti > 0 {
            turno.nota = format!("copertura parziale: mancano {mancanti} persone");
            warnings.push(Warning::nuovo(
                CategoriaWarning::CoperturaInsufficiente,
                Severita::Avviso,
                format!(
                    "nucleo {} il {}: assegnati {}/{} (mancano {})",
                    slot.nucleo.as_str(),
                    slot.data,
                    candidati.len(),
                    slot.richiesti,
                    mancanti
                ),
            ));
            if esclusi_solo_per_nucleo > 0 {
                warnings.push(Warning::nuovo(
                    CategoriaWarning::RilocazioneSuggerita,
                    Severita::Info,
                    format!(
                        "nucleo {} il {}: {} collaboratori con ore residue esclusi solo per appartenenza",
                        slot.nucleo.as_str(),
                        slot.data,
                        esclusi_solo_per_nucleo
                    ),
                ));
            }
        }

        turni.push(turno);
    }

    let confidenza_media = if turni.is_empty() {
        0.0
    } else {
        turni.iter().map(|t| t.confidenza).sum::<f32>() / turni.len() as f32
    };

    RisultatoGenerazione {
        turni,
        warnings,
        confidenza_media,
    }
}
