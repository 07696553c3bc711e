use super::interval;
use super::ContestoGenerazione;
use crate::model::{numero_giorno, FasciaOraria, NucleoId};
use chrono::{Days, NaiveDate, NaiveTime};

/// Fabbisogno per (nucleo, giorno, fascia) nella settimana in esame.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotDomanda {
    pub nucleo: NucleoId,
    pub data: NaiveDate,
    pub inizio: NaiveTime,
    pub fine: NaiveTime,
    pub richiesti: u8,
    /// Media storica quando nessun segnale esplicito si applica: influenza
    /// solo lo scoring, mai il fabbisogno.
    pub hint_storico: Option<f32>,
    /// Impostato da un periodo critico che sospende le preferenze.
    pub sopprimi_preferenze: bool,
}

/// Deriva gli slot di domanda della settimana: minimo del nucleo, più gli
/// extra additivi delle criticità, max contro i floor dei periodi critici,
/// moltiplicatori per ultimi (composti), arrotondando per eccesso.
///
/// L'ordinamento è totale e deterministico: richiesti decrescenti, poi data,
/// poi ora di inizio, poi id nucleo — i vincoli più stretti vengono serviti
/// per primi.
pub fn calcola_domanda(ctx: &ContestoGenerazione) -> Vec<SlotDomanda> {
    let mut slots = Vec::with_capacity(ctx.nuclei.len() * 7);

    for offset in 0..7u64 {
        let data = ctx.settimana + Days::new(offset);
        let giorno = numero_giorno(data);

        for nucleo in &ctx.nuclei {
            let finestra = nucleo.orario.unwrap_or_else(FasciaOraria::giornata_intera);

            let mut extra: u32 = 0;
            let mut moltiplicatore: f32 = 1.0;
            let mut floor: u32 = 0;
            let mut esplicito = false;
            let mut sopprimi = false;

            for c in ctx.criticita.iter().filter(|c| c.attiva && c.giorno == giorno) {
                if interval::fascia_opzionale_copre(&c.fascia, &finestra) {
                    extra += u32::from(c.staff_extra);
                    moltiplicatore *= c.moltiplicatore;
                    esplicito = true;
                }
            }

            for p in ctx.periodi_critici.iter().filter(|p| p.copre(data)) {
                if interval::fascia_opzionale_copre(&p.fascia, &finestra) {
                    if let Some(minimo) = p.staff_minimo {
                        floor = floor.max(u32::from(minimo));
                    }
                    if let Some(f) = p.moltiplicatore {
                        moltiplicatore *= f;
                    }
                    if p.ignora_preferenze {
                        sopprimi = true;
                    }
                    esplicito = true;
                }
            }

            let base = u32::from(nucleo.minimo) + extra;
            let mut richiesti = ((base.max(floor) as f32) * moltiplicatore).ceil() as u32;
            if let Some(massimo) = nucleo.massimo {
                richiesti = richiesti.min(u32::from(massimo));
            }
            let richiesti = richiesti.min(u32::from(u8::MAX)) as u8;

            let hint_storico = if esplicito {
                None
            } else {
                ctx.pattern
                    .iter()
                    .find(|p| p.nucleo == nucleo.id && p.giorno == giorno)
                    .map(|p| p.media)
            };

            slots.push(SlotDomanda {
                nucleo: nucleo.id.clone(),
                data,
                inizio: finestra.inizio,
                fine: finestra.fine,
                richiesti,
                hint_storico,
                sopprimi_preferenze: sopprimi,
            });
        }
    }

    slots.sort_by(|a, b| {
        b.richiesti
            .cmp(&a.richiesti)
            .then(a.data.cmp(&b.data))
            .then(a.inizio.cmp(&b.inizio))
            .then_with(|| a.nucleo.as_str().cmp(b.nucleo.as_str()))
    });
    slots
}
