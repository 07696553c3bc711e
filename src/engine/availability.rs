use super::demand::SlotDomanda;
use super::interval;
use super::ContestoGenerazione;
use crate::model::{
    numero_giorno, Collaboratore, FasciaOraria, GranularitaRiposo, PolaritaPreferenza,
};

/// Valutazione di un collaboratore rispetto a uno slot di domanda.
#[derive(Debug, Clone, PartialEq)]
pub struct Disponibilita {
    pub idoneo: bool,
    pub motivo: Option<&'static str>,
    /// Ore settimanali ancora spendibili (mai negative).
    pub ore_residue: f32,
    pub peso_preferenza: f32,
}

impl Disponibilita {
    fn escluso(motivo: &'static str, ore_residue: f32) -> Self {
        Self {
            idoneo: false,
            motivo: Some(motivo),
            ore_residue,
            peso_preferenza: 0.0,
        }
    }
}

/// Motivo di esclusione usato dal motore per suggerire rilocazioni.
pub const MOTIVO_NUCLEO: &str = "non appartiene al nucleo";

/// Applica esclusioni dure (assenze, riposi, appartenenza, budget ore) e
/// calcola il peso di preferenza per lo slot. `ore_in_corso` sono le ore
/// già piazzate in questa stessa esecuzione.
pub fn valuta(
    ctx: &ContestoGenerazione,
    collaboratore: &Collaboratore,
    slot: &SlotDomanda,
    ore_in_corso: f32,
) -> Disponibilita {
    let ore_residue = (collaboratore.contratto.ore_settimanali()
        - collaboratore.ore_gia_assegnate
        - ore_in_corso)
        .max(0.0);

    if !collaboratore.attivo {
        return Disponibilita::escluso("collaboratore non attivo", ore_residue);
    }

    if !collaboratore.membro_attivo(&slot.nucleo, slot.data) {
        return Disponibilita::escluso(MOTIVO_NUCLEO, ore_residue);
    }

    if ctx
        .richieste
        .iter()
        .any(|r| r.collaboratore == collaboratore.id && r.copre(slot.data))
    {
        return Disponibilita::escluso("assenza approvata", ore_residue);
    }

    let giorno = numero_giorno(slot.data);
    let finestra = FasciaOraria::new(slot.inizio, slot.fine);
    for riposo in ctx
        .riposi
        .iter()
        .filter(|r| r.collaboratore == collaboratore.id && r.settimana == ctx.settimana && r.giorno == giorno)
    {
        let copre = match riposo.granularita {
            GranularitaRiposo::GiornoIntero => true,
            GranularitaRiposo::MezzaMattina => {
                interval::fasce_si_sovrappongono(&interval::fascia_mattina(), &finestra)
            }
            GranularitaRiposo::MezzoPomeriggio => {
                interval::fasce_si_sovrappongono(&interval::fascia_pomeriggio(), &finestra)
            }
        };
        if copre {
            return Disponibilita::escluso("riposo assegnato", ore_residue);
        }
    }

    let durata_ore = interval::durata_minuti(slot.inizio, slot.fine) as f32 / 60.0;
    if ore_residue < durata_ore {
        return Disponibilita::escluso("budget ore settimanali esaurito", ore_residue);
    }

    let mut peso = 0.0f32;
    if !slot.sopprimi_preferenze {
        for pref in ctx
            .preferenze
            .iter()
            .filter(|p| p.collaboratore == collaboratore.id && p.data == slot.data)
        {
            let finestra_pref = pref.fascia.unwrap_or_else(FasciaOraria::giornata_intera);
            let tocca = interval::fasce_si_sovrappongono(&finestra_pref, &finestra);
            match pref.polarita {
                PolaritaPreferenza::Preferito if tocca => peso += 1.0,
                // quasi-esclusione: resta idoneo ma in coda a tutti
                PolaritaPreferenza::NonDisponibile if tocca => peso -= 10.0,
                PolaritaPreferenza::SoloDisponibile if !tocca => peso -= 10.0,
                _ => {}
            }
        }
    }

    Disponibilita {
        idoneo: true,
        motivo: None,
        ore_residue,
        peso_preferenza: peso,
    }
}
