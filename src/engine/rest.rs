use super::types::{CategoriaWarning, Severita, Warning};
use super::{ContestoGenerazione, EsitoRiposi, EsitoRiposiBatch};
use crate::model::{
    data_nella_settimana, numero_giorno, Collaboratore, GranularitaRiposo, ProvenienzaRiposo,
    RiposoSettimanale, TipoRiposo,
};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Modalità di assegnazione dei riposi.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalitaRiposo {
    /// Il motore sceglie i giorni a costo di conflitto minimo.
    Automatica,
    /// Giorni espliciti (1-7) indicati dal chiamante; salta lo scoring ma
    /// non i controlli di esclusione.
    Specifica {
        giorni: Vec<u8>,
        /// Granularità esplicita; in assenza si usa quella del contratto.
        granularita: Option<GranularitaRiposo>,
    },
}

#[derive(Debug, Clone, Copy)]
struct SlotRiposo {
    giorno: u8,
    granularita: GranularitaRiposo,
}

/// Quota in unità di slot: i riposi a ore vengono convertiti in mezze
/// giornate da 4 ore, arrotondando per eccesso.
fn quota_slot(collaboratore: &Collaboratore) -> usize {
    let q = usize::from(collaboratore.riposo.quantita);
    match collaboratore.riposo.tipo {
        TipoRiposo::GiorniInteri | TipoRiposo::MezzeGiornate => q,
        TipoRiposo::Ore => q.div_ceil(4),
    }
}

fn granularita_base(tipo: TipoRiposo) -> GranularitaRiposo {
    match tipo {
        TipoRiposo::GiorniInteri => GranularitaRiposo::GiornoIntero,
        TipoRiposo::MezzeGiornate | TipoRiposo::Ore => GranularitaRiposo::MezzaMattina,
    }
}

/// Un giorno è bloccato se coperto da un'assenza approvata o da un riposo
/// già registrato per quella settimana.
fn giorno_bloccato(ctx: &ContestoGenerazione, collaboratore: &Collaboratore, giorno: u8) -> bool {
    let data = data_nella_settimana(ctx.settimana, giorno);
    if ctx
        .richieste
        .iter()
        .any(|r| r.collaboratore == collaboratore.id && r.copre(data))
    {
        return true;
    }
    ctx.riposi.iter().any(|r| {
        r.collaboratore == collaboratore.id && r.settimana == ctx.settimana && r.giorno == giorno
    })
}

/// Costo di conflitto di un giorno: riposare dove criticità o periodi
/// chiedono personale extra peggiorerebbe una carenza.
fn costo_giorno(ctx: &ContestoGenerazione, data: NaiveDate) -> f32 {
    let giorno = numero_giorno(data);
    let mut costo = 0.0f32;
    for c in ctx.criticita.iter().filter(|c| c.attiva && c.giorno == giorno) {
        costo += f32::from(c.staff_extra) + (c.moltiplicatore - 1.0).max(0.0) * 2.0;
    }
    for p in ctx.periodi_critici.iter().filter(|p| p.copre(data)) {
        costo += f32::from(p.staff_minimo.unwrap_or(0))
            + (p.moltiplicatore.unwrap_or(1.0) - 1.0).max(0.0) * 2.0;
    }
    costo
}

fn distanza_circolare(a: u8, b: u8) -> u8 {
    let diff = a.abs_diff(b);
    diff.min(7 - diff)
}

fn distanza_minima(giorno: u8, scelti: &[u8]) -> u8 {
    scelti
        .iter()
        .map(|s| distanza_circolare(giorno, *s))
        .min()
        .unwrap_or(7)
}

fn nuovo_riposo(
    collaboratore: &Collaboratore,
    settimana: NaiveDate,
    slot: SlotRiposo,
    provenienza: ProvenienzaRiposo,
    confidenza: f32,
) -> RiposoSettimanale {
    RiposoSettimanale {
        collaboratore: collaboratore.id.clone(),
        settimana,
        giorno: slot.giorno,
        granularita: slot.granularita,
        provenienza,
        confidenza,
    }
}

/// Assegna la quota settimanale di un collaboratore. Non solleva mai errori
/// per infattibilità: se la quota non è raggiungibile restituisce un esito
/// parziale con `successo = false` e una `motivazione`.
pub(super) fn assegna(
    ctx: &ContestoGenerazione,
    collaboratore: &Collaboratore,
    modalita: &ModalitaRiposo,
) -> EsitoRiposi {
    match modalita {
        ModalitaRiposo::Specifica {
            giorni,
            granularita,
        } => assegna_specifica(ctx, collaboratore, giorni, *granularita),
        ModalitaRiposo::Automatica => assegna_automatica(ctx, collaboratore),
    }
}

fn assegna_specifica(
    ctx: &ContestoGenerazione,
    collaboratore: &Collaboratore,
    giorni: &[u8],
    granularita: Option<GranularitaRiposo>,
) -> EsitoRiposi {
    let granularita = granularita.unwrap_or_else(|| granularita_base(collaboratore.riposo.tipo));
    let mut riposi = Vec::new();
    let mut warnings = Vec::new();
    let mut scartati = Vec::new();

    for &giorno in giorni {
        if giorno_bloccato(ctx, collaboratore, giorno)
            || riposi.iter().any(|r: &RiposoSettimanale| r.giorno == giorno)
        {
            scartati.push(giorno);
            warnings.push(Warning::nuovo(
                CategoriaWarning::RiposoNonAssegnato,
                Severita::Avviso,
                format!(
                    "{}: giorno {} gia' occupato da assenza o riposo esistente",
                    collaboratore.id.as_str(),
                    giorno
                ),
            ));
            continue;
        }
        let data = data_nella_settimana(ctx.settimana, giorno);
        let confidenza = (1.0 / (1.0 + costo_giorno(ctx, data))).clamp(0.0, 1.0);
        riposi.push(nuovo_riposo(
            collaboratore,
            ctx.settimana,
            SlotRiposo {
                giorno,
                granularita,
            },
            ProvenienzaRiposo::Manuale,
            confidenza,
        ));
    }

    let successo = scartati.is_empty();
    let motivazione = (!successo).then(|| {
        format!(
            "giorni richiesti non assegnabili: {:?} (assenze o riposi gia' presenti)",
            scartati
        )
    });
    EsitoRiposi {
        riposi,
        warnings,
        successo,
        motivazione,
    }
}

fn assegna_automatica(ctx: &ContestoGenerazione, collaboratore: &Collaboratore) -> EsitoRiposi {
    let quota = quota_slot(collaboratore);
    let tipo = collaboratore.riposo.tipo;

    let mut candidati: Vec<SlotRiposo> = Vec::new();
    for giorno in 1..=7u8 {
        if giorno_bloccato(ctx, collaboratore, giorno) {
            continue;
        }
        match tipo {
            TipoRiposo::GiorniInteri => candidati.push(SlotRiposo {
                giorno,
                granularita: GranularitaRiposo::GiornoIntero,
            }),
            TipoRiposo::MezzeGiornate | TipoRiposo::Ore => {
                candidati.push(SlotRiposo {
                    giorno,
                    granularita: GranularitaRiposo::MezzaMattina,
                });
                candidati.push(SlotRiposo {
                    giorno,
                    granularita: GranularitaRiposo::MezzoPomeriggio,
                });
            }
        }
    }

    let mut riposi = Vec::new();
    let mut scelti: Vec<u8> = Vec::new();

    while riposi.len() < quota && !candidati.is_empty() {
        // costo minimo, poi spareggio verso i giorni più lontani da quelli
        // già scelti, poi giorno più basso, mattina prima del pomeriggio
        let migliore = candidati
            .iter()
            .min_by(|a, b| {
                let costo_a = costo_giorno(ctx, data_nella_settimana(ctx.settimana, a.giorno));
                let costo_b = costo_giorno(ctx, data_nella_settimana(ctx.settimana, b.giorno));
                costo_a
                    .total_cmp(&costo_b)
                    .then_with(|| {
                        distanza_minima(b.giorno, &scelti).cmp(&distanza_minima(a.giorno, &scelti))
                    })
                    .then_with(|| a.giorno.cmp(&b.giorno))
                    .then_with(|| {
                        matches!(a.granularita, GranularitaRiposo::MezzoPomeriggio)
                            .cmp(&matches!(b.granularita, GranularitaRiposo::MezzoPomeriggio))
                    })
            })
            .copied();

        let Some(slot) = migliore else { break };
        let data = data_nella_settimana(ctx.settimana, slot.giorno);
        let confidenza = (1.0 / (1.0 + costo_giorno(ctx, data))).clamp(0.0, 1.0);
        riposi.push(nuovo_riposo(
            collaboratore,
            ctx.settimana,
            slot,
            ProvenienzaRiposo::Motore,
            confidenza,
        ));
        scelti.push(slot.giorno);
        // un solo riposo per (settimana, giorno): via tutti gli slot del giorno
        candidati.retain(|c| c.giorno != slot.giorno);
    }

    let successo = riposi.len() >= quota;
    let motivazione = (!successo).then(|| {
        format!(
            "quota {} non raggiungibile per {}: assegnati {}, giorni liberi esauriti",
            quota,
            collaboratore.id.as_str(),
            riposi.len()
        )
    });
    let warnings = if successo {
        Vec::new()
    } else {
        vec![Warning::nuovo(
            CategoriaWarning::RiposoNonAssegnato,
            Severita::Avviso,
            format!(
                "{}: quota riposi incompleta ({}/{})",
                collaboratore.id.as_str(),
                riposi.len(),
                quota
            ),
        )]
    };

    EsitoRiposi {
        riposi,
        warnings,
        successo,
        motivazione,
    }
}

/// Copertura totale della settimana da parte delle assenze approvate:
/// in modalità batch il collaboratore viene saltato del tutto.
fn assente_tutta_la_settimana(ctx: &ContestoGenerazione, collaboratore: &Collaboratore) -> bool {
    (1..=7u8).all(|giorno| {
        let data = data_nella_settimana(ctx.settimana, giorno);
        ctx.richieste
            .iter()
            .any(|r| r.collaboratore == collaboratore.id && r.copre(data))
    })
}

/// Modalità batch: riposi automatici per ogni collaboratore attivo e
/// disponibile, con deduplica finale sulla chiave composta così che una
/// doppia invocazione produca lo stesso insieme.
pub(super) fn assegna_tutti(ctx: &ContestoGenerazione) -> EsitoRiposiBatch {
    let mut attivi: Vec<&Collaboratore> = ctx.collaboratori.iter().filter(|c| c.attivo).collect();
    attivi.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));

    let mut riposi = Vec::new();
    let mut warnings = Vec::new();
    let mut elaborati = 0usize;
    let mut saltati = 0usize;

    for c in attivi {
        if c.riposo.quantita == 0 || assente_tutta_la_settimana(ctx, c) {
            saltati += 1;
            continue;
        }
        let esito = assegna(ctx, c, &ModalitaRiposo::Automatica);
        riposi.extend(esito.riposi);
        // i warnings del singolo contengono gia' la quota incompleta
        warnings.extend(esito.warnings);
        elaborati += 1;
    }

    // upsert in memoria: ultima scrittura vince sulla chiave composta
    let mut per_chiave: HashMap<_, RiposoSettimanale> = HashMap::new();
    for r in riposi {
        per_chiave.insert(r.chiave(), r);
    }
    let mut riposi: Vec<RiposoSettimanale> = per_chiave.into_values().collect();
    riposi.sort_by(|a, b| {
        a.collaboratore
            .as_str()
            .cmp(b.collaboratore.as_str())
            .then(a.giorno.cmp(&b.giorno))
    });

    EsitoRiposiBatch {
        riposi,
        warnings,
        elaborati,
        saltati,
    }
}
