//! Aritmetica oraria con wrap di mezzanotte: un intervallo con
//! `fine <= inizio` prosegue nel giorno successivo.

use crate::model::FasciaOraria;
use chrono::{NaiveTime, Timelike};

pub const MINUTI_GIORNO: i64 = 24 * 60;

fn minuti(t: NaiveTime) -> i64 {
    i64::from(t.num_seconds_from_midnight()) / 60
}

/// Durata in minuti, wrap incluso: 22:00 → 06:00 vale 480.
pub fn durata_minuti(inizio: NaiveTime, fine: NaiveTime) -> i64 {
    let diff = minuti(fine) - minuti(inizio);
    if diff <= 0 {
        diff + MINUTI_GIORNO
    } else {
        diff
    }
}

/// Limiti normalizzati [inizio, fine) in minuti dalla mezzanotte del giorno
/// dell'intervallo; la fine può superare 1440.
fn limiti(inizio: NaiveTime, fine: NaiveTime) -> (i64, i64) {
    let s = minuti(inizio);
    (s, s + durata_minuti(inizio, fine))
}

fn aperti_si_toccano(sa: i64, ea: i64, sb: i64, eb: i64) -> bool {
    sa < eb && sb < ea
}

/// Sovrapposizione tra due intervalli sullo stesso giorno di calendario,
/// tenendo conto degli sconfinamenti oltre mezzanotte in entrambe le
/// direzioni.
pub fn si_sovrappongono(
    a_inizio: NaiveTime,
    a_fine: NaiveTime,
    b_inizio: NaiveTime,
    b_fine: NaiveTime,
) -> bool {
    let (sa, ea) = limiti(a_inizio, a_fine);
    let (sb, eb) = limiti(b_inizio, b_fine);
    aperti_si_toccano(sa, ea, sb, eb)
        || aperti_si_toccano(sa, ea, sb + MINUTI_GIORNO, eb + MINUTI_GIORNO)
        || aperti_si_toccano(sa + MINUTI_GIORNO, ea + MINUTI_GIORNO, sb, eb)
}

/// Ore di stacco tra la fine di un turno e l'inizio del successivo,
/// misurate in avanti con wrap.
pub fn ore_riposo(fine_a: NaiveTime, inizio_b: NaiveTime) -> f32 {
    let gap = (minuti(inizio_b) - minuti(fine_a)).rem_euclid(MINUTI_GIORNO);
    gap as f32 / 60.0
}

pub fn fasce_si_sovrappongono(a: &FasciaOraria, b: &FasciaOraria) -> bool {
    si_sovrappongono(a.inizio, a.fine, b.inizio, b.fine)
}

/// Una fascia opzionale assente vale "tutta la giornata".
pub fn fascia_opzionale_copre(fascia: &Option<FasciaOraria>, finestra: &FasciaOraria) -> bool {
    match fascia {
        None => true,
        Some(f) => fasce_si_sovrappongono(f, finestra),
    }
}

/// Mattina: 00:00 → 13:00.
pub fn fascia_mattina() -> FasciaOraria {
    FasciaOraria::new(
        NaiveTime::from_hms_opt(0, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(13, 0, 0).unwrap(),
    )
}

/// Pomeriggio: 13:00 → 24:00 (espresso come 13:00 → 00:00).
pub fn fascia_pomeriggio() -> FasciaOraria {
    FasciaOraria::new(
        NaiveTime::from_hms_opt(13, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(0, 0, 0).unwrap(),
    )
}
