#![forbid(unsafe_code)]
//! Turnario — motore di generazione turni settimanali e riposi (senza BD).
//!
//! - Fotografie immutabili in ingresso, risultati in memoria.
//! - Greedy deterministico: le carenze diventano warning, mai eccezioni.
//! - Aritmetica oraria consapevole del passaggio di mezzanotte.
//! - Persistenza opzionale su file (JSON/CSV), upsert per i riposi.

pub mod engine;
pub mod io;
pub mod model;
pub mod storage;

pub use engine::{
    assegna_riposi, assegna_riposi_tutti, conflitti_del_giorno, filtra_chiusure, genera,
    valida_assegnazione, CategoriaWarning, Conflitto, ContestoGenerazione, EsitoRiposi,
    EsitoRiposiBatch, EsitoValidazione, ModalitaRiposo, MotoreError, OpzioniMotore,
    RisultatoGenerazione, Severita, TipoConflitto, Warning,
};
pub use model::{
    AffinitaStorica, AppartenenzaNucleo, CategoriaRichiesta, Collaboratore, CollaboratoreId,
    ConfigRiposo, ContrattoOre, CriticitaContinuativa, FasciaOraria, GranularitaRiposo, Nucleo,
    NucleoId, PatternStorico, PeriodoCritico, PolaritaPreferenza, PreferenzaCollaboratore,
    ProvenienzaRiposo, RichiestaApprovata, RiposoSettimanale, TipoRiposo, Turno, TurnoId,
};
pub use storage::{ArchivioRiposi, RiposiJson};
