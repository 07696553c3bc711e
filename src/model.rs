use chrono::{Datelike, Days, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identificatore forte per Collaboratore
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollaboratoreId(String);

impl CollaboratoreId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identificatore forte per Nucleo
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NucleoId(String);

impl NucleoId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identificatore forte per Turno
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TurnoId(String);

impl TurnoId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    /// Id deterministico per i turni generati: stesso input, stesso id.
    pub fn composto(nucleo: &NucleoId, data: NaiveDate, inizio: NaiveTime) -> Self {
        Self(format!("{}:{}:{}", nucleo.as_str(), data, inizio.format("%H%M")))
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Fascia oraria; `fine <= inizio` indica il passaggio di mezzanotte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FasciaOraria {
    pub inizio: NaiveTime,
    pub fine: NaiveTime,
}

impl FasciaOraria {
    pub fn new(inizio: NaiveTime, fine: NaiveTime) -> Self {
        Self { inizio, fine }
    }

    /// 00:00 → 00:00, ovvero tutta la giornata (24h con wrap).
    pub fn giornata_intera() -> Self {
        let mezzanotte = NaiveTime::from_hms_opt(0, 0, 0).unwrap();
        Self {
            inizio: mezzanotte,
            fine: mezzanotte,
        }
    }
}

/// Modello contrattuale delle ore
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tipo", rename_all = "snake_case")]
pub enum ContrattoOre {
    SettimanaleFisso { ore: f32 },
    Mensile { ore: f32 },
    Flessibile { min: f32, max: f32 },
}

impl ContrattoOre {
    /// Budget orario settimanale: i contratti mensili vengono rapportati
    /// su 52 settimane, i flessibili usano il massimo come tetto.
    pub fn ore_settimanali(&self) -> f32 {
        match self {
            Self::SettimanaleFisso { ore } => *ore,
            Self::Mensile { ore } => ore * 12.0 / 52.0,
            Self::Flessibile { max, .. } => *max,
        }
    }

    pub fn valida(&self) -> Result<(), String> {
        match self {
            Self::SettimanaleFisso { ore } | Self::Mensile { ore } => {
                if *ore <= 0.0 {
                    return Err("contract hours must be > 0".to_string());
                }
            }
            Self::Flessibile { min, max } => {
                if *min < 0.0 || *max <= 0.0 {
                    return Err("flexible bounds must be positive".to_string());
                }
                if min > max {
                    return Err("flexible min exceeds max".to_string());
                }
            }
        }
        Ok(())
    }
}

/// Tipo di riposo settimanale previsto dal contratto
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TipoRiposo {
    GiorniInteri,
    MezzeGiornate,
    Ore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigRiposo {
    pub tipo: TipoRiposo,
    /// Quantità settimanale: giorni, mezze giornate oppure ore.
    pub quantita: u8,
}

/// Appartenenza di un collaboratore a un nucleo, con validità aperta o chiusa.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppartenenzaNucleo {
    pub nucleo: NucleoId,
    pub dal: NaiveDate,
    #[serde(default)]
    pub al: Option<NaiveDate>,
}

impl AppartenenzaNucleo {
    pub fn attiva_il(&self, data: NaiveDate) -> bool {
        data >= self.dal && self.al.map_or(true, |al| data <= al)
    }
}

fn default_true() -> bool {
    true
}

/// Collaboratore (membro del roster)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collaboratore {
    pub id: CollaboratoreId,
    pub nome: String,
    pub contratto: ContrattoOre,
    pub riposo: ConfigRiposo,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub appartenenze: Vec<AppartenenzaNucleo>,
    #[serde(default = "default_true")]
    pub attivo: bool,
    /// Ore già assegnate nella settimana in esame (fotografia del chiamante).
    #[serde(default)]
    pub ore_gia_assegnate: f32,
}

impl Collaboratore {
    pub fn nuovo<N: Into<String>>(nome: N, contratto: ContrattoOre, riposo: ConfigRiposo) -> Self {
        Self {
            id: CollaboratoreId::random(),
            nome: nome.into(),
            contratto,
            riposo,
            appartenenze: Vec::new(),
            attivo: true,
            ore_gia_assegnate: 0.0,
        }
    }

    pub fn membro_attivo(&self, nucleo: &NucleoId, data: NaiveDate) -> bool {
        self.appartenenze
            .iter()
            .any(|a| &a.nucleo == nucleo && a.attiva_il(data))
    }
}

/// Nucleo (reparto / cella di lavoro)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nucleo {
    pub id: NucleoId,
    pub nome: String,
    pub mansione: String,
    pub minimo: u8,
    #[serde(default)]
    pub massimo: Option<u8>,
    #[serde(default)]
    pub orario: Option<FasciaOraria>,
}

impl Nucleo {
    /// Crea un nucleo validando `minimo >= 1`.
    pub fn nuovo<N: Into<String>, M: Into<String>>(
        nome: N,
        mansione: M,
        minimo: u8,
    ) -> Result<Self, String> {
        if minimo == 0 {
            return Err("minimum staff must be >= 1".to_string());
        }
        Ok(Self {
            id: NucleoId::random(),
            nome: nome.into(),
            mansione: mansione.into(),
            minimo,
            massimo: None,
            orario: None,
        })
    }
}

fn default_moltiplicatore() -> f32 {
    1.0
}

/// Criticità ricorrente legata a un giorno della settimana (1 = lunedì).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticitaContinuativa {
    pub giorno: u8,
    #[serde(default)]
    pub fascia: Option<FasciaOraria>,
    pub categoria: String,
    #[serde(default)]
    pub staff_extra: u8,
    #[serde(default = "default_moltiplicatore")]
    pub moltiplicatore: f32,
    #[serde(default = "default_true")]
    pub attiva: bool,
}

/// Periodo critico una tantum su intervallo di date assoluto (inclusivo).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodoCritico {
    pub dal: NaiveDate,
    pub al: NaiveDate,
    #[serde(default)]
    pub fascia: Option<FasciaOraria>,
    #[serde(default)]
    pub staff_minimo: Option<u8>,
    #[serde(default)]
    pub moltiplicatore: Option<f32>,
    #[serde(default)]
    pub ignora_preferenze: bool,
}

impl PeriodoCritico {
    pub fn copre(&self, data: NaiveDate) -> bool {
        data >= self.dal && data <= self.al
    }
}

/// Granularità di un riposo assegnato
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GranularitaRiposo {
    GiornoIntero,
    MezzaMattina,
    MezzoPomeriggio,
}

impl GranularitaRiposo {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GiornoIntero => "giorno_intero",
            Self::MezzaMattina => "mezza_mattina",
            Self::MezzoPomeriggio => "mezzo_pomeriggio",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProvenienzaRiposo {
    Manuale,
    Motore,
}

impl ProvenienzaRiposo {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manuale => "manuale",
            Self::Motore => "motore",
        }
    }
}

/// Riposo settimanale assegnato. Unico per (collaboratore, settimana, giorno):
/// la persistenza avviene per upsert sulla chiave composta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiposoSettimanale {
    pub collaboratore: CollaboratoreId,
    /// Lunedì di inizio settimana ISO.
    pub settimana: NaiveDate,
    /// Giorno 1-7 (1 = lunedì).
    pub giorno: u8,
    pub granularita: GranularitaRiposo,
    pub provenienza: ProvenienzaRiposo,
    #[serde(default)]
    pub confidenza: f32,
}

impl RiposoSettimanale {
    pub fn data(&self) -> NaiveDate {
        data_nella_settimana(self.settimana, self.giorno)
    }

    pub fn chiave(&self) -> (CollaboratoreId, NaiveDate, u8) {
        (self.collaboratore.clone(), self.settimana, self.giorno)
    }
}

/// Polarità di una preferenza
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolaritaPreferenza {
    Preferito,
    NonDisponibile,
    SoloDisponibile,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferenzaCollaboratore {
    pub collaboratore: CollaboratoreId,
    pub data: NaiveDate,
    #[serde(default)]
    pub fascia: Option<FasciaOraria>,
    pub polarita: PolaritaPreferenza,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoriaRichiesta {
    Ferie,
    Permesso,
}

/// Assenza approvata su intervallo di date inclusivo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichiestaApprovata {
    pub collaboratore: CollaboratoreId,
    pub categoria: CategoriaRichiesta,
    pub dal: NaiveDate,
    pub al: NaiveDate,
}

impl RichiestaApprovata {
    pub fn nuova(
        collaboratore: CollaboratoreId,
        categoria: CategoriaRichiesta,
        dal: NaiveDate,
        al: NaiveDate,
    ) -> Result<Self, String> {
        if al < dal {
            return Err("leave end must not precede start".to_string());
        }
        Ok(Self {
            collaboratore,
            categoria,
            dal,
            al,
        })
    }

    pub fn copre(&self, data: NaiveDate) -> bool {
        data >= self.dal && data <= self.al
    }
}

/// Media storica di presenze per (nucleo, giorno). Segnale soft, mai un vincolo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternStorico {
    pub nucleo: NucleoId,
    pub giorno: u8,
    pub media: f32,
}

/// Presenza pregressa di un collaboratore su (nucleo, giorno): alimenta il
/// bonus di affinità in fase di scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffinitaStorica {
    pub collaboratore: CollaboratoreId,
    pub nucleo: NucleoId,
    pub giorno: u8,
}

/// Turno generato (proposta, non autoritativa finché non persistita).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turno {
    pub id: TurnoId,
    pub nucleo: NucleoId,
    pub data: NaiveDate,
    pub inizio: NaiveTime,
    pub fine: NaiveTime,
    pub richiesti: u8,
    #[serde(default)]
    pub collaboratori: Vec<CollaboratoreId>,
    #[serde(default)]
    pub confidenza: f32,
    #[serde(default)]
    pub nota: String,
}

impl Turno {
    pub fn nuovo(
        nucleo: NucleoId,
        data: NaiveDate,
        inizio: NaiveTime,
        fine: NaiveTime,
        richiesti: u8,
    ) -> Self {
        Self {
            id: TurnoId::composto(&nucleo, data, inizio),
            nucleo,
            data,
            inizio,
            fine,
            richiesti,
            collaboratori: Vec::new(),
            confidenza: 0.0,
            nota: String::new(),
        }
    }
}

/// Giorno 1-7 (1 = lunedì) di una data.
pub fn numero_giorno(data: NaiveDate) -> u8 {
    data.weekday().number_from_monday() as u8
}

/// Data corrispondente al giorno 1-7 nella settimana che inizia `settimana`.
pub fn data_nella_settimana(settimana: NaiveDate, giorno: u8) -> NaiveDate {
    settimana + Days::new(u64::from(giorno.saturating_sub(1)))
}

pub fn e_lunedi(data: NaiveDate) -> bool {
    data.weekday() == Weekday::Mon
}
