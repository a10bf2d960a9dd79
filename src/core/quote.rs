use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A trip quote attached to a conversation's lead.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Quote {
    pub id: String,
    pub title: String,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub checkin: Option<String>,
    pub checkout: Option<String>,
    pub adults: Option<u32>,
    pub children: Option<u32>,
    pub products: Option<String>,
    pub value_cents: Option<i64>,
}

impl Quote {
    /// Blank quote as created from the lead card.
    pub fn blank() -> Self {
        Self {
            id: format!("q-{}", Uuid::new_v4()),
            title: "Nova cotação".to_string(),
            origin: Some(String::new()),
            destination: Some(String::new()),
            products: Some(String::new()),
            value_cents: Some(0),
            adults: Some(0),
            children: Some(0),
            ..Self::default()
        }
    }

    pub fn value_label(&self) -> String {
        format_brl(self.value_cents.unwrap_or(0))
    }
}

/// How a negotiation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Won,
    Lost,
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Won => "Ganho",
            Self::Lost => "Perda",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FunnelStatus {
    #[default]
    Qualification,
    ProposalSent,
    Closing,
    Won,
    Lost,
}

impl FunnelStatus {
    pub const ALL: [FunnelStatus; 5] = [
        FunnelStatus::Qualification,
        FunnelStatus::ProposalSent,
        FunnelStatus::Closing,
        FunnelStatus::Won,
        FunnelStatus::Lost,
    ];

    pub fn as_keyword(&self) -> &'static str {
        match self {
            Self::Qualification => "QUALIFICACAO",
            Self::ProposalSent => "PROPOSTA_ENVIADA",
            Self::Closing => "EM_FECHAMENTO",
            Self::Won => "GANHO",
            Self::Lost => "PERDA",
        }
    }

    pub fn from_keyword(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_keyword() == s)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Qualification => "Qualificação",
            Self::ProposalSent => "Proposta enviada",
            Self::Closing => "Em fechamento",
            Self::Won => "Ganho",
            Self::Lost => "Perda",
        }
    }

    /// Closing statuses end the negotiation.
    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            Self::Won => Some(Outcome::Won),
            Self::Lost => Some(Outcome::Lost),
            _ => None,
        }
    }
}

/// `(value, label)` pairs offered when a lead is marked lost.
pub const LOSS_REASONS: [(&str, &str); 4] = [
    ("sem_perfil", "Sem perfil"),
    ("falta_retorno_agencia", "Falta de retorno da agência"),
    ("sem_resposta", "Sem resposta do cliente"),
    ("concorrencia", "Concorrência"),
];

/// Cents as `"1289,00"`.
pub fn format_brl(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}{},{:02}", sign, abs / 100, abs % 100)
}

/// Grow with zeros or truncate so there is one age per child.
pub fn resize_children_ages(ages: &mut Vec<u32>, count: usize) {
    ages.resize(count, 0);
}
