use serde::{Deserialize, Serialize};
use validator::Validate;

/// Concrete field values of a stored record. Optional inputs are already
/// replaced by their defaults (`""` / `0`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FreelancerFields {
    pub nome: String,
    pub servico: String,
    pub email: String,
    pub preco_hora: f64,
    pub localizacao: String,
}

/// A freelancer as returned by any backend. Serializes flat:
/// `{id, nome, servico, email, preco_hora, localizacao}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Freelancer {
    pub id: String,
    #[serde(flatten)]
    pub fields: FreelancerFields,
}

impl Freelancer {
    pub fn new(id: impl Into<String>, fields: FreelancerFields) -> Self {
        Self { id: id.into(), fields }
    }
}

/// Validated create payload: `nome` and `servico` are present, the rest optional.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InsertFreelancer {
    pub nome: String,
    pub servico: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preco_hora: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub localizacao: Option<String>,
}

impl InsertFreelancer {
    pub fn new(nome: impl Into<String>, servico: impl Into<String>) -> Self {
        Self { nome: nome.into(), servico: servico.into(), email: None, preco_hora: None, localizacao: None }
    }
}

/// Partial field set. Used for update payloads and as the field bag of
/// remote records; absent fields are left out when serialized.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct FreelancerPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Nome é obrigatório"))]
    pub nome: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Serviço é obrigatório"))]
    pub servico: Option<String>,
    /// Checked in `validation`: the empty string is allowed so a form can clear it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, message = "Preço deve ser positivo"))]
    pub preco_hora: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub localizacao: Option<String>,
}

impl FreelancerPatch {
    /// Fill every absent field with its default. Both backends go through
    /// here so records look the same regardless of where they are stored.
    pub fn apply_defaults(self) -> FreelancerFields {
        FreelancerFields {
            nome: self.nome.unwrap_or_default(),
            servico: self.servico.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            preco_hora: self.preco_hora.unwrap_or(0.0),
            localizacao: self.localizacao.unwrap_or_default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nome.is_none()
            && self.servico.is_none()
            && self.email.is_none()
            && self.preco_hora.is_none()
            && self.localizacao.is_none()
    }
}

impl From<InsertFreelancer> for FreelancerPatch {
    fn from(input: InsertFreelancer) -> Self {
        Self {
            nome: Some(input.nome),
            servico: Some(input.servico),
            email: input.email,
            preco_hora: input.preco_hora,
            localizacao: input.localizacao,
        }
    }
}

impl From<FreelancerFields> for FreelancerPatch {
    fn from(fields: FreelancerFields) -> Self {
        Self {
            nome: Some(fields.nome),
            servico: Some(fields.servico),
            email: Some(fields.email),
            preco_hora: Some(fields.preco_hora),
            localizacao: Some(fields.localizacao),
        }
    }
}

impl FreelancerFields {
    /// Shallow merge: present keys overwrite, absent keys keep their value.
    pub fn merge(&mut self, patch: FreelancerPatch) {
        if let Some(nome) = patch.nome {
            self.nome = nome;
        }
        if let Some(servico) = patch.servico {
            self.servico = servico;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(preco_hora) = patch.preco_hora {
            self.preco_hora = preco_hora;
        }
        if let Some(localizacao) = patch.localizacao {
            self.localizacao = localizacao;
        }
    }
}
