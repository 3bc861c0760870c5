//! Payload validation for create and partial-update requests.
//!
//! Every problem in a payload is collected and reported together, in field
//! declaration order, joined with `", "`.

use serde_json::Value;
use validator::{Validate, ValidateEmail, ValidationError, ValidationErrors};

use crate::errors::ModelError;
use crate::freelancer::{FreelancerPatch, InsertFreelancer};

pub const NOME_REQUIRED: &str = "Nome é obrigatório";
pub const SERVICO_REQUIRED: &str = "Serviço é obrigatório";
pub const INVALID_EMAIL: &str = "E-mail inválido";
pub const NULL_NOT_ALLOWED: &str = "não pode ser nulo";

const FIELD_ORDER: [&str; 5] = ["nome", "servico", "email", "preco_hora", "localizacao"];

/// Validate a create payload. `nome` and `servico` must be present and non-empty.
pub fn validate_insert(payload: Value) -> Result<InsertFreelancer, ModelError> {
    let patch = parse(payload)?;
    check(&patch, true)?;
    let (Some(nome), Some(servico)) = (patch.nome, patch.servico) else {
        return Err(ModelError::Validation(NOME_REQUIRED.into()));
    };
    Ok(InsertFreelancer {
        nome,
        servico,
        email: patch.email,
        preco_hora: patch.preco_hora,
        localizacao: patch.localizacao,
    })
}

/// Validate a partial-update payload. Absent fields are fine; present ones
/// follow the same rules as on create.
pub fn validate_partial(payload: Value) -> Result<FreelancerPatch, ModelError> {
    let patch = parse(payload)?;
    check(&patch, false)?;
    Ok(patch)
}

fn parse(payload: Value) -> Result<FreelancerPatch, ModelError> {
    // an explicit null is a value of the wrong type, not an absent field
    if let Value::Object(map) = &payload {
        let nulls = FIELD_ORDER
            .iter()
            .filter(|field| matches!(map.get(**field), Some(Value::Null)))
            .map(|field| format!("{field} {NULL_NOT_ALLOWED}"))
            .collect::<Vec<_>>();
        if !nulls.is_empty() {
            return Err(ModelError::Validation(nulls.join(", ")));
        }
    }
    serde_json::from_value(payload).map_err(|e| ModelError::Validation(e.to_string()))
}

fn check(patch: &FreelancerPatch, require_identity: bool) -> Result<(), ModelError> {
    let report = match patch.validate() {
        Ok(()) => ValidationErrors::new(),
        Err(e) => e,
    };
    let by_field = report.field_errors();

    let mut problems: Vec<String> = Vec::new();
    for field in FIELD_ORDER {
        match field {
            "nome" if require_identity && patch.nome.is_none() => problems.push(NOME_REQUIRED.into()),
            "servico" if require_identity && patch.servico.is_none() => {
                problems.push(SERVICO_REQUIRED.into())
            }
            "email" => {
                if let Some(email) = &patch.email {
                    if !email.is_empty() && !email.validate_email() {
                        problems.push(INVALID_EMAIL.into());
                    }
                }
            }
            _ => {}
        }
        if let Some(errors) = by_field.get(field) {
            problems.extend(errors.iter().map(message_of));
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(ModelError::Validation(problems.join(", ")))
    }
}

fn message_of(error: &ValidationError) -> String {
    error
        .message
        .as_deref()
        .map(str::to_string)
        .unwrap_or_else(|| error.code.to_string())
}
