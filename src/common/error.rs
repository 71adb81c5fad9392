use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// Cada variante vira uma resposta HTTP em `IntoResponse`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Campos obrigatórios ausentes: {0}")]
    MissingFields(&'static str),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    // Também cobre o caso "existe, mas pertence a outro dono": a resposta é
    // sempre 404, sem revelar a existência do recurso.
    #[error("Restaurante não encontrado")]
    RestaurantNotFound,

    #[error("Produto não encontrado")]
    ProductNotFound,

    #[error("Cardápio não encontrado")]
    MenuNotFound,

    #[error("Restaurante ainda não está conectado ao processador de pagamento")]
    AccountNotConnected,

    #[error("A subconta de pagamento ainda não foi criada")]
    AccountNotCreated,

    // Recusa de regra de negócio do processador; a mensagem dele é repassada.
    #[error("Processador de pagamento recusou a operação: {0}")]
    ProcessorRejected(String),

    // Falha de transporte (rede/TLS), distinta de uma recusa de negócio.
    #[error("Falha ao comunicar com o processador de pagamento: {0}")]
    ProcessorUnavailable(String),

    // Violação de unicidade na inserção de um token público. O gerador torna
    // isso praticamente impossível; quando acontece, o chamador pode repetir.
    #[error("Colisão ao gerar o token público. Tente novamente.")]
    TokenCollision,

    // Variante para erros de banco de dados (sqlx)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::MissingFields(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::EmailAlreadyExists => {
                (StatusCode::CONFLICT, "Este e-mail já está em uso.".to_string())
            }
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "E-mail ou senha inválidos.".to_string())
            }
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Token de autenticação inválido ou ausente.".to_string(),
            ),
            AppError::UserNotFound
            | AppError::RestaurantNotFound
            | AppError::ProductNotFound
            | AppError::MenuNotFound => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::AccountNotConnected | AppError::AccountNotCreated => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            // A mensagem do processador vai junto na resposta.
            AppError::ProcessorRejected(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::ProcessorUnavailable(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
            AppError::TokenCollision => (StatusCode::CONFLICT, self.to_string()),

            // Todos os outros erros (DatabaseError, InternalServerError...) viram 500.
            // O `tracing` loga a mensagem detalhada que o `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocorreu um erro inesperado.".to_string(),
                )
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
