// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// ---
// Nível de acesso
// ---
// No sistema antigo o nível era uma string solta ('1'..'5' misturada com
// 'administrator') e cada tela comparava de um jeito. Aqui é um enum fechado:
// toda checagem de permissão passa por `Role::allows`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role")]
pub enum Role {
    #[sqlx(rename = "LEVEL_1")]
    #[serde(rename = "LEVEL_1")]
    Level1,
    #[sqlx(rename = "LEVEL_2")]
    #[serde(rename = "LEVEL_2")]
    Level2,
    #[sqlx(rename = "LEVEL_3")]
    #[serde(rename = "LEVEL_3")]
    Level3,
    #[sqlx(rename = "LEVEL_4")]
    #[serde(rename = "LEVEL_4")]
    Level4,
    #[sqlx(rename = "LEVEL_5")]
    #[serde(rename = "LEVEL_5")]
    Level5,
    #[sqlx(rename = "ADMINISTRATOR")]
    #[serde(rename = "ADMINISTRATOR")]
    Administrator,
}

impl Role {
    fn rank(self) -> u8 {
        match self {
            Role::Level1 => 1,
            Role::Level2 => 2,
            Role::Level3 => 3,
            Role::Level4 => 4,
            Role::Level5 => 5,
            Role::Administrator => u8::MAX,
        }
    }

    /// A única função de comparação de nível do sistema inteiro.
    pub fn allows(self, minimum: Role) -> bool {
        self.rank() >= minimum.rank()
    }
}

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    #[schema(ignore)]
    pub password_hash: String,

    pub display_name: String,
    pub role: Role,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Dados para registro de um novo usuário
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub display_name: String,
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
}

// Troca de nível feita por um administrador
#[derive(Debug, Deserialize, ToSchema)]
pub struct ChangeRolePayload {
    pub role: Role,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // Subject (ID do usuário)
    pub exp: usize, // Expiration time (quando o token expira)
    pub iat: usize, // Issued At (quando o token foi criado)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn administrator_passes_every_minimum() {
        for minimum in [
            Role::Level1,
            Role::Level2,
            Role::Level3,
            Role::Level4,
            Role::Level5,
            Role::Administrator,
        ] {
            assert!(Role::Administrator.allows(minimum));
        }
    }

    #[test]
    fn levels_are_ordered() {
        assert!(Role::Level3.allows(Role::Level2));
        assert!(Role::Level3.allows(Role::Level3));
        assert!(!Role::Level3.allows(Role::Level4));
        assert!(!Role::Level5.allows(Role::Administrator));
    }

    #[test]
    fn level_one_only_passes_itself() {
        assert!(Role::Level1.allows(Role::Level1));
        assert!(!Role::Level1.allows(Role::Level2));
    }
}
