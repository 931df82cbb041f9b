// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{
    common::error::AppError,
    models::auth::{Role, User},
};

/// 1. O Trait que define o que é uma Capacidade
/// Cada ação sensível do almoxarifado declara o nível mínimo que a libera.
pub trait CapabilityDef: Send + Sync + 'static {
    fn slug() -> &'static str;
    fn minimum() -> Role;
}

/// 2. O Extractor (Guardião)
pub struct RequireCapability<T>(pub PhantomData<T>);

// 3. Implementação do FromRequestParts
// A checagem é pura: nível do usuário contra o mínimo da capacidade.
// Nada de ida ao banco por requisição.
impl<T, S> FromRequestParts<S> for RequireCapability<T>
where
    T: CapabilityDef,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<User>()
            .ok_or(AppError::InvalidToken)?;

        ensure_capability(user.role, T::minimum(), T::slug())?;

        Ok(RequireCapability(PhantomData))
    }
}

/// Checagem avulsa, para os handlers onde a capacidade exigida depende do
/// payload (ex.: o endpoint único de transação de estoque).
pub fn ensure_capability(role: Role, minimum: Role, slug: &'static str) -> Result<(), AppError> {
    if role.allows(minimum) {
        Ok(())
    } else {
        Err(AppError::Forbidden(slug))
    }
}

// ---
// DEFINIÇÃO DAS CAPACIDADES (TIPOS)
// ---

pub struct CanStockIn;
impl CapabilityDef for CanStockIn {
    fn slug() -> &'static str {
        "stock:in"
    }
    fn minimum() -> Role {
        Role::Level1
    }
}

pub struct CanStockOut;
impl CapabilityDef for CanStockOut {
    fn slug() -> &'static str {
        "stock:out"
    }
    fn minimum() -> Role {
        Role::Level2
    }
}

pub struct CanDisposal;
impl CapabilityDef for CanDisposal {
    fn slug() -> &'static str {
        "stock:disposal"
    }
    fn minimum() -> Role {
        Role::Level3
    }
}

pub struct CanCorrectMovements;
impl CapabilityDef for CanCorrectMovements {
    fn slug() -> &'static str {
        "stock:correct"
    }
    fn minimum() -> Role {
        Role::Level4
    }
}

pub struct CanClosing;
impl CapabilityDef for CanClosing {
    fn slug() -> &'static str {
        "stock:closing"
    }
    fn minimum() -> Role {
        Role::Level4
    }
}

pub struct CanDelete;
impl CapabilityDef for CanDelete {
    fn slug() -> &'static str {
        "stock:delete"
    }
    fn minimum() -> Role {
        Role::Administrator
    }
}

pub struct CanManageUsers;
impl CapabilityDef for CanManageUsers {
    fn slug() -> &'static str {
        "users:manage"
    }
    fn minimum() -> Role {
        Role::Administrator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closing_needs_level_four() {
        assert!(ensure_capability(Role::Level3, CanClosing::minimum(), "stock:closing").is_err());
        assert!(ensure_capability(Role::Level4, CanClosing::minimum(), "stock:closing").is_ok());
    }

    #[test]
    fn delete_is_administrator_only() {
        assert!(ensure_capability(Role::Level5, CanDelete::minimum(), "stock:delete").is_err());
        assert!(
            ensure_capability(Role::Administrator, CanDelete::minimum(), "stock:delete").is_ok()
        );
    }

    #[test]
    fn denied_capability_names_itself() {
        let err = ensure_capability(Role::Level1, CanStockOut::minimum(), CanStockOut::slug())
            .unwrap_err();
        match err {
            AppError::Forbidden(slug) => assert_eq!(slug, "stock:out"),
            other => panic!("esperava Forbidden, veio {other:?}"),
        }
    }
}
