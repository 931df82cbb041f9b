// src/services/closing_service.rs

use chrono::{Datelike, NaiveDate};
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::{validation_error, AppError},
    db::{ClosingRepository, ItemRepository},
    models::closing::{Closing, ClosingHistory},
};

// ---
// A janela de fechamento é regra de calendário pura, separada do banco de
// propósito: é ela que os testes martelam.
// ---

/// (ano, mês) em que o trimestre pode ser fechado.
/// Q1→abril, Q2→julho, Q3→outubro do próprio ano; Q4→janeiro do ano seguinte.
pub fn closing_window(quarter: i16, year: i32) -> Option<(i32, u32)> {
    match quarter {
        1 => Some((year, 4)),
        2 => Some((year, 7)),
        3 => Some((year, 10)),
        4 => Some((year + 1, 1)),
        _ => None,
    }
}

/// O relógio do sistema está dentro da janela deste trimestre?
pub fn window_matches(quarter: i16, year: i32, today: NaiveDate) -> bool {
    closing_window(quarter, year)
        .map(|(window_year, window_month)| {
            today.year() == window_year && today.month() == window_month
        })
        .unwrap_or(false)
}

/// O ano só fecha com os quatro trimestres fechados.
pub fn ensure_four_quarters(year: i32, closed: i64) -> Result<(), AppError> {
    if closed != 4 {
        return Err(AppError::IncompleteQuarter { year, closed });
    }
    Ok(())
}

#[derive(Clone)]
pub struct ClosingService {
    closing_repo: ClosingRepository,
    item_repo: ItemRepository,
}

impl ClosingService {
    pub fn new(closing_repo: ClosingRepository, item_repo: ItemRepository) -> Self {
        Self {
            closing_repo,
            item_repo,
        }
    }

    /// Fechamento trimestral: rebatiza o saldo atual de todos os itens como
    /// a nova base. Tudo ou nada — qualquer falha desfaz a transação inteira.
    pub async fn close_quarter<'e, E>(
        &self,
        executor: E,
        quarter: i16,
        year: i32,
        today: NaiveDate,
        closed_by: Uuid,
    ) -> Result<Closing, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let Some((window_year, window_month)) = closing_window(quarter, year) else {
            return Err(validation_error(
                "quarter",
                "range",
                "O trimestre deve estar entre 1 e 4.",
            ));
        };

        // Portão de calendário: fora do mês designado não fecha, ponto.
        if !window_matches(quarter, year, today) {
            return Err(AppError::ClosingNotAllowed(format!(
                "o {}º trimestre de {} só fecha em {:02}/{}",
                quarter, year, window_month, window_year
            )));
        }

        let mut tx = executor.begin().await?;

        // Sem item nenhum não há o que fechar.
        let live_items = self.item_repo.count_live(&mut *tx).await?;
        if live_items == 0 {
            return Err(AppError::ClosingNotAllowed(
                "nenhum item de estoque inicializado".to_string(),
            ));
        }

        let closing = self
            .closing_repo
            .upsert_closing(&mut *tx, year, quarter, today, closed_by)
            .await?;

        // Refechamento na mesma janela troca as fotos antigas pelas novas.
        self.closing_repo
            .delete_snapshots(&mut *tx, closing.id)
            .await?;
        self.closing_repo
            .snapshot_items(&mut *tx, closing.id)
            .await?;
        self.item_repo.rebase_closing_quantities(&mut *tx).await?;

        tx.commit().await?;

        tracing::info!(
            "Fechamento do {}º trimestre de {} concluído ({} itens)",
            quarter,
            year,
            live_items
        );
        Ok(closing)
    }

    /// Fechamento anual: só um portão. Não recalcula nada.
    pub async fn close_year<'e, E>(
        &self,
        executor: E,
        year: i32,
        closed_by: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let closed = self.closing_repo.count_quarters(&mut *tx, year).await?;
        ensure_four_quarters(year, closed)?;

        self.closing_repo
            .upsert_annual(&mut *tx, year, closed_by)
            .await?;

        tx.commit().await?;

        tracing::info!("Ano de {} marcado como fechado", year);
        Ok(())
    }

    pub async fn history<'e, E>(&self, executor: E) -> Result<ClosingHistory, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;
        let quarters = self.closing_repo.list_closings(&mut *tx).await?;
        let annual = self.closing_repo.list_annual(&mut *tx).await?;
        tx.commit().await?;
        Ok(ClosingHistory { quarters, annual })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn each_quarter_has_its_designated_month() {
        assert_eq!(closing_window(1, 2025), Some((2025, 4)));
        assert_eq!(closing_window(2, 2025), Some((2025, 7)));
        assert_eq!(closing_window(3, 2025), Some((2025, 10)));
        // O 4º trimestre fecha em janeiro do ano seguinte.
        assert_eq!(closing_window(4, 2025), Some((2026, 1)));
        assert_eq!(closing_window(5, 2025), None);
    }

    #[test]
    fn outside_the_designated_month_never_matches() {
        // Varre o ano inteiro: só abril casa com o 1º trimestre.
        for month in 1..=12 {
            let matches = window_matches(1, 2025, day(2025, month, 15));
            assert_eq!(matches, month == 4, "mês {month}");
        }
    }

    #[test]
    fn fourth_quarter_only_matches_january_of_the_next_year() {
        assert!(window_matches(4, 2025, day(2026, 1, 10)));
        assert!(!window_matches(4, 2025, day(2025, 1, 10)));
        assert!(!window_matches(4, 2025, day(2026, 2, 1)));
    }

    #[test]
    fn year_gate_wants_exactly_four_quarters() {
        assert!(ensure_four_quarters(2025, 4).is_ok());

        for closed in [0, 1, 2, 3, 5] {
            let err = ensure_four_quarters(2025, closed).unwrap_err();
            match err {
                AppError::IncompleteQuarter { year, closed: got } => {
                    assert_eq!(year, 2025);
                    assert_eq!(got, closed);
                }
                other => panic!("esperava IncompleteQuarter, veio {other:?}"),
            }
        }
    }
}
