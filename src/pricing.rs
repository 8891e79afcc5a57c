use crate::rounds::{self, RoundCursor};
use crate::storage;
use crate::types::{PresaleError, PriceQuote, SaleState};
use crate::validation;

// ============================================================================
// MOTOR DE PREÇOS
// ============================================================================

/// Resultado do walk pelos tiers: custo total em USD e o cursor final.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Fill {
    pub cost: i128,
    pub cursor: RoundCursor,
}

impl Fill {
    pub fn quote(&self) -> PriceQuote {
        PriceQuote {
            price_in_usd: self.cost,
            new_round: self.cursor.index,
        }
    }
}

/// Cursor efetivo para vender agora. Venda encerrada (por rounds ou por
/// claim já configurado) retorna `SaleEnded`.
pub fn open_cursor(state: &SaleState, now: u64) -> Result<RoundCursor, PresaleError> {
    if state.claim_configured() {
        return Err(PresaleError::SaleEnded);
    }

    let cursor = rounds::resolve_round(state, now)?;
    if cursor.ended {
        return Err(PresaleError::SaleEnded);
    }

    Ok(cursor)
}

/// Percorre os tiers a partir de `cursor` cobrando cada unidade no preço do
/// tier onde ela cai. As transições de round são aplicadas em cada fronteira.
pub fn fill(
    state: &SaleState,
    mut cursor: RoundCursor,
    units: i128,
    now: u64,
) -> Result<Fill, PresaleError> {
    let mut remaining = units;
    let mut cost: i128 = 0;

    loop {
        let round = rounds::round_at(&state.rounds, cursor.index)?;
        let room = round.capacity - cursor.tracker;
        let take = remaining.min(room);

        let tier_cost = take
            .checked_mul(round.price)
            .ok_or(PresaleError::InvalidAmount)?;
        cost = cost
            .checked_add(tier_cost)
            .ok_or(PresaleError::InvalidAmount)?;

        cursor.tracker += take;
        remaining -= take;

        rounds::advance(&state.rounds, &mut cursor, now)?;

        if remaining == 0 {
            break;
        }
        if cursor.ended {
            return Err(PresaleError::CapacityExceeded);
        }
    }

    Ok(Fill { cost, cursor })
}

/// `calculate_price`: valida a quantidade, resolve o round e precifica.
/// Função pura.
pub fn quote(state: &SaleState, units: i128, now: u64) -> Result<Fill, PresaleError> {
    validation::require_valid_units(state, units)?;
    let cursor = open_cursor(state, now)?;
    fill(state, cursor, units, now)
}

// ============================================================================
// CONVERSÕES
// ============================================================================

/// 10^exp com overflow tratado
pub fn pow10(exp: u32) -> Result<i128, PresaleError> {
    10i128.checked_pow(exp).ok_or(PresaleError::InvalidDecimals)
}

/// Reescala `amount` de `from` casas decimais para `to` casas.
/// Reduzir precisão trunca (floor), nunca arredonda para cima.
pub fn rescale(amount: i128, from: u32, to: u32) -> Result<i128, PresaleError> {
    if from >= to {
        Ok(amount / pow10(from - to)?)
    } else {
        amount
            .checked_mul(pow10(to - from)?)
            .ok_or(PresaleError::InvalidAmount)
    }
}

/// Converte o custo em USD para as menores unidades do ativo estável.
pub fn usd_to_stable(state: &SaleState, usd: i128) -> Result<i128, PresaleError> {
    rescale(usd, storage::USD_DECIMALS, state.stable_decimals)
}
