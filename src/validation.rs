use soroban_sdk::{Address, Vec};
use crate::storage;
use crate::types::{PresaleError, Round, SaleState};

// ============================================================================
// VALIDAÇÕES (CEI Pattern - CHECKS)
// ============================================================================

/// Valida se o caller é o owner
pub fn require_owner(state: &SaleState, caller: &Address) -> Result<(), PresaleError> {
    if caller != &state.owner {
        return Err(PresaleError::Unauthorized);
    }
    Ok(())
}

/// Valida se o caller é o admin (só o admin força o avanço de round)
pub fn require_admin(state: &SaleState, caller: &Address) -> Result<(), PresaleError> {
    if caller != &state.admin {
        return Err(PresaleError::Unauthorized);
    }
    Ok(())
}

/// Valida se a pré-venda não está pausada
pub fn require_not_paused(state: &SaleState) -> Result<(), PresaleError> {
    if state.is_paused {
        return Err(PresaleError::Paused);
    }
    Ok(())
}

/// Valida se a venda já abriu
pub fn require_started(state: &SaleState, now: u64) -> Result<(), PresaleError> {
    if now < state.start_time {
        return Err(PresaleError::NotStarted);
    }
    Ok(())
}

/// Valida se o amount é válido (> 0)
pub fn require_positive_amount(amount: i128) -> Result<(), PresaleError> {
    if amount <= 0 {
        return Err(PresaleError::InvalidAmount);
    }
    Ok(())
}

/// Valida quantidade pedida contra o limite por transação
pub fn require_valid_units(state: &SaleState, units: i128) -> Result<(), PresaleError> {
    require_positive_amount(units)?;

    if units > state.max_tokens_per_tx {
        return Err(PresaleError::ExceedsMaxPerTx);
    }

    Ok(())
}

/// Valida um horário de início (precisa estar no futuro)
pub fn require_future_start(start_time: u64, now: u64) -> Result<(), PresaleError> {
    if start_time <= now {
        return Err(PresaleError::StartTimeInPast);
    }
    Ok(())
}

/// Rounds e horários só podem ser editados antes do claim
pub fn require_not_locked(state: &SaleState) -> Result<(), PresaleError> {
    if state.claim_configured() {
        return Err(PresaleError::SaleLocked);
    }
    Ok(())
}

/// Valida a tabela de rounds:
/// - entre 1 e MAX_ROUNDS tiers
/// - preço e capacidade positivos
/// - capacidade cumulativa não decrescente
/// - end_time estritamente crescente
pub fn require_valid_rounds(rounds: &Vec<Round>) -> Result<(), PresaleError> {
    require_valid_rounds_from(rounds, 0)
}

/// Igual a `require_valid_rounds`, mas os prazos só precisam crescer a
/// partir de `from_index`. Tiers anteriores já passaram e podem ter ficado
/// com prazos fora de ordem depois de um reagendamento dinâmico.
pub fn require_valid_rounds_from(rounds: &Vec<Round>, from_index: u32) -> Result<(), PresaleError> {
    if rounds.is_empty() || rounds.len() > storage::MAX_ROUNDS {
        return Err(PresaleError::InvalidRounds);
    }

    let mut previous: Option<Round> = None;
    for (index, round) in rounds.iter().enumerate() {
        if round.price <= 0 || round.capacity <= 0 {
            return Err(PresaleError::InvalidRounds);
        }

        if let Some(prev) = &previous {
            if round.capacity < prev.capacity {
                return Err(PresaleError::InvalidRounds);
            }
            if index as u32 > from_index && round.end_time <= prev.end_time {
                return Err(PresaleError::InvalidRounds);
            }
        }

        previous = Some(round);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::fixtures;
    use soroban_sdk::{testutils::Address as _, Env};

    fn table(env: &Env, tiers: &[(i128, i128, u64)]) -> Vec<Round> {
        fixtures::sale_state(env, tiers).rounds
    }

    #[test]
    fn test_valid_round_table() {
        let env = Env::default();
        let rounds = table(&env, &[(100, 100, 50), (200, 100, 80), (300, 400, 500)]);
        assert_eq!(require_valid_rounds(&rounds), Ok(()));
    }

    #[test]
    fn test_rejects_bad_round_tables() {
        let env = Env::default();

        let empty: Vec<Round> = Vec::new(&env);
        assert_eq!(require_valid_rounds(&empty), Err(PresaleError::InvalidRounds));

        // capacidade decrescente
        let rounds = table(&env, &[(100, 200, 50), (200, 100, 80)]);
        assert_eq!(require_valid_rounds(&rounds), Err(PresaleError::InvalidRounds));

        // end_time repetido
        let rounds = table(&env, &[(100, 100, 50), (200, 200, 50)]);
        assert_eq!(require_valid_rounds(&rounds), Err(PresaleError::InvalidRounds));

        // preço zero
        let rounds = table(&env, &[(0, 100, 50)]);
        assert_eq!(require_valid_rounds(&rounds), Err(PresaleError::InvalidRounds));
    }

    #[test]
    fn test_deadlines_checked_from_index() {
        let env = Env::default();
        // round 0 ficou com prazo depois do round 1 (reagendamento)
        let rounds = table(&env, &[(100, 100, 50), (200, 200, 30), (300, 300, 40)]);

        assert_eq!(require_valid_rounds(&rounds), Err(PresaleError::InvalidRounds));
        assert_eq!(require_valid_rounds_from(&rounds, 1), Ok(()));

        // capacidade continua valendo para a tabela toda
        let rounds = table(&env, &[(100, 300, 50), (200, 200, 30), (300, 300, 40)]);
        assert_eq!(require_valid_rounds_from(&rounds, 1), Err(PresaleError::InvalidRounds));
    }

    #[test]
    fn test_too_many_rounds() {
        let env = Env::default();
        let mut tiers = [(0i128, 0i128, 0u64); 11];
        for (i, tier) in tiers.iter_mut().enumerate() {
            *tier = (100, 100 * (i as i128 + 1), 100 * (i as u64 + 1));
        }
        let rounds = table(&env, &tiers);
        assert_eq!(require_valid_rounds(&rounds), Err(PresaleError::InvalidRounds));
    }

    #[test]
    fn test_owner_and_admin_checks() {
        let env = Env::default();
        let state = fixtures::sale_state(&env, &[(100, 100, 50)]);
        let stranger = Address::generate(&env);

        assert_eq!(require_owner(&state, &state.owner), Ok(()));
        assert_eq!(require_owner(&state, &state.admin), Err(PresaleError::Unauthorized));
        assert_eq!(require_admin(&state, &state.admin), Ok(()));
        assert_eq!(require_admin(&state, &stranger), Err(PresaleError::Unauthorized));
    }

    #[test]
    fn test_units_checks() {
        let env = Env::default();
        let state = fixtures::sale_state(&env, &[(100, 100, 50)]);

        assert_eq!(require_valid_units(&state, 0), Err(PresaleError::InvalidAmount));
        assert_eq!(require_valid_units(&state, -5), Err(PresaleError::InvalidAmount));
        assert_eq!(require_valid_units(&state, 1_001), Err(PresaleError::ExceedsMaxPerTx));
        assert_eq!(require_valid_units(&state, 1_000), Ok(()));
    }
}
