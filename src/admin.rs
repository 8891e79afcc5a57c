use soroban_sdk::{Address, Env, Vec};
use crate::rounds;
use crate::storage;
use crate::types::{PresaleError, Round, SaleState};
use crate::validation;

// ============================================================================
// ADMIN OPS - OPERAÇÕES DO OWNER SOBRE O SALE STATE
// ============================================================================
//
// Estas funções só mexem no estado em memória. Auth, persistência e eventos
// ficam em presale.rs.

/// Troca a tabela de rounds. O formato (quantidade de tiers) é fixo e a
/// capacidade total não pode ficar abaixo do tracker (vendidos + perdidos).
pub fn change_rounds(state: &mut SaleState, new_rounds: Vec<Round>, now: u64) -> Result<(), PresaleError> {
    validation::require_not_locked(state)?;

    if new_rounds.len() != state.rounds.len() {
        return Err(PresaleError::InvalidRounds);
    }

    let cursor = rounds::resolve_round(state, now)?;
    validation::require_valid_rounds_from(&new_rounds, cursor.index)?;

    let last = new_rounds.last().ok_or(PresaleError::InvalidRounds)?;
    if last.capacity < state.current_tracker {
        return Err(PresaleError::InvalidRounds);
    }

    state.rounds = new_rounds;
    Ok(())
}

/// Altera o prazo do round efetivo (`is_current_round`) ou do seguinte.
/// Retorna o índice alterado.
pub fn change_round_time(
    state: &mut SaleState,
    is_current_round: bool,
    new_end_time: u64,
    now: u64,
) -> Result<u32, PresaleError> {
    validation::require_not_locked(state)?;

    if new_end_time <= now {
        return Err(PresaleError::InvalidRounds);
    }

    let cursor = rounds::resolve_round(state, now)?;
    let target = if is_current_round {
        cursor.index
    } else {
        cursor.index + 1
    };

    let mut round = rounds::round_at(&state.rounds, target)?;
    round.end_time = new_end_time;

    let mut edited = state.rounds.clone();
    edited.set(target, round);
    validation::require_valid_rounds_from(&edited, cursor.index)?;

    state.rounds = edited;
    Ok(target)
}

/// Liga/desliga o reagendamento automático de prazos a cada troca de round
pub fn change_dynamic_round_time(
    state: &mut SaleState,
    enabled: bool,
    per_round_time: u64,
) -> Result<(), PresaleError> {
    validation::require_not_locked(state)?;

    if enabled && per_round_time == 0 {
        return Err(PresaleError::InvalidRounds);
    }

    state.dynamic_time_change = enabled;
    state.per_round_time = per_round_time;
    Ok(())
}

/// Portão de mão única: depois do início, o horário não muda mais.
pub fn change_start_time(state: &mut SaleState, new_start_time: u64, now: u64) -> Result<(), PresaleError> {
    if now >= state.start_time {
        return Err(PresaleError::AlreadyStarted);
    }
    validation::require_future_start(new_start_time, now)?;

    state.start_time = new_start_time;
    Ok(())
}

pub fn change_max_tokens_to_buy(state: &mut SaleState, new_max: i128) -> Result<(), PresaleError> {
    validation::require_positive_amount(new_max)?;
    state.max_tokens_per_tx = new_max;
    Ok(())
}

// ============================================================================
// WHITELIST DE CLAIM
// ============================================================================

fn push_unique(list: &mut Vec<Address>, users: &Vec<Address>) -> Result<(), PresaleError> {
    for user in users.iter() {
        if !list.iter().any(|listed| listed == user) {
            list.push_back(user);
        }
    }

    if list.len() > storage::MAX_WHITELIST_USERS {
        return Err(PresaleError::WhitelistTooLarge);
    }
    Ok(())
}

/// Substitui a whitelist inteira (duplicatas são ignoradas)
pub fn replace_claim_whitelist(
    env: &Env,
    state: &mut SaleState,
    users: &Vec<Address>,
) -> Result<u32, PresaleError> {
    let mut list = Vec::new(env);
    push_unique(&mut list, users)?;

    state.claim_whitelist = list;
    Ok(state.claim_whitelist.len())
}

/// Acrescenta endereços à whitelist atual
pub fn add_claim_whitelist(state: &mut SaleState, users: &Vec<Address>) -> Result<u32, PresaleError> {
    let mut list = state.claim_whitelist.clone();
    push_unique(&mut list, users)?;

    state.claim_whitelist = list;
    Ok(state.claim_whitelist.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::fixtures;
    use soroban_sdk::{testutils::Address as _, vec, Env};

    const TIERS: [(i128, i128, u64); 3] = [(100, 100, 50), (200, 200, 80), (300, 300, 500)];

    #[test]
    fn test_change_rounds_keeps_shape() {
        let env = Env::default();
        let mut state = fixtures::sale_state(&env, &TIERS);

        let shorter = fixtures::sale_state(&env, &TIERS[..2]).rounds;
        assert_eq!(change_rounds(&mut state, shorter, 20), Err(PresaleError::InvalidRounds));

        let edited = fixtures::sale_state(&env, &[(100, 100, 50), (200, 300, 80), (300, 300, 500)]).rounds;
        change_rounds(&mut state, edited.clone(), 20).unwrap();
        assert_eq!(state.rounds, edited);
    }

    #[test]
    fn test_round_edits_locked_after_claim() {
        let env = Env::default();
        let mut state = fixtures::sale_state(&env, &TIERS);
        state.sale_asset = Some(Address::generate(&env));

        let same = state.rounds.clone();
        assert_eq!(change_rounds(&mut state, same, 20), Err(PresaleError::SaleLocked));
        assert_eq!(change_round_time(&mut state, true, 60, 20), Err(PresaleError::SaleLocked));
        assert_eq!(change_dynamic_round_time(&mut state, true, 30), Err(PresaleError::SaleLocked));
    }

    #[test]
    fn test_change_round_time_current_and_next() {
        let env = Env::default();
        let mut state = fixtures::sale_state(&env, &TIERS);

        assert_eq!(change_round_time(&mut state, true, 70, 20), Ok(0));
        assert_eq!(rounds::round_at(&state.rounds, 0).unwrap().end_time, 70);

        assert_eq!(change_round_time(&mut state, false, 90, 20), Ok(1));
        assert_eq!(rounds::round_at(&state.rounds, 1).unwrap().end_time, 90);

        // passaria do prazo do round seguinte
        assert_eq!(change_round_time(&mut state, true, 95, 20), Err(PresaleError::InvalidRounds));
        // no passado
        assert_eq!(change_round_time(&mut state, true, 20, 20), Err(PresaleError::InvalidRounds));
    }

    #[test]
    fn test_change_round_time_follows_resolved_round() {
        let env = Env::default();
        let mut state = fixtures::sale_state(&env, &TIERS);

        // em t=60 o round 0 já venceu: o round efetivo é o 1
        assert_eq!(change_round_time(&mut state, true, 100, 60), Ok(1));

        // não existe round depois do último
        state.current_round = 2;
        assert_eq!(change_round_time(&mut state, false, 600, 60), Err(PresaleError::InvalidRounds));
    }

    #[test]
    fn test_change_rounds_keeps_room_for_tracker() {
        let env = Env::default();
        let mut state = fixtures::sale_state(&env, &TIERS);
        state.tokens_sold = 160;
        state.current_tracker = 160;
        state.current_round = 1;

        let tiny = fixtures::sale_state(&env, &[(100, 10, 50), (200, 20, 80), (300, 30, 500)]).rounds;
        assert_eq!(change_rounds(&mut state, tiny, 20), Err(PresaleError::InvalidRounds));

        // exatamente o tracker ainda cabe
        let tight = fixtures::sale_state(&env, &[(100, 100, 50), (200, 150, 80), (300, 160, 500)]).rounds;
        assert_eq!(change_rounds(&mut state, tight.clone(), 20), Ok(()));
        assert_eq!(state.rounds, tight);
    }

    #[test]
    fn test_round_time_after_dynamic_reschedule() {
        let env = Env::default();
        let mut state = fixtures::sale_state(&env, &TIERS);
        state.dynamic_time_change = true;
        state.per_round_time = 10;

        // round 0 esgota em t=20: prazos a partir do round 1 viram 30, 40
        state.current_tracker = 100;
        let cursor = rounds::resolve_round(&state, 20).unwrap();
        rounds::commit(&mut state, &cursor, 20).unwrap();
        assert_eq!(rounds::round_at(&state.rounds, 0).unwrap().end_time, 50);
        assert_eq!(rounds::round_at(&state.rounds, 1).unwrap().end_time, 30);

        assert_eq!(change_round_time(&mut state, true, 25, 20), Ok(1));
        assert_eq!(rounds::round_at(&state.rounds, 1).unwrap().end_time, 25);

        let same = state.rounds.clone();
        assert_eq!(change_rounds(&mut state, same, 20), Ok(()));
    }

    #[test]
    fn test_start_time_gate() {
        let env = Env::default();
        let mut state = fixtures::sale_state(&env, &TIERS);
        state.start_time = 100;

        assert_eq!(change_start_time(&mut state, 50, 60), Err(PresaleError::StartTimeInPast));
        assert_eq!(change_start_time(&mut state, 120, 60), Ok(()));
        assert_eq!(change_start_time(&mut state, 200, 120), Err(PresaleError::AlreadyStarted));
        assert_eq!(state.start_time, 120);
    }

    #[test]
    fn test_whitelist_replace_and_add() {
        let env = Env::default();
        let mut state = fixtures::sale_state(&env, &TIERS);
        let a = Address::generate(&env);
        let b = Address::generate(&env);
        let c = Address::generate(&env);

        let size = replace_claim_whitelist(&env, &mut state, &vec![&env, a.clone(), a.clone(), b.clone()]).unwrap();
        assert_eq!(size, 2);

        let size = add_claim_whitelist(&mut state, &vec![&env, b.clone(), c.clone()]).unwrap();
        assert_eq!(size, 3);

        let size = replace_claim_whitelist(&env, &mut state, &vec![&env, c.clone()]).unwrap();
        assert_eq!(size, 1);
        assert!(!state.is_claim_whitelisted(&a));
        assert!(state.is_claim_whitelisted(&c));
    }

    #[test]
    fn test_whitelist_limit() {
        let env = Env::default();
        let mut state = fixtures::sale_state(&env, &TIERS);

        let mut users = Vec::new(&env);
        for _ in 0..(storage::MAX_WHITELIST_USERS + 1) {
            users.push_back(Address::generate(&env));
        }

        assert_eq!(
            replace_claim_whitelist(&env, &mut state, &users),
            Err(PresaleError::WhitelistTooLarge)
        );
        assert_eq!(state.claim_whitelist.len(), 0);
    }
}
