use soroban_sdk::Vec;
use crate::types::{PresaleError, Round, SaleState};

// ============================================================================
// PROGRESSÃO DE ROUNDS
// ============================================================================
//
// Não existe agendador: o round efetivo é recalculado a cada chamada a partir
// do estado salvo e do horário do ledger. Só compras confirmadas e o avanço
// forçado pelo admin persistem o cursor.
//
// Regra de carry:
// - avanço por capacidade: o tracker não muda
// - avanço por prazo: a capacidade não vendida do tier é perdida
//   (`forfeited`) e o tracker vai para o threshold do tier pulado, então o
//   próximo tier começa do seu baseline com capacidade cheia

/// Posição da venda dentro da tabela de rounds.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoundCursor {
    pub index: u32,
    pub tracker: i128,
    /// Unidades perdidas por avanços de prazo desde o estado salvo
    pub forfeited: i128,
    pub ended: bool,
}

impl RoundCursor {
    pub fn from_state(state: &SaleState) -> Self {
        RoundCursor {
            index: state.current_round,
            tracker: state.current_tracker,
            forfeited: 0,
            ended: false,
        }
    }
}

pub fn round_at(rounds: &Vec<Round>, index: u32) -> Result<Round, PresaleError> {
    rounds.get(index).ok_or(PresaleError::InvalidRounds)
}

/// Avança o cursor enquanto o tier atual estiver esgotado ou vencido.
/// No último tier, esgotado ou vencido significa venda encerrada.
pub fn advance(rounds: &Vec<Round>, cursor: &mut RoundCursor, now: u64) -> Result<(), PresaleError> {
    let last = rounds
        .len()
        .checked_sub(1)
        .ok_or(PresaleError::InvalidRounds)?;

    loop {
        let round = round_at(rounds, cursor.index)?;
        let sold_out = cursor.tracker >= round.capacity;
        let expired = now > round.end_time;

        if !sold_out && !expired {
            cursor.ended = false;
            return Ok(());
        }

        if !sold_out {
            let unsold = round.capacity - cursor.tracker;
            cursor.forfeited = cursor
                .forfeited
                .checked_add(unsold)
                .ok_or(PresaleError::InvalidAmount)?;
            cursor.tracker = round.capacity;
        }

        if cursor.index >= last {
            cursor.ended = true;
            return Ok(());
        }

        cursor.index += 1;
    }
}

/// Round efetivo para `now`, sem tocar no estado.
pub fn resolve_round(state: &SaleState, now: u64) -> Result<RoundCursor, PresaleError> {
    let mut cursor = RoundCursor::from_state(state);
    advance(&state.rounds, &mut cursor, now)?;
    Ok(cursor)
}

/// Avanço forçado (admin): perde o que sobrou do tier efetivo e passa
/// para o próximo. No último tier encerra a venda.
pub fn force_advance(state: &SaleState, now: u64) -> Result<RoundCursor, PresaleError> {
    let mut cursor = resolve_round(state, now)?;
    if cursor.ended || state.claim_configured() {
        return Err(PresaleError::SaleEnded);
    }

    let round = round_at(&state.rounds, cursor.index)?;
    let unsold = round.capacity - cursor.tracker;
    cursor.forfeited = cursor
        .forfeited
        .checked_add(unsold)
        .ok_or(PresaleError::InvalidAmount)?;
    cursor.tracker = round.capacity;

    advance(&state.rounds, &mut cursor, now)?;
    Ok(cursor)
}

/// Reprograma os prazos a partir de `from_index`:
/// end[from + i] = now + (i + 1) * per_round_time
pub fn reschedule(state: &mut SaleState, from_index: u32, now: u64) -> Result<(), PresaleError> {
    let mut step: u64 = 1;
    for index in from_index..state.rounds.len() {
        let mut round = round_at(&state.rounds, index)?;
        let offset = state
            .per_round_time
            .checked_mul(step)
            .ok_or(PresaleError::InvalidRounds)?;
        round.end_time = now.checked_add(offset).ok_or(PresaleError::InvalidRounds)?;
        state.rounds.set(index, round);
        step += 1;
    }
    Ok(())
}

/// Grava o cursor no estado. Se o round mudou e o modo dinâmico estiver
/// ligado, reprograma os prazos a partir do novo round.
pub fn commit(state: &mut SaleState, cursor: &RoundCursor, now: u64) -> Result<(), PresaleError> {
    let moved = cursor.index != state.current_round;

    state.current_round = cursor.index;
    state.current_tracker = cursor.tracker;
    state.unsold_tokens = state
        .unsold_tokens
        .checked_add(cursor.forfeited)
        .ok_or(PresaleError::InvalidAmount)?;

    if moved && state.dynamic_time_change {
        reschedule(state, cursor.index, now)?;
    }
    Ok(())
}
