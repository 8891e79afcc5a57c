use soroban_sdk::Address;
use crate::pricing;
use crate::types::{BuyerAccount, PresaleError, SaleState};

// ============================================================================
// VESTING / CLAIM
// ============================================================================

/// Converte unidades inteiras do token vendido para a menor unidade
/// (units * 10^decimals)
pub fn to_sale_units(units: i128, decimals: u32) -> Result<i128, PresaleError> {
    units
        .checked_mul(pricing::pow10(decimals)?)
        .ok_or(PresaleError::InvalidAmount)
}

/// Configura o claim (uma única vez) e retorna quanto deve entrar no escrow,
/// já em menores unidades do token vendido.
///
/// Ordem das validações:
/// 1. claim já configurado
/// 2. depósito menor que o vendido
/// 3. início do claim no passado
/// 4. decimais zero
pub fn configure_claim(
    state: &mut SaleState,
    sale_asset: &Address,
    claim_start: u64,
    total_deposit: i128,
    decimals: u32,
    now: u64,
) -> Result<i128, PresaleError> {
    if state.claim_configured() {
        return Err(PresaleError::ClaimAlreadyConfigured);
    }

    if total_deposit < state.tokens_sold {
        return Err(PresaleError::InsufficientDeposit);
    }

    if claim_start <= now {
        return Err(PresaleError::ClaimStartInPast);
    }

    if decimals == 0 {
        return Err(PresaleError::InvalidDecimals);
    }

    let escrow_amount = to_sale_units(total_deposit, decimals)?;

    state.sale_asset = Some(sale_asset.clone());
    state.sale_asset_decimals = decimals;
    state.tokens_deposited = total_deposit;
    state.claim_start_time = claim_start;
    // Começa na fase de claim antecipado (só whitelist)
    state.whitelist_claim_only = true;

    Ok(escrow_amount)
}

/// Calcula quanto `buyer` pode sacar agora, em menores unidades.
/// Não altera nada; quem chama marca a conta como sacada.
pub fn claimable(
    state: &SaleState,
    buyer: &Address,
    account: &BuyerAccount,
    now: u64,
) -> Result<i128, PresaleError> {
    // Na fase de whitelist, os listados sacam antes de `claim_start_time`
    let early = state.whitelist_claim_only && state.is_claim_whitelisted(buyer);
    if !state.claim_configured() || (!early && now < state.claim_start_time) {
        return Err(PresaleError::ClaimNotStarted);
    }

    if state.is_paused {
        return Err(PresaleError::Paused);
    }

    if state.whitelist_claim_only && !state.is_claim_whitelisted(buyer) {
        return Err(PresaleError::WhitelistOnly);
    }

    if account.claimed {
        return Err(PresaleError::AlreadyClaimed);
    }

    if account.purchased_amount <= 0 {
        return Err(PresaleError::NothingToClaim);
    }

    to_sale_units(account.purchased_amount, state.sale_asset_decimals)
}
