use soroban_sdk::{token, Address, Env};
use crate::types::{PaymentRail, PresaleError, SaleState};

// ============================================================================
// TRANSFERÊNCIAS DE ATIVOS
// ============================================================================

/// Transfere `amount` de `asset` (SAC / SEP-41) entre dois endereços.
/// Qualquer falha do token vira `TransferFailed`; o erro devolvido pelo
/// contrato desfaz a invocação inteira.
pub fn transfer(
    env: &Env,
    asset: &Address,
    from: &Address,
    to: &Address,
    amount: i128,
) -> Result<(), PresaleError> {
    let client = token::Client::new(env, asset);

    match client.try_transfer(from, to, &amount) {
        Ok(Ok(())) => Ok(()),
        _ => Err(PresaleError::TransferFailed),
    }
}

/// Ativo e carteira de destino de cada trilho de pagamento.
pub fn rail_sink(state: &SaleState, rail: PaymentRail) -> (Address, Address) {
    match rail {
        PaymentRail::Native => (state.native_asset.clone(), state.payment_wallet.clone()),
        PaymentRail::Stable => (
            state.stable_asset.clone(),
            state.payment_wallet_stable.clone(),
        ),
    }
}

/// Escrow do claim: o próprio contrato
pub fn escrow(env: &Env) -> Address {
    env.current_contract_address()
}

/// Casas decimais de um token, lidas na inicialização
pub fn decimals_of(env: &Env, asset: &Address) -> Result<u32, PresaleError> {
    let client = token::Client::new(env, asset);

    match client.try_decimals() {
        Ok(Ok(decimals)) => Ok(decimals),
        _ => Err(PresaleError::InvalidDecimals),
    }
}
