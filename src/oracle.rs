use soroban_sdk::{contractclient, contracttype, Address, Env, Symbol};
use crate::pricing;
use crate::storage;
use crate::types::{PresaleError, SaleState};

// ============================================================================
// ORÁCULO DE PREÇO (SEP-40)
// ============================================================================

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum OracleAsset {
    Stellar(Address),
    Other(Symbol),
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PriceData {
    pub price: i128,
    pub timestamp: u64,
}

/// Interface mínima do feed consumida pela pré-venda.
#[contractclient(name = "PriceFeedClient")]
pub trait PriceFeed {
    fn decimals(env: Env) -> u32;
    fn lastprice(env: Env, asset: OracleAsset) -> Option<PriceData>;
}

/// Preço do ativo nativo em USD com `USD_DECIMALS` casas.
/// Feed ausente, com erro, preço não positivo ou velho demais retornam
/// `OracleUnavailable`.
pub fn native_usd_price(env: &Env, state: &SaleState) -> Result<i128, PresaleError> {
    let client = PriceFeedClient::new(env, &state.price_feed);
    let asset = OracleAsset::Stellar(state.native_asset.clone());

    let data = match client.try_lastprice(&asset) {
        Ok(Ok(Some(data))) => data,
        _ => return Err(PresaleError::OracleUnavailable),
    };

    let age = env.ledger().timestamp().saturating_sub(data.timestamp);
    if data.price <= 0 || age > storage::ORACLE_MAX_AGE {
        return Err(PresaleError::OracleUnavailable);
    }

    let feed_decimals = match client.try_decimals() {
        Ok(Ok(decimals)) => decimals,
        _ => return Err(PresaleError::OracleUnavailable),
    };

    let price = pricing::rescale(data.price, feed_decimals, storage::USD_DECIMALS)
        .map_err(|_| PresaleError::OracleUnavailable)?;
    if price == 0 {
        return Err(PresaleError::OracleUnavailable);
    }

    Ok(price)
}

/// Converte o custo em USD para a menor unidade do ativo nativo (floor):
/// native = usd * 10^native_decimals / native_usd
pub fn usd_to_native(env: &Env, state: &SaleState, usd: i128) -> Result<i128, PresaleError> {
    let native_usd = native_usd_price(env, state)?;

    usd.checked_mul(pricing::pow10(state.native_decimals)?)
        .ok_or(PresaleError::InvalidAmount)?
        .checked_div(native_usd)
        .ok_or(PresaleError::OracleUnavailable)
}
