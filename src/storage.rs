use soroban_sdk::{symbol_short, Address, Env, Symbol};
use crate::types::{BuyerAccount, PresaleError, SaleState};

// ============================================================================
// CONSTANTES
// ============================================================================

/// Casas decimais dos valores em USD (preço dos rounds, custo total)
pub const USD_DECIMALS: u32 = 9;

/// Número máximo de rounds na tabela
pub const MAX_ROUNDS: u32 = 10;

/// Limite da whitelist de claim antecipado
pub const MAX_WHITELIST_USERS: u32 = 100;

/// Idade máxima aceita para o preço do oráculo (segundos)
pub const ORACLE_MAX_AGE: u64 = 900;

/// TTL para storage crítico (1 ano em ledgers ~= 6.3M ledgers)
const CRITICAL_STORAGE_TTL: u32 = 6_307_200;

/// TTL threshold para bump (30 dias ~= 518K ledgers)
const CRITICAL_STORAGE_THRESHOLD: u32 = 518_400;

const STATE_KEY: Symbol = symbol_short!("state");
const BUYER_PREFIX: Symbol = symbol_short!("buyer");

// ============================================================================
// FUNÇÕES DE BUMP (TTL)
// ============================================================================

/// Faz bump do TTL da instância (onde vive o SaleState)
pub fn bump_critical_storage(env: &Env) {
    env.storage().instance().extend_ttl(
        CRITICAL_STORAGE_THRESHOLD,
        CRITICAL_STORAGE_TTL,
    );
}

/// Faz bump do TTL da conta de um comprador
pub fn bump_buyer(env: &Env, buyer: &Address) {
    let key = (BUYER_PREFIX, buyer);
    env.storage().persistent().extend_ttl(
        &key,
        CRITICAL_STORAGE_THRESHOLD,
        CRITICAL_STORAGE_TTL,
    );
}

// ============================================================================
// SALE STATE
// ============================================================================

pub fn has_state(env: &Env) -> bool {
    env.storage().instance().has(&STATE_KEY)
}

pub fn get_state(env: &Env) -> Result<SaleState, PresaleError> {
    env.storage()
        .instance()
        .get(&STATE_KEY)
        .ok_or(PresaleError::NotInitialized)
}

pub fn set_state(env: &Env, state: &SaleState) {
    env.storage().instance().set(&STATE_KEY, state);
}

// ============================================================================
// CONTAS DOS COMPRADORES
// ============================================================================

/// Conta inexistente equivale a uma conta zerada; ela só é criada na
/// primeira compra.
pub fn get_buyer(env: &Env, buyer: &Address) -> BuyerAccount {
    let key = (BUYER_PREFIX, buyer);
    env.storage()
        .persistent()
        .get(&key)
        .unwrap_or_default()
}

pub fn has_buyer(env: &Env, buyer: &Address) -> bool {
    let key = (BUYER_PREFIX, buyer);
    env.storage().persistent().has(&key)
}

pub fn set_buyer(env: &Env, buyer: &Address, account: &BuyerAccount) {
    let key = (BUYER_PREFIX, buyer);
    env.storage().persistent().set(&key, account);
    bump_buyer(env, buyer);
}
