use soroban_sdk::{contracterror, contracttype, Address, Vec};

// ============================================================================
// ERROS DO CONTRATO
// ============================================================================
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum PresaleError {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    Unauthorized = 3,
    InvalidAmount = 4,
    ExceedsMaxPerTx = 5,
    CapacityExceeded = 6,
    SaleEnded = 7,
    NotStarted = 8,
    AlreadyStarted = 9,
    Paused = 10,
    InsufficientDeposit = 11,
    ClaimStartInPast = 12,
    InvalidDecimals = 13,
    ClaimNotStarted = 14,
    WhitelistOnly = 15,
    AlreadyClaimed = 16,
    StartTimeInPast = 17,
    TransferFailed = 18,
    InvalidRounds = 19,
    OracleUnavailable = 20,
    NothingToClaim = 21,
    ClaimAlreadyConfigured = 22,
    WhitelistTooLarge = 23,

    // Edição de rounds depois que o claim foi configurado
    SaleLocked = 24,
}

// ============================================================================
// ROUNDS (TIERS DE PREÇO)
// ============================================================================

/// Um tier de preço. `capacity` é cumulativo: o tier termina quando o
/// tracker atinge esse valor.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Round {
    /// Preço por unidade em USD com `USD_DECIMALS` casas
    pub price: i128,
    pub capacity: i128,
    pub end_time: u64,
}

// ============================================================================
// TRILHOS DE PAGAMENTO
// ============================================================================

#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PaymentRail {
    Native,
    Stable,
}

/// Feed de preço e ativo nativo usados no trilho `Native`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OracleConfig {
    pub feed: Address,
    pub native_asset: Address,
}

// ============================================================================
// ESTADO GLOBAL DA PRÉ-VENDA
// ============================================================================

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SaleState {
    pub owner: Address,
    pub admin: Address,
    pub payment_wallet: Address,
    pub payment_wallet_stable: Address,

    pub native_asset: Address,
    pub native_decimals: u32,
    pub stable_asset: Address,
    pub stable_decimals: u32,
    pub price_feed: Address,

    pub start_time: u64,
    pub rounds: Vec<Round>,
    pub current_round: u32,
    pub tokens_sold: i128,
    pub current_tracker: i128,
    pub unsold_tokens: i128,
    pub usd_raised: i128,
    pub max_tokens_per_tx: i128,
    pub is_paused: bool,

    pub dynamic_time_change: bool,
    pub per_round_time: u64,

    // Claim
    pub sale_asset: Option<Address>,
    pub sale_asset_decimals: u32,
    pub tokens_deposited: i128,
    pub tokens_claimed: i128,
    pub claim_start_time: u64,
    pub whitelist_claim_only: bool,
    pub claim_whitelist: Vec<Address>,
}

impl SaleState {
    /// O claim só é configurado uma vez; depois disso a venda está travada.
    pub fn claim_configured(&self) -> bool {
        self.sale_asset.is_some()
    }

    pub fn is_claim_whitelisted(&self, buyer: &Address) -> bool {
        self.claim_whitelist.iter().any(|a| &a == buyer)
    }
}

// ============================================================================
// CONTA DO COMPRADOR
// ============================================================================

#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct BuyerAccount {
    pub purchased_amount: i128,
    pub claimed: bool,
}

/// Resultado de `calculate_price`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PriceQuote {
    pub price_in_usd: i128,
    pub new_round: u32,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use soroban_sdk::{testutils::Address as _, Env};

    /// Estado mínimo para os testes puros de pricing/rounds/claim.
    /// Cada tupla é (price, capacity, end_time).
    pub fn sale_state(env: &Env, tiers: &[(i128, i128, u64)]) -> SaleState {
        let mut rounds = Vec::new(env);
        for (price, capacity, end_time) in tiers.iter() {
            rounds.push_back(Round {
                price: *price,
                capacity: *capacity,
                end_time: *end_time,
            });
        }

        SaleState {
            owner: Address::generate(env),
            admin: Address::generate(env),
            payment_wallet: Address::generate(env),
            payment_wallet_stable: Address::generate(env),
            native_asset: Address::generate(env),
            native_decimals: 7,
            stable_asset: Address::generate(env),
            stable_decimals: 6,
            price_feed: Address::generate(env),
            start_time: 10,
            rounds,
            current_round: 0,
            tokens_sold: 0,
            current_tracker: 0,
            unsold_tokens: 0,
            usd_raised: 0,
            max_tokens_per_tx: 1_000,
            is_paused: false,
            dynamic_time_change: false,
            per_round_time: 0,
            sale_asset: None,
            sale_asset_decimals: 0,
            tokens_deposited: 0,
            tokens_claimed: 0,
            claim_start_time: 0,
            whitelist_claim_only: false,
            claim_whitelist: Vec::new(env),
        }
    }
}
