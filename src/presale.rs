use soroban_sdk::{contract, contractimpl, log, symbol_short, Address, Env, Vec};
use crate::admin;
use crate::events;
use crate::oracle;
use crate::payments;
use crate::pricing;
use crate::rounds;
use crate::storage;
use crate::types::{
    BuyerAccount, OracleConfig, PaymentRail, PresaleError, PriceQuote, Round, SaleState,
};
use crate::validation;
use crate::vesting;

//
// CONTRATO PRINCIPAL - BRAZA PRESALE
//

#[contract]
pub struct BrazaPresale;

/// Carrega o estado e renova o TTL da instância
fn load(env: &Env) -> Result<SaleState, PresaleError> {
    storage::bump_critical_storage(env);
    storage::get_state(env)
}

/// Carrega o estado exigindo assinatura do owner
fn load_as_owner(env: &Env, caller: &Address) -> Result<SaleState, PresaleError> {
    caller.require_auth();
    let state = load(env)?;
    validation::require_owner(&state, caller)?;
    Ok(state)
}

/// Converte o custo em USD para o ativo do trilho
fn payment_for(env: &Env, state: &SaleState, rail: PaymentRail, usd: i128) -> Result<i128, PresaleError> {
    match rail {
        PaymentRail::Native => oracle::usd_to_native(env, state, usd),
        PaymentRail::Stable => pricing::usd_to_stable(state, usd),
    }
}

/// Compra de `units` tokens pagos no trilho `rail`.
///
/// # Padrão CEI:
/// 1. CHECKS: auth, pausa, início, round aberto, limites, preço
/// 2. EFFECTS: cursor de rounds, totais e conta do comprador
/// 3. INTERACTIONS: transferência do pagamento e eventos
///
/// Se a transferência falhar o erro desfaz todos os efeitos.
fn buy(env: &Env, buyer: &Address, units: i128, rail: PaymentRail) -> Result<(), PresaleError> {
    // === CHECKS ===
    buyer.require_auth();
    let mut state = load(env)?;
    let now = env.ledger().timestamp();

    validation::require_not_paused(&state)?;
    validation::require_started(&state, now)?;
    let cursor = pricing::open_cursor(&state, now)?;
    validation::require_valid_units(&state, units)?;

    let fill = pricing::fill(&state, cursor, units, now)?;
    let paid = payment_for(env, &state, rail, fill.cost)?;
    validation::require_positive_amount(paid)?;

    // === EFFECTS ===
    let previous_round = state.current_round;
    rounds::commit(&mut state, &fill.cursor, now)?;

    state.tokens_sold = state
        .tokens_sold
        .checked_add(units)
        .ok_or(PresaleError::InvalidAmount)?;
    state.usd_raised = state
        .usd_raised
        .checked_add(fill.cost)
        .ok_or(PresaleError::InvalidAmount)?;

    let mut account = storage::get_buyer(env, buyer);
    account.purchased_amount = account
        .purchased_amount
        .checked_add(units)
        .ok_or(PresaleError::InvalidAmount)?;

    storage::set_state(env, &state);
    storage::set_buyer(env, buyer, &account);

    // === INTERACTIONS ===
    let (asset, wallet) = payments::rail_sink(&state, rail);
    payments::transfer(env, &asset, buyer, &wallet, paid)?;

    if state.current_round != previous_round {
        events::emit_round_advanced(env, previous_round, state.current_round, fill.cursor.forfeited);
    }
    events::emit_purchase(env, buyer, rail, units, fill.cost, paid);

    Ok(())
}

#[contractimpl]
impl BrazaPresale {

    //
    // INICIALIZAÇÃO
    //

    /// Inicializa a pré-venda.
    ///
    /// # Parâmetros
    /// - `start_time`: abertura da venda (precisa estar no futuro)
    /// - `rounds`: tabela de tiers (preço em USD com 9 casas, capacidade
    ///   cumulativa, prazo)
    /// - `oracle`: feed SEP-40 e ativo nativo cotado por ele
    ///
    /// # Erros
    /// - `AlreadyInitialized`, `StartTimeInPast`, `InvalidRounds`,
    ///   `InvalidAmount`, `InvalidDecimals`
    #[allow(clippy::too_many_arguments)]
    pub fn initialize(
        env: Env,
        owner: Address,
        payment_wallet: Address,
        start_time: u64,
        rounds: Vec<Round>,
        max_tokens_per_tx: i128,
        admin: Address,
        stable_asset: Address,
        payment_wallet_stable: Address,
        oracle: OracleConfig,
    ) -> Result<(), PresaleError> {
        // CHECKS
        if storage::has_state(&env) {
            return Err(PresaleError::AlreadyInitialized);
        }
        owner.require_auth();

        let now = env.ledger().timestamp();
        validation::require_future_start(start_time, now)?;
        validation::require_valid_rounds(&rounds)?;
        validation::require_positive_amount(max_tokens_per_tx)?;

        let native_decimals = payments::decimals_of(&env, &oracle.native_asset)?;
        let stable_decimals = payments::decimals_of(&env, &stable_asset)?;

        // EFFECTS
        let state = SaleState {
            owner: owner.clone(),
            admin,
            payment_wallet,
            payment_wallet_stable,
            native_asset: oracle.native_asset,
            native_decimals,
            stable_asset,
            stable_decimals,
            price_feed: oracle.feed,
            start_time,
            rounds,
            current_round: 0,
            tokens_sold: 0,
            current_tracker: 0,
            unsold_tokens: 0,
            usd_raised: 0,
            max_tokens_per_tx,
            is_paused: false,
            dynamic_time_change: false,
            per_round_time: 0,
            sale_asset: None,
            sale_asset_decimals: 0,
            tokens_deposited: 0,
            tokens_claimed: 0,
            claim_start_time: 0,
            whitelist_claim_only: false,
            claim_whitelist: Vec::new(&env),
        };
        storage::set_state(&env, &state);
        storage::bump_critical_storage(&env);

        // INTERACTIONS
        events::emit_initialized(&env, &owner, start_time);

        Ok(())
    }

    //
    // CONFIGURAÇÃO (OWNER)
    //

    pub fn change_owner(env: Env, caller: Address, new_owner: Address) -> Result<(), PresaleError> {
        let mut state = load_as_owner(&env, &caller)?;
        log!(&env, "Owner changing", state.owner, new_owner);

        let old = state.owner.clone();
        state.owner = new_owner.clone();
        storage::set_state(&env, &state);

        events::emit_owner_changed(&env, &old, &new_owner);
        Ok(())
    }

    pub fn change_admin(env: Env, caller: Address, new_admin: Address) -> Result<(), PresaleError> {
        let mut state = load_as_owner(&env, &caller)?;
        log!(&env, "Admin changing", state.admin, new_admin);

        let old = state.admin.clone();
        state.admin = new_admin.clone();
        storage::set_state(&env, &state);

        events::emit_admin_changed(&env, &old, &new_admin);
        Ok(())
    }

    /// Carteira que recebe os pagamentos no ativo nativo
    pub fn change_payment_wallet(env: Env, caller: Address, wallet: Address) -> Result<(), PresaleError> {
        let mut state = load_as_owner(&env, &caller)?;
        log!(&env, "Payment wallet changing", state.payment_wallet, wallet);

        state.payment_wallet = wallet.clone();
        storage::set_state(&env, &state);

        events::emit_wallet_changed(&env, PaymentRail::Native, &wallet);
        Ok(())
    }

    /// Carteira que recebe os pagamentos no ativo estável
    pub fn change_payment_wallet_stable(env: Env, caller: Address, wallet: Address) -> Result<(), PresaleError> {
        let mut state = load_as_owner(&env, &caller)?;
        log!(&env, "Stable payment wallet changing", state.payment_wallet_stable, wallet);

        state.payment_wallet_stable = wallet.clone();
        storage::set_state(&env, &state);

        events::emit_wallet_changed(&env, PaymentRail::Stable, &wallet);
        Ok(())
    }

    pub fn change_max_tokens_to_buy(env: Env, caller: Address, new_max: i128) -> Result<(), PresaleError> {
        let mut state = load_as_owner(&env, &caller)?;
        log!(&env, "Max tokens per tx changing", state.max_tokens_per_tx, new_max);

        admin::change_max_tokens_to_buy(&mut state, new_max)?;
        storage::set_state(&env, &state);

        events::emit_param_changed(&env, symbol_short!("max_tx"), new_max);
        Ok(())
    }

    /// Troca a tabela de rounds (mesmo número de tiers). Bloqueado depois
    /// que o claim for configurado.
    pub fn change_rounds(env: Env, caller: Address, new_rounds: Vec<Round>) -> Result<(), PresaleError> {
        let mut state = load_as_owner(&env, &caller)?;
        let now = env.ledger().timestamp();

        admin::change_rounds(&mut state, new_rounds, now)?;
        storage::set_state(&env, &state);

        events::emit_rounds_changed(&env, state.rounds.len());
        Ok(())
    }

    /// Altera o prazo do round efetivo (`is_current_round = true`) ou do
    /// round seguinte.
    pub fn change_round_time(
        env: Env,
        caller: Address,
        is_current_round: bool,
        new_end_time: u64,
    ) -> Result<(), PresaleError> {
        let mut state = load_as_owner(&env, &caller)?;
        let now = env.ledger().timestamp();

        let index = admin::change_round_time(&mut state, is_current_round, new_end_time, now)?;
        log!(&env, "Round end time changed", index, new_end_time);
        storage::set_state(&env, &state);

        events::emit_param_changed(&env, symbol_short!("round_t"), i128::from(new_end_time));
        Ok(())
    }

    /// Liga o reagendamento automático: a cada troca de round os prazos
    /// seguintes passam a ser `now + k * per_round_time`.
    pub fn change_dynamic_round_time(
        env: Env,
        caller: Address,
        enabled: bool,
        per_round_time: u64,
    ) -> Result<(), PresaleError> {
        let mut state = load_as_owner(&env, &caller)?;

        admin::change_dynamic_round_time(&mut state, enabled, per_round_time)?;
        log!(&env, "Dynamic round time changed", enabled, per_round_time);
        storage::set_state(&env, &state);

        events::emit_param_changed(&env, symbol_short!("dyn_time"), i128::from(per_round_time));
        Ok(())
    }

    pub fn change_start_time(env: Env, caller: Address, new_start_time: u64) -> Result<(), PresaleError> {
        let mut state = load_as_owner(&env, &caller)?;
        let now = env.ledger().timestamp();
        log!(&env, "Start time changing", state.start_time, new_start_time);

        admin::change_start_time(&mut state, new_start_time, now)?;
        storage::set_state(&env, &state);

        events::emit_param_changed(&env, symbol_short!("start"), i128::from(new_start_time));
        Ok(())
    }

    //
    // PAUSA
    //

    /// Pausa compras e claims
    pub fn pause_presale(env: Env, caller: Address) -> Result<(), PresaleError> {
        let mut state = load_as_owner(&env, &caller)?;

        state.is_paused = true;
        storage::set_state(&env, &state);

        events::emit_pause(&env);
        Ok(())
    }

    pub fn unpause_presale(env: Env, caller: Address) -> Result<(), PresaleError> {
        let mut state = load_as_owner(&env, &caller)?;

        state.is_paused = false;
        storage::set_state(&env, &state);

        events::emit_unpause(&env);
        Ok(())
    }

    //
    // ROUNDS (ADMIN)
    //

    /// Avanço manual de round. O que sobrou do tier efetivo é perdido;
    /// no último tier a venda é encerrada.
    pub fn increment_current_round(env: Env, caller: Address) -> Result<(), PresaleError> {
        // CHECKS
        caller.require_auth();
        let mut state = load(&env)?;
        validation::require_admin(&state, &caller)?;

        let now = env.ledger().timestamp();
        let cursor = rounds::force_advance(&state, now)?;

        // EFFECTS
        let previous_round = state.current_round;
        rounds::commit(&mut state, &cursor, now)?;
        storage::set_state(&env, &state);

        // INTERACTIONS
        events::emit_round_advanced(&env, previous_round, state.current_round, cursor.forfeited);
        Ok(())
    }

    //
    // PREÇOS (LEITURA)
    //

    /// Custo em USD (9 casas) de `units` tokens e o round em que a venda
    /// ficaria depois da compra.
    pub fn calculate_price(env: Env, units: i128) -> Result<PriceQuote, PresaleError> {
        let state = load(&env)?;
        let now = env.ledger().timestamp();
        Ok(pricing::quote(&state, units, now)?.quote())
    }

    /// Quanto do ativo nativo (menor unidade) custam `units` tokens agora
    pub fn native_buy_helper(env: Env, units: i128) -> Result<i128, PresaleError> {
        let state = load(&env)?;
        let now = env.ledger().timestamp();
        let fill = pricing::quote(&state, units, now)?;
        payment_for(&env, &state, PaymentRail::Native, fill.cost)
    }

    /// Quanto do ativo estável (menor unidade) custam `units` tokens agora
    pub fn stable_buy_helper(env: Env, units: i128) -> Result<i128, PresaleError> {
        let state = load(&env)?;
        let now = env.ledger().timestamp();
        let fill = pricing::quote(&state, units, now)?;
        payment_for(&env, &state, PaymentRail::Stable, fill.cost)
    }

    //
    // COMPRAS
    //

    pub fn buy_with_native(env: Env, buyer: Address, units: i128) -> Result<(), PresaleError> {
        buy(&env, &buyer, units, PaymentRail::Native)
    }

    pub fn buy_with_stable(env: Env, buyer: Address, units: i128) -> Result<(), PresaleError> {
        buy(&env, &buyer, units, PaymentRail::Stable)
    }

    //
    // CLAIM
    //

    /// Configura o claim e deposita o token vendido no escrow do contrato.
    /// Depois disso a venda fica encerrada e a tabela de rounds travada.
    pub fn start_claim(
        env: Env,
        caller: Address,
        sale_asset: Address,
        claim_start: u64,
        total_deposit: i128,
        decimals: u32,
    ) -> Result<(), PresaleError> {
        // CHECKS
        let mut state = load_as_owner(&env, &caller)?;
        let now = env.ledger().timestamp();

        // EFFECTS
        let escrow_amount = vesting::configure_claim(
            &mut state,
            &sale_asset,
            claim_start,
            total_deposit,
            decimals,
            now,
        )?;
        storage::set_state(&env, &state);

        // INTERACTIONS
        payments::transfer(&env, &sale_asset, &caller, &payments::escrow(&env), escrow_amount)?;
        events::emit_claim_started(&env, &sale_asset, total_deposit, claim_start);

        Ok(())
    }

    /// Saque único de tudo o que `buyer` comprou
    pub fn claim(env: Env, buyer: Address) -> Result<(), PresaleError> {
        // CHECKS
        buyer.require_auth();
        let mut state = load(&env)?;
        let now = env.ledger().timestamp();

        let mut account = storage::get_buyer(&env, &buyer);
        let amount = vesting::claimable(&state, &buyer, &account, now)?;
        let sale_asset = state.sale_asset.clone().ok_or(PresaleError::ClaimNotStarted)?;

        // EFFECTS
        account.claimed = true;
        state.tokens_claimed = state
            .tokens_claimed
            .checked_add(account.purchased_amount)
            .ok_or(PresaleError::InvalidAmount)?;
        storage::set_buyer(&env, &buyer, &account);
        storage::set_state(&env, &state);

        // INTERACTIONS
        payments::transfer(&env, &sale_asset, &payments::escrow(&env), &buyer, amount)?;
        events::emit_claimed(&env, &buyer, amount);

        Ok(())
    }

    /// Liga/desliga a fase de claim exclusiva da whitelist
    pub fn change_whitelist_claim_status(env: Env, caller: Address, whitelist_only: bool) -> Result<(), PresaleError> {
        let mut state = load_as_owner(&env, &caller)?;

        state.whitelist_claim_only = whitelist_only;
        storage::set_state(&env, &state);

        events::emit_whitelist_status(&env, whitelist_only);
        Ok(())
    }

    /// Substitui a whitelist de claim antecipado
    pub fn change_claim_whitelist_users(env: Env, caller: Address, users: Vec<Address>) -> Result<(), PresaleError> {
        let mut state = load_as_owner(&env, &caller)?;

        let size = admin::replace_claim_whitelist(&env, &mut state, &users)?;
        storage::set_state(&env, &state);

        events::emit_whitelist_updated(&env, size);
        Ok(())
    }

    /// Acrescenta endereços à whitelist de claim antecipado
    pub fn add_claim_whitelist_users(env: Env, caller: Address, users: Vec<Address>) -> Result<(), PresaleError> {
        let mut state = load_as_owner(&env, &caller)?;

        let size = admin::add_claim_whitelist(&mut state, &users)?;
        storage::set_state(&env, &state);

        events::emit_whitelist_updated(&env, size);
        Ok(())
    }

    //
    // CONSULTAS
    //

    pub fn get_state(env: Env) -> Result<SaleState, PresaleError> {
        load(&env)
    }

    pub fn get_rounds(env: Env) -> Result<Vec<Round>, PresaleError> {
        Ok(load(&env)?.rounds)
    }

    /// Round efetivo agora (considera prazos vencidos ainda não gravados)
    pub fn get_current_round(env: Env) -> Result<u32, PresaleError> {
        let state = load(&env)?;
        let now = env.ledger().timestamp();
        Ok(rounds::resolve_round(&state, now)?.index)
    }

    pub fn get_buyer_account(env: Env, buyer: Address) -> BuyerAccount {
        if storage::has_buyer(&env, &buyer) {
            storage::bump_buyer(&env, &buyer);
        }
        storage::get_buyer(&env, &buyer)
    }

    pub fn get_owner(env: Env) -> Result<Address, PresaleError> {
        Ok(load(&env)?.owner)
    }

    pub fn get_admin(env: Env) -> Result<Address, PresaleError> {
        Ok(load(&env)?.admin)
    }

    pub fn is_paused(env: Env) -> Result<bool, PresaleError> {
        Ok(load(&env)?.is_paused)
    }

    pub fn get_claim_whitelist(env: Env) -> Result<Vec<Address>, PresaleError> {
        Ok(load(&env)?.claim_whitelist)
    }

    pub fn is_claim_whitelisted(env: Env, user: Address) -> Result<bool, PresaleError> {
        Ok(load(&env)?.is_claim_whitelisted(&user))
    }
}
