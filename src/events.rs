use soroban_sdk::{symbol_short, Address, Env, Symbol};
use crate::types::PaymentRail;

//
// EVENTOS DA PRÉ-VENDA
//

// Inicialização
pub fn emit_initialized(env: &Env, owner: &Address, start_time: u64) {
    env.events().publish(
        (symbol_short!("init"), owner),
        start_time,
    );
}

// Troca de owner (passo único)
pub fn emit_owner_changed(env: &Env, old: &Address, new: &Address) {
    env.events().publish(
        (symbol_short!("owner"), old, new),
        true,
    );
}

// Troca de admin
pub fn emit_admin_changed(env: &Env, old: &Address, new: &Address) {
    env.events().publish(
        (symbol_short!("admin"), old, new),
        true,
    );
}

// Carteira de recebimento de um trilho
pub fn emit_wallet_changed(env: &Env, rail: PaymentRail, wallet: &Address) {
    env.events().publish(
        (symbol_short!("wallet"), rail),
        wallet.clone(),
    );
}

// Parâmetro numérico (max_tx, start, round_t, ...)
pub fn emit_param_changed(env: &Env, param: Symbol, value: i128) {
    env.events().publish(
        (symbol_short!("param"), param),
        value,
    );
}

// Tabela de rounds trocada
pub fn emit_rounds_changed(env: &Env, count: u32) {
    env.events().publish(
        (symbol_short!("rounds"),),
        count,
    );
}

// Pausa
pub fn emit_pause(env: &Env) {
    env.events().publish(
        (symbol_short!("pause"),),
        true,
    );
}

// Despausa
pub fn emit_unpause(env: &Env) {
    env.events().publish(
        (symbol_short!("unpause"),),
        true,
    );
}

// Compra: (unidades, custo em USD, valor pago no ativo do trilho)
pub fn emit_purchase(
    env: &Env,
    buyer: &Address,
    rail: PaymentRail,
    units: i128,
    cost_usd: i128,
    paid: i128,
) {
    env.events().publish(
        (symbol_short!("buy"), buyer, rail),
        (units, cost_usd, paid),
    );
}

// Mudança de round
pub fn emit_round_advanced(env: &Env, from: u32, to: u32, forfeited: i128) {
    env.events().publish(
        (symbol_short!("round"), from, to),
        forfeited,
    );
}

// Claim configurado
pub fn emit_claim_started(env: &Env, sale_asset: &Address, deposit: i128, claim_start: u64) {
    env.events().publish(
        (symbol_short!("clm_start"), sale_asset),
        (deposit, claim_start),
    );
}

// Tokens sacados
pub fn emit_claimed(env: &Env, buyer: &Address, amount: i128) {
    env.events().publish(
        (symbol_short!("claim"), buyer),
        amount,
    );
}

// Fase de whitelist ligada/desligada
pub fn emit_whitelist_status(env: &Env, whitelist_only: bool) {
    env.events().publish(
        (symbol_short!("wl_only"),),
        whitelist_only,
    );
}

// Whitelist alterada (tamanho final)
pub fn emit_whitelist_updated(env: &Env, size: u32) {
    env.events().publish(
        (symbol_short!("wl_set"),),
        size,
    );
}

//
// TESTES
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BrazaPresale;
    use soroban_sdk::{testutils::{Address as _, Events}, Env};

    // Eventos precisam ser publicados dentro do frame de um contrato
    fn within_contract(env: &Env, f: impl FnOnce()) {
        let contract_id = env.register_contract(None, BrazaPresale);
        env.as_contract(&contract_id, f);
    }

    #[test]
    fn test_emit_purchase() {
        let env = Env::default();
        let buyer = Address::generate(&env);
        within_contract(&env, || {
            emit_purchase(&env, &buyer, PaymentRail::Stable, 10, 10_000, 10);
        });
        assert_eq!(env.events().all().len(), 1);
    }

    #[test]
    fn test_owner_and_admin() {
        let env = Env::default();
        let a = Address::generate(&env);
        let b = Address::generate(&env);
        within_contract(&env, || {
            emit_owner_changed(&env, &a, &b);
            emit_admin_changed(&env, &b, &a);
        });
        assert_eq!(env.events().all().len(), 2);
    }

    #[test]
    fn test_pause_unpause() {
        let env = Env::default();
        within_contract(&env, || {
            emit_pause(&env);
            emit_unpause(&env);
        });
        assert_eq!(env.events().all().len(), 2);
    }

    #[test]
    fn test_claim_events() {
        let env = Env::default();
        let asset = Address::generate(&env);
        let buyer = Address::generate(&env);

        within_contract(&env, || {
            emit_claim_started(&env, &asset, 275, 600);
            emit_whitelist_status(&env, false);
            emit_whitelist_updated(&env, 5);
            emit_claimed(&env, &buyer, 225_000_000);
        });

        assert_eq!(env.events().all().len(), 4);
    }

    #[test]
    fn test_round_and_params() {
        let env = Env::default();
        within_contract(&env, || {
            emit_round_advanced(&env, 0, 2, 125);
            emit_param_changed(&env, symbol_short!("max_tx"), 80);
            emit_rounds_changed(&env, 4);
        });
        assert_eq!(env.events().all().len(), 3);
    }
}
