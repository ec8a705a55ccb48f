use std::sync::Arc;

use crate::{AppState, Config, LedgerStore, TableConfig, ledger::memory::InMemoryTable};

/// A ledger backed by an empty in-memory table.
pub(crate) fn get_test_ledger() -> LedgerStore {
    LedgerStore::new(Arc::new(InMemoryTable::default()))
}

/// Server state around `ledger` with the password "hunter2" and a fixed cookie secret.
pub(crate) fn get_test_app_state(ledger: LedgerStore) -> AppState {
    let config = Config {
        table: TableConfig {
            url: "https://test.supabase.co".to_owned(),
            key: "test-key".to_owned(),
        },
        dashboard_password: "hunter2".to_owned(),
        cookie_secret: Some("foobar".to_owned()),
        local_timezone: "Etc/UTC".to_owned(),
    };

    AppState::new(&config, ledger)
}
