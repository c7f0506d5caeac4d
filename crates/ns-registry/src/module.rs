use ns_types::{Operation, ROUTE};

use crate::engine::{Outcome, TransitionEngine};
use crate::error::RegistryResult;
use crate::router::{Context, Handler};

/// The name-service module: routes every [`Operation`] to its transition.
#[derive(Clone, Copy, Debug, Default)]
pub struct NameServiceModule {
    engine: TransitionEngine,
}

impl NameServiceModule {
    pub fn new(engine: TransitionEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &TransitionEngine {
        &self.engine
    }
}

impl Handler for NameServiceModule {
    fn route(&self) -> &str {
        ROUTE
    }

    fn handle(&self, ctx: &mut Context<'_>, op: &Operation) -> RegistryResult<Outcome> {
        match op {
            Operation::Rename(rename) => self.engine.rename(&mut ctx.names, rename),
            Operation::Buy(buy) => self.engine.buy(&mut ctx.names, &mut *ctx.ledger, buy),
        }
    }
}
