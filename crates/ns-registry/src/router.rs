use std::collections::BTreeMap;

use tracing::debug;

use ns_bank::LedgerTransfer;
use ns_store::{KvStore, NameStore};
use ns_types::Operation;

use crate::engine::Outcome;
use crate::error::{RegistryError, RegistryResult};

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// Everything a handler may touch while applying one operation.
///
/// Both the name store and the ledger are views into the current operation's
/// write batch; the handler never sees the committed state directly.
pub struct Context<'a> {
    /// Delivery sequence number of the operation being applied.
    pub seq: u64,
    pub names: NameStore<&'a mut dyn KvStore>,
    pub ledger: &'a mut dyn LedgerTransfer,
}

// ---------------------------------------------------------------------------
// Handler
// ---------------------------------------------------------------------------

/// A module that owns one route and applies the operations sent to it.
pub trait Handler {
    /// The route this handler serves.
    fn route(&self) -> &str;

    /// Apply `op` against `ctx`.
    fn handle(&self, ctx: &mut Context<'_>, op: &Operation) -> RegistryResult<Outcome>;
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Route table mapping route names to their handlers.
///
/// Dispatch does not mutate anything itself; it only selects the handler.
#[derive(Default)]
pub struct Router {
    handlers: BTreeMap<String, Box<dyn Handler>>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under its own route.
    pub fn register(&mut self, handler: Box<dyn Handler>) -> RegistryResult<()> {
        let route = handler.route().to_string();
        if self.handlers.contains_key(&route) {
            return Err(RegistryError::AlreadyRegistered(format!("route {route:?}")));
        }
        debug!(route = %route, "handler registered");
        self.handlers.insert(route, handler);
        Ok(())
    }

    /// Builder-style variant of [`Self::register`].
    pub fn with(mut self, handler: Box<dyn Handler>) -> RegistryResult<Self> {
        self.register(handler)?;
        Ok(self)
    }

    pub fn has_route(&self, route: &str) -> bool {
        self.handlers.contains_key(route)
    }

    /// Registered routes in sorted order.
    pub fn routes(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    /// Hand `op` to the handler registered for its route.
    pub fn route(&self, ctx: &mut Context<'_>, op: &Operation) -> RegistryResult<Outcome> {
        let route = op.route();
        let handler = self
            .handlers
            .get(route)
            .ok_or_else(|| RegistryError::UnknownOperation {
                tag: route.to_string(),
            })?;
        debug!(seq = ctx.seq, route = %route, kind = %op.kind(), "dispatching");
        handler.handle(ctx, op)
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.routes().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Event;
    use ns_bank::{Bank, TransferAdapter};
    use ns_store::InMemoryKvStore;
    use ns_types::{Address, Amount, Buy, ROUTE};

    struct Echo(&'static str);

    impl Handler for Echo {
        fn route(&self) -> &str {
            self.0
        }

        fn handle(&self, ctx: &mut Context<'_>, op: &Operation) -> RegistryResult<Outcome> {
            Ok(Outcome::with_event(
                Event::new("echo").attr("seq", ctx.seq).attr("name", op.name()),
            ))
        }
    }

    fn buy() -> Operation {
        Buy::new("a.id", Amount::new(2), Address::derive(b"alice")).into()
    }

    #[test]
    fn duplicate_route_is_rejected() {
        let mut router = Router::new();
        router.register(Box::new(Echo(ROUTE))).unwrap();
        let err = router.register(Box::new(Echo(ROUTE))).unwrap_err();
        assert_eq!(err.code(), "already_registered");
    }

    #[test]
    fn routes_are_listed() {
        let router = Router::new()
            .with(Box::new(Echo("b")))
            .unwrap()
            .with(Box::new(Echo("a")))
            .unwrap();
        assert_eq!(router.routes().collect::<Vec<_>>(), vec!["a", "b"]);
        assert!(router.has_route("a"));
        assert!(!router.has_route(ROUTE));
    }

    #[test]
    fn dispatches_to_registered_handler() {
        let router = Router::new().with(Box::new(Echo(ROUTE))).unwrap();
        let mut store = InMemoryKvStore::new();
        let mut bank = Bank::new(InMemoryKvStore::new());
        let mut ledger = TransferAdapter::new(&mut bank);
        let mut ctx = Context {
            seq: 7,
            names: NameStore::new(&mut store as &mut dyn KvStore),
            ledger: &mut ledger,
        };

        let outcome = router.route(&mut ctx, &buy()).unwrap();
        assert_eq!(outcome.events[0].get("seq"), Some("7"));
        assert_eq!(outcome.events[0].get("name"), Some("a.id"));
    }

    #[test]
    fn unregistered_route_is_unknown() {
        let router = Router::new();
        let mut store = InMemoryKvStore::new();
        let mut bank = Bank::new(InMemoryKvStore::new());
        let mut ledger = TransferAdapter::new(&mut bank);
        let mut ctx = Context {
            seq: 0,
            names: NameStore::new(&mut store as &mut dyn KvStore),
            ledger: &mut ledger,
        };

        let err = router.route(&mut ctx, &buy()).unwrap_err();
        assert_eq!(
            err,
            RegistryError::UnknownOperation {
                tag: ROUTE.to_string()
            }
        );
    }
}
