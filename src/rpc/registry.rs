//! Method registry and handler contract
//!
//! Maps qualified method names to handlers. The registry is populated during
//! setup, before the server starts listening, and is only read afterwards,
//! so it is shared without locking.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::HandlerError;

/// One RPC method. Success and failure are both explicit in the return
/// type; every invocation terminates in exactly one of them.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn call(&self, params: &[Value]) -> Result<Value, HandlerError>;
}

/// Adapter for plain synchronous functions.
pub struct FnHandler<F>(pub F);

#[async_trait]
impl<F> Handler for FnHandler<F>
where
    F: Fn(&[Value]) -> Result<Value, HandlerError> + Send + Sync,
{
    async fn call(&self, params: &[Value]) -> Result<Value, HandlerError> {
        (self.0)(params)
    }
}

/// A named bundle of members for prefix registration. Handlers are
/// registered under `prefix.member`; constants are carried along but
/// skipped at registration time.
#[derive(Default)]
pub struct Module {
    members: Vec<(String, Member)>,
}

enum Member {
    Handler(Arc<dyn Handler>),
    Constant(Value),
}

impl Module {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handler(mut self, name: impl Into<String>, handler: impl Handler + 'static) -> Self {
        self.members
            .push((name.into(), Member::Handler(Arc::new(handler))));
        self
    }

    pub fn handler_fn<F>(self, name: impl Into<String>, function: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, HandlerError> + Send + Sync + 'static,
    {
        self.handler(name, FnHandler(function))
    }

    pub fn constant(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.members
            .push((name.into(), Member::Constant(value.into())));
        self
    }
}

#[derive(Default)]
pub struct Registry {
    handlers: HashMap<String, Arc<dyn Handler>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` under `name`. Last write wins; re-registering
    /// an existing name is not an error.
    pub fn expose(&mut self, name: impl Into<String>, handler: impl Handler + 'static) {
        self.handlers.insert(name.into(), Arc::new(handler));
    }

    pub fn expose_fn<F>(&mut self, name: impl Into<String>, function: F)
    where
        F: Fn(&[Value]) -> Result<Value, HandlerError> + Send + Sync + 'static,
    {
        self.expose(name, FnHandler(function));
    }

    /// Registers every handler member of `module` under `prefix.member`.
    /// Constant members are silently skipped. Returns the module unchanged
    /// so the caller can chain it into further setup.
    pub fn expose_module(&mut self, prefix: &str, module: Module) -> Module {
        for (name, member) in &module.members {
            if let Member::Handler(handler) = member {
                self.handlers
                    .insert(format!("{prefix}.{name}"), Arc::clone(handler));
            }
        }
        module
    }

    pub fn lookup(&self, name: &str) -> Option<Arc<dyn Handler>> {
        self.handlers.get(name).cloned()
    }

    pub fn method_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlers.keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn expose_registers_and_lookup_resolves() {
        let mut registry = Registry::new();
        registry.expose_fn("echo", |params| Ok(Value::Array(params.to_vec())));

        let handler = registry.lookup("echo").expect("registered method");
        let value = handler.call(&[json!("hi")]).await.expect("echo succeeds");
        assert_eq!(value, json!(["hi"]));
    }

    #[tokio::test]
    async fn re_registration_overwrites_without_error() {
        let mut registry = Registry::new();
        registry.expose_fn("answer", |_| Ok(json!(1)));
        registry.expose_fn("answer", |_| Ok(json!(2)));

        let handler = registry.lookup("answer").expect("registered method");
        assert_eq!(handler.call(&[]).await.expect("second handler"), json!(2));
    }

    #[test]
    fn lookup_of_unknown_name_is_none() {
        let registry = Registry::new();
        assert!(registry.lookup("nope").is_none());
    }

    #[test]
    fn expose_module_registers_handlers_and_skips_constants() {
        let mut registry = Registry::new();
        let module = Module::new()
            .handler_fn("a", |_| Ok(json!("a")))
            .handler_fn("b", |_| Ok(json!("b")))
            .constant("c", 3);

        registry.expose_module("m", module);

        assert_eq!(registry.method_names(), vec!["m.a", "m.b"]);
        assert!(registry.lookup("m.c").is_none());
    }

    #[test]
    fn expose_module_returns_module_for_chaining() {
        let mut first = Registry::new();
        let mut second = Registry::new();
        let module = Module::new().handler_fn("ping", |_| Ok(json!("pong")));

        let module = first.expose_module("net", module);
        second.expose_module("net", module);

        assert!(first.lookup("net.ping").is_some());
        assert!(second.lookup("net.ping").is_some());
    }
}
