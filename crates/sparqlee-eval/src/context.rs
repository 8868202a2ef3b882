//! Evaluation context shared by every evaluation of one query execution

use crate::config::EvaluatorConfig;
use crate::error::{EvalError, EvalResult};
use crate::overload::OverloadCache;
use async_trait::async_trait;
use chrono::{Timelike, Utc};
use indexmap::IndexMap;
use oxiri::Iri;
use rust_decimal::Decimal;
use sparqlee_ast::{AggregateExpression, ExistenceExpression, Variable};
use sparqlee_types::{
    DateTimeValue, RdfTerm, Term, TermTransformer, TimezoneOffset, TypeHierarchy,
    XsdTypeHierarchy,
};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Variable bindings of one solution
pub type Bindings = IndexMap<Variable, RdfTerm>;

/// Evaluates `EXISTS` / `NOT EXISTS` patterns
#[async_trait]
pub trait ExistenceHook: Send + Sync {
    /// Whether the pattern has at least one solution under `bindings`
    async fn exists(&self, expression: &ExistenceExpression, bindings: &Bindings) -> EvalResult<bool>;
}

/// Supplies the value of an aggregate expression
#[async_trait]
pub trait AggregateHook: Send + Sync {
    async fn aggregate(&self, expression: &AggregateExpression) -> EvalResult<Term>;
}

/// Synchronous extension function
pub type SyncExtensionFn = Arc<dyn Fn(&[Term]) -> EvalResult<Term> + Send + Sync>;

/// Asynchronous extension function
#[async_trait]
pub trait AsyncExtensionFunction: Send + Sync {
    async fn apply(&self, args: Vec<Term>) -> EvalResult<Term>;
}

/// Extension functions keyed by IRI
#[derive(Clone, Default)]
pub struct ExtensionRegistry {
    sync_functions: HashMap<String, SyncExtensionFn>,
    async_functions: HashMap<String, Arc<dyn AsyncExtensionFunction>>,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a synchronous extension function
    pub fn register_sync<F>(&mut self, iri: impl Into<String>, function: F)
    where
        F: Fn(&[Term]) -> EvalResult<Term> + Send + Sync + 'static,
    {
        self.sync_functions.insert(iri.into(), Arc::new(function));
    }

    /// Register an asynchronous extension function
    pub fn register_async(&mut self, iri: impl Into<String>, function: Arc<dyn AsyncExtensionFunction>) {
        self.async_functions.insert(iri.into(), function);
    }

    pub fn sync_function(&self, iri: &str) -> Option<&SyncExtensionFn> {
        self.sync_functions.get(iri)
    }

    pub fn async_function(&self, iri: &str) -> Option<&Arc<dyn AsyncExtensionFunction>> {
        self.async_functions.get(iri)
    }

    pub fn is_empty(&self) -> bool {
        self.sync_functions.is_empty() && self.async_functions.is_empty()
    }
}

impl fmt::Debug for ExtensionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionRegistry")
            .field("sync", &self.sync_functions.keys().collect::<Vec<_>>())
            .field("async", &self.async_functions.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Allocates fresh blank node labels (`b0`, `b1`, ...)
#[derive(Debug, Default)]
pub struct BlankNodeCounter {
    next: AtomicU64,
}

impl BlankNodeCounter {
    pub fn next_label(&self) -> String {
        format!("b{}", self.next.fetch_add(1, Ordering::Relaxed))
    }

    pub fn reset(&self) {
        self.next.store(0, Ordering::Relaxed);
    }
}

/// Evaluation context for SPARQL expression execution
pub struct EvaluationContext {
    now: DateTimeValue,
    default_timezone: TimezoneOffset,
    base_iri: Option<Iri<String>>,
    transformer: TermTransformer,
    overload_cache: Option<Arc<OverloadCache>>,
    blank_nodes: BlankNodeCounter,
    extensions: ExtensionRegistry,
    existence_hook: Option<Arc<dyn ExistenceHook>>,
    aggregate_hook: Option<Arc<dyn AggregateHook>>,
}

impl Default for EvaluationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl EvaluationContext {
    /// Create a context with the current time, UTC as default timezone and
    /// the standard XSD type hierarchy
    pub fn new() -> Self {
        Self::with_parts(
            current_time(),
            TimezoneOffset::UTC,
            None,
            Arc::new(XsdTypeHierarchy::new()),
        )
    }

    pub fn builder() -> EvaluationContextBuilder {
        EvaluationContextBuilder::new()
    }

    fn with_parts(
        now: DateTimeValue,
        default_timezone: TimezoneOffset,
        base_iri: Option<Iri<String>>,
        type_hierarchy: Arc<dyn TypeHierarchy>,
    ) -> Self {
        Self {
            now,
            default_timezone,
            base_iri,
            transformer: TermTransformer::new(type_hierarchy),
            overload_cache: Some(Arc::new(OverloadCache::default())),
            blank_nodes: BlankNodeCounter::default(),
            extensions: ExtensionRegistry::default(),
            existence_hook: None,
            aggregate_hook: None,
        }
    }

    /// Timestamp returned by `NOW()` for the whole execution
    pub fn now(&self) -> &DateTimeValue {
        &self.now
    }

    pub fn default_timezone(&self) -> TimezoneOffset {
        self.default_timezone
    }

    pub fn base_iri(&self) -> Option<&Iri<String>> {
        self.base_iri.as_ref()
    }

    pub fn type_hierarchy(&self) -> &dyn TypeHierarchy {
        self.transformer.hierarchy()
    }

    /// Transformer lifting raw RDF terms under this context's type hierarchy
    pub fn transformer(&self) -> &TermTransformer {
        &self.transformer
    }

    pub fn overload_cache(&self) -> Option<&OverloadCache> {
        self.overload_cache.as_deref()
    }

    pub fn blank_nodes(&self) -> &BlankNodeCounter {
        &self.blank_nodes
    }

    /// Restart blank node labelling; call once per query execution
    pub fn reset_blank_nodes(&self) {
        log::debug!("Resetting blank node counter");
        self.blank_nodes.reset();
    }

    pub fn extensions(&self) -> &ExtensionRegistry {
        &self.extensions
    }

    pub fn existence_hook(&self) -> Option<&Arc<dyn ExistenceHook>> {
        self.existence_hook.as_ref()
    }

    pub fn aggregate_hook(&self) -> Option<&Arc<dyn AggregateHook>> {
        self.aggregate_hook.as_ref()
    }
}

impl fmt::Debug for EvaluationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvaluationContext")
            .field("now", &self.now)
            .field("default_timezone", &self.default_timezone)
            .field("base_iri", &self.base_iri.as_ref().map(Iri::as_str))
            .field("type_hierarchy", &self.transformer.hierarchy())
            .field("overload_cache", &self.overload_cache.is_some())
            .field("extensions", &self.extensions)
            .field("existence_hook", &self.existence_hook.is_some())
            .field("aggregate_hook", &self.aggregate_hook.is_some())
            .finish_non_exhaustive()
    }
}

fn current_time() -> DateTimeValue {
    let now = Utc::now();
    let fraction = Decimal::new(i64::from(now.nanosecond() / 1_000_000), 3);
    DateTimeValue::from_naive(now.naive_utc(), fraction, Some(TimezoneOffset::UTC))
}

/// Builder for [`EvaluationContext`]
#[derive(Default)]
pub struct EvaluationContextBuilder {
    now: Option<DateTimeValue>,
    default_timezone_minutes: Option<i16>,
    base_iri: Option<String>,
    type_hierarchy: Option<Arc<dyn TypeHierarchy>>,
    overload_cache: Option<Option<Arc<OverloadCache>>>,
    extensions: ExtensionRegistry,
    existence_hook: Option<Arc<dyn ExistenceHook>>,
    aggregate_hook: Option<Arc<dyn AggregateHook>>,
}

impl EvaluationContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a loaded configuration
    pub fn from_config(config: &EvaluatorConfig) -> Self {
        let cache = config
            .overload_cache
            .then(|| Arc::new(OverloadCache::new(config.overload_cache_capacity)));
        Self {
            default_timezone_minutes: Some(config.default_timezone_minutes),
            base_iri: config.base_iri.clone(),
            overload_cache: Some(cache),
            ..Self::default()
        }
    }

    /// Fix the execution timestamp
    pub fn now(mut self, now: DateTimeValue) -> Self {
        self.now = Some(now);
        self
    }

    pub fn default_timezone(mut self, timezone: TimezoneOffset) -> Self {
        self.default_timezone_minutes = Some(timezone.minutes());
        self
    }

    pub fn base_iri(mut self, base_iri: impl Into<String>) -> Self {
        self.base_iri = Some(base_iri.into());
        self
    }

    pub fn type_hierarchy(mut self, hierarchy: Arc<dyn TypeHierarchy>) -> Self {
        self.type_hierarchy = Some(hierarchy);
        self
    }

    /// Share an overload cache between contexts
    pub fn overload_cache(mut self, cache: Arc<OverloadCache>) -> Self {
        self.overload_cache = Some(Some(cache));
        self
    }

    pub fn without_overload_cache(mut self) -> Self {
        self.overload_cache = Some(None);
        self
    }

    pub fn extensions(mut self, extensions: ExtensionRegistry) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn sync_extension<F>(mut self, iri: impl Into<String>, function: F) -> Self
    where
        F: Fn(&[Term]) -> EvalResult<Term> + Send + Sync + 'static,
    {
        self.extensions.register_sync(iri, function);
        self
    }

    pub fn async_extension(mut self, iri: impl Into<String>, function: Arc<dyn AsyncExtensionFunction>) -> Self {
        self.extensions.register_async(iri, function);
        self
    }

    pub fn existence_hook(mut self, hook: Arc<dyn ExistenceHook>) -> Self {
        self.existence_hook = Some(hook);
        self
    }

    pub fn aggregate_hook(mut self, hook: Arc<dyn AggregateHook>) -> Self {
        self.aggregate_hook = Some(hook);
        self
    }

    /// Validate the settings and build the context
    pub fn build(self) -> EvalResult<EvaluationContext> {
        let default_timezone = match self.default_timezone_minutes {
            Some(minutes) => TimezoneOffset::from_minutes(minutes).ok_or_else(|| {
                EvalError::configuration(format!("timezone offset of {minutes} minutes is out of range"))
            })?,
            None => TimezoneOffset::UTC,
        };
        let base_iri = self
            .base_iri
            .map(|base| Iri::parse(base.clone()).map_err(|error| EvalError::invalid_iri(base, error.to_string())))
            .transpose()?;
        let hierarchy = self
            .type_hierarchy
            .unwrap_or_else(|| Arc::new(XsdTypeHierarchy::new()));

        let mut context = EvaluationContext::with_parts(
            self.now.unwrap_or_else(current_time),
            default_timezone,
            base_iri,
            hierarchy,
        );
        if let Some(cache) = self.overload_cache {
            context.overload_cache = cache;
        }
        context.extensions = self.extensions;
        context.existence_hook = self.existence_hook;
        context.aggregate_hook = self.aggregate_hook;
        Ok(context)
    }
}
