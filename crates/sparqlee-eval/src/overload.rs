//! Overload resolution over argument type signatures
//!
//! Every function of the library is an [`OverloadTable`]: a list of rules
//! grouped by arity. A call is dispatched by computing, for each argument, the
//! ordered list of types it can stand in for (its own datatype, the datatype's
//! supertypes, wider numeric types, then the generic `literal` and `term`
//! kinds). A rule's cost is the sum of the positions of its parameter types in
//! those lists; the cheapest rule wins and ties go to the rule registered
//! first.

use crate::context::EvaluationContext;
use crate::error::{EvalError, EvalResult};
use log::trace;
use parking_lot::RwLock;
use smallvec::SmallVec;
use sparqlee_types::vocab::{rdf, xsd};
use sparqlee_types::{Literal, LiteralValue, NumericKind, Term, TypeHierarchy};
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// A parameter type in an overload signature
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArgumentType {
    /// Any term
    Term,
    /// Any literal with a valid lexical form
    Literal,
    NamedNode,
    BlankNode,
    Quad,
    /// A literal whose lexical form is invalid for its datatype
    NonLexical,
    /// A literal of the datatype or one of its subtypes
    Datatype(Cow<'static, str>),
}

impl ArgumentType {
    pub const STRING: Self = Self::Datatype(Cow::Borrowed(xsd::STRING));
    pub const LANG_STRING: Self = Self::Datatype(Cow::Borrowed(rdf::LANG_STRING));
    pub const BOOLEAN: Self = Self::Datatype(Cow::Borrowed(xsd::BOOLEAN));
    pub const INTEGER: Self = Self::Datatype(Cow::Borrowed(xsd::INTEGER));
    pub const DECIMAL: Self = Self::Datatype(Cow::Borrowed(xsd::DECIMAL));
    pub const FLOAT: Self = Self::Datatype(Cow::Borrowed(xsd::FLOAT));
    pub const DOUBLE: Self = Self::Datatype(Cow::Borrowed(xsd::DOUBLE));
    pub const DATE_TIME: Self = Self::Datatype(Cow::Borrowed(xsd::DATE_TIME));
    pub const DATE: Self = Self::Datatype(Cow::Borrowed(xsd::DATE));
    pub const TIME: Self = Self::Datatype(Cow::Borrowed(xsd::TIME));
    pub const DURATION: Self = Self::Datatype(Cow::Borrowed(xsd::DURATION));
    pub const DAY_TIME_DURATION: Self = Self::Datatype(Cow::Borrowed(xsd::DAY_TIME_DURATION));
    pub const YEAR_MONTH_DURATION: Self = Self::Datatype(Cow::Borrowed(xsd::YEAR_MONTH_DURATION));

    pub fn datatype(iri: impl Into<Cow<'static, str>>) -> Self {
        Self::Datatype(iri.into())
    }

    pub fn numeric(kind: NumericKind) -> Self {
        Self::Datatype(Cow::Borrowed(kind.datatype()))
    }

    /// The numeric kind this parameter requires, if any
    fn numeric_kind(&self) -> Option<NumericKind> {
        match self {
            Self::Datatype(iri) => NumericKind::from_datatype(iri),
            _ => None,
        }
    }
}

impl fmt::Display for ArgumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Term => write!(f, "term"),
            Self::Literal => write!(f, "literal"),
            Self::NamedNode => write!(f, "namedNode"),
            Self::BlankNode => write!(f, "blankNode"),
            Self::Quad => write!(f, "quad"),
            Self::NonLexical => write!(f, "nonlexical"),
            Self::Datatype(iri) => write!(f, "<{iri}>"),
        }
    }
}

/// Parameter types of one overload
pub type Signature = SmallVec<[ArgumentType; 3]>;

/// Implementation of one overload
pub type Implementation = Arc<dyn Fn(&[Term], &EvaluationContext) -> EvalResult<Term> + Send + Sync>;

/// One entry of an overload table
#[derive(Clone)]
pub struct OverloadRule {
    signature: Signature,
    implementation: Implementation,
}

impl OverloadRule {
    pub fn new(signature: Signature, implementation: Implementation) -> Self {
        Self {
            signature,
            implementation,
        }
    }

    pub fn signature(&self) -> &[ArgumentType] {
        &self.signature
    }

    pub fn implementation(&self) -> &Implementation {
        &self.implementation
    }

    /// Total cost of binding `candidates` to this rule, `None` if some
    /// argument cannot stand in for its parameter
    fn cost(&self, candidates: &[Candidates]) -> Option<usize> {
        self.signature
            .iter()
            .zip(candidates)
            .map(|(parameter, options)| options.iter().position(|option| option == parameter))
            .sum()
    }

    /// Run the implementation after promoting numeric arguments to the
    /// parameter types
    pub fn apply(&self, args: &[Term], ctx: &EvaluationContext) -> EvalResult<Term> {
        let args = self.promote(args);
        (self.implementation)(&args, ctx)
    }

    fn promote<'a>(&self, args: &'a [Term]) -> Cow<'a, [Term]> {
        let needs_promotion = |(parameter, arg): (&ArgumentType, &Term)| {
            match (parameter.numeric_kind(), arg.as_literal().and_then(Literal::numeric_kind)) {
                (Some(target), Some(actual)) => target != actual,
                _ => false,
            }
        };
        if !self.signature.iter().zip(args).any(needs_promotion) {
            return Cow::Borrowed(args);
        }
        Cow::Owned(
            self.signature
                .iter()
                .zip(args)
                .map(|(parameter, arg)| {
                    let target = parameter.numeric_kind();
                    match (target, arg.as_literal().and_then(Literal::as_numeric)) {
                        (Some(kind), Some(value)) if value.kind() != kind => {
                            Term::Literal(Literal::from_numeric(value.promote(kind)))
                        }
                        _ => arg.clone(),
                    }
                })
                .collect(),
        )
    }
}

impl fmt::Debug for OverloadRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverloadRule")
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// Types an argument can be bound as, cheapest first
pub type Candidates = SmallVec<[ArgumentType; 8]>;

pub fn argument_candidates(term: &Term, hierarchy: &dyn TypeHierarchy) -> Candidates {
    let mut candidates = Candidates::new();
    match term {
        Term::NamedNode(_) => candidates.push(ArgumentType::NamedNode),
        Term::BlankNode(_) => candidates.push(ArgumentType::BlankNode),
        Term::Quad(_) => candidates.push(ArgumentType::Quad),
        Term::Literal(literal) if literal.is_non_lexical() => candidates.push(ArgumentType::NonLexical),
        Term::Literal(literal) => {
            candidates.push(ArgumentType::datatype(literal.datatype.clone()));
            for ancestor in hierarchy.ancestors(&literal.datatype) {
                candidates.push(ArgumentType::datatype(ancestor));
            }
            if let Some(kind) = literal.numeric_kind() {
                for wider in kind.promotions() {
                    let promoted = ArgumentType::numeric(*wider);
                    if !candidates.contains(&promoted) {
                        candidates.push(promoted);
                    }
                }
            }
            candidates.push(ArgumentType::Literal);
        }
    }
    candidates.push(ArgumentType::Term);
    candidates
}

static NEXT_TABLE_ID: AtomicU64 = AtomicU64::new(0);

type CacheKey = (u64, SmallVec<[Candidates; 3]>);

/// Memoized resolution results keyed by table identity and the full
/// candidate list of every argument
///
/// Rule cost depends only on the candidates, so the key stays valid across
/// contexts sharing one cache with different type hierarchies.
#[derive(Debug)]
pub struct OverloadCache {
    entries: RwLock<HashMap<CacheKey, Option<usize>>>,
    capacity: usize,
}

impl Default for OverloadCache {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_OVERLOAD_CACHE_CAPACITY)
    }
}

impl OverloadCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            capacity,
        }
    }

    /// `Some(None)` records a known failed resolution
    pub fn get(&self, table: u64, candidates: &[Candidates]) -> Option<Option<usize>> {
        let key = (table, candidates.iter().cloned().collect());
        self.entries.read().get(&key).copied()
    }

    /// Store a result; ignored once the cache is full
    pub fn insert(&self, table: u64, candidates: &[Candidates], rule: Option<usize>) {
        let mut entries = self.entries.write();
        if entries.len() < self.capacity {
            entries.insert((table, candidates.iter().cloned().collect()), rule);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

/// All overloads of one function
#[derive(Clone)]
pub struct OverloadTable {
    id: u64,
    name: &'static str,
    rules: BTreeMap<usize, Vec<OverloadRule>>,
}

impl OverloadTable {
    pub fn new(name: &'static str, rules: Vec<OverloadRule>) -> Self {
        let mut by_arity: BTreeMap<usize, Vec<OverloadRule>> = BTreeMap::new();
        for rule in rules {
            by_arity.entry(rule.signature.len()).or_default().push(rule);
        }
        Self {
            id: NEXT_TABLE_ID.fetch_add(1, Ordering::Relaxed),
            name,
            rules: by_arity,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Process-unique identity, shared by clones
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Registered rules taking `arity` arguments, in registration order
    pub fn rules(&self, arity: usize) -> &[OverloadRule] {
        self.rules.get(&arity).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn arities(&self) -> impl Iterator<Item = usize> + '_ {
        self.rules.keys().copied()
    }

    /// Select the rule for `args`
    pub fn resolve(&self, args: &[Term], ctx: &EvaluationContext) -> EvalResult<&OverloadRule> {
        let rules = self.rules(args.len());
        let hierarchy = ctx.type_hierarchy();
        let candidates: SmallVec<[Candidates; 3]> =
            args.iter().map(|arg| argument_candidates(arg, hierarchy)).collect();
        let key: Signature = candidates
            .iter()
            .filter_map(|options| options.first().cloned())
            .collect();

        if let Some(cache) = ctx.overload_cache() {
            match cache.get(self.id, &candidates) {
                Some(Some(index)) => {
                    if let Some(rule) = rules.get(index) {
                        trace!("Overload cache hit for {} {:?}", self.name, key);
                        return Ok(rule);
                    }
                }
                Some(None) => return Err(self.no_match(args)),
                None => {}
            }
        }

        let best = rules
            .iter()
            .enumerate()
            .filter_map(|(index, rule)| rule.cost(&candidates).map(|cost| (cost, index)))
            .min()
            .map(|(_, index)| index);
        trace!("Resolved {} {:?} to rule {:?}", self.name, key, best);

        if let Some(cache) = ctx.overload_cache() {
            cache.insert(self.id, &candidates, best);
        }
        best.and_then(|index| rules.get(index))
            .ok_or_else(|| self.no_match(args))
    }

    /// Resolve and run
    pub fn apply(&self, args: &[Term], ctx: &EvaluationContext) -> EvalResult<Term> {
        self.resolve(args, ctx)?.apply(args, ctx)
    }

    fn no_match(&self, args: &[Term]) -> EvalError {
        let non_lexical = args.iter().find_map(|arg| match arg {
            Term::Literal(literal @ Literal { value: LiteralValue::NonLexical(_), .. }) => Some(literal),
            _ => None,
        });
        match non_lexical {
            Some(literal) => EvalError::InvalidLexicalForm {
                lexical: literal.str(),
                datatype: literal.datatype.clone(),
            },
            None => EvalError::argument_type(self.name, args),
        }
    }
}

impl fmt::Debug for OverloadTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverloadTable")
            .field("name", &self.name)
            .field("rules", &self.rules.values().flatten().collect::<Vec<_>>())
            .finish()
    }
}
