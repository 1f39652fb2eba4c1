use futures::future::join_all;
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::Error;
use crate::serialization::{RoutingTable, RuleDescription};
use crate::traits::Handler;
use crate::Result;

/// Label used for the fallback route
pub const FALLBACK: &str = "fallback";

/// Types that can label a routing category.
///
/// Implemented automatically for anything cloneable, comparable, hashable and
/// printable, so a plain enum or a `String` works as a category.
pub trait Category: Clone + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static {}

impl<T> Category for T where T: Clone + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static
{}

/// The path a query was sent down
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route<C> {
    /// A rule matched and its category was selected
    Rule(C),
    /// No rule matched
    Fallback,
}

impl<C> Route<C> {
    /// The matched category, or `None` for the fallback route
    pub fn category(&self) -> Option<&C> {
        match self {
            Route::Rule(category) => Some(category),
            Route::Fallback => None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Route::Fallback)
    }
}

impl<C: fmt::Display> fmt::Display for Route<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Rule(category) => category.fmt(f),
            Route::Fallback => f.write_str(FALLBACK),
        }
    }
}

/// A keyword-triggered predicate mapping a query to a category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule<C> {
    category: C,
    keywords: Vec<String>,
}

impl<C: Category> Rule<C> {
    /// Create a rule. Keywords are case-folded; duplicates are dropped.
    pub fn new<I, K>(category: C, keywords: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for keyword in keywords {
            let keyword = keyword.into().to_lowercase();
            if !normalized.contains(&keyword) {
                normalized.push(keyword);
            }
        }

        Self {
            category,
            keywords: normalized,
        }
    }

    pub fn category(&self) -> &C {
        &self.category
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Whether any keyword occurs in the query, ignoring case
    pub fn matches(&self, query: &str) -> bool {
        self.matches_normalized(&query.to_lowercase())
    }

    fn matches_normalized(&self, normalized_query: &str) -> bool {
        self.keywords
            .iter()
            .any(|keyword| normalized_query.contains(keyword.as_str()))
    }

    fn validate(&self) -> Result<()> {
        if self.keywords.is_empty() {
            return Err(Error::Config(format!(
                "Rule for {} has no keywords",
                self.category
            )));
        }
        if self.keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(Error::Config(format!(
                "Rule for {} has an empty keyword, which would match every query",
                self.category
            )));
        }
        Ok(())
    }
}

/// The outcome of routing one query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingResult<C> {
    /// The route that was selected
    pub route: Route<C>,
    /// What the selected handler returned
    pub output: String,
}

/// A rule together with the handler it dispatches to
struct Binding<C> {
    rule: Rule<C>,
    handler: Arc<dyn Handler>,
}

/// A deterministic, rule-based intent router.
///
/// Rules are evaluated in the order they were configured; the first rule with
/// a keyword contained in the case-folded query wins. Queries matching no rule
/// go to the fallback handler. The configuration is immutable once built, so a
/// router can be shared across tasks behind an `Arc`.
///
/// # Examples
///
/// ```
/// use marquee::handlers::StaticHandler;
/// use marquee::router::{Route, RouterBuilder, Rule};
///
/// # fn main() -> marquee::Result<()> {
/// let router = RouterBuilder::new()
///     .with_rule(Rule::new("tickets", ["ticket", "showtime"]), StaticHandler::new("6 PM"))
///     .with_fallback(StaticHandler::new("Try asking about tickets."))
///     .build()?;
///
/// assert_eq!(router.classify("Any TICKETS left?"), Route::Rule("tickets"));
/// assert_eq!(router.classify(""), Route::Fallback);
/// # Ok(())
/// # }
/// ```
pub struct Router<C: Category> {
    bindings: Vec<Binding<C>>,
    fallback: Arc<dyn Handler>,
}

impl<C: Category> fmt::Debug for Router<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rules: Vec<&Rule<C>> = self.bindings.iter().map(|b| &b.rule).collect();
        f.debug_struct("Router").field("rules", &rules).finish()
    }
}

impl<C: Category> Router<C> {
    /// Build a router from rules in priority order and a fallback handler.
    ///
    /// Fails with [`Error::Config`] if there are no rules, a category appears
    /// twice, a rule has no usable keywords, or the fallback is missing.
    pub fn configure(
        bindings: Vec<(Rule<C>, Arc<dyn Handler>)>,
        fallback: Option<Arc<dyn Handler>>,
    ) -> Result<Self> {
        if bindings.is_empty() {
            return Err(Error::Config("Router needs at least one rule".to_string()));
        }

        let mut seen = HashSet::new();
        for (rule, _) in &bindings {
            rule.validate()?;
            if !seen.insert(rule.category.clone()) {
                return Err(Error::Config(format!(
                    "Category {} appears in more than one rule",
                    rule.category
                )));
            }
        }

        let fallback = fallback
            .ok_or_else(|| Error::Config("Router has no fallback handler".to_string()))?;

        info!(rules = bindings.len(), "configured intent router");

        Ok(Self {
            bindings: bindings
                .into_iter()
                .map(|(rule, handler)| Binding { rule, handler })
                .collect(),
            fallback,
        })
    }

    /// The rules in priority order
    pub fn rules(&self) -> impl Iterator<Item = &Rule<C>> {
        self.bindings.iter().map(|b| &b.rule)
    }

    /// Pick the route for a query without invoking any handler
    pub fn classify(&self, query: &str) -> Route<C> {
        match self.select(query) {
            Some(binding) => Route::Rule(binding.rule.category.clone()),
            None => Route::Fallback,
        }
    }

    fn select(&self, query: &str) -> Option<&Binding<C>> {
        let normalized = query.to_lowercase();
        self.bindings.iter().find(|b| b.rule.matches_normalized(&normalized))
    }

    /// Route a query and invoke exactly one handler with the original query.
    ///
    /// A failing handler surfaces as [`Error::Handler`] tagged with the route
    /// that was taken; it is never retried or replaced by the fallback.
    pub async fn route(&self, query: &str) -> Result<RoutingResult<C>> {
        let (route, handler) = match self.select(query) {
            Some(binding) => (
                Route::Rule(binding.rule.category.clone()),
                &binding.handler,
            ),
            None => (Route::Fallback, &self.fallback),
        };

        debug!(route = %route, "routing query");

        match handler.handle(query).await {
            Ok(output) => Ok(RoutingResult { route, output }),
            Err(e) => {
                warn!(route = %route, error = %e, "handler failed");
                Err(Error::Handler {
                    route: route.to_string(),
                    source: Box::new(e),
                })
            }
        }
    }

    /// Route several queries concurrently. Results are in input order.
    pub async fn route_all<I, Q>(&self, queries: I) -> Vec<Result<RoutingResult<C>>>
    where
        I: IntoIterator<Item = Q>,
        Q: AsRef<str>,
    {
        let queries: Vec<Q> = queries.into_iter().collect();
        join_all(queries.iter().map(|q| self.route(q.as_ref()))).await
    }

    /// Describe the routing table for auditing or visualization
    pub fn describe(&self) -> RoutingTable {
        RoutingTable {
            rules: self
                .bindings
                .iter()
                .enumerate()
                .map(|(priority, b)| RuleDescription {
                    priority,
                    route: b.rule.category.to_string(),
                    keywords: b.rule.keywords.clone(),
                })
                .collect(),
            fallback: FALLBACK.to_string(),
        }
    }
}

/// Builder for constructing a router using a fluent interface
pub struct RouterBuilder<C: Category> {
    bindings: Vec<(Rule<C>, Arc<dyn Handler>)>,
    fallback: Option<Arc<dyn Handler>>,
}

impl<C: Category> Default for RouterBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Category> RouterBuilder<C> {
    /// Create a new router builder
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
            fallback: None,
        }
    }

    /// Append a rule; rules added earlier take priority
    pub fn with_rule(self, rule: Rule<C>, handler: impl Handler + 'static) -> Self {
        self.with_shared_rule(rule, Arc::new(handler))
    }

    /// Append a rule whose handler is shared with other owners
    pub fn with_shared_rule(mut self, rule: Rule<C>, handler: Arc<dyn Handler>) -> Self {
        self.bindings.push((rule, handler));
        self
    }

    /// Set the handler used when no rule matches
    pub fn with_fallback(mut self, handler: impl Handler + 'static) -> Self {
        self.fallback = Some(Arc::new(handler));
        self
    }

    /// Build the router
    pub fn build(self) -> Result<Router<C>> {
        Router::configure(self.bindings, self.fallback)
    }
}
