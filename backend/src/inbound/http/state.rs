//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on driving ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    DocumentCommand, DocumentQuery, FixtureDocumentCommand, FixtureDocumentQuery,
    FixturePlanService, PlanCommand, PlanQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Upload, lock, unlock, visibility and delete.
    pub documents: Arc<dyn DocumentCommand>,
    /// Owner listings and public views.
    pub documents_query: Arc<dyn DocumentQuery>,
    /// Plan changes.
    pub plans: Arc<dyn PlanCommand>,
    /// Catalog and current plan.
    pub plans_query: Arc<dyn PlanQuery>,
}

impl HttpState {
    /// Construct state from explicit port implementations.
    pub fn new(
        documents: Arc<dyn DocumentCommand>,
        documents_query: Arc<dyn DocumentQuery>,
        plans: Arc<dyn PlanCommand>,
        plans_query: Arc<dyn PlanQuery>,
    ) -> Self {
        Self {
            documents,
            documents_query,
            plans,
            plans_query,
        }
    }

    /// Build state from one service implementing both document ports and
    /// one implementing both plan ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use flipbook_backend::domain::ports::{FixtureDocumentQuery, FixturePlanService};
    /// use flipbook_backend::inbound::http::state::HttpState;
    ///
    /// let plans = Arc::new(FixturePlanService);
    /// let state = HttpState::from_services(
    ///     Arc::new(flipbook_backend::domain::ports::FixtureDocumentCommand),
    ///     Arc::new(FixtureDocumentQuery),
    ///     plans,
    /// );
    /// assert_eq!(state.plans_query.catalog().len(), 5);
    /// ```
    pub fn from_services<C, Q, P>(documents: Arc<C>, documents_query: Arc<Q>, plans: Arc<P>) -> Self
    where
        C: DocumentCommand + 'static,
        Q: DocumentQuery + 'static,
        P: PlanCommand + PlanQuery + 'static,
    {
        let plans_query: Arc<dyn PlanQuery> = plans.clone();
        Self::new(documents, documents_query, plans, plans_query)
    }
}

impl Default for HttpState {
    fn default() -> Self {
        Self::from_services(
            Arc::new(FixtureDocumentCommand),
            Arc::new(FixtureDocumentQuery),
            Arc::new(FixturePlanService),
        )
    }
}
