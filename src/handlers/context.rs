//! State shared by the command handlers for one terminal session

use std::collections::HashMap;
use std::sync::Arc;
use crate::config::PurchaseConfig;
use crate::services::ServiceFactory;
use crate::workflows::{Confirmer, WaitlistWorkflow};

pub struct AppContext {
    pub services: ServiceFactory,
    pub purchase: PurchaseConfig,
    pub confirmer: Arc<dyn Confirmer>,
    /// One waitlist view per event page; replaced when the page is reopened
    waitlist_views: HashMap<i64, WaitlistWorkflow>,
}

impl AppContext {
    pub fn new(services: ServiceFactory, purchase: PurchaseConfig, confirmer: Arc<dyn Confirmer>) -> Self {
        Self {
            services,
            purchase,
            confirmer,
            waitlist_views: HashMap::new(),
        }
    }

    /// Opening an event page starts a fresh waitlist view
    pub fn reset_waitlist_view(&mut self, event_id: i64) {
        self.waitlist_views
            .insert(event_id, WaitlistWorkflow::new(self.services.clone()));
    }

    pub fn waitlist_view(&mut self, event_id: i64) -> &mut WaitlistWorkflow {
        let services = self.services.clone();
        self.waitlist_views
            .entry(event_id)
            .or_insert_with(|| WaitlistWorkflow::new(services))
    }

    /// Waitlist actions that are not tied to an event page
    pub fn waitlist_actions(&self) -> WaitlistWorkflow {
        WaitlistWorkflow::new(self.services.clone())
    }
}
