//=========================================================================
// Lifecycle Ledger
//=========================================================================
//
// Records which subsystems were created, in which order, and which were
// started. Teardown order is derived from it: exact reverse of creation.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;

use log::debug;

//=== Internal Dependencies ===============================================

use super::SubsystemId;
use crate::error::SubsystemError;

//=== LifecycleLedger =====================================================

/// Creation-order record for process-scoped subsystems.
#[derive(Debug, Default)]
pub struct LifecycleLedger {
    created: Vec<SubsystemId>,
    started: HashSet<SubsystemId>,
}

impl LifecycleLedger {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Recording --------------------------------------------------------

    /// Checks that every dependency of `id` exists before it is created.
    pub fn check_create(&self, id: SubsystemId) -> Result<(), SubsystemError> {
        match id
            .dependencies()
            .iter()
            .find(|dependency| !self.is_created(**dependency))
        {
            Some(missing) => Err(SubsystemError::OutOfOrder {
                id,
                missing: *missing,
            }),
            None => Ok(()),
        }
    }

    /// Records a completed `create()`. A second record of the same id is a no-op.
    pub fn record_created(&mut self, id: SubsystemId) {
        if self.is_created(id) {
            debug!(target: "lifecycle", "{id} already created");
            return;
        }
        debug!(target: "lifecycle", "{id} created");
        self.created.push(id);
    }

    pub fn check_startup(&self, id: SubsystemId) -> Result<(), SubsystemError> {
        if self.is_created(id) {
            Ok(())
        } else {
            Err(SubsystemError::NotCreated(id))
        }
    }

    pub fn record_started(&mut self, id: SubsystemId) {
        debug!(target: "lifecycle", "{id} started");
        self.started.insert(id);
    }

    //--- Queries ----------------------------------------------------------

    pub fn is_created(&self, id: SubsystemId) -> bool {
        self.created.contains(&id)
    }

    pub fn is_started(&self, id: SubsystemId) -> bool {
        self.started.contains(&id)
    }

    pub fn created(&self) -> &[SubsystemId] {
        &self.created
    }

    //--- Teardown ---------------------------------------------------------

    /// Empties the ledger and returns the teardown order.
    pub fn drain_teardown_order(&mut self) -> Vec<SubsystemId> {
        self.started.clear();
        let mut order = std::mem::take(&mut self.created);
        order.reverse();
        order
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
