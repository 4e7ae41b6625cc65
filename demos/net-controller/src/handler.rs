use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use observatory::ObservatoryError;
use tracing::{debug, info};

use crate::{NetController, NetworkObserver};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtoKind {
    Config,
    Action,
    Data,
}

impl std::fmt::Display for ProtoKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProtoKind::Config => write!(f, "ConfigProtoHandler"),
            ProtoKind::Action => write!(f, "ActionProtoHandler"),
            ProtoKind::Data => write!(f, "DataProtoHandler"),
        }
    }
}

/// How many times each callback has fired
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Counts {
    pub updated: usize,
    pub messages: usize,
    pub about_to_be_destroyed: usize,
    pub destroyed: usize,
}

/// A protocol handler observing a [`NetController`]
pub struct ProtoHandler {
    kind: ProtoKind,
    // only used to deregister; cleared once the controller announces its teardown
    controller: RefCell<Weak<NetController>>,
    counts: Cell<Counts>,
}

impl ProtoHandler {
    /// Creates a handler and registers it with `controller`
    pub fn attach(controller: &Rc<NetController>, kind: ProtoKind) -> Result<Rc<Self>, ObservatoryError> {
        let handler = Rc::new(Self { kind, controller: RefCell::new(Rc::downgrade(controller)), counts: Cell::default() });
        let id = controller.add_observer(Rc::downgrade(&handler) as Weak<dyn NetworkObserver>)?;
        debug!(handler = %kind, %id, "attached");
        Ok(handler)
    }

    pub fn kind(&self) -> ProtoKind { self.kind }

    pub fn counts(&self) -> Counts { self.counts.get() }

    /// Whether the handler still holds a live back-reference to its controller
    pub fn is_attached(&self) -> bool { self.controller.borrow().strong_count() > 0 }

    fn bump(&self, f: impl FnOnce(&mut Counts)) {
        let mut counts = self.counts.get();
        f(&mut counts);
        self.counts.set(counts);
    }
}

impl NetworkObserver for ProtoHandler {
    fn on_updated(&self) {
        self.bump(|c| c.updated += 1);
        info!(handler = %self.kind, "updated");
    }

    fn on_message_received(&self, kind: u32) {
        self.bump(|c| c.messages += 1);
        info!(handler = %self.kind, kind, "message received");
    }

    fn on_net_controller_about_to_be_destroyed(&self) {
        self.bump(|c| c.about_to_be_destroyed += 1);
        let controller = std::mem::take(&mut *self.controller.borrow_mut());
        match controller.upgrade() {
            Some(controller) => {
                controller.remove_observer(self);
            }
            // the controller is being dropped without an explicit shutdown
            None => debug!(handler = %self.kind, "controller already dropping, nothing to deregister from"),
        }
        info!(handler = %self.kind, "handling net controller about to be destroyed");
    }

    fn on_net_controller_destroyed(&self) {
        self.bump(|c| c.destroyed += 1);
        info!(handler = %self.kind, "handling net controller being destroyed");
    }
}
