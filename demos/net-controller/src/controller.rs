use std::rc::{Rc, Weak};

use observatory::{Lifecycle, Observatory, ObservatoryError, ObserverId};
use tracing::debug;

/// Everything a [`NetController`] tells its observers
pub trait NetworkObserver {
    /// Controller data has been updated
    fn on_updated(&self);

    /// A message of the given type has been received
    fn on_message_received(&self, kind: u32);

    /// The controller is about to be destroyed. Clean up anything that refers to it, and
    /// deregister if you intend to outlive it.
    fn on_net_controller_about_to_be_destroyed(&self);

    /// The controller has been destroyed. Only observers that did not deregister hear this.
    fn on_net_controller_destroyed(&self);
}

/// The subject. Always handled through an `Rc` so that observers can hold a `Weak` back-reference.
#[derive(Debug, Default)]
pub struct NetController {
    observers: Observatory<dyn NetworkObserver>,
}

impl NetController {
    pub fn new() -> Rc<Self> { Rc::new(Self::default()) }

    pub fn add_observer(&self, observer: Weak<dyn NetworkObserver>) -> Result<ObserverId, ObservatoryError> {
        self.observers.add_observer(observer)
    }

    pub fn remove_observer(&self, observer: &(dyn NetworkObserver + 'static)) -> bool { self.observers.remove_observer(observer) }

    pub fn observers(&self) -> &Observatory<dyn NetworkObserver> { &self.observers }

    pub fn update(&self) {
        debug!("net controller data updated");
        self.observers.notify(|o| o.on_updated());
    }

    pub fn receive_message(&self, kind: u32) {
        debug!(kind, "net controller message received");
        self.observers.notify(|o| o.on_message_received(kind));
    }

    /// Tells observers the controller is about to go away. Does nothing if teardown already began.
    pub fn shutdown(&self) {
        if self.observers.lifecycle() != Lifecycle::Live {
            return;
        }
        debug!("net controller about to be destroyed");
        self.observers.begin_teardown(|o| o.on_net_controller_about_to_be_destroyed());
    }
}

impl Drop for NetController {
    fn drop(&mut self) {
        // observers must always see both phases, even if nobody called shutdown
        self.shutdown();
        debug!("net controller destroyed");
        self.observers.finish_teardown(|o| o.on_net_controller_destroyed());
    }
}
