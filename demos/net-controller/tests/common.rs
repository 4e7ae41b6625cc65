use net_controller::{NetController, ProtoHandler, ProtoKind};
use std::rc::Rc;

// Initialize tracing for tests
#[ctor::ctor]
fn init_tracing() {
    let level = net_controller::config::log_level().unwrap_or(tracing::Level::INFO);
    let _ = tracing_subscriber::fmt().with_max_level(level).with_test_writer().try_init();
}

/// A controller with the Data, Action and Config handlers attached, in that order
#[allow(unused)]
pub fn controller_with_handlers() -> (Rc<NetController>, [Rc<ProtoHandler>; 3]) {
    let controller = NetController::new();
    let handlers = [ProtoKind::Data, ProtoKind::Action, ProtoKind::Config]
        .map(|kind| ProtoHandler::attach(&controller, kind).expect("fresh handler registers"));
    (controller, handlers)
}
