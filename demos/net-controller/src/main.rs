use anyhow::Result;
use net_controller::{NetController, ProtoHandler, ProtoKind, config};

fn main() -> Result<()> {
    // initialize tracing
    tracing_subscriber::fmt().with_max_level(config::log_level()?).init();

    let controller = NetController::new();
    let _data = ProtoHandler::attach(&controller, ProtoKind::Data)?;
    let _action = ProtoHandler::attach(&controller, ProtoKind::Action)?;
    let _config = ProtoHandler::attach(&controller, ProtoKind::Config)?;

    controller.receive_message(0);
    controller.update();
    controller.shutdown();

    // handlers outlive the controller; they deregistered during shutdown
    drop(controller);
    Ok(())
}
