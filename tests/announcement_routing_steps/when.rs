//! When steps for announcement routing scenarios.

use super::world::DiscoveryWorld;
use eyre::WrapErr;
use rstest_bdd_macros::when;

#[when(r#"the request "{request}" is routed"#)]
fn route_request(world: &mut DiscoveryWorld, request: String) -> Result<(), eyre::Report> {
    let outcome = world
        .hub
        .router()
        .route_to_service(&request)
        .wrap_err("route request")?;
    world.last_outcome = Some(outcome);
    Ok(())
}

#[when(r#"the service "{name}" announces the capability "{capability}""#)]
fn service_announces(
    world: &mut DiscoveryWorld,
    name: String,
    capability: String,
) -> Result<(), eyre::Report> {
    world
        .hub
        .bus()
        .announce(name, [capability])
        .wrap_err("announce service")?;
    Ok(())
}

#[when(r#"the service "{name}" announces no capabilities"#)]
fn service_announces_nothing(world: &mut DiscoveryWorld, name: String) -> Result<(), eyre::Report> {
    world
        .hub
        .bus()
        .announce_with_examples(name, Vec::<String>::new(), Vec::<String>::new())
        .wrap_err("announce empty service")?;
    Ok(())
}
