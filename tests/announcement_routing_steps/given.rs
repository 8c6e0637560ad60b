//! Given steps for announcement routing scenarios.

use super::world::DiscoveryWorld;
use eyre::WrapErr;
use herald::announcement::adapters::RecordingListener;
use rstest_bdd_macros::given;
use std::sync::Arc;

#[given("a fresh discovery hub")]
fn fresh_hub(world: &mut DiscoveryWorld) {
    world.reset();
}

#[given(r#"the service "{name}" has announced capabilities "{first}" and "{second}""#)]
fn service_has_announced(
    world: &mut DiscoveryWorld,
    name: String,
    first: String,
    second: String,
) -> Result<(), eyre::Report> {
    world
        .hub
        .bus()
        .announce(name, [first, second])
        .wrap_err("announce service")?;
    Ok(())
}

#[given("{count:usize} recording listeners")]
fn recording_listeners(world: &mut DiscoveryWorld, count: usize) -> Result<(), eyre::Report> {
    for _ in 0..count {
        let listener = RecordingListener::new();
        world
            .hub
            .bus()
            .add_listener(Arc::new(listener.clone()))
            .wrap_err("register listener")?;
        world.listeners.push(listener);
    }
    Ok(())
}

#[given(r#"the capability "{name}" provides "{value}""#)]
fn capability_provides(
    world: &mut DiscoveryWorld,
    name: String,
    value: String,
) -> Result<(), eyre::Report> {
    world
        .hub
        .capabilities()
        .register_factory(name, move || Ok(value.clone()))
        .wrap_err("register capability")?;
    Ok(())
}
