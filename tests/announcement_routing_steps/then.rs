//! Then steps for announcement routing scenarios.

use super::world::{DiscoveryWorld, run_async};
use eyre::{WrapErr, eyre};
use herald::routing::domain::RouteOutcome;
use rstest_bdd_macros::then;
use std::time::Duration;

const LISTENER_TIMEOUT: Duration = Duration::from_secs(5);

fn last_outcome(world: &DiscoveryWorld) -> Result<&RouteOutcome, eyre::Report> {
    world
        .last_outcome
        .as_ref()
        .ok_or_else(|| eyre!("no request has been routed"))
}

#[then(r#"the request is routed to "{name}""#)]
fn routed_to(world: &DiscoveryWorld, name: String) -> Result<(), eyre::Report> {
    let outcome = last_outcome(world)?;
    match outcome.routed_to() {
        Some(service) if service.as_str() == name => Ok(()),
        other => Err(eyre!("expected routing to {name}, got {other:?}")),
    }
}

#[then("the request is not routed")]
fn not_routed(world: &DiscoveryWorld) -> Result<(), eyre::Report> {
    let outcome = last_outcome(world)?;
    if outcome.success() {
        return Err(eyre!("expected no route, got {outcome:?}"));
    }
    Ok(())
}

#[then(r#"the suggestion is "{expected}""#)]
fn suggestion_is(world: &DiscoveryWorld, expected: String) -> Result<(), eyre::Report> {
    match last_outcome(world)? {
        RouteOutcome::Unmatched { suggestion, .. } if *suggestion == expected => Ok(()),
        other => Err(eyre!("expected suggestion '{expected}', got {other:?}")),
    }
}

#[then(r#"every recording listener eventually hears "{name}""#)]
fn listeners_hear(world: &DiscoveryWorld, name: String) -> Result<(), eyre::Report> {
    for listener in &world.listeners {
        if !run_async(listener.wait_for(1, LISTENER_TIMEOUT)) {
            return Err(eyre!("listener did not hear an announcement in time"));
        }
        if listener.service_names() != vec![name.clone()] {
            return Err(eyre!(
                "listener heard {:?}, expected [{name}]",
                listener.service_names()
            ));
        }
    }
    Ok(())
}

#[then(r#"the announcement history mentions "{text}""#)]
fn history_mentions(world: &DiscoveryWorld, text: String) -> Result<(), eyre::Report> {
    let rendered = world
        .hub
        .bus()
        .announcements_for_llm()
        .wrap_err("render history")?;
    if rendered.contains(&text) {
        Ok(())
    } else {
        Err(eyre!("history did not mention '{text}':\n{rendered}"))
    }
}

#[then(r#"discovering "{name}" yields "{expected}""#)]
fn discovering_yields(
    world: &DiscoveryWorld,
    name: String,
    expected: String,
) -> Result<(), eyre::Report> {
    let found = world
        .hub
        .capabilities()
        .discover::<String>(&name)
        .wrap_err("discover capability")?
        .ok_or_else(|| eyre!("capability {name} not found"))?;
    if *found == expected {
        Ok(())
    } else {
        Err(eyre!("expected {expected}, got {found}"))
    }
}

#[then(r#"discovering "{name}" yields nothing"#)]
fn discovering_yields_nothing(world: &DiscoveryWorld, name: String) -> Result<(), eyre::Report> {
    let found = world
        .hub
        .capabilities()
        .discover_capability(&name)
        .wrap_err("discover capability")?;
    if found.is_some() {
        return Err(eyre!("capability {name} unexpectedly present"));
    }
    Ok(())
}
