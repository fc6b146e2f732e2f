use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crashguard::directory::{
    FileStore, InMemoryStore, KeyValueStore, NewContact, StoreError, UserDirectory,
};
use crashguard::kernel::event::{Event, UserCommand};
use crashguard::kernel::time::SystemClock;
use crashguard::outputs::{LogNavigator, LogNotifier, LogSiren};
use crashguard::sensors::hub::LoopbackHub;
use crashguard::sensors::raw::{RawGeo, RawMotion, RawOrientation, SensorReading};
use crashguard::{Collaborators, Driver, GuardConfig, Reactor};

/// Console line -> what to do with it.
enum ConsoleInput {
    Reading(SensorReading),
    Command(UserCommand),
}

fn parse_line(line: &str) -> Option<ConsoleInput> {
    let mut words = line.split_whitespace();
    let head = words.next()?.to_ascii_lowercase();
    let nums: Vec<f64> = words.filter_map(|w| w.parse().ok()).collect();

    let reading = match (head.as_str(), nums.as_slice()) {
        ("motion", [x, y, z]) => SensorReading::Motion(RawMotion::axes(*x, *y, *z)),
        ("orient", [a, b, g]) => SensorReading::Orientation(RawOrientation {
            alpha: Some(*a),
            beta: Some(*b),
            gamma: Some(*g),
        }),
        ("geo", [lat, long]) => SensorReading::Geo(RawGeo {
            latitude: *lat,
            longitude: *long,
            speed_mps: None,
        }),
        ("geo", [lat, long, speed]) => SensorReading::Geo(RawGeo {
            latitude: *lat,
            longitude: *long,
            speed_mps: Some(*speed),
        }),
        (word, []) => return UserCommand::parse(word).map(ConsoleInput::Command),
        _ => return None,
    };
    Some(ConsoleInput::Reading(reading))
}

/// `profile <name> <phone>`, `contact <name> <phone> [sos]`, `forget <id>`.
/// Returns `None` when the line is not a directory edit.
fn edit_directory(directory: &mut UserDirectory, line: &str) -> Option<Result<(), StoreError>> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let outcome = match words.as_slice() {
        ["profile", name, phone] => {
            let mut profile = directory.profile().clone();
            profile.name = name.to_string();
            profile.phone = phone.to_string();
            directory.update_profile(profile)
        }
        ["contact", name, phone, rest @ ..] => directory
            .add_contact(NewContact {
                name: name.to_string(),
                phone: phone.to_string(),
                is_emergency: rest.first() == Some(&"sos"),
            })
            .map(|id| tracing::info!(%id, "contact added")),
        ["forget", id] => directory.remove_contact(id).map(|removed| {
            if !removed {
                tracing::warn!(%id, "no such contact");
            }
        }),
        _ => return None,
    };
    Some(outcome)
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let config = GuardConfig::from_env()?;
    tracing::info!(?config, "crashguard starting");

    let store: Box<dyn KeyValueStore> = match &config.store_dir {
        Some(dir) => Box::new(FileStore::new(dir.clone())),
        None => Box::new(InMemoryStore::new()),
    };
    let mut directory = UserDirectory::open(store, &config.namespace)?;

    let hub = LoopbackHub::new();
    let reactor = Reactor::new(&config, Arc::new(SystemClock::new()))
        .with_directory(directory.snapshot());
    let collab = Collaborators {
        navigator: Box::new(LogNavigator),
        notifier: Box::new(LogNotifier),
        siren: Box::new(LogSiren::default()),
        sensors: Box::new(hub.clone()),
    };
    let driver = Driver::new(reactor, collab, &config);
    let tx = driver.sender();
    let shutdown = driver.shutdown_token();

    tx.send(Event::Command(UserCommand::StartMonitoring)).await?;

    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        println!("sensors: motion x y z | orient a b g | geo lat long [mps]");
        println!("commands: start stop safe sos abort off on reset | quit");
        println!("directory: profile <name> <phone> | contact <name> <phone> [sos] | forget <id>");

        while let Ok(Some(line)) = lines.next_line().await {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if line.eq_ignore_ascii_case("quit") {
                break;
            }
            match edit_directory(&mut directory, line) {
                Some(Ok(())) => {
                    if tx.send(Event::DirectoryChanged(directory.snapshot())).await.is_err() {
                        break;
                    }
                    continue;
                }
                Some(Err(e)) => {
                    tracing::error!("directory update failed: {}", e);
                    continue;
                }
                None => {}
            }
            match parse_line(line) {
                Some(ConsoleInput::Reading(reading)) => {
                    if !hub.feed(reading) {
                        tracing::info!("no live subscription for that sensor, reading dropped");
                    }
                }
                Some(ConsoleInput::Command(cmd)) => {
                    if let Err(e) = tx.send(Event::Command(cmd)).await {
                        tracing::error!("failed to queue command: {}", e);
                        break;
                    }
                }
                None => tracing::warn!("unrecognised input: '{}'", line),
            }
        }
        shutdown.cancel();
    });

    let reactor = driver.run().await;
    let snapshot = reactor.journal.snapshot();
    tracing::info!(?snapshot, "session summary");
    Ok(())
}
