use std::fmt;

use anyhow::{Context, Result};
use inquire::{Confirm, CustomType, InquireError, Select, Text};
use sundash_core::{
    Config, Coordinates, Dashboard, GeocodeClient, LocatorId, Place, SunDashboard,
    provider::{build_http_client, geocode::MapsCoGeocoder},
};

use crate::cli::today;

#[derive(Debug, Clone, Copy)]
enum Action {
    CurrentLocation,
    Search,
    Quit,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::CurrentLocation => "Use current location",
            Action::Search => "Search a location",
            Action::Quit => "Quit",
        })
    }
}

/// Keep prompting until the user quits or presses Esc / Ctrl-C.
pub async fn run_loop(config: &Config) -> Result<()> {
    let dashboard = SunDashboard::from_config(config, None)?;
    let board = Dashboard::new();

    loop {
        let options = vec![Action::CurrentLocation, Action::Search, Action::Quit];
        let Some(action) =
            cancellable(Select::new("What would you like to do?", options).prompt())?
        else {
            break;
        };

        let (run, outcome) = match action {
            Action::Quit => break,
            Action::CurrentLocation => {
                let run = board.begin();
                (run, dashboard.run_current_location(today(None)).await)
            }
            Action::Search => {
                let Some(query) = cancellable(Text::new("Location:").prompt())? else {
                    continue;
                };
                let run = board.begin();
                (run, dashboard.run_search(&query, today(None)).await)
            }
        };

        if let Some(alert) = board.present_outcome(run, &outcome) {
            // Blocking acknowledgement; the previous dashboard stays as it was.
            cancellable(
                Confirm::new(&alert)
                    .with_default(true)
                    .with_help_message("press Enter to continue")
                    .prompt(),
            )?;
            continue;
        }

        println!();
        print!("{}", board.screen().text());
        println!();
    }

    Ok(())
}

/// Interactive setup of the geocoding key, home location and default locator.
pub async fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let current_key = config.geocode.api_key.clone().unwrap_or_default();
    let key = Text::new("Geocoding API key (leave empty for none):")
        .with_default(&current_key)
        .prompt()?;
    config.set_geocode_api_key(Some(key));

    configure_home(&mut config).await?;

    let locators = LocatorId::all().to_vec();
    let start = locators
        .iter()
        .position(|id| Some(*id) == config.default_locator_id().ok())
        .unwrap_or(0);
    let locator = Select::new("Default locator for `sundash here`:", locators)
        .with_starting_cursor(start)
        .prompt()?;
    config.set_default_locator(locator);

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

#[derive(Debug, Clone, Copy)]
enum HomeChoice {
    Keep,
    Search,
    Coordinates,
    Clear,
}

impl fmt::Display for HomeChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HomeChoice::Keep => "Keep current home location",
            HomeChoice::Search => "Search by name",
            HomeChoice::Coordinates => "Enter coordinates",
            HomeChoice::Clear => "Clear home location",
        })
    }
}

async fn configure_home(config: &mut Config) -> Result<()> {
    let choices =
        vec![HomeChoice::Keep, HomeChoice::Search, HomeChoice::Coordinates, HomeChoice::Clear];

    match Select::new("Home location:", choices).prompt()? {
        HomeChoice::Keep => {}
        HomeChoice::Clear => config.home = None,
        HomeChoice::Search => {
            let query = Text::new("Home location:").prompt()?;
            let geocoder = MapsCoGeocoder::new(
                build_http_client(config)?,
                config.geocode_url(),
                config.geocode.api_key.clone(),
            );
            let place = geocoder.geocode(&query).await.with_context(|| {
                format!("Could not resolve '{query}'. Hint: try entering coordinates instead.")
            })?;

            println!("Found {} ({})", place.label.as_deref().unwrap_or(&query), place.coordinates);
            config.set_home(&place);
        }
        HomeChoice::Coordinates => {
            let latitude = CustomType::<f64>::new("Latitude:")
                .with_help_message("decimal degrees, -90 to 90")
                .prompt()?;
            let longitude = CustomType::<f64>::new("Longitude:")
                .with_help_message("decimal degrees, -180 to 180")
                .prompt()?;
            let coordinates = Coordinates::new(latitude, longitude)?;

            let label = Text::new("Label (optional):").prompt()?;
            let label = Some(label.trim().to_string()).filter(|l| !l.is_empty());
            config.set_home(&Place::new(coordinates, label));
        }
    }

    Ok(())
}

/// Map Esc / Ctrl-C to `None` so the loop can exit cleanly.
fn cancellable<T>(res: Result<T, InquireError>) -> Result<Option<T>> {
    match res {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
