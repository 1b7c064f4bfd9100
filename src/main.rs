//! Command-line front-end.
//!
//! Drives the screen controllers against the HTTP backend (or a local fixture
//! file) and prints their view models as text:
//!
//! ```text
//! service-finder list --query plumb
//! service-finder category cleaning
//! service-finder show 3
//! service-finder add-service --name "Tap repair" --description "Leaks fixed" \
//!     --price 300 --category plumbing --image https://img.example.com/tap.jpg
//! service-finder add-review 3 --rating 5 --text "Quick and tidy"
//! service-finder --fixture ./services.json list
//! ```
//!
//! Device capabilities are stand-ins: the position comes from `--at LAT,LON`
//! (permission is treated as denied without it), images from `--image`, and
//! contact intents are logged instead of launched. Alerts raised by the screens
//! are printed to stderr.

#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand};
use service_finder::api::{FixtureApi, HttpClient, MarketplaceApi};
use service_finder::device::{
    AuthSession, Capabilities, ContactIntent, Coordinates, FirebaseAuthenticator, FixedLocation,
    LocationProvider, LoggingLauncher, NominatimGeocoder, QueuedImagePicker,
};
use service_finder::screens::{
    AddReviewScreen, AddServiceScreen, CategoryScreen, DetailBody, DetailScreen, HomeScreen,
    ListBody, ProfileScreen, ServiceCard,
};
use service_finder::{observability, Config, Result, Store};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

type Api = Arc<dyn MarketplaceApi>;

#[derive(Debug, Parser)]
#[command(name = "service-finder", version, about = "Browse and post local service listings")]
struct Cli {
    /// Configuration file (default: <data dir>/config.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Serve requests from a local JSON fixture instead of the backend
    #[arg(long, global = true)]
    fixture: Option<PathBuf>,

    /// Device position as LAT,LON; without it location permission is denied
    #[arg(long, global = true, value_parser = parse_position)]
    at: Option<Coordinates>,

    /// Export spans to this file (overrides `trace_file`)
    #[arg(long, global = true)]
    trace: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List all services
    List {
        #[arg(long, short)]
        query: Option<String>,
    },
    /// List the services of one category
    Category {
        tag: String,
        #[arg(long, short)]
        query: Option<String>,
    },
    /// Show one service with its reviews
    Show {
        id: i64,
        /// Launch a contact intent: call:<number>, email:<address> or whatsapp:<number>
        #[arg(long, value_parser = parse_contact)]
        contact: Option<ContactIntent>,
    },
    /// Post a new service listing
    AddService {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        price: String,
        #[arg(long)]
        category: String,
        #[arg(long = "image")]
        images: Vec<String>,
    },
    /// Post a review for a service
    AddReview {
        id: i64,
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        rating: u8,
        #[arg(long, default_value = "")]
        text: String,
        #[arg(long = "image")]
        images: Vec<String>,
    },
    /// Sign in and show the profile
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account and show the profile
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
}

fn parse_position(value: &str) -> std::result::Result<Coordinates, String> {
    let (lat, lon) = value
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LON, got {value:?}"))?;
    let lat: f64 = lat.trim().parse().map_err(|e| format!("latitude: {e}"))?;
    let lon: f64 = lon.trim().parse().map_err(|e| format!("longitude: {e}"))?;
    Ok(Coordinates::new(lat, lon))
}

fn parse_contact(value: &str) -> std::result::Result<ContactIntent, String> {
    match value.split_once(':') {
        Some(("call", number)) => Ok(ContactIntent::Call(number.to_string())),
        Some(("email", address)) => Ok(ContactIntent::Email(address.to_string())),
        Some(("whatsapp", number)) => Ok(ContactIntent::WhatsApp(number.to_string())),
        _ => Err(format!("unknown contact {value:?}")),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    if cli.trace.is_some() {
        config.trace_file.clone_from(&cli.trace);
    }
    observability::init_tracing(&config);

    match run(cli, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn backend(cli: &Cli, config: &Config) -> Result<Api> {
    let api: Api = match &cli.fixture {
        Some(path) => Arc::new(FixtureApi::open(path)?),
        None => Arc::new(HttpClient::new(&config.base_url, config.timeout())?),
    };
    Ok(api)
}

fn capabilities(cli: &Cli, config: &Config, images: Vec<String>) -> Result<Capabilities> {
    let location: Arc<dyn LocationProvider> = match &cli.at {
        Some(position) => Arc::new(FixedLocation::granted(position.clone())),
        None => Arc::new(FixedLocation::denied()),
    };
    let authenticator = FirebaseAuthenticator::new(
        &config.auth_url,
        config.auth_api_key.clone().unwrap_or_default(),
        config.timeout(),
    )?;

    Ok(Capabilities {
        location,
        geocoder: Arc::new(NominatimGeocoder::new(&config.geocoder_url, config.timeout())?),
        images: Arc::new(QueuedImagePicker::new([images])),
        launcher: Arc::new(LoggingLauncher::default()),
        auth: Arc::new(AuthSession::new(Arc::new(authenticator))),
    })
}

async fn run(cli: Cli, config: &Config) -> Result<()> {
    let images = match &cli.command {
        Command::AddService { images, .. } | Command::AddReview { images, .. } => images.clone(),
        _ => Vec::new(),
    };
    let store = Arc::new(Store::new(backend(&cli, config)?, config.completion_policy));
    let caps = capabilities(&cli, config, images)?;

    let result = execute(cli.command, &store, caps, config).await;
    print_alerts(&store)?;
    result
}

async fn execute(command: Command, store: &Arc<Store<Api>>, caps: Capabilities, config: &Config) -> Result<()> {
    match command {
        Command::List { query } => {
            let mut screen = HomeScreen::new(Arc::clone(store), caps, config.search_filter());
            screen.mount().await?;
            screen.set_query(query.unwrap_or_default());
            let view = screen.view()?;
            if let Some(city) = &view.city {
                println!("Near {city}");
            }
            print_list(&view.body);
        }
        Command::Category { tag, query } => {
            let mut screen = CategoryScreen::new(Arc::clone(store), config.search_filter(), tag);
            screen.mount().await?;
            screen.set_query(query.unwrap_or_default());
            let view = screen.view()?;
            println!("{}", view.title);
            print_list(&view.body);
        }
        Command::Show { id, contact } => {
            let screen = DetailScreen::new(Arc::clone(store), caps, id);
            screen.mount().await?;
            if let Some(intent) = &contact {
                screen.contact(intent);
            }
            print_detail(&screen.view()?.body);
        }
        Command::AddService {
            name,
            description,
            price,
            category,
            ..
        } => {
            let mut screen = AddServiceScreen::new(Arc::clone(store), caps);
            screen.mount().await;
            screen.pick_images().await?;
            screen.form.name = name;
            screen.form.description = description;
            screen.form.price = price;
            screen.form.category = category;
            let created = screen.submit().await?;
            println!("#{} {}", created.service_id, created.name);
        }
        Command::AddReview { id, rating, text, .. } => {
            let mut screen = AddReviewScreen::new(Arc::clone(store), caps, id);
            screen.set_rating(rating);
            screen.review_text = text;
            screen.pick_images().await?;
            let view = screen.view();
            let created = screen.submit().await?;
            println!(
                "review #{} ({})",
                created.review_id,
                view.rating_label.unwrap_or_default()
            );
        }
        Command::Login { email, password } => {
            let screen = ProfileScreen::new(Arc::clone(&caps.auth));
            screen.login(&email, &password).await?;
            print_profile(&screen).await;
        }
        Command::Register { email, password } => {
            let screen = ProfileScreen::new(Arc::clone(&caps.auth));
            screen.register(&email, &password).await?;
            print_profile(&screen).await;
        }
    }
    Ok(())
}

fn print_alerts(store: &Store<Api>) -> Result<()> {
    for alert in store.take_alerts()? {
        eprintln!("! {alert}");
    }
    Ok(())
}

fn print_list(body: &ListBody) {
    match body {
        ListBody::Loading => println!("Loading..."),
        ListBody::Error(message) | ListBody::Empty(message) => println!("{message}"),
        ListBody::Cards(cards) => cards.iter().for_each(print_card),
    }
}

fn print_card(card: &ServiceCard) {
    let nearby = if card.is_nearby { " *nearby*" } else { "" };
    let age = card.listed_ago.as_deref().unwrap_or("");
    println!(
        "#{:<4} {:<28} {:>8}  {:<12} {:<14} {age}{nearby}",
        card.service_id, card.name, card.price, card.category, card.city
    );
}

fn print_detail(body: &DetailBody) {
    match body {
        DetailBody::Loading => println!("Loading..."),
        DetailBody::Failed(message) => println!("{message}"),
        DetailBody::Loaded(detail) => {
            println!("{} ({})", detail.name, detail.category);
            println!("{} · {}", detail.price, detail.city);
            println!("{}", detail.description);
            println!("Rating {} from {} review(s)", detail.average_rating, detail.review_count);
            if let Some(error) = &detail.reviews_error {
                println!("  {error}");
            }
            for review in &detail.reviews {
                let stars: String = review.stars.iter().map(|&on| if on { '★' } else { '☆' }).collect();
                println!("  {stars} {}", review.text);
            }
            if !detail.related.is_empty() {
                println!("Related:");
                detail.related.iter().for_each(print_card);
            }
        }
    }
}

async fn print_profile(screen: &ProfileScreen) {
    let view = screen.view().await;
    match view.email {
        Some(email) if view.signed_in => println!("Signed in as {email}"),
        _ => println!("Not signed in"),
    }
}
