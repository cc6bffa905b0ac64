use anyhow::{bail, Context, Result};
use brokerage_client::appointments::{available_transitions, Actor, AppointmentBook};
use brokerage_client::dashboard::{AgentOverview, ListingSummary};
use brokerage_client::listing::{Choice, ListingView, PriceChange, RangeFilter, RoomFilter};
use brokerage_client::models::{
    ContractType, Credentials, MeetingStatus, PersonalInformation, Property, PropertyKind,
    PropertyStatus, PropertyType, Registration, Review, Role, User,
};
use brokerage_client::resolve::UserDirectory;
use brokerage_client::reviews::{self, ReviewStats};
use brokerage_client::{
    BrokerageApi, ClientConfig, HttpBrokerageApi, PageRequest, Session, SessionStore,
};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "brokerage", about = "Browse listings, reviews and appointments")]
struct Cli {
    /// REST API root (overrides BROKERAGE_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Listings per page (overrides BROKERAGE_PAGE_SIZE)
    #[arg(long, global = true)]
    page_size: Option<u32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List one page of properties, filtered locally
    Listings(ListingArgs),
    /// Show a single property
    Property { id: i64 },
    /// Agent profile with listings and rating
    Agent { id: i64 },
    /// List reviews, optionally for one agent
    Reviews {
        #[arg(long)]
        agent: Option<i64>,
    },
    /// Write, edit or delete your reviews
    #[command(subcommand)]
    Review(ReviewCommand),
    /// List your appointments
    Appointments,
    /// Confirm an appointment (agents)
    Confirm { id: i64 },
    /// Cancel an appointment
    Cancel { id: i64 },
    /// Counts of listings per status, type and contract
    Summary,
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        /// Register as an agent instead of a client
        #[arg(long)]
        agent: bool,
    },
    /// Update your name or phone number
    Profile {
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    Logout,
    Whoami,
}

#[derive(Args)]
struct ListingArgs {
    /// Zero-based page
    #[arg(long, default_value_t = 0)]
    page: u32,
    /// Matches name, description or city
    #[arg(long, default_value = "")]
    search: String,
    #[arg(long = "type", default_value = "all")]
    property_type: String,
    #[arg(long, default_value = "all")]
    status: String,
    #[arg(long, default_value = "all")]
    contract: String,
    #[arg(long, default_value = "")]
    price_from: String,
    #[arg(long, default_value = "")]
    price_to: String,
    #[arg(long, default_value = "")]
    area_from: String,
    #[arg(long, default_value = "")]
    area_to: String,
    /// 1-4 for an exact count, 5 for five or more
    #[arg(long, default_value = "all")]
    rooms: String,
    /// Save the visible listings as JSON
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Subcommand)]
enum ReviewCommand {
    Add {
        #[arg(long)]
        agent: i64,
        #[arg(long)]
        rating: u8,
        #[arg(long, default_value = "")]
        text: String,
    },
    Edit {
        id: i64,
        #[arg(long)]
        rating: Option<u8>,
        #[arg(long)]
        text: Option<String>,
    },
    Delete { id: i64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env();
    if let Some(url) = cli.api_url {
        config.base_url = url.trim_end_matches('/').to_string();
    }
    if let Some(size) = cli.page_size {
        config.page_size = size.max(1);
    }

    let mut session = SessionStore::new(config.session_path.clone());
    session
        .load()
        .await
        .with_context(|| format!("Failed to read session from {}", config.session_path.display()))?;

    let api = HttpBrokerageApi::new(&config)
        .context("Failed to create HTTP client")?
        .with_token(session.token().map(str::to_string));

    match cli.command {
        Command::Listings(args) => listings(&api, &config, args).await,
        Command::Property { id } => show_property(&api, id).await,
        Command::Agent { id } => show_agent(&api, id).await,
        Command::Reviews { agent } => show_reviews(&api, agent).await,
        Command::Review(command) => review(&api, session.current(), command).await,
        Command::Appointments => show_appointments(&api, session.current()).await,
        Command::Confirm { id } => {
            set_status(&api, session.current(), id, MeetingStatus::Confirmed).await
        }
        Command::Cancel { id } => {
            set_status(&api, session.current(), id, MeetingStatus::Canceled).await
        }
        Command::Summary => summary(&api, &config).await,
        Command::Login { email, password } => {
            let credentials = Credentials { email, password };
            let auth = api.login(&credentials).await.context("Login failed")?;
            session
                .set(Session {
                    token: auth.token,
                    user: auth.user,
                })
                .await
                .context("Failed to store session")?;
            println!("✅ Signed in");
            Ok(())
        }
        Command::Register {
            email,
            password,
            first_name,
            last_name,
            agent,
        } => {
            let registration = Registration {
                email,
                password,
                role: if agent { Role::Agent } else { Role::Client },
                personal_information: PersonalInformation {
                    first_name,
                    last_name,
                    ..Default::default()
                },
            };
            let auth = api
                .register(&registration)
                .await
                .context("Registration failed")?;
            session
                .set(Session {
                    token: auth.token,
                    user: auth.user,
                })
                .await
                .context("Failed to store session")?;
            println!("✅ Registered and signed in");
            Ok(())
        }
        Command::Profile {
            first_name,
            last_name,
            phone,
        } => {
            let Some(mut user) = session.user().cloned() else {
                bail!("Sign in to update your profile");
            };
            let info = &mut user.personal_information;
            if let Some(first_name) = first_name {
                info.first_name = first_name;
            }
            if let Some(last_name) = last_name {
                info.last_name = last_name;
            }
            if phone.is_some() {
                info.phone_number = phone;
            }
            let saved = api
                .update_profile(&user)
                .await
                .context("Failed to update profile")?;
            session
                .replace_user(saved)
                .await
                .context("Failed to store session")?;
            println!("✅ Profile updated");
            Ok(())
        }
        Command::Logout => {
            session.clear().await.context("Failed to clear session")?;
            println!("Signed out");
            Ok(())
        }
        Command::Whoami => {
            match session.user() {
                Some(user) => println!("{} <{}> ({})", user.display_name(), user.email, user.role),
                None => println!("Not signed in"),
            }
            Ok(())
        }
    }
}

fn describe(property: &Property) -> String {
    let detail = match &property.kind {
        PropertyKind::Apartment { rooms } => format!("apartment, {} rooms", rooms),
        PropertyKind::House { plot_area } => format!("house, plot {} m²", plot_area),
        PropertyKind::Land { is_for_housing: true } => "building land".to_string(),
        PropertyKind::Land { is_for_housing: false } => "land".to_string(),
    };
    let badge = PriceChange::of(property)
        .map(|change| format!(" {}", change))
        .unwrap_or_default();

    format!(
        "#{} {} ({}, {})\n   {:.0} Kč{} · {} m² · {:?} · {:?}",
        property.id,
        property.name,
        property.address.city,
        detail,
        property.price,
        badge,
        property.usable_area,
        property.contract_type,
        property.status,
    )
}

async fn listings(api: &HttpBrokerageApi, config: &ClientConfig, args: ListingArgs) -> Result<()> {
    let mut view = ListingView::new(config.page_size);
    view.update_filter(|f| {
        f.search = args.search.clone();
        f.property_type = Choice::parse(&args.property_type);
        f.status = Choice::parse(&args.status);
        f.contract_type = Choice::parse(&args.contract);
        f.price = RangeFilter::parse(&args.price_from, &args.price_to);
        f.area = RangeFilter::parse(&args.area_from, &args.area_to);
        f.rooms = RoomFilter::parse(&args.rooms);
    });

    view.refresh(api).await.context("Failed to fetch listings")?;
    if args.page > 0 {
        if view.go_to_page(args.page) {
            view.refresh(api).await.context("Failed to fetch listings")?;
        } else {
            warn!(
                "Page {} is past the last page ({}), showing page 0",
                args.page,
                view.pagination().total_pages()
            );
        }
    }

    let visible = view.visible();
    let pagination = view.pagination();
    info!(
        "Page {}/{}: {} of {} listings match",
        pagination.page() + 1,
        pagination.total_pages().max(1),
        visible.len(),
        view.fetched().len()
    );

    for property in &visible {
        println!("{}", describe(property));
    }

    if let Some(path) = args.out {
        let json = serde_json::to_string_pretty(&visible)?;
        tokio::fs::write(&path, json)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("💾 Saved {} listings to {}", visible.len(), path.display());
    }
    Ok(())
}

async fn show_property(api: &HttpBrokerageApi, id: i64) -> Result<()> {
    match api.get_property(id).await.context("Failed to fetch property")? {
        Some(property) => {
            println!("{}", describe(&property));
            if !property.description.is_empty() {
                println!("   {}", property.description);
            }
            let agent = api
                .get_profile(property.agent_id)
                .await
                .context("Failed to fetch agent")?;
            println!("   Agent: {} <{}>", agent.display_name(), agent.email);
        }
        None => println!("Property {} not found", id),
    }
    Ok(())
}

async fn show_agent(api: &HttpBrokerageApi, id: i64) -> Result<()> {
    let overview = AgentOverview::load(api, id)
        .await
        .context("Failed to load agent")?;

    println!("{} <{}>", overview.agent.display_name(), overview.agent.email);
    print_stats(&overview.reviews);
    for property in &overview.listings {
        println!("{}", describe(property));
    }
    Ok(())
}

fn print_stats(stats: &ReviewStats) {
    println!(
        "★ {:.1} from {} reviews, {} % five-star",
        stats.average_rating,
        stats.total,
        stats.five_star_percentage()
    );
    for stars in (1..=5u8).rev() {
        println!("  {}★ {:>3} %", stars, stats.percentage(stars));
    }
}

async fn show_reviews(api: &HttpBrokerageApi, agent: Option<i64>) -> Result<()> {
    let list = match agent {
        Some(id) => api.reviews_for_realtor(id).await,
        None => api.list_reviews().await,
    }
    .context("Failed to fetch reviews")?;

    print_stats(&ReviewStats::from_reviews(&list));

    let mut directory = UserDirectory::new();
    if let Err(e) = directory.resolve_reviews(api, &list).await {
        warn!("Some reviewers could not be loaded: {}", e);
    }

    for entry in directory.join_reviews(&list) {
        let name = |user: Option<&User>| {
            user.map(|u| u.display_name()).unwrap_or_else(|| "?".to_string())
        };
        println!(
            "#{} {}★ for {} by {}: {}",
            entry.review.id,
            entry.review.overall,
            name(entry.realtor),
            name(entry.author),
            entry.review.text
        );
    }
    Ok(())
}

async fn review(api: &HttpBrokerageApi, session: Option<&Session>, command: ReviewCommand) -> Result<()> {
    match command {
        ReviewCommand::Add { agent, rating, text } => {
            let created = reviews::create_review(api, session, agent, rating, text)
                .await
                .context("Failed to create review")?;
            println!("✅ Review #{} created", created.id);
        }
        ReviewCommand::Edit { id, rating, text } => {
            let mut existing = find_review(api, id).await?;
            if let Some(rating) = rating {
                existing.overall = rating;
            }
            if let Some(text) = text {
                existing.text = text;
            }
            reviews::update_review(api, session, &existing)
                .await
                .context("Failed to update review")?;
            println!("✅ Review #{} updated", id);
        }
        ReviewCommand::Delete { id } => {
            let existing = find_review(api, id).await?;
            reviews::delete_review(api, session, &existing)
                .await
                .context("Failed to delete review")?;
            println!("✅ Review #{} deleted", id);
        }
    }
    Ok(())
}

async fn find_review(api: &HttpBrokerageApi, id: i64) -> Result<Review> {
    let all = api.list_reviews().await.context("Failed to fetch reviews")?;
    match all.into_iter().find(|r| r.id == id) {
        Some(review) => Ok(review),
        None => bail!("Review {} not found", id),
    }
}

async fn show_appointments(api: &HttpBrokerageApi, session: Option<&Session>) -> Result<()> {
    let Some(session) = session else {
        bail!("Sign in to see appointments");
    };
    let actor = Actor::from(&session.user);

    let mut book = AppointmentBook::new();
    book.refresh(api).await.context("Failed to fetch appointments")?;

    let mut directory = UserDirectory::new();
    if let Err(e) = directory.resolve_appointments(api, book.all()).await {
        warn!("Some participants could not be loaded: {}", e);
    }

    for entry in directory.join_appointments(book.all()) {
        let appointment = entry.appointment;
        let other = match session.role() {
            Role::Agent => entry.client,
            _ => entry.realtor,
        };
        let actions: Vec<String> = available_transitions(appointment, actor)
            .iter()
            .map(|s| s.to_string())
            .collect();
        println!(
            "#{} {} {:?} with {} [{}] {}",
            appointment.id,
            appointment.meeting_time.format("%Y-%m-%d %H:%M"),
            appointment.meeting_type,
            other.map(|u| u.display_name()).unwrap_or_else(|| "?".to_string()),
            appointment.meeting_status,
            if actions.is_empty() {
                String::new()
            } else {
                format!("→ {}", actions.join(" / "))
            }
        );
    }
    Ok(())
}

async fn set_status(
    api: &HttpBrokerageApi,
    session: Option<&Session>,
    id: i64,
    to: MeetingStatus,
) -> Result<()> {
    let Some(session) = session else {
        bail!("Sign in to manage appointments");
    };

    let mut book = AppointmentBook::new();
    book.refresh(api).await.context("Failed to fetch appointments")?;
    book.change_status(api, id, Actor::from(&session.user), to)
        .await
        .with_context(|| format!("Failed to set appointment {} to {}", id, to))?;

    println!("✅ Appointment #{} is now {}", id, to);
    Ok(())
}

async fn summary(api: &HttpBrokerageApi, config: &ClientConfig) -> Result<()> {
    let mut all = Vec::new();
    let mut request = PageRequest::new(0, config.page_size.max(1));
    loop {
        let page = api
            .list_properties(request)
            .await
            .context("Failed to fetch listings")?;
        let fetched = page.content.len();
        all.extend(page.content);
        if fetched == 0 || all.len() as u64 >= page.total_elements {
            break;
        }
        request.page += 1;
    }

    let summary = ListingSummary::from_properties(&all);
    println!("{} listings", summary.total);
    for (label, count) in [
        ("available", summary.status_count(PropertyStatus::Available)),
        ("reserved", summary.status_count(PropertyStatus::Reserved)),
        ("bought", summary.status_count(PropertyStatus::Bought)),
    ] {
        println!("  {:<10} {}", label, count);
    }
    for (label, count) in [
        ("apartments", summary.type_count(PropertyType::Apartment)),
        ("houses", summary.type_count(PropertyType::House)),
        ("land", summary.type_count(PropertyType::Land)),
        ("for sale", summary.contract_count(ContractType::Sale)),
        ("for rent", summary.contract_count(ContractType::Rental)),
    ] {
        println!("  {:<10} {}", label, count);
    }
    Ok(())
}
