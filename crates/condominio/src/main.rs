//! `condo` - CLI for condominio
//!
//! This binary provides the command-line interface for every page of the
//! application and runs the announcements backend.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::net::SocketAddr;

use anyhow::Context;
use chrono::{Local, Utc};
use clap::Parser;

use condominio::api::{serve, AppState, Feed, FeedClient, POSTED, POST_FAILED};
use condominio::cli::{
    AnnouncementCommand, Cli, Command, ConfigCommand, DeleteArgs, DocumentCommand, FeedCommand,
    IssueCommand, OutputFormat, ProfileCommand, ReservationCommand, StoreCommand,
};
use condominio::config::BackendKind;
use condominio::model::{
    directory, parse_tags, parse_time, Announcement, AnnouncementDraft, AnnouncementPatch,
    Document, DocumentDraft, DocumentPatch, Entity, Issue, IssueDraft, IssuePatch, Reservation,
    parse_units, today, ReservationDraft, ReservationPatch, UserProfile, UserProfilePatch,
};
use condominio::pages::{AssumeYes, Confirm, Deletion, Summary, TerminalConfirm, CARDS};
use condominio::storage::{open_backend, SqliteStore};
use condominio::{init_logging, Config, Page, Persistence};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Execute the command
    match cli.command {
        Command::Dashboard(cmd) => handle_dashboard(&open_persistence(&config)?, cmd.json),
        Command::Contacts(cmd) => handle_contacts(cmd.json),
        Command::Announcements(cmd) => handle_announcements(&config, cmd),
        Command::Documents(cmd) => handle_documents(&config, cmd),
        Command::Issues(cmd) => handle_issues(&config, cmd),
        Command::Reservations(cmd) => handle_reservations(&config, cmd),
        Command::Profile(cmd) => handle_profile(&open_persistence(&config)?, cmd),
        Command::Store(cmd) => handle_store(&config, cmd),
        Command::Serve(cmd) => handle_serve(&config, cmd.bind.as_deref()).await,
        Command::Feed(cmd) => handle_feed(&config, cmd).await,
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn open_persistence(config: &Config) -> anyhow::Result<Persistence> {
    Ok(Persistence::new(open_backend(config)?))
}

fn confirmer(yes: bool) -> &'static dyn Confirm {
    if yes {
        &AssumeYes
    } else {
        &TerminalConfirm
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_items<E: Entity>(
    items: &[E],
    format: OutputFormat,
    line: impl Fn(&E) -> String,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => print_json(items)?,
        OutputFormat::Plain if items.is_empty() => println!("No {} found.", E::NAME),
        OutputFormat::Plain => {
            for item in items {
                println!("{}", line(item));
            }
        }
    }
    Ok(())
}

fn handle_delete<E: Entity>(page: &mut Page<'_, E>, args: &DeleteArgs) {
    match page.delete(&args.id, confirmer(args.yes)) {
        Deletion::Removed => println!("Deleted {} {}.", E::NAME, args.id),
        Deletion::Cancelled => println!("Cancelled."),
        Deletion::Missing => println!("No {} with id {}.", E::NAME, args.id),
    }
}

fn handle_dashboard(persistence: &Persistence, json: bool) -> anyhow::Result<()> {
    let summary = Summary::collect(persistence, today(Utc::now()));
    if json {
        return print_json(&serde_json::json!({ "cards": CARDS, "summary": summary }));
    }

    println!("Benvenuto nel Portale Condominiale");
    println!("==================================");
    println!();
    for card in &CARDS {
        println!("{:<24} {}", card.title, card.description);
    }
    println!();
    println!("Announcements:          {}", summary.announcements);
    if let Some(title) = &summary.latest_announcement {
        println!("  Latest:               {title}");
    }
    println!("Documents:              {}", summary.documents);
    println!(
        "Issues:                 {} ({} open)",
        summary.issues, summary.open_issues
    );
    println!(
        "Reservations:           {} ({} upcoming)",
        summary.reservations, summary.upcoming_reservations
    );
    Ok(())
}

fn handle_contacts(json: bool) -> anyhow::Result<()> {
    let contacts = directory();
    if json {
        return print_json(&contacts);
    }
    for contact in &contacts {
        println!("{} - {}", contact.name, contact.role);
        if let Some(phone) = &contact.phone {
            println!("  Tel:   {phone}");
        }
        if let Some(email) = &contact.email {
            println!("  Email: {email}");
        }
    }
    Ok(())
}

fn handle_announcements(config: &Config, cmd: AnnouncementCommand) -> anyhow::Result<()> {
    let persistence = open_persistence(config)?;
    let mut page = Page::<Announcement>::load(&persistence, config.storage.seed_examples);
    match cmd {
        AnnouncementCommand::List(args) => print_items(page.items(), args.format, |a| {
            format!(
                "[{}] {}  {}\n    {}",
                a.id,
                a.date.with_timezone(&Local).format("%d/%m/%Y %H:%M"),
                a.title,
                a.content
            )
        })?,
        AnnouncementCommand::Add { title, content } => {
            let created = page.create(AnnouncementDraft::new().title(title).content(content))?;
            println!("Added announcement {}.", created.id);
        }
        AnnouncementCommand::Edit { id, title, content } => {
            let updated = page.update(&id, AnnouncementPatch { title, content })?;
            println!("Updated announcement {}.", updated.id);
        }
        AnnouncementCommand::Delete(args) => handle_delete(&mut page, &args),
    }
    Ok(())
}

fn handle_documents(config: &Config, cmd: DocumentCommand) -> anyhow::Result<()> {
    let persistence = open_persistence(config)?;
    let mut page = Page::<Document>::load(&persistence, config.storage.seed_examples);
    match cmd {
        DocumentCommand::List(args) => print_items(page.items(), args.format, |d| {
            let link = if d.has_file() {
                d.url.as_deref().unwrap_or_default()
            } else {
                "(nessun file)"
            };
            let mut line = format!(
                "[{}] {}  {} ({})  {}",
                d.id,
                d.upload_date.with_timezone(&Local).format("%d/%m/%Y"),
                d.name,
                d.kind,
                link
            );
            if !d.tags.is_empty() {
                line.push_str(&format!("\n    tags: {}", d.tags.join(", ")));
            }
            line
        })?,
        DocumentCommand::Add {
            name,
            kind,
            url,
            tags,
        } => {
            let mut draft = DocumentDraft::new().name(name).kind(kind);
            if let Some(url) = url {
                draft = draft.url(url);
            }
            if let Some(tags) = tags {
                draft = draft.tags(&tags);
            }
            let created = page.create(draft)?;
            println!("Added document {}.", created.id);
        }
        DocumentCommand::Edit {
            id,
            name,
            kind,
            url,
            tags,
        } => {
            let patch = DocumentPatch {
                name,
                kind,
                url,
                tags: tags.as_deref().map(parse_tags),
            };
            let updated = page.update(&id, patch)?;
            println!("Updated document {}.", updated.id);
        }
        DocumentCommand::Delete(args) => handle_delete(&mut page, &args),
    }
    Ok(())
}

fn handle_issues(config: &Config, cmd: IssueCommand) -> anyhow::Result<()> {
    let persistence = open_persistence(config)?;
    let mut page = Page::<Issue>::load(&persistence, config.storage.seed_examples);
    match cmd {
        IssueCommand::List { format, open } => {
            let items: Vec<Issue> = page
                .items()
                .iter()
                .filter(|i| !open || i.status.is_open())
                .cloned()
                .collect();
            print_items(&items, format, |i| {
                let mut line = format!(
                    "[{}] {}  {} - {}\n    {} | urgenza {} | priorità {}",
                    i.id,
                    i.reported_date.with_timezone(&Local).format("%d/%m/%Y"),
                    i.location,
                    i.description,
                    i.status,
                    i.urgency,
                    i.priority.unwrap_or_default()
                );
                if let Some(vendor) = &i.assigned_vendor {
                    line.push_str(&format!("\n    fornitore: {vendor}"));
                }
                if let Some(notes) = &i.resolution_notes {
                    line.push_str(&format!("\n    note: {notes}"));
                }
                line
            })?;
        }
        IssueCommand::Report {
            description,
            location,
            urgency,
            details,
            photo,
        } => {
            let mut draft = IssueDraft::new()
                .description(description)
                .location(location)
                .urgency(urgency.into());
            if let Some(details) = details {
                draft = draft.location_details(details);
            }
            if let Some(photo) = photo {
                draft = draft.photo(photo);
            }
            let created = page.create(draft)?;
            println!("Reported issue {}.", created.id);
        }
        IssueCommand::Edit {
            id,
            description,
            location,
            details,
            photo,
            urgency,
            status,
            priority,
            vendor,
            notes,
        } => {
            let patch = IssuePatch {
                description,
                location,
                location_details: details,
                photo,
                urgency: urgency.map(Into::into),
                status: status.map(Into::into),
                priority: priority.map(Into::into),
                assigned_vendor: vendor,
                resolution_notes: notes,
            };
            let profile = UserProfile::load(&persistence);
            let updated = page.update_as(profile.as_ref(), &id, patch)?;
            println!("Updated issue {} ({}).", updated.id, updated.status);
        }
        IssueCommand::Delete(args) => handle_delete(&mut page, &args),
    }
    Ok(())
}

fn handle_reservations(config: &Config, cmd: ReservationCommand) -> anyhow::Result<()> {
    let persistence = open_persistence(config)?;
    let mut page = Page::<Reservation>::load(&persistence, config.storage.seed_examples);
    match cmd {
        ReservationCommand::List(args) => print_items(page.items(), args.format, |r| {
            format!(
                "[{}] {} {}  {} - {}",
                r.id,
                r.date.format("%d/%m/%Y"),
                r.time.format("%H:%M"),
                r.amenity,
                r.user_name
            )
        })?,
        ReservationCommand::Book {
            amenity,
            user_name,
            date,
            time,
        } => {
            let mut draft = ReservationDraft::new()
                .amenity(amenity)
                .user_name(user_name)
                .time(parse_time(&time)?);
            if let Some(date) = date {
                draft = draft.date(date);
            }
            let created = page.create(draft)?;
            println!(
                "Booked {} on {} at {} ({}).",
                created.amenity,
                created.date.format("%d/%m/%Y"),
                created.time.format("%H:%M"),
                created.id
            );
        }
        ReservationCommand::Edit {
            id,
            amenity,
            user_name,
            date,
            time,
        } => {
            let patch = ReservationPatch {
                amenity,
                user_name,
                date,
                time: time.as_deref().map(parse_time).transpose()?,
            };
            let updated = page.update(&id, patch)?;
            println!("Updated reservation {}.", updated.id);
        }
        ReservationCommand::Delete(args) => handle_delete(&mut page, &args),
    }
    Ok(())
}

fn handle_profile(persistence: &Persistence, cmd: ProfileCommand) -> anyhow::Result<()> {
    match cmd {
        ProfileCommand::Show { json } => {
            let profile = UserProfile::load(persistence);
            match (profile, json) {
                (Some(profile), true) => print_json(&profile)?,
                (None, true) => println!("null"),
                (None, false) => println!("No profile set. Use `condo profile set`."),
                (Some(profile), false) => {
                    println!("Name:   {}", profile.name);
                    println!("Email:  {}", profile.email);
                    if let Some(phone) = &profile.phone {
                        println!("Phone:  {phone}");
                    }
                    println!("Admin:  {}", profile.is_admin);
                    for unit in &profile.units {
                        println!("Unit:   {} ({})", unit.address, unit.kind);
                    }
                }
            }
        }
        ProfileCommand::Set {
            name,
            email,
            phone,
            admin,
            units,
        } => {
            let patch = UserProfilePatch {
                name,
                email,
                phone,
                is_admin: admin,
                units: (!units.is_empty())
                    .then(|| parse_units(&units))
                    .transpose()?,
            };
            let profile = patch.resolve(UserProfile::load(persistence), Utc::now())?;
            profile.save(persistence);
            println!("Profile saved.");
        }
    }
    Ok(())
}

fn handle_store(config: &Config, cmd: StoreCommand) -> anyhow::Result<()> {
    // Stats read the database file directly, so only the other
    // subcommands open the key-value service.
    match cmd {
        StoreCommand::Keys => {
            for key in open_persistence(config)?.keys() {
                println!("{key}");
            }
        }
        StoreCommand::Get { key } => match open_persistence(config)?.get_raw(&key) {
            Some(value) => print_json(&value)?,
            None => println!("(no value)"),
        },
        StoreCommand::Remove { key, yes } => {
            if confirmer(yes).confirm(&format!("Rimuovere la chiave '{key}'?")) {
                open_persistence(config)?.remove(&key);
                println!("Removed {key}.");
            } else {
                println!("Cancelled.");
            }
        }
        StoreCommand::Stats { json } => print_store_stats(config, json)?,
    }
    Ok(())
}

fn print_store_stats(config: &Config, json: bool) -> anyhow::Result<()> {
    if config.storage.backend != BackendKind::Sqlite {
        println!("The in-memory backend keeps no statistics.");
        return Ok(());
    }
    let path = config.database_path();
    let stats = SqliteStore::open(&path)?.stats()?;
    if json {
        return print_json(&stats);
    }
    println!("Database:      {}", path.display());
    println!("Keys:          {}", stats.total_keys);
    println!("Stored bytes:  {}", stats.total_bytes);
    println!("File size:     {}", stats.db_size_bytes);
    match stats.last_updated {
        Some(at) => println!("Last update:   {}", at.with_timezone(&Local)),
        None => println!("Last update:   never"),
    }
    Ok(())
}

async fn handle_serve(config: &Config, bind: Option<&str>) -> anyhow::Result<()> {
    let addr: SocketAddr = match bind {
        Some(bind) => bind
            .parse()
            .with_context(|| format!("invalid bind address '{bind}'"))?,
        None => config.bind_addr()?,
    };
    serve(addr, AppState::new()).await?;
    Ok(())
}

async fn handle_feed(config: &Config, cmd: FeedCommand) -> anyhow::Result<()> {
    let mut feed = Feed::new(FeedClient::new(config.api.base_url.clone()));
    match cmd {
        FeedCommand::List { html } => {
            let state = feed.refresh().await;
            if html {
                println!("{}", state.render_html());
            } else {
                println!("{}", state.render_text());
            }
        }
        FeedCommand::Post { title, content } => match feed.submit(&title, &content).await {
            Ok(()) => {
                println!("{POSTED}");
                println!("{}", feed.state().render_text());
            }
            Err(e) if e.is_network() => {
                println!("{POST_FAILED}");
                return Err(e.into());
            }
            Err(e) => return Err(e.into()),
        },
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                print_json(config)?;
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Backend:            {:?}", config.storage.backend);
                println!("  Database path:      {}", config.database_path().display());
                println!("  Seed examples:      {}", config.storage.seed_examples);
                println!();
                println!("[Server]");
                println!("  Bind:               {}", config.server.bind);
                println!();
                println!("[Api]");
                println!("  Base URL:           {}", config.api.base_url);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
