// Geopic CLI binary

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod api;
mod capture;
mod constants;
mod context;
mod error;
mod settings;
mod store;
mod sync;
mod upload;

use api::ApiClient;
use capture::device::{FileFrameSource, GeoFix, ManualLocation};
use context::AppContext;
use store::queue;

#[derive(Parser)]
#[command(name = "geopic")]
#[command(about = "Geopic - capture, queue and sync geotagged photos", long_about = None)]
#[command(version)]
struct Cli {
    /// Data directory (defaults to the platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Capture a photo into the queue
    Capture {
        /// Image file standing in for the camera frame
        image: PathBuf,
        /// Latitude of the capture location
        #[arg(long, requires = "lng", allow_negative_numbers = true)]
        lat: Option<f64>,
        /// Longitude of the capture location
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lng: Option<f64>,
    },

    /// List the queue
    List,

    /// Show one record's details
    Show {
        /// Record id
        id: String,
    },

    /// Upload queued photos to the server
    Upload {
        /// Record id (uploads everything pending when omitted)
        id: Option<String>,
    },

    /// Delete a record and its local photo
    Delete {
        /// Record id
        id: String,
    },

    /// Pull the server photo listing
    Sync {
        /// Import every staged photo after the pull
        #[arg(long)]
        import: bool,
    },

    /// Show or change server settings
    Settings {
        /// Server base URL
        #[arg(long)]
        server_url: Option<String>,
        /// API token (an empty string clears it)
        #[arg(long)]
        token: Option<String>,
    },

    /// Print the server map URL
    Map,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => store::default_data_dir()?,
    };
    let mut ctx = AppContext::load(data_dir)?;

    match cli.command {
        Commands::Capture { image, lat, lng } => cmd_capture(&mut ctx, image, lat, lng),
        Commands::List => cmd_list(&ctx),
        Commands::Show { id } => cmd_show(&ctx, &id),
        Commands::Upload { id } => cmd_upload(&mut ctx, id),
        Commands::Delete { id } => cmd_delete(&mut ctx, &id),
        Commands::Sync { import } => cmd_sync(&mut ctx, import),
        Commands::Settings { server_url, token } => cmd_settings(&mut ctx, server_url, token),
        Commands::Map => cmd_map(&ctx),
    }
}

fn cmd_capture(
    ctx: &mut AppContext,
    image: PathBuf,
    lat: Option<f64>,
    lng: Option<f64>,
) -> Result<()> {
    let mut camera = FileFrameSource::new(image);
    let fix = match (lat, lng) {
        (Some(lat), Some(lng)) => Some(GeoFix { lat, lng }),
        _ => None,
    };
    let mut location = ManualLocation::new(fix);

    let record = capture::capture_and_save(ctx, &mut camera, &mut location)?;

    println!("Saved {} to queue ({} queued)", record.filename, ctx.queue.len());
    if record.lat.is_none() {
        println!("No location recorded; pass --lat/--lng to geotag the photo.");
    }
    Ok(())
}

fn cmd_list(ctx: &AppContext) -> Result<()> {
    if ctx.queue.is_empty() {
        println!("Queue is empty. Use 'geopic capture <image>' to add a photo.");
        return Ok(());
    }

    println!("{:>16}  {:>10}  {:>12}  {:>6}  {}", "ID", "Status", "Taken", "GPS", "Filename");
    println!("{}", "-".repeat(72));

    for record in &ctx.queue {
        let taken = record
            .taken_at
            .split('T')
            .next()
            .unwrap_or(&record.taken_at);
        let gps = if record.lat.is_some() { "yes" } else { "-" };

        println!(
            "{:>16}  {:>10}  {:>12}  {:>6}  {}",
            record.id,
            record.status.as_str(),
            taken,
            gps,
            record.filename
        );
    }

    if let Some(ref cursor) = ctx.last_sync {
        println!();
        println!("Last server sync: {}", cursor);
    }

    Ok(())
}

fn cmd_show(ctx: &AppContext, id: &str) -> Result<()> {
    let record = ctx
        .queue
        .iter()
        .find(|r| r.id == id)
        .ok_or_else(|| anyhow::anyhow!("Record {} not found", id))?;

    println!("Record {}", record.id);
    println!();
    println!("Filename:  {}", record.filename);
    println!("File:      {}", record.local_path);
    println!("Status:    {}", record.status.as_str());
    println!("Taken:     {}", record.taken_at);

    match (record.lat, record.lng) {
        (Some(lat), Some(lng)) => println!("Location:  {:.6}, {:.6}", lat, lng),
        _ => println!("Location:  -"),
    }

    if !std::path::Path::new(&record.local_path).exists() {
        println!();
        println!("Warning: backing file is missing.");
    }

    Ok(())
}

fn cmd_upload(ctx: &mut AppContext, id: Option<String>) -> Result<()> {
    let api = ApiClient::from_settings(&ctx.settings)?;

    match id {
        Some(id) => {
            let outcome = upload::upload_one(ctx, &api, &id)?;
            match outcome.error {
                None => println!("Uploaded {}", id),
                Some(err) => println!("Upload of {} failed: {}", id, err),
            }
        }
        None => {
            let result = upload::batch::upload_all(ctx, &api)?;
            println!("Upload complete:");
            println!("  Attempted: {}", result.attempted);
            println!("  Synced:    {}", result.synced);
            println!("  Failed:    {}", result.failed);
        }
    }

    Ok(())
}

fn cmd_delete(ctx: &mut AppContext, id: &str) -> Result<()> {
    let record = queue::delete_record(&ctx.data_dir, &mut ctx.queue, id)?;
    println!("Deleted {} ({})", record.id, record.filename);
    Ok(())
}

fn cmd_sync(ctx: &mut AppContext, import: bool) -> Result<()> {
    let api = ApiClient::from_settings(&ctx.settings)?;
    let count = sync::pull_photos(ctx, &api)?;
    println!("Server reported {} photo(s) since the last sync.", count);

    if !import {
        for (idx, photo) in ctx.server_photos.iter().enumerate() {
            let name = photo
                .filename
                .as_deref()
                .or(photo.asset_ref())
                .unwrap_or("<unnamed>");
            println!("  [{}] {}", idx, name);
        }
        if count > 0 {
            println!();
            println!("Staged photos last only for this run; use 'geopic sync --import' to pull and import together.");
        }
        return Ok(());
    }

    let staged = ctx.server_photos.clone();
    let mut imported = 0usize;
    for photo in &staged {
        match sync::import::import_photo(ctx, &api, photo) {
            Ok(record) => {
                imported += 1;
                println!("Imported {}", record.filename);
            }
            Err(e) => eprintln!("Import failed: {}", e),
        }
    }
    println!("Imported {} of {} photo(s).", imported, staged.len());

    Ok(())
}

fn cmd_settings(
    ctx: &mut AppContext,
    server_url: Option<String>,
    token: Option<String>,
) -> Result<()> {
    if server_url.is_none() && token.is_none() {
        let url = if ctx.settings.server_url.is_empty() {
            "<not set>"
        } else {
            ctx.settings.server_url.as_str()
        };
        println!("Server URL: {}", url);
        println!(
            "API token:  {}",
            if ctx.settings.token.is_empty() { "<not set>" } else { "<set>" }
        );
        return Ok(());
    }

    if let Some(url) = server_url {
        ctx.settings.server_url = url;
    }
    if let Some(token) = token {
        ctx.settings.token = token;
    }
    ctx.settings.save()?;
    println!("Settings saved.");

    Ok(())
}

fn cmd_map(ctx: &AppContext) -> Result<()> {
    let api = ApiClient::from_settings(&ctx.settings)?;
    println!("{}", api.map_url());
    if ctx.settings.auth_token().is_some() {
        println!("Open in a view that sends the bearer token header.");
    }
    Ok(())
}
