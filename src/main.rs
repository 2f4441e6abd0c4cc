use anyhow::{Context, Result};
use campus_market::api::{ListingSource, MarketplaceClient, StaticListings};
use campus_market::config::Config;
use campus_market::display::{DisplayContext, ListingView};
use campus_market::models::ListingSnapshot;
use campus_market::{filter, Category, Condition, FilterSpec, Selection};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "campus-market", about = "Browse the campus marketplace from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List marketplace items, optionally filtered
    Browse(BrowseArgs),
    /// Show one listing in detail
    Show {
        id: u64,
        /// Read from a saved snapshot instead of the backend
        #[arg(long)]
        from_file: Option<PathBuf>,
    },
}

#[derive(Args)]
struct BrowseArgs {
    /// Search title or description
    #[arg(long, default_value = "")]
    search: String,
    /// Condition label, or "All"
    #[arg(long, default_value = "All")]
    condition: String,
    /// Category label, or "All"
    #[arg(long, default_value = "All")]
    category: String,
    #[arg(long, default_value_t = 0.0)]
    min_price: f64,
    /// Leave out (or pass 0) for no upper limit
    #[arg(long)]
    max_price: Option<f64>,
    /// Only listings from this seller
    #[arg(long)]
    seller: Option<u64>,
    /// Read from a saved snapshot instead of the backend
    #[arg(long)]
    from_file: Option<PathBuf>,
    /// Save the fetched (unfiltered) listings to this file
    #[arg(long)]
    save: Option<PathBuf>,
}

impl BrowseArgs {
    fn filter_spec(&self) -> FilterSpec {
        FilterSpec {
            search_term: self.search.clone(),
            condition: Selection::<Condition>::parse(&self.condition),
            category: Selection::<Category>::parse(&self.category),
            min_price: self.min_price,
            max_price: self.max_price,
        }
    }
}

async fn open_source(config: &Config, from_file: Option<&PathBuf>) -> Result<Box<dyn ListingSource>> {
    match from_file {
        Some(path) => Ok(Box::new(StaticListings::load(path).await?)),
        None => Ok(Box::new(
            MarketplaceClient::with_config(&config.api).context("Failed to create HTTP client")?,
        )),
    }
}

async fn browse(config: &Config, args: BrowseArgs) -> Result<()> {
    let source = open_source(config, args.from_file.as_ref()).await?;
    info!("Loading listings from {}...", source.source_name());

    let listings = match args.seller {
        Some(seller) => source.fetch_seller_listings(seller).await,
        None => source.fetch_listings().await,
    }
    .context("Failed to load listings. Is the backend running?")?;

    let spec = args.filter_spec();
    let shown = filter(&listings, &spec);
    info!("✅ {} of {} listings match\n", shown.len(), listings.len());

    if shown.is_empty() {
        println!("No listings match your filters. Try adjusting search, price, or category.");
    }

    for (i, listing) in shown.iter().enumerate() {
        let view = ListingView::new(listing, DisplayContext::Card);
        match &view.was_price_label {
            Some(was) => println!("{}. {} ({}, was {})", i + 1, view.title, view.price_label, was),
            None => println!("{}. {} ({})", i + 1, view.title, view.price_label),
        }
        println!("   {} · {}", view.condition, view.stock.label());
        println!("   Rating: {}", view.rating.label);
        if view.photo_count > 1 {
            println!("   {} photos", view.photo_count);
        }
        if view.has_variants {
            println!("   Variants available");
        }
        match &view.contact_url {
            Some(url) => println!("   Contact: {}", url),
            None if view.stock.is_sold_out() => println!("   Out of Stock"),
            None => println!("   No Contact Info"),
        }
        println!("   ID: {}", view.id);
        println!();
    }

    if let Some(path) = args.save {
        let snapshot = ListingSnapshot::new(source.source_name(), listings);
        let json = serde_json::to_string_pretty(&snapshot)?;
        tokio::fs::write(&path, json)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("💾 Saved {} listings to {}", snapshot.listings.len(), path.display());
    }

    Ok(())
}

async fn show(config: &Config, id: u64, from_file: Option<PathBuf>) -> Result<()> {
    // The live client is kept around for the rating-status lookup below
    let (listing, client) = match &from_file {
        Some(path) => (StaticListings::load(path).await?.fetch_listing(id).await, None),
        None => {
            let client = MarketplaceClient::with_config(&config.api)
                .context("Failed to create HTTP client")?;
            (client.fetch_listing(id).await, Some(client))
        }
    };
    let listing = listing.context("Failed to load listing")?;
    let view = ListingView::new(&listing, DisplayContext::Detail);

    println!("{}", view.title);
    match &view.was_price_label {
        Some(was) => println!("{} (was {})", view.price_label, was),
        None => println!("{}", view.price_label),
    }
    println!("Condition: {}", view.condition);
    if listing.stock_quantity > 0 {
        println!("Stock: {} available", listing.stock_quantity);
    } else {
        println!("Stock: Out of stock");
    }
    println!("Image: {}", view.primary_image);
    println!();
    println!("{}", listing.display_description());

    if !listing.variants.is_empty() {
        println!();
        println!("Available variants:");
        for variant in &listing.variants {
            println!("  {} ({} in stock)", variant.label(), variant.stock);
        }
    }

    println!();
    println!("Rating: {}", view.rating.label);
    match &view.contact_url {
        Some(url) => println!("Message seller on WhatsApp: {}", url),
        None if view.stock.is_sold_out() => println!("Out of Stock"),
        None => println!("No contact information available"),
    }
    if let Some(seller) = view.seller_id {
        println!("Seller profile: /profile/{}", seller);
    }

    if let Some(client) = client.filter(|_| config.session.can_rate()) {
        match client.rating_status(&config.session, id).await {
            Ok(status) if status.has_rated => println!("(You already rated this listing)"),
            Ok(_) => {}
            Err(e) => warn!("Rating status check failed: {}", e),
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    info!("🛒 Campus Marketplace");

    match cli.command {
        Command::Browse(args) => browse(&config, args).await,
        Command::Show { id, from_file } => show(&config, id, from_file).await,
    }
}
