//! catalogcache - command-line access to the product catalog.
//!
//! Talks to the catalog backend through the entity stores, keeping the
//! product list cached on disk between runs, and exposes the local-only
//! catalog for offline browsing and editing.

use std::io;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use catalogcache_core::api::HttpCatalogClient;
use catalogcache_core::catalog::LocalCatalog;
use catalogcache_core::models::{CategoryDraft, Product, ProductFilters};
use catalogcache_core::storage::{age_display, last_saved, FileStore, KeyValueStore, BACKEND_PRODUCTS_KEY};
use catalogcache_core::store::{CategoryStore, ProductStore};
use catalogcache_core::Config;

/// Environment variable overriding the configured backend URL
const API_URL_ENV: &str = "CATALOGCACHE_API_URL";

const USAGE: &str = "\
Usage: catalogcache <command> [args]

Backend commands:
  products [--refresh] [--name <text>] [--category <id>] [--json]
  product <id>
  categories
  overview
  create-category <name> [description]
  delete-product <id>...

Configuration:
  config [--api-url <url>] [--storage-dir <dir>] [--debounce-ms <n>]

Local catalog commands:
  local products | categories | showcase
  local add-category <name> [description]
  local delete-product <id>
";

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

struct App {
    config: Config,
    storage: Arc<dyn KeyValueStore>,
}

impl App {
    fn load() -> Result<Self> {
        let mut config = Config::load()?;
        if let Ok(url) = std::env::var(API_URL_ENV) {
            config.api_base_url = url;
        }
        let dir = config.storage_dir()?;
        let storage = FileStore::new(dir)?;
        Ok(Self {
            config,
            storage: Arc::new(storage),
        })
    }

    fn client(&self) -> Result<HttpCatalogClient> {
        HttpCatalogClient::new(&self.config.api_base_url)
            .with_context(|| format!("Failed to create client for {}", self.config.api_base_url))
    }

    fn products(&self) -> Result<ProductStore<HttpCatalogClient>> {
        Ok(ProductStore::products(self.client()?, self.storage.clone()))
    }

    fn categories(&self) -> Result<CategoryStore<HttpCatalogClient>> {
        Ok(CategoryStore::categories(self.client()?))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        eprint!("{}", USAGE);
        return Ok(());
    };

    if command == "config" {
        return configure(&args[1..]);
    }

    let ctx = App::load()?;
    info!(command = %command, api = %ctx.config.api_base_url, "catalogcache starting");

    match command.as_str() {
        "products" => list_products(&ctx, &args[1..]).await,
        "product" => show_product(&ctx, required(&args, 1, "product id")?).await,
        "categories" => list_categories(&ctx).await,
        "overview" => overview(&ctx).await,
        "create-category" => {
            let name = required(&args, 1, "category name")?;
            let description = args.get(2).cloned().unwrap_or_default();
            create_category(&ctx, name, description).await
        }
        "delete-product" => {
            if args.len() < 2 {
                bail!("Missing product id\n\n{}", USAGE);
            }
            delete_products(&ctx, &args[1..]).await
        }
        "local" => local(&ctx, &args[1..]).await,
        "help" | "--help" | "-h" => {
            print!("{}", USAGE);
            Ok(())
        }
        other => bail!("Unknown command: {}\n\n{}", other, USAGE),
    }
}

fn required<'a>(args: &'a [String], index: usize, what: &str) -> Result<&'a str> {
    args.get(index)
        .map(String::as_str)
        .ok_or_else(|| anyhow::anyhow!("Missing {}\n\n{}", what, USAGE))
}

fn print_product(product: &Product) {
    let discount = product
        .discount()
        .map(|d| format!(" (save {:.0})", d))
        .unwrap_or_default();
    println!(
        "{:>14}  {:<32} {:>10.0}{}  [{}]",
        product.id, product.name, product.price, discount, product.status
    );
}

/// Show the configuration, saving it first when any option changes it.
fn configure(args: &[String]) -> Result<()> {
    let mut config = Config::load()?;
    let mut changed = false;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let value = iter
            .next()
            .ok_or_else(|| anyhow::anyhow!("Missing value for {}", arg))?;
        match arg.as_str() {
            "--api-url" => config.api_base_url = value.clone(),
            "--storage-dir" => config.storage_dir = Some(value.into()),
            "--debounce-ms" => {
                config.persist_debounce_ms = value
                    .parse()
                    .with_context(|| format!("Invalid debounce: {}", value))?;
            }
            other => bail!("Unknown option for config: {}", other),
        }
        changed = true;
    }

    if changed {
        config.save()?;
        eprintln!("Saved {}", Config::config_path()?.display());
    }
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

// ===== Backend commands =====

async fn list_products(ctx: &App, args: &[String]) -> Result<()> {
    let mut filters = ProductFilters::default();
    let mut refresh = false;
    let mut json = false;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--refresh" => refresh = true,
            "--json" => json = true,
            "--name" => filters.name = iter.next().cloned(),
            "--category" => filters.category_id = iter.next().cloned(),
            other => bail!("Unknown option for products: {}", other),
        }
    }
    // Filtered listings must reach the backend
    let force = refresh || filters != ProductFilters::default();

    let store = ctx.products()?;
    let loaded = store.load(Some(&filters), force).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&loaded.items)?);
        return Ok(());
    }

    for product in &loaded.items {
        print_product(product);
    }
    if loaded.from_cache {
        let age = last_saved(ctx.storage.as_ref(), BACKEND_PRODUCTS_KEY)
            .map(age_display)
            .unwrap_or_else(|| "unknown".to_string());
        eprintln!("{} products (cached, updated {})", loaded.items.len(), age);
    } else {
        eprintln!("{} products", loaded.items.len());
    }
    Ok(())
}

async fn show_product(ctx: &App, id: &str) -> Result<()> {
    let store = ctx.products()?;
    if store.get_by_id(id).is_none() {
        store.load(None, true).await?;
    }
    let Some(product) = store.get_by_id(id) else {
        bail!("No product with id {}", id);
    };
    println!("{}", serde_json::to_string_pretty(&product)?);
    Ok(())
}

async fn list_categories(ctx: &App) -> Result<()> {
    let store = ctx.categories()?;
    let loaded = store.load(None, false).await?;
    for category in &loaded.items {
        println!("{:>14}  {:<20} {}", category.id, category.name, category.description);
    }
    Ok(())
}

async fn overview(ctx: &App) -> Result<()> {
    let products = ctx.products()?;
    let categories = ctx.categories()?;

    let (products_res, categories_res) =
        tokio::join!(products.load(None, false), categories.load(None, false));
    let products = products_res?.items;
    let categories = categories_res?.items;

    for category in &categories {
        let count = products.iter().filter(|p| p.category == category.id).count();
        println!("{:<20} {:>4} products", category.name, count);
    }
    let listed = products.iter().filter(|p| p.status.is_listed()).count();
    println!("{} products, {} listed", products.len(), listed);
    Ok(())
}

async fn create_category(ctx: &App, name: &str, description: String) -> Result<()> {
    let store = ctx.categories()?;
    let outcome = store
        .create(&CategoryDraft {
            name: name.to_string(),
            description,
        })
        .await?;
    println!("Created category {} ({})", outcome.data.name, outcome.data.id);
    if let Some(message) = outcome.message {
        eprintln!("{}", message);
    }
    Ok(())
}

async fn delete_products(ctx: &App, ids: &[String]) -> Result<()> {
    let store = ctx.products()?;
    let results = futures::future::join_all(ids.iter().map(|id| store.delete(id))).await;

    let mut failed = 0;
    for (id, result) in ids.iter().zip(results) {
        match result {
            Ok(_) => println!("Deleted product {}", id),
            Err(e) => {
                failed += 1;
                eprintln!("Failed to delete product {}: {}", id, e);
            }
        }
    }
    if failed > 0 {
        bail!("{} of {} deletions failed", failed, ids.len());
    }
    Ok(())
}

// ===== Local catalog =====

async fn local(ctx: &App, args: &[String]) -> Result<()> {
    let mut catalog = LocalCatalog::with_debounce(ctx.storage.clone(), ctx.config.persist_debounce());

    match args.first().map(String::as_str) {
        Some("products") => {
            for product in catalog.products() {
                print_product(product);
            }
        }
        Some("categories") => {
            for category in catalog.categories() {
                let count = catalog.products_by_category(&category.id).len();
                println!("{:>14}  {:<20} {:>4} products", category.id, category.name, count);
            }
        }
        Some("showcase") => {
            for item in catalog.showcase_products() {
                let category = catalog
                    .category_name(&item.category)
                    .unwrap_or_else(|| "-".to_string());
                println!("{:>14}  {:<32} {}", item.id, item.name, category);
            }
        }
        Some("add-category") => {
            let name = required(args, 1, "category name")?;
            let category = catalog.add_category(CategoryDraft {
                name: name.to_string(),
                description: args.get(2).cloned().unwrap_or_default(),
            });
            println!("Added category {} ({})", category.name, category.id);
        }
        Some("delete-product") => {
            let id = required(args, 1, "product id")?;
            if !catalog.delete_product(id) {
                bail!("No local product with id {}", id);
            }
            println!("Deleted local product {}", id);
        }
        _ => bail!("Unknown local command\n\n{}", USAGE),
    }

    catalog.close().await;
    Ok(())
}
