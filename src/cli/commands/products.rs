use anyhow::{Context, Result};
use clap::Subcommand;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::catalog::Product;
use crate::cli::{utils, OutputFormat};
use crate::client::view::LocalView;
use crate::client::{CatalogClient, NewProduct};

#[derive(Subcommand)]
pub enum ProductCommands {
    #[command(about = "List all products")]
    List,

    #[command(about = "Create a product")]
    Create {
        #[arg(long, help = "Product name")]
        name: String,

        #[arg(long, help = "Optional description")]
        description: Option<String>,

        #[arg(long, help = "Price, e.g. 19.90")]
        price: String,
    },

    #[command(about = "Replace a product's fields wholesale")]
    Update {
        #[arg(help = "Product id")]
        id: Uuid,

        #[arg(long, help = "New name")]
        name: String,

        #[arg(long, help = "New description; omit to clear it")]
        description: Option<String>,

        #[arg(long, help = "New price")]
        price: String,
    },

    #[command(about = "Delete a product")]
    Delete {
        #[arg(help = "Product id")]
        id: Uuid,
    },
}

/// Run one product command: fetch the list once, apply the mutation's own
/// result to the view, and render the view without a second fetch.
pub async fn handle(
    cmd: ProductCommands,
    client: &CatalogClient,
    output: OutputFormat,
) -> Result<()> {
    let mut view = LocalView::new();
    view.replace_all(client.list().await?);

    match cmd {
        ProductCommands::List => {}
        ProductCommands::Create {
            name,
            description,
            price,
        } => {
            let price = parse_price(&price)?;
            let new_product = NewProduct {
                name,
                description,
                price,
            };
            let id = client.create(&new_product).await?;
            if output == OutputFormat::Text {
                println!("created product {id}");
            }
            view.apply_created(Product {
                id,
                name: new_product.name,
                description: new_product.description,
                price: new_product.price,
            });
        }
        ProductCommands::Update {
            id,
            name,
            description,
            price,
        } => {
            let price = parse_price(&price)?;
            let product = Product {
                id,
                name,
                description,
                price,
            };
            client.update(&product).await?;
            if output == OutputFormat::Text {
                println!("updated product {id}");
            }
            view.apply_updated(product);
        }
        ProductCommands::Delete { id } => {
            client.delete(id).await?;
            if output == OutputFormat::Text {
                println!("deleted product {id}");
            }
            view.apply_deleted(id);
        }
    }

    utils::render(view.products(), output)
}

fn parse_price(raw: &str) -> Result<Decimal> {
    raw.parse::<Decimal>()
        .with_context(|| format!("invalid price: {raw}"))
}
