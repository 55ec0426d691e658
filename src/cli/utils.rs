use anyhow::Result;

use super::OutputFormat;
use crate::catalog::Product;

/// Print the current view as a table or as pretty JSON.
pub fn render(products: &[Product], output: OutputFormat) -> Result<()> {
    match output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(products)?);
        }
        OutputFormat::Text => {
            if products.is_empty() {
                println!("no products");
                return Ok(());
            }
            println!(
                "{:<36}  {:<24}  {:>10}  {}",
                "ID", "NAME", "PRICE", "DESCRIPTION"
            );
            for product in products {
                println!(
                    "{:<36}  {:<24}  {:>10}  {}",
                    product.id,
                    product.name,
                    product.price,
                    product.description.as_deref().unwrap_or("-"),
                );
            }
        }
    }
    Ok(())
}
