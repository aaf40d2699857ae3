use super::ui;
use crate::core::{Category, MarketService, Quote, Snapshot};
use anyhow::Result;
use comfy_table::Cell;

fn quote_table(category: Category, quotes: &[Quote]) -> String {
    let mut table = ui::new_styled_table();

    match category {
        Category::Crypto => {
            table.set_header(vec![
                ui::header_cell("Code"),
                ui::header_cell("Name"),
                ui::header_cell("Price (USD)"),
                ui::header_cell("Price (TRY)"),
                ui::header_cell("24h"),
            ]);
            for quote in quotes {
                table.add_row(vec![
                    Cell::new(&quote.code),
                    Cell::new(&quote.display_name),
                    ui::price_cell(quote.price_usd.unwrap_or(quote.bid)),
                    ui::price_cell(quote.price_try.unwrap_or(0.0)),
                    ui::change_cell(quote.change_percent),
                ]);
            }
        }
        Category::Currency | Category::Gold => {
            table.set_header(vec![
                ui::header_cell("Code"),
                ui::header_cell("Name"),
                ui::header_cell("Bid (TRY)"),
                ui::header_cell("Ask (TRY)"),
                ui::header_cell("Change"),
            ]);
            for quote in quotes {
                table.add_row(vec![
                    Cell::new(&quote.code),
                    Cell::new(&quote.display_name),
                    ui::price_cell(quote.bid),
                    ui::price_cell(quote.ask),
                    ui::change_cell(quote.change_percent),
                ]);
            }
        }
    }

    table.to_string()
}

fn section_title(category: Category) -> &'static str {
    match category {
        Category::Currency => "Currencies",
        Category::Gold => "Gold",
        Category::Crypto => "Crypto",
    }
}

impl Snapshot {
    pub fn quotes(&self, category: Category) -> &[Quote] {
        match category {
            Category::Currency => &self.currencies,
            Category::Gold => &self.golds,
            Category::Crypto => &self.cryptos,
        }
    }

    /// Renders the snapshot as one styled table per category.
    pub fn display_as_tables(&self, only: Option<Category>) -> String {
        let mut output = String::new();

        for category in [Category::Currency, Category::Gold, Category::Crypto] {
            if only.is_some_and(|c| c != category) {
                continue;
            }
            let quotes = self.quotes(category);
            output.push_str(&format!(
                "{}\n\n",
                ui::style_text(section_title(category), ui::StyleType::Title)
            ));
            if quotes.is_empty() {
                output.push_str(&ui::style_text("No data\n\n", ui::StyleType::Subtle));
            } else {
                output.push_str(&quote_table(category, quotes));
                output.push_str("\n\n");
            }
        }

        let source = if self.is_fallback() {
            ui::style_text("fallback data, all providers unavailable", ui::StyleType::Warning)
        } else {
            ui::style_text(&self.source, ui::StyleType::Subtle)
        };
        output.push_str(&format!(
            "Source: {} at {}",
            source,
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        output
    }
}

pub async fn run(service: &MarketService, category: Option<Category>, as_json: bool) -> Result<()> {
    let spinner = ui::new_spinner("Fetching market data...");
    let snapshot = service.snapshot().await;
    spinner.finish_and_clear();

    if as_json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        println!("{}", snapshot.display_as_tables(category));
    }
    Ok(())
}
