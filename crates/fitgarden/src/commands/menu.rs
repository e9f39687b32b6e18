//! Menu catalog command handlers (read-only reference data).

use tabled::Tabled;

use fitgarden_core::AgendaService;

use crate::cli::{GlobalOpts, MenuArgs, MenuCommand};
use crate::error::CliError;
use crate::output;

/// One option+size tier, flattened for listing.
#[derive(serde::Serialize)]
struct MenuEntry {
    option_id: i64,
    option: String,
    description: String,
    size_id: i64,
    size: String,
    price: String,
}

#[derive(Tabled)]
struct MenuRow {
    #[tabled(rename = "Opção")]
    option_id: i64,
    #[tabled(rename = "Nome")]
    option: String,
    #[tabled(rename = "Tamanho")]
    size_id: i64,
    #[tabled(rename = "Rótulo")]
    size: String,
    #[tabled(rename = "Preço")]
    price: String,
}

impl From<&MenuEntry> for MenuRow {
    fn from(e: &MenuEntry) -> Self {
        Self {
            option_id: e.option_id,
            option: e.option.clone(),
            size_id: e.size_id,
            size: e.size.clone(),
            price: e.price.clone(),
        }
    }
}

pub async fn handle(
    service: &AgendaService,
    args: MenuArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        MenuCommand::List => {
            let catalog = service.fetch_catalog().await?;
            let entries: Vec<MenuEntry> = catalog
                .iter()
                .flat_map(|option| {
                    option.sizes.iter().map(|size| MenuEntry {
                        option_id: option.id.value(),
                        option: option.name.clone(),
                        description: option.description.clone().unwrap_or_default(),
                        size_id: size.id.value(),
                        size: size.label.clone(),
                        price: format!("R$ {:.2}", size.price),
                    })
                })
                .collect();
            let out = output::render_list(&global.output, &entries, |e| MenuRow::from(e), |e| {
                format!("{}:{}", e.option_id, e.size_id)
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
