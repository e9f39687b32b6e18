//! Customer command handlers (read-only reference data).

use tabled::Tabled;

use fitgarden_core::{AgendaService, Customer, Zone};

use crate::cli::{CustomersArgs, CustomersCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct CustomerRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Nome")]
    name: String,
    #[tabled(rename = "Telefone")]
    phone: String,
    #[tabled(rename = "Endereço")]
    address: String,
    #[tabled(rename = "Zona")]
    zone: String,
}

impl From<&Customer> for CustomerRow {
    fn from(c: &Customer) -> Self {
        Self {
            id: c.id.to_string(),
            name: c.name.clone(),
            phone: c.phone.clone().unwrap_or_default(),
            address: c.address.clone().unwrap_or_default(),
            zone: c.zone.map(Zone::label).unwrap_or("-").to_owned(),
        }
    }
}

pub async fn handle(
    service: &AgendaService,
    args: CustomersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        CustomersCommand::List { filter } => {
            let mut customers = service.fetch_customers().await?;
            if let Some(ref needle) = filter {
                let needle = needle.to_lowercase();
                customers.retain(|c| c.name.to_lowercase().contains(&needle));
            }
            let out = output::render_list(
                &global.output,
                &customers,
                |c| CustomerRow::from(c),
                |c| c.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
