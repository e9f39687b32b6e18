//! Agenda (booking) command handlers.

use owo_colors::OwoColorize;
use tabled::Tabled;

use fitgarden_core::agenda::{production_tally, route_tally, ProductionLine};
use fitgarden_core::{
    AgendaService, Booking, BookingDraft, Customer, CustomerId, DeliveryKind, EditPolicy,
    PaymentMethod, SettlementMethod, TimeWindow, Zone, notify, submit::submit_draft,
};

use crate::cli::{AgendaArgs, AgendaCommand, CreateArgs, EditArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct BookingRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Horário")]
    window: String,
    #[tabled(rename = "Tipo")]
    kind: String,
    #[tabled(rename = "Cliente")]
    customer: String,
    #[tabled(rename = "Zona")]
    zone: String,
    #[tabled(rename = "Itens")]
    items: usize,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Pagamento")]
    payment: String,
    #[tabled(rename = "Pago")]
    settled: String,
}

impl From<&Booking> for BookingRow {
    fn from(b: &Booking) -> Self {
        Self {
            id: b.id.to_string(),
            window: b.window.to_string(),
            kind: b.kind.label().to_owned(),
            customer: b.display_name(),
            zone: b.zone.map(Zone::label).unwrap_or("-").to_owned(),
            items: b.items.len(),
            total: format!("R$ {:.2}", b.total()),
            payment: b.payment.label().to_owned(),
            settled: if b.settled { "sim" } else { "não" }.to_owned(),
        }
    }
}

fn detail(b: &Booking) -> String {
    let mut lines = vec![
        format!("ID:         {}", b.id),
        format!(
            "Pedido:     {}",
            b.order_id.map_or_else(|| "-".into(), |id| id.to_string())
        ),
        format!("Cliente:    {}", b.display_name()),
        format!("Telefone:   {}", b.customer_phone.as_deref().unwrap_or("-")),
        format!("Tipo:       {}", b.kind.label()),
        format!("Data:       {}", b.date.format("%d/%m/%Y")),
        format!("Horário:    {}", b.window),
        format!("Zona:       {}", b.zone.map(Zone::label).unwrap_or("-")),
        format!("Endereço:   {}", b.address.as_deref().unwrap_or("-")),
        format!("Pagamento:  {}", b.payment.label()),
        format!("Pago:       {}", if b.settled { "sim" } else { "não" }),
    ];
    if let Some(ref code) = b.voucher_code {
        lines.push(format!("Voucher:    {code}"));
    }
    if let Some(ref notes) = b.notes {
        lines.push(format!("Obs.:       {notes}"));
    }
    lines.push(String::new());
    lines.push("Itens:".into());
    for item in &b.items {
        lines.push(format!(
            "  {}x {} ({}) — R$ {:.2}",
            item.quantity,
            item.option_name,
            item.size_label,
            item.subtotal()
        ));
    }
    lines.push(format!("Total: R$ {:.2}", b.total()));
    lines.join("\n")
}

#[derive(Tabled)]
struct ProductionRow {
    #[tabled(rename = "Opção")]
    option: String,
    #[tabled(rename = "Tamanho")]
    size: String,
    #[tabled(rename = "Qtde")]
    quantity: u32,
}

impl From<&ProductionLine> for ProductionRow {
    fn from(line: &ProductionLine) -> Self {
        Self {
            option: line.option_name.clone(),
            size: line.size_label.clone(),
            quantity: line.quantity,
        }
    }
}

/// Flattened route entry: one production line inside one zone.
#[derive(serde::Serialize)]
struct RouteEntry {
    zone: String,
    option: String,
    size: String,
    quantity: u32,
}

#[derive(Tabled)]
struct RouteRow {
    #[tabled(rename = "Zona")]
    zone: String,
    #[tabled(rename = "Opção")]
    option: String,
    #[tabled(rename = "Tamanho")]
    size: String,
    #[tabled(rename = "Qtde")]
    quantity: u32,
}

impl From<&RouteEntry> for RouteRow {
    fn from(e: &RouteEntry) -> Self {
        Self {
            zone: e.zone.clone(),
            option: e.option.clone(),
            size: e.size.clone(),
            quantity: e.quantity,
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    service: &AgendaService,
    args: AgendaArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        AgendaCommand::List { date } => {
            let date = util::date_or_today(date);
            let snap = service.refresh(date).await?;
            let bookings: &[Booking] = &snap.bookings;
            let out = output::render_list(
                &global.output,
                bookings,
                |b| BookingRow::from(b),
                |b| b.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AgendaCommand::Get { id } => {
            let booking = fetch_booking(service, id).await?;
            let out = output::render_single(&global.output, &booking, detail, |b| b.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AgendaCommand::Create(create) => handle_create(service, create, global).await,

        AgendaCommand::Edit(edit) => handle_edit(service, edit, global).await,

        AgendaCommand::Delete { id } => {
            if !util::confirm(
                &format!("Excluir o agendamento {id}? Esta ação não pode ser desfeita."),
                global.yes,
            )? {
                return Ok(());
            }
            service
                .api()
                .delete_booking(id)
                .await
                .map_err(fitgarden_core::CoreError::from)?;
            success(global, &format!("Agendamento {id} excluído"));
            Ok(())
        }

        AgendaCommand::Finalize {
            id,
            payment,
            fee_channel,
        } => {
            let settlement =
                SettlementMethod::for_payment(payment.into(), fee_channel.into());
            service
                .api()
                .settle_payment(id, &settlement.to_string())
                .await
                .map_err(fitgarden_core::CoreError::from)?;
            success(global, &format!("Pagamento do agendamento {id} finalizado"));
            Ok(())
        }

        AgendaCommand::Production { date } => {
            let date = util::date_or_today(date);
            let snap = service.refresh(date).await?;
            let tally = production_tally(&snap.bookings);
            if tally.is_empty() && !global.quiet {
                eprintln!("Nenhum agendamento em {}", date.format("%d/%m/%Y"));
                return Ok(());
            }
            let out = output::render_list(&global.output, &tally, |l| ProductionRow::from(l), |l| {
                format!("{} ({}) x{}", l.option_name, l.size_label, l.quantity)
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AgendaCommand::Route { date } => {
            let date = util::date_or_today(date);
            let snap = service.refresh(date).await?;
            let entries: Vec<RouteEntry> = route_tally(&snap.bookings)
                .into_iter()
                .flat_map(|(zone, lines)| {
                    lines.into_iter().map(move |line| RouteEntry {
                        zone: zone.label().to_owned(),
                        option: line.option_name,
                        size: line.size_label,
                        quantity: line.quantity,
                    })
                })
                .collect();
            if entries.is_empty() && !global.quiet {
                eprintln!("Nenhuma entrega em {}", date.format("%d/%m/%Y"));
                return Ok(());
            }
            let out = output::render_list(&global.output, &entries, |e| RouteRow::from(e), |e| {
                format!("{}: {} ({}) x{}", e.zone, e.option, e.size, e.quantity)
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AgendaCommand::Whatsapp { id } => {
            let booking = fetch_booking(service, id).await?;
            let customer = customer_from_booking(&booking);
            let draft = BookingDraft::edit(&booking, EditPolicy::locked());
            let note = notify::compose_whatsapp(&draft, &customer)?;
            if !global.quiet {
                eprintln!("{}", note.message);
                eprintln!();
            }
            println!("{}", note.url);
            Ok(())
        }
    }
}

// ── Create / edit flows ─────────────────────────────────────────────

async fn handle_create(
    service: &AgendaService,
    args: CreateArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if args.items.is_empty() {
        return Err(CliError::Validation {
            message: "informe ao menos um --item opçãoId:tamanhoId:quantidade".into(),
        });
    }

    // Parse item specs up front — a typo should fail before any fetch.
    let specs = args
        .items
        .iter()
        .map(|spec| util::parse_item_spec(spec).map(|parsed| (spec, parsed)))
        .collect::<Result<Vec<_>, _>>()?;

    let customer_id = CustomerId::new(args.customer);
    let customer = service
        .fetch_customers()
        .await?
        .into_iter()
        .find(|c| c.id == customer_id)
        .ok_or_else(|| CliError::NotFound {
            resource_type: "cliente".into(),
            identifier: args.customer.to_string(),
            list_command: "customers list".into(),
        })?;

    let catalog = service.fetch_catalog().await?;

    let mut draft = BookingDraft::new(util::date_or_today(args.date));
    draft.set_customer(customer.clone());
    if args.pickup {
        draft.set_kind(DeliveryKind::Retirada);
    }
    if let Some(ref window) = args.window {
        draft.set_window(TimeWindow::parse(window));
    }
    if let Some(ref address) = args.address {
        draft.set_address(address.clone());
    }
    if let Some(zone) = args.zone {
        draft.set_zone(Some(zone.into()));
    }
    if let Some(ref notes) = args.notes {
        draft.set_notes(notes.clone());
    }
    draft.set_payment(args.payment.into());
    draft.set_fee_channel(args.fee_channel.into());
    if let Some(ref voucher) = args.voucher {
        draft.set_voucher_code(voucher.clone());
    }

    for (spec, (option_id, size_id, quantity)) in specs {
        // The form silently drops unknown combinations; the CLI names them.
        if catalog.size(option_id, size_id).is_none() {
            return Err(CliError::NotFound {
                resource_type: "opção".into(),
                identifier: spec.clone(),
                list_command: "menu list".into(),
            });
        }
        draft.add_item(&catalog, option_id, size_id, quantity);
    }

    let receipt = submit_draft(&mut draft, service.api().as_ref()).await?;

    success(
        global,
        &format!(
            "Agendamento {} criado (pedido {}) — total R$ {:.2}",
            receipt.booking_id,
            receipt
                .order_id
                .map_or_else(|| "-".into(), |id| id.to_string()),
            draft.total()
        ),
    );

    if args.whatsapp {
        let note = notify::compose_whatsapp(&draft, &customer)?;
        println!("{}", note.url);
    }

    Ok(())
}

async fn handle_edit(
    service: &AgendaService,
    args: EditArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let booking = fetch_booking(service, args.id).await?;

    // Permissive policy: the CLI lets every field through and relies on the
    // submission adapter to refuse what the backend cannot store.
    let mut draft = BookingDraft::edit(&booking, EditPolicy::permissive());

    if let Some(kind) = args.kind() {
        draft.set_kind(kind);
    }
    if let Some(date) = args.date {
        draft.set_date(date);
    }
    if let Some(ref window) = args.window {
        draft.set_window(TimeWindow::parse(window));
    }
    if let Some(ref address) = args.address {
        draft.set_address(address.clone());
    }
    if let Some(zone) = args.zone {
        draft.set_zone(Some(zone.into()));
    }
    if let Some(ref notes) = args.notes {
        draft.set_notes(notes.clone());
    }
    if let Some(payment) = args.payment {
        draft.set_payment(PaymentMethod::from(payment));
    }

    if !args.items.is_empty() {
        let catalog = service.fetch_catalog().await?;
        let existing: Vec<u64> = draft.items().iter().map(|item| item.id).collect();
        for id in existing {
            draft.remove_item(id);
        }
        for spec in &args.items {
            let (option_id, size_id, quantity) = util::parse_item_spec(spec)?;
            if catalog.size(option_id, size_id).is_none() {
                return Err(CliError::NotFound {
                    resource_type: "opção".into(),
                    identifier: spec.clone(),
                    list_command: "menu list".into(),
                });
            }
            draft.add_item(&catalog, option_id, size_id, quantity);
        }
    }

    let receipt = submit_draft(&mut draft, service.api().as_ref()).await?;

    success(
        global,
        &format!(
            "Agendamento {} atualizado — total R$ {:.2}",
            receipt.booking_id,
            draft.total()
        ),
    );
    Ok(())
}

// ── Helpers ─────────────────────────────────────────────────────────

async fn fetch_booking(service: &AgendaService, id: i64) -> Result<Booking, CliError> {
    let record = service.api().get_booking(id).await.map_err(|e| {
        if e.is_not_found() {
            CliError::NotFound {
                resource_type: "agendamento".into(),
                identifier: id.to_string(),
                list_command: "agenda list".into(),
            }
        } else {
            fitgarden_core::CoreError::from(e).into()
        }
    })?;
    Ok(Booking::from(record))
}

fn customer_from_booking(b: &Booking) -> Customer {
    Customer {
        id: b.customer_id,
        name: b.display_name(),
        phone: b.customer_phone.clone(),
        address: b.address.clone(),
        zone: b.zone,
    }
}

fn success(global: &GlobalOpts, message: &str) {
    if global.quiet {
        return;
    }
    if output::should_color(&global.color) {
        eprintln!("{}", message.green());
    } else {
        eprintln!("{message}");
    }
}
