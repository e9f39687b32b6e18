// Booking (agendamento) endpoints
//
// Day-scoped listing plus the create/update/delete/settle lifecycle.
// The create payload carries customer + voucher fields; the update payload
// deliberately does not (see `UpdateBookingRequest`).

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{
    BookingCreated, BookingRecord, CreateBookingRequest, Page, SettlePaymentRequest,
    SucessoResponse, UpdateBookingRequest,
};

impl ApiClient {
    /// List bookings for a delivery date (`YYYY-MM-DD`), one page.
    ///
    /// `GET /agendamentos?date={date}&page={page}&pageSize={page_size}`
    pub async fn list_bookings(
        &self,
        date: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Page<BookingRecord>, Error> {
        let url = self.list_url("agendamentos", page, page_size, &[("date", date)]);
        debug!(date, page, "listing bookings");
        self.get(url).await
    }

    /// Fetch a single booking by id.
    ///
    /// `GET /agendamentos/{id}`
    pub async fn get_booking(&self, id: i64) -> Result<BookingRecord, Error> {
        let url = self.api_url(&format!("agendamentos/{id}"));
        self.get(url).await
    }

    /// Create a booking, returning the new order + booking ids.
    ///
    /// `POST /agendamentos`
    pub async fn create_booking(
        &self,
        req: &CreateBookingRequest,
    ) -> Result<BookingCreated, Error> {
        let url = self.api_url("agendamentos");
        debug!(cliente_id = req.cliente_id, itens = req.itens.len(), "creating booking");
        self.post(url, req).await
    }

    /// Update an existing booking, returning the updated record.
    ///
    /// `PUT /agendamentos/{id}`
    pub async fn update_booking(
        &self,
        id: i64,
        req: &UpdateBookingRequest,
    ) -> Result<BookingRecord, Error> {
        let url = self.api_url(&format!("agendamentos/{id}"));
        debug!(id, itens = req.itens.len(), "updating booking");
        self.put(url, req).await
    }

    /// Delete a booking.
    ///
    /// `DELETE /agendamentos/{id}` — the backend answers `{"sucesso": bool}`;
    /// a `false` flag is reported as a backend error.
    pub async fn delete_booking(&self, id: i64) -> Result<(), Error> {
        let url = self.api_url(&format!("agendamentos/{id}"));
        debug!(id, "deleting booking");
        let resp: SucessoResponse = self.delete(url).await?;
        if resp.sucesso {
            Ok(())
        } else {
            Err(Error::Backend {
                status: 200,
                message: "exclusão recusada pelo backend".into(),
            })
        }
    }

    /// Mark a pending booking's payment as resolved.
    ///
    /// `POST /agendamentos/{id}/finalizar-pagamento` with `{"formaPagamento": "..."}`
    pub async fn settle_payment(&self, id: i64, forma_pagamento: &str) -> Result<(), Error> {
        let url = self.api_url(&format!("agendamentos/{id}/finalizar-pagamento"));
        debug!(id, forma_pagamento, "settling payment");
        let _: serde_json::Value = self
            .post(
                url,
                &SettlePaymentRequest {
                    forma_pagamento: forma_pagamento.to_owned(),
                },
            )
            .await?;
        Ok(())
    }
}
