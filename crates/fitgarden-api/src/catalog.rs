// Reference-data endpoints (customers, menu catalog)
//
// Read-only. The booking workflow only ever stores ids + display labels
// from these records; prices are copied into drafts at add-time.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{CustomerRecord, MenuOptionRecord, Page};

impl ApiClient {
    /// List customers, one page.
    ///
    /// `GET /clientes?page={page}&pageSize={page_size}`
    pub async fn list_customers(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<Page<CustomerRecord>, Error> {
        let url = self.list_url("clientes", page, page_size, &[]);
        debug!(page, "listing customers");
        self.get(url).await
    }

    /// List menu options with their size/price tiers, one page.
    ///
    /// `GET /cardapio/opcoes?page={page}&pageSize={page_size}`
    pub async fn list_menu_options(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<Page<MenuOptionRecord>, Error> {
        let url = self.list_url("cardapio/opcoes", page, page_size, &[]);
        debug!(page, "listing menu options");
        self.get(url).await
    }
}
