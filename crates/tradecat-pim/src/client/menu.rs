use tradecat_core::Taxonomy;

use crate::error::PimError;
use crate::normalize::normalize_menu;
use crate::types::PimMenuResponse;

use super::PimClient;

impl PimClient {
    /// Fetches the navigation menu published under `menu_key`.
    ///
    /// # Errors
    ///
    /// Returns [`PimError::NotFound`] if the PIM has no such menu, and the
    /// same transport/status/parse errors as catalog fetches otherwise.
    pub async fn fetch_menu(&self, menu_key: &str) -> Result<Taxonomy, PimError> {
        let url = self.endpoint(&["menus", menu_key]);
        let (body, _) = self
            .get_json::<PimMenuResponse>(&url, &format!("menu {menu_key}"))
            .await?;
        Ok(normalize_menu(body.menu))
    }
}
