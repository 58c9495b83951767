use std::sync::Arc;

use crate::payments::CheckoutProvider;
use crate::store::BookingStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BookingStore>,
    pub payments: Arc<dyn CheckoutProvider>,
}
