use axum::{
    Router,
    routing::{delete, get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::route::{booking::{apply_penalty, cancel_booking, create_booking, get_bookings}, payment::{create_checkout, payment_success}};
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
    //booking
    .route("/api/book", post(create_booking))              //reserve a parking slot
    .route("/api/bookings", get(get_bookings))             //list all bookings for the admin dashboard
    .route("/api/book/{id}", delete(cancel_booking))       //cancel a booking by id
    .route("/apply-penalty/{id}", put(apply_penalty))      //set a manual penalty, marks the booking Penalty Applied
    //payment
    .route("/api/payment", post(create_checkout))          //create a checkout session for a booking
    .route("/api/payment/success", post(payment_success))  //confirm payment, marks the booking paid
    .layer(TraceLayer::new_for_http())
    .layer(CorsLayer::permissive())
    .with_state(state)
}
