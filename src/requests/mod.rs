// One builder per OTA operation
mod availability;
mod cancel_reservation;
mod descriptive_info;
mod read_reservation;
mod reservation;
mod search;

pub use availability::AvailabilityRequest;
pub use cancel_reservation::{CancelReservationRequest, CancelType};
pub use descriptive_info::DescriptiveInfoRequest;
pub use read_reservation::ReadReservationRequest;
pub use reservation::{ConfirmToken, Customer, Gender, PaymentCard, ReservationRequest};
pub use search::SearchRequest;
