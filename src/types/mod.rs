pub mod itinerary;
pub mod trip;

pub use itinerary::{Activity, CreateItinerary, Itinerary, ItineraryDay};
pub use trip::{TravelType, TripRequest, DATE_FORMAT, MAX_TRIP_SPAN_DAYS};
