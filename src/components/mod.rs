pub mod comfort_panel;
pub mod disruption_modal;
pub mod home_address;
pub mod itinerary;
pub mod journey_panel;
pub mod link_badge;
pub mod nav;
pub mod smart_suggestions;
pub mod toast_host;
pub mod user_dropdown;
