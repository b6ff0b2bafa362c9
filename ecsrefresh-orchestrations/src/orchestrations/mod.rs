pub mod flows;
pub mod immediate_refresh;
pub mod refresh_services;
pub mod verify_refreshed;
