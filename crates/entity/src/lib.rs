pub mod activity;
pub mod building;
pub mod organization;
pub mod organization_activity;
pub mod phone;
