pub mod campaigns;
pub mod events;
pub mod results;
