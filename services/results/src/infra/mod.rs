pub mod db;
pub mod geo;
