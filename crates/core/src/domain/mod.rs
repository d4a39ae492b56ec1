pub mod outlook;
pub mod series;
