pub mod capabilities;
pub mod reset;
