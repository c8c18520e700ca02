pub mod cards;
pub mod panels;
