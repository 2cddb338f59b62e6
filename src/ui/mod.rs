pub mod charts;
pub mod maps;
pub mod panels;
