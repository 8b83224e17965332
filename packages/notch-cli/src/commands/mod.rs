pub mod design;
pub mod run;
pub mod spectrum;
